//! Output a transcript as SRT, WebVTT, and JSON.
//!
//! Usage: cargo run --example formats -- dQw4w9WgXcQ

#[tokio::main]
async fn main() -> yt_transcript::Result<()> {
    let video_id = std::env::args()
        .nth(1)
        .expect("usage: formats <video-id>");

    let transcript = yt_transcript::fetch(&video_id).await?;

    println!("=== SRT ===\n{}", transcript.to_srt());
    println!("=== WebVTT ===\n{}", transcript.to_vtt());
    println!("=== JSON ===\n{}", transcript.to_json_pretty()?);

    Ok(())
}

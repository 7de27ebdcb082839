//! Fetch the English transcript of a video and print the text.
//!
//! Usage: cargo run --example basic -- dQw4w9WgXcQ

#[tokio::main]
async fn main() -> yt_transcript::Result<()> {
    let video_id = std::env::args()
        .nth(1)
        .expect("usage: basic <video-id>");

    let transcript = yt_transcript::fetch(&video_id).await?;

    println!("{}", transcript.text());

    Ok(())
}

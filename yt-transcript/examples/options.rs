//! List the caption tracks of a video, then fetch with a language preference.
//!
//! Usage: cargo run --example options -- dQw4w9WgXcQ

use yt_transcript::{format_timestamp, FetchOptions, YouTubeClient};

#[tokio::main]
async fn main() -> yt_transcript::Result<()> {
    let video_id = std::env::args()
        .nth(1)
        .expect("usage: options <video-id>");

    let opts = FetchOptions::new()
        .languages(["de", "en"])?
        .any_language(true);
    let client = YouTubeClient::new(opts)?;

    for track in client.list(&video_id).await? {
        println!(
            "{:<6} {} {}",
            track.language_code,
            track.language,
            if track.is_generated { "(generated)" } else { "" }
        );
    }

    let transcript = client.fetch_transcript(&video_id).await?;
    for snippet in &transcript.snippets {
        println!("[{}] {}", format_timestamp(snippet.start), snippet.text);
    }

    Ok(())
}

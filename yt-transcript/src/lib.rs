//! YouTube caption fetching: video id in, timed transcript out.
//!
//! **yt-transcript** resolves a video's caption tracks through YouTube's web
//! endpoints (watch page, innertube player API, timedtext), picks a track by
//! language preference, and decodes it into ordered [`Snippet`]s. The
//! [`envelope`] module shapes the result into the JSON document printed by the
//! `fetch-transcript` CLI.
//!
//! # Quick start
//!
//! ```rust,no_run
//! # #[tokio::main]
//! # async fn main() -> yt_transcript::Result<()> {
//! let transcript = yt_transcript::fetch("dQw4w9WgXcQ").await?;
//! println!("{}", transcript.text());
//!
//! // Prefer German, fall back to whatever the video has
//! let opts = yt_transcript::FetchOptions::new()
//!     .languages(["de", "en"])?
//!     .any_language(true);
//! let transcript = yt_transcript::fetch_with_options("dQw4w9WgXcQ", opts).await?;
//! println!("{}", transcript.to_srt());
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod envelope;
pub mod error;
pub(crate) mod innertube;
pub(crate) mod timedtext;
pub(crate) mod tracks;
pub mod types;

pub use client::{TranscriptSource, YouTubeClient};
pub use config::FetchOptions;
pub use envelope::Envelope;
pub use error::{Error, ErrorKind, Result};
pub use types::{format_timestamp, FetchedTranscript, Snippet, TranscriptInfo};

/// Fetch the English transcript of a video with default options.
pub async fn fetch(video_id: &str) -> Result<FetchedTranscript> {
    fetch_with_options(video_id, FetchOptions::default()).await
}

/// Fetch a transcript with custom options.
pub async fn fetch_with_options(video_id: &str, options: FetchOptions) -> Result<FetchedTranscript> {
    YouTubeClient::new(options)?.fetch_transcript(video_id).await
}

/// List the caption tracks available for a video.
pub async fn list_transcripts(video_id: &str) -> Result<Vec<TranscriptInfo>> {
    YouTubeClient::new(FetchOptions::default())?
        .list(video_id)
        .await
}

use std::future::Future;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE};
use tracing::info;

use crate::config::FetchOptions;
use crate::error::{Error, Result};
use crate::innertube;
use crate::timedtext;
use crate::tracks::TranscriptList;
use crate::types::{FetchedTranscript, TranscriptInfo};

/// Anything that can turn a video id into a transcript.
pub trait TranscriptSource {
    fn fetch(&self, video_id: &str) -> impl Future<Output = Result<FetchedTranscript>> + Send;
}

/// Transcript source backed by YouTube's web endpoints.
#[derive(Debug, Clone)]
pub struct YouTubeClient {
    http: reqwest::Client,
    options: FetchOptions,
}

impl YouTubeClient {
    pub fn new(options: FetchOptions) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let accept_language = HeaderValue::from_str(&options.accept_language)
            .map_err(|e| Error::InvalidOption(format!("invalid Accept-Language: {e}")))?;
        headers.insert(ACCEPT_LANGUAGE, accept_language);

        let mut builder = reqwest::Client::builder()
            .user_agent(options.user_agent.clone())
            .default_headers(headers);
        if let Some(proxy) = &options.proxy {
            let proxy = reqwest::Proxy::all(proxy)
                .map_err(|e| Error::InvalidOption(format!("invalid proxy URL: {e}")))?;
            builder = builder.proxy(proxy);
        }
        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            options,
        })
    }

    pub fn options(&self) -> &FetchOptions {
        &self.options
    }

    /// List the caption tracks available for a video.
    pub async fn list(&self, video_id: &str) -> Result<Vec<TranscriptInfo>> {
        Ok(self.transcript_list(video_id).await?.infos())
    }

    /// Fetch the best matching caption track for a video.
    pub async fn fetch_transcript(&self, video_id: &str) -> Result<FetchedTranscript> {
        let list = self.transcript_list(video_id).await?;
        let track = list.find(&self.options.languages, self.options.any_language)?;
        let snippets = timedtext::fetch_snippets(&self.http, video_id, track).await?;

        info!(
            %video_id,
            language = %track.language_code,
            generated = track.is_generated(),
            snippets = snippets.len(),
            "transcript fetched"
        );

        Ok(FetchedTranscript {
            video_id: video_id.to_string(),
            snippets,
            language: Some(track.language()),
            language_code: Some(track.language_code.clone()),
            is_generated: track.is_generated(),
        })
    }

    async fn transcript_list(&self, video_id: &str) -> Result<TranscriptList> {
        let player = innertube::fetch_player_response(&self.http, video_id).await?;
        TranscriptList::from_player(video_id, player)
    }
}

impl TranscriptSource for YouTubeClient {
    fn fetch(&self, video_id: &str) -> impl Future<Output = Result<FetchedTranscript>> + Send {
        self.fetch_transcript(video_id)
    }
}

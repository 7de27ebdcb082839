//! The JSON document printed by `fetch-transcript`: one success or one error object.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::types::{FetchedTranscript, Snippet};

/// Language reported when the track doesn't name one.
pub const DEFAULT_LANGUAGE: &str = "en";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuccessEnvelope {
    pub success: bool,
    pub segments: Vec<Snippet>,
    pub full_text: String,
    pub language: String,
    pub word_count: usize,
    pub character_count: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEnvelope {
    pub success: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Envelope {
    Success(SuccessEnvelope),
    Error(ErrorEnvelope),
}

impl Envelope {
    /// Wrong argument count. Carries no `errorType`.
    pub fn usage(program: &str) -> Self {
        Envelope::Error(ErrorEnvelope {
            success: false,
            error: format!("Usage: {program} <video_id>"),
            error_type: None,
        })
    }

    pub fn from_transcript(transcript: &FetchedTranscript) -> Self {
        let full_text = transcript.text();
        let language = transcript
            .language_code
            .as_deref()
            .filter(|code| !code.is_empty())
            .unwrap_or(DEFAULT_LANGUAGE)
            .to_string();

        Envelope::Success(SuccessEnvelope {
            success: true,
            segments: transcript.snippets.clone(),
            word_count: transcript.word_count(),
            character_count: transcript.character_count(),
            full_text,
            language,
        })
    }

    pub fn from_error(error: &Error) -> Self {
        Envelope::Error(ErrorEnvelope {
            success: false,
            error: error.to_string(),
            error_type: Some(error.kind().as_str().to_string()),
        })
    }

    pub fn from_result(result: Result<FetchedTranscript>) -> Self {
        match result {
            Ok(transcript) => Self::from_transcript(&transcript),
            Err(e) => Self::from_error(&e),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Envelope::Success(_))
    }

    /// Compact single-line JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

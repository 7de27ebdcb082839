use std::fmt;

/// All errors that can occur while fetching a transcript.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid video id: \"{video_id}\" (pass the video id, not the full URL)")]
    InvalidVideoId { video_id: String },

    #[error("video {video_id} is no longer available")]
    VideoUnavailable { video_id: String },

    #[error("video {video_id} is unplayable: {}", unplayable_reason(.reason, .sub_reasons))]
    VideoUnplayable {
        video_id: String,
        reason: Option<String>,
        sub_reasons: Vec<String>,
    },

    #[error("video {video_id} is age restricted and requires authentication")]
    AgeRestricted { video_id: String },

    #[error("YouTube is blocking requests for video {video_id} (bot check)")]
    RequestBlocked { video_id: String },

    #[error("YouTube is blocking requests from this IP (video {video_id})")]
    IpBlocked { video_id: String },

    #[error("failed to accept the cookie consent page for video {video_id}")]
    ConsentCookie { video_id: String },

    #[error("subtitles are disabled for video {video_id}")]
    TranscriptsDisabled { video_id: String },

    #[error(
        "no transcript found for video {video_id} in languages [{}] (available: [{}])",
        .requested.join(", "),
        .available.join(", ")
    )]
    NoTranscriptFound {
        video_id: String,
        requested: Vec<String>,
        available: Vec<String>,
    },

    #[error("the caption track for video {video_id} requires a PO token")]
    PoTokenRequired { video_id: String },

    #[error("request for video {video_id} failed with HTTP status {status}")]
    RequestFailed { video_id: String, status: u16 },

    #[error("could not parse YouTube response for video {video_id}: {detail}")]
    DataUnparsable { video_id: String, detail: String },

    #[error("invalid option: {0}")]
    InvalidOption(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn unplayable_reason(reason: &Option<String>, sub_reasons: &[String]) -> String {
    let mut out = reason.clone().unwrap_or_else(|| "no reason given".into());
    for sub in sub_reasons {
        out.push_str("; ");
        out.push_str(sub);
    }
    out
}

/// Closed set of failure categories, reported as `errorType`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidVideoId,
    VideoUnavailable,
    VideoUnplayable,
    AgeRestricted,
    RequestBlocked,
    IpBlocked,
    FailedToCreateConsentCookie,
    TranscriptsDisabled,
    NoTranscriptFound,
    PoTokenRequired,
    RequestFailed,
    DataUnparsable,
    InvalidOption,
    NetworkError,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidVideoId => "InvalidVideoId",
            ErrorKind::VideoUnavailable => "VideoUnavailable",
            ErrorKind::VideoUnplayable => "VideoUnplayable",
            ErrorKind::AgeRestricted => "AgeRestricted",
            ErrorKind::RequestBlocked => "RequestBlocked",
            ErrorKind::IpBlocked => "IpBlocked",
            ErrorKind::FailedToCreateConsentCookie => "FailedToCreateConsentCookie",
            ErrorKind::TranscriptsDisabled => "TranscriptsDisabled",
            ErrorKind::NoTranscriptFound => "NoTranscriptFound",
            ErrorKind::PoTokenRequired => "PoTokenRequired",
            ErrorKind::RequestFailed => "RequestFailed",
            ErrorKind::DataUnparsable => "DataUnparsable",
            ErrorKind::InvalidOption => "InvalidOption",
            ErrorKind::NetworkError => "NetworkError",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Error {
    /// Category of this failure.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidVideoId { .. } => ErrorKind::InvalidVideoId,
            Error::VideoUnavailable { .. } => ErrorKind::VideoUnavailable,
            Error::VideoUnplayable { .. } => ErrorKind::VideoUnplayable,
            Error::AgeRestricted { .. } => ErrorKind::AgeRestricted,
            Error::RequestBlocked { .. } => ErrorKind::RequestBlocked,
            Error::IpBlocked { .. } => ErrorKind::IpBlocked,
            Error::ConsentCookie { .. } => ErrorKind::FailedToCreateConsentCookie,
            Error::TranscriptsDisabled { .. } => ErrorKind::TranscriptsDisabled,
            Error::NoTranscriptFound { .. } => ErrorKind::NoTranscriptFound,
            Error::PoTokenRequired { .. } => ErrorKind::PoTokenRequired,
            Error::RequestFailed { .. } => ErrorKind::RequestFailed,
            Error::DataUnparsable { .. } | Error::Json(_) => ErrorKind::DataUnparsable,
            Error::InvalidOption(_) => ErrorKind::InvalidOption,
            Error::Http(_) => ErrorKind::NetworkError,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

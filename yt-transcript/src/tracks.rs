use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::innertube::PlayerResponse;
use crate::types::TranscriptInfo;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CaptionTracklist {
    #[serde(default)]
    pub caption_tracks: Vec<CaptionTrack>,
}

/// One caption track as listed in the player response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CaptionTrack {
    pub base_url: String,
    #[serde(default)]
    pub name: TrackName,
    pub language_code: String,
    pub kind: Option<String>,
    #[serde(default)]
    pub is_translatable: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TrackName {
    pub simple_text: Option<String>,
    #[serde(default)]
    pub runs: Vec<TextRun>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TextRun {
    pub text: String,
}

impl TrackName {
    fn text(&self) -> String {
        if self.runs.is_empty() {
            self.simple_text.clone().unwrap_or_default()
        } else {
            self.runs.iter().map(|r| r.text.as_str()).collect()
        }
    }
}

impl CaptionTrack {
    /// Auto-generated (speech recognition) track.
    pub fn is_generated(&self) -> bool {
        self.kind.as_deref() == Some("asr")
    }

    pub fn language(&self) -> String {
        self.name.text()
    }

    pub fn info(&self) -> TranscriptInfo {
        TranscriptInfo {
            language: self.language(),
            language_code: self.language_code.clone(),
            is_generated: self.is_generated(),
            is_translatable: self.is_translatable,
        }
    }
}

/// Caption tracks of one video, split into manually created and generated.
#[derive(Debug)]
pub(crate) struct TranscriptList {
    video_id: String,
    manual: Vec<CaptionTrack>,
    generated: Vec<CaptionTrack>,
}

impl TranscriptList {
    pub fn from_player(video_id: &str, player: PlayerResponse) -> Result<Self> {
        let tracks = player
            .captions
            .and_then(|c| c.tracklist)
            .map(|t| t.caption_tracks)
            .unwrap_or_default();

        if tracks.is_empty() {
            return Err(Error::TranscriptsDisabled {
                video_id: video_id.to_string(),
            });
        }

        let (generated, manual): (Vec<_>, Vec<_>) =
            tracks.into_iter().partition(CaptionTrack::is_generated);
        debug!(
            %video_id,
            manual = manual.len(),
            generated = generated.len(),
            "caption tracks listed"
        );

        Ok(Self {
            video_id: video_id.to_string(),
            manual,
            generated,
        })
    }

    /// Pick a track by language preference.
    ///
    /// Each code is tried in order, manual tracks before generated ones.
    /// With `any_language`, an unmatched preference falls back to the first
    /// manual track, then the first generated one.
    pub fn find(&self, languages: &[String], any_language: bool) -> Result<&CaptionTrack> {
        for code in languages {
            let found = by_code(&self.manual, code).or_else(|| by_code(&self.generated, code));
            if let Some(track) = found {
                return Ok(track);
            }
        }

        if any_language {
            if let Some(track) = self.manual.first().or_else(|| self.generated.first()) {
                debug!(
                    video_id = %self.video_id,
                    language = %track.language_code,
                    "no preferred language available, falling back"
                );
                return Ok(track);
            }
        }

        Err(Error::NoTranscriptFound {
            video_id: self.video_id.clone(),
            requested: languages.to_vec(),
            available: self.tracks().map(|t| t.language_code.clone()).collect(),
        })
    }

    pub fn tracks(&self) -> impl Iterator<Item = &CaptionTrack> {
        self.manual.iter().chain(self.generated.iter())
    }

    pub fn infos(&self) -> Vec<TranscriptInfo> {
        self.tracks().map(CaptionTrack::info).collect()
    }
}

fn by_code<'a>(tracks: &'a [CaptionTrack], code: &str) -> Option<&'a CaptionTrack> {
    tracks.iter().find(|t| t.language_code == code)
}

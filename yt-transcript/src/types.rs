use serde::{Deserialize, Serialize};

/// A single caption cue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snippet {
    pub text: String,
    /// Start offset in seconds.
    pub start: f64,
    /// Duration in seconds.
    pub duration: f64,
}

impl Snippet {
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }
}

/// A fetched caption track, snippets in playback order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchedTranscript {
    pub video_id: String,
    pub snippets: Vec<Snippet>,
    /// Display name of the track (e.g. "English (auto-generated)").
    pub language: Option<String>,
    /// Language code of the track (e.g. "en").
    pub language_code: Option<String>,
    pub is_generated: bool,
}

impl FetchedTranscript {
    /// Full text: snippet texts joined with a single space, untouched otherwise.
    pub fn text(&self) -> String {
        self.snippets
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Number of whitespace-separated tokens in [`text`](Self::text).
    pub fn word_count(&self) -> usize {
        self.text().split_whitespace().count()
    }

    /// Length of [`text`](Self::text) in Unicode scalar values.
    pub fn character_count(&self) -> usize {
        self.text().chars().count()
    }

    /// One snippet per line.
    pub fn to_plain_text(&self) -> String {
        self.snippets
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Format as SRT subtitles.
    pub fn to_srt(&self) -> String {
        let mut out = String::new();
        for (i, snippet) in self.snippets.iter().enumerate() {
            out.push_str(&format!("{}\n", i + 1));
            out.push_str(&format!(
                "{} --> {}\n",
                format_srt_time(snippet.start),
                format_srt_time(self.cue_end(i))
            ));
            out.push_str(&snippet.text);
            out.push_str("\n\n");
        }
        out
    }

    /// Format as WebVTT subtitles.
    pub fn to_vtt(&self) -> String {
        let mut out = String::from("WEBVTT\n\n");
        for (i, snippet) in self.snippets.iter().enumerate() {
            out.push_str(&format!(
                "{} --> {}\n",
                format_vtt_time(snippet.start),
                format_vtt_time(self.cue_end(i))
            ));
            out.push_str(&snippet.text);
            out.push_str("\n\n");
        }
        out
    }

    /// Format as JSON.
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Format as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    // Overlapping cues end where the next one starts so players don't stack them.
    fn cue_end(&self, i: usize) -> f64 {
        let end = self.snippets[i].end();
        match self.snippets.get(i + 1) {
            Some(next) if next.start < end => next.start,
            _ => end,
        }
    }
}

/// Metadata for one caption track available on a video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptInfo {
    pub language: String,
    pub language_code: String,
    pub is_generated: bool,
    pub is_translatable: bool,
}

/// Format seconds as `MM:SS`, or `HH:MM:SS` from one hour on.
pub fn format_timestamp(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    let h = total / 3600;
    let m = (total % 3600) / 60;
    let s = total % 60;
    if h > 0 {
        format!("{h:02}:{m:02}:{s:02}")
    } else {
        format!("{m:02}:{s:02}")
    }
}

/// Format seconds as SRT timestamp: HH:MM:SS,mmm
fn format_srt_time(seconds: f64) -> String {
    let (h, m, s, ms) = split_millis(seconds);
    format!("{h:02}:{m:02}:{s:02},{ms:03}")
}

/// Format seconds as VTT timestamp: HH:MM:SS.mmm
fn format_vtt_time(seconds: f64) -> String {
    let (h, m, s, ms) = split_millis(seconds);
    format!("{h:02}:{m:02}:{s:02}.{ms:03}")
}

fn split_millis(seconds: f64) -> (u64, u64, u64, u64) {
    let total_ms = (seconds.max(0.0) * 1000.0).round() as u64;
    (
        total_ms / 3_600_000,
        (total_ms % 3_600_000) / 60_000,
        (total_ms % 60_000) / 1_000,
        total_ms % 1_000,
    )
}

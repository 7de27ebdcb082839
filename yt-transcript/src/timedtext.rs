use reqwest::{Client, Url};
use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::innertube::{check_status, WATCH_URL};
use crate::tracks::CaptionTrack;
use crate::types::Snippet;

/// Marker of track URLs that only serve content with a proof-of-origin token.
const PO_TOKEN_MARKER: &str = "&exp=xpe";

#[derive(Debug, Deserialize)]
struct TimedText {
    #[serde(default)]
    events: Vec<Event>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Event {
    #[serde(default)]
    t_start_ms: f64,
    d_duration_ms: Option<f64>,
    segs: Option<Vec<Seg>>,
    a_append: Option<u8>,
}

#[derive(Debug, Deserialize)]
struct Seg {
    #[serde(default)]
    utf8: String,
}

/// Download a caption track and decode it into snippets.
pub(crate) async fn fetch_snippets(
    http: &Client,
    video_id: &str,
    track: &CaptionTrack,
) -> Result<Vec<Snippet>> {
    if track.base_url.contains(PO_TOKEN_MARKER) {
        return Err(Error::PoTokenRequired {
            video_id: video_id.to_string(),
        });
    }

    let url = json3_url(&track.base_url, video_id)?;
    debug!(%video_id, language = %track.language_code, "downloading caption track");

    let response = http.get(url).send().await?;
    let body = check_status(response, video_id)?.text().await?;
    parse_json3(&body, video_id)
}

/// Rewrite a track URL to request the `json3` format.
pub(crate) fn json3_url(base_url: &str, video_id: &str) -> Result<Url> {
    let mut url = Url::parse(base_url)
        .or_else(|_| Url::parse(WATCH_URL).and_then(|origin| origin.join(base_url)))
        .map_err(|e| Error::DataUnparsable {
            video_id: video_id.to_string(),
            detail: format!("invalid caption track URL: {e}"),
        })?;

    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| k != "fmt")
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    url.query_pairs_mut()
        .clear()
        .extend_pairs(pairs)
        .append_pair("fmt", "json3");

    Ok(url)
}

/// Decode a `json3` caption body into snippets in playback order.
pub(crate) fn parse_json3(body: &str, video_id: &str) -> Result<Vec<Snippet>> {
    if body.trim().is_empty() {
        return Err(Error::DataUnparsable {
            video_id: video_id.to_string(),
            detail: "caption track body is empty".into(),
        });
    }

    let timed: TimedText = serde_json::from_str(body)?;
    let snippets = timed
        .events
        .into_iter()
        .filter_map(|event| {
            let text: String = event.segs?.into_iter().map(|s| s.utf8).collect();
            // Line-break events on generated tracks carry no cue of their own.
            if text.is_empty() || (event.a_append.is_some() && text.trim().is_empty()) {
                return None;
            }
            Some(Snippet {
                text,
                start: event.t_start_ms / 1000.0,
                duration: event.d_duration_ms.unwrap_or(0.0) / 1000.0,
            })
        })
        .collect();

    Ok(snippets)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_manual_track() {
        let body = r#"{"wireMagic":"pb3","events":[
            {"tStartMs":0,"dDurationMs":1200,"segs":[{"utf8":"Hello"}]},
            {"tStartMs":1200,"dDurationMs":1000,"segs":[{"utf8":"world"}]}
        ]}"#;
        let snippets = parse_json3(body, "abc123").unwrap();
        assert_eq!(
            snippets,
            vec![
                Snippet {
                    text: "Hello".into(),
                    start: 0.0,
                    duration: 1.2
                },
                Snippet {
                    text: "world".into(),
                    start: 1.2,
                    duration: 1.0
                },
            ]
        );
    }

    #[test]
    fn test_parse_generated_track_joins_runs_and_skips_line_breaks() {
        let body = r#"{"events":[
            {"tStartMs":0,"dDurationMs":5000,"id":1,"wpWinPosId":1,"wsWinStyleId":1},
            {"tStartMs":100,"dDurationMs":4000,"wWinId":1,"segs":[
                {"utf8":"so"},{"utf8":" today","tOffsetMs":400},{"utf8":" we","tOffsetMs":800}
            ]},
            {"tStartMs":2500,"dDurationMs":1600,"wWinId":1,"aAppend":1,"segs":[{"utf8":"\n"}]},
            {"tStartMs":2510,"dDurationMs":3000,"wWinId":1,"segs":[{"utf8":"talk"}]}
        ]}"#;
        let snippets = parse_json3(body, "abc123").unwrap();
        assert_eq!(snippets.len(), 2);
        assert_eq!(snippets[0].text, "so today we");
        assert_eq!(snippets[0].start, 0.1);
        assert_eq!(snippets[1].text, "talk");
        assert_eq!(snippets[1].start, 2.51);
    }

    #[test]
    fn test_parse_keeps_inner_newlines_and_entities_as_text() {
        let body = r#"{"events":[{"tStartMs":0,"dDurationMs":1000,"segs":[{"utf8":"Tom & Jerry\n[Music]"}]}]}"#;
        let snippets = parse_json3(body, "abc123").unwrap();
        assert_eq!(snippets[0].text, "Tom & Jerry\n[Music]");
    }

    #[test]
    fn test_parse_missing_duration_defaults_to_zero() {
        let body = r#"{"events":[{"tStartMs":3000,"segs":[{"utf8":"hi"}]}]}"#;
        let snippets = parse_json3(body, "abc123").unwrap();
        assert_eq!(snippets[0].duration, 0.0);
        assert_eq!(snippets[0].start, 3.0);
    }

    #[test]
    fn test_parse_no_events() {
        assert!(parse_json3(r#"{"wireMagic":"pb3"}"#, "abc123")
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_parse_empty_body() {
        let err = parse_json3("  ", "abc123").unwrap_err();
        assert!(matches!(err, Error::DataUnparsable { .. }));
    }

    #[test]
    fn test_parse_malformed_body() {
        let err = parse_json3("<transcript>", "abc123").unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn test_json3_url_replaces_format() {
        let url = json3_url(
            "https://www.youtube.com/api/timedtext?v=abc123&lang=en&fmt=srv3",
            "abc123",
        )
        .unwrap();
        assert_eq!(
            url.as_str(),
            "https://www.youtube.com/api/timedtext?v=abc123&lang=en&fmt=json3"
        );
    }

    #[test]
    fn test_json3_url_resolves_relative_path() {
        let url = json3_url("/api/timedtext?v=abc123&lang=en", "abc123").unwrap();
        assert_eq!(
            url.as_str(),
            "https://www.youtube.com/api/timedtext?v=abc123&lang=en&fmt=json3"
        );
    }

    #[tokio::test]
    async fn test_po_token_tracks_are_rejected_before_any_request() {
        let track: CaptionTrack = serde_json::from_str(
            r#"{"baseUrl":"https://www.youtube.com/api/timedtext?v=abc123&exp=xpe&lang=en","languageCode":"en"}"#,
        )
        .unwrap();
        let err = fetch_snippets(&Client::new(), "abc123", &track)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::PoTokenRequired { .. }));
    }
}

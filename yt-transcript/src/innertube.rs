use lazy_static::lazy_static;
use regex::Regex;
use reqwest::header::COOKIE;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::tracks::CaptionTracklist;

pub(crate) const WATCH_URL: &str = "https://www.youtube.com/watch";
const PLAYER_URL: &str = "https://www.youtube.com/youtubei/v1/player";

const CLIENT_NAME: &str = "ANDROID";
const CLIENT_VERSION: &str = "20.10.38";

const CONSENT_FORM_ACTION: &str = "action=\"https://consent.youtube.com/s\"";
const RECAPTCHA_MARKER: &str = "class=\"g-recaptcha\"";

lazy_static! {
    static ref API_KEY: Regex =
        Regex::new(r#""INNERTUBE_API_KEY":\s*"(?<key>[a-zA-Z0-9_-]+)""#).expect("valid regex");
    static ref CONSENT_VALUE: Regex =
        Regex::new(r#"name="v" value="(?<value>[^"]+)""#).expect("valid regex");
}

const REASON_BOT_CHECK: &str = "Sign in to confirm you";
const REASON_AGE_RESTRICTED: &str = "This video may be inappropriate for some users.";
const REASON_UNAVAILABLE: &str = "This video is unavailable";

/// Subset of the innertube `player` response we care about.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PlayerResponse {
    pub playability_status: Option<PlayabilityStatus>,
    pub captions: Option<Captions>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PlayabilityStatus {
    pub status: Option<String>,
    pub reason: Option<String>,
    pub error_screen: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Captions {
    #[serde(rename = "playerCaptionsTracklistRenderer")]
    pub tracklist: Option<CaptionTracklist>,
}

/// Fetch the player response for a video and make sure it is playable.
///
/// Goes through the watch page first to pick up the innertube API key
/// (accepting the cookie consent interstitial if YouTube serves one).
pub(crate) async fn fetch_player_response(http: &Client, video_id: &str) -> Result<PlayerResponse> {
    info!(%video_id, "fetching video page");

    let html = fetch_video_html(http, video_id).await?;
    let api_key = extract_api_key(&html, video_id)?;

    debug!(%video_id, "requesting innertube player data");
    let body = json!({
        "context": {
            "client": {
                "clientName": CLIENT_NAME,
                "clientVersion": CLIENT_VERSION,
            }
        },
        "videoId": video_id,
    });
    let response = http
        .post(PLAYER_URL)
        .query(&[("key", api_key.as_str())])
        .json(&body)
        .send()
        .await?;
    let text = check_status(response, video_id)?.text().await?;
    let player: PlayerResponse = serde_json::from_str(&text)?;

    check_playability(&player, video_id)?;
    Ok(player)
}

async fn fetch_video_html(http: &Client, video_id: &str) -> Result<String> {
    let html = get_watch_page(http, video_id, None).await?;
    if !is_consent_page(&html) {
        return Ok(html);
    }

    debug!(%video_id, "accepting cookie consent");
    let cookie = consent_cookie(&html, video_id)?;
    let html = get_watch_page(http, video_id, Some(&cookie)).await?;
    ensure_past_consent(&html, video_id)?;
    Ok(html)
}

fn is_consent_page(html: &str) -> bool {
    html.contains(CONSENT_FORM_ACTION)
}

/// Build the `CONSENT` cookie that accepts the interstitial served in `html`.
fn consent_cookie(html: &str, video_id: &str) -> Result<String> {
    CONSENT_VALUE
        .captures(html)
        .and_then(|caps| caps.name("value"))
        .map(|value| format!("CONSENT=YES+{}", value.as_str()))
        .ok_or_else(|| Error::ConsentCookie {
            video_id: video_id.to_string(),
        })
}

/// The page fetched with the consent cookie must not be the interstitial again.
fn ensure_past_consent(html: &str, video_id: &str) -> Result<()> {
    if is_consent_page(html) {
        return Err(Error::ConsentCookie {
            video_id: video_id.to_string(),
        });
    }
    Ok(())
}

async fn get_watch_page(http: &Client, video_id: &str, cookie: Option<&str>) -> Result<String> {
    let mut request = http.get(WATCH_URL).query(&[("v", video_id)]);
    if let Some(cookie) = cookie {
        request = request.header(COOKIE, cookie);
    }
    let response = request.send().await?;
    Ok(check_status(response, video_id)?.text().await?)
}

/// Map HTTP failures onto the error taxonomy.
pub(crate) fn check_status(response: Response, video_id: &str) -> Result<Response> {
    let status = response.status();
    if status == StatusCode::TOO_MANY_REQUESTS {
        warn!(%video_id, "rate limited by YouTube");
        return Err(Error::IpBlocked {
            video_id: video_id.to_string(),
        });
    }
    if !status.is_success() {
        return Err(Error::RequestFailed {
            video_id: video_id.to_string(),
            status: status.as_u16(),
        });
    }
    Ok(response)
}

/// Pull `"INNERTUBE_API_KEY": "<key>"` out of the watch page.
pub(crate) fn extract_api_key(html: &str, video_id: &str) -> Result<String> {
    if let Some(key) = API_KEY.captures(html).and_then(|caps| caps.name("key")) {
        return Ok(key.as_str().to_string());
    }
    if html.contains(RECAPTCHA_MARKER) {
        return Err(Error::IpBlocked {
            video_id: video_id.to_string(),
        });
    }
    Err(Error::DataUnparsable {
        video_id: video_id.to_string(),
        detail: "innertube API key not found in video page".into(),
    })
}

pub(crate) fn check_playability(player: &PlayerResponse, video_id: &str) -> Result<()> {
    let Some(playability) = &player.playability_status else {
        return Ok(());
    };
    let status = match playability.status.as_deref() {
        None | Some("OK") => return Ok(()),
        Some(status) => status,
    };
    let reason = playability.reason.as_deref();

    if status == "LOGIN_REQUIRED" {
        if reason.is_some_and(|r| r.starts_with(REASON_BOT_CHECK)) {
            return Err(Error::RequestBlocked {
                video_id: video_id.to_string(),
            });
        }
        if reason == Some(REASON_AGE_RESTRICTED) {
            return Err(Error::AgeRestricted {
                video_id: video_id.to_string(),
            });
        }
    }

    if status == "ERROR" && reason == Some(REASON_UNAVAILABLE) {
        if video_id.starts_with("http://") || video_id.starts_with("https://") {
            return Err(Error::InvalidVideoId {
                video_id: video_id.to_string(),
            });
        }
        return Err(Error::VideoUnavailable {
            video_id: video_id.to_string(),
        });
    }

    Err(Error::VideoUnplayable {
        video_id: video_id.to_string(),
        reason: playability.reason.clone(),
        sub_reasons: sub_reasons(playability.error_screen.as_ref()),
    })
}

fn sub_reasons(error_screen: Option<&Value>) -> Vec<String> {
    error_screen
        .and_then(|screen| screen.pointer("/playerErrorMessageRenderer/subreason/runs"))
        .and_then(Value::as_array)
        .map(|runs| {
            runs.iter()
                .filter_map(|run| run.get("text").and_then(Value::as_str))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(json: &str) -> PlayerResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_extract_api_key() {
        let html = r#"<script>ytcfg.set({"INNERTUBE_API_KEY": "AIzaSy_abc-123","OTHER":1})</script>"#;
        assert_eq!(extract_api_key(html, "abc123").unwrap(), "AIzaSy_abc-123");
    }

    #[test]
    fn test_extract_api_key_without_space() {
        let html = r#"{"INNERTUBE_API_KEY":"KEY42"}"#;
        assert_eq!(extract_api_key(html, "abc123").unwrap(), "KEY42");
    }

    #[test]
    fn test_extract_api_key_missing() {
        let err = extract_api_key("<html></html>", "abc123").unwrap_err();
        assert!(matches!(err, Error::DataUnparsable { .. }));
    }

    #[test]
    fn test_extract_api_key_recaptcha_means_blocked() {
        let html = r#"<div class="g-recaptcha" data-sitekey="x"></div>"#;
        let err = extract_api_key(html, "abc123").unwrap_err();
        assert!(matches!(err, Error::IpBlocked { .. }));
    }

    #[test]
    fn test_extract_api_key_rejects_bad_characters() {
        let html = r#"{"INNERTUBE_API_KEY":"bad key"}"#;
        assert!(extract_api_key(html, "abc123").is_err());
    }

    const CONSENT_PAGE: &str = r#"<form action="https://consent.youtube.com/s"><input type="hidden" name="v" value="cb.20210328-17-p0"></form>"#;

    fn response(status: u16) -> Response {
        Response::from(
            http::Response::builder()
                .status(status)
                .body("")
                .unwrap(),
        )
    }

    #[test]
    fn test_consent_cookie() {
        assert!(is_consent_page(CONSENT_PAGE));
        assert_eq!(
            consent_cookie(CONSENT_PAGE, "abc123").unwrap(),
            "CONSENT=YES+cb.20210328-17-p0"
        );
    }

    #[test]
    fn test_consent_cookie_missing_value() {
        let html = r#"<form action="https://consent.youtube.com/s"></form>"#;
        let err = consent_cookie(html, "abc123").unwrap_err();
        assert!(matches!(err, Error::ConsentCookie { .. }));
        assert_eq!(err.kind().as_str(), "FailedToCreateConsentCookie");
    }

    #[test]
    fn test_second_consent_page_fails() {
        let err = ensure_past_consent(CONSENT_PAGE, "abc123").unwrap_err();
        assert!(matches!(err, Error::ConsentCookie { .. }));
        assert_eq!(err.kind().as_str(), "FailedToCreateConsentCookie");
    }

    #[test]
    fn test_regular_page_passes_consent_check() {
        assert!(!is_consent_page(r#"{"INNERTUBE_API_KEY":"KEY42"}"#));
        assert!(ensure_past_consent(r#"{"INNERTUBE_API_KEY":"KEY42"}"#, "abc123").is_ok());
    }

    #[test]
    fn test_check_status_too_many_requests_is_ip_blocked() {
        let err = check_status(response(429), "abc123").unwrap_err();
        assert!(matches!(err, Error::IpBlocked { .. }));
        assert_eq!(err.kind().as_str(), "IpBlocked");
    }

    #[test]
    fn test_check_status_other_failures_keep_status() {
        for code in [403, 404, 500, 503] {
            match check_status(response(code), "abc123").unwrap_err() {
                Error::RequestFailed { status, video_id } => {
                    assert_eq!(status, code);
                    assert_eq!(video_id, "abc123");
                }
                other => panic!("unexpected error: {other:?}"),
            }
        }
    }

    #[test]
    fn test_check_status_success_passes_through() {
        let ok = check_status(response(200), "abc123").unwrap();
        assert_eq!(ok.status(), StatusCode::OK);
        assert!(check_status(response(204), "abc123").is_ok());
    }

    #[test]
    fn test_playability_ok() {
        let p = player(r#"{"playabilityStatus":{"status":"OK"}}"#);
        assert!(check_playability(&p, "abc123").is_ok());
    }

    #[test]
    fn test_playability_missing_status_passes() {
        assert!(check_playability(&player("{}"), "abc123").is_ok());
        let p = player(r#"{"playabilityStatus":{}}"#);
        assert!(check_playability(&p, "abc123").is_ok());
    }

    #[test]
    fn test_playability_bot_check() {
        let p = player(
            r#"{"playabilityStatus":{"status":"LOGIN_REQUIRED","reason":"Sign in to confirm you’re not a bot"}}"#,
        );
        let err = check_playability(&p, "abc123").unwrap_err();
        assert!(matches!(err, Error::RequestBlocked { .. }));
    }

    #[test]
    fn test_playability_age_restricted() {
        let p = player(
            r#"{"playabilityStatus":{"status":"LOGIN_REQUIRED","reason":"This video may be inappropriate for some users."}}"#,
        );
        let err = check_playability(&p, "abc123").unwrap_err();
        assert!(matches!(err, Error::AgeRestricted { .. }));
    }

    #[test]
    fn test_playability_unavailable() {
        let p = player(r#"{"playabilityStatus":{"status":"ERROR","reason":"This video is unavailable"}}"#);
        let err = check_playability(&p, "abc123").unwrap_err();
        assert!(matches!(err, Error::VideoUnavailable { .. }));
    }

    #[test]
    fn test_playability_url_instead_of_id() {
        let p = player(r#"{"playabilityStatus":{"status":"ERROR","reason":"This video is unavailable"}}"#);
        let err = check_playability(&p, "https://www.youtube.com/watch?v=abc123").unwrap_err();
        assert!(matches!(err, Error::InvalidVideoId { .. }));
    }

    #[test]
    fn test_playability_unplayable_collects_sub_reasons() {
        let p = player(
            r#"{"playabilityStatus":{
                "status":"UNPLAYABLE",
                "reason":"Video unavailable",
                "errorScreen":{"playerErrorMessageRenderer":{"subreason":{"runs":[
                    {"text":"The uploader has not made this video available in your country"}
                ]}}}
            }}"#,
        );
        match check_playability(&p, "abc123").unwrap_err() {
            Error::VideoUnplayable {
                reason,
                sub_reasons,
                ..
            } => {
                assert_eq!(reason.as_deref(), Some("Video unavailable"));
                assert_eq!(sub_reasons.len(), 1);
                assert!(sub_reasons[0].contains("your country"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_player_response_ignores_unknown_fields() {
        let p = player(r#"{"videoDetails":{"title":"x"},"playabilityStatus":{"status":"OK","miniplayer":{}}}"#);
        assert!(p.captions.is_none());
        assert_eq!(
            p.playability_status.and_then(|s| s.status).as_deref(),
            Some("OK")
        );
    }
}

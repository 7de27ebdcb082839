use std::time::Duration;

use crate::error::{Error, Result};

/// Browser-like user agent sent with every request.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// Builder for fetch options.
///
/// The defaults are what the `fetch-transcript` CLI uses: English captions
/// only, no request timeout.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Language codes in order of preference.
    pub languages: Vec<String>,
    /// Fall back to the first available track when no preferred language matches.
    pub any_language: bool,
    pub user_agent: String,
    pub accept_language: String,
    /// Proxy URL applied to all requests (e.g. "http://127.0.0.1:8080").
    pub proxy: Option<String>,
    pub timeout: Option<Duration>,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            languages: vec!["en".into()],
            any_language: false,
            user_agent: DEFAULT_USER_AGENT.into(),
            accept_language: "en-US".into(),
            proxy: None,
            timeout: None,
        }
    }
}

impl FetchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the language preference list. Must not be empty.
    pub fn languages<I, S>(mut self, languages: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let languages: Vec<String> = languages
            .into_iter()
            .map(Into::into)
            .map(|code: String| code.trim().to_string())
            .filter(|code| !code.is_empty())
            .collect();
        if languages.is_empty() {
            return Err(Error::InvalidOption(
                "at least one language code is required".into(),
            ));
        }
        self.languages = languages;
        Ok(self)
    }

    pub fn any_language(mut self, enabled: bool) -> Self {
        self.any_language = enabled;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn accept_language(mut self, accept_language: impl Into<String>) -> Self {
        self.accept_language = accept_language.into();
        self
    }

    pub fn proxy(mut self, url: impl Into<String>) -> Self {
        self.proxy = Some(url.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

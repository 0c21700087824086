use std::time::Duration;

use crate::errors::GameApiError;

/// Fetches a fully built request URL and returns the raw response body.
///
/// The client never builds HTTP requests itself, any fetcher works: the
/// bundled [`ReqwestTransport`], or a closure
/// `Fn(&str) -> Result<Vec<u8>, GameApiError>`.
pub trait Transport {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, GameApiError>;
}

impl<F> Transport for F
where
    F: Fn(&str) -> Result<Vec<u8>, GameApiError>,
{
    fn fetch(&self, url: &str) -> Result<Vec<u8>, GameApiError> {
        self(url)
    }
}

/// Blocking HTTP transport backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::blocking::Client,
}

impl ReqwestTransport {
    pub fn new(connect_timeout: Duration) -> Result<Self, GameApiError> {
        let client = reqwest::blocking::Client::builder()
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|err| GameApiError::Transport(err.to_string()))?;

        Ok(Self { client })
    }
}

impl Transport for ReqwestTransport {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, GameApiError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|err| GameApiError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("Game API answered {} for {}", status, redact(url));
            return Err(GameApiError::Transport(format!("HTTP {}", status.as_u16())));
        }

        response
            .bytes()
            .map(|bytes| bytes.to_vec())
            .map_err(|err| GameApiError::Transport(err.to_string()))
    }
}

/// Hides the user token (always the last parameter) from log output.
pub(crate) fn redact(url: &str) -> String {
    match url.rfind("&user_token=") {
        Some(index) => format!("{}&user_token=***", &url[..index]),
        None => url.to_string(),
    }
}

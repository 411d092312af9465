use std::time::Duration;

use crate::error::ScrapeError;

/// Site root used when no override is configured.
pub const DEFAULT_BASE_URL: &str = "https://letterboxd.com";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/143.0.0.0 Safari/537.36";

/// Source of raw page markup.
///
/// [`HttpFetcher`] is the real implementation; tests substitute an in-memory
/// page map so they can count requests without touching the network.
#[allow(async_fn_in_trait)]
pub trait PageFetcher {
    /// Fetch one page and return its body.
    async fn fetch(&self, url: &str) -> Result<String, ScrapeError>;
}

/// HTTP page fetcher backed by a shared `reqwest` client.
pub struct HttpFetcher {
    http: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self, ScrapeError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { http })
    }
}

impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, ScrapeError> {
        log::debug!("GET {}", url);

        let resp = self.http.get(url).send().await?;

        if let Some(err) = status_error(resp.status(), url) {
            return Err(err);
        }

        Ok(resp.text().await?)
    }
}

/// Map a non-success HTTP status to the matching error.
pub(crate) fn status_error(status: reqwest::StatusCode, url: &str) -> Option<ScrapeError> {
    if status == reqwest::StatusCode::NOT_FOUND {
        return Some(ScrapeError::NotFound {
            url: url.to_string(),
        });
    }
    if !status.is_success() {
        return Some(ScrapeError::ServerError {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }
    None
}

/// Fetch a page, logging any failure and returning an empty body instead.
///
/// An empty result means "site unreachable or page missing"; callers that
/// need to tell those apart should call [`PageFetcher::fetch`] directly.
pub async fn fetch_or_empty<F: PageFetcher>(fetcher: &F, url: &str) -> String {
    match fetcher.fetch(url).await {
        Ok(body) => body,
        Err(e) => {
            log::warn!("Failed to fetch {}: {}", url, e);
            String::new()
        }
    }
}

#[cfg(test)]
#[path = "tests/fetch_tests.rs"]
mod tests;

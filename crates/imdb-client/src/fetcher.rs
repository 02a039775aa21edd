//! Fetching detail pages.
//!
//! `DocumentFetcher` is the seam between resolution logic and the network:
//! `HttpFetcher` performs real blocking requests, `StaticFetcher` serves
//! pages held in memory (offline runs and tests).

use crate::error::FetchError;
use scraper::Html;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

/// Given a URL, return a parsed document or fail.
///
/// `Send + Sync` lets one fetcher be shared by every worker of the resolver.
pub trait DocumentFetcher: Send + Sync {
    fn fetch(&self, url: &str) -> Result<Html, FetchError>;
}

/// Blocking HTTP fetcher backed by a shared `ureq::Agent`
pub struct HttpFetcher {
    agent: ureq::Agent,
}

impl HttpFetcher {
    /// Create a fetcher with the given connect and read timeouts.
    pub fn new(connect_timeout: Duration, read_timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(connect_timeout)
            .timeout_read(read_timeout)
            .user_agent(concat!("movielens-report/", env!("CARGO_PKG_VERSION")))
            .build();
        Self { agent }
    }
}

impl DocumentFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Html, FetchError> {
        debug!("GET {}", url);
        let response = self
            .agent
            .get(url)
            .set("Accept-Language", "en-US,en;q=0.8")
            .call()
            .map_err(|err| match err {
                ureq::Error::Status(code, _) => FetchError::Status {
                    url: url.to_string(),
                    code,
                },
                ureq::Error::Transport(transport) => FetchError::Transport {
                    url: url.to_string(),
                    message: transport.to_string(),
                },
            })?;

        let body = response.into_string().map_err(|err| FetchError::Body {
            url: url.to_string(),
            message: err.to_string(),
        })?;

        Ok(Html::parse_document(&body))
    }
}

/// Serves pre-loaded HTML by exact URL; unknown URLs answer HTTP 404.
#[derive(Debug, Clone, Default)]
pub struct StaticFetcher {
    pages: HashMap<String, String>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a page (builder pattern)
    pub fn with_page(mut self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.pages.insert(url.into(), html.into());
        self
    }
}

impl DocumentFetcher for StaticFetcher {
    fn fetch(&self, url: &str) -> Result<Html, FetchError> {
        self.pages
            .get(url)
            .map(|body| Html::parse_document(body))
            .ok_or_else(|| FetchError::Status {
                url: url.to_string(),
                code: 404,
            })
    }
}

//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with proper user agent strings and timeouts
//! - GET requests that follow redirects and report the final URL
//! - Content-Type classification (HTML, plain text, or skipped)
//! - Bounded retry with exponential backoff for network-level failures

use crate::config::{CrawlerConfig, UserAgentConfig};
use crate::crawler::parser::extract_links;
use reqwest::{header::CONTENT_TYPE, redirect::Policy, Client};
use std::fmt;
use std::time::Duration;

/// Kind of document the crawler keeps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Html,
    PlainText,
}

/// Why a response was skipped without being stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Non-2xx status after redirects
    HttpStatus(u16),
    /// No Content-Type header, or one that is not valid text
    MissingContentType,
    /// Content-Type is neither HTML nor plain text
    UnsupportedContentType(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HttpStatus(code) => write!(f, "HTTP status {}", code),
            Self::MissingContentType => write!(f, "no Content-Type header"),
            Self::UnsupportedContentType(ct) => write!(f, "unsupported Content-Type {}", ct),
        }
    }
}

/// A page the fetcher accepted
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects; may differ from the requested URL
    pub final_url: String,
    /// Raw response body
    pub body: String,
    /// Absolute URLs of every anchor on the page (empty for plain text)
    pub links: Vec<String>,
    /// Whether the body is HTML or plain text
    pub kind: ContentKind,
}

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// Successfully fetched an HTML or plain text page
    Fetched(FetchedPage),

    /// The response was received but is not something we index
    Skipped { reason: SkipReason },

    /// Network error that persisted through every retry
    Failed { error: String, attempts: u32 },
}

impl FetchResult {
    /// Returns the fetched page, or None for skipped and failed fetches
    pub fn into_page(self) -> Option<FetchedPage> {
        match self {
            Self::Fetched(page) => Some(page),
            _ => None,
        }
    }
}

/// Classifies a Content-Type header value
///
/// Matching is a case-insensitive substring test, so parameters such as
/// `; charset=utf-8` are allowed.
pub fn classify_content_type(header: Option<&str>) -> Result<ContentKind, SkipReason> {
    let Some(value) = header else {
        return Err(SkipReason::MissingContentType);
    };

    let content_type = value.to_lowercase();
    if content_type.contains("text/html") {
        Ok(ContentKind::Html)
    } else if content_type.contains("text/plain") {
        Ok(ContentKind::PlainText)
    } else {
        Err(SkipReason::UnsupportedContentType(content_type))
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `crawler` - Timeouts and redirect limit
/// * `user_agent` - The user agent configuration
///
/// # Example
///
/// ```no_run
/// use site_search::config::{CrawlerConfig, UserAgentConfig};
/// use site_search::crawler::build_http_client;
///
/// let client = build_http_client(&CrawlerConfig::default(), &UserAgentConfig::default()).unwrap();
/// ```
pub fn build_http_client(
    crawler: &CrawlerConfig,
    user_agent: &UserAgentConfig,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.header_value())
        .timeout(Duration::from_secs(crawler.request_timeout_secs))
        .connect_timeout(Duration::from_secs(crawler.connect_timeout_secs))
        .redirect(Policy::limited(crawler.max_redirects))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Performs one retrieval per call, retrying only network-level failures
pub struct Fetcher {
    client: Client,
    max_retries: u32,
    retry_backoff: Duration,
}

impl Fetcher {
    /// Creates a fetcher from configuration
    pub fn new(crawler: &CrawlerConfig, user_agent: &UserAgentConfig) -> Result<Self, reqwest::Error> {
        let client = build_http_client(crawler, user_agent)?;
        Ok(Self::with_client(
            client,
            crawler.max_retries,
            Duration::from_millis(crawler.retry_backoff_ms),
        ))
    }

    /// Creates a fetcher around an existing client
    pub fn with_client(client: Client, max_retries: u32, retry_backoff: Duration) -> Self {
        Self {
            client,
            max_retries,
            retry_backoff,
        }
    }

    /// Fetches a URL
    ///
    /// # Retry Logic
    ///
    /// | Condition | Action |
    /// |-----------|--------|
    /// | Non-2xx status | Skipped, no retry |
    /// | Missing/unsupported Content-Type | Skipped, no retry |
    /// | Connect error, timeout, body error | Retry up to `max_retries`, backoff doubling |
    /// | Too many redirects | Failed, no retry |
    ///
    /// # Returns
    ///
    /// A FetchResult; nothing here is fatal to the crawl
    pub async fn fetch(&self, url: &str) -> FetchResult {
        let mut attempt: u32 = 0;

        loop {
            match self.try_fetch(url).await {
                Ok(result) => return result,
                Err(e) if attempt < self.max_retries && is_retryable(&e) => {
                    let delay = self.retry_backoff * 2u32.saturating_pow(attempt);
                    tracing::warn!(
                        url = %url,
                        attempt = attempt + 1,
                        delay_ms = delay.as_millis() as u64,
                        "Request failed, retrying: {}",
                        e
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    return FetchResult::Failed {
                        error: e.to_string(),
                        attempts: attempt + 1,
                    }
                }
            }
        }
    }

    /// One request/response cycle
    async fn try_fetch(&self, url: &str) -> Result<FetchResult, reqwest::Error> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        let final_url = response.url().clone();

        tracing::debug!(url = %url, status = status.as_u16(), final_url = %final_url, "Response received");

        if !status.is_success() {
            return Ok(FetchResult::Skipped {
                reason: SkipReason::HttpStatus(status.as_u16()),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let kind = match classify_content_type(content_type.as_deref()) {
            Ok(kind) => kind,
            Err(reason) => return Ok(FetchResult::Skipped { reason }),
        };

        let body = response.text().await?;

        let links = match kind {
            ContentKind::Html => extract_links(&body, &final_url),
            ContentKind::PlainText => Vec::new(),
        };

        tracing::debug!(url = %final_url, links = links.len(), "Found links");

        Ok(FetchResult::Fetched(FetchedPage {
            final_url: final_url.to_string(),
            body,
            links,
            kind,
        }))
    }
}

/// Network-level failures worth another attempt
fn is_retryable(e: &reqwest::Error) -> bool {
    !e.is_redirect() && (e.is_timeout() || e.is_connect() || e.is_request() || e.is_body())
}

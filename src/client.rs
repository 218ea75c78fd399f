use std::time::Instant;

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::content::Page;

const PAGES_PATH: &str = "/api/pages";

/// Failures surfaced by a page fetch. Block-level malformation never shows up
/// here; it is absorbed inside the content model.
#[derive(Debug, Error)]
pub enum PageError {
    /// The backend answered, but no page matches the slug/locale pair.
    #[error("no page matched the requested slug and locale")]
    NotFound,

    /// Network-level failure before a usable response arrived.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx response. The message prefers the backend-provided error text.
    #[error("{message}")]
    Status { status: u16, message: String },

    /// 2xx response whose body did not match the expected envelope.
    #[error("could not decode backend response: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    data: Option<Vec<Page>>,
    #[serde(default)]
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    message: Option<String>,
}

/// HTTP client against the content backend.
pub struct ContentClient {
    http: reqwest::Client,
    base_url: String,
}

impl ContentClient {
    /// `base_url` is the backend origin, e.g. `https://cms.example.se`.
    /// A trailing slash is stripped so path concatenation stays predictable.
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch one page by slug and locale. Blocks are populated deep (so media
    /// files arrive inline), seo shallowly (only the scalar meta fields).
    pub async fn fetch_page(&self, slug: &str, locale: &str) -> Result<Page, PageError> {
        let url = format!("{}{}", self.base_url, PAGES_PATH);
        let start = Instant::now();

        let response = self
            .http
            .get(&url)
            .query(&[
                ("populate[blocks][populate]", "*"),
                ("populate[seo][fields][0]", "metaTitle"),
                ("populate[seo][fields][1]", "metaDescription"),
                ("filters[slug][$eq]", slug),
                ("locale", locale),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        debug!(
            slug,
            locale,
            status = status.as_u16(),
            latency_ms = start.elapsed().as_millis() as u64,
            "page fetch completed"
        );

        let envelope: Envelope = match serde_json::from_str(&body) {
            Ok(envelope) => envelope,
            Err(err) if status.is_success() => return Err(PageError::Decode(err)),
            // Non-JSON error body: fall through to the status message below.
            Err(_) => Envelope { data: None, error: None },
        };

        if !status.is_success() {
            let message = envelope
                .error
                .and_then(|e| e.message)
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| format!("Request failed with status {}", status.as_u16()));
            return Err(PageError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let page = envelope
            .data
            .unwrap_or_default()
            .into_iter()
            .next()
            .ok_or(PageError::NotFound)?;

        info!(slug, locale, blocks = page.blocks().len(), "page fetched");
        Ok(page)
    }
}

// ── Tests ──

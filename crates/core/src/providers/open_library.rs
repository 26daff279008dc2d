//! Open Library search API client.
//!
//! No API key required. Covers are served from covers.openlibrary.org
//! keyed by the `cover_i` field of a search doc.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::OpenLibraryConfig;
use crate::metrics;

use super::types::{primary_author, primary_genre, ExternalBook};
use super::{BookProvider, ProviderError};

const PROVIDER_NAME: &str = "open_library";

/// Subjects lists can run to hundreds of entries; keep the first few.
const MAX_SUBJECTS: usize = 3;

/// Open Library search API client.
pub struct OpenLibraryClient {
    client: Client,
    base_url: String,
}

impl OpenLibraryClient {
    /// Create a new Open Library client.
    pub fn new(config: OpenLibraryConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()?;

        let base_url = config
            .base_url
            .unwrap_or_else(|| "https://openlibrary.org".to_string());

        Ok(Self { client, base_url })
    }

    async fn try_search(
        &self,
        query: &str,
        max_results: u32,
    ) -> Result<Vec<ExternalBook>, ProviderError> {
        let url = format!("{}/search.json", self.base_url);

        debug!("Open Library search: query='{}', max={}", query, max_results);

        let limit = max_results.to_string();
        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", query),
                ("limit", limit.as_str()),
                (
                    "fields",
                    "key,title,author_name,first_publish_year,subject,isbn,cover_i",
                ),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        let payload: SearchResponse = response.json().await.map_err(|e| {
            ProviderError::ParseError(format!("Failed to parse search response: {}", e))
        })?;

        let books = payload
            .docs
            .into_iter()
            .filter_map(|doc| {
                let book = doc.normalize();
                if book.is_none() {
                    warn!("Dropping Open Library record without a title");
                }
                book
            })
            .collect();

        Ok(books)
    }
}

#[async_trait]
impl BookProvider for OpenLibraryClient {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn search(&self, query: &str, max_results: u32) -> Vec<ExternalBook> {
        metrics::PROVIDER_REQUESTS
            .with_label_values(&[PROVIDER_NAME])
            .inc();

        match self.try_search(query, max_results).await {
            Ok(books) => books,
            Err(e) => {
                metrics::PROVIDER_ERRORS
                    .with_label_values(&[PROVIDER_NAME])
                    .inc();
                warn!(provider = PROVIDER_NAME, error = %e, "Provider search failed");
                Vec::new()
            }
        }
    }
}

// ============================================================================
// Open Library API Response Types (private)
// ============================================================================

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    docs: Vec<SearchDoc>,
}

#[derive(Debug, Default, Deserialize)]
struct SearchDoc {
    key: Option<String>,
    title: Option<String>,
    #[serde(default)]
    author_name: Vec<String>,
    first_publish_year: Option<i32>,
    #[serde(default)]
    subject: Vec<String>,
    #[serde(default)]
    isbn: Vec<String>,
    cover_i: Option<i64>,
}

impl SearchDoc {
    /// Normalize into the common record shape; None when the record has
    /// no usable title.
    fn normalize(self) -> Option<ExternalBook> {
        let title = self.title.filter(|t| !t.trim().is_empty())?;

        let categories: Vec<String> = self.subject.into_iter().take(MAX_SUBJECTS).collect();
        let cover_image_url = self
            .cover_i
            .map(|id| format!("https://covers.openlibrary.org/b/id/{}-M.jpg", id));
        let open_library_id = self
            .key
            .map(|key| key.replace("/works/", ""))
            .filter(|id| !id.is_empty());

        Some(ExternalBook {
            author: primary_author(&self.author_name),
            authors: self.author_name,
            description: String::new(),
            year: self.first_publish_year,
            genre: primary_genre(&categories),
            categories,
            page_count: None,
            average_rating: None,
            ratings_count: None,
            cover_image_url,
            isbn: self.isbn.into_iter().next(),
            google_books_id: None,
            open_library_id,
            source: PROVIDER_NAME.to_string(),
            title,
        })
    }
}

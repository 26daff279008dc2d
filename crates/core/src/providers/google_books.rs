//! Google Books API client.
//!
//! Works without an API key at reduced quota; a key from the config is
//! attached when present.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::GoogleBooksConfig;
use crate::metrics;

use super::types::{parse_year, primary_author, primary_genre, ExternalBook};
use super::{BookProvider, ProviderError};

const PROVIDER_NAME: &str = "google_books";

/// Google Books caps maxResults at 40.
const MAX_PAGE_SIZE: u32 = 40;

/// Google Books API client.
pub struct GoogleBooksClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl GoogleBooksClient {
    /// Create a new Google Books client.
    pub fn new(config: GoogleBooksConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()?;

        let base_url = config
            .base_url
            .unwrap_or_else(|| "https://www.googleapis.com/books/v1".to_string());

        Ok(Self {
            client,
            base_url,
            api_key: config.api_key.filter(|k| !k.is_empty()),
        })
    }

    async fn try_search(
        &self,
        query: &str,
        max_results: u32,
    ) -> Result<Vec<ExternalBook>, ProviderError> {
        let url = format!("{}/volumes", self.base_url);

        debug!("Google Books search: query='{}', max={}", query, max_results);

        let page_size = max_results.min(MAX_PAGE_SIZE).to_string();
        let mut request = self.client.get(&url).query(&[
            ("q", query),
            ("maxResults", page_size.as_str()),
            ("printType", "books"),
            ("orderBy", "relevance"),
        ]);

        if let Some(ref key) = self.api_key {
            request = request.query(&[("key", key.as_str())]);
        }

        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        let payload: VolumesResponse = response.json().await.map_err(|e| {
            ProviderError::ParseError(format!("Failed to parse volumes response: {}", e))
        })?;

        let books = payload
            .items
            .into_iter()
            .filter_map(|volume| {
                let book = volume.normalize();
                if book.is_none() {
                    warn!("Dropping Google Books record without a title");
                }
                book
            })
            .collect();

        Ok(books)
    }
}

#[async_trait]
impl BookProvider for GoogleBooksClient {
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
// Google Books API Response Types (private)
// ============================================================================

#[derive(Debug, Deserialize)]
struct VolumesResponse {
    #[serde(default)]
    items: Vec<Volume>,
}

#[derive(Debug, Deserialize)]
struct Volume {
    id: Option<String>,
    #[serde(rename = "volumeInfo", default)]
    volume_info: VolumeInfo,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VolumeInfo {
    title: Option<String>,
    #[serde(default)]
    authors: Vec<String>,
    description: Option<String>,
    published_date: Option<String>,
    #[serde(default)]
    categories: Vec<String>,
    page_count: Option<u32>,
    average_rating: Option<f64>,
    ratings_count: Option<u32>,
    #[serde(default)]
    image_links: ImageLinks,
    #[serde(default)]
    industry_identifiers: Vec<IndustryIdentifier>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImageLinks {
    large: Option<String>,
    medium: Option<String>,
    small: Option<String>,
    thumbnail: Option<String>,
}

impl ImageLinks {
    /// Largest available image wins.
    fn best(self) -> Option<String> {
        self.large.or(self.medium).or(self.small).or(self.thumbnail)
    }
}

#[derive(Debug, Deserialize)]
struct IndustryIdentifier {
    #[serde(rename = "type")]
    kind: String,
    identifier: String,
}

fn pick_isbn(identifiers: &[IndustryIdentifier]) -> Option<String> {
    identifiers
        .iter()
        .find(|i| i.kind == "ISBN_13")
        .or_else(|| identifiers.iter().find(|i| i.kind == "ISBN_10"))
        .map(|i| i.identifier.clone())
}

impl Volume {
    /// Normalize into the common record shape; None when the record has
    /// no usable title.
    fn normalize(self) -> Option<ExternalBook> {
        let info = self.volume_info;
        let title = info.title.filter(|t| !t.trim().is_empty())?;

        Some(ExternalBook {
            author: primary_author(&info.authors),
            authors: info.authors,
            description: info.description.unwrap_or_default(),
            year: info.published_date.as_deref().and_then(parse_year),
            genre: primary_genre(&info.categories),
            categories: info.categories,
            page_count: info.page_count,
            average_rating: info.average_rating,
            ratings_count: info.ratings_count,
            cover_image_url: info.image_links.best(),
            isbn: pick_isbn(&info.industry_identifiers),
            google_books_id: self.id,
            open_library_id: None,
            source: PROVIDER_NAME.to_string(),
            title,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn volume_json(title: Option<&str>) -> Volume {
        Volume {
            id: Some("vol-1".to_string()),
            volume_info: VolumeInfo {
                title: title.map(|t| t.to_string()),
                authors: vec!["Frank Herbert".to_string(), "Co Author".to_string()],
                description: Some("A desert planet".to_string()),
                published_date: Some("1965-08-01".to_string()),
                categories: vec!["Science Fiction".to_string(), "Classics".to_string()],
                page_count: Some(412),
                average_rating: Some(4.6),
                ratings_count: Some(12000),
                image_links: ImageLinks {
                    large: None,
                    medium: Some("https://img/medium.jpg".to_string()),
                    small: Some("https://img/small.jpg".to_string()),
                    thumbnail: Some("https://img/thumb.jpg".to_string()),
                },
                industry_identifiers: vec![
                    IndustryIdentifier {
                        kind: "ISBN_10".to_string(),
                        identifier: "0441172717".to_string(),
                    },
                    IndustryIdentifier {
                        kind: "ISBN_13".to_string(),
                        identifier: "9780441172719".to_string(),
                    },
                ],
            },
        }
    }

    #[test]
    fn test_normalize_full_volume() {
        let book = volume_json(Some("Dune")).normalize().unwrap();
        assert_eq!(book.title, "Dune");
        assert_eq!(book.author, "Frank Herbert");
        assert_eq!(book.year, Some(1965));
        assert_eq!(book.genre, "Science Fiction");
        assert_eq!(book.page_count, Some(412));
        // Largest available image wins
        assert_eq!(book.cover_image_url.as_deref(), Some("https://img/medium.jpg"));
        // ISBN-13 preferred over ISBN-10 regardless of list order
        assert_eq!(book.isbn.as_deref(), Some("9780441172719"));
        assert_eq!(book.google_books_id.as_deref(), Some("vol-1"));
        assert_eq!(book.source, "google_books");
    }

    #[test]
    fn test_normalize_drops_missing_title() {
        assert!(volume_json(None).normalize().is_none());
        assert!(volume_json(Some("   ")).normalize().is_none());
    }

    #[test]
    fn test_normalize_defaults() {
        let volume = Volume {
            id: None,
            volume_info: VolumeInfo {
                title: Some("Bare".to_string()),
                ..VolumeInfo::default()
            },
        };
        let book = volume.normalize().unwrap();
        assert_eq!(book.author, "Unknown Author");
        assert_eq!(book.genre, "Unknown");
        assert!(book.year.is_none());
        assert!(book.isbn.is_none());
        assert!(book.cover_image_url.is_none());
    }

    #[test]
    fn test_volumes_response_parses_real_payload_shape() {
        let json = r#"{
            "items": [
                {
                    "id": "abc",
                    "volumeInfo": {
                        "title": "Dune",
                        "authors": ["Frank Herbert"],
                        "publishedDate": "1965",
                        "categories": ["Fiction"],
                        "pageCount": 412,
                        "averageRating": 4.5,
                        "ratingsCount": 100,
                        "imageLinks": {"thumbnail": "https://img/t.jpg"},
                        "industryIdentifiers": [
                            {"type": "ISBN_13", "identifier": "9780441172719"}
                        ]
                    }
                }
            ]
        }"#;
        let parsed: VolumesResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.items.len(), 1);
        let book = parsed.items.into_iter().next().unwrap().normalize().unwrap();
        assert_eq!(book.year, Some(1965));
        assert_eq!(book.cover_image_url.as_deref(), Some("https://img/t.jpg"));
    }

    #[test]
    fn test_volumes_response_empty_payload() {
        let parsed: VolumesResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.items.is_empty());
    }
}

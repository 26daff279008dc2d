use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::PathBuf;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub providers: Option<ProvidersConfig>,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    "0.0.0.0".parse().unwrap()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("bookmood.db")
}

/// External book provider configuration.
///
/// Both providers are optional; a missing section means that provider is
/// not queried and search degrades to local-only results.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub google_books: Option<GoogleBooksConfig>,
    #[serde(default)]
    pub open_library: Option<OpenLibraryConfig>,
}

/// Google Books API configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GoogleBooksConfig {
    /// Optional API key. Unauthenticated requests work with lower quotas.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Base URL override (default: https://www.googleapis.com/books/v1)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Request timeout in seconds (default: 10)
    #[serde(default = "default_provider_timeout")]
    pub timeout_secs: u32,
}

/// Open Library API configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OpenLibraryConfig {
    /// Base URL override (default: https://openlibrary.org)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Request timeout in seconds (default: 10)
    #[serde(default = "default_provider_timeout")]
    pub timeout_secs: u32,
}

fn default_provider_timeout() -> u32 {
    10
}

/// Sanitized config for API responses (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub providers: Option<SanitizedProvidersConfig>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedProvidersConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub google_books: Option<SanitizedGoogleBooksConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_library: Option<SanitizedOpenLibraryConfig>,
}

/// Sanitized Google Books config (API key hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedGoogleBooksConfig {
    pub api_key_configured: bool,
    pub timeout_secs: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedOpenLibraryConfig {
    pub timeout_secs: u32,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            server: config.server.clone(),
            database: config.database.clone(),
            providers: config.providers.as_ref().map(|p| SanitizedProvidersConfig {
                google_books: p.google_books.as_ref().map(|g| SanitizedGoogleBooksConfig {
                    api_key_configured: g
                        .api_key
                        .as_ref()
                        .map(|k| !k.is_empty())
                        .unwrap_or(false),
                    timeout_secs: g.timeout_secs,
                }),
                open_library: p.open_library.as_ref().map(|o| SanitizedOpenLibraryConfig {
                    timeout_secs: o.timeout_secs,
                }),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host.to_string(), "0.0.0.0");
        assert_eq!(config.database.path.to_str().unwrap(), "bookmood.db");
        assert!(config.providers.is_none());
    }

    #[test]
    fn test_deserialize_custom_server() {
        let toml = r#"
[server]
host = "127.0.0.1"
port = 9000
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host.to_string(), "127.0.0.1");
    }

    #[test]
    fn test_deserialize_with_custom_database_path() {
        let toml = r#"
[database]
path = "/data/books.sqlite"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.database.path.to_str().unwrap(), "/data/books.sqlite");
    }

    #[test]
    fn test_deserialize_with_providers() {
        let toml = r#"
[providers.google_books]
api_key = "test-key"

[providers.open_library]
timeout_secs = 20
"#;
        let config: Config = toml::from_str(toml).unwrap();
        let providers = config.providers.as_ref().unwrap();

        let google = providers.google_books.as_ref().unwrap();
        assert_eq!(google.api_key.as_deref(), Some("test-key"));
        assert_eq!(google.timeout_secs, 10); // default

        let open_library = providers.open_library.as_ref().unwrap();
        assert_eq!(open_library.timeout_secs, 20);
    }

    #[test]
    fn test_sanitized_config_redacts_api_key() {
        let config = Config {
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            providers: Some(ProvidersConfig {
                google_books: Some(GoogleBooksConfig {
                    api_key: Some("secret-key".to_string()),
                    base_url: None,
                    timeout_secs: 10,
                }),
                open_library: None,
            }),
        };

        let sanitized = SanitizedConfig::from(&config);
        let json = serde_json::to_string(&sanitized).unwrap();
        assert!(!json.contains("secret-key"));

        let google = sanitized
            .providers
            .as_ref()
            .unwrap()
            .google_books
            .as_ref()
            .unwrap();
        assert!(google.api_key_configured);
    }

    #[test]
    fn test_sanitized_config_without_providers() {
        let config = Config {
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            providers: None,
        };
        let sanitized = SanitizedConfig::from(&config);
        assert!(sanitized.providers.is_none());
        assert_eq!(sanitized.server.port, 8080);
    }
}

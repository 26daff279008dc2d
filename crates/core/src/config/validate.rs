use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Provider timeouts are not 0
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    // Server validation
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    // Provider validation
    if let Some(ref providers) = config.providers {
        if let Some(ref google) = providers.google_books {
            if google.timeout_secs == 0 {
                return Err(ConfigError::ValidationError(
                    "providers.google_books.timeout_secs cannot be 0".to_string(),
                ));
            }
        }
        if let Some(ref open_library) = providers.open_library {
            if open_library.timeout_secs == 0 {
                return Err(ConfigError::ValidationError(
                    "providers.open_library.timeout_secs cannot be 0".to_string(),
                ));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{
        DatabaseConfig, GoogleBooksConfig, ProvidersConfig, ServerConfig,
    };
    use std::net::IpAddr;

    #[test]
    fn test_validate_valid_config() {
        let config = Config {
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            providers: None,
        };
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_port_zero_fails() {
        let config = Config {
            server: ServerConfig {
                host: "0.0.0.0".parse::<IpAddr>().unwrap(),
                port: 0,
            },
            database: DatabaseConfig::default(),
            providers: None,
        };
        let result = validate_config(&config);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_validate_zero_provider_timeout_fails() {
        let config = Config {
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            providers: Some(ProvidersConfig {
                google_books: Some(GoogleBooksConfig {
                    api_key: None,
                    base_url: None,
                    timeout_secs: 0,
                }),
                open_library: None,
            }),
        };
        let result = validate_config(&config);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }
}

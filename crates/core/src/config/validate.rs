use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Watchlist key is not blank
/// - TMDB API key is present when a [tmdb] section exists
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.storage.watchlist_key.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "storage.watchlist_key cannot be empty".to_string(),
        ));
    }

    if let Some(tmdb) = &config.tmdb {
        if tmdb.api_key.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "tmdb.api_key cannot be empty".to_string(),
            ));
        }
        if tmdb.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "tmdb.timeout_secs cannot be 0".to_string(),
            ));
        }
    }

    Ok(())
}

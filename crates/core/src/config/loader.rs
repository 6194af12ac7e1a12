use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};

/// Environment prefix for overrides.
pub const ENV_PREFIX: &str = "REEL_";

/// Sources merged into a [`Config`]: the TOML file, then `REEL_*` variables.
///
/// Nested keys are separated by a double underscore so that field names with
/// underscores survive, e.g. `REEL_STORAGE__WATCHLIST_KEY`.
pub fn config_figment(path: &Path) -> Figment {
    Figment::new()
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
}

/// Load configuration from file with environment variable overrides.
///
/// A relative `storage.path` is taken relative to the directory holding the
/// config file, so the database does not move with the working directory.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    let mut config: Config = config_figment(path)
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))?;

    if config.storage.path.is_relative() {
        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            config.storage.path = dir.join(&config.storage.path);
        }
    }

    Ok(config)
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_load_config_from_str_wrong_type() {
        let toml = r#"
[server]
port = "not-a-port"
"#;
        let result = load_config_from_str(toml);
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config(Path::new("/nonexistent/config.toml"));
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[server]
host = "127.0.0.1"
port = 3000

[storage]
path = "/var/lib/reel/reel.db"
watchlist_key = "saved"

[tmdb]
api_key = "abc"
"#
        )
        .unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.host.to_string(), "127.0.0.1");
        assert_eq!(config.storage.path, PathBuf::from("/var/lib/reel/reel.db"));
        assert_eq!(config.storage.watchlist_key, "saved");
        assert_eq!(config.tmdb.unwrap().api_key, "abc");
    }

    #[test]
    fn test_relative_storage_path_follows_config_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[storage]\npath = \"data/reel.db\"\n").unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.storage.path, dir.path().join("data/reel.db"));

        std::fs::write(&path, "[server]\nport = 9000\n").unwrap();
        let config = load_config(&path).unwrap();
        assert_eq!(config.storage.path, dir.path().join("reel.db"));
    }

    #[test]
    fn test_env_overrides_nested_keys() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "reel.toml",
                r#"
[server]
port = 3000

[storage]
watchlist_key = "from-file"
"#,
            )?;
            jail.set_env("REEL_SERVER__PORT", "4000");
            jail.set_env("REEL_STORAGE__WATCHLIST_KEY", "myMovieList");
            jail.set_env("REEL_STORAGE__MAX_VALUE_BYTES", "0");
            // Read by the binary to locate this file, not a setting
            jail.set_env("REEL_CONFIG", "reel.toml");

            let config = load_config(Path::new("reel.toml")).expect("config should load");
            assert_eq!(config.server.port, 4000);
            assert_eq!(config.storage.watchlist_key, "myMovieList");
            assert_eq!(config.storage.quota(), None);
            assert_eq!(config.storage.path, PathBuf::from("reel.db"));
            Ok(())
        });
    }

    #[test]
    fn test_env_override_with_wrong_type_is_parse_error() {
        Jail::expect_with(|jail| {
            jail.create_file("reel.toml", "")?;
            jail.set_env("REEL_SERVER__PORT", "eighty");

            let result = load_config(Path::new("reel.toml"));
            assert!(matches!(result, Err(ConfigError::ParseError(_))));
            Ok(())
        });
    }
}

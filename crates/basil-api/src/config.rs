//! Client configuration
//!
//! Layers, highest first: explicit overrides (command-line flags), the
//! `BASIL_API_URL` environment variable, the TOML config file, built-in
//! defaults. The config file lives at `$BASIL_CONFIG` or
//! `~/.basil/config.toml` and is optional.

use basil_core::{DefaultOrganization, PayloadStrategy};
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use url::Url;

pub const DEFAULT_API_URL: &str = "http://localhost:8090";
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid API URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

/// Contents of `config.toml`. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub api_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub payload: Option<PayloadStrategy>,
    pub default_org: Option<DefaultOrganization>,
}

/// Values given on the command line.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub api_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub payload: Option<PayloadStrategy>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_url: Url,
    pub timeout: Duration,
    pub payload: PayloadStrategy,
    pub default_org: DefaultOrganization,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: Url::parse(DEFAULT_API_URL).expect("default API URL is valid"),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            payload: PayloadStrategy::default(),
            default_org: DefaultOrganization::default(),
        }
    }
}

impl Config {
    /// Resolve the configuration from the environment, the config file, and
    /// `overrides`.
    pub fn load(overrides: &Overrides) -> Result<Self, ConfigError> {
        let file = match config_path() {
            Some(path) => read_config_file(&path)?,
            None => None,
        };
        let env_api_url = std::env::var("BASIL_API_URL").ok();
        Self::from_layers(file, env_api_url, overrides)
    }

    pub fn from_layers(
        file: Option<ConfigFile>,
        env_api_url: Option<String>,
        overrides: &Overrides,
    ) -> Result<Self, ConfigError> {
        let file = file.unwrap_or_default();
        let defaults = Config::default();

        let api_url = match overrides
            .api_url
            .clone()
            .or(env_api_url)
            .or(file.api_url)
        {
            Some(raw) => parse_api_url(&raw)?,
            None => defaults.api_url,
        };
        let timeout = overrides
            .timeout_secs
            .or(file.timeout_secs)
            .map(Duration::from_secs)
            .unwrap_or(defaults.timeout);

        Ok(Self {
            api_url,
            timeout,
            payload: overrides.payload.or(file.payload).unwrap_or(defaults.payload),
            default_org: file.default_org.unwrap_or(defaults.default_org),
        })
    }

    /// Absolute URL for an API path such as `organizations` or `basil`.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/api/{}",
            self.api_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

fn parse_api_url(raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw.trim()).map_err(|source| ConfigError::InvalidUrl {
        url: raw.to_string(),
        source,
    })
}

/// Location of the config file: `$BASIL_CONFIG`, else `~/.basil/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("BASIL_CONFIG") {
        return Some(PathBuf::from(path));
    }
    dirs::home_dir().map(|home| home.join(".basil").join("config.toml"))
}

/// Read a config file. A missing file is `Ok(None)`.
pub fn read_config_file(path: &Path) -> Result<Option<ConfigFile>, ConfigError> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    log::debug!("Loading config from {}", path.display());
    toml::from_str(&contents)
        .map(Some)
        .map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::from_layers(None, None, &Overrides::default()).unwrap();
        assert_eq!(config.endpoint("organizations"), "http://localhost:8090/api/organizations");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.payload, PayloadStrategy::Minimal);
        assert_eq!(config.default_org.id, "Pittaluga");
    }

    #[test]
    fn test_layer_precedence() {
        let file = ConfigFile {
            api_url: Some("http://file:1".to_string()),
            timeout_secs: Some(9),
            payload: Some(PayloadStrategy::Full),
            default_org: None,
        };

        let config = Config::from_layers(Some(file.clone()), None, &Overrides::default()).unwrap();
        assert_eq!(config.api_url.as_str(), "http://file:1/");
        assert_eq!(config.timeout, Duration::from_secs(9));
        assert_eq!(config.payload, PayloadStrategy::Full);

        let config = Config::from_layers(
            Some(file.clone()),
            Some("http://env:2".to_string()),
            &Overrides::default(),
        )
        .unwrap();
        assert_eq!(config.api_url.as_str(), "http://env:2/");

        let overrides = Overrides {
            api_url: Some("http://flag:3/".to_string()),
            timeout_secs: Some(1),
            payload: Some(PayloadStrategy::Minimal),
        };
        let config =
            Config::from_layers(Some(file), Some("http://env:2".to_string()), &overrides).unwrap();
        assert_eq!(config.endpoint("/basil"), "http://flag:3/api/basil");
        assert_eq!(config.timeout, Duration::from_secs(1));
        assert_eq!(config.payload, PayloadStrategy::Minimal);
    }

    #[test]
    fn test_invalid_url_is_rejected() {
        let overrides = Overrides {
            api_url: Some("not a url".to_string()),
            ..Default::default()
        };
        let err = Config::from_layers(None, None, &overrides).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { .. }));
    }

    #[test]
    fn test_read_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        assert_eq!(read_config_file(&path).unwrap(), None);

        fs::write(
            &path,
            r#"
api_url = "http://plants.local:8090"
payload = "full"

[default_org]
id = "philadog"
name = "Philadog & Trade"
"#,
        )
        .unwrap();
        let file = read_config_file(&path).unwrap().unwrap();
        let config = Config::from_layers(Some(file), None, &Overrides::default()).unwrap();
        assert_eq!(config.default_org.name, "Philadog & Trade");
        assert_eq!(config.payload, PayloadStrategy::Full);
        assert_eq!(config.endpoint("statuses"), "http://plants.local:8090/api/statuses");

        fs::write(&path, "[default_org]\nid = \"hq\"\n").unwrap();
        let file = read_config_file(&path).unwrap().unwrap();
        let default_org = file.default_org.unwrap();
        assert_eq!(default_org.id, "hq");
        assert_eq!(default_org.name, "hq");

        fs::write(&path, "colour = \"green\"\n").unwrap();
        assert!(matches!(
            read_config_file(&path),
            Err(ConfigError::Parse { .. })
        ));
    }
}

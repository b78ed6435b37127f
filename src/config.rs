//! Startup configuration: secrets file, environment, and explicit overrides.
//!
//! Precedence, lowest to highest:
//! 1. Built-in defaults ([`GeminiCaptionConfig::default`])
//! 2. TOML secrets file (`.streamlit/secrets.toml` unless another path is given)
//! 3. Overrides (environment variables and CLI flags)
//!
//! The resulting [`GeminiCaptionConfig`] is built once and passed explicitly to
//! the captioning functions.

use crate::types::GeminiCaptionConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const API_KEY_VAR: &str = "GEMINI_API_KEY";
pub const BASE_URL_VAR: &str = "GEMINI_BASE_URL";
pub const MODEL_VAR: &str = "GEMINI_MODEL";
pub const TIMEOUT_VAR: &str = "GEMINI_TIMEOUT_SECS";

/// Secrets file read when no explicit path is given.
pub const DEFAULT_SECRETS_PATH: &str = ".streamlit/secrets.toml";

/// Contents of the TOML secrets file. Unknown keys are ignored.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct Secrets {
    #[serde(rename = "GEMINI_API_KEY")]
    pub api_key: Option<String>,
    #[serde(rename = "GEMINI_BASE_URL")]
    pub endpoint: Option<String>,
    #[serde(rename = "GEMINI_MODEL")]
    pub model: Option<String>,
    #[serde(rename = "GEMINI_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,
}

impl Secrets {
    /// Parse secrets from TOML text.
    pub fn parse(text: &str, origin: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|e| ConfigError::Parse(origin.to_path_buf(), e.to_string()))
    }

    /// Read a secrets file. A missing file yields `Ok(None)`.
    pub fn load(path: &Path) -> Result<Option<Self>, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(text) => Self::parse(&text, path).map(Some),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ConfigError::Read(path.to_path_buf(), e.to_string())),
        }
    }
}

/// Values that take precedence over the secrets file.
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    pub api_key: Option<String>,
    pub endpoint: Option<String>,
    pub model: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl ConfigOverrides {
    /// Collect overrides from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Collect overrides through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let timeout_secs = match lookup(TIMEOUT_VAR) {
            Some(raw) => Some(parse_timeout(&raw)?),
            None => None,
        };

        Ok(Self {
            api_key: lookup(API_KEY_VAR),
            endpoint: lookup(BASE_URL_VAR),
            model: lookup(MODEL_VAR),
            timeout_secs,
        })
    }
}

/// Errors raised while assembling configuration at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read secrets file {path}: {1}", path = .0.display())]
    Read(PathBuf, String),

    #[error("Invalid secrets file {path}: {1}", path = .0.display())]
    Parse(PathBuf, String),

    #[error("Secrets file {} does not exist", .0.display())]
    MissingSecretsFile(PathBuf),

    #[error("Invalid timeout '{0}': expected a positive number of seconds")]
    InvalidTimeout(String),
}

/// Build the client configuration.
///
/// `secrets_path` of `None` reads [`DEFAULT_SECRETS_PATH`] if it exists; an
/// explicit path must exist.
pub fn load_config(
    secrets_path: Option<&Path>,
    overrides: ConfigOverrides,
) -> Result<GeminiCaptionConfig, ConfigError> {
    let secrets = match secrets_path {
        Some(path) => match Secrets::load(path)? {
            Some(secrets) => Some(secrets),
            None => return Err(ConfigError::MissingSecretsFile(path.to_path_buf())),
        },
        None => Secrets::load(Path::new(DEFAULT_SECRETS_PATH))?,
    };

    let config = resolve(secrets.unwrap_or_default(), overrides)?;

    if config.usable_api_key().is_none() {
        tracing::warn!("{} is not configured; caption requests will be skipped", API_KEY_VAR);
    }
    tracing::debug!(?config, "Loaded configuration");

    Ok(config)
}

/// Merge secrets and overrides on top of the defaults.
pub fn resolve(
    secrets: Secrets,
    overrides: ConfigOverrides,
) -> Result<GeminiCaptionConfig, ConfigError> {
    let defaults = GeminiCaptionConfig::default();

    let timeout = match overrides.timeout_secs.or(secrets.timeout_secs) {
        Some(0) => return Err(ConfigError::InvalidTimeout("0".to_string())),
        Some(secs) => Duration::from_secs(secs),
        None => defaults.timeout,
    };

    Ok(GeminiCaptionConfig {
        endpoint: overrides
            .endpoint
            .or(secrets.endpoint)
            .unwrap_or(defaults.endpoint),
        model: overrides.model.or(secrets.model).unwrap_or(defaults.model),
        api_key: overrides.api_key.or(secrets.api_key),
        timeout,
        generation: defaults.generation,
    })
}

fn parse_timeout(raw: &str) -> Result<u64, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(secs),
        _ => Err(ConfigError::InvalidTimeout(raw.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn defaults_without_sources() {
        let config = resolve(Secrets::default(), ConfigOverrides::default()).unwrap();
        assert_eq!(config.model, "gemini-2.0-flash");
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert!(config.api_key.is_none());
    }

    #[test]
    fn secrets_file_supplies_key() {
        let secrets = Secrets::parse(
            "GEMINI_API_KEY = \"from-file\"\nOTHER = \"ignored\"\n",
            Path::new("secrets.toml"),
        )
        .unwrap();
        let config = resolve(secrets, ConfigOverrides::default()).unwrap();
        assert_eq!(config.api_key.as_deref(), Some("from-file"));
    }

    #[test]
    fn overrides_beat_secrets() {
        let secrets = Secrets {
            api_key: Some("from-file".into()),
            model: Some("file-model".into()),
            timeout_secs: Some(10),
            ..Default::default()
        };
        let overrides = ConfigOverrides {
            api_key: Some("from-env".into()),
            timeout_secs: Some(5),
            ..Default::default()
        };
        let config = resolve(secrets, overrides).unwrap();
        assert_eq!(config.api_key.as_deref(), Some("from-env"));
        assert_eq!(config.model, "file-model");
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn lookup_reads_known_variables() {
        let vars: HashMap<&str, &str> = [
            (API_KEY_VAR, "k"),
            (BASE_URL_VAR, "http://localhost:1234"),
            (TIMEOUT_VAR, "15"),
        ]
        .into_iter()
        .collect();
        let overrides =
            ConfigOverrides::from_lookup(|name| vars.get(name).map(|v| v.to_string())).unwrap();
        assert_eq!(overrides.api_key.as_deref(), Some("k"));
        assert_eq!(overrides.endpoint.as_deref(), Some("http://localhost:1234"));
        assert_eq!(overrides.timeout_secs, Some(15));
        assert!(overrides.model.is_none());
    }

    #[test]
    fn bad_timeout_is_rejected() {
        let result = ConfigOverrides::from_lookup(|name| {
            (name == TIMEOUT_VAR).then(|| "soon".to_string())
        });
        assert!(matches!(result, Err(ConfigError::InvalidTimeout(_))));

        let zero = ConfigOverrides {
            timeout_secs: Some(0),
            ..Default::default()
        };
        assert!(resolve(Secrets::default(), zero).is_err());
    }

    #[test]
    fn malformed_secrets_file_is_an_error() {
        let err = Secrets::parse("GEMINI_API_KEY = ", Path::new("bad.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_, _)));
        assert!(err.to_string().starts_with("Invalid secrets file bad.toml: "));
    }

    #[test]
    fn read_error_names_the_file() {
        let err = ConfigError::Read(PathBuf::from("conf/secrets.toml"), "denied".into());
        assert_eq!(
            err.to_string(),
            "Failed to read secrets file conf/secrets.toml: denied"
        );
    }

    #[test]
    fn explicit_secrets_path_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        let err = load_config(Some(&missing), ConfigOverrides::default()).unwrap_err();
        assert!(matches!(err, ConfigError::MissingSecretsFile(_)));
    }

    #[test]
    fn load_config_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("secrets.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "GEMINI_API_KEY = \"abc\"").unwrap();
        writeln!(file, "GEMINI_TIMEOUT_SECS = 30").unwrap();

        let config = load_config(Some(&path), ConfigOverrides::default()).unwrap();
        assert_eq!(config.api_key.as_deref(), Some("abc"));
        assert_eq!(config.timeout, Duration::from_secs(30));
    }
}

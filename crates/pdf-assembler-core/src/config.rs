use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default name for the combined output document
pub const DEFAULT_OUTPUT_FILENAME: &str = "merged.pdf";

/// Header carrying the backend access credential
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Backend connection settings.
///
/// `api_base` is either the processing service itself (with `api_key` set)
/// or a gateway that injects the credential server-side (no `api_key`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    pub api_base: String,
    pub api_key: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl BackendConfig {
    /// Create a new backend config
    pub fn new(api_base: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            api_base: api_base.into(),
            api_key,
            timeout_secs: default_timeout_secs(),
        }
    }

    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check that an origin is configured.
    pub fn validate(&self) -> Result<(), crate::error::Error> {
        if self.api_base.trim().is_empty() {
            return Err(crate::error::Error::Misconfigured(
                "backend API base URL not configured".to_string(),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(crate::error::Error::ConfigInvalid {
                field: "backend.timeout_secs".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

const fn default_timeout_secs() -> u64 {
    60
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            api_base: "http://localhost:3000/api/proxy".to_string(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Backend connection
    #[serde(default)]
    pub backend: BackendConfig,

    /// Filename requested for the combined document
    #[serde(default = "default_output_filename")]
    pub output_filename: String,
}

fn default_output_filename() -> String {
    DEFAULT_OUTPUT_FILENAME.to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend: BackendConfig::default(),
            output_filename: default_output_filename(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, crate::error::Error> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            crate::error::Error::ConfigLoad(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        toml::from_str(&content).map_err(|e| {
            crate::error::Error::ConfigLoad(format!("Failed to parse config: {e}"))
        })
    }

    /// Load from default locations (~/.config/pdf-assembler/config.toml, ./config.toml)
    pub fn load() -> Self {
        if let Some(config_dir) = crate::util::config_dir() {
            let user_config = config_dir.join("pdf-assembler").join("config.toml");
            if user_config.exists() {
                match Self::from_file(&user_config) {
                    Ok(config) => {
                        tracing::debug!("Loaded config from {}", user_config.display());
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        let local_config = std::path::PathBuf::from("config.toml");
        if local_config.exists() {
            match Self::from_file(&local_config) {
                Ok(config) => {
                    tracing::debug!("Loaded config from ./config.toml");
                    return config;
                }
                Err(e) => {
                    tracing::warn!("Failed to load ./config.toml: {}", e);
                }
            }
        }

        tracing::debug!("No config file found, using defaults");
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.output_filename, "merged.pdf");
        assert_eq!(config.backend.timeout_secs, 60);
        assert!(config.backend.api_key.is_none());
    }

    #[test]
    fn test_from_file_partial() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "output_filename = \"out.pdf\"\n[backend]\napi_base = \"http://backend:8000\"\napi_key = \"secret\""
        )
        .unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.output_filename, "out.pdf");
        assert_eq!(config.backend.api_base, "http://backend:8000");
        assert_eq!(config.backend.api_key.as_deref(), Some("secret"));
        assert_eq!(config.backend.timeout_secs, 60);
    }

    #[test]
    fn test_from_file_invalid() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "output_filename = [").unwrap();
        let err = AppConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, crate::error::Error::ConfigLoad(_)));
    }

    #[test]
    fn test_validate_missing_origin() {
        let config = BackendConfig::new("  ", None);
        assert!(matches!(
            config.validate(),
            Err(crate::error::Error::Misconfigured(_))
        ));
        assert!(BackendConfig::default().validate().is_ok());
    }
}

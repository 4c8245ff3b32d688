use plugindata_types::PluginDataError;
use serde::Deserialize;
use std::path::Path;

/// Environment variable naming the plugin-data service host.
pub const HOST_ENV_VAR: &str = "CONVERSEAI_PLUGINDATA_HOST";

fn default_level() -> String {
    "info".to_string()
}

/// Logging configuration for binaries embedding the client.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LogConfig {
    /// Default `tracing` filter when `RUST_LOG` is unset (defaults to `info`).
    #[serde(default = "default_level")]
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            json: false,
        }
    }
}

/// Shape extracted from figment before the host is validated.
#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    #[serde(default)]
    host: Option<String>,
    #[serde(default)]
    log: LogConfig,
}

/// Validated client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the plugin-data service.
    pub host: String,
    pub log: LogConfig,
}

impl Config {
    /// Builds a configuration for `host` with default logging.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            log: LogConfig::default(),
        }
    }

    /// Loads configuration from the process environment only.
    ///
    /// # Errors
    ///
    /// Returns [`PluginDataError::MissingConfiguration`] if
    /// `CONVERSEAI_PLUGINDATA_HOST` is unset or blank.
    pub fn from_env() -> Result<Self, PluginDataError> {
        Self::load(None)
    }

    /// Loads configuration from an optional YAML file, then applies the
    /// `CONVERSEAI_PLUGINDATA_HOST` environment variable on top.
    ///
    /// # Errors
    ///
    /// Returns [`PluginDataError::Config`] if `path` does not exist or cannot
    /// be parsed, and [`PluginDataError::MissingConfiguration`] if no host
    /// is configured by any source.
    pub fn load(path: Option<&Path>) -> Result<Self, PluginDataError> {
        use figment::{
            Figment,
            providers::{Env, Format as _, Yaml},
        };
        let mut figment = Figment::new();
        if let Some(path) = path {
            if !path.exists() {
                return Err(PluginDataError::Config(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            figment = figment.merge(Yaml::file(path));
        }
        let figment = figment.merge(Env::raw().only(&[HOST_ENV_VAR]).map(|_| "host".into()));
        Self::extract(&figment)
    }

    /// Parses configuration from a YAML string, without consulting the
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns [`PluginDataError::Config`] if the YAML is invalid and
    /// [`PluginDataError::MissingConfiguration`] if it names no host.
    pub fn from_yaml(yaml: &str) -> Result<Self, PluginDataError> {
        use figment::{
            Figment,
            providers::{Format as _, Yaml},
        };
        Self::extract(&Figment::from(Yaml::string(yaml)))
    }

    fn extract(figment: &figment::Figment) -> Result<Self, PluginDataError> {
        let raw: RawConfig = figment
            .extract()
            .map_err(|e| PluginDataError::Config(e.to_string()))?;
        let host = raw
            .host
            .map(|h| h.trim().to_string())
            .filter(|h| !h.is_empty())
            .ok_or(PluginDataError::MissingConfiguration(HOST_ENV_VAR))?;
        tracing::debug!(%host, "plugin-data configuration loaded");
        Ok(Self { host, log: raw.log })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_YAML: &str = r#"
host: "https://plugindata.example.com"
log:
  level: debug
  json: true
"#;

    #[test]
    fn test_from_yaml() {
        let c = Config::from_yaml(SAMPLE_YAML).unwrap();
        assert_eq!(c.host, "https://plugindata.example.com");
        assert_eq!(c.log.level, "debug");
        assert!(c.log.json);
    }

    #[test]
    fn test_log_defaults_applied() {
        let c = Config::from_yaml("host: http://localhost:9000").unwrap();
        assert_eq!(c.log, LogConfig::default());
        assert_eq!(c.log.level, "info");
    }

    #[test]
    fn test_missing_host_fails_fast() {
        let err = Config::from_yaml("log:\n  level: warn\n").unwrap_err();
        assert!(matches!(
            err,
            PluginDataError::MissingConfiguration(HOST_ENV_VAR)
        ));
    }

    #[test]
    fn test_blank_host_is_missing() {
        let err = Config::from_yaml("host: '   '").unwrap_err();
        assert!(matches!(err, PluginDataError::MissingConfiguration(_)));
    }

    #[test]
    fn test_invalid_yaml() {
        let err = Config::from_yaml("host: [unclosed").unwrap_err();
        assert!(matches!(err, PluginDataError::Config(_)));
    }

    #[test]
    fn test_load_from_file() {
        figment::Jail::expect_with(|jail| {
            jail.clear_env();
            jail.create_file("plugindata.yaml", SAMPLE_YAML)?;

            let c = Config::load(Some(Path::new("plugindata.yaml"))).unwrap();
            assert_eq!(c.host, "https://plugindata.example.com");
            assert_eq!(c.log.level, "debug");
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_file_host() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("plugindata.yaml", SAMPLE_YAML)?;
            jail.set_env(HOST_ENV_VAR, "http://override:7000");

            let c = Config::load(Some(Path::new("plugindata.yaml"))).unwrap();
            assert_eq!(c.host, "http://override:7000");
            assert_eq!(c.log.level, "debug");
            assert!(c.log.json);
            Ok(())
        });
    }

    #[test]
    fn test_from_env_reads_host() {
        figment::Jail::expect_with(|jail| {
            jail.set_env(HOST_ENV_VAR, "  http://localhost:7000  ");

            let c = Config::from_env().unwrap();
            assert_eq!(c.host, "http://localhost:7000");
            assert_eq!(c.log, LogConfig::default());
            Ok(())
        });
    }

    #[test]
    fn test_from_env_unset_is_missing() {
        figment::Jail::expect_with(|jail| {
            jail.clear_env();

            let err = Config::from_env().unwrap_err();
            assert!(matches!(
                err,
                PluginDataError::MissingConfiguration(HOST_ENV_VAR)
            ));
            Ok(())
        });
    }

    #[test]
    fn test_from_env_blank_is_missing() {
        figment::Jail::expect_with(|jail| {
            jail.set_env(HOST_ENV_VAR, "   ");

            let err = Config::from_env().unwrap_err();
            assert!(matches!(err, PluginDataError::MissingConfiguration(_)));
            Ok(())
        });
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(Some(&dir.path().join("absent.yaml"))).unwrap_err();
        assert!(matches!(err, PluginDataError::Config(_)));
    }

    #[test]
    fn test_new_uses_default_logging() {
        let c = Config::new("http://localhost:1");
        assert_eq!(c.host, "http://localhost:1");
        assert!(!c.log.json);
    }
}

//! Runtime configuration for the `upg` binary.
//!
//! Values come from the environment with defaults. The library core reads no
//! environment variables; only the CLI builds an [`UpgConfig`].
//!
//! | Variable | Default |
//! |---|---|
//! | `UPG_LOG_LEVEL` | `info` |
//! | `UPG_OUTPUT_DIR` | `./output` |
//! | `UPG_ENRICH_DEPTH` | `standard` |
//! | `UPG_SWEEP_CONCURRENCY` | `8` |

use crate::enrich::EnrichDepth;
use std::env;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_OUTPUT_DIR: &str = "./output";
const DEFAULT_SWEEP_CONCURRENCY: usize = 8;
const MAX_SWEEP_CONCURRENCY: usize = 256;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("invalid log level '{0}', expected one of trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("invalid {field}: {error}")]
    ParseError { field: &'static str, error: String },

    #[error("sweep concurrency must be between 1 and {MAX_SWEEP_CONCURRENCY}, got {0}")]
    InvalidConcurrency(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpgConfig {
    pub log_level: String,
    /// Root directory generated projects are written under.
    pub output_dir: PathBuf,
    /// Raw `UPG_ENRICH_DEPTH`; checked by [`UpgConfig::validate`].
    pub enrich_depth: String,
    /// Seeds generated in parallel by `sweep`.
    pub sweep_concurrency: usize,
}

impl Default for UpgConfig {
    fn default() -> Self {
        let log_level = env::var("UPG_LOG_LEVEL")
            .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string())
            .to_lowercase();

        let output_dir = env::var("UPG_OUTPUT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_OUTPUT_DIR));

        let enrich_depth = env::var("UPG_ENRICH_DEPTH")
            .unwrap_or_else(|_| EnrichDepth::default().to_string());

        // Unparsable values become 0 so validate() reports them.
        let sweep_concurrency = env::var("UPG_SWEEP_CONCURRENCY")
            .ok()
            .map(|v| v.trim().parse::<usize>().unwrap_or(0))
            .unwrap_or(DEFAULT_SWEEP_CONCURRENCY);

        Self {
            log_level,
            output_dir,
            enrich_depth,
            sweep_concurrency,
        }
    }
}

impl UpgConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => return Err(ConfigError::InvalidLogLevel(other.to_string())),
        }

        self.depth()?;

        if self.sweep_concurrency == 0 || self.sweep_concurrency > MAX_SWEEP_CONCURRENCY {
            return Err(ConfigError::InvalidConcurrency(self.sweep_concurrency));
        }
        Ok(())
    }

    pub fn depth(&self) -> Result<EnrichDepth, ConfigError> {
        self.enrich_depth
            .parse()
            .map_err(|error| ConfigError::ParseError {
                field: "UPG_ENRICH_DEPTH",
                error,
            })
    }
}

impl fmt::Display for UpgConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "UPG configuration:")?;
        writeln!(f, "  Log level: {}", self.log_level)?;
        writeln!(f, "  Output dir: {}", self.output_dir.display())?;
        writeln!(f, "  Enrich depth: {}", self.enrich_depth)?;
        writeln!(f, "  Sweep concurrency: {}", self.sweep_concurrency)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: [&str; 4] = [
        "UPG_LOG_LEVEL",
        "UPG_OUTPUT_DIR",
        "UPG_ENRICH_DEPTH",
        "UPG_SWEEP_CONCURRENCY",
    ];

    /// Restores an environment variable on drop.
    struct EnvGuard {
        key: &'static str,
        old: Option<String>,
    }

    impl EnvGuard {
        fn set(key: &'static str, value: &str) -> Self {
            let old = env::var(key).ok();
            env::set_var(key, value);
            Self { key, old }
        }

        fn unset(key: &'static str) -> Self {
            let old = env::var(key).ok();
            env::remove_var(key);
            Self { key, old }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            match &self.old {
                Some(v) => env::set_var(self.key, v),
                None => env::remove_var(self.key),
            }
        }
    }

    #[test]
    #[serial]
    fn test_defaults() {
        let _guards: Vec<EnvGuard> = VARS.iter().map(|k| EnvGuard::unset(k)).collect();
        let config = UpgConfig::default();
        assert_eq!(config.log_level, "info");
        assert_eq!(config.output_dir, PathBuf::from("./output"));
        assert_eq!(config.depth(), Ok(EnrichDepth::Standard));
        assert_eq!(config.sweep_concurrency, 8);
        assert!(config.validate().is_ok());
    }

    #[test]
    #[serial]
    fn test_environment_overrides() {
        let _guards = vec![
            EnvGuard::set("UPG_LOG_LEVEL", "DEBUG"),
            EnvGuard::set("UPG_OUTPUT_DIR", "/tmp/upg"),
            EnvGuard::set("UPG_ENRICH_DEPTH", "full"),
            EnvGuard::set("UPG_SWEEP_CONCURRENCY", "32"),
        ];
        let config = UpgConfig::default();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.output_dir, PathBuf::from("/tmp/upg"));
        assert_eq!(config.depth(), Ok(EnrichDepth::Full));
        assert_eq!(config.sweep_concurrency, 32);
    }

    #[test]
    #[serial]
    fn test_garbage_concurrency_fails_validation() {
        let _guard = EnvGuard::set("UPG_SWEEP_CONCURRENCY", "lots");
        let config = UpgConfig::default();
        assert_eq!(config.validate(), Err(ConfigError::InvalidConcurrency(0)));
    }

    #[test]
    #[serial]
    fn test_invalid_values() {
        let _guards: Vec<EnvGuard> = VARS.iter().map(|k| EnvGuard::unset(k)).collect();
        let mut config = UpgConfig::default();
        config.log_level = "loud".into();
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidLogLevel("loud".into()))
        );

        let mut config = UpgConfig::default();
        config.enrich_depth = "deep".into();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ParseError { field: "UPG_ENRICH_DEPTH", .. })
        ));
    }

    #[test]
    #[serial]
    fn test_display() {
        let config = UpgConfig::default();
        let display = config.to_string();
        assert!(display.contains("UPG configuration:"));
        assert!(display.contains("Sweep concurrency:"));
    }
}

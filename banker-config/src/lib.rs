//! # Banker Configuration System
//!
//! Layered configuration for the request evaluator and its telemetry.
//!
//! ## Hierarchy
//! 1. Default values
//! 2. `config/banker.yaml`, if present
//! 3. `config/<BANKER_ENV>.yaml`, if present
//! 4. `BANKER_*` environment variables (`__` separates nested keys, e.g.
//!    `BANKER_EVALUATOR__COMMIT_ON_GRANT=true`)

#![warn(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use tracing::debug;
use validator::Validate;

mod error;
mod evaluator;
mod telemetry;
mod validation;

pub use error::ConfigError;
pub use evaluator::EvaluatorConfig;
pub use telemetry::TelemetryConfig;

const BASE_FILE: &str = "config/banker.yaml";
const ENV_PREFIX: &str = "BANKER_";

/// Top‑level configuration container.
#[derive(Debug, Serialize, Deserialize, Validate, Default, Clone, PartialEq, Eq)]
pub struct BankerConfig {
    /// Request evaluation and input decoding.
    #[validate(nested)]
    #[serde(default)]
    pub evaluator: EvaluatorConfig,

    /// Logging and metrics.
    #[validate(nested)]
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl BankerConfig {
    /// Load configuration from the default files and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(BankerConfig::default()));

        if Path::new(BASE_FILE).exists() {
            figment = figment.merge(Yaml::file(BASE_FILE));
        } else {
            debug!("{BASE_FILE} not found, using default configuration");
        }

        if let Ok(env) = std::env::var("BANKER_ENV") {
            let env_file = format!("config/{env}.yaml");
            if Path::new(&env_file).exists() {
                figment = figment.merge(Yaml::file(env_file));
            }
        }

        Self::extract(figment)
    }

    /// Load configuration from a specific file, still honouring `BANKER_*`
    /// overrides.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(PathBuf::from(path)));
        }

        let figment =
            Figment::from(Serialized::defaults(BankerConfig::default())).merge(Yaml::file(path));
        Self::extract(figment)
    }

    fn extract(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn full_config_validation() {
        let config = BankerConfig::default();
        config.validate().expect("Default config should validate");
    }

    #[test]
    fn defaults_without_files() {
        Jail::expect_with(|_jail| {
            let config = BankerConfig::load().map_err(|e| e.to_string())?;
            assert_eq!(config, BankerConfig::default());
            Ok(())
        });
    }

    #[test]
    fn base_file_and_environment_override() {
        Jail::expect_with(|jail| {
            jail.create_dir("config")?;
            jail.create_file(
                "config/banker.yaml",
                "evaluator:\n  process_prefix: Proc\n  max_processes: 16\n",
            )?;
            jail.set_env("BANKER_EVALUATOR__COMMIT_ON_GRANT", "true");
            jail.set_env("BANKER_TELEMETRY__LOG_LEVEL", "debug");

            let config = BankerConfig::load().map_err(|e| e.to_string())?;
            assert_eq!(config.evaluator.process_prefix, "Proc");
            assert_eq!(config.evaluator.max_processes, 16);
            assert_eq!(config.evaluator.max_resources, 1024);
            assert!(config.evaluator.commit_on_grant);
            assert_eq!(config.telemetry.log_level, "debug");
            Ok(())
        });
    }

    #[test]
    fn environment_file_overrides_base_file() {
        Jail::expect_with(|jail| {
            jail.create_dir("config")?;
            jail.create_file("config/banker.yaml", "telemetry:\n  metrics: false\n")?;
            jail.create_file("config/staging.yaml", "telemetry:\n  metrics: true\n")?;
            jail.set_env("BANKER_ENV", "staging");

            let config = BankerConfig::load().map_err(|e| e.to_string())?;
            assert!(config.telemetry.metrics);
            Ok(())
        });
    }

    #[test]
    fn explicit_path_is_validated() {
        Jail::expect_with(|jail| {
            jail.create_file("bad.yaml", "evaluator:\n  process_prefix: \"P1\"\n")?;
            let err = BankerConfig::load_from_path("bad.yaml").unwrap_err();
            assert!(matches!(err, ConfigError::Validation(_)));
            assert!(err.to_string().contains("evaluator.process_prefix"));
            Ok(())
        });
    }

    #[test]
    fn missing_explicit_path() {
        let err = BankerConfig::load_from_path("does/not/exist.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }
}

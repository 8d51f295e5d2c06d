//! Build configuration loaded from TOML.
//!
//! Defaults are embedded via `include_str!`; callers may parse their own
//! TOML with [`BuildConfig::from_toml_str`].

use serde::Deserialize;

use crate::codespace::MAX_CODE_LENGTH_LIMIT;

pub const DEFAULT_CONFIG_TOML: &str = include_str!("default_config.toml");

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("TOML parse error: {0}")]
    Parse(String),
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

#[derive(Deserialize)]
struct ConfigFile {
    build: BuildConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BuildConfig {
    pub max_code_length: usize,
    pub lookahead_window: usize,
    pub min_frequency: u64,
}

impl Default for BuildConfig {
    fn default() -> Self {
        // The embedded defaults are validated by tests, so this cannot fail.
        BuildConfig::from_toml_str(DEFAULT_CONFIG_TOML).expect("embedded default config is valid")
    }
}

impl BuildConfig {
    pub fn from_toml_str(toml_str: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile =
            toml::from_str(toml_str).map_err(|e| ConfigError::Parse(e.to_string()))?;
        file.build.validate()?;
        Ok(file.build)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_code_length == 0 || self.max_code_length > MAX_CODE_LENGTH_LIMIT {
            return Err(ConfigError::InvalidValue {
                field: "max_code_length",
                reason: format!(
                    "{} is outside 1..={MAX_CODE_LENGTH_LIMIT}",
                    self.max_code_length
                ),
            });
        }
        if self.lookahead_window == 0 {
            return Err(ConfigError::InvalidValue {
                field: "lookahead_window",
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }
}

// SPDX-FileCopyrightText: 2026 BGPVPN Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.

use crate::diagnostic::ConfigError;
use crate::model::BgpvpnConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration.
///
/// Collects every problem instead of failing on the first one.
pub fn validate_config(config: &BgpvpnConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.service.driver.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "service.driver must not be empty".to_string(),
        });
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    let level = config.logging.level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "logging.level `{}` is not one of {}",
                config.logging.level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    for name in config.drivers.keys() {
        if name.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: "[drivers] section names must not be empty".to_string(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Check `service.driver` against the names of the available drivers.
pub fn validate_driver(config: &BgpvpnConfig, available: &[&str]) -> Result<(), ConfigError> {
    if available.contains(&config.service.driver.as_str()) {
        Ok(())
    } else {
        Err(ConfigError::unknown_driver(&config.service.driver, available))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&BgpvpnConfig::default()).is_ok());
    }

    #[test]
    fn all_errors_are_collected() {
        let mut config = BgpvpnConfig::default();
        config.service.driver = " ".to_string();
        config.storage.database_path = String::new();
        config.logging.level = "loud".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.iter().any(|e| matches!(
            e,
            ConfigError::Validation { message } if message.contains("logging.level `loud`")
        )));
    }

    #[test]
    fn log_level_is_case_insensitive() {
        let mut config = BgpvpnConfig::default();
        config.logging.level = "DEBUG".to_string();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn known_driver_passes() {
        assert!(validate_driver(&BgpvpnConfig::default(), &["dummy"]).is_ok());
    }

    #[test]
    fn unknown_driver_carries_suggestion() {
        let mut config = BgpvpnConfig::default();
        config.service.driver = "dumm".to_string();
        let err = validate_driver(&config, &["dummy"]).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::UnknownDriver { suggestion: Some(s), .. } if s == "dummy"
        ));
    }
}

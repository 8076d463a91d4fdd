//! Error types for settings operations.

use std::fmt;

use crate::core::config::ConfigError;

/// Errors that can occur when modifying configuration settings.
#[derive(Debug)]
pub enum SettingError {
    /// The provided setting key is not recognized.
    UnknownKey {
        key: String,
        known: Vec<&'static str>,
    },
    /// Required arguments are missing.
    MissingArgs {
        hint: &'static str,
        example: &'static str,
    },
    /// The value was given but is not acceptable for the key.
    InvalidValue {
        key: &'static str,
        input: String,
        reason: &'static str,
    },
    /// Loading or persisting the configuration failed.
    Config(ConfigError),
}

impl SettingError {
    /// Print the error message to stderr with appropriate formatting.
    pub fn print(&self) {
        match self {
            SettingError::UnknownKey { key, known } => {
                eprintln!("❌ Unknown config key: {key}");
                eprintln!("   Available keys: {}", known.join(", "));
            }
            SettingError::MissingArgs { hint, example } => {
                eprintln!("⚠️  {hint}");
                eprintln!("Example: {example}");
            }
            SettingError::InvalidValue { key, input, reason } => {
                eprintln!("❌ Invalid value for {key}: {input}");
                eprintln!("   {reason}");
            }
            SettingError::Config(err) => {
                eprintln!("❌ Failed to save configuration: {err}");
            }
        }
    }
}

impl fmt::Display for SettingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingError::UnknownKey { key, .. } => write!(f, "Unknown config key: {key}"),
            SettingError::MissingArgs { hint, .. } => write!(f, "{hint}"),
            SettingError::InvalidValue { key, input, reason } => {
                write!(f, "Invalid value for {key}: {input} ({reason})")
            }
            SettingError::Config(err) => write!(f, "Config error: {err}"),
        }
    }
}

impl std::error::Error for SettingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SettingError::Config(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ConfigError> for SettingError {
    fn from(err: ConfigError) -> Self {
        SettingError::Config(err)
    }
}

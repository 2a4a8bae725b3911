use std::error::Error;
use std::fmt;

use geosense_proto::{SensorKind, WireError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    MissingOption { key: String },
    InvalidOption { key: String, message: String },
    ConflictingOption { key: String },
    ReadConfig { path: String, message: String },
    ParseConfig { message: String },
    RenderConfig { message: String },
    Table { path: String, message: String },
}

impl ConfigError {
    pub fn missing(key: impl Into<String>) -> Self {
        ConfigError::MissingOption { key: key.into() }
    }

    pub fn invalid(key: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::InvalidOption {
            key: key.into(),
            message: message.into(),
        }
    }

    pub fn table(path: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::Table {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingOption { key } => write!(f, "missing config option: {key}"),
            ConfigError::InvalidOption { key, message } => {
                write!(f, "invalid config option {key}: {message}")
            }
            ConfigError::ConflictingOption { key } => {
                write!(f, "config option declared twice with different kinds: {key}")
            }
            ConfigError::ReadConfig { path, message } => {
                write!(f, "read config file failed ({path}): {message}")
            }
            ConfigError::ParseConfig { message } => write!(f, "parse config failed: {message}"),
            ConfigError::RenderConfig { message } => write!(f, "render config failed: {message}"),
            ConfigError::Table { path, message } => write!(f, "table {path}: {message}"),
        }
    }
}

impl Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SensorError {
    Config(ConfigError),
    Wire(WireError),
    /// No contract registered for the kind. This is a wiring defect, never a
    /// user input problem.
    UnknownSensorType { kind: SensorKind },
    KindMismatch {
        expected: SensorKind,
        actual: SensorKind,
    },
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SensorError::Config(err) => write!(f, "{err}"),
            SensorError::Wire(err) => write!(f, "{err}"),
            SensorError::UnknownSensorType { kind } => {
                write!(f, "no sensor contract registered for {kind}")
            }
            SensorError::KindMismatch { expected, actual } => write!(
                f,
                "sensor kind mismatch: expected={expected} actual={actual}"
            ),
        }
    }
}

impl Error for SensorError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            SensorError::Config(err) => Some(err),
            SensorError::Wire(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ConfigError> for SensorError {
    fn from(error: ConfigError) -> Self {
        SensorError::Config(error)
    }
}

impl From<WireError> for SensorError {
    fn from(error: WireError) -> Self {
        SensorError::Wire(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_option_names_the_key() {
        let err = ConfigError::missing("magnetism.sensorLocations");
        assert_eq!(
            err.to_string(),
            "missing config option: magnetism.sensorLocations"
        );
    }

    #[test]
    fn sensor_error_wraps_sources() {
        let err = SensorError::from(WireError::malformed("short read"));
        assert!(err.to_string().contains("short read"));
        assert!(err.source().is_some());

        let err = SensorError::UnknownSensorType {
            kind: SensorKind::Thermal,
        };
        assert!(err.to_string().contains("thermal"));
        assert!(err.source().is_none());
    }
}

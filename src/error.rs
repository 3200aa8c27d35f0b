//! Error types for ckfind.

use thiserror::Error;

/// Errors related to the specification store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("invalid specification name: {0:?}")]
    InvalidName(String),

    #[error("specification not found: {0}")]
    NotFound(String),
}

/// Errors related to configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerializeError(#[from] toml::ser::Error),

    #[error("path error: {0}")]
    PathError(String),
}

/// Infrastructure failures while launching the search program.
///
/// These never escape [`crate::services::execute`]; they are logged and
/// reported as [`crate::services::INFRASTRUCTURE_FAILURE`] in the result.
#[derive(Debug, Error)]
pub enum ExecError {
    #[error("empty command")]
    EmptyCommand,

    #[error("failed to spawn {program}: {source}")]
    SpawnError {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to capture {0}")]
    PipeError(&'static str),

    #[error("failed to wait for child: {0}")]
    WaitError(std::io::Error),
}

/// Application-level errors that wrap domain errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_error_display() {
        let err = ExecError::SpawnError {
            program: "nope".to_string(),
            source: std::io::Error::from_raw_os_error(2),
        };
        assert!(err.to_string().starts_with("failed to spawn nope: "));
    }

    #[test]
    fn test_store_error_display() {
        let err = StoreError::NotFound("my-spec".to_string());
        assert_eq!(err.to_string(), "specification not found: my-spec");
    }

    #[test]
    fn test_app_error_wraps_domain_errors() {
        let err: AppError = StoreError::InvalidName(String::new()).into();
        assert_eq!(err.to_string(), "store error: invalid specification name: \"\"");

        let err: AppError = ConfigError::PathError("no config dir".to_string()).into();
        assert!(matches!(err, AppError::Config(_)));
        assert_eq!(err.to_string(), "config error: path error: no config dir");
    }
}

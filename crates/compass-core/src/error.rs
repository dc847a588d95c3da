use thiserror::Error;

/// Top-level error type for the Compass system.
///
/// Each variant wraps a subsystem-specific error. Subsystem crates define
/// their own error types and implement `From<SubsystemError> for CompassError`
/// so that the `?` operator works seamlessly across crate boundaries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CompassError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Eligibility engine error: {0}")]
    Engine(String),

    #[error("Tool error: {0}")]
    Tool(String),

    #[error("Inference error: {0}")]
    Inference(String),

    #[error("Agent error: {0}")]
    Agent(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for CompassError {
    fn from(err: toml::de::Error) -> Self {
        CompassError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for CompassError {
    fn from(err: toml::ser::Error) -> Self {
        CompassError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for CompassError {
    fn from(err: serde_json::Error) -> Self {
        CompassError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Compass operations.
pub type Result<T> = std::result::Result<T, CompassError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CompassError::Config("missing field".to_string());
        assert_eq!(err.to_string(), "Configuration error: missing field");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let compass_err: CompassError = io_err.into();
        assert!(matches!(compass_err, CompassError::Io(_)));
        assert!(compass_err.to_string().contains("file not found"));
    }

    #[test]
    fn test_error_display_all_variants() {
        let cases: Vec<(CompassError, &str)> = vec![
            (
                CompassError::Config("bad key".to_string()),
                "Configuration error: bad key",
            ),
            (
                CompassError::Engine("negative income".to_string()),
                "Eligibility engine error: negative income",
            ),
            (
                CompassError::Tool("unknown tool".to_string()),
                "Tool error: unknown tool",
            ),
            (
                CompassError::Inference("model timeout".to_string()),
                "Inference error: model timeout",
            ),
            (
                CompassError::Agent("loop exhausted".to_string()),
                "Agent error: loop exhausted",
            ),
            (
                CompassError::Storage("disk full".to_string()),
                "Storage error: disk full",
            ),
            (
                CompassError::Api("unauthorized".to_string()),
                "API error: unauthorized",
            ),
            (
                CompassError::Serialization("invalid json".to_string()),
                "Serialization error: invalid json",
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.to_string(), expected);
        }
    }

    #[test]
    fn test_error_from_toml_de() {
        let bad_toml = "invalid = [[[";
        let err: std::result::Result<toml::Value, _> = toml::from_str(bad_toml);
        assert!(err.is_err());
        let compass_err: CompassError = err.unwrap_err().into();
        assert!(matches!(compass_err, CompassError::Config(_)));
    }

    #[test]
    fn test_error_from_serde_json() {
        let bad_json = "{ invalid json }";
        let err: std::result::Result<serde_json::Value, _> = serde_json::from_str(bad_json);
        assert!(err.is_err());
        let compass_err: CompassError = err.unwrap_err().into();
        assert!(matches!(compass_err, CompassError::Serialization(_)));
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_ok() -> Result<i32> {
            Ok(42)
        }

        fn returns_err() -> Result<i32> {
            Err(CompassError::Config("fail".to_string()))
        }

        assert_eq!(returns_ok().unwrap(), 42);
        assert!(returns_err().is_err());
    }

    #[test]
    fn test_error_debug_impl() {
        let err = CompassError::Engine("test debug".to_string());
        let debug_str = format!("{:?}", err);
        assert!(debug_str.contains("Engine"));
        assert!(debug_str.contains("test debug"));
    }
}

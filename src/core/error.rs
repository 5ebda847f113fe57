use thiserror::Error;

use crate::fonts::FontError;

/// Core error types for designkit
#[derive(Debug, Error)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Font could not be loaded into the active font set
    #[error("Font error: {0}")]
    Font(#[from] FontError),

    /// Number could not be rounded to the requested precision
    #[error("Cannot round {value} to {digits} digits (maximum is {max})")]
    Rounding { value: f64, digits: usize, max: usize },

    /// Configuration could not be located or is invalid
    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rounding_message_names_limits() {
        let err = Error::Rounding {
            value: 1.5,
            digits: 120,
            max: 100,
        };
        let msg = err.to_string();
        assert!(msg.contains("120"));
        assert!(msg.contains("100"));
    }

    #[test]
    fn test_font_error_converts() {
        let err: Error = FontError::MissingFamily.into();
        assert!(matches!(err, Error::Font(FontError::MissingFamily)));
        assert!(err.to_string().starts_with("Font error"));
    }

    #[test]
    fn test_json_error_converts() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Serialization(_)));
    }
}

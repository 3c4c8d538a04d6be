//! Error types for the column adapter layer.

/// Result type alias for grid operations.
pub type Result<T> = std::result::Result<T, GridError>;

/// Errors that can occur while wiring columns to a grid.
///
/// Only programming errors and configuration failures are reported. A column
/// without a cell, or a click handler outliving its column, are valid states
/// and never produce an error.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    /// An event id outside the recognized set, or an event the target
    /// cannot handle.
    #[error("Unsupported event '{0}'")]
    UnsupportedEvent(String),

    /// The grid was asked to take a column while it is being dropped.
    #[error("Grid is being dropped")]
    GridDropped,

    /// A configuration value is out of range or inconsistent.
    #[error("Invalid value for '{field}': {message}")]
    InvalidConfig { field: String, message: String },

    /// TOML configuration could not be parsed.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A configuration snapshot could not be written as TOML.
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// JSON configuration could not be parsed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GridError {
    /// Create an unsupported-event error.
    pub fn unsupported_event(id: impl Into<String>) -> Self {
        Self::UnsupportedEvent(id.into())
    }

    /// Create an invalid-configuration error.
    pub fn invalid_config(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(GridError::GridDropped.to_string(), "Grid is being dropped");
        assert_eq!(
            GridError::unsupported_event("row-activated").to_string(),
            "Unsupported event 'row-activated'"
        );
        let err = GridError::invalid_config("width", "must not be negative");
        assert_eq!(err.to_string(), "Invalid value for 'width': must not be negative");
        assert!(!matches!(err, GridError::GridDropped));
    }
}

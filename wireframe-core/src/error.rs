//! Error types for loading meshes and configuring instances.

use thiserror::Error;

/// Result type alias for wireframe operations.
pub type WireframeResult<T> = Result<T, WireframeError>;

/// Errors raised while fetching or parsing a mesh resource.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    /// The resource could not be fetched.
    #[error("failed to fetch mesh: {0}")]
    Fetch(String),

    /// The resource was fetched but is not a mesh.
    #[error("failed to parse mesh: {0}")]
    Parse(String),
}

impl LoadError {
    /// Create a fetch error.
    #[must_use]
    pub fn fetch(details: impl Into<String>) -> Self {
        Self::Fetch(details.into())
    }

    /// Create a parse error.
    #[must_use]
    pub fn parse(details: impl Into<String>) -> Self {
        Self::Parse(details.into())
    }
}

/// Errors raised when options are rejected at attach or reconfigure time.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// No mesh location was given.
    #[error("missing required option `url`")]
    MissingUrl,

    /// The frame rate is not a positive integer.
    #[error("fps must be at least 1, got {0}")]
    InvalidFps(f64),

    /// The initial zoom is below the minimum of 1.
    #[error("zoom must be at least 1, got {0}")]
    InvalidZoom(f64),

    /// The line width is negative or not a finite number.
    #[error("line width must be a non-negative number, got {0}")]
    InvalidLineWidth(f64),

    /// The options object itself could not be read.
    #[error("invalid options: {0}")]
    InvalidOptions(String),
}

/// Any failure surfaced to a host.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WireframeError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LoadError::fetch("404 Not Found");
        assert!(format!("{err}").contains("404"));

        let err = LoadError::parse("missing vertex count");
        assert!(format!("{err}").contains("vertex count"));

        let err: WireframeError = ConfigError::MissingUrl.into();
        assert!(format!("{err}").contains("url"));
    }
}

//! Common error types for the map analyzer
//!
//! This module provides standardized error handling across all passes
//! so the library surfaces bad inputs instead of panicking.

use std::fmt;

/// Core error type for the map analyzer
#[derive(Debug, Clone)]
pub enum AnalyzerError {
    /// Caller-supplied grids or indices are inconsistent
    InvalidArguments(String),

    /// Map file loading and serialization errors
    MapLoading(String),

    /// Report writing errors
    Report(String),
}

impl fmt::Display for AnalyzerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalyzerError::InvalidArguments(msg) => write!(f, "Invalid Arguments: {}", msg),
            AnalyzerError::MapLoading(msg) => write!(f, "Map Loading Error: {}", msg),
            AnalyzerError::Report(msg) => write!(f, "Report Error: {}", msg),
        }
    }
}

impl std::error::Error for AnalyzerError {}

/// Convenient Result type alias
pub type Result<T> = std::result::Result<T, AnalyzerError>;

/// Error conversion helpers
impl AnalyzerError {
    /// Create an invalid-arguments error
    pub fn invalid_arguments<S: Into<String>>(msg: S) -> Self {
        Self::InvalidArguments(msg.into())
    }

    /// Create a map-loading error
    pub fn map_loading<S: Into<String>>(msg: S) -> Self {
        Self::MapLoading(msg.into())
    }

    /// Create a report error
    pub fn report<S: Into<String>>(msg: S) -> Self {
        Self::Report(msg.into())
    }
}

impl From<std::io::Error> for AnalyzerError {
    fn from(e: std::io::Error) -> Self {
        AnalyzerError::map_loading(format!("IO error: {}", e))
    }
}

impl From<serde_json::Error> for AnalyzerError {
    fn from(e: serde_json::Error) -> Self {
        AnalyzerError::report(format!("JSON serialization error: {}", e))
    }
}

impl From<ron::Error> for AnalyzerError {
    fn from(e: ron::Error) -> Self {
        AnalyzerError::map_loading(format!("RON serialization error: {}", e))
    }
}

impl From<ron::error::SpannedError> for AnalyzerError {
    fn from(e: ron::error::SpannedError) -> Self {
        AnalyzerError::map_loading(format!("RON parse error: {}", e))
    }
}

//! Error types for the fit_style library
//!
//! Ordinary missing data is never an error here: evaluators report it through
//! their `status` fields. These variants cover genuine programmer errors
//! (unknown enum strings) and the detector's I/O before it degrades to
//! "no color".

use std::time::Duration;

use thiserror::Error;

/// Result type alias for fit_style operations
pub type Result<T> = std::result::Result<T, EngineError>;

/// Error types for engine operations
#[derive(Error, Debug)]
pub enum EngineError {
    /// Image bytes could not be read or decoded
    #[error("Failed to load image: {message}")]
    ImageLoadError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Remote image could not be downloaded
    #[error("Failed to fetch image {url}: {message}")]
    ImageFetchError {
        url: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Fetch-and-decode exceeded its time budget
    #[error("Image fetch timed out after {}ms: {reference}", .limit.as_millis())]
    FetchTimeout { reference: String, limit: Duration },

    /// Decoded image holds no usable pixels
    #[error("Image has no usable pixels: {reason}")]
    EmptyImage { reason: String },

    /// Color space conversion or parsing error
    #[error("Color conversion error: {message}")]
    ColorConversionError { message: String },

    /// Invalid input parameters
    #[error("Invalid parameter: {parameter} = {value}")]
    InvalidParameter { parameter: String, value: String },

    /// Configuration file could not be read or written
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl EngineError {
    /// Create an image load error with context
    pub fn image_load<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::ImageLoadError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an image fetch error with context
    pub fn image_fetch<E>(url: impl Into<String>, message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::ImageFetchError {
            url: url.into(),
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a configuration error with context
    pub fn config<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::ConfigError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an invalid-parameter error
    pub fn invalid(parameter: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidParameter {
            parameter: parameter.into(),
            value: value.into(),
        }
    }

    /// Check if this error indicates a transient condition worth retrying
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            EngineError::ImageFetchError { .. } | EngineError::FetchTimeout { .. }
        )
    }

    /// Get user-friendly error description for application display
    pub fn user_message(&self) -> String {
        match self {
            EngineError::ImageLoadError { .. } | EngineError::EmptyImage { .. } => {
                "We couldn't read this garment photo. Try picking the color manually.".to_string()
            }
            EngineError::ImageFetchError { .. } | EngineError::FetchTimeout { .. } => {
                "The garment photo took too long to load. Check your connection and try again."
                    .to_string()
            }
            EngineError::InvalidParameter { parameter, .. } => {
                format!("Some garment details look wrong ({parameter}). Please review them.")
            }
            _ => "Something went wrong while analyzing this garment.".to_string(),
        }
    }
}

//! Error types and handling for `TravelSynth`

use thiserror::Error;

/// Shown for every failed generation call regardless of the cause.
pub const GENERATION_FAILED_MESSAGE: &str =
    "Failed to generate the travel guide. Please verify the URLs or try again later.";

/// Shown when a request carries no usable URL.
pub const NO_URLS_MESSAGE: &str = "Please enter at least one URL to analyze.";

/// Main error type for the `TravelSynth` application
#[derive(Error, Debug)]
pub enum TravelSynthError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Input validation errors, raised before any network call
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// The generation service could not produce a guide
    #[error("Generation failed: {message}")]
    Generation { message: String },

    /// A guide is already being generated for this session
    #[error("A guide is already being generated")]
    Busy,

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl TravelSynthError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new generation error carrying the generic user-facing message
    pub fn generation() -> Self {
        Self::Generation {
            message: GENERATION_FAILED_MESSAGE.to_string(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            TravelSynthError::Config { .. } => {
                "Configuration error. Please check your config file and Gemini API key.".to_string()
            }
            TravelSynthError::Validation { message } | TravelSynthError::Generation { message } => {
                message.clone()
            }
            TravelSynthError::Busy => {
                "A guide is already being generated. Please wait for it to finish.".to_string()
            }
            TravelSynthError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
        }
    }
}

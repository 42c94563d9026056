//! Error types for the Songclip client.
//!
//! Every failure of an endpoint call carries the name of the operation that
//! produced it. Callers that need to react differently to a remote rejection
//! and to a broken connection should match on [`SongclipError::kind`]
//! instead of inspecting messages.

use serde_json::Value;
use std::path::PathBuf;
use thiserror::Error;

/// Coarse classification of a [`SongclipError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Network, timeout, non-2xx status, or a body that cannot be coded.
    Transport,
    /// Well-formed response whose `status` is not `"success"`.
    Application,
    /// Client construction or configuration loading failed.
    Config,
}

/// Errors that can occur while talking to the Songclip API.
#[derive(Error, Debug)]
pub enum SongclipError {
    /// The request could not be sent or the response could not be read.
    #[error("[Songclip][{operation}] {source}")]
    Transport {
        /// Operation that issued the request.
        operation: &'static str,
        /// The underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// The endpoint answered with a non-2xx status.
    #[error("[Songclip][{operation}] HTTP {status}: {body}")]
    HttpStatus {
        /// Operation that issued the request.
        operation: &'static str,
        /// HTTP status code returned.
        status: u16,
        /// Response body, truncated.
        body: String,
    },

    /// The response body was not valid JSON.
    #[error("[Songclip][{operation}] malformed response body: {source}")]
    Decode {
        /// Operation that issued the request.
        operation: &'static str,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// The request context could not be serialized.
    #[error("[Songclip][{operation}] failed to encode request: {source}")]
    Encode {
        /// Operation that built the request.
        operation: &'static str,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// The endpoint reported a non-success status.
    #[error("[Songclip][{operation}] {payload}")]
    Application {
        /// Operation that issued the request.
        operation: &'static str,
        /// The `data` member of the response envelope.
        payload: Value,
    },

    /// The HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),

    /// Failed to read a configuration file.
    #[error("failed to read config file '{path}': {source}")]
    ConfigFileRead {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse a configuration file.
    #[error("failed to parse config file '{path}': {source}")]
    ConfigParse {
        /// Path to the file that could not be parsed.
        path: PathBuf,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl SongclipError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Transport { .. }
            | Self::HttpStatus { .. }
            | Self::Decode { .. }
            | Self::Encode { .. } => ErrorKind::Transport,
            Self::Application { .. } => ErrorKind::Application,
            Self::HttpClient(_)
            | Self::ConfigFileRead { .. }
            | Self::ConfigParse { .. }
            | Self::InvalidConfig(_) => ErrorKind::Config,
        }
    }

    /// Name of the operation that failed, if this error came from an endpoint call.
    pub fn operation(&self) -> Option<&'static str> {
        match self {
            Self::Transport { operation, .. }
            | Self::HttpStatus { operation, .. }
            | Self::Decode { operation, .. }
            | Self::Encode { operation, .. }
            | Self::Application { operation, .. } => Some(*operation),
            _ => None,
        }
    }

    /// The response payload of an application-level failure.
    pub fn payload(&self) -> Option<&Value> {
        match self {
            Self::Application { payload, .. } => Some(payload),
            _ => None,
        }
    }
}

/// Result type alias for Songclip operations.
pub type Result<T> = std::result::Result<T, SongclipError>;

//! Error types for the coaching pipeline.
//!
//! Three kinds reach the caller from a generation request: the provider
//! failed, its text held no usable JSON object, or the object broke the
//! flavor's contract. Each carries a stable code so clients can tell
//! "try again later" apart from "the prompt template needs fixing".

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::pipeline::Stage;

/// The completion provider could not produce text.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("completion provider timed out")]
    Timeout,

    #[error("completion provider unreachable: {0}")]
    Transport(String),

    #[error("completion provider returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("completion provider sent an unreadable envelope: {0}")]
    Envelope(String),

    #[error("completion provider envelope has no choices[0].message.content")]
    MissingCompletion,
}

impl From<reqwest::Error> for ProviderError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ProviderError::Timeout
        } else if e.is_decode() {
            ProviderError::Envelope(e.to_string())
        } else {
            ProviderError::Transport(e.to_string())
        }
    }
}

/// No JSON object could be pulled out of the raw completion.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("no JSON object delimiters found")]
    NoDelimiters,

    #[error("malformed JSON: {0}")]
    Malformed(String),
}

/// How a contract key was violated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    Missing,
    Empty,
    Malformed(String),
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Violation::Missing => f.write_str("missing"),
            Violation::Empty => f.write_str("empty"),
            Violation::Malformed(detail) => write!(f, "malformed-shape ({detail})"),
        }
    }
}

/// The first contract key the model got wrong.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("AI response field `{field}` is {violation}")]
pub struct ValidationError {
    pub field: String,
    pub violation: Violation,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, violation: Violation) -> Self {
        Self {
            field: field.into(),
            violation,
        }
    }
}

/// A generation request that failed after rendering.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl PipelineError {
    /// Stable taxonomy code surfaced to clients.
    pub fn code(&self) -> &'static str {
        match self {
            PipelineError::Provider(_) => "provider_error",
            PipelineError::Extraction(_) => "extraction_error",
            PipelineError::Validation(_) => "validation_error",
        }
    }

    /// Stage the request was in when it failed.
    pub fn stage(&self) -> Stage {
        match self {
            PipelineError::Provider(_) => Stage::Completing,
            PipelineError::Extraction(_) => Stage::Extracting,
            PipelineError::Validation(_) => Stage::Validating,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            PipelineError::Provider(_) => StatusCode::SERVICE_UNAVAILABLE,
            PipelineError::Extraction(_) | PipelineError::Validation(_) => {
                StatusCode::BAD_GATEWAY
            }
        }
    }

    fn detail(&self) -> String {
        match self {
            PipelineError::Provider(e) => format!("AI service unavailable: {e}"),
            PipelineError::Extraction(e) => format!("AI response was not usable: {e}"),
            PipelineError::Validation(e) => e.to_string(),
        }
    }
}

/// The caller's parameters were rejected before any provider call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid `{field}`: {reason}")]
pub struct RequestError {
    pub field: &'static str,
    pub reason: String,
}

impl RequestError {
    pub fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

/// Startup configuration problems.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has invalid value `{value}`")]
    Invalid { name: &'static str, value: String },

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Body of every failure response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub detail: String,
}

/// Anything a generation handler can fail with.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Body(#[from] JsonRejection),

    #[error(transparent)]
    Request(#[from] RequestError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ApiError::Body(e) => (
                e.status(),
                ErrorBody {
                    code: "invalid_request",
                    detail: e.body_text(),
                },
            ),
            ApiError::Request(e) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorBody {
                    code: "invalid_request",
                    detail: e.to_string(),
                },
            ),
            ApiError::Pipeline(e) => (
                e.status(),
                ErrorBody {
                    code: e.code(),
                    detail: e.detail(),
                },
            ),
        };
        (status, Json(body)).into_response()
    }
}

impl IntoResponse for PipelineError {
    fn into_response(self) -> Response {
        ApiError::Pipeline(self).into_response()
    }
}

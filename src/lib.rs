//! Just-in-time classroom coach.
//!
//! Teachers ask for coaching advice, lesson plans, activities, parent
//! messages and video suggestions. Each request renders a prompt, asks a
//! chat-completion model, and only answers once the model's JSON has passed
//! the flavor's [`contract::ResponseContract`].

pub mod api;
pub mod completion;
pub mod config;
pub mod contract;
pub mod error;
pub mod extract;
pub mod pipeline;
pub mod prompt;
pub mod requests;
pub mod videos;

pub use completion::{CompletionClient, GroqClient};
pub use config::{CompletionConfig, Settings};
pub use error::{ApiError, ExtractionError, PipelineError, ProviderError, ValidationError, Violation};
pub use pipeline::{run, Stage};
pub use prompt::{Flavor, PromptSpec};

/// Install the `tracing` subscriber used by the binaries. `RUST_LOG`
/// overrides the default `info` filter.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

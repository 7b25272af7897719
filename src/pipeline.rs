//! One request through render → complete → extract → validate.
//!
//! Every flavor goes through [`run`]; only the template and the contract
//! differ. Stages run once each, in order, and the first failure ends the
//! request.

use serde_json::{Map, Value};
use tracing::{info, info_span, warn, Instrument};

use crate::completion::CompletionClient;
use crate::error::PipelineError;
use crate::extract::parse_object;
use crate::prompt::PromptSpec;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Rendering,
    Completing,
    Extracting,
    Validating,
    Done,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Rendering => "rendering",
            Stage::Completing => "completing",
            Stage::Extracting => "extracting",
            Stage::Validating => "validating",
            Stage::Done => "done",
        };
        f.write_str(name)
    }
}

/// Run `spec` against `client` and return the contract-checked object.
pub async fn run(
    client: &dyn CompletionClient,
    spec: &PromptSpec,
) -> Result<Map<String, Value>, PipelineError> {
    let flavor = spec.flavor();
    let span = info_span!("pipeline", flavor = flavor.name());
    run_stages(client, spec).instrument(span).await
}

async fn run_stages(
    client: &dyn CompletionClient,
    spec: &PromptSpec,
) -> Result<Map<String, Value>, PipelineError> {
    let prompt = spec.render();

    let raw = client.complete(&prompt).await.map_err(|e| {
        warn!(stage = %Stage::Completing, error = %e, "completion failed");
        PipelineError::from(e)
    })?;

    let map = parse_object(&raw).map_err(|e| {
        warn!(stage = %Stage::Extracting, error = %e, raw = %raw, "no usable JSON in completion");
        PipelineError::from(e)
    })?;

    let validated = spec.contract().validate(map).map_err(|e| {
        warn!(stage = %Stage::Validating, error = %e, raw = %raw, "completion broke the contract");
        PipelineError::from(e)
    })?;

    info!(stage = %Stage::Done, "pipeline finished");
    Ok(validated)
}

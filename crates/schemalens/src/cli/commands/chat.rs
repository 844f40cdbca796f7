use anyhow::Result;
use clap::Args;
use serde_json::json;

use super::{CommandContext, open_store, print_envelope};
use crate::chat::answer_question;
use crate::config::GeneratorSettings;
use crate::error::ChatError;
use crate::generation::{DisabledGenerator, HttpCompletionClient, TextGenerator};
use crate::models::ResponseEnvelope;

const COMMAND: &str = "chat";

#[derive(Debug, Clone, Args)]
pub struct ChatArgs {
    #[arg(value_name = "MESSAGE")]
    pub message: Option<String>,

    /// Skip text generation.
    #[arg(long, default_value_t = false)]
    pub offline: bool,
}

pub fn run(args: &ChatArgs, context: &CommandContext) -> Result<()> {
    let message = args.message.as_deref().unwrap_or_default();
    if message.trim().is_empty() {
        return Err(boundary_failure(&ChatError::MissingMessage, "message_required"));
    }

    let store = open_store(context, COMMAND)?;
    let http_client;
    let generator: &dyn TextGenerator = if args.offline {
        &DisabledGenerator
    } else {
        let settings = GeneratorSettings::from_process_env(context.generator.clone())
            .map_err(|error| {
                ResponseEnvelope::error(COMMAND, "llm_settings_invalid", format!("{error:#}"))
                    .into_failure()
            })?;
        http_client = HttpCompletionClient::new(settings)?;
        &http_client
    };

    let answer = match answer_question(generator, &store, message) {
        Ok(answer) => answer,
        Err(error @ ChatError::MissingMessage) => {
            return Err(boundary_failure(&error, "message_required"));
        }
        Err(error @ ChatError::NoInsights) => {
            return Err(boundary_failure(&error, "no_insights"));
        }
        Err(ChatError::Store(error)) => {
            return Err(anyhow::Error::new(error).context("failed to read latest report"));
        }
    };

    let envelope = ResponseEnvelope::ok(COMMAND, serde_json::to_value(&answer)?)
        .with_meta("load_id", json!(answer.load_id));
    print_envelope(&envelope)
}

fn boundary_failure(error: &ChatError, code: &str) -> anyhow::Error {
    ResponseEnvelope::error(COMMAND, code, error.to_string()).into_failure()
}

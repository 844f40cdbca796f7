//! Text-generation collaborator: prompt in, best-effort text out.

pub mod extract;
pub mod http;

use crate::error::GenerationError;

pub use self::extract::{extract_json, extract_object};
pub use self::http::HttpCompletionClient;

pub trait TextGenerator {
    fn complete(&self, prompt: &str) -> Result<String, GenerationError>;
}

/// Offline generator; every call fails with [`GenerationError::Disabled`] so
/// each stage takes its degraded path.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledGenerator;

impl TextGenerator for DisabledGenerator {
    fn complete(&self, _prompt: &str) -> Result<String, GenerationError> {
        Err(GenerationError::Disabled)
    }
}

/// Runs one completion and extracts a JSON object, degrading to an empty
/// mapping on any failure.
pub fn complete_object(
    generator: &dyn TextGenerator,
    stage: &str,
    prompt: &str,
) -> serde_json::Map<String, serde_json::Value> {
    match generator.complete(prompt) {
        Ok(text) => extract_object(&text),
        Err(GenerationError::Disabled) => {
            tracing::debug!(stage, "text generation disabled; using empty response");
            serde_json::Map::new()
        }
        Err(error) => {
            tracing::warn!(stage, %error, "text generation failed; using empty response");
            serde_json::Map::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{DisabledGenerator, TextGenerator, complete_object};
    use crate::error::GenerationError;

    struct Canned(&'static str);

    impl TextGenerator for Canned {
        fn complete(&self, _prompt: &str) -> Result<String, GenerationError> {
            Ok(self.0.to_string())
        }
    }

    #[test]
    fn disabled_generator_degrades_to_empty_object() {
        assert!(matches!(
            DisabledGenerator.complete("anything"),
            Err(GenerationError::Disabled)
        ));
        assert!(complete_object(&DisabledGenerator, "kpi", "prompt").is_empty());
    }

    #[test]
    fn completion_text_is_extracted() {
        let object = complete_object(&Canned("```json\n{\"kpis\": []}\n```"), "kpi", "prompt");
        assert!(object.contains_key("kpis"));
    }
}

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use serde::Serialize;
use serde_json::{Value, json};

use crate::utils::time::now_utc_timestamp;

pub const ENVELOPE_SCHEMA_VERSION: &str = "schemalens.envelope.v1";

/// `code` + human-readable `message`; errors may carry structured details.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notice {
    pub code: String,
    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl Notice {
    fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }
}

/// Document every command prints on stdout, on success and on boundary
/// failure alike.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseEnvelope {
    pub ok: bool,
    pub command: String,
    pub generated_at_utc: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,

    pub meta: BTreeMap<String, Value>,
    pub warnings: Vec<Notice>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<Notice>,
}

impl ResponseEnvelope {
    #[must_use]
    pub fn ok(command: impl Into<String>, data: Value) -> Self {
        Self::new(command.into(), Some(data), None)
    }

    #[must_use]
    pub fn error(
        command: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(command.into(), None, Some(Notice::new(code, message)))
    }

    fn new(command: String, data: Option<Value>, error: Option<Notice>) -> Self {
        Self {
            ok: error.is_none(),
            command,
            generated_at_utc: now_utc_timestamp(),
            data,
            meta: BTreeMap::from([(
                "schema_version".to_string(),
                json!(ENVELOPE_SCHEMA_VERSION),
            )]),
            warnings: Vec::new(),
            error,
        }
    }

    #[must_use]
    pub fn with_meta(mut self, key: impl Into<String>, value: Value) -> Self {
        self.meta.insert(key.into(), value);
        self
    }

    #[must_use]
    pub fn with_warning(mut self, code: impl Into<String>, message: impl Into<String>) -> Self {
        self.warnings.push(Notice::new(code, message));
        self
    }

    /// No-op on a success envelope.
    #[must_use]
    pub fn with_error_details(mut self, details: Value) -> Self {
        if let Some(error) = self.error.as_mut() {
            error.details = Some(details);
        }
        self
    }

    /// Wraps an error envelope as an `anyhow` boundary failure.
    #[must_use]
    pub fn into_failure(self) -> anyhow::Error {
        anyhow::Error::new(EnvelopeCommandFailure { envelope: self })
    }
}

/// Boundary failure; `main` prints its envelope and exits with code 2.
#[derive(Debug, Clone)]
pub struct EnvelopeCommandFailure {
    envelope: ResponseEnvelope,
}

impl EnvelopeCommandFailure {
    #[must_use]
    pub fn envelope(&self) -> &ResponseEnvelope {
        &self.envelope
    }
}

impl Display for EnvelopeCommandFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.envelope.error {
            Some(error) => write!(
                f,
                "{}: {} ({})",
                self.envelope.command, error.message, error.code
            ),
            None => write!(f, "{}: failed", self.envelope.command),
        }
    }
}

impl std::error::Error for EnvelopeCommandFailure {}

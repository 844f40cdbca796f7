use thiserror::Error;

/// Failure of a single data-source invocation (catalog read or row execution).
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("query rejected by read-only guardrail: {0}")]
    Guardrail(String),

    #[error("failed to prepare query: {0}")]
    Prepare(#[source] rusqlite::Error),

    #[error("failed to execute query: {0}")]
    Execute(#[source] rusqlite::Error),

    #[error("failed to decode query row: {0}")]
    Decode(#[source] rusqlite::Error),

    #[error("query returned no rows")]
    Empty,
}

/// Failure of a single call to the text-generation collaborator.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("text generation is disabled")]
    Disabled,

    #[error("completion request failed: {0}")]
    Transport(String),

    #[error("completion endpoint returned http {status}: {body}")]
    Status { status: u16, body: String },

    #[error("completion response carried no message content")]
    EmptyResponse,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("report store query failed: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("failed to encode report document: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Explicit rejection of an untrusted plan entry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanRejection {
    #[error("plan entry is not an object")]
    NotAnObject,

    #[error("plan entry is missing field `{0}`")]
    MissingField(&'static str),

    #[error("unknown check type `{0}`")]
    UnknownCheckType(String),

    #[error("unknown table `{0}`")]
    UnknownTable(String),

    #[error("unknown column `{table}.{column}`")]
    UnknownColumn { table: String, column: String },

    #[error("unsafe sql: {0}")]
    UnsafeSql(String),
}

/// Boundary failures of conversational answering.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Message is required")]
    MissingMessage,

    #[error("No insights available to answer questions")]
    NoInsights,

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub mod envelope;
pub mod report;
pub mod value;

pub use envelope::{EnvelopeCommandFailure, ResponseEnvelope};
pub use report::{
    Chart, CheckKind, ColumnInfo, Issue, Kpi, Metadata, Narrative, Profile, QualityAssessment,
    Relationship, Report, Signal, TableProfile, json_schema,
};
pub use value::{DataRow, DataValue};

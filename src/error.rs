// src/error.rs
use thiserror::Error;

/// Recoverable failures raised by the guide core. Every variant is turned into
/// a safe state plus a message by the session; none of them is fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GuideError {
    #[error("test \"{0}\" is not in the catalog yet")]
    TestNotFound(String),

    #[error("unknown guided workflow \"{0}\"")]
    UnknownWorkflow(String),

    #[error("decision node \"{0}\" does not exist")]
    MissingNode(String),

    #[error("at least {min} groups are required to pivot")]
    PivotMinimum { min: usize },

    #[error("this test does not support the wide-to-long transform")]
    PivotNotAllowed,

    #[error("column {index} does not exist (only {len} columns)")]
    ColumnOutOfRange { index: usize, len: usize },

    #[error("\"{0}\" is not one of the available variables")]
    UnknownVariable(String),
}

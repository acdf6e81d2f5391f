//! Error types for scheduling runs.

use crate::solver::oracle::ConflictCertificate;

/// Result type for scheduling operations
pub type ScheduleResult<T> = Result<T, ScheduleError>;

/// Error type for scheduling operations
#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    /// Malformed input records: bad slot-interval strings, missing fields,
    /// unparseable numbers. Raised before any model construction starts.
    #[error("Data format error: {0}")]
    DataFormat(String),

    /// A structural invariant of the built model does not hold. Indicates a
    /// defect in construction, not a recoverable condition.
    #[error("Model construction error: {0}")]
    ModelConstruction(String),

    /// The oracle proved the model has no feasible assignment.
    #[error("Model is infeasible: {certificate}")]
    Infeasible { certificate: ConflictCertificate },

    /// The oracle finished with a status that is neither optimal nor
    /// infeasible. The raw status is preserved verbatim.
    #[error("Oracle returned status: {0}")]
    OracleStatus(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ScheduleError {
    pub fn data_format(msg: impl Into<String>) -> Self {
        ScheduleError::DataFormat(msg.into())
    }

    pub fn model_construction(msg: impl Into<String>) -> Self {
        ScheduleError::ModelConstruction(msg.into())
    }

    pub fn infeasible(certificate: ConflictCertificate) -> Self {
        ScheduleError::Infeasible { certificate }
    }

    pub fn oracle_status(status: impl Into<String>) -> Self {
        ScheduleError::OracleStatus(status.into())
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        ScheduleError::Configuration(msg.into())
    }
}

impl From<csv::Error> for ScheduleError {
    fn from(e: csv::Error) -> Self {
        ScheduleError::DataFormat(format!("CSV error: {}", e))
    }
}

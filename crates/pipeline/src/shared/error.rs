use thiserror::Error;

/// Failure classes of a pipeline run. Every variant is fatal to the run;
/// recoverable row-level problems are counted, not raised.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("parse error: {0}")]
    Parse(String),

    #[error("timezone conversion failed: {0}")]
    TimezoneConversion(String),

    #[error("unknown timezone '{0}'")]
    UnknownTimezone(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

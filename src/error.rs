use thiserror::Error;

/// Errors raised by the detection pipeline.
///
/// Absence of candidates or matches is never an error; it is reported as an
/// empty match list on the corresponding region.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The coarse mapper could not build an index for a reference region.
    /// Fatal for the current record; never retried.
    #[error("failed to initialize mapper index for {region}: {reason}")]
    ToolInitialization { region: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

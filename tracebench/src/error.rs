//! Errors surfaced by the workload driver.

use thiserror::Error;

/// Failures while talking to the benchmark controller.
///
/// Both variants are fatal to the run: timing comparisons are meaningless
/// once a batch boundary is lost, so the driver gives up rather than retry.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BenchError {
    /// The controller could not be reached, or answered a fetch/report with
    /// a failure status.
    #[error("controller transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    /// The control response body did not deserialize into a
    /// [`ControlDescriptor`](crate::ControlDescriptor).
    #[error("malformed control descriptor: {0}")]
    MalformedDescriptor(#[from] serde_json::Error),
}

/// Result type used across the driver.
pub type BenchResult<T> = Result<T, BenchError>;

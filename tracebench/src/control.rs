//! Control-plane data model shared with the benchmark controller.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// One batch worth of work, fetched from the controller.
///
/// Field names mirror the controller's JSON wire format. A descriptor is
/// consumed for exactly one batch of [`repeat`](Self::repeat) iterations and
/// then discarded. Fields older controller versions do not send default to
/// zero/false; unknown fields (`Concurrent`, `Profile`) are ignored.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ControlDescriptor {
    /// Number of work+span iterations to run.
    pub repeat: u64,
    /// Busy-loop steps to perform under each span.
    pub work: u64,
    /// Intended sleep after each iteration, in nanoseconds.
    pub sleep: u64,
    /// Accumulated-debt threshold that triggers an actual sleep, in
    /// nanoseconds.
    pub sleep_interval: u64,
    /// Log events attached to each span.
    #[serde(default)]
    pub num_logs: u64,
    /// Payload bytes carried by each log event.
    #[serde(default)]
    pub bytes_per_log: u64,
    /// Attributes set on each span.
    #[serde(default)]
    pub num_tags: u64,
    /// Emit through the real tracer instead of the no-op tracer.
    pub trace: bool,
    /// Skip the explicit span flush before reporting.
    #[serde(default)]
    pub no_flush: bool,
    /// Terminate instead of fetching further descriptors.
    pub exit: bool,
}

impl ControlDescriptor {
    /// A descriptor that only instructs the driver to terminate.
    pub fn exit() -> Self {
        ControlDescriptor {
            exit: true,
            ..ControlDescriptor::default()
        }
    }
}

/// Timing and diagnostics for one completed batch.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunResult {
    /// Wall time of the work phase. Real sleeps are included; fetch, flush
    /// and report I/O are not.
    pub elapsed: Duration,
    /// Wall time of the explicit span flush, zero when the flush was
    /// skipped.
    pub flush: Duration,
    /// Final busy-work accumulator. Reporting it keeps the work from being
    /// optimized away and lets the controller verify it happened.
    pub checksum: u64,
    /// Actual duration of every coalesced sleep, in occurrence order.
    pub sleeps: Vec<Duration>,
}

impl RunResult {
    /// Comma-joined sleep durations in nanoseconds, the controller's
    /// diagnostic wire format for the sleep list.
    pub fn sleeps_csv(&self) -> String {
        self.sleeps
            .iter()
            .map(|s| s.as_nanos().to_string())
            .collect::<Vec<_>>()
            .join(",")
    }
}

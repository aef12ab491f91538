//! In-memory test doubles for the controller.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::control::{ControlDescriptor, RunResult};
use crate::controller::ControlSource;
use crate::error::BenchResult;

/// A [`ControlSource`] that hands out queued descriptors and records
/// reported results in memory.
///
/// Useful for testing and debugging the driver without a controller
/// process. Clones share storage, so a test can keep one handle while the
/// driver owns another. An exhausted queue yields an `Exit` descriptor, so
/// a looping driver terminates on its own.
#[derive(Clone, Debug, Default)]
pub struct InMemoryControlSource {
    controls: Arc<Mutex<VecDeque<ControlDescriptor>>>,
    results: Arc<Mutex<Vec<RunResult>>>,
}

impl InMemoryControlSource {
    /// An empty source.
    pub fn new() -> Self {
        InMemoryControlSource::default()
    }

    /// Queues a descriptor for a later fetch.
    pub fn push_control(&self, control: ControlDescriptor) {
        self.controls
            .lock()
            .expect("control queue poisoned")
            .push_back(control);
    }

    /// Results reported so far, in report order.
    pub fn reported_results(&self) -> Vec<RunResult> {
        self.results
            .lock()
            .expect("result store poisoned")
            .clone()
    }

    /// Clears the recorded results.
    pub fn reset(&self) {
        self.results.lock().expect("result store poisoned").clear();
    }
}

impl ControlSource for InMemoryControlSource {
    async fn fetch_control(&self) -> BenchResult<ControlDescriptor> {
        let next = self
            .controls
            .lock()
            .expect("control queue poisoned")
            .pop_front();
        Ok(next.unwrap_or_else(ControlDescriptor::exit))
    }

    async fn report_result(&self, result: &RunResult) -> BenchResult<()> {
        self.results
            .lock()
            .expect("result store poisoned")
            .push(result.clone());
        Ok(())
    }
}

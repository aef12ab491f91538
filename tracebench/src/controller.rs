//! Controller transport: fetching control descriptors and reporting
//! results.

use std::future::Future;

use crate::control::{ControlDescriptor, RunResult};
use crate::error::BenchResult;

/// The capability set the driver needs from the benchmark controller.
///
/// The driver takes this as an injected dependency rather than reading a
/// shared global, so tests can swap the HTTP service for an in-memory queue
/// ([`InMemoryControlSource`](crate::testing::InMemoryControlSource)).
pub trait ControlSource {
    /// Retrieves the next control descriptor.
    fn fetch_control(&self) -> impl Future<Output = BenchResult<ControlDescriptor>> + Send;

    /// Reports the outcome of one completed batch.
    fn report_result(&self, result: &RunResult) -> impl Future<Output = BenchResult<()>> + Send;
}

/// [`ControlSource`] backed by the controller's HTTP endpoints.
///
/// Control descriptors come from `GET {base}/control` as a JSON body;
/// results go to `GET {base}/result` as query parameters: `timing` and
/// `flush` in seconds, `s` as comma-joined sleep nanoseconds, `a` as the
/// busy-work checksum.
///
/// Transport failures and non-success statuses map to
/// [`BenchError::Transport`](crate::BenchError::Transport); a body that does
/// not deserialize maps to
/// [`BenchError::MalformedDescriptor`](crate::BenchError::MalformedDescriptor).
/// Both are fatal — no retry is attempted.
#[derive(Clone, Debug)]
pub struct HttpControlSource {
    client: reqwest::Client,
    control_url: String,
    result_url: String,
}

impl HttpControlSource {
    /// Creates a source for a controller at `base_url`, e.g.
    /// `http://localhost:8023`.
    pub fn new(base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        HttpControlSource {
            client: reqwest::Client::new(),
            control_url: format!("{base}/control"),
            result_url: format!("{base}/result"),
        }
    }
}

impl ControlSource for HttpControlSource {
    async fn fetch_control(&self) -> BenchResult<ControlDescriptor> {
        let body = self
            .client
            .get(&self.control_url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        let control: ControlDescriptor = serde_json::from_str(&body)?;
        tracing::debug!(?control, "fetched control descriptor");
        Ok(control)
    }

    async fn report_result(&self, result: &RunResult) -> BenchResult<()> {
        self.client
            .get(&self.result_url)
            .query(&[
                ("timing", result.elapsed.as_secs_f64().to_string()),
                ("flush", result.flush.as_secs_f64().to_string()),
                ("s", result.sleeps_csv()),
                ("a", result.checksum.to_string()),
            ])
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

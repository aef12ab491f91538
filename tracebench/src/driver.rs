//! The workload driver: fetch, execute, sleep accounting, report.

use std::time::{Duration, Instant};

use opentelemetry::trace::noop::NoopTracer;
use opentelemetry::trace::{Span, TraceContextExt as _, Tracer, TracerProvider as _};
use opentelemetry::{Context, KeyValue};
use opentelemetry_sdk::trace::{SdkTracer, SdkTracerProvider};

use crate::control::{ControlDescriptor, RunResult};
use crate::controller::ControlSource;
use crate::error::BenchResult;
use crate::payload::LogPayload;
use crate::sleep::SleepDebt;
use crate::work::busy_work;

/// Name every benchmark span is emitted under.
pub const SPAN_NAME: &str = "span/test";

/// Event name of the per-span log entries.
pub const LOG_EVENT_NAME: &str = "testlog";

/// Instrumentation scope the driver requests its tracer under.
const SCOPE_NAME: &str = "tracebench";

/// How spans within a batch relate to each other.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SpanLayout {
    /// Every span is a fresh root.
    #[default]
    Flat,
    /// Each span is parented on the previous one, forming a single linear
    /// causal chain.
    Chained,
}

/// Outcome of one fetch/execute/report round.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BatchStatus {
    /// A batch ran and its result was reported.
    Completed,
    /// The controller set `Exit`; nothing was run or reported.
    Exit,
}

/// Single-task workload driver.
///
/// Holds the injected tracer handles — an [`SdkTracer`] from the provider
/// passed in and a [`NoopTracer`] for baseline batches — and selects
/// between them per batch from the descriptor's `Trace` flag. Fetch, work
/// loop, flush and report run as a strict sequence; the work loop is never
/// overlapped with controller I/O so its timing stays isolated.
///
/// The driver does not shut the provider down: the caller owns the
/// provider's lifecycle (it is typically a clone of a handle the caller
/// keeps).
#[derive(Debug)]
pub struct Driver<C: ControlSource> {
    source: C,
    provider: SdkTracerProvider,
    tracer: SdkTracer,
    noop: NoopTracer,
    layout: SpanLayout,
    payload: LogPayload,
}

impl<C: ControlSource> Driver<C> {
    /// Creates a driver reading control from `source` and emitting traced
    /// spans through `provider`.
    pub fn new(source: C, provider: SdkTracerProvider, layout: SpanLayout) -> Self {
        let tracer = provider.tracer(SCOPE_NAME);
        Driver {
            source,
            provider,
            tracer,
            noop: NoopTracer::new(),
            layout,
            payload: LogPayload::default(),
        }
    }

    /// Fetches and executes control batches until the controller sets
    /// `Exit`.
    pub async fn run(&mut self) -> BenchResult<()> {
        while self.run_once().await? == BatchStatus::Completed {}
        Ok(())
    }

    /// One fetch → execute → report round.
    pub async fn run_once(&mut self) -> BenchResult<BatchStatus> {
        let control = self.source.fetch_control().await?;
        if control.exit {
            tracing::info!("controller requested exit");
            return Ok(BatchStatus::Exit);
        }
        let result = self.execute(&control).await;
        self.source.report_result(&result).await?;
        Ok(BatchStatus::Completed)
    }

    /// Runs one batch to completion and measures it.
    async fn execute(&mut self, control: &ControlDescriptor) -> RunResult {
        tracing::debug!(
            repeat = control.repeat,
            work = control.work,
            trace = control.trace,
            "executing control batch"
        );
        self.payload.grow_to(control.bytes_per_log as usize);

        let run = if control.trace {
            emit_batch(&self.tracer, control, &self.payload, self.layout).await
        } else {
            emit_batch(&self.noop, control, &self.payload, self.layout).await
        };

        // The flush is timed separately: the controller subtracts it from
        // the traced run when estimating per-span overhead.
        let flush = if control.trace && !control.no_flush {
            let begin = Instant::now();
            if let Err(err) = self.provider.force_flush() {
                tracing::warn!(error = %err, "failed to flush spans before reporting");
            }
            begin.elapsed()
        } else {
            Duration::ZERO
        };

        RunResult {
            elapsed: run.elapsed,
            flush,
            checksum: run.checksum,
            sleeps: run.sleeps,
        }
    }
}

struct BatchRun {
    elapsed: Duration,
    checksum: u64,
    sleeps: Vec<Duration>,
}

/// Emits `control.repeat` spans through `tracer`, interleaving busy work
/// and debt-coalesced sleeps.
///
/// Generic over the tracer so the traced and baseline paths execute the
/// same machine code apart from the span calls themselves.
async fn emit_batch<T>(
    tracer: &T,
    control: &ControlDescriptor,
    payload: &LogPayload,
    layout: SpanLayout,
) -> BatchRun
where
    T: Tracer,
    T::Span: Send + Sync + 'static,
{
    let tags: Vec<KeyValue> = (0..control.num_tags)
        .map(|i| KeyValue::new(format!("tag.key{i}"), format!("tag.value{i}")))
        .collect();
    let log_payload = KeyValue::new(
        "payload",
        payload.slice(control.bytes_per_log as usize).to_owned(),
    );

    let mut debt = SleepDebt::new();
    let mut checksum = 0u64;
    let mut parent_cx = Context::new();

    let begin = Instant::now();
    for _ in 0..control.repeat {
        let mut span = tracer.start_with_context(SPAN_NAME, &parent_cx);
        for tag in &tags {
            span.set_attribute(tag.clone());
        }
        for _ in 0..control.num_logs {
            span.add_event(LOG_EVENT_NAME, vec![log_payload.clone()]);
        }
        checksum = busy_work(control.work);
        span.end();
        if layout == SpanLayout::Chained {
            parent_cx = parent_cx.with_span(span);
        }

        if control.sleep > 0 {
            debt.accrue(control.sleep);
            if debt.due(control.sleep_interval) {
                debt.pay().await;
            }
        }
    }

    BatchRun {
        elapsed: begin.elapsed(),
        checksum,
        sleeps: debt.into_sleeps(),
    }
}

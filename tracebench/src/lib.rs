//! Workload driver for measuring tracing SDK span-creation and reporting
//! overhead.
//!
//! The driver polls a benchmark controller for [`ControlDescriptor`]s, runs
//! the requested number of instrumented busy-work iterations, coalesces
//! per-iteration sleep intents through a debt accumulator, and reports wall
//! timing back to the controller. The tracer under test is the
//! `opentelemetry` SDK; untraced runs go through the no-op tracer so the
//! baseline reflects overhead-free work.
//!
//! Fetching and reporting go through the [`ControlSource`] trait, so the
//! controller can be a real HTTP service ([`HttpControlSource`]) or an
//! in-memory queue ([`testing::InMemoryControlSource`]).
//!
//! # Example
//!
//! ```
//! use opentelemetry_sdk::trace::SdkTracerProvider;
//! use tracebench::testing::InMemoryControlSource;
//! use tracebench::{ControlDescriptor, Driver, SpanLayout};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let source = InMemoryControlSource::new();
//! source.push_control(ControlDescriptor {
//!     repeat: 10,
//!     work: 1_000,
//!     ..ControlDescriptor::default()
//! });
//!
//! let provider = SdkTracerProvider::builder().build();
//! let mut driver = Driver::new(source.clone(), provider, SpanLayout::Flat);
//! driver.run().await.unwrap();
//!
//! assert_eq!(source.reported_results().len(), 1);
//! # }
//! ```

pub mod control;
pub mod controller;
pub mod driver;
mod error;
pub mod payload;
pub mod sleep;
pub mod testing;
pub mod work;

pub use control::{ControlDescriptor, RunResult};
pub use controller::{ControlSource, HttpControlSource};
pub use driver::{BatchStatus, Driver, SpanLayout};
pub use error::{BenchError, BenchResult};

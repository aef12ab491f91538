//! Benchmark client binary: wires the workload driver to a controller and
//! an OTLP span exporter.

use clap::Parser;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::trace::SdkTracerProvider;
use opentelemetry_sdk::Resource;
use tracebench::{Driver, HttpControlSource, SpanLayout};
use tracing_subscriber::EnvFilter;

/// Load-generating client for tracer overhead benchmarks.
#[derive(Debug, Parser)]
#[command(name = "tracebench-client", version, about)]
struct Args {
    /// Base URL of the benchmark controller.
    #[arg(long, default_value = "http://localhost:8023")]
    controller: String,

    /// OTLP/HTTP endpoint traced spans are exported to.
    #[arg(long, default_value = "http://localhost:4318/v1/traces")]
    endpoint: String,

    /// Service name spans are reported under.
    #[arg(long, default_value = "tracebench")]
    service_name: String,

    /// Parent each span on the previous one instead of emitting flat
    /// roots.
    #[arg(long)]
    chained: bool,

    /// Execute a single control batch and exit.
    #[arg(long)]
    one_shot: bool,
}

fn init_diagnostics() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn build_provider(args: &Args) -> Result<SdkTracerProvider, opentelemetry_otlp::ExporterBuildError> {
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_http()
        .with_endpoint(args.endpoint.as_str())
        .build()?;
    Ok(SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .with_resource(
            Resource::builder()
                .with_service_name(args.service_name.clone())
                .build(),
        )
        .build())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    init_diagnostics();
    let args = Args::parse();

    let provider = build_provider(&args)?;
    let layout = if args.chained {
        SpanLayout::Chained
    } else {
        SpanLayout::Flat
    };
    let source = HttpControlSource::new(&args.controller);
    let mut driver = Driver::new(source, provider.clone(), layout);

    let run = if args.one_shot {
        driver.run_once().await.map(|_| ())
    } else {
        driver.run().await
    };

    // Drain whatever the exporter still buffers, even for a failed run.
    if let Err(err) = provider.shutdown() {
        tracing::warn!(error = %err, "tracer provider shutdown failed");
    }

    run?;
    Ok(())
}

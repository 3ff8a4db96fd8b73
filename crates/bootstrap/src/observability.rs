//! Tracing subscriber and OpenTelemetry wiring.
//!
//! Every crate emits `tracing` spans and events; this module decides where they
//! go. Output is always JSON on stdout (collected by CloudWatch Logs). When
//! `OTEL_EXPORTER_OTLP_ENDPOINT` is set, spans are additionally exported over
//! OTLP/gRPC.

use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::runtime;
use opentelemetry_sdk::trace::TracerProvider;
use tracing::warn;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Presence of this variable enables the OTLP exporter.
pub const OTLP_ENDPOINT_VAR: &str = "OTEL_EXPORTER_OTLP_ENDPOINT";

const TRACER_NAME: &str = "codepipeline-github-notifier";

/// Handle to the installed exporter, if any.
pub struct Telemetry {
    provider: Option<TracerProvider>,
}

impl Telemetry {
    /// Installs the global subscriber. Must be called once, before any span is
    /// created.
    pub fn init() -> anyhow::Result<Self> {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        let fmt_layer = tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_current_span(true)
            .without_time();

        let provider = if std::env::var_os(OTLP_ENDPOINT_VAR).is_some() {
            let exporter = opentelemetry_otlp::SpanExporter::builder()
                .with_tonic()
                .build()?;
            Some(
                TracerProvider::builder()
                    .with_batch_exporter(exporter, runtime::Tokio)
                    .build(),
            )
        } else {
            None
        };

        let otel_layer = provider
            .as_ref()
            .map(|provider| tracing_opentelemetry::layer().with_tracer(provider.tracer(TRACER_NAME)));

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .with(otel_layer)
            .try_init()?;

        Ok(Self { provider })
    }

    /// Pushes buffered spans out. Lambda freezes the process between
    /// invocations, so this runs after each one.
    pub fn flush(&self) {
        if let Some(provider) = &self.provider {
            for result in provider.force_flush() {
                if let Err(err) = result {
                    warn!(error = %err, "span export failed");
                }
            }
        }
    }

    pub fn shutdown(&self) {
        if let Some(provider) = &self.provider {
            if let Err(err) = provider.shutdown() {
                warn!(error = %err, "telemetry shutdown failed");
            }
        }
    }
}

use std::time::Duration;

use anyhow::Context;
use opentelemetry::global;
use opentelemetry::metrics::MetricsError;
use opentelemetry::trace::{TraceError, TracerProvider as _};
use opentelemetry::KeyValue;
use opentelemetry_otlp::{TonicExporterBuilder, WithExportConfig};
use opentelemetry_sdk::metrics::SdkMeterProvider;
use opentelemetry_sdk::propagation::TraceContextPropagator;
use opentelemetry_sdk::trace::{Config, Tracer};
use opentelemetry_sdk::{runtime, Resource};
use opentelemetry_semantic_conventions::resource::{SERVICE_NAME, SERVICE_VERSION};
use tracing_opentelemetry::{MetricsLayer, OpenTelemetryLayer};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::Registry;

const EXPORT_TIMEOUT: Duration = Duration::from_secs(15);

/// Installs the tracing subscriber, exporting traces and metrics over OTLP.
/// Without an endpoint (or with `console` set) events also go to stdout.
pub(crate) fn init_telemetry(endpoint: &Option<String>, console: bool) {
    let resource = service_resource();
    let tracer = install_tracer(endpoint, resource.clone())
        .context("Failed to install tracer")
        .unwrap();
    let meter = install_meter(endpoint, resource)
        .context("Failed to install meter")
        .unwrap();

    global::set_text_map_propagator(TraceContextPropagator::new());
    let registry = Registry::default()
        .with(EnvFilter::try_from_default_env().unwrap_or(EnvFilter::new("info")))
        .with(OpenTelemetryLayer::new(tracer))
        .with(MetricsLayer::new(meter));

    if endpoint.is_none() || console {
        registry.with(tracing_subscriber::fmt::layer()).init();
    } else {
        registry.init();
    }
}

fn service_resource() -> Resource {
    Resource::new(vec![
        KeyValue::new(SERVICE_NAME, env!("CARGO_PKG_NAME")),
        KeyValue::new(SERVICE_VERSION, env!("CARGO_PKG_VERSION")),
    ])
}

fn install_tracer(endpoint: &Option<String>, resource: Resource) -> Result<Tracer, TraceError> {
    // install_batch yields the provider; the layer wants a tracer from it.
    let provider = opentelemetry_otlp::new_pipeline()
        .tracing()
        .with_exporter(otlp_exporter(endpoint))
        .with_trace_config(Config::default().with_resource(resource))
        .install_batch(runtime::Tokio)?;

    Ok(provider.tracer(env!("CARGO_PKG_NAME")))
}

fn install_meter(
    endpoint: &Option<String>,
    resource: Resource,
) -> Result<SdkMeterProvider, MetricsError> {
    opentelemetry_otlp::new_pipeline()
        .metrics(runtime::Tokio)
        .with_exporter(otlp_exporter(endpoint))
        .with_resource(resource)
        .build()
}

fn otlp_exporter(endpoint: &Option<String>) -> TonicExporterBuilder {
    let mut exporter = opentelemetry_otlp::new_exporter()
        .tonic()
        .with_timeout(EXPORT_TIMEOUT);

    if let Some(endpoint) = endpoint {
        exporter = exporter.with_endpoint(endpoint);
    }

    exporter
}

#[cfg(test)]
mod tests {
    use opentelemetry::Value;

    use super::*;

    #[test]
    fn resource_names_this_service() {
        let resource = service_resource();

        assert_eq!(
            resource.get(SERVICE_NAME.into()),
            Some(Value::from(env!("CARGO_PKG_NAME")))
        );
    }

    // The layer stack consumes a Tracer and an SdkMeterProvider, not the raw
    // pipeline outputs.
    #[test]
    fn pipeline_helpers_yield_layer_inputs() {
        let _tracer: fn(&Option<String>, Resource) -> Result<Tracer, TraceError> = install_tracer;
        let _meter: fn(&Option<String>, Resource) -> Result<SdkMeterProvider, MetricsError> =
            install_meter;
    }
}

use opentelemetry::{global, trace::TracerProvider as _, KeyValue};
use opentelemetry_otlp::{Protocol, WithExportConfig};
use opentelemetry_sdk::{
    metrics::{MeterProviderBuilder, PeriodicReader, SdkMeterProvider},
    trace::{RandomIdGenerator, Sampler, SdkTracerProvider},
    Resource,
};
use opentelemetry_semantic_conventions::resource::SERVICE_VERSION;
use tracing::Level;
use tracing_opentelemetry::{MetricsLayer, OpenTelemetryLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::errors::{Result, TTSError};

const SERVICE_NAME: &str = "tts-speak";

fn resource() -> Resource {
    Resource::builder()
        .with_service_name(SERVICE_NAME)
        .with_attribute(KeyValue::new(SERVICE_VERSION, env!("CARGO_PKG_VERSION")))
        .build()
}

/// Metrics go to the OTLP collector when `url` is set and to stdout when
/// `stdout` is set.
fn init_meter_provider(url: Option<&str>, stdout: bool) -> Result<SdkMeterProvider> {
    let mut builder = MeterProviderBuilder::default().with_resource(resource());

    if let Some(url) = url {
        let exporter = opentelemetry_otlp::MetricExporter::builder()
            .with_http()
            .with_endpoint(url)
            .with_protocol(Protocol::HttpBinary)
            .with_temporality(opentelemetry_sdk::metrics::Temporality::default())
            .build()
            .map_err(|e| TTSError::config(format!("cannot build metric exporter: {}", e)))?;

        let reader = PeriodicReader::builder(exporter)
            .with_interval(std::time::Duration::from_secs(5))
            .build();
        builder = builder.with_reader(reader);
    }

    if stdout {
        let stdout_reader =
            PeriodicReader::builder(opentelemetry_stdout::MetricExporter::default()).build();
        builder = builder.with_reader(stdout_reader);
    }

    let meter_provider = builder.build();

    global::set_meter_provider(meter_provider.clone());

    Ok(meter_provider)
}

fn init_tracer_provider(url: &str) -> Result<SdkTracerProvider> {
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_http()
        .with_endpoint(url)
        .with_protocol(Protocol::HttpBinary)
        .build()
        .map_err(|e| TTSError::config(format!("cannot build span exporter: {}", e)))?;

    Ok(SdkTracerProvider::builder()
        .with_sampler(Sampler::ParentBased(Box::new(Sampler::AlwaysOn)))
        .with_id_generator(RandomIdGenerator::default())
        .with_resource(resource())
        .with_batch_exporter(exporter)
        .build())
}

/// Install the global subscriber: a fmt layer, plus OTLP trace and metric
/// export when `otel_http_url` is set. At `DEBUG` metrics are also dumped to
/// stdout. Keep the returned guard alive.
pub fn init_tracing_subscriber(otel_http_url: &Option<String>, level: Level) -> Result<OtelGuard> {
    let url = otel_http_url.as_deref();
    let stdout_metrics = level == Level::DEBUG;

    let tracer_provider = url.map(init_tracer_provider).transpose()?;
    let meter_provider = if url.is_some() || stdout_metrics {
        Some(init_meter_provider(url, stdout_metrics)?)
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::filter::LevelFilter::from_level(level))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(meter_provider.clone().map(MetricsLayer::new))
        .with(
            tracer_provider
                .as_ref()
                .map(|provider| OpenTelemetryLayer::new(provider.tracer(SERVICE_NAME))),
        )
        .init();

    Ok(OtelGuard {
        tracer_provider,
        meter_provider,
    })
}

pub struct OtelGuard {
    tracer_provider: Option<SdkTracerProvider>,
    meter_provider: Option<SdkMeterProvider>,
}

impl Drop for OtelGuard {
    fn drop(&mut self) {
        if let Some(tracer_provider) = self.tracer_provider.take() {
            if let Err(e) = tracer_provider.shutdown() {
                eprintln!("tracer provider shutdown failed: {e:?}");
            }
        }
        if let Some(meter_provider) = self.meter_provider.take() {
            if let Err(e) = meter_provider.shutdown() {
                eprintln!("meter provider shutdown failed: {e:?}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stdout_meter_provider_shuts_down() {
        let meter_provider = init_meter_provider(None, true).unwrap();
        assert!(meter_provider.shutdown().is_ok());
    }
}

//! Logging and OpenTelemetry trace export
//!
//! The codec emits `tracing` events on its own (rejected envelopes at `debug`,
//! decoded envelopes at `trace`). Nothing is printed until an application
//! installs a subscriber. This module installs one in a single call:
//!
//! - an `EnvFilter` built from `RUST_LOG`, falling back to the configured level
//! - a JSON `fmt` layer writing structured events to stdout (`enable_logs`)
//! - an OpenTelemetry layer exporting spans over OTLP/gRPC (`enable_traces`)
//!
//! Metrics are not exported; the codec keeps no counters.
//!
//! # Usage
//!
//! ```rust,no_run
//! use rpcwire_core::ObservabilityConfig;
//!
//! let config = ObservabilityConfig::new("my-gateway")
//!     .with_endpoint("http://localhost:4317")
//!     .with_log_level("debug")
//!     .with_traces(true);
//!
//! rpcwire_core::init_observability(config).expect("Failed to init observability");
//!
//! // ... decode and answer requests ...
//!
//! rpcwire_core::shutdown_observability();
//! ```
//!
//! # Environment Variables
//!
//! - `OTEL_EXPORTER_OTLP_ENDPOINT`: Collector endpoint
//! - `RUST_LOG`: Log level filter (e.g., "info", "rpcwire_core=debug")

use opentelemetry::{global, KeyValue};
use opentelemetry_sdk::trace::SdkTracerProvider;
use std::sync::OnceLock;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

static TRACER_PROVIDER: OnceLock<SdkTracerProvider> = OnceLock::new();

/// Observability configuration
///
/// # Defaults
///
/// - Service name: "rpcwire"
/// - Service version: the crate version
/// - OTLP endpoint: `$OTEL_EXPORTER_OTLP_ENDPOINT`, or "http://localhost:4317"
/// - Logs enabled, traces disabled (opt in with `with_traces(true)`)
/// - Log level: `$RUST_LOG`, or "info"
///
/// # Examples
///
/// ```rust
/// use rpcwire_core::ObservabilityConfig;
///
/// let config = ObservabilityConfig::new("rpc-edge")
///     .with_endpoint("http://collector:4317")
///     .with_version("1.2.3")
///     .with_traces(false);
/// assert!(!config.enable_traces);
/// ```
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    /// Service name attached to every exported span
    pub service_name: String,

    /// Service version attached to every exported span
    pub service_version: String,

    /// gRPC endpoint of the OpenTelemetry collector
    pub otlp_endpoint: String,

    /// Export spans over OTLP
    pub enable_traces: bool,

    /// Write structured JSON events to stdout
    pub enable_logs: bool,

    /// Filter used when `RUST_LOG` is not set
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            service_name: "rpcwire".to_string(),
            service_version: env!("CARGO_PKG_VERSION").to_string(),
            otlp_endpoint: std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
                .unwrap_or_else(|_| "http://localhost:4317".to_string()),
            enable_traces: false,
            enable_logs: true,
            log_level: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        }
    }
}

impl ObservabilityConfig {
    /// Create a configuration with a custom service name and default settings
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            ..Default::default()
        }
    }

    /// Set the OTLP collector endpoint, including the scheme
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.otlp_endpoint = endpoint.into();
        self
    }

    /// Set the fallback log filter ("error", "warn", "info", "debug", "trace"
    /// or any `EnvFilter` directive)
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Set the service version
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.service_version = version.into();
        self
    }

    /// Enable or disable span export
    pub fn with_traces(mut self, enable: bool) -> Self {
        self.enable_traces = enable;
        self
    }

    /// Enable or disable the stdout JSON log layer
    pub fn with_logs(mut self, enable: bool) -> Self {
        self.enable_logs = enable;
        self
    }
}

/// Install the global `tracing` subscriber described by `config`
///
/// Call once at startup. A tracer provider is created only when traces are
/// enabled, and is flushed by [`shutdown_observability`]. The OTLP exporter
/// runs on tonic, so with traces enabled this must be called from within a
/// Tokio runtime.
///
/// # Errors
///
/// Fails if the log filter does not parse, traces are enabled outside a Tokio
/// runtime, the OTLP exporter cannot be built, or a global subscriber is
/// already installed.
pub fn init_observability(config: ObservabilityConfig) -> Result<(), BoxError> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&config.log_level))?;

    let tracer = if config.enable_traces {
        Some(init_tracer(&config)?)
    } else {
        None
    };
    let telemetry_layer = tracer.map(|tracer| tracing_opentelemetry::layer().with_tracer(tracer));

    let fmt_layer = config.enable_logs.then(|| {
        tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_thread_ids(true)
            .with_line_number(true)
            .json()
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(telemetry_layer)
        .with(fmt_layer)
        .try_init()?;

    tracing::info!(
        service_name = %config.service_name,
        otlp_endpoint = %config.otlp_endpoint,
        traces = config.enable_traces,
        logs = config.enable_logs,
        "Observability initialized"
    );

    Ok(())
}

/// Build the OTLP span pipeline and register it globally
fn init_tracer(config: &ObservabilityConfig) -> Result<opentelemetry_sdk::trace::Tracer, BoxError> {
    use opentelemetry::trace::TracerProvider as _;
    use opentelemetry_otlp::WithExportConfig;
    use opentelemetry_sdk::trace::{RandomIdGenerator, Sampler};
    use opentelemetry_sdk::Resource;

    // tonic panics without a reactor
    tokio::runtime::Handle::try_current()
        .map_err(|e| format!("OTLP trace export needs a Tokio runtime: {}", e))?;

    let resource = Resource::builder_empty()
        .with_attributes(vec![
            KeyValue::new(
                opentelemetry_semantic_conventions::resource::SERVICE_NAME,
                config.service_name.clone(),
            ),
            KeyValue::new(
                opentelemetry_semantic_conventions::resource::SERVICE_VERSION,
                config.service_version.clone(),
            ),
        ])
        .build();

    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(config.otlp_endpoint.clone())
        .build()?;

    let provider = SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .with_resource(resource)
        .with_sampler(Sampler::AlwaysOn)
        .with_id_generator(RandomIdGenerator::default())
        .build();

    // The subscriber layer needs the tracer before the provider goes global
    let tracer = provider.tracer(config.service_name.clone());
    global::set_tracer_provider(provider.clone());
    if TRACER_PROVIDER.set(provider).is_err() {
        tracing::warn!("Tracer provider already registered; keeping the first one");
    }

    Ok(tracer)
}

/// Flush pending spans and shut the tracer provider down
///
/// Safe to call more than once and safe to call when traces were never
/// enabled.
pub fn shutdown_observability() {
    tracing::info!("Shutting down observability");
    if let Some(provider) = TRACER_PROVIDER.get() {
        if let Err(e) = provider.shutdown() {
            tracing::debug!(error = %e, "Tracer provider shutdown reported an error");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ObservabilityConfig::default();
        assert_eq!(config.service_name, "rpcwire");
        assert_eq!(config.service_version, env!("CARGO_PKG_VERSION"));
        assert!(!config.enable_traces);
        assert!(config.enable_logs);
    }

    #[test]
    fn test_tracer_outside_runtime_is_an_error() {
        let config = ObservabilityConfig::new("test-no-runtime").with_traces(true);
        let outcome = std::panic::catch_unwind(|| init_tracer(&config).map(|_| ()));
        match outcome {
            Ok(Err(e)) => assert!(e.to_string().contains("Tokio runtime")),
            Ok(Ok(())) => panic!("tracer built without a runtime"),
            Err(_) => panic!("tracer setup panicked outside a runtime"),
        }
        assert!(TRACER_PROVIDER.get().is_none());
    }

    #[test]
    fn test_custom_config() {
        let config = ObservabilityConfig::new("test-service")
            .with_endpoint("http://custom:4317")
            .with_log_level("rpcwire_core=trace")
            .with_version("1.0.0")
            .with_traces(false)
            .with_logs(false);

        assert_eq!(config.service_name, "test-service");
        assert_eq!(config.otlp_endpoint, "http://custom:4317");
        assert_eq!(config.log_level, "rpcwire_core=trace");
        assert_eq!(config.service_version, "1.0.0");
        assert!(!config.enable_traces);
        assert!(!config.enable_logs);
    }

    #[test]
    fn test_init_without_exporters() {
        // Only this test installs the global subscriber
        let config = ObservabilityConfig::new("test-none")
            .with_traces(false)
            .with_logs(false);
        assert!(init_observability(config).is_ok());

        let again = ObservabilityConfig::new("test-again")
            .with_traces(false)
            .with_logs(false);
        assert!(init_observability(again).is_err());
    }

    #[test]
    fn test_shutdown_without_provider() {
        shutdown_observability();
        shutdown_observability();
    }
}

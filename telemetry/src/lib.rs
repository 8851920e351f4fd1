use actix_web::body::MessageBody;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use anyhow::anyhow;
use lambda_extension::{Error, NextEvent};
use opentelemetry::trace::TracerProvider as _;
use opentelemetry::{global, KeyValue};
use opentelemetry_otlp::{SpanExporterBuilder, WithExportConfig};
use opentelemetry_sdk::propagation::TraceContextPropagator;
use opentelemetry_sdk::trace::{Config, TracerProvider};
use opentelemetry_sdk::{runtime, Resource};
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio::sync::Mutex;
use tracing::subscriber::set_global_default;
use tracing::{Span, Subscriber};
use tracing_actix_web::{DefaultRootSpanBuilder, Level, RootSpanBuilder};
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_log::LogTracer;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter, Registry};

#[derive(Deserialize, Clone)]
pub struct TelemetrySettings {
    /// OTLP/HTTP collector. Spans are not exported when empty.
    #[serde(default)]
    pub otlp_endpoint: String,
    pub honeycomb_api_key: Secret<String>,
    pub dataset_name: String,
}

/// Compose multiple layers into a tracing subscriber.
pub fn get_subscriber<Sink>(
    name: String,
    env_filter: String,
    sink: Sink,
    config: &TelemetrySettings,
    trace_provider: &TracerProvider,
) -> impl Subscriber + Send + Sync
where
    Sink: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(env_filter));
    let formatting_layer = BunyanFormattingLayer::new(name, sink);

    Registry::default()
        .with(env_filter)
        .with(JsonStorageLayer)
        .with(formatting_layer)
        .with(
            tracing_opentelemetry::layer()
                .with_tracer(trace_provider.tracer(config.dataset_name.clone())),
        )
}

pub fn init_subscriber(subscriber: impl Subscriber + Send + Sync) {
    let _ = LogTracer::init();
    global::set_text_map_propagator(TraceContextPropagator::new());

    let _ = set_global_default(subscriber);
}

pub fn init_tracer(trace_config: &TelemetrySettings) -> Result<TracerProvider, anyhow::Error> {
    let builder = TracerProvider::builder().with_config(
        Config::default().with_resource(Resource::new(vec![KeyValue::new(
            opentelemetry_semantic_conventions::resource::SERVICE_NAME,
            trace_config.dataset_name.clone(),
        )])),
    );

    if trace_config.otlp_endpoint.is_empty() {
        return Ok(builder.build());
    }

    let mut headers = HashMap::new();
    if !trace_config.honeycomb_api_key.expose_secret().is_empty() {
        headers.insert(
            "x-honeycomb-dataset".to_string(),
            trace_config.dataset_name.clone(),
        );
        headers.insert(
            "x-honeycomb-team".to_string(),
            trace_config.honeycomb_api_key.expose_secret().to_string(),
        );
    }

    let span_exporter = opentelemetry_otlp::new_exporter()
        .http()
        .with_endpoint(trace_config.otlp_endpoint.clone())
        .with_http_client(reqwest::Client::default())
        .with_headers(headers)
        .with_timeout(Duration::from_secs(2));

    let exporter = SpanExporterBuilder::Http(span_exporter).build_span_exporter()?;

    Ok(builder.with_batch_exporter(exporter, runtime::Tokio).build())
}

pub struct CustomLevelRootSpanBuilder;

impl RootSpanBuilder for CustomLevelRootSpanBuilder {
    fn on_request_start(request: &ServiceRequest) -> Span {
        let paths_to_skip = ["/api/health"];

        let level = if paths_to_skip.contains(&request.path()) {
            Level::TRACE
        } else {
            Level::INFO
        };

        tracing_actix_web::root_span!(level = level, request)
    }

    fn on_request_end<B: MessageBody>(
        span: Span,
        outcome: &Result<ServiceResponse<B>, actix_web::Error>,
    ) {
        DefaultRootSpanBuilder::on_request_end(span, outcome);
    }
}

/// Internal Lambda extension that flushes spans once the function handler
/// reports, through [`RequestDone`], that the current invocation is answered.
pub struct TraceFlushExtension {
    tracer_provider: TracerProvider,
    request_done_receiver: Mutex<UnboundedReceiver<()>>,
}

/// Handle given to the function handler. Each call to [`RequestDone::notify`]
/// releases one pending flush.
#[derive(Clone)]
pub struct RequestDone(UnboundedSender<()>);

impl RequestDone {
    pub fn notify(&self) {
        if self.0.send(()).is_err() {
            tracing::warn!("Trace flush extension is no longer listening");
        }
    }
}

impl TraceFlushExtension {
    pub fn channel(tracer_provider: TracerProvider) -> (Arc<Self>, RequestDone) {
        let (sender, receiver) = unbounded_channel();
        let extension = Self {
            tracer_provider,
            request_done_receiver: Mutex::new(receiver),
        };

        (Arc::new(extension), RequestDone(sender))
    }

    pub async fn invoke(&self, event: lambda_extension::LambdaEvent) -> Result<(), Error> {
        match event.next {
            // Internal extensions only receive INVOKE.
            NextEvent::Shutdown(shutdown) => {
                return Err(anyhow!(
                    "extension received unexpected SHUTDOWN event: {:?}",
                    shutdown
                )
                .into());
            }
            NextEvent::Invoke(invoke) => {
                tracing::debug!(request_id = %invoke.request_id, "Waiting for the handler to respond");
            }
        }

        self.flush_when_done().await
    }

    /// Waits for the next [`RequestDone::notify`] and exports buffered spans.
    /// Fails once every [`RequestDone`] handle is dropped.
    pub async fn flush_when_done(&self) -> Result<(), Error> {
        self.request_done_receiver
            .lock()
            .await
            .recv()
            .await
            .ok_or_else(|| anyhow!("request done channel is closed"))?;

        for result in self.tracer_provider.force_flush() {
            if let Err(e) = result {
                tracing::warn!(error = %e, "Failed to flush spans");
            }
        }

        Ok(())
    }
}

use axum::{extract::Request, http::StatusCode, middleware::Next, response::Response};
use std::time::Instant;
use tracing::{Instrument, Level, error, info, info_span, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use gatehouse_config::{LogFormat, LoggingConfig};

use crate::middleware::route_path;

/// Log level for a completed request: `warn` for 4xx, `error` for 5xx.
fn completion_level(status: StatusCode) -> Level {
    if status.is_server_error() {
        Level::ERROR
    } else if status.is_client_error() {
        Level::WARN
    } else {
        Level::INFO
    }
}

/// Wraps each request in a span carrying a fresh request id, so guard
/// rejections logged further down share it.
pub async fn logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let request_id = uuid::Uuid::new_v4();
    let span = info_span!(
        "request",
        request_id = %request_id,
        method = %req.method(),
        path = %route_path(&req),
    );

    let response = next.run(req).instrument(span.clone()).await;
    let status = response.status().as_u16();
    let latency_ms = start.elapsed().as_millis() as u64;

    let _entered = span.enter();
    let level = completion_level(response.status());
    if level == Level::ERROR {
        error!(status, latency_ms, "Server error");
    } else if level == Level::WARN {
        warn!(status, latency_ms, "Client error");
    } else {
        info!(status, latency_ms, "Request completed");
    }

    response
}

/// Default filter when `RUST_LOG` is unset.
fn default_filter(level: &str) -> String {
    format!(
        "{}={level},gatehouse_auth={level},tower_http=warn,axum::rejection=trace",
        env!("CARGO_CRATE_NAME")
    )
}

/// Installs the global subscriber. `RUST_LOG` takes precedence over `LOG_LEVEL`.
pub fn init_tracing(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(&config.level)));

    let registry = tracing_subscriber::registry().with(filter);

    match config.format {
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(false),
            )
            .init(),
        LogFormat::Pretty => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_file(true)
                    .with_line_number(true)
                    .compact(),
            )
            .init(),
    }
}

//! 日志与指标
//! 初始化结构化日志，并登记 HTTP 指标

use crate::config::AppConfig;
use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
};

/// 初始化日志系统
///
/// `RUST_LOG` 优先于配置中的日志级别。重复初始化时只记录警告。
pub fn init_telemetry(config: &AppConfig) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{},sqlx=warn", config.logging.level)));

    let log_layer = match config.logging.format.to_lowercase().as_str() {
        "json" => tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(true)
            .with_target(false)
            .with_span_events(FmtSpan::CLOSE)
            .boxed(),
        "pretty" => tracing_subscriber::fmt::layer()
            .pretty()
            .with_target(false)
            .boxed(),
        _ => tracing_subscriber::fmt::layer().with_target(false).boxed(),
    };

    if let Err(e) = tracing_subscriber::registry()
        .with(env_filter)
        .with(log_layer)
        .try_init()
    {
        eprintln!("Tracing subscriber already initialized: {}", e);
        return;
    }

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        level = %config.logging.level,
        format = %config.logging.format,
        "Telemetry initialized"
    );
}

/// 登记指标说明（未安装 recorder 时为空操作）
pub fn init_metrics() {
    metrics::describe_counter!(
        "http_requests_total",
        "Total HTTP requests by method and status class"
    );
    metrics::describe_histogram!(
        "http_request_duration_seconds",
        metrics::Unit::Seconds,
        "HTTP request latency"
    );
    metrics::describe_counter!("uploads_stored_total", "Product images written to disk");
    metrics::describe_gauge!("db_pool_connections", "Open database connections");
    metrics::describe_gauge!("db_pool_idle", "Idle database connections");
}

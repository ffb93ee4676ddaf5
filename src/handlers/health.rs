//! 健康检查处理器
//! 提供 /health 和 /ready 端点

use axum::{extract::State, http::StatusCode, Json};
use once_cell::sync::OnceCell;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;

use crate::{middleware::AppState, repository::HealthStatus};

/// 存活探针响应
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}

/// 就绪探针响应
#[derive(Serialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    pub checks: Vec<HealthCheck>,
}

#[derive(Serialize)]
pub struct HealthCheck {
    pub name: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

static APP_START_TIME: OnceCell<Instant> = OnceCell::new();

/// 记录应用启动时间，只有第一次调用生效
pub fn set_start_time() {
    let _ = APP_START_TIME.set(Instant::now());
}

/// 应用运行时间（秒），未设置时为 0
pub fn get_uptime() -> u64 {
    APP_START_TIME
        .get()
        .map_or(0, |start| start.elapsed().as_secs())
}

/// 存活探针
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: get_uptime(),
    })
}

/// 就绪探针：检查存储与上传目录
pub async fn readiness_check(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<ReadinessResponse>) {
    let mut checks = Vec::new();

    let store_health = state.store.health_check().await;
    checks.push(match store_health {
        HealthStatus::Healthy => HealthCheck {
            name: "database".to_string(),
            status: "healthy".to_string(),
            message: None,
        },
        HealthStatus::Unhealthy(msg) => HealthCheck {
            name: "database".to_string(),
            status: "unhealthy".to_string(),
            message: Some(msg),
        },
    });

    let upload_root = state.image_store.root();
    checks.push(match tokio::fs::metadata(upload_root).await {
        Ok(meta) if meta.is_dir() => HealthCheck {
            name: "uploads".to_string(),
            status: "healthy".to_string(),
            message: None,
        },
        Ok(_) => HealthCheck {
            name: "uploads".to_string(),
            status: "unhealthy".to_string(),
            message: Some(format!("{} is not a directory", upload_root.display())),
        },
        Err(e) => HealthCheck {
            name: "uploads".to_string(),
            status: "unhealthy".to_string(),
            message: Some(e.to_string()),
        },
    });

    let ready = checks.iter().all(|c| c.status == "healthy");
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(ReadinessResponse { ready, checks }))
}

//! 路由注册
//! 创建所有 API 路由并应用中间件

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    services::ServeDir,
};

use crate::{handlers, middleware::AppState};

/// 创建应用路由
pub fn create_router(state: Arc<AppState>) -> Router {
    let server = &state.config.server;

    // 公开端点（健康检查）
    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check));

    let admin_routes = Router::new()
        // 账号与会话
        .route("/register", post(handlers::admin::register))
        .route("/login", post(handlers::admin::login))
        .route("/logout", post(handlers::admin::logout))
        .route("/auth-status", get(handlers::admin::auth_status))
        .route("/checkAdminLoginAuth", get(handlers::admin::auth_status))
        .route("/profile", get(handlers::admin::profile))
        // 资料修改
        .route("/update-firstName", put(handlers::admin::update_first_name))
        .route("/update-lastName", put(handlers::admin::update_last_name))
        .route("/update-gender", put(handlers::admin::update_gender))
        .route("/update-email", put(handlers::admin::update_email))
        .route("/update-phoneNumber", put(handlers::admin::update_phone_number))
        .route("/update-password", put(handlers::admin::update_password))
        // 供应商
        .route("/add-vendor", post(handlers::vendor::add_vendor))
        .route("/view-vendors", get(handlers::vendor::view_vendors))
        .route("/delete-vendor/{id}", delete(handlers::vendor::delete_vendor))
        // 商品
        .route(
            "/add-product",
            post(handlers::product::add_product)
                .layer(DefaultBodyLimit::max(server.max_upload_bytes)),
        )
        .route("/view-products", get(handlers::product::view_products))
        .route("/delete-product/{id}", delete(handlers::product::delete_product));

    // 商品图片静态服务
    let upload_routes = Router::new()
        .fallback_service(ServeDir::new(&server.upload_dir))
        .layer(axum::middleware::from_fn(
            crate::middleware::upload_headers_middleware,
        ));

    Router::new()
        .merge(public_routes)
        .nest("/admin", admin_routes)
        .nest("/uploads", upload_routes)
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            crate::auth::middleware::session_middleware,
        ))
        .layer(cors_layer(&server.cors_allowed_origin))
        .layer(axum::middleware::from_fn(crate::middleware::request_tracking_middleware))
        .with_state(state)
}

/// 单一来源的 CORS，允许携带 Cookie
fn cors_layer(origin: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true);

    match HeaderValue::from_str(origin) {
        Ok(origin) => layer.allow_origin(AllowOrigin::exact(origin)),
        Err(e) => {
            // 不设置来源即拒绝所有跨域请求
            tracing::error!(origin, "Invalid CORS origin, cross-origin requests disabled: {}", e);
            layer
        }
    }
}

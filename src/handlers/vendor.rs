//! 供应商管理处理器

use crate::{
    auth::middleware::AuthContext,
    error::AppError,
    middleware::AppState,
    models::vendor::{CreateVendorRequest, NewVendor, VendorResponse},
};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

/// 添加供应商（需要登录，创建者为当前管理员）
pub async fn add_vendor(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    body: Result<Json<CreateVendorRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(req) = body?;
    req.validate().map_err(|e| AppError::validation(&e))?;

    if state.store.find_vendor_by_email(&req.email).await?.is_some() {
        return Err(AppError::Conflict("Vendor already exists".to_string()));
    }

    let password_hash = state.password_hasher.hash_blocking(req.password).await?;

    let vendor = state
        .store
        .create_vendor(NewVendor {
            first_name: req.first_name,
            last_name: req.last_name,
            gender: req.gender,
            email: req.email,
            phone_number: req.phone_number,
            password_hash,
            author_admin_id: auth_context.admin_id,
        })
        .await?;

    tracing::info!(
        vendor_id = %vendor.id,
        admin_id = %auth_context.admin_id,
        "Vendor added"
    );

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Vendor added successfully",
            "data": VendorResponse::from(vendor),
        })),
    ))
}

/// 供应商列表（新建的在前）
pub async fn view_vendors(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<VendorResponse>>, AppError> {
    let vendors = state.store.list_vendors().await?;

    Ok(Json(vendors.into_iter().map(VendorResponse::from).collect()))
}

/// 删除供应商
pub async fn delete_vendor(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    // 非法 ID 不可能对应任何记录
    let id = Uuid::parse_str(&id).map_err(|_| vendor_not_found())?;

    if !state.store.delete_vendor(id).await? {
        return Err(vendor_not_found());
    }

    tracing::info!(vendor_id = %id, "Vendor deleted");

    Ok(Json(json!({"message": "Vendor deleted successfully"})))
}

fn vendor_not_found() -> AppError {
    AppError::NotFound("Vendor not found".to_string())
}

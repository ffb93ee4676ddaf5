//! 商品管理处理器

use crate::{
    auth::middleware::AuthContext,
    error::AppError,
    middleware::AppState,
    models::product::{ProductForm, ProductResponse},
};
use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, Path, State,
    },
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

/// 图片文件字段名
const IMAGE_FIELD: &str = "productImage";

struct UploadedImage {
    file_name: Option<String>,
    bytes: Vec<u8>,
}

/// 添加商品（multipart 表单 + 图片）
pub async fn add_product(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse, AppError> {
    let mut multipart = multipart?;
    let mut form = ProductForm::default();
    let mut image: Option<UploadedImage> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();

        if name == IMAGE_FIELD {
            let file_name = field.file_name().map(|s| s.to_string());
            let bytes = field.bytes().await.map_err(multipart_error)?;
            if !bytes.is_empty() {
                image = Some(UploadedImage {
                    file_name,
                    bytes: bytes.to_vec(),
                });
            }
        } else {
            let value = field.text().await.map_err(multipart_error)?;
            form.set(&name, value);
        }
    }

    let image = image.ok_or_else(|| AppError::BadRequest("File not found".to_string()))?;

    // 先校验表单，避免无效请求写入文件
    form.check()?;

    let image_ref = state
        .image_store
        .save(image.file_name.as_deref(), &image.bytes)
        .await?;

    let new_product = form.into_new_product(image_ref.clone(), auth_context.admin_id)?;

    let product = match state.store.create_product(new_product).await {
        Ok(product) => product,
        Err(e) => {
            state.image_store.remove(&image_ref).await;
            return Err(e);
        }
    };

    tracing::info!(
        product_id = %product.id,
        admin_id = %auth_context.admin_id,
        image_ref = %product.image_ref,
        "Product added"
    );

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Product added successfully",
            "data": ProductResponse::from(product),
        })),
    ))
}

/// 商品列表（新建的在前）
pub async fn view_products(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ProductResponse>>, AppError> {
    let products = state.store.list_products().await?;

    Ok(Json(products.into_iter().map(ProductResponse::from).collect()))
}

/// 删除商品及其图片
pub async fn delete_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = Uuid::parse_str(&id).map_err(|_| product_not_found())?;

    let product = state
        .store
        .delete_product(id)
        .await?
        .ok_or_else(product_not_found)?;

    state.image_store.remove(&product.image_ref).await;

    tracing::info!(product_id = %id, "Product deleted");

    Ok(Json(json!({"message": "Product deleted successfully"})))
}

fn product_not_found() -> AppError {
    AppError::NotFound("Product not found".to_string())
}

fn multipart_error(e: MultipartError) -> AppError {
    tracing::debug!("Malformed multipart body: {}", e);
    AppError::BadRequest(format!("Invalid multipart body: {}", e.body_text()))
}

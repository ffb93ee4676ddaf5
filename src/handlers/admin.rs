//! 管理员相关的 HTTP 处理器
//! 注册、登录、会话状态、资料修改

use crate::{
    auth::{
        cookie::{clear_session_cookie, session_cookie},
        middleware::{AuthContext, Session},
    },
    error::AppError,
    middleware::AppState,
    models::{admin::*, auth::*},
};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header::SET_COOKIE, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use validator::ValidateEmail;

/// 注册管理员
pub async fn register(
    State(state): State<Arc<AppState>>,
    body: Result<Json<RegisterAdminRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(req) = body?;
    let admin = state.auth_service.register(req).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Admin registered successfully",
            "data": AdminResponse::from(admin),
        })),
    ))
}

/// 登录，成功后写入会话 Cookie
pub async fn login(
    State(state): State<Arc<AppState>>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(req) = body?;
    let (token, user) = state.auth_service.login(req).await?;
    let cookie = session_cookie(&state.config.security, &token)?;

    Ok((
        [(SET_COOKIE, cookie)],
        Json(LoginResponse {
            message: "Admin logged in successfully".to_string(),
            user,
        }),
    ))
}

/// 登录状态探测（软检查，总是 200）
pub async fn auth_status(session: Session) -> Json<AuthStatusResponse> {
    let user = session.auth_context().map(AuthContext::user);
    if let Session::Invalid(reason) = &session {
        tracing::debug!(?reason, "Auth status check with invalid token");
    }

    Json(AuthStatusResponse {
        authenticated: user.is_some(),
        user,
    })
}

/// 当前管理员（令牌中的身份信息）
pub async fn profile(auth_context: AuthContext) -> Json<SessionUser> {
    Json(auth_context.user())
}

/// 登出：清除 Cookie，有效令牌同时撤销
pub async fn logout(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    state.auth_service.logout(&session);
    let cookie = clear_session_cookie(&state.config.security)?;

    Ok(([(SET_COOKIE, cookie)], Json(json!({"message": "Logged out"}))))
}

pub async fn update_first_name(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    body: Result<Json<UpdateFirstNameRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(req) = body?;
    update_field(&state, &auth_context, AdminField::FirstName, req.first_name).await
}

pub async fn update_last_name(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    body: Result<Json<UpdateLastNameRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(req) = body?;
    update_field(&state, &auth_context, AdminField::LastName, req.last_name).await
}

pub async fn update_gender(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    body: Result<Json<UpdateGenderRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(req) = body?;
    update_field(&state, &auth_context, AdminField::Gender, req.gender).await
}

pub async fn update_email(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    body: Result<Json<UpdateEmailRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(req) = body?;
    update_field(&state, &auth_context, AdminField::Email, req.email).await
}

pub async fn update_phone_number(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    body: Result<Json<UpdatePhoneNumberRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(req) = body?;
    update_field(&state, &auth_context, AdminField::PhoneNumber, req.phone_number).await
}

/// 修改密码
pub async fn update_password(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    body: Result<Json<ChangePasswordRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(req) = body?;
    state
        .auth_service
        .change_password(auth_context.admin_id, req)
        .await?;

    Ok(Json(json!({"message": "Password updated successfully"})))
}

/// 单字段更新，成功后重新签发会话 Cookie
async fn update_field(
    state: &AppState,
    auth_context: &AuthContext,
    field: AdminField,
    value: String,
) -> Result<Response, AppError> {
    let value = check_field_value(field, value)?;

    if field == AdminField::Email {
        if let Some(existing) = state.store.find_admin_by_email(&value).await? {
            if existing.id != auth_context.admin_id {
                return Err(AppError::Conflict("Email already in use".to_string()));
            }
        }
    }

    let admin = state
        .store
        .update_admin_field(auth_context.admin_id, field, &value)
        .await?
        .ok_or_else(|| AppError::NotFound("Admin not found".to_string()))?;

    tracing::info!(
        admin_id = %admin.id,
        field = field.column(),
        "Admin profile updated"
    );

    let token = state.jwt_service.issue(&SessionUser::from(&admin))?;
    let cookie = session_cookie(&state.config.security, &token)?;

    Ok((
        [(SET_COOKIE, cookie)],
        Json(json!({
            "message": format!("{} updated successfully", field.label()),
            "data": AdminResponse::from(admin),
        })),
    )
        .into_response())
}

fn check_field_value(field: AdminField, value: String) -> Result<String, AppError> {
    match field {
        AdminField::FirstName | AdminField::LastName => {
            let value = value.trim().to_string();
            if value.is_empty() {
                return Err(AppError::Validation(format!(
                    "{} must not be empty",
                    field.label()
                )));
            }
            Ok(value)
        }
        AdminField::Email => {
            let value = value.trim().to_string();
            if !value.validate_email() {
                return Err(AppError::Validation(
                    "email must be a valid email address".to_string(),
                ));
            }
            Ok(value)
        }
        AdminField::Gender | AdminField::PhoneNumber => Ok(value),
    }
}

//! 会话中间件
//! 从 Cookie 解析会话令牌，并为处理器提供软/硬两种认证策略

use crate::{
    auth::{
        cookie::extract_session_token,
        jwt::{Claims, JwtService, TokenError},
    },
    error::AppError,
    middleware::AppState,
    models::auth::SessionUser,
};
use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::Response,
};
use std::{convert::Infallible, sync::Arc};
use uuid::Uuid;

/// 认证上下文（已验证的令牌）
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub admin_id: Uuid,
    pub claims: Claims,
}

impl AuthContext {
    pub fn user(&self) -> SessionUser {
        SessionUser::from_claims(self.admin_id, &self.claims)
    }
}

/// 请求的会话状态（附加到请求扩展）
#[derive(Debug, Clone)]
pub enum Session {
    /// 没有携带令牌
    Anonymous,
    /// 携带了令牌但验证失败
    Invalid(TokenError),
    Authenticated(AuthContext),
}

impl Session {
    /// 根据可选令牌计算会话状态
    pub fn resolve(jwt_service: &JwtService, token: Option<&str>) -> Self {
        let Some(token) = token else {
            return Session::Anonymous;
        };

        let claims = match jwt_service.verify(token) {
            Ok(claims) => claims,
            Err(reason) => return Session::Invalid(reason),
        };

        match claims.subject_id() {
            Ok(admin_id) => Session::Authenticated(AuthContext { admin_id, claims }),
            Err(reason) => Session::Invalid(reason),
        }
    }

    pub fn auth_context(&self) -> Option<&AuthContext> {
        match self {
            Session::Authenticated(ctx) => Some(ctx),
            Session::Anonymous | Session::Invalid(_) => None,
        }
    }
}

// 软检查：处理器直接提取 Session，永不拒绝
impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<Session>()
            .cloned()
            .unwrap_or(Session::Anonymous))
    }
}

// 硬检查：没有有效令牌时返回 401
impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<Session>() {
            Some(Session::Authenticated(ctx)) => Ok(ctx.clone()),
            Some(Session::Invalid(reason)) => {
                tracing::debug!(?reason, "Rejected request with invalid session token");
                Err(AppError::Unauthorized)
            }
            Some(Session::Anonymous) | None => Err(AppError::Unauthorized),
        }
    }
}

/// 会话中间件 - 只负责解析，不拒绝请求
pub async fn session_middleware(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Response {
    let token = extract_session_token(req.headers(), &state.config.security.cookie_name);
    let session = Session::resolve(&state.jwt_service, token.as_deref());

    req.extensions_mut().insert(session);

    next.run(req).await
}

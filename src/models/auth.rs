//! Authentication-related models

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::admin::Admin;
use crate::auth::jwt::Claims;

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Identity carried by a session token, as exposed to clients
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub email: String,
    pub phone_number: String,
}

impl From<&Admin> for SessionUser {
    fn from(admin: &Admin) -> Self {
        Self {
            id: admin.id,
            first_name: admin.first_name.clone(),
            last_name: admin.last_name.clone(),
            gender: admin.gender.clone(),
            email: admin.email.clone(),
            phone_number: admin.phone_number.clone(),
        }
    }
}

impl SessionUser {
    pub fn from_claims(admin_id: Uuid, claims: &Claims) -> Self {
        Self {
            id: admin_id,
            first_name: claims.first_name.clone(),
            last_name: claims.last_name.clone(),
            gender: claims.gender.clone(),
            email: claims.email.clone(),
            phone_number: claims.phone_number.clone(),
        }
    }
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    #[serde(flatten)]
    pub user: SessionUser,
}

/// Soft-check status response
#[derive(Debug, Serialize)]
pub struct AuthStatusResponse {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<SessionUser>,
}

//! Vendor domain models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Vendor account, created by an admin
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Vendor {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub email: String,
    pub phone_number: String,
    pub password_hash: String,
    pub author_admin_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewVendor {
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub email: String,
    pub phone_number: String,
    pub password_hash: String,
    pub author_admin_id: Uuid,
}

/// Add vendor request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateVendorRequest {
    #[validate(length(min = 1, message = "firstName is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "lastName is required"))]
    pub last_name: String,
    #[serde(default)]
    pub gender: String,
    #[validate(email(message = "email must be a valid email address"))]
    pub email: String,
    #[serde(default)]
    pub phone_number: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

/// Vendor response (without the password hash)
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorResponse {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub email: String,
    pub phone_number: String,
    pub author_admin_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl From<Vendor> for VendorResponse {
    fn from(vendor: Vendor) -> Self {
        Self {
            id: vendor.id,
            first_name: vendor.first_name,
            last_name: vendor.last_name,
            gender: vendor.gender,
            email: vendor.email,
            phone_number: vendor.phone_number,
            author_admin_id: vendor.author_admin_id,
            created_at: vendor.created_at,
        }
    }
}

//! Admin domain models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Admin account
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Admin {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub email: String,
    pub phone_number: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Admin row to insert; the password is already hashed
#[derive(Debug, Clone)]
pub struct NewAdmin {
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub email: String,
    pub phone_number: String,
    pub password_hash: String,
}

/// Registration request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterAdminRequest {
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

/// Profile fields that can be updated one at a time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminField {
    FirstName,
    LastName,
    Gender,
    Email,
    PhoneNumber,
}

impl AdminField {
    /// Column name in the `admins` table
    pub fn column(self) -> &'static str {
        match self {
            AdminField::FirstName => "first_name",
            AdminField::LastName => "last_name",
            AdminField::Gender => "gender",
            AdminField::Email => "email",
            AdminField::PhoneNumber => "phone_number",
        }
    }

    /// Human readable name used in response messages
    pub fn label(self) -> &'static str {
        match self {
            AdminField::FirstName => "First name",
            AdminField::LastName => "Last name",
            AdminField::Gender => "Gender",
            AdminField::Email => "Email",
            AdminField::PhoneNumber => "Phone number",
        }
    }

    /// Apply a new value to an in-memory record
    pub fn apply(self, admin: &mut Admin, value: String) {
        match self {
            AdminField::FirstName => admin.first_name = value,
            AdminField::LastName => admin.last_name = value,
            AdminField::Gender => admin.gender = value,
            AdminField::Email => admin.email = value,
            AdminField::PhoneNumber => admin.phone_number = value,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFirstNameRequest {
    pub first_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLastNameRequest {
    pub last_name: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateGenderRequest {
    pub gender: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateEmailRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePhoneNumberRequest {
    pub phone_number: String,
}

/// Change password request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub old_password: String,
    #[validate(length(min = 1, message = "newPassword is required"))]
    pub new_password: String,
}

/// Admin response (without the password hash)
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminResponse {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub email: String,
    pub phone_number: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Admin> for AdminResponse {
    fn from(admin: Admin) -> Self {
        Self {
            id: admin.id,
            first_name: admin.first_name,
            last_name: admin.last_name,
            gender: admin.gender,
            email: admin.email,
            phone_number: admin.phone_number,
            created_at: admin.created_at,
            updated_at: admin.updated_at,
        }
    }
}

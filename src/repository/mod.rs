//! Database repository layer
//!
//! [`CredentialStore`] owns admin, vendor and product records. Each method is a
//! single persistence call that either fully succeeds or fully fails.

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    error::AppError,
    models::{
        admin::{Admin, AdminField, NewAdmin},
        product::{NewProduct, Product},
        vendor::{NewVendor, Vendor},
    },
};

pub mod memory_repo;
pub mod pg_repo;

pub use memory_repo::MemoryStore;
pub use pg_repo::{PgStore, PgStoreError};

/// Outcome of a store readiness check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    Healthy,
    Unhealthy(String),
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        matches!(self, HealthStatus::Healthy)
    }
}

#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Readiness check for the backing store
    async fn health_check(&self) -> HealthStatus;

    async fn find_admin_by_email(&self, email: &str) -> Result<Option<Admin>, AppError>;

    async fn find_admin_by_id(&self, id: Uuid) -> Result<Option<Admin>, AppError>;

    /// Insert an admin; a taken email yields [`AppError::Conflict`]
    async fn create_admin(&self, admin: NewAdmin) -> Result<Admin, AppError>;

    /// Overwrite one profile field; `None` when the admin does not exist
    async fn update_admin_field(
        &self,
        id: Uuid,
        field: AdminField,
        value: &str,
    ) -> Result<Option<Admin>, AppError>;

    /// Replace the stored password hash; `false` when the admin does not exist
    async fn update_admin_password(&self, id: Uuid, password_hash: &str)
        -> Result<bool, AppError>;

    async fn find_vendor_by_email(&self, email: &str) -> Result<Option<Vendor>, AppError>;

    /// Insert a vendor; a taken email yields [`AppError::Conflict`]
    async fn create_vendor(&self, vendor: NewVendor) -> Result<Vendor, AppError>;

    /// All vendors, newest first
    async fn list_vendors(&self) -> Result<Vec<Vendor>, AppError>;

    /// `false` when no vendor had this id
    async fn delete_vendor(&self, id: Uuid) -> Result<bool, AppError>;

    async fn create_product(&self, product: NewProduct) -> Result<Product, AppError>;

    /// All products, newest first
    async fn list_products(&self) -> Result<Vec<Product>, AppError>;

    /// Returns the deleted product so its image can be cleaned up
    async fn delete_product(&self, id: Uuid) -> Result<Option<Product>, AppError>;
}

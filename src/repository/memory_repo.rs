//! In-process repository
//!
//! Keeps records in memory behind a single `RwLock`, enforcing the same email
//! uniqueness rules as the PostgreSQL schema. Used by the integration tests and
//! for running the API without a database.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{CredentialStore, HealthStatus};
use crate::{
    error::AppError,
    models::{
        admin::{Admin, AdminField, NewAdmin},
        product::{NewProduct, Product},
        vendor::{NewVendor, Vendor},
    },
};

#[derive(Default)]
struct Tables {
    admins: HashMap<Uuid, Admin>,
    vendors: HashMap<Uuid, Vendor>,
    products: HashMap<Uuid, Product>,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn health_check(&self) -> HealthStatus {
        HealthStatus::Healthy
    }

    async fn find_admin_by_email(&self, email: &str) -> Result<Option<Admin>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.admins.values().find(|a| a.email == email).cloned())
    }

    async fn find_admin_by_id(&self, id: Uuid) -> Result<Option<Admin>, AppError> {
        Ok(self.tables.read().await.admins.get(&id).cloned())
    }

    async fn create_admin(&self, admin: NewAdmin) -> Result<Admin, AppError> {
        let mut tables = self.tables.write().await;
        if tables.admins.values().any(|a| a.email == admin.email) {
            return Err(AppError::Conflict("Admin already exists".to_string()));
        }

        let now = Utc::now();
        let record = Admin {
            id: Uuid::new_v4(),
            first_name: admin.first_name,
            last_name: admin.last_name,
            gender: admin.gender,
            email: admin.email,
            phone_number: admin.phone_number,
            password_hash: admin.password_hash,
            created_at: now,
            updated_at: now,
        };
        tables.admins.insert(record.id, record.clone());

        Ok(record)
    }

    async fn update_admin_field(
        &self,
        id: Uuid,
        field: AdminField,
        value: &str,
    ) -> Result<Option<Admin>, AppError> {
        let mut tables = self.tables.write().await;

        if field == AdminField::Email
            && tables
                .admins
                .values()
                .any(|a| a.id != id && a.email == value)
        {
            return Err(AppError::Conflict("Email already in use".to_string()));
        }

        let Some(admin) = tables.admins.get_mut(&id) else {
            return Ok(None);
        };
        field.apply(admin, value.to_string());
        admin.updated_at = Utc::now();

        Ok(Some(admin.clone()))
    }

    async fn update_admin_password(
        &self,
        id: Uuid,
        password_hash: &str,
    ) -> Result<bool, AppError> {
        let mut tables = self.tables.write().await;
        match tables.admins.get_mut(&id) {
            Some(admin) => {
                admin.password_hash = password_hash.to_string();
                admin.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn find_vendor_by_email(&self, email: &str) -> Result<Option<Vendor>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.vendors.values().find(|v| v.email == email).cloned())
    }

    async fn create_vendor(&self, vendor: NewVendor) -> Result<Vendor, AppError> {
        let mut tables = self.tables.write().await;
        if tables.vendors.values().any(|v| v.email == vendor.email) {
            return Err(AppError::Conflict("Vendor already exists".to_string()));
        }

        let record = Vendor {
            id: Uuid::new_v4(),
            first_name: vendor.first_name,
            last_name: vendor.last_name,
            gender: vendor.gender,
            email: vendor.email,
            phone_number: vendor.phone_number,
            password_hash: vendor.password_hash,
            author_admin_id: vendor.author_admin_id,
            created_at: Utc::now(),
        };
        tables.vendors.insert(record.id, record.clone());

        Ok(record)
    }

    async fn list_vendors(&self) -> Result<Vec<Vendor>, AppError> {
        let tables = self.tables.read().await;
        let mut vendors: Vec<Vendor> = tables.vendors.values().cloned().collect();
        vendors.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(vendors)
    }

    async fn delete_vendor(&self, id: Uuid) -> Result<bool, AppError> {
        Ok(self.tables.write().await.vendors.remove(&id).is_some())
    }

    async fn create_product(&self, product: NewProduct) -> Result<Product, AppError> {
        let record = Product {
            id: Uuid::new_v4(),
            name: product.name,
            price: product.price,
            category: product.category,
            description: product.description,
            image_ref: product.image_ref,
            author_admin_id: product.author_admin_id,
            created_at: Utc::now(),
        };
        self.tables
            .write()
            .await
            .products
            .insert(record.id, record.clone());

        Ok(record)
    }

    async fn list_products(&self) -> Result<Vec<Product>, AppError> {
        let tables = self.tables.read().await;
        let mut products: Vec<Product> = tables.products.values().cloned().collect();
        products.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(products)
    }

    async fn delete_product(&self, id: Uuid) -> Result<Option<Product>, AppError> {
        Ok(self.tables.write().await.products.remove(&id))
    }
}

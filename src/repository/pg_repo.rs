//! PostgreSQL repository (数据库访问层)
//!
//! 连接池、迁移与健康检查都由 [`PgStore`] 持有

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use uuid::Uuid;

use super::{CredentialStore, HealthStatus};
use crate::{
    config::DatabaseConfig,
    error::AppError,
    models::{
        admin::{Admin, AdminField, NewAdmin},
        product::{NewProduct, Product},
        vendor::{NewVendor, Vendor},
    },
};

/// 存储初始化错误
#[derive(Debug, thiserror::Error)]
pub enum PgStoreError {
    #[error("Connection failed: {0}")]
    Connect(#[source] sqlx::Error),

    #[error("Migration failed: {0}")]
    Migrate(#[source] sqlx::migrate::MigrateError),
}

#[derive(Clone)]
pub struct PgStore {
    db: PgPool,
}

impl PgStore {
    /// 按配置建立连接池
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, PgStoreError> {
        tracing::debug!("Creating database connection pool...");

        let db = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
            .max_lifetime(Duration::from_secs(config.max_lifetime_secs))
            .test_before_acquire(true)
            .connect(config.url.expose_secret())
            .await
            .map_err(|e| {
                tracing::error!("Failed to create database pool: {}", e);
                PgStoreError::Connect(e)
            })?;

        tracing::info!(
            max_connections = config.max_connections,
            min_connections = config.min_connections,
            "Database pool created"
        );

        Ok(Self { db })
    }

    /// 执行 admins / vendors / products 表迁移
    pub async fn migrate(&self) -> Result<(), PgStoreError> {
        tracing::info!("Running database migrations...");

        sqlx::migrate!("./migrations")
            .run(&self.db)
            .await
            .map_err(|e| {
                tracing::error!("Migration failed: {}", e);
                PgStoreError::Migrate(e)
            })?;

        tracing::info!("Migrations completed");
        Ok(())
    }

    /// 关闭连接池，等待在用连接归还
    pub async fn close(&self) {
        self.db.close().await;
    }

    fn record_pool_metrics(&self) {
        metrics::gauge!("db_pool_connections").set(self.db.size() as f64);
        metrics::gauge!("db_pool_idle").set(self.db.num_idle() as f64);
    }
}

/// 唯一约束冲突转换为 Conflict，其余保持数据库错误
fn conflict_or_db(err: sqlx::Error, message: &str) -> AppError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return AppError::Conflict(message.to_string());
        }
    }
    AppError::Database(err)
}

#[async_trait]
impl CredentialStore for PgStore {
    async fn health_check(&self) -> HealthStatus {
        self.record_pool_metrics();

        match sqlx::query("SELECT 1").fetch_one(&self.db).await {
            Ok(_) => HealthStatus::Healthy,
            Err(e) => {
                tracing::warn!("Database health check failed: {}", e);
                HealthStatus::Unhealthy(e.to_string())
            }
        }
    }

    async fn find_admin_by_email(&self, email: &str) -> Result<Option<Admin>, AppError> {
        let admin = sqlx::query_as::<_, Admin>("SELECT * FROM admins WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.db)
            .await?;

        Ok(admin)
    }

    async fn find_admin_by_id(&self, id: Uuid) -> Result<Option<Admin>, AppError> {
        let admin = sqlx::query_as::<_, Admin>("SELECT * FROM admins WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        Ok(admin)
    }

    async fn create_admin(&self, admin: NewAdmin) -> Result<Admin, AppError> {
        sqlx::query_as::<_, Admin>(
            r#"
            INSERT INTO admins (id, first_name, last_name, gender, email, phone_number, password_hash)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&admin.first_name)
        .bind(&admin.last_name)
        .bind(&admin.gender)
        .bind(&admin.email)
        .bind(&admin.phone_number)
        .bind(&admin.password_hash)
        .fetch_one(&self.db)
        .await
        .map_err(|e| conflict_or_db(e, "Admin already exists"))
    }

    async fn update_admin_field(
        &self,
        id: Uuid,
        field: AdminField,
        value: &str,
    ) -> Result<Option<Admin>, AppError> {
        // 列名来自枚举常量，不接受外部输入
        let sql = format!(
            "UPDATE admins SET {} = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
            field.column()
        );

        sqlx::query_as::<_, Admin>(&sql)
            .bind(id)
            .bind(value)
            .fetch_optional(&self.db)
            .await
            .map_err(|e| conflict_or_db(e, "Email already in use"))
    }

    async fn update_admin_password(
        &self,
        id: Uuid,
        password_hash: &str,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE admins SET password_hash = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(password_hash)
        .execute(&self.db)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn find_vendor_by_email(&self, email: &str) -> Result<Option<Vendor>, AppError> {
        let vendor = sqlx::query_as::<_, Vendor>("SELECT * FROM vendors WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.db)
            .await?;

        Ok(vendor)
    }

    async fn create_vendor(&self, vendor: NewVendor) -> Result<Vendor, AppError> {
        sqlx::query_as::<_, Vendor>(
            r#"
            INSERT INTO vendors
                (id, first_name, last_name, gender, email, phone_number, password_hash, author_admin_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&vendor.first_name)
        .bind(&vendor.last_name)
        .bind(&vendor.gender)
        .bind(&vendor.email)
        .bind(&vendor.phone_number)
        .bind(&vendor.password_hash)
        .bind(vendor.author_admin_id)
        .fetch_one(&self.db)
        .await
        .map_err(|e| conflict_or_db(e, "Vendor already exists"))
    }

    async fn list_vendors(&self) -> Result<Vec<Vendor>, AppError> {
        let vendors =
            sqlx::query_as::<_, Vendor>("SELECT * FROM vendors ORDER BY created_at DESC")
                .fetch_all(&self.db)
                .await?;

        Ok(vendors)
    }

    async fn delete_vendor(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM vendors WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn create_product(&self, product: NewProduct) -> Result<Product, AppError> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products
                (id, name, price, category, description, image_ref, author_admin_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&product.name)
        .bind(product.price)
        .bind(&product.category)
        .bind(&product.description)
        .bind(&product.image_ref)
        .bind(product.author_admin_id)
        .fetch_one(&self.db)
        .await?;

        Ok(product)
    }

    async fn list_products(&self) -> Result<Vec<Product>, AppError> {
        let products =
            sqlx::query_as::<_, Product>("SELECT * FROM products ORDER BY created_at DESC")
                .fetch_all(&self.db)
                .await?;

        Ok(products)
    }

    async fn delete_product(&self, id: Uuid) -> Result<Option<Product>, AppError> {
        let product =
            sqlx::query_as::<_, Product>("DELETE FROM products WHERE id = $1 RETURNING *")
                .bind(id)
                .fetch_optional(&self.db)
                .await?;

        Ok(product)
    }
}

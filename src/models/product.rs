//! Product domain models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::AppError;

/// Product listing
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub price: Decimal,
    pub category: String,
    pub description: String,
    /// Relative path of the stored image, e.g. `uploads/1717171717-42.png`
    pub image_ref: String,
    pub author_admin_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub price: Decimal,
    pub category: String,
    pub description: String,
    pub image_ref: String,
    pub author_admin_id: Uuid,
}

/// Text parts of the add-product multipart form
#[derive(Debug, Default)]
pub struct ProductForm {
    pub name: Option<String>,
    pub price: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
}

impl ProductForm {
    /// Record a text part by its form field name; unknown parts are ignored
    pub fn set(&mut self, field: &str, value: String) {
        match field {
            "productName" => self.name = Some(value),
            "productPrice" => self.price = Some(value),
            "productCategory" => self.category = Some(value),
            "productDescription" => self.description = Some(value),
            _ => tracing::debug!(field, "Ignoring unknown product form field"),
        }
    }

    /// Check required fields and turn the form into an insertable row
    pub fn into_new_product(
        self,
        image_ref: String,
        author_admin_id: Uuid,
    ) -> Result<NewProduct, AppError> {
        let name = required(self.name, "productName")?;
        let raw_price = required(self.price, "productPrice")?;
        let price = parse_price(&raw_price)?;

        Ok(NewProduct {
            name,
            price,
            category: self.category.unwrap_or_default().trim().to_string(),
            description: self.description.unwrap_or_default(),
            image_ref,
            author_admin_id,
        })
    }

    /// Validate without consuming, so bad input is rejected before the file is stored
    pub fn check(&self) -> Result<(), AppError> {
        required(self.name.clone(), "productName")?;
        parse_price(&required(self.price.clone(), "productPrice")?)?;
        Ok(())
    }
}

fn required(value: Option<String>, field: &str) -> Result<String, AppError> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(AppError::Validation(format!("{} is required", field))),
    }
}

/// Parse a non-negative price with at most two decimal places
pub fn parse_price(raw: &str) -> Result<Decimal, AppError> {
    let price = Decimal::from_str(raw.trim())
        .map_err(|_| AppError::Validation(format!("Invalid productPrice: {}", raw)))?;

    if price.is_sign_negative() {
        return Err(AppError::Validation("productPrice must not be negative".to_string()));
    }
    if price.scale() > 2 {
        return Err(AppError::Validation(
            "productPrice must have at most two decimal places".to_string(),
        ));
    }

    Ok(price)
}

/// Product response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub id: Uuid,
    pub name: String,
    pub price: Decimal,
    pub category: String,
    pub description: String,
    pub image_ref: String,
    pub author_admin_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            price: product.price,
            category: product.category,
            description: product.description,
            image_ref: product.image_ref,
            author_admin_id: product.author_admin_id,
            created_at: product.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price("12.50").unwrap(), Decimal::new(1250, 2));
        assert_eq!(parse_price(" 3 ").unwrap(), Decimal::new(3, 0));
        assert!(parse_price("-1").is_err());
        assert!(parse_price("1.999").is_err());
        assert!(parse_price("abc").is_err());
    }

    #[test]
    fn test_form_requires_name_and_price() {
        let mut form = ProductForm::default();
        form.set("productPrice", "9.99".to_string());
        assert!(form.check().is_err());

        form.set("productName", "Lamp".to_string());
        assert!(form.check().is_ok());

        let product = form
            .into_new_product("uploads/x.png".to_string(), Uuid::new_v4())
            .unwrap();
        assert_eq!(product.name, "Lamp");
        assert_eq!(product.category, "");
        assert_eq!(product.price, Decimal::new(999, 2));
    }
}

//! Business logic services layer

pub mod auth_service;
pub mod image_store;

pub use auth_service::AuthService;
pub use image_store::ImageStore;

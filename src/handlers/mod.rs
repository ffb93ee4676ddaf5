//! HTTP handlers

pub mod admin;
pub mod health;
pub mod product;
pub mod vendor;

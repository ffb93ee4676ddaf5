//! 数据模型模块
//! 管理员、供应商、商品以及认证相关的请求/响应类型

pub mod admin;
pub mod auth;
pub mod product;
pub mod vendor;

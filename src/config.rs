//! 配置系统
//! 从环境变量加载所有配置，使用 Secret 包装敏感信息

use config::{Config, ConfigError, Environment};
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;

/// 环境变量前缀，例如 VENDOR_ADMIN_DATABASE__URL
pub const ENV_PREFIX: &str = "VENDOR_ADMIN";

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址，例如 "0.0.0.0:3000"
    pub addr: String,
    /// 优雅关闭超时时间（秒）
    pub graceful_shutdown_timeout_secs: u64,
    /// 允许跨域携带 Cookie 的前端地址
    pub cors_allowed_origin: String,
    /// 商品图片存放目录
    pub upload_dir: String,
    /// 单次上传的最大字节数
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// 数据库连接 URL（使用 Secret 包装，防止日志泄露）
    pub url: Secret<String>,
    /// 最大连接数
    pub max_connections: u32,
    /// 最小连接数
    pub min_connections: u32,
    /// 获取连接超时时间（秒）
    pub acquire_timeout_secs: u64,
    /// 空闲连接超时时间（秒）
    pub idle_timeout_secs: u64,
    /// 连接最大生命周期（秒）
    pub max_lifetime_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// 日志级别: trace, debug, info, warn, error
    pub level: String,
    /// 日志格式: json, pretty
    pub format: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SecurityConfig {
    /// JWT 签名密钥（使用 Secret 包装，防止日志泄露）
    pub jwt_secret: Secret<String>,
    /// 会话令牌有效期（秒），0 表示不过期
    pub token_ttl_secs: u64,
    /// 会话 Cookie 名称
    pub cookie_name: String,
    /// Cookie 是否带 Secure 标记
    pub cookie_secure: bool,
    /// Argon2 内存开销（KiB）
    pub argon2_memory_kib: u32,
    /// Argon2 迭代次数
    pub argon2_iterations: u32,
    /// Argon2 并行度
    pub argon2_parallelism: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub security: SecurityConfig,
}

impl AppConfig {
    /// 从环境变量加载配置
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut settings = Config::builder();

        // 添加默认配置（密钥与数据库地址没有默认值，必须显式提供）
        settings = settings
            .set_default("server.addr", "0.0.0.0:3000")?
            .set_default("server.graceful_shutdown_timeout_secs", 30)?
            .set_default("server.cors_allowed_origin", "http://localhost:5173")?
            .set_default("server.upload_dir", "uploads")?
            .set_default("server.max_upload_bytes", 10 * 1024 * 1024)?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 2)?
            .set_default("database.acquire_timeout_secs", 30)?
            .set_default("database.idle_timeout_secs", 600)?
            .set_default("database.max_lifetime_secs", 1800)?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "json")?
            .set_default("security.token_ttl_secs", 86400)?
            .set_default("security.cookie_name", "token")?
            .set_default("security.cookie_secure", true)?
            .set_default("security.argon2_memory_kib", 19456)?
            .set_default("security.argon2_iterations", 2)?
            .set_default("security.argon2_parallelism", 1)?;

        settings = settings.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: AppConfig = settings.build()?.try_deserialize()?;

        // 验证配置
        config.validate()?;

        Ok(config)
    }

    /// 验证配置合法性
    pub fn validate(&self) -> Result<(), ConfigError> {
        // 验证端口范围
        if let Some(port_str) = self.server.addr.split(':').next_back() {
            if let Ok(port) = port_str.parse::<u16>() {
                if port != 0 && port < 1024 {
                    return Err(ConfigError::Message("Server port should be >= 1024".to_string()));
                }
            }
        }

        match self.logging.level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::Message(format!(
                    "Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
                    self.logging.level
                )))
            }
        }

        match self.logging.format.to_lowercase().as_str() {
            "json" | "pretty" => {}
            _ => {
                return Err(ConfigError::Message(format!(
                    "Invalid log format: {}. Must be one of: json, pretty",
                    self.logging.format
                )))
            }
        }

        if self.database.max_connections < self.database.min_connections {
            return Err(ConfigError::Message(
                "max_connections must be >= min_connections".to_string(),
            ));
        }

        // 验证 JWT 密钥长度（至少 32 字符）
        if self.security.jwt_secret.expose_secret().len() < 32 {
            return Err(ConfigError::Message(
                "JWT secret must be at least 32 characters long".to_string(),
            ));
        }

        // 0 表示令牌永不过期；否则最长 30 天
        if self.security.token_ttl_secs > 2_592_000 {
            return Err(ConfigError::Message(
                "token_ttl_secs must be at most 2592000 (30 days)".to_string(),
            ));
        }

        if self.security.cookie_name.is_empty()
            || !self
                .security
                .cookie_name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(ConfigError::Message(format!(
                "Invalid cookie name: {:?}",
                self.security.cookie_name
            )));
        }

        // 验证 Argon2 参数
        if self.security.argon2_parallelism == 0 || self.security.argon2_iterations == 0 {
            return Err(ConfigError::Message(
                "argon2_iterations and argon2_parallelism must be > 0".to_string(),
            ));
        }
        if self.security.argon2_memory_kib < 8 * self.security.argon2_parallelism {
            return Err(ConfigError::Message(
                "argon2_memory_kib must be at least 8 * argon2_parallelism".to_string(),
            ));
        }

        if self.server.max_upload_bytes == 0 {
            return Err(ConfigError::Message("max_upload_bytes must be > 0".to_string()));
        }

        let origin = &self.server.cors_allowed_origin;
        if !(origin.starts_with("http://") || origin.starts_with("https://"))
            || origin.chars().any(|c| c.is_whitespace() || c.is_control())
        {
            return Err(ConfigError::Message(format!(
                "Invalid cors_allowed_origin: {:?}",
                origin
            )));
        }

        Ok(())
    }
}

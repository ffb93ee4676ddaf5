//! 商品图片存储（本地目录）

use crate::error::AppError;
use chrono::Utc;
use rand::Rng;
use std::path::{Path, PathBuf};

/// 图片引用的公共前缀，对应 `/uploads` 静态路由
pub const IMAGE_REF_PREFIX: &str = "uploads/";

/// 允许保存的图片扩展名（小写）
const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "webp"];

pub struct ImageStore {
    root: PathBuf,
}

impl ImageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// 保存图片，返回 `uploads/<毫秒时间戳>-<随机数>.<扩展名>`
    ///
    /// 只接受 `IMAGE_EXTENSIONS` 中的扩展名，其余返回 BadRequest 且不写文件
    pub async fn save(&self, original_name: Option<&str>, bytes: &[u8]) -> Result<String, AppError> {
        let ext = original_name
            .and_then(image_extension)
            .ok_or_else(|| AppError::BadRequest("Unsupported image type".to_string()))?;

        tokio::fs::create_dir_all(&self.root).await.map_err(|e| {
            AppError::Internal(format!("Failed to create upload directory: {}", e))
        })?;

        let filename = generate_filename(&ext);
        let path = self.root.join(&filename);

        tokio::fs::write(&path, bytes).await.map_err(|e| {
            tracing::error!(path = %path.display(), "Failed to store image: {}", e);
            AppError::Internal(format!("Failed to store image: {}", e))
        })?;

        metrics::counter!("uploads_stored_total").increment(1);
        tracing::debug!(path = %path.display(), size = bytes.len(), "Stored product image");

        Ok(format!("{}{}", IMAGE_REF_PREFIX, filename))
    }

    /// 删除图片，失败只记录警告
    pub async fn remove(&self, image_ref: &str) {
        let Some(filename) = resolve_filename(image_ref) else {
            tracing::warn!(image_ref, "Refusing to remove image outside upload directory");
            return;
        };

        let path = self.root.join(filename);
        if let Err(e) = tokio::fs::remove_file(&path).await {
            tracing::warn!(path = %path.display(), "Failed to remove image: {}", e);
        }
    }
}

fn generate_filename(ext: &str) -> String {
    let millis = Utc::now().timestamp_millis();
    let suffix: u32 = rand::thread_rng().gen_range(0..1_000_000_000);

    format!("{}-{}.{}", millis, suffix, ext)
}

/// 取小写扩展名，不在图片白名单内返回 None
fn image_extension(name: &str) -> Option<String> {
    let (_, ext) = name.rsplit_once('.')?;
    let ext = ext.to_ascii_lowercase();
    IMAGE_EXTENSIONS.contains(&ext.as_str()).then_some(ext)
}

fn resolve_filename(image_ref: &str) -> Option<&str> {
    let filename = image_ref.strip_prefix(IMAGE_REF_PREFIX).unwrap_or(image_ref);
    if filename.is_empty()
        || filename.contains('/')
        || filename.contains('\\')
        || filename.contains("..")
    {
        return None;
    }
    Some(filename)
}

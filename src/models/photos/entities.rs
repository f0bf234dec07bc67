use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 照片实体
//
// username 仅用于展示投稿者，不关联用户表
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/photo.ts")]
pub struct Photo {
    pub id: i64,
    pub username: String,
    pub image_url: String,
    pub active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Photo {
    /// 将相对图片地址补全为完整地址
    pub fn with_resolved_url(mut self, public_base_url: &str) -> Self {
        self.image_url = resolve_image_url(&self.image_url, public_base_url);
        self
    }

    /// 本地上传的文件名（/uploads/ 下），外部地址返回 None
    pub fn stored_file_name(&self) -> Option<&str> {
        self.image_url
            .strip_prefix(UPLOADS_PREFIX)
            .filter(|name| !name.is_empty())
    }
}

/// 本地上传图片的 URL 前缀
pub const UPLOADS_PREFIX: &str = "/uploads/";

/// 以 http 开头的地址原样返回，否则拼接公共前缀
pub fn resolve_image_url(image_url: &str, public_base_url: &str) -> String {
    if image_url.starts_with("http") {
        image_url.to_string()
    } else {
        format!("{}{}", public_base_url.trim_end_matches('/'), image_url)
    }
}

/// 挑选结果：要么是一张待评照片，要么已全部评完
#[derive(Debug, Clone, PartialEq)]
pub enum NextPhoto {
    Photo(Photo),
    Exhausted,
}

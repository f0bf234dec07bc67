use serde::Deserialize;
use ts_rs::TS;

// 照片列表查询参数（HTTP 与存储层共用）
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/photo.ts")]
pub struct PhotoListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub active: Option<bool>,
    pub username: Option<String>,
}

// 通过地址登记照片
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/photo.ts")]
pub struct CreatePhotoRequest {
    pub username: String,
    pub image_url: String,
}

// 照片更新请求
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/photo.ts")]
pub struct UpdatePhotoRequest {
    pub username: Option<String>,
    pub image_url: Option<String>,
    pub active: Option<bool>,
}

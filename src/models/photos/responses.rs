use super::entities::Photo;
use crate::models::common::PaginationInfo;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/photo.ts")]
pub struct PhotoResponse {
    pub photo: Photo,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/photo.ts")]
pub struct PhotoListResponse {
    pub items: Vec<Photo>,
    pub pagination: PaginationInfo,
}

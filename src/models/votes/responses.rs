use std::collections::HashMap;

use super::entities::Vote;
use crate::models::common::PaginationInfo;
use crate::models::photos::entities::Photo;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/vote.ts")]
pub struct VoteBatchResponse {
    pub photo_id: i64,
    pub votes: Vec<Vote>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/vote.ts")]
pub struct VoteListResponse {
    pub items: Vec<Vote>,
}

// 评委已评照片及其评分，votes 的键为 "{photo_id}-{metric_id}"
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/vote.ts")]
pub struct JudgedPhotoListResponse {
    pub items: Vec<Photo>,
    pub votes: HashMap<String, f64>,
    pub pagination: PaginationInfo,
}

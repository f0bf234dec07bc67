use super::entities::Rating;
use serde::Deserialize;
use ts_rs::TS;

// 提交或修改一张照片的评分
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/vote.ts")]
pub struct CastVotesRequest {
    pub photo_id: i64,
    pub ratings: Vec<Rating>,
}

// 投票列表筛选
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/vote.ts")]
pub struct VoteListQuery {
    pub photo_id: Option<i64>,
    pub user_id: Option<i64>,
    pub metric_id: Option<i64>,
}

// 评委已评照片分页
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/vote.ts")]
pub struct JudgedPhotoQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
}

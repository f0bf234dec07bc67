use serde::Deserialize;
use ts_rs::TS;

// 排名筛选：active 只统计启用/停用的照片，judge_id 只统计某位评委的投票
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/result.ts")]
pub struct RankingQuery {
    pub active: Option<bool>,
    pub judge_id: Option<i64>,
}

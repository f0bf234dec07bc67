use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 投票实体：一位评委对一张照片在一个维度上的评分
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/vote.ts")]
pub struct Vote {
    pub id: i64,
    pub value: f64,
    pub user_id: i64,
    pub photo_id: i64,
    pub metric_id: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 单个维度的评分输入
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/vote.ts")]
pub struct Rating {
    pub metric_id: i64,
    pub value: f64,
}

/// 评委历史记录中投票映射的键
pub fn vote_key(photo_id: i64, metric_id: i64) -> String {
    format!("{photo_id}-{metric_id}")
}

use serde::Serialize;
use ts_rs::TS;

use crate::models::photos::entities::Photo;

// 单个维度的平均分
#[derive(Debug, Clone, Serialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/result.ts")]
pub struct MetricAverage {
    pub metric_id: i64,
    pub metric_name: String,
    pub scale: i32,
    pub average: f64,
    pub vote_count: i64,
}

// 照片得分：各维度平均分及其等权平均
#[derive(Debug, Clone, Serialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/result.ts")]
pub struct PhotoScore {
    pub photo: Photo,
    pub metric_averages: Vec<MetricAverage>,
    pub overall_score: f64,
}

impl PhotoScore {
    pub fn average_for(&self, metric_id: i64) -> Option<f64> {
        self.metric_averages
            .iter()
            .find(|m| m.metric_id == metric_id)
            .map(|m| m.average)
    }
}

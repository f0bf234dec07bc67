use super::entities::PhotoScore;
use crate::models::metrics::entities::Metric;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/result.ts")]
pub struct RankingResponse {
    pub metrics: Vec<Metric>,
    pub items: Vec<PhotoScore>,
    pub total_votes: i64,
}

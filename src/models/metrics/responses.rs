use super::entities::Metric;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/metric.ts")]
pub struct MetricResponse {
    pub metric: Metric,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/metric.ts")]
pub struct MetricListResponse {
    pub items: Vec<Metric>,
}

use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/metric.ts")]
pub struct CreateMetricRequest {
    pub name: String,
    pub scale: i32,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/metric.ts")]
pub struct UpdateMetricRequest {
    pub name: Option<String>,
    pub scale: Option<i32>,
}

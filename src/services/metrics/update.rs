use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::MetricService;
use crate::models::{
    ApiResponse, ErrorCode,
    metrics::{requests::UpdateMetricRequest, responses::MetricResponse},
};
use crate::services::error_response;
use crate::utils::validate::{validate_name, validate_scale};

pub async fn update_metric(
    service: &MetricService,
    metric_id: i64,
    mut update_data: UpdateMetricRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Some(name) = update_data.name.take() {
        let name = name.trim().to_string();
        if let Err(msg) = validate_name(&name) {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::MetricInvalid, msg)));
        }
        update_data.name = Some(name);
    }

    // 缩小量程不会改写已有投票，超出新量程的历史值仍参与统计
    if let Some(scale) = update_data.scale
        && let Err(msg) = validate_scale(scale)
    {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::MetricInvalid, msg)));
    }

    let storage = service.get_storage(request);

    match storage.update_metric(metric_id, update_data).await {
        Ok(Some(metric)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            MetricResponse { metric },
            "Metric updated successfully",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::MetricNotFound,
            "Metric not found",
        ))),
        Err(e) => Ok(error_response(&e, ErrorCode::MetricInvalid)),
    }
}

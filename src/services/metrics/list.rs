use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::MetricService;
use crate::models::{ApiResponse, ErrorCode, metrics::responses::MetricListResponse};

pub async fn list_metrics(
    service: &MetricService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_metrics().await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            MetricListResponse { items },
            "Metric list retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to retrieve metric list: {e}"),
            )),
        ),
    }
}

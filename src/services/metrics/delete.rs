use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::MetricService;
use crate::models::{ApiResponse, ErrorCode};

pub async fn delete_metric(
    service: &MetricService,
    metric_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.delete_metric(metric_id).await {
        Ok(true) => {
            tracing::info!("Metric {} deleted with its votes", metric_id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Metric deleted successfully")))
        }
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::MetricNotFound,
            "Metric not found",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Metric deletion failed: {e}"),
            )),
        ),
    }
}

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::MetricService;
use crate::models::{
    ApiResponse, ErrorCode,
    metrics::{requests::CreateMetricRequest, responses::MetricResponse},
};
use crate::services::error_response;
use crate::utils::validate::{validate_name, validate_scale};

pub async fn create_metric(
    service: &MetricService,
    mut metric_data: CreateMetricRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    metric_data.name = metric_data.name.trim().to_string();

    if let Err(msg) = validate_name(&metric_data.name).and_then(|_| validate_scale(metric_data.scale))
    {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::MetricInvalid, msg)));
    }

    let storage = service.get_storage(request);

    match storage.create_metric(metric_data).await {
        Ok(metric) => {
            tracing::info!("Metric {} ({}) created", metric.id, metric.name);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                MetricResponse { metric },
                "Metric created successfully",
            )))
        }
        Err(e) => Ok(error_response(&e, ErrorCode::MetricInvalid)),
    }
}

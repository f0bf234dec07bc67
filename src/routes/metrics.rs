use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::metrics::requests::{CreateMetricRequest, UpdateMetricRequest};
use crate::models::users::entities::UserRole;
use crate::services::MetricService;
use crate::utils::SafeIDI64;

// 懒加载的全局 MetricService 实例
static METRIC_SERVICE: Lazy<MetricService> = Lazy::new(MetricService::new_lazy);

pub async fn list_metrics(req: HttpRequest) -> ActixResult<HttpResponse> {
    METRIC_SERVICE.list_metrics(&req).await
}

pub async fn create_metric(
    req: HttpRequest,
    metric_data: web::Json<CreateMetricRequest>,
) -> ActixResult<HttpResponse> {
    METRIC_SERVICE
        .create_metric(metric_data.into_inner(), &req)
        .await
}

pub async fn update_metric(
    req: HttpRequest,
    metric_id: SafeIDI64,
    update_data: web::Json<UpdateMetricRequest>,
) -> ActixResult<HttpResponse> {
    METRIC_SERVICE
        .update_metric(metric_id.0, update_data.into_inner(), &req)
        .await
}

pub async fn delete_metric(req: HttpRequest, metric_id: SafeIDI64) -> ActixResult<HttpResponse> {
    METRIC_SERVICE.delete_metric(metric_id.0, &req).await
}

// 配置路由
pub fn configure_metric_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/metrics")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    // 评委打分时需要读取维度列表
                    .route(web::get().to(list_metrics))
                    .route(
                        web::post()
                            .to(create_metric)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    ),
            )
            .service(
                web::resource("/{id}")
                    .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles()))
                    .route(web::put().to(update_metric))
                    .route(web::delete().to(delete_metric)),
            ),
    );
}

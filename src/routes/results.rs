use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::results::requests::RankingQuery;
use crate::models::users::entities::UserRole;
use crate::services::ResultService;

// 懒加载的全局 ResultService 实例
static RESULT_SERVICE: Lazy<ResultService> = Lazy::new(ResultService::new_lazy);

pub async fn get_rankings(
    req: HttpRequest,
    query: web::Query<RankingQuery>,
) -> ActixResult<HttpResponse> {
    RESULT_SERVICE.get_rankings(query.into_inner(), &req).await
}

// 配置路由
pub fn configure_result_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/results")
            .wrap(middlewares::RequireJWT)
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles()))
                    .route("", web::get().to(get_rankings)),
            ),
    );
}

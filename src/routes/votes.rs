use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::users::entities::UserRole;
use crate::models::votes::requests::{CastVotesRequest, JudgedPhotoQuery, VoteListQuery};
use crate::services::VoteService;

// 懒加载的全局 VoteService 实例
static VOTE_SERVICE: Lazy<VoteService> = Lazy::new(VoteService::new_lazy);

pub async fn submit_votes(
    req: HttpRequest,
    vote_data: web::Json<CastVotesRequest>,
) -> ActixResult<HttpResponse> {
    VOTE_SERVICE.submit_votes(vote_data.into_inner(), &req).await
}

pub async fn update_votes(
    req: HttpRequest,
    vote_data: web::Json<CastVotesRequest>,
) -> ActixResult<HttpResponse> {
    VOTE_SERVICE.update_votes(vote_data.into_inner(), &req).await
}

pub async fn list_votes(
    req: HttpRequest,
    query: web::Query<VoteListQuery>,
) -> ActixResult<HttpResponse> {
    VOTE_SERVICE.list_votes(query.into_inner(), &req).await
}

pub async fn list_mine(
    req: HttpRequest,
    query: web::Query<JudgedPhotoQuery>,
) -> ActixResult<HttpResponse> {
    VOTE_SERVICE.list_mine(query.into_inner(), &req).await
}

// 配置路由
pub fn configure_vote_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/votes")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("/mine")
                    .wrap(middlewares::RequireRole::new_any(UserRole::judge_roles()))
                    .route(web::get().to(list_mine)),
            )
            .service(
                web::resource("")
                    .route(
                        web::get()
                            .to(list_votes)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    )
                    .route(
                        web::post()
                            .to(submit_votes)
                            .wrap(middlewares::RequireRole::new_any(UserRole::judge_roles())),
                    )
                    .route(
                        web::put()
                            .to(update_votes)
                            .wrap(middlewares::RequireRole::new_any(UserRole::judge_roles())),
                    ),
            ),
    );
}

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ResultService;
use super::ranking::load_and_rank;
use crate::models::{ApiResponse, ErrorCode, results::requests::RankingQuery};

pub async fn get_rankings(
    service: &ResultService,
    query: RankingQuery,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let base_url = &service.get_config().upload.public_base_url;

    match load_and_rank(storage.as_ref(), &query).await {
        Ok(mut response) => {
            for score in &mut response.items {
                score.photo = score.photo.clone().with_resolved_url(base_url);
            }
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                response,
                "Rankings computed successfully",
            )))
        }
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to compute rankings: {e}"),
            )),
        ),
    }
}

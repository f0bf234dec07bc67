use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::VoteService;
use crate::middlewares::RequireJWT;
use crate::models::{ApiResponse, ErrorCode, votes::requests::JudgedPhotoQuery};

pub async fn list_mine(
    service: &VoteService,
    query: JudgedPhotoQuery,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(judge_id) = RequireJWT::extract_user_id(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized access, please login",
        )));
    };

    let storage = service.get_storage(request);
    let base_url = &service.get_config().upload.public_base_url;

    match storage.list_judged_photos(judge_id, query).await {
        Ok(mut response) => {
            response.items = response
                .items
                .into_iter()
                .map(|photo| photo.with_resolved_url(base_url))
                .collect();
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                response,
                "Judged photos retrieved successfully",
            )))
        }
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to retrieve judged photos: {e}"),
            )),
        ),
    }
}

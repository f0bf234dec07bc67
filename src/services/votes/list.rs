use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::VoteService;
use crate::models::{
    ApiResponse, ErrorCode,
    votes::{requests::VoteListQuery, responses::VoteListResponse},
};

pub async fn list_votes(
    service: &VoteService,
    query: VoteListQuery,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_votes(query).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            VoteListResponse { items },
            "Vote list retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to retrieve vote list: {e}"),
            )),
        ),
    }
}

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::VoteService;
use super::recorder;
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse, ErrorCode,
    votes::{requests::CastVotesRequest, responses::VoteBatchResponse},
};
use crate::services::error_response;

pub async fn update_votes(
    service: &VoteService,
    vote_data: CastVotesRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(judge_id) = RequireJWT::extract_user_id(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized access, please login",
        )));
    };

    let storage = service.get_storage(request);

    match recorder::update(
        storage.as_ref(),
        judge_id,
        vote_data.photo_id,
        &vote_data.ratings,
    )
    .await
    {
        Ok(votes) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            VoteBatchResponse {
                photo_id: vote_data.photo_id,
                votes,
            },
            "Votes updated successfully",
        ))),
        Err(e) => Ok(error_response(&e, ErrorCode::VoteInvalid)),
    }
}

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::PhotoService;
use super::selector::select_next;
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse, ErrorCode,
    photos::{entities::NextPhoto, responses::PhotoResponse},
};
use crate::services::error_response;

pub async fn next_photo(service: &PhotoService, request: &HttpRequest) -> ActixResult<HttpResponse> {
    let Some(judge_id) = RequireJWT::extract_user_id(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized access, please login",
        )));
    };

    let storage = service.get_storage(request);
    let config = service.get_config();

    match select_next(
        storage.as_ref(),
        judge_id,
        config.judging.selection,
        &config.upload.public_base_url,
    )
    .await
    {
        Ok(NextPhoto::Photo(photo)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            PhotoResponse { photo },
            "Next photo retrieved successfully",
        ))),
        Ok(NextPhoto::Exhausted) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::NoMorePhotos,
            "No more photos to judge",
        ))),
        Err(e) => Ok(error_response(&e, ErrorCode::BadRequest)),
    }
}

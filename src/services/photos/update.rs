use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::PhotoService;
use crate::models::{
    ApiResponse, ErrorCode,
    photos::{requests::UpdatePhotoRequest, responses::PhotoResponse},
};
use crate::services::error_response;
use crate::utils::validate::{validate_image_url, validate_username};

pub async fn update_photo(
    service: &PhotoService,
    photo_id: i64,
    mut update_data: UpdatePhotoRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Some(username) = update_data.username.take() {
        let username = username.trim().to_string();
        if let Err(msg) = validate_username(&username) {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::PhotoInvalid, msg)));
        }
        update_data.username = Some(username);
    }

    if let Some(image_url) = update_data.image_url.take() {
        let image_url = image_url.trim().to_string();
        if let Err(msg) = validate_image_url(&image_url) {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::PhotoInvalid, msg)));
        }
        update_data.image_url = Some(image_url);
    }

    let storage = service.get_storage(request);

    match storage.update_photo(photo_id, update_data).await {
        Ok(Some(photo)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            PhotoResponse { photo },
            "Photo updated successfully",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::PhotoNotFound,
            "Photo not found",
        ))),
        Err(e) => Ok(error_response(&e, ErrorCode::PhotoInvalid)),
    }
}

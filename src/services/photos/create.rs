use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::PhotoService;
use crate::models::{
    ApiResponse, ErrorCode,
    photos::{requests::CreatePhotoRequest, responses::PhotoResponse},
};
use crate::services::error_response;
use crate::utils::validate::{validate_image_url, validate_username};

pub async fn create_photo(
    service: &PhotoService,
    photo_data: CreatePhotoRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let username = photo_data.username.trim();
    let image_url = photo_data.image_url.trim();

    if let Err(msg) = validate_username(username).and_then(|_| validate_image_url(image_url)) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::PhotoInvalid, msg)));
    }

    let storage = service.get_storage(request);

    match storage.create_photo(username, image_url).await {
        Ok(photo) => {
            tracing::info!("Photo {} registered for {}", photo.id, photo.username);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                PhotoResponse { photo },
                "Photo created successfully",
            )))
        }
        Err(e) => Ok(error_response(&e, ErrorCode::PhotoInvalid)),
    }
}

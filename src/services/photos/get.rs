use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::PhotoService;
use crate::models::photos::responses::PhotoResponse;
use crate::models::{ApiResponse, ErrorCode};

pub async fn get_photo(
    service: &PhotoService,
    photo_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.get_photo_by_id(photo_id).await {
        Ok(Some(photo)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            PhotoResponse { photo },
            "Photo retrieved successfully",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::PhotoNotFound,
            "Photo not found",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to get photo: {e}"),
            )),
        ),
    }
}

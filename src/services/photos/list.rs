use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::PhotoService;
use crate::models::{ApiResponse, ErrorCode, photos::requests::PhotoListQuery};

pub async fn list_photos(
    service: &PhotoService,
    query: PhotoListQuery,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_photos_with_pagination(query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Photo list retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to retrieve photo list: {e}"),
            )),
        ),
    }
}

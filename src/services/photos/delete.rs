use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::path::Path;

use super::PhotoService;
use crate::errors::PhotoVoteError;
use crate::models::{ApiResponse, ErrorCode};

pub async fn delete_photo(
    service: &PhotoService,
    photo_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let photo = match storage.get_photo_by_id(photo_id).await {
        Ok(Some(photo)) => photo,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::PhotoNotFound,
                "Photo not found",
            )));
        }
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to get photo: {e}"),
                )),
            );
        }
    };

    match storage.delete_photo(photo_id).await {
        Ok(true) => {
            // 数据库记录删除成功后再删除本地文件，失败只记录日志
            if let Some(file_name) = photo.stored_file_name() {
                let path = Path::new(&service.get_config().upload.dir).join(file_name);
                if let Err(e) = std::fs::remove_file(&path)
                    && e.kind() != std::io::ErrorKind::NotFound
                {
                    tracing::warn!("{}", PhotoVoteError::from(e));
                }
            }
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Photo deleted successfully")))
        }
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::PhotoNotFound,
            "Photo not found",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Photo deletion failed: {e}"),
            )),
        ),
    }
}

use actix_web::{HttpResponse, Result as ActixResult, http::header};
use std::path::Path;

use super::PhotoService;
use crate::errors::PhotoVoteError;
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::file_magic::content_type_for;

/// `file_name` 已由 `SafeFileName` 校验，不含路径分隔符
pub async fn serve_image(service: &PhotoService, file_name: &str) -> ActixResult<HttpResponse> {
    let config = service.get_config();
    let path = Path::new(&config.upload.dir).join(file_name);

    let data = match std::fs::read(&path) {
        Ok(data) => data,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::FileNotFound,
                "File not found",
            )));
        }
        Err(e) => {
            tracing::error!("{}", PhotoVoteError::from(e));
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "File read failed",
                )),
            );
        }
    };

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{ext}"))
        .unwrap_or_default();

    Ok(HttpResponse::Ok()
        .insert_header((header::CONTENT_TYPE, content_type_for(&extension)))
        .insert_header((header::CACHE_CONTROL, "public, max-age=86400"))
        .body(data))
}

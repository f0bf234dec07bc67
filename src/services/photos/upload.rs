use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use futures_util::TryStreamExt;
use futures_util::stream::StreamExt;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use uuid::Uuid;

use super::PhotoService;
use crate::errors::PhotoVoteError;
use crate::models::photos::entities::UPLOADS_PREFIX;
use crate::models::photos::responses::PhotoResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::error_response;
use crate::utils::validate::validate_username;
use crate::utils::validate_magic_bytes;

/// multipart 表单：`username` 文本字段 + 单个 `file` 图片字段
pub async fn upload_photo(
    service: &PhotoService,
    req: &HttpRequest,
    mut payload: Multipart,
) -> ActixResult<HttpResponse> {
    let config = service.get_config();
    let upload_dir = &config.upload.dir;
    let max_size = config.upload.max_size;
    let allowed_types = &config.upload.allowed_types;

    if !Path::new(upload_dir).exists()
        && let Err(e) = fs::create_dir_all(upload_dir)
    {
        tracing::error!("{}", PhotoVoteError::file_operation(format!("{e}")));
        return Ok(
            HttpResponse::InternalServerError().json(ApiResponse::<()>::error_empty(
                ErrorCode::FileUploadFailed,
                "创建上传目录失败",
            )),
        );
    }

    let mut username = String::new();
    let mut stored_name = String::new();
    let mut file_uploaded = false;

    loop {
        let mut field = match payload.try_next().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                discard(upload_dir, &stored_name);
                return Err(e.into());
            }
        };
        let content_disposition = field.content_disposition();
        let name = content_disposition
            .and_then(|cd| cd.get_name())
            .unwrap_or_default()
            .to_string();

        match name.as_str() {
            "username" => {
                let mut bytes = Vec::new();
                while let Some(chunk) = field.next().await {
                    match chunk {
                        Ok(data) => bytes.extend_from_slice(&data),
                        Err(e) => {
                            discard(upload_dir, &stored_name);
                            return Err(e.into());
                        }
                    }
                }
                username = String::from_utf8_lossy(&bytes).trim().to_string();
            }
            "file" => {
                if file_uploaded {
                    discard(upload_dir, &stored_name);
                    return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                        ErrorCode::MultifileUploadNotAllowed,
                        "Only one file can be uploaded at a time",
                    )));
                }
                file_uploaded = true;

                let original_name = content_disposition
                    .and_then(|cd| cd.get_filename())
                    .map(|s| s.to_string())
                    .unwrap_or_default();

                let extension = Path::new(&original_name)
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .map(|ext| format!(".{}", ext.to_lowercase()))
                    .unwrap_or_default();

                if !allowed_types.iter().any(|t| t.to_lowercase() == extension) {
                    return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                        ErrorCode::FileTypeNotAllowed,
                        "File type not allowed",
                    )));
                }

                stored_name = format!("{}{}", Uuid::new_v4(), extension);
                let file_path = Path::new(upload_dir).join(&stored_name);
                let mut f = match File::create(&file_path) {
                    Ok(file) => file,
                    Err(e) => {
                        tracing::error!("{}", PhotoVoteError::file_operation(format!("{e}")));
                        return Ok(HttpResponse::InternalServerError().json(
                            ApiResponse::<()>::error_empty(
                                ErrorCode::FileUploadFailed,
                                "文件创建失败",
                            ),
                        ));
                    }
                };

                let mut total_size: usize = 0;
                let mut first_chunk = true;
                while let Some(chunk) = field.next().await {
                    let data = match chunk {
                        Ok(data) => data,
                        Err(e) => {
                            discard(upload_dir, &stored_name);
                            return Err(e.into());
                        }
                    };

                    // 第一个 chunk 校验魔术字节
                    if first_chunk {
                        first_chunk = false;
                        if !validate_magic_bytes(&data, &extension) {
                            discard(upload_dir, &stored_name);
                            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                                ErrorCode::FileTypeNotAllowed,
                                "文件内容与扩展名不匹配",
                            )));
                        }
                    }

                    total_size += data.len();
                    if total_size > max_size {
                        discard(upload_dir, &stored_name);
                        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                            ErrorCode::FileSizeExceeded,
                            "File size exceeds the limit",
                        )));
                    }
                    if let Err(e) = f.write_all(&data) {
                        discard(upload_dir, &stored_name);
                        tracing::error!("{}", PhotoVoteError::from(e));
                        return Ok(HttpResponse::InternalServerError().json(
                            ApiResponse::<()>::error_empty(
                                ErrorCode::FileUploadFailed,
                                "文件写入失败",
                            ),
                        ));
                    }
                }

                if total_size == 0 {
                    discard(upload_dir, &stored_name);
                    return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                        ErrorCode::FileUploadFailed,
                        "Uploaded file is empty",
                    )));
                }
            }
            _ => {}
        }
    }

    if !file_uploaded {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::FileNotFound,
            "No file found in upload payload",
        )));
    }

    if let Err(msg) = validate_username(&username) {
        discard(upload_dir, &stored_name);
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::PhotoInvalid,
            msg,
        )));
    }

    let storage = service.get_storage(req);
    let image_url = format!("{UPLOADS_PREFIX}{stored_name}");

    match storage.create_photo(&username, &image_url).await {
        Ok(photo) => {
            tracing::info!("Photo {} uploaded as {}", photo.id, stored_name);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                PhotoResponse { photo },
                "Photo uploaded successfully",
            )))
        }
        Err(e) => {
            discard(upload_dir, &stored_name);
            Ok(error_response(&e, ErrorCode::PhotoInvalid))
        }
    }
}

// 删除未登记成功的上传文件
fn discard(upload_dir: &str, stored_name: &str) {
    if stored_name.is_empty() {
        return;
    }
    let _ = fs::remove_file(Path::new(upload_dir).join(stored_name));
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, test, web};

    const BOUNDARY: &str = "photovote-boundary";

    #[::core::prelude::v1::test]
    fn test_discard_removes_stored_file() {
        let dir = std::env::temp_dir().join(format!("photovote-{}", Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        let dir = dir.to_string_lossy().to_string();
        fs::write(Path::new(&dir).join("a.jpg"), b"x").unwrap();

        discard(&dir, "");
        assert!(Path::new(&dir).join("a.jpg").exists());

        discard(&dir, "a.jpg");
        assert!(!Path::new(&dir).join("a.jpg").exists());

        // 文件已不存在时静默忽略
        discard(&dir, "a.jpg");
        fs::remove_dir_all(&dir).unwrap();
    }

    #[actix_web::test]
    async fn test_truncated_payload_is_rejected() {
        let app = test::init_service(App::new().route(
            "/upload",
            web::post().to(|req: HttpRequest, payload: Multipart| async move {
                upload_photo(&PhotoService::new_lazy(), &req, payload).await
            }),
        ))
        .await;

        // username 字段没有结束边界
        let body = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"username\"\r\n\r\nalice"
        );
        let req = test::TestRequest::post()
            .uri("/upload")
            .insert_header((
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            ))
            .set_payload(body)
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_client_error());
    }
}

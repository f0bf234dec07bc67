use actix_web::{HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::services::PhotoService;
use crate::utils::SafeFileName;

static PHOTO_SERVICE: Lazy<PhotoService> = Lazy::new(PhotoService::new_lazy);

pub async fn serve_image(file_name: SafeFileName) -> ActixResult<HttpResponse> {
    PHOTO_SERVICE.serve_image(&file_name.0).await
}

// 图片公开访问，评委端直接用 <img> 加载
pub fn configure_upload_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/uploads").route("/{name}", web::get().to(serve_image)));
}

pub mod create;
pub mod delete;
pub mod get;
pub mod image;
pub mod list;
pub mod next;
pub mod selector;
pub mod update;
pub mod upload;

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::models::photos::requests::{CreatePhotoRequest, PhotoListQuery, UpdatePhotoRequest};
use crate::storage::Storage;

pub struct PhotoService {
    storage: Option<Arc<dyn Storage>>,
}

impl PhotoService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    pub(crate) fn get_config(&self) -> &AppConfig {
        AppConfig::get()
    }

    // 为当前评委挑选下一张照片
    pub async fn next_photo(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        next::next_photo(self, request).await
    }

    // 分页列出照片
    pub async fn list_photos(
        &self,
        query: PhotoListQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_photos(self, query, request).await
    }

    pub async fn get_photo(&self, photo_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        get::get_photo(self, photo_id, request).await
    }

    // 通过地址登记照片
    pub async fn create_photo(
        &self,
        photo_data: CreatePhotoRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_photo(self, photo_data, request).await
    }

    // 上传图片文件并登记
    pub async fn upload_photo(
        &self,
        request: &HttpRequest,
        payload: Multipart,
    ) -> ActixResult<HttpResponse> {
        upload::upload_photo(self, request, payload).await
    }

    pub async fn update_photo(
        &self,
        photo_id: i64,
        update_data: UpdatePhotoRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_photo(self, photo_id, update_data, request).await
    }

    // 删除照片及其投票，本地文件一并删除
    pub async fn delete_photo(
        &self,
        photo_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_photo(self, photo_id, request).await
    }

    // 读取上传目录中的图片
    pub async fn serve_image(&self, file_name: &str) -> ActixResult<HttpResponse> {
        image::serve_image(self, file_name).await
    }
}

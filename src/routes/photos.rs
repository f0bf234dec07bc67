use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::photos::requests::{CreatePhotoRequest, PhotoListQuery, UpdatePhotoRequest};
use crate::models::users::entities::UserRole;
use crate::services::PhotoService;
use crate::utils::SafeIDI64;

// 懒加载的全局 PhotoService 实例
static PHOTO_SERVICE: Lazy<PhotoService> = Lazy::new(PhotoService::new_lazy);

pub async fn next_photo(req: HttpRequest) -> ActixResult<HttpResponse> {
    PHOTO_SERVICE.next_photo(&req).await
}

pub async fn list_photos(
    req: HttpRequest,
    query: web::Query<PhotoListQuery>,
) -> ActixResult<HttpResponse> {
    PHOTO_SERVICE.list_photos(query.into_inner(), &req).await
}

pub async fn create_photo(
    req: HttpRequest,
    photo_data: web::Json<CreatePhotoRequest>,
) -> ActixResult<HttpResponse> {
    PHOTO_SERVICE.create_photo(photo_data.into_inner(), &req).await
}

pub async fn upload_photo(
    req: HttpRequest,
    payload: actix_multipart::Multipart,
) -> ActixResult<HttpResponse> {
    PHOTO_SERVICE.upload_photo(&req, payload).await
}

pub async fn get_photo(req: HttpRequest, photo_id: SafeIDI64) -> ActixResult<HttpResponse> {
    PHOTO_SERVICE.get_photo(photo_id.0, &req).await
}

pub async fn update_photo(
    req: HttpRequest,
    photo_id: SafeIDI64,
    update_data: web::Json<UpdatePhotoRequest>,
) -> ActixResult<HttpResponse> {
    PHOTO_SERVICE
        .update_photo(photo_id.0, update_data.into_inner(), &req)
        .await
}

pub async fn delete_photo(req: HttpRequest, photo_id: SafeIDI64) -> ActixResult<HttpResponse> {
    PHOTO_SERVICE.delete_photo(photo_id.0, &req).await
}

// 配置路由
pub fn configure_photo_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/photos")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("/next")
                    .wrap(middlewares::RequireRole::new_any(UserRole::judge_roles()))
                    .route(web::get().to(next_photo)),
            )
            .service(
                web::resource("/upload")
                    .wrap(middlewares::RateLimit::photo_upload())
                    .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles()))
                    .route(web::post().to(upload_photo)),
            )
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles()))
                    .route("", web::get().to(list_photos))
                    .route("", web::post().to(create_photo))
                    .route("/{id}", web::get().to(get_photo))
                    .route("/{id}", web::put().to(update_photo))
                    .route("/{id}", web::delete().to(delete_photo)),
            ),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{App, test};

    use crate::models::ErrorCode;
    use crate::models::metrics::requests::CreateMetricRequest;
    use crate::models::votes::entities::Rating;
    use crate::routes::test_support::{TestState, bearer};
    use crate::services::votes::recorder;
    use crate::storage::Storage;

    #[actix_web::test]
    async fn test_next_until_no_more_photos() {
        let state = TestState::new().await;
        let judge = state.user("judge", UserRole::Judge).await;
        let metric = state
            .storage
            .create_metric(CreateMetricRequest {
                name: "构图".to_string(),
                scale: 10,
            })
            .await
            .unwrap();
        let photo = state.storage.create_photo("alice", "/uploads/a.jpg").await.unwrap();

        let app = test::init_service(
            App::new()
                .app_data(state.storage_data())
                .app_data(state.cache_data())
                .configure(configure_photo_routes),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/v1/photos/next")
            .insert_header(bearer(&judge))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["code"], ErrorCode::Success as i32);
        assert_eq!(body["data"]["photo"]["id"], photo.id);

        recorder::submit(
            state.storage.as_ref(),
            judge.id,
            photo.id,
            &[Rating {
                metric_id: metric.id,
                value: 7.0,
            }],
        )
        .await
        .unwrap();

        let req = test::TestRequest::get()
            .uri("/api/v1/photos/next")
            .insert_header(bearer(&judge))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], ErrorCode::NoMorePhotos as i32);
    }

    #[actix_web::test]
    async fn test_next_requires_judge() {
        let state = TestState::new().await;
        let admin = state.user("admin", UserRole::Admin).await;

        let app = test::init_service(
            App::new()
                .app_data(state.storage_data())
                .app_data(state.cache_data())
                .configure(configure_photo_routes),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/v1/photos/next")
            .insert_header(bearer(&admin))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

        let req = test::TestRequest::get().uri("/api/v1/photos/next").to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::UNAUTHORIZED
        );
    }
}

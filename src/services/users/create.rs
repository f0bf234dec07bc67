use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::UserService;
use crate::errors::PhotoVoteError;
use crate::models::{
    ApiResponse, ErrorCode,
    users::{requests::CreateUserRequest, responses::UserResponse},
};
use crate::services::error_response;
use crate::utils::random_code::generate_random_code;
use crate::utils::validate::{validate_key, validate_name};

/// 自动生成的登录 key 长度
pub const GENERATED_KEY_LEN: usize = 12;

pub async fn create_user(
    service: &UserService,
    mut user_data: CreateUserRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    user_data.name = user_data.name.trim().to_string();
    if let Err(msg) = validate_name(&user_data.name) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::UserNameInvalid, msg)));
    }

    // 未提供 key 时自动生成
    let key = match user_data.key.take() {
        Some(key) => key,
        None => generate_random_code(GENERATED_KEY_LEN),
    };
    if let Err(msg) = validate_key(&key) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::UserKeyInvalid, msg)));
    }
    user_data.key = Some(key);

    let storage = service.get_storage(request);

    match storage.create_user(user_data).await {
        Ok(user) => {
            info!("User {} created with role {}", user.id, user.role);
            Ok(HttpResponse::Created()
                .json(ApiResponse::success(UserResponse { user }, "User created successfully")))
        }
        Err(PhotoVoteError::Conflict(_)) => Ok(HttpResponse::Conflict().json(
            ApiResponse::error_empty(ErrorCode::UserKeyAlreadyExists, "Key already exists"),
        )),
        Err(e) => Ok(error_response(&e, ErrorCode::UserCreationFailed)),
    }
}

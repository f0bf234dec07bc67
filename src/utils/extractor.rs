//! 安全的路径参数提取器
//!
//! 解析失败时直接返回统一格式的 400 响应，处理函数只会拿到合法的值。

use actix_web::{
    FromRequest, HttpRequest, HttpResponse, dev::Payload, error::InternalError,
};
use futures_util::future::{Ready, ready};

use crate::models::{ApiResponse, ErrorCode};

fn bad_request(message: String) -> actix_web::Error {
    InternalError::from_response(
        message.clone(),
        HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, message)),
    )
    .into()
}

/// 路径中的 `{id}`，必须是正整数
#[derive(Debug, Clone, Copy)]
pub struct SafeIDI64(pub i64);

impl FromRequest for SafeIDI64 {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let raw = req.match_info().get("id").unwrap_or_default();
        let result = match raw.parse::<i64>() {
            Ok(id) if id > 0 => Ok(SafeIDI64(id)),
            _ => Err(bad_request(format!("Invalid id: '{raw}'"))),
        };
        ready(result)
    }
}

/// 路径中的 `{name}`，只允许单层文件名
#[derive(Debug, Clone)]
pub struct SafeFileName(pub String);

impl SafeFileName {
    pub fn is_safe(name: &str) -> bool {
        !name.is_empty()
            && name.len() <= 255
            && !name.starts_with('.')
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
    }
}

impl FromRequest for SafeFileName {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let raw = req.match_info().get("name").unwrap_or_default();
        let result = if Self::is_safe(raw) {
            Ok(SafeFileName(raw.to_string()))
        } else {
            Err(bad_request(format!("Invalid file name: '{raw}'")))
        };
        ready(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[actix_web::test]
    async fn test_id_extraction() {
        let req = TestRequest::default().param("id", "42").to_http_request();
        let id = SafeIDI64::extract(&req).await.unwrap();
        assert_eq!(id.0, 42);

        let req = TestRequest::default().param("id", "-1").to_http_request();
        assert!(SafeIDI64::extract(&req).await.is_err());

        let req = TestRequest::default().param("id", "abc").to_http_request();
        assert!(SafeIDI64::extract(&req).await.is_err());
    }

    #[test]
    fn test_file_name_rules() {
        assert!(SafeFileName::is_safe("3f2a-photo.jpg"));
        assert!(!SafeFileName::is_safe("../etc/passwd"));
        assert!(!SafeFileName::is_safe(".hidden"));
        assert!(!SafeFileName::is_safe("a/b.jpg"));
        assert!(!SafeFileName::is_safe(""));
    }
}

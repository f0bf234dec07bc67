pub mod auth;
pub mod metrics;
pub mod photos;
pub mod results;
pub mod users;
pub mod votes;

pub use auth::AuthService;
pub use metrics::MetricService;
pub use photos::PhotoService;
pub use results::ResultService;
pub use users::UserService;
pub use votes::VoteService;

use actix_web::HttpResponse;
use tracing::error;

use crate::errors::PhotoVoteError;
use crate::models::{ApiResponse, ErrorCode};

/// 将领域错误映射为 HTTP 响应
///
/// `validation_code` 用于 `Validation` 错误，其余变体有固定的状态码与错误码。
pub(crate) fn error_response(err: &PhotoVoteError, validation_code: ErrorCode) -> HttpResponse {
    let (mut builder, code) = match err {
        PhotoVoteError::Validation(_) => (HttpResponse::BadRequest(), validation_code),
        PhotoVoteError::NotFound(_) => (HttpResponse::NotFound(), ErrorCode::NotFound),
        PhotoVoteError::InvalidJudge(_) => (HttpResponse::NotFound(), ErrorCode::JudgeNotFound),
        PhotoVoteError::UnknownMetric(_) => (HttpResponse::NotFound(), ErrorCode::UnknownMetric),
        PhotoVoteError::DuplicateVote(_) => (HttpResponse::Conflict(), ErrorCode::DuplicateVote),
        PhotoVoteError::Conflict(_) => (HttpResponse::Conflict(), ErrorCode::Conflict),
        PhotoVoteError::Authentication(_) => (HttpResponse::Unauthorized(), ErrorCode::Unauthorized),
        PhotoVoteError::Authorization(_) => (HttpResponse::Forbidden(), ErrorCode::Forbidden),
        _ => {
            error!("{}", err);
            (
                HttpResponse::InternalServerError(),
                ErrorCode::InternalServerError,
            )
        }
    };
    builder.json(ApiResponse::from_error(code, err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use actix_web::http::StatusCode;

    #[test]
    fn test_error_status_mapping() {
        let cases = [
            (PhotoVoteError::validation("x"), StatusCode::BAD_REQUEST),
            (PhotoVoteError::not_found("x"), StatusCode::NOT_FOUND),
            (PhotoVoteError::invalid_judge("x"), StatusCode::NOT_FOUND),
            (PhotoVoteError::unknown_metric("x"), StatusCode::NOT_FOUND),
            (PhotoVoteError::duplicate_vote("x"), StatusCode::CONFLICT),
            (PhotoVoteError::conflict("x"), StatusCode::CONFLICT),
            (
                PhotoVoteError::database_operation("x"),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(
                error_response(&err, ErrorCode::VoteInvalid).status(),
                status,
                "{err}"
            );
        }
    }

    #[actix_web::test]
    async fn test_conflicts_carry_distinct_codes() {
        let cases = [
            (PhotoVoteError::conflict("key"), ErrorCode::Conflict),
            (PhotoVoteError::duplicate_vote("vote"), ErrorCode::DuplicateVote),
        ];

        for (err, code) in cases {
            let body = to_bytes(error_response(&err, ErrorCode::BadRequest).into_body())
                .await
                .unwrap();
            let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
            assert_eq!(json["code"], code as i32, "{err}");
        }
    }
}

//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称。

use std::fmt;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_photovote_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone, PartialEq)]
        pub enum PhotoVoteError {
            $($variant(String),)*
        }

        impl PhotoVoteError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(PhotoVoteError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(PhotoVoteError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(PhotoVoteError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl PhotoVoteError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        PhotoVoteError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_photovote_errors! {
    DatabaseConfig("E001", "Database Configuration Error"),
    DatabaseConnection("E002", "Database Connection Error"),
    DatabaseOperation("E003", "Database Operation Error"),
    FileOperation("E004", "File Operation Error"),
    Validation("E005", "Validation Error"),
    NotFound("E006", "Resource Not Found"),
    InvalidJudge("E007", "Invalid Judge"),
    UnknownMetric("E008", "Unknown Metric"),
    DuplicateVote("E009", "Duplicate Vote"),
    Conflict("E010", "Conflict"),
    Serialization("E011", "Serialization Error"),
    Authentication("E012", "Authentication Error"),
    Authorization("E013", "Authorization Error"),
}

impl PhotoVoteError {
    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for PhotoVoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for PhotoVoteError {}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for PhotoVoteError {
    fn from(err: sea_orm::DbErr) -> Self {
        PhotoVoteError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for PhotoVoteError {
    fn from(err: std::io::Error) -> Self {
        PhotoVoteError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for PhotoVoteError {
    fn from(err: serde_json::Error) -> Self {
        PhotoVoteError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PhotoVoteError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(PhotoVoteError::database_config("test").code(), "E001");
        assert_eq!(PhotoVoteError::validation("test").code(), "E005");
        assert_eq!(PhotoVoteError::invalid_judge("test").code(), "E007");
        assert_eq!(PhotoVoteError::duplicate_vote("test").code(), "E009");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            PhotoVoteError::unknown_metric("test").error_type(),
            "Unknown Metric"
        );
        assert_eq!(
            PhotoVoteError::validation("test").error_type(),
            "Validation Error"
        );
    }

    #[test]
    fn test_error_message() {
        let err = PhotoVoteError::validation("Value out of range");
        assert_eq!(err.message(), "Value out of range");
    }

    #[test]
    fn test_format_simple() {
        let err = PhotoVoteError::not_found("Photo 42");
        let formatted = err.format_simple();
        assert!(formatted.contains("Resource Not Found"));
        assert!(formatted.contains("Photo 42"));
    }
}

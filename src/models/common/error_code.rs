/// API 业务错误码，随响应体中的 `code` 字段返回
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用
    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    NotFound = 1004,
    Conflict = 1009,
    RateLimitExceeded = 1029,
    InternalServerError = 1500,

    // 认证
    AuthFailed = 2000,

    // 用户
    UserNotFound = 2100,
    UserNameInvalid = 2101,
    UserKeyInvalid = 2102,
    UserKeyAlreadyExists = 2103,
    UserCreationFailed = 2104,
    UserUpdateFailed = 2105,
    UserDeleteFailed = 2106,
    CanNotDeleteCurrentUser = 2107,

    // 照片
    PhotoNotFound = 3000,
    PhotoInvalid = 3001,
    NoMorePhotos = 3002,
    FileUploadFailed = 3100,
    FileTypeNotAllowed = 3101,
    FileSizeExceeded = 3102,
    FileNotFound = 3103,
    MultifileUploadNotAllowed = 3104,

    // 评分维度
    MetricNotFound = 4000,
    MetricInvalid = 4001,

    // 投票
    VoteInvalid = 5000,
    UnknownMetric = 5001,
    DuplicateVote = 5002,
    JudgeNotFound = 5003,
}

use serde::Deserialize;
use ts_rs::TS;

// 登录请求：评委与管理员都使用分发的 key 登录
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct LoginRequest {
    pub key: String,
}

use serde::{Deserialize, Serialize};

pub mod protocol;

// =========================================================
// 常量定义 (Constants)
// =========================================================

/// LocalStorage 中保存 Bearer Token 的键
pub const STORAGE_TOKEN_KEY: &str = "fairy_jwt_token";
/// LocalStorage 中保存客户端标识的键
pub const STORAGE_USER_ID_KEY: &str = "fairy_user_id";

pub const HEADER_AUTHORIZATION: &str = "Authorization";
pub const HEADER_CONTENT_TYPE: &str = "Content-Type";
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// 客户端标识的取值上界（不含）
pub const USER_ID_UPPER_BOUND: u32 = 1_000_000;

/// 构造 `Authorization` 头的值
pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

// =========================================================
// 领域模型 (Domain Models)
// =========================================================

/// 令牌签发请求体
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRequest {
    pub user_id: u32,
}

/// 令牌签发响应体
///
/// 只关心 `access_token`，其余字段（如 `token_type`）保留但不强制。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
}

/// 发起调研的请求体
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResearchRequest {
    pub user_id: u32,
    pub keyword: String,
}

/// 调研结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchResult {
    pub uuid: String,
    pub owner: u32,
    pub smart_message: String,
    pub full_message: String,
    /// 服务端处理耗时（秒）
    #[serde(default)]
    pub time: Option<f64>,
}

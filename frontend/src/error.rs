//! 前端错误类型
//!
//! - `HttpError`: 底层 HTTP 传输错误（网络错误原样向上传递）
//! - `StorageError`: 本地键值存储写入失败
//! - `AuthError`: 令牌签发与带认证请求的错误
//! - `ApiError`: 业务 API 调用错误

use thiserror::Error;

/// HTTP 错误类型
#[derive(Debug, Error)]
pub enum HttpError {
    /// 请求构建失败
    #[error("请求构建失败: {0}")]
    RequestBuildFailed(String),
    /// 网络请求失败
    #[error("网络错误: {0}")]
    NetworkError(String),
    /// 响应解析失败
    #[error("响应解析失败: {0}")]
    ResponseParseFailed(String),
}

#[derive(Debug, Error)]
#[error("存储写入失败 [{key}]: {detail}")]
pub struct StorageError {
    pub key: String,
    pub detail: String,
}

impl StorageError {
    pub fn new(key: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            detail: detail.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    /// 签发接口返回非 2xx
    #[error("Failed to generate token (status {status})")]
    TokenIssuance { status: u16 },
    /// 签发接口返回了无法解析的响应体
    #[error("令牌响应无效: {0}")]
    InvalidTokenResponse(String),
    #[error(transparent)]
    Http(#[from] HttpError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("资源未找到")]
    NotFound,
    #[error("请求失败: {0}")]
    Status(u16),
    #[error("响应解析失败: {0}")]
    Decode(String),
}

impl From<HttpError> for ApiError {
    fn from(e: HttpError) -> Self {
        match e {
            HttpError::ResponseParseFailed(msg) => ApiError::Decode(msg),
            other => ApiError::Auth(AuthError::Http(other)),
        }
    }
}

//! 认证模块
//!
//! 为请求附加 Bearer Token：
//! - 首次使用时向签发接口申请令牌并持久化；
//! - 服务端返回 401 时丢弃旧令牌、重新签发并只重试一次。
//!
//! 存储与 HTTP 均通过注入的能力对象访问，便于在测试中替换。

use fairy_shared::protocol::{ApiRequest, HttpMethod};
use fairy_shared::{
    CONTENT_TYPE_JSON, HEADER_AUTHORIZATION, HEADER_CONTENT_TYPE, STORAGE_TOKEN_KEY,
    STORAGE_USER_ID_KEY, TokenRequest, TokenResponse, USER_ID_UPPER_BOUND, bearer,
};
use rand::Rng;

use crate::config::ApiConfig;
use crate::error::{AuthError, HttpError};
use crate::request::{Headers, HttpClient, HttpRequest, HttpResponse};
use crate::storage::KeyValueStore;

const STATUS_UNAUTHORIZED: u16 = 401;

/// 调用方可选的请求参数
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub method: HttpMethod,
    /// 调用方提供的请求头，与计算出的 `Authorization` 冲突时以此为准
    pub headers: Headers,
    pub body: Option<String>,
}

impl RequestOptions {
    pub fn new(method: HttpMethod) -> Self {
        Self {
            method,
            ..Default::default()
        }
    }

    pub fn header(mut self, key: &str, value: &str) -> Self {
        self.headers.insert(key, value);
        self
    }

    pub fn json_body(mut self, body: String) -> Self {
        self.headers.insert(HEADER_CONTENT_TYPE, CONTENT_TYPE_JSON);
        self.body = Some(body);
        self
    }
}

/// 带令牌自动签发与 401 重试的请求器
#[derive(Clone)]
pub struct TokenAuth<S, C> {
    pub(crate) store: S,
    pub(crate) client: C,
    config: ApiConfig,
}

/// 读取字符串开头的十进制整数（忽略前导空白与其后的任意内容）
fn leading_id(raw: &str) -> Option<u32> {
    let raw = raw.trim_start();
    let end = raw
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(raw.len());
    raw[..end].parse().ok()
}

impl<S, C> TokenAuth<S, C>
where
    S: KeyValueStore,
    C: HttpClient,
{
    pub fn new(store: S, client: C, config: ApiConfig) -> Self {
        Self {
            store,
            client,
            config,
        }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// 获取客户端标识，不存在（或无法解析）时随机生成并保存
    pub fn user_id(&self) -> Result<u32, AuthError> {
        // 已保存的值只读取不改写：取前导整数，越界的数值也原样使用
        if let Some(id) = self.store.get(STORAGE_USER_ID_KEY).and_then(|raw| leading_id(&raw)) {
            return Ok(id);
        }

        let id = rand::thread_rng().gen_range(0..USER_ID_UPPER_BOUND);
        self.store.set(STORAGE_USER_ID_KEY, &id.to_string())?;
        log::debug!("[Auth] generated client id {}", id);
        Ok(id)
    }

    /// 读取已保存的令牌，没有则签发新令牌
    ///
    /// 不做本地过期检查：只有“没有令牌”才会触发签发。
    pub async fn resolve_token(&self) -> Result<String, AuthError> {
        match self.store.get(STORAGE_TOKEN_KEY) {
            Some(token) if !token.is_empty() => Ok(token),
            _ => self.issue_token().await,
        }
    }

    /// 向签发接口申请新令牌并保存
    pub async fn issue_token(&self) -> Result<String, AuthError> {
        let payload = TokenRequest {
            user_id: self.user_id()?,
        };
        let body = serde_json_wasm::to_string(&payload)
            .map_err(|e| HttpError::RequestBuildFailed(e.to_string()))?;

        let req = HttpRequest::new(&self.config.url(TokenRequest::PATH), TokenRequest::METHOD)
            .with_header(HEADER_CONTENT_TYPE, CONTENT_TYPE_JSON)
            .with_body(body);

        let res = self.client.send(req).await?;
        if !res.ok() {
            log::warn!("[Auth] token issuance rejected with status {}", res.status);
            return Err(AuthError::TokenIssuance { status: res.status });
        }

        let data: TokenResponse = res
            .json()
            .map_err(|e| AuthError::InvalidTokenResponse(e.to_string()))?;

        self.store.set(STORAGE_TOKEN_KEY, &data.access_token)?;
        log::debug!("[Auth] issued new token");
        Ok(data.access_token)
    }

    /// 发送附带 Bearer Token 的请求
    ///
    /// 首次响应为 401 时丢弃令牌、重新签发并重试一次；重试的响应
    /// 无论状态如何都原样返回。其他状态码（包括 403/500）不重试。
    pub async fn fetch_with_auth(
        &self,
        url: &str,
        options: RequestOptions,
    ) -> Result<HttpResponse, AuthError> {
        let token = self.resolve_token().await?;

        let mut headers = Headers::new();
        headers.insert(HEADER_AUTHORIZATION, &bearer(&token));
        headers.merge(&options.headers);

        let mut req = HttpRequest {
            url: url.to_string(),
            method: options.method,
            headers,
            body: options.body,
        };

        let res = self.client.send(req.clone()).await?;
        if res.status != STATUS_UNAUTHORIZED {
            return Ok(res);
        }

        log::warn!("[Auth] {} answered 401, reissuing token and retrying once", url);
        self.store.remove(STORAGE_TOKEN_KEY)?;
        let token = self.issue_token().await?;
        req.headers.insert(HEADER_AUTHORIZATION, &bearer(&token));

        Ok(self.client.send(req).await?)
    }
}

#[cfg(test)]
mod tests;

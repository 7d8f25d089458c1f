use async_trait::async_trait;
use fairy_shared::protocol::HttpMethod;
use serde::de::DeserializeOwned;

use crate::error::HttpError;

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::collections::{HashMap, VecDeque};

// =========================================================
// 核心抽象层 (HTTP Interface Abstraction)
// =========================================================

/// 请求头集合
///
/// 键名按 HTTP 语义大小写不敏感：后写入的同名头覆盖先前的值。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers(Vec<(String, String)>);

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// 写入请求头，替换已存在的同名头
    pub fn insert(&mut self, key: &str, value: &str) {
        self.0.retain(|(k, _)| !k.eq_ignore_ascii_case(key));
        self.0.push((key.to_string(), value.to_string()));
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// 将 `other` 覆盖到当前集合上（`other` 优先）
    pub fn merge(&mut self, other: &Headers) {
        for (k, v) in other.iter() {
            self.insert(k, v);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: AsRef<str>, V: AsRef<str>> FromIterator<(K, V)> for Headers {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = Headers::new();
        for (k, v) in iter {
            headers.insert(k.as_ref(), v.as_ref());
        }
        headers
    }
}

// 增加 Clone 以支持重试
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub url: String,
    pub method: HttpMethod,
    pub headers: Headers,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn new(url: &str, method: HttpMethod) -> Self {
        Self {
            url: url.to_string(),
            method,
            headers: Headers::new(),
            body: None,
        }
    }

    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.insert(key, value);
        self
    }

    pub fn with_body(mut self, body: String) -> Self {
        self.body = Some(body);
        self
    }
}

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    /// 检查响应是否成功 (2xx)
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// 解析 JSON 响应体
    ///
    /// 使用 `serde_json`：服务端响应中含浮点字段，`serde-json-wasm` 无法解析。
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, HttpError> {
        serde_json::from_str(&self.body)
            .map_err(|e| HttpError::ResponseParseFailed(e.to_string()))
    }
}

/// HTTP 客户端特性
///
/// (?Send) 是因为浏览器环境下 fetch 返回的 Future 不是 Send 的。
#[async_trait(?Send)]
pub trait HttpClient {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, HttpError>;
}

// =========================================================
// 测试工具: MockHttpClient
// =========================================================

#[cfg(test)]
pub struct MockHttpClient {
    // URL -> 依次返回的 (Status, Body)，最后一个会被重复使用
    responses: RefCell<HashMap<String, VecDeque<(u16, String)>>>,
    // 记录发出的请求
    pub requests: RefCell<Vec<HttpRequest>>,
    // 请求发出时的回调，用于在发送瞬间检查外部状态
    on_send: RefCell<Option<Box<dyn Fn(&HttpRequest)>>>,
}

#[cfg(test)]
impl MockHttpClient {
    pub fn new() -> Self {
        Self {
            responses: RefCell::new(HashMap::new()),
            requests: RefCell::new(Vec::new()),
            on_send: RefCell::new(None),
        }
    }

    pub fn on_send(&self, callback: impl Fn(&HttpRequest) + 'static) {
        *self.on_send.borrow_mut() = Some(Box::new(callback));
    }

    /// 为 URL 追加一个响应；同一 URL 多次调用会按顺序返回
    pub fn mock_response(&self, url: &str, status: u16, body: &str) {
        self.responses
            .borrow_mut()
            .entry(url.to_string())
            .or_default()
            .push_back((status, body.to_string()));
    }

    pub fn requests_to(&self, url: &str) -> Vec<HttpRequest> {
        self.requests
            .borrow()
            .iter()
            .filter(|r| r.url == url)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
#[async_trait(?Send)]
impl HttpClient for MockHttpClient {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        if let Some(callback) = self.on_send.borrow().as_ref() {
            callback(&req);
        }
        self.requests.borrow_mut().push(req.clone());

        // 让出一次执行权，使并发调用能够交错
        tokio::task::yield_now().await;

        let mut responses = self.responses.borrow_mut();
        let Some(queue) = responses.get_mut(&req.url) else {
            return Err(HttpError::NetworkError(format!("no route to {}", req.url)));
        };

        let next = if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        };

        match next {
            Some((status, body)) => Ok(HttpResponse { status, body }),
            None => Err(HttpError::NetworkError(format!("no route to {}", req.url))),
        }
    }
}

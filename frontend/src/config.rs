//! API 地址配置
//!
//! 优先级：运行时注入的 `window.ENV.VITE_API_URL` > 编译期环境变量
//! `VITE_API_URL` > 空字符串（同源相对路径）。空值视为未设置。

const ENV_OBJECT: &str = "ENV";
const API_URL_VAR: &str = "VITE_API_URL";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ApiConfig {
    base_url: String,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url }
    }

    /// 从浏览器运行时与编译期配置中解析
    pub fn from_env() -> Self {
        let base_url = resolve_base_url(runtime_api_url(), option_env!("VITE_API_URL"));
        log::debug!("[Config] API base url: {:?}", base_url);
        Self::new(base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// 拼接 API 路径
    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

/// 按优先级选出第一个非空的地址
pub fn resolve_base_url(runtime: Option<String>, build_time: Option<&str>) -> String {
    runtime
        .filter(|v| !v.is_empty())
        .or_else(|| build_time.filter(|v| !v.is_empty()).map(str::to_string))
        .unwrap_or_default()
}

/// 读取 `window.ENV.VITE_API_URL`
fn runtime_api_url() -> Option<String> {
    if !cfg!(target_arch = "wasm32") {
        return None;
    }
    let window = web_sys::window()?;
    let env = js_sys::Reflect::get(&window, &ENV_OBJECT.into()).ok()?;
    if env.is_undefined() || env.is_null() {
        return None;
    }
    js_sys::Reflect::get(&env, &API_URL_VAR.into())
        .ok()?
        .as_string()
}

use leptos::prelude::*;

use crate::api::BrowserApi;

/// 从 Context 获取 API 客户端
pub fn use_api() -> BrowserApi {
    use_context::<BrowserApi>().expect("BrowserApi should be provided")
}

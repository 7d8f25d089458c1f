//! 路由服务模块 - 核心引擎
//!
//! 封装了 web_sys 的 History API：
//! 所有对 window.history 的操作都集中在此模块。

use leptos::prelude::*;
use wasm_bindgen::prelude::*;

use super::route::{AppRoute, RouteTable};

/// 获取当前浏览器路径
fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

/// 推送 History 状态（内部工具函数）
fn push_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.push_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 解析导航目标：返回写入地址栏的路径与匹配到的路由
///
/// 地址栏保留用户请求的路径；未匹配时只有路由为 `NotFound`。
fn resolve_navigation(path: &str) -> (String, AppRoute) {
    let url = if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    };
    let route = AppRoute::from_path(&url);
    (url, route)
}

/// 路由器服务
///
/// 封装所有路由操作，通过 Signal 驱动界面更新。
#[derive(Clone, Copy)]
pub struct RouterService {
    current_route: ReadSignal<AppRoute>,
    set_route: WriteSignal<AppRoute>,
}

impl RouterService {
    fn new() -> Self {
        let initial_route = AppRoute::from_path(&current_path());
        let (current_route, set_route) = signal(initial_route);

        Self {
            current_route,
            set_route,
        }
    }

    /// 获取当前路由信号
    pub fn current_route(&self) -> ReadSignal<AppRoute> {
        self.current_route
    }

    /// 导航到指定路径
    pub fn navigate(&self, path: &str) {
        let (url, target_route) = resolve_navigation(path);
        log::debug!("[Router] navigate {} -> {}", url, target_route);
        push_history_state(&url);
        self.set_route.set(target_route);
    }

    /// 初始化浏览器后退/前进按钮监听
    fn init_popstate_listener(&self) {
        let set_route = self.set_route;

        let closure = Closure::<dyn Fn()>::new(move || {
            set_route.set(AppRoute::from_path(&current_path()));
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // 泄漏闭包以保持监听器存活
        closure.forget();
    }
}

/// 提供路由服务到 Context 并初始化
fn provide_router() -> RouterService {
    let router = RouterService::new();
    router.init_popstate_listener();
    provide_context(router);
    router
}

/// 从 Context 获取路由服务
pub fn use_router() -> RouterService {
    use_context::<RouterService>()
        .expect("RouterService not found in context. Ensure Router is provided.")
}

/// 导航函数（返回一个可调用的闭包）
pub fn use_navigate() -> impl Fn(&str) + Clone {
    let router = use_router();
    move |to: &str| {
        router.navigate(to);
    }
}

// ============================================================================
// UI 组件
// ============================================================================

/// 路由器根组件
///
/// 提供路由上下文，应在 App 根部使用。
#[component]
pub fn Router(children: Children) -> impl IntoView {
    provide_router();
    children()
}

/// 路由出口组件
///
/// 根据当前路由状态，通过路由表渲染对应的视图。
#[component]
pub fn RouterOutlet(
    /// 路由表
    table: RouteTable<AnyView>,
    /// 未匹配任何路由时的视图
    not_found: fn() -> AnyView,
) -> impl IntoView {
    let router = use_router();
    let table = StoredValue::new_local(table);

    move || {
        let current = router.current_route().get();
        table
            .with_value(|t| t.dispatch(&current))
            .unwrap_or_else(not_found)
    }
}

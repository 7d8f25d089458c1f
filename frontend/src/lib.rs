//! Fairy 前端应用
//!
//! - `web::route`: 路由定义与路由表（领域模型）
//! - `web::router`: 路由服务（核心引擎）
//! - `auth`: 令牌签发与带认证的请求
//! - `api`: 业务 API
//! - `components`: UI 组件层

pub mod api;
pub mod auth;
pub mod config;
mod components {
    pub mod home;
    pub mod research;
}
mod context;
pub mod error;
pub mod request;
pub mod storage;

use crate::api::BrowserApi;
use crate::auth::TokenAuth;
use crate::components::home::HomeView;
use crate::components::research::ResearchView;
use crate::config::ApiConfig;

use leptos::prelude::*;

// 浏览器 API 封装模块
pub mod web {
    mod http;
    pub mod route;
    pub mod router;
    mod storage;

    pub use http::FetchClient;
    pub use storage::BrowserStorage;
}

use web::route::{AppRoute, ROUTE_HOME, ROUTE_RESEARCH, RouteTable};
use web::router::{Router, RouterOutlet};
use web::{BrowserStorage, FetchClient};

/// 应用路由表
///
/// 调研页在首次访问 `/:uuid` 时才创建。
fn route_table() -> RouteTable<AnyView> {
    RouteTable::new()
        .route(ROUTE_HOME, |_| view! { <HomeView /> }.into_any())
        .lazy_route(ROUTE_RESEARCH, || {
            log::debug!("[Router] loading research view");
            |route: &AppRoute| {
                let uuid = route.uuid().unwrap_or_default().to_string();
                view! { <ResearchView uuid=uuid /> }.into_any()
            }
        })
}

fn not_found_view() -> AnyView {
    view! {
        <div class="flex items-center justify-center min-h-screen bg-base-200">
            <div class="text-center">
                <h1 class="text-6xl font-bold text-error">"404"</h1>
                <p class="text-xl mt-4">"Page not found"</p>
            </div>
        </div>
    }
    .into_any()
}

#[component]
pub fn App() -> impl IntoView {
    let auth = TokenAuth::new(BrowserStorage, FetchClient, ApiConfig::from_env());
    provide_context(BrowserApi::new(auth));

    view! {
        <Router>
            <RouterOutlet table=route_table() not_found=not_found_view />
        </Router>
    }
}

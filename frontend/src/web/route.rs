//! 路由定义模块 - 领域模型
//!
//! 这是纯粹的业务逻辑层，不依赖于 DOM 或 web_sys。
//! 定义了应用的所有路由，以及把路由分发到处理器的路由表。
//!
//! 路由表中的处理器可以是即时的，也可以是惰性的：惰性处理器以工厂函数的
//! 形式登记，在第一次分发到该路由时才被创建，之后复用。

use std::cell::OnceCell;
use std::fmt::Display;

pub const ROUTE_HOME: &str = "home";
pub const ROUTE_RESEARCH: &str = "research";

/// 应用路由枚举
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AppRoute {
    /// 首页 `/`
    #[default]
    Home,
    /// 调研结果 `/:uuid`，不校验 uuid 格式
    Research { uuid: String },
    /// 页面未找到
    NotFound,
}

impl AppRoute {
    /// 将 URL path 解析为路由枚举
    ///
    /// 允许末尾多一个 `/`；多级路径不匹配任何路由。
    pub fn from_path(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.strip_prefix('/').unwrap_or(path);
        let segment = trimmed.strip_suffix('/').unwrap_or(trimmed);

        if segment.is_empty() {
            return if path.is_empty() || path == "/" {
                Self::Home
            } else {
                Self::NotFound
            };
        }

        if segment.contains('/') {
            Self::NotFound
        } else {
            Self::Research {
                uuid: segment.to_string(),
            }
        }
    }

    /// 获取路由对应的 URL path
    pub fn to_path(&self) -> String {
        match self {
            Self::Home => "/".to_string(),
            Self::Research { uuid } => format!("/{}", uuid),
            Self::NotFound => "/404".to_string(),
        }
    }

    /// 路由名称；未匹配的路由没有名称
    pub fn name(&self) -> Option<&'static str> {
        match self {
            Self::Home => Some(ROUTE_HOME),
            Self::Research { .. } => Some(ROUTE_RESEARCH),
            Self::NotFound => None,
        }
    }

    /// `/:uuid` 中的参数
    pub fn uuid(&self) -> Option<&str> {
        match self {
            Self::Research { uuid } => Some(uuid),
            _ => None,
        }
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

// =========================================================
// 路由表
// =========================================================

/// 路由处理器：接收匹配到的路由，产出视图
pub type Handler<V> = Box<dyn Fn(&AppRoute) -> V>;

/// 惰性处理器的工厂
pub type Loader<V> = Box<dyn Fn() -> Handler<V>>;

enum RouteHandler<V> {
    Eager(Handler<V>),
    Lazy {
        loader: Loader<V>,
        loaded: OnceCell<Handler<V>>,
    },
}

impl<V> RouteHandler<V> {
    fn handler(&self) -> &Handler<V> {
        match self {
            RouteHandler::Eager(handler) => handler,
            RouteHandler::Lazy { loader, loaded } => loaded.get_or_init(|| loader()),
        }
    }
}

struct RouteEntry<V> {
    name: &'static str,
    handler: RouteHandler<V>,
}

/// 路由表：按路由名称登记处理器
pub struct RouteTable<V> {
    entries: Vec<RouteEntry<V>>,
    fallback: Option<Handler<V>>,
}

impl<V> Default for RouteTable<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            fallback: None,
        }
    }
}

impl<V> RouteTable<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// 登记即时处理器
    pub fn route(mut self, name: &'static str, handler: impl Fn(&AppRoute) -> V + 'static) -> Self {
        self.entries.push(RouteEntry {
            name,
            handler: RouteHandler::Eager(Box::new(handler)),
        });
        self
    }

    /// 登记惰性处理器：`loader` 在首次分发到该路由时执行且只执行一次
    pub fn lazy_route<F, H>(mut self, name: &'static str, loader: F) -> Self
    where
        F: Fn() -> H + 'static,
        H: Fn(&AppRoute) -> V + 'static,
    {
        self.entries.push(RouteEntry {
            name,
            handler: RouteHandler::Lazy {
                loader: Box::new(move || Box::new(loader()) as Handler<V>),
                loaded: OnceCell::new(),
            },
        });
        self
    }

    /// 未匹配任何路由时使用的处理器
    pub fn fallback(mut self, handler: impl Fn(&AppRoute) -> V + 'static) -> Self {
        self.fallback = Some(Box::new(handler));
        self
    }

    /// 将路由分发给对应处理器
    pub fn dispatch(&self, route: &AppRoute) -> Option<V> {
        let entry = route
            .name()
            .and_then(|name| self.entries.iter().find(|e| e.name == name));

        match entry {
            Some(entry) => Some((entry.handler.handler())(route)),
            None => self.fallback.as_ref().map(|handler| handler(route)),
        }
    }

    /// 按路径分发
    pub fn dispatch_path(&self, path: &str) -> Option<V> {
        self.dispatch(&AppRoute::from_path(path))
    }

    /// 惰性处理器是否已被加载；即时处理器总是视为已加载
    pub fn is_loaded(&self, name: &str) -> bool {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .is_some_and(|e| match &e.handler {
                RouteHandler::Eager(_) => true,
                RouteHandler::Lazy { loaded, .. } => loaded.get().is_some(),
            })
    }
}

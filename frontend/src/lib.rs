//! Standoff 登录前端应用（Leptos 客户端渲染）
//!
//! - `web`: 核心 Trait 的浏览器实现，以及路由
//! - `theme`: 主题存储上下文
//! - `services`: 构建期配置与控制器装配
//! - `components`: UI 组件层

mod components {
    pub mod auth_form;
    pub mod home;
    mod icons;
    pub mod login;
    pub mod signup;
    pub mod theme_toggle;
}
mod services;
mod theme;

use crate::components::home::HomePage;
use crate::components::login::LoginPage;
use crate::components::signup::SignupPage;
use crate::components::theme_toggle::ThemeToggle;
use crate::theme::ThemeProvider;

use leptos::prelude::*;

// 原生 Web API 封装模块
// 对 web_sys 的轻量级封装，替代 gloo-* 系列 crate，以减小 WASM 二进制体积。
pub(crate) mod web {
    mod broadcast;
    mod document;
    mod http;
    pub mod route;
    pub mod router;
    mod storage;

    pub use broadcast::{InPageTransport, StorageEventTransport};
    pub use document::{BrowserNavigator, HtmlRoot};
    pub use http::BrowserHttpClient;
    pub use storage::BrowserStorage;
}

use web::route::AppRoute;
use web::router::{Link, Router, RouterOutlet};

fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Home => view! { <HomePage /> }.into_any(),
        AppRoute::Signup => view! { <SignupPage /> }.into_any(),
        AppRoute::Login => view! { <LoginPage /> }.into_any(),
        AppRoute::NotFound => view! {
            <div class="flex items-center justify-center min-h-screen bg-base-200">
                <div class="text-center">
                    <h1 class="text-6xl font-bold text-error">"404"</h1>
                    <p class="text-xl mt-4">{AppRoute::NotFound.title()}</p>
                    <Link to=AppRoute::Home class="btn btn-primary mt-6">"Back to sign up"</Link>
                </div>
            </div>
        }
        .into_any(),
    }
}

#[component]
pub fn App() -> impl IntoView {
    let config = services::app_config();
    if let Err(e) = config.validate() {
        log::error!("configuration: {}", e);
    }
    log::debug!("graphql endpoint: {}", config.graphql_endpoint);
    provide_context(config);

    view! {
        <ThemeProvider>
            <ThemeToggle />
            <Router>
                <RouterOutlet matcher=route_matcher />
            </Router>
        </ThemeProvider>
    }
}

//! 核心流程的浏览器端装配

use leptos::prelude::*;
use standoff_auth::config::{AUTH_BASE_URL_VAR, DASHBOARD_URL_VAR, GRAPHQL_ENDPOINT_VAR};
use standoff_auth::{AppConfig, AuthForm, FormController, GraphQlGateway, SessionCache, SessionProbe};

use crate::web::{BrowserHttpClient, BrowserNavigator, BrowserStorage};

pub type BrowserProbe = SessionProbe<BrowserHttpClient, BrowserStorage, BrowserNavigator>;
pub type BrowserForm<F> = FormController<F, BrowserHttpClient, BrowserStorage, BrowserNavigator>;

/// 构建期写入的配置，未设置的项使用核心库默认值
pub fn app_config() -> AppConfig {
    AppConfig::from_lookup(|name| {
        match name {
            GRAPHQL_ENDPOINT_VAR => option_env!("STANDOFF_GRAPHQL_ENDPOINT"),
            DASHBOARD_URL_VAR => option_env!("STANDOFF_DASHBOARD_URL"),
            AUTH_BASE_URL_VAR => option_env!("STANDOFF_AUTH_BASE_URL"),
            _ => None,
        }
        .map(str::to_string)
    })
}

pub fn use_config() -> AppConfig {
    use_context::<AppConfig>().expect("AppConfig should be provided")
}

fn gateway(config: &AppConfig) -> GraphQlGateway<BrowserHttpClient> {
    GraphQlGateway::new(BrowserHttpClient, config.graphql_endpoint.clone())
}

pub fn session_probe(config: &AppConfig) -> BrowserProbe {
    SessionProbe::new(
        gateway(config),
        SessionCache::new(BrowserStorage),
        BrowserNavigator,
        config.dashboard_url.clone(),
    )
}

pub fn form_controller<F: AuthForm>(config: &AppConfig) -> BrowserForm<F> {
    FormController::new(
        gateway(config),
        SessionCache::new(BrowserStorage),
        BrowserNavigator,
        config.clone(),
    )
}

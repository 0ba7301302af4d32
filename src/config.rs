use url::Url;

use crate::error::ConfigError;
use crate::navigation::OAuthProvider;

// =========================================================
// 运行时配置 (Runtime Configuration)
// =========================================================

/// 默认值：没有提供覆盖项时使用
pub const DEFAULT_GRAPHQL_ENDPOINT: &str = "http://localhost:8080/query";
pub const DEFAULT_DASHBOARD_URL: &str = "http://localhost:3000";
pub const DEFAULT_AUTH_BASE_URL: &str = "http://localhost:8080";

pub const GRAPHQL_ENDPOINT_VAR: &str = "STANDOFF_GRAPHQL_ENDPOINT";
pub const DASHBOARD_URL_VAR: &str = "STANDOFF_DASHBOARD_URL";
pub const AUTH_BASE_URL_VAR: &str = "STANDOFF_AUTH_BASE_URL";

/// 应用配置：后端地址，以及登录后跳转的目标
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub graphql_endpoint: String,
    pub dashboard_url: String,
    pub auth_base_url: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            graphql_endpoint: DEFAULT_GRAPHQL_ENDPOINT.to_string(),
            dashboard_url: DEFAULT_DASHBOARD_URL.to_string(),
            auth_base_url: DEFAULT_AUTH_BASE_URL.to_string(),
        }
    }
}

impl AppConfig {
    /// 通过 `lookup` 读取每一项配置，缺失或为空时使用默认值
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str, default: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        Self {
            graphql_endpoint: read(GRAPHQL_ENDPOINT_VAR, DEFAULT_GRAPHQL_ENDPOINT),
            dashboard_url: read(DASHBOARD_URL_VAR, DEFAULT_DASHBOARD_URL),
            auth_base_url: read(AUTH_BASE_URL_VAR, DEFAULT_AUTH_BASE_URL)
                .trim_end_matches('/')
                .to_string(),
        }
    }

    /// 校验所有配置的 URL 都能被解析
    pub fn validate(&self) -> Result<(), ConfigError> {
        parse("graphql endpoint", &self.graphql_endpoint)?;
        parse("dashboard", &self.dashboard_url)?;
        parse("auth base", &self.auth_base_url)?;
        Ok(())
    }

    /// 拼出 `{auth_base}/auth/{provider}?redirect_uri={dashboard}`
    pub fn oauth_url(&self, provider: OAuthProvider) -> Result<Url, ConfigError> {
        let raw = format!("{}/auth/{}", self.auth_base_url, provider.slug());
        let mut url = parse("auth base", &raw)?;
        url.query_pairs_mut()
            .append_pair("redirect_uri", &self.dashboard_url);
        Ok(url)
    }
}

fn parse(name: &'static str, value: &str) -> Result<Url, ConfigError> {
    Url::parse(value).map_err(|e| ConfigError::InvalidUrl {
        name,
        value: value.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn missing_and_blank_values_fall_back_to_defaults() {
        let vars: HashMap<&str, &str> = [(DASHBOARD_URL_VAR, "  ")].into_iter().collect();
        let cfg = AppConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(cfg, AppConfig::default());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn overrides_are_used() {
        let vars: HashMap<&str, &str> = [
            (GRAPHQL_ENDPOINT_VAR, "https://api.example.com/graphql"),
            (AUTH_BASE_URL_VAR, "https://api.example.com/"),
        ]
        .into_iter()
        .collect();
        let cfg = AppConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(cfg.graphql_endpoint, "https://api.example.com/graphql");
        assert_eq!(cfg.auth_base_url, "https://api.example.com");
        assert_eq!(cfg.dashboard_url, DEFAULT_DASHBOARD_URL);
    }

    #[test]
    fn oauth_url_encodes_the_callback() {
        let cfg = AppConfig::default();
        let url = cfg.oauth_url(OAuthProvider::GitHub).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/auth/github?redirect_uri=http%3A%2F%2Flocalhost%3A3000"
        );
        let url = cfg.oauth_url(OAuthProvider::Google).unwrap();
        assert!(url.as_str().starts_with("http://localhost:8080/auth/google?"));
    }

    #[test]
    fn bad_urls_are_reported() {
        let cfg = AppConfig {
            auth_base_url: "not a url".into(),
            ..AppConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidUrl { name: "auth base", .. })
        ));
        assert!(cfg.oauth_url(OAuthProvider::Google).is_err());
    }
}

//! Standoff 登录页的客户端认证流程
//!
//! 这里的代码与目标平台无关：浏览器能力（HTTP、`localStorage`、`location`、
//! 文档根节点、跨标签页事件）都隐藏在小巧的 Trait 后面，
//! 因此同一套流程既能在 `cargo test` 下运行，也能在 WASM 前端中运行。
//!
//! - [`theme`]: 明暗主题偏好，持久化并在标签页之间同步
//! - [`session`]: 首页的“是否已登录”会话探测
//! - [`form`]: 注册与登录控制器

pub mod api;
pub mod config;
pub mod error;
pub mod events;
pub mod form;
pub mod navigation;
pub mod request;
pub mod session;
pub mod storage;
pub mod theme;

pub use api::GraphQlGateway;
pub use config::AppConfig;
pub use error::{ConfigError, FormError, FormErrorKind, TransportError};
pub use events::{BroadcastTransport, EventBus, Listener, LocalBroadcast, Subscription};
pub use form::{
    AuthForm, Field, FormController, FormSnapshot, LoginController, LoginForm, Phase,
    SignupController, SignupForm, SubmitOutcome,
};
pub use navigation::{Navigator, OAuthProvider};
pub use request::{HttpClient, HttpRequest, HttpResponse};
pub use session::{MountGuard, ProbeOutcome, SessionProbe};
pub use storage::{KeyValueStore, MemoryStore, SessionCache};
pub use theme::{DocumentRoot, Lifecycle, Theme, ThemeChange, ThemeStore};

pub use standoff_shared::{AuthPayload, User};

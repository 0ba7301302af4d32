//! 注册与登录表单：字段状态、本地校验、提交以及对响应的处理
//!
//! 两个表单共用同一个控制器；[`AuthForm`] 描述各表单自己的部分
//! （有哪些字段、如何校验、对应哪个 Mutation）。

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use standoff_shared::protocol::{AuthMutation, GraphQlOperation, GraphQlResponse};
use standoff_shared::{AuthPayload, User};

use crate::api::GraphQlGateway;
use crate::config::AppConfig;
use crate::error::{ConfigError, FormError, TransportError};
use crate::navigation::{Navigator, OAuthProvider};
use crate::request::HttpClient;
use crate::storage::{KeyValueStore, SessionCache};

pub mod login;
pub mod signup;
pub mod validation;

pub use login::LoginForm;
pub use signup::SignupForm;

pub const NETWORK_FALLBACK: &str = "Network error. Please check if the backend is running.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    FirstName,
    LastName,
    Email,
    Password,
    ConfirmPassword,
}

impl Field {
    /// 对应输入框的 `name`/`id` 属性
    pub fn name(&self) -> &'static str {
        match self {
            Field::FirstName => "firstName",
            Field::LastName => "lastName",
            Field::Email => "email",
            Field::Password => "password",
            Field::ConfirmPassword => "confirmPassword",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Field::FirstName => "First name",
            Field::LastName => "Last name",
            Field::Email => "Email",
            Field::Password => "Password",
            Field::ConfirmPassword => "Confirm password",
        }
    }

    pub fn input_type(&self) -> &'static str {
        match self {
            Field::Email => "email",
            Field::Password | Field::ConfirmPassword => "password",
            Field::FirstName | Field::LastName => "text",
        }
    }
}

/// 表单特性 (Trait)：单个表单向共享控制器提供的内容
pub trait AuthForm: Default + Clone + fmt::Debug + 'static {
    type Operation: AuthMutation;

    /// 日志中使用的短名称
    const NAME: &'static str;
    /// 输入框列表，按展示（也是校验）顺序
    const FIELDS: &'static [Field];
    const IDLE_LABEL: &'static str;
    const BUSY_LABEL: &'static str;
    /// 后端返回空错误消息时使用
    const REJECTED: &'static str;
    /// 既无数据也无错误列表时使用
    const NO_PAYLOAD: &'static str;

    fn value(&self, field: Field) -> Option<&str>;

    /// 表单没有该字段时返回 `false`
    fn set(&mut self, field: Field, value: String) -> bool;

    fn validate(&self) -> Result<(), FormError>;

    fn variables(&self) -> <Self::Operation as GraphQlOperation>::Variables;

    /// 把非空的后端错误消息转换为展示给用户的错误
    fn classify_rejection(message: &str) -> FormError {
        FormError::backend(message)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Editing,
    Submitting,
    /// 已登录，浏览器正在跳转到控制面板
    Redirecting,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormSnapshot<F> {
    pub data: F,
    pub error: Option<FormError>,
    pub phase: Phase,
}

impl<F: AuthForm> FormSnapshot<F> {
    pub fn in_flight(&self) -> bool {
        self.phase != Phase::Editing
    }

    pub fn button_label(&self) -> &'static str {
        if self.in_flight() {
            F::BUSY_LABEL
        } else {
            F::IDLE_LABEL
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// 已有提交在进行中
    Ignored,
    /// 本地校验失败，未发出请求
    Invalid(FormError),
    Redirected(User),
    Failed(FormError),
}

type Observer<F> = Rc<dyn Fn(&FormSnapshot<F>)>;

// =========================================================
// 表单控制器 (FormController)
// =========================================================

pub struct FormController<F, C, S, N>
where
    F: AuthForm,
    C: HttpClient,
    S: KeyValueStore,
    N: Navigator,
{
    gateway: GraphQlGateway<C>,
    cache: SessionCache<S>,
    navigator: N,
    config: AppConfig,
    state: RefCell<FormSnapshot<F>>,
    observers: RefCell<Vec<Observer<F>>>,
}

impl<F, C, S, N> FormController<F, C, S, N>
where
    F: AuthForm,
    C: HttpClient,
    S: KeyValueStore,
    N: Navigator,
{
    pub fn new(
        gateway: GraphQlGateway<C>,
        cache: SessionCache<S>,
        navigator: N,
        config: AppConfig,
    ) -> Self {
        Self {
            gateway,
            cache,
            navigator,
            config,
            state: RefCell::new(FormSnapshot::default()),
            observers: RefCell::new(Vec::new()),
        }
    }

    pub fn snapshot(&self) -> FormSnapshot<F> {
        self.state.borrow().clone()
    }

    pub fn phase(&self) -> Phase {
        self.state.borrow().phase
    }

    pub fn in_flight(&self) -> bool {
        self.state.borrow().in_flight()
    }

    pub fn button_label(&self) -> &'static str {
        self.state.borrow().button_label()
    }

    pub fn error(&self) -> Option<FormError> {
        self.state.borrow().error.clone()
    }

    /// 注册观察者，每次状态变化后调用
    pub fn watch(&self, observer: impl Fn(&FormSnapshot<F>) + 'static) {
        self.observers.borrow_mut().push(Rc::new(observer));
    }

    /// 更新单个输入，并清除当前展示的错误
    pub fn edit(&self, field: Field, value: impl Into<String>) {
        let value = value.into();
        let mut known = false;
        self.update(|s| {
            known = s.data.set(field, value);
            s.error = None;
        });
        if !known {
            log::warn!("{} form has no {:?} field", F::NAME, field);
        }
    }

    /// 校验、发送 Mutation 并处理响应
    ///
    /// 在第一个 await 之前就切换到 `Submitting`，因此请求进行中再次调用会直接
    /// 返回 `Ignored`，不会访问网络。
    pub async fn submit(&self) -> SubmitOutcome {
        if self.in_flight() {
            log::debug!("{} submit ignored: already in flight", F::NAME);
            return SubmitOutcome::Ignored;
        }

        let data = self.state.borrow().data.clone();
        if let Err(err) = data.validate() {
            log::debug!("{} form invalid: {}", F::NAME, err);
            self.update(|s| s.error = Some(err.clone()));
            return SubmitOutcome::Invalid(err);
        }

        self.update(|s| {
            s.error = None;
            s.phase = Phase::Submitting;
        });

        let result = self
            .gateway
            .execute::<F::Operation>(&data.variables())
            .await;

        match Self::interpret(result) {
            Ok(payload) => self.complete(payload),
            Err(err) => {
                log::warn!("{} failed: {}", F::NAME, err);
                self.update(|s| {
                    s.phase = Phase::Editing;
                    s.error = Some(err.clone());
                });
                SubmitOutcome::Failed(err)
            }
        }
    }

    /// 跳转到第三方登录页，不做校验，也不改变状态
    pub fn oauth(&self, provider: OAuthProvider) -> Result<(), ConfigError> {
        let url = self.config.oauth_url(provider)?;
        log::info!("{}: continuing with {}", F::NAME, provider.label());
        self.navigator.navigate(url.as_str());
        Ok(())
    }

    fn interpret(
        result: Result<GraphQlResponse<<F::Operation as GraphQlOperation>::Data>, TransportError>,
    ) -> Result<AuthPayload, FormError> {
        let envelope = result.map_err(|e| FormError::transport(&e, NETWORK_FALLBACK))?;

        if let Some(first) = envelope.first_error() {
            let message = first.message.trim();
            return Err(if message.is_empty() {
                FormError::backend(F::REJECTED)
            } else {
                F::classify_rejection(message)
            });
        }

        envelope
            .data
            .and_then(<F::Operation as AuthMutation>::into_payload)
            .ok_or_else(|| FormError::unexpected(F::NO_PAYLOAD))
    }

    fn complete(&self, payload: AuthPayload) -> SubmitOutcome {
        self.cache.clear();
        self.cache.store_user(&payload.user);
        match payload.expires_at() {
            Some(at) => log::info!("{} ok for {}, session until {}", F::NAME, payload.user.email, at),
            None => log::info!("{} ok for {}", F::NAME, payload.user.email),
        }

        self.update(|s| {
            s.data = F::default();
            s.phase = Phase::Redirecting;
        });
        self.navigator.navigate(&self.config.dashboard_url);
        SubmitOutcome::Redirected(payload.user)
    }

    fn update(&self, change: impl FnOnce(&mut FormSnapshot<F>)) {
        let snapshot = {
            let mut state = self.state.borrow_mut();
            change(&mut state);
            state.clone()
        };
        let observers: Vec<Observer<F>> = self.observers.borrow().clone();
        for observer in observers {
            observer(&snapshot);
        }
    }
}

pub type LoginController<C, S, N> = FormController<LoginForm, C, S, N>;
pub type SignupController<C, S, N> = FormController<SignupForm, C, S, N>;

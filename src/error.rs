use crate::form::Field;

// =========================================================
// 传输错误 (Transport Errors)
// =========================================================

/// 未能从端点拿到可用的 GraphQL 信封
///
/// Display 文本会原样展示给用户，保持简短。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// 请求没有拿到任何响应（离线、CORS、DNS 等）
    #[error("{0}")]
    Network(String),
    /// 非 2xx 状态码，且响应体中没有 GraphQL 错误列表
    #[error("Server responded with status {0}")]
    Status(u16),
    /// 响应体不是 GraphQL 信封
    #[error("Unexpected response from server ({status}): {message}")]
    Decode { status: u16, message: String },
    /// 请求体序列化失败
    #[error("Could not encode request: {0}")]
    Encode(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid {name} url `{value}`: {reason}")]
    InvalidUrl {
        name: &'static str,
        value: String,
        reason: String,
    },
}

// =========================================================
// 表单错误 (Form Errors)
// =========================================================

/// 表单上方错误的分类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormErrorKind {
    /// 本地校验在该字段失败，未发出请求
    Validation(Field),
    /// 后端拒绝了邮箱/密码组合，两个输入框都会标红
    Credentials,
    /// 后端错误列表中的其他消息
    Backend,
    /// 网络或解析失败
    Transport,
    /// 既没有返回数据也没有错误列表
    UnexpectedResponse,
}

/// 表单同一时刻只展示一条错误
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct FormError {
    pub message: String,
    pub kind: FormErrorKind,
}

impl FormError {
    pub fn new(kind: FormErrorKind, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind,
        }
    }

    pub fn validation(field: Field, message: impl Into<String>) -> Self {
        Self::new(FormErrorKind::Validation(field), message)
    }

    pub fn credentials(message: impl Into<String>) -> Self {
        Self::new(FormErrorKind::Credentials, message)
    }

    pub fn backend(message: impl Into<String>) -> Self {
        Self::new(FormErrorKind::Backend, message)
    }

    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::new(FormErrorKind::UnexpectedResponse, message)
    }

    /// 构造传输错误，消息为空时使用 `fallback`
    pub fn transport(err: &TransportError, fallback: &str) -> Self {
        let message = err.to_string();
        let message = if message.trim().is_empty() {
            fallback.to_string()
        } else {
            message
        };
        Self::new(FormErrorKind::Transport, message)
    }

    /// 是否需要同时高亮两个凭据输入框
    pub fn highlights_credentials(&self) -> bool {
        self.kind == FormErrorKind::Credentials
    }

    /// 校验错误指向的字段（如果有）
    pub fn field(&self) -> Option<Field> {
        match self.kind {
            FormErrorKind::Validation(field) => Some(field),
            _ => None,
        }
    }
}

//! 认证核心与浏览器前端共用的数据模型
//!
//! - `User` / `AuthPayload`: GraphQL 后端返回的身份信息
//! - `protocol`: 发送的操作定义，以及响应信封

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

pub mod protocol;

// =========================================================
// 领域模型 (Domain Models)
// =========================================================

/// 后端持有的用户身份
///
/// 使用 camelCase 键序列化，与 localStorage 中缓存的展示快照格式一致。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub first_name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub last_name: String,
}

/// 后端的姓名字段可为 null（OAuth 账号经常缺少姓氏），统一读成空字符串
fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl User {
    /// "名 姓" 形式的展示名；姓名都为空时退回邮箱
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let full = full.trim();
        if full.is_empty() {
            self.email.clone()
        } else {
            full.to_string()
        }
    }
}

/// `login` / `signup` 成功时的返回结果
///
/// 后端会在同一个响应里把 token 写入 HTTP-only Cookie，客户端从不保存它。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthPayload {
    pub user: User,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub expires_at: Option<String>,
}

impl AuthPayload {
    /// 按 RFC 3339 解析 `expiresAt`，缺失或格式错误时返回 `None`
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        let raw = self.expires_at.as_deref()?;
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|t| t.with_timezone(&Utc))
    }
}

//! 持久化键值存储，以及基于它的本地会话缓存

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use standoff_shared::User;

pub const USER_KEY: &str = "user";

/// 客户端曾经保存过认证状态的所有键
///
/// `user` 是展示用快照；其余是旧版本把 token 存在 localStorage 时遗留的键。
pub const SESSION_KEYS: [&str; 5] = [
    USER_KEY,
    "user_data",
    "auth_token",
    "auth_refresh_token",
    "auth_expires_at",
];

/// 字符串键值存储特性 (Trait)，语义同浏览器 `localStorage`
pub trait KeyValueStore {
    /// 键不存在或存储不可用时返回 `None`
    fn get(&self, key: &str) -> Option<String>;
    /// 写入成功返回 `true`
    fn set(&self, key: &str, value: &str) -> bool;
    /// 存储可用即返回 `true`，删除不存在的键也算成功
    fn delete(&self, key: &str) -> bool;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Rc<S> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> bool {
        (**self).set(key, value)
    }

    fn delete(&self, key: &str) -> bool {
        (**self).delete(key)
    }
}

/// 内存存储，克隆体共享同一个 Map，相当于同源的多个标签页
#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.borrow().contains_key(key)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> bool {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        true
    }

    fn delete(&self, key: &str) -> bool {
        self.entries.borrow_mut().remove(key);
        true
    }
}

// =========================================================
// 会话缓存 (Session Cache)
// =========================================================

/// 已登录用户在客户端的副本，仅用于展示
///
/// 从不用于信任判断，真正的会话保存在后端 Cookie 中。
#[derive(Clone)]
pub struct SessionCache<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> SessionCache<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// 清除所有缓存的认证数据
    pub fn clear(&self) {
        for key in SESSION_KEYS {
            if !self.store.delete(key) {
                log::warn!("session cache: could not remove `{}`", key);
            }
        }
    }

    /// 以 camelCase JSON 把用户快照写入 `user` 键
    pub fn store_user(&self, user: &User) -> bool {
        let json = match serde_json::to_string(user) {
            Ok(json) => json,
            Err(e) => {
                log::error!("session cache: cannot encode user: {}", e);
                return false;
            }
        };
        let ok = self.store.set(USER_KEY, &json);
        if !ok {
            log::warn!("session cache: could not write `{}`", USER_KEY);
        }
        ok
    }

    /// 读取缓存的快照，不存在或格式错误时返回 `None`
    pub fn cached_user(&self) -> Option<User> {
        let raw = self.store.get(USER_KEY)?;
        serde_json::from_str(&raw).ok()
    }
}

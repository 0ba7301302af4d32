//! 本地存储封装模块
//!
//! 直接使用 `web_sys::Storage` 替代 `gloo-storage`，实现核心库的 `KeyValueStore`。

use standoff_auth::KeyValueStore;

/// 浏览器 `localStorage`
/// 存储不可用时（隐私模式、沙箱 iframe）所有调用都退化为“不存在”/`false`
#[derive(Clone, Copy, Default)]
pub struct BrowserStorage;

impl BrowserStorage {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok()?
    }
}

impl KeyValueStore for BrowserStorage {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok()?
    }

    fn set(&self, key: &str, value: &str) -> bool {
        Self::storage()
            .and_then(|s| s.set_item(key, value).ok())
            .is_some()
    }

    fn delete(&self, key: &str) -> bool {
        Self::storage()
            .and_then(|s| s.remove_item(key).ok())
            .is_some()
    }
}

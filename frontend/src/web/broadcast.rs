//! 主题总线的浏览器传输通道
//!
//! - `StorageEventTransport`: 通过 `storage` 事件同步其他标签页
//! - `InPageTransport`: 通过 `themechange` `CustomEvent` 同步本页其他消费者，
//!   detail 为 JSON 编码的消息

use std::str::FromStr;

use standoff_auth::theme::THEME_KEY;
use standoff_auth::{BroadcastTransport, Listener, Subscription, Theme, ThemeChange};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CustomEvent, CustomEventInit, Event, StorageEvent};

pub const THEME_EVENT: &str = "themechange";

/// 在 `window` 上监听 `event`，订阅句柄 Drop 时移除
fn listen(event: &'static str, handler: impl Fn(Event) + 'static) -> Subscription {
    let Some(window) = web_sys::window() else {
        return Subscription::empty();
    };

    let closure = Closure::<dyn Fn(Event)>::new(handler);
    if window
        .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
        .is_err()
    {
        log::warn!("could not listen for `{}`", event);
        return Subscription::empty();
    }

    Subscription::new(move || {
        let _ = window
            .remove_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
        drop(closure);
    })
}

// =========================================================
// 跨标签页 (Cross-tab)
// =========================================================

/// 把其他标签页对主题键的写入转换为消息
///
/// 发布为空操作：其他标签页看到的就是存储自己对 `localStorage` 的写入
#[derive(Clone, Copy, Default)]
pub struct StorageEventTransport;

impl BroadcastTransport<ThemeChange> for StorageEventTransport {
    fn publish(&self, _message: &ThemeChange) {}

    fn subscribe(&self, listener: Listener<ThemeChange>) -> Subscription {
        listen("storage", move |event| {
            let Some(event) = event.dyn_ref::<StorageEvent>() else {
                return;
            };
            if event.key().as_deref() != Some(THEME_KEY) {
                return;
            }
            let Some(theme) = event
                .new_value()
                .and_then(|value| Theme::from_str(&value).ok())
            else {
                return;
            };
            listener(ThemeChange {
                theme,
                origin: None,
            });
        })
    }
}

// =========================================================
// 页内 (In-page)
// =========================================================

#[derive(Clone, Copy, Default)]
pub struct InPageTransport;

impl BroadcastTransport<ThemeChange> for InPageTransport {
    fn publish(&self, message: &ThemeChange) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let detail = match serde_json_wasm::to_string(message) {
            Ok(json) => json,
            Err(e) => {
                log::error!("cannot encode theme change: {}", e);
                return;
            }
        };

        let init = CustomEventInit::new();
        init.set_detail(&JsValue::from_str(&detail));
        match CustomEvent::new_with_event_init_dict(THEME_EVENT, &init) {
            Ok(event) => {
                let _ = window.dispatch_event(&event);
            }
            Err(e) => log::error!("cannot create `{}` event: {:?}", THEME_EVENT, e),
        }
    }

    fn subscribe(&self, listener: Listener<ThemeChange>) -> Subscription {
        listen(THEME_EVENT, move |event| {
            let Some(detail) = event
                .dyn_ref::<CustomEvent>()
                .and_then(|event| event.detail().as_string())
            else {
                return;
            };
            match serde_json_wasm::from_str::<ThemeChange>(&detail) {
                Ok(change) => listener(change),
                Err(e) => log::debug!("ignoring malformed `{}`: {}", THEME_EVENT, e),
            }
        })
    }
}

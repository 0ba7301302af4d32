//! 主题状态管理（Leptos Context）
//!
//! 存储本身不是 `Send` 的，放在本地 `StoredValue` 中；
//! 视图读取由存储负责更新的 `RwSignal<Lifecycle>`。

use leptos::prelude::*;
use standoff_auth::{EventBus, Lifecycle, ThemeStore};

use crate::web::{BrowserStorage, HtmlRoot, InPageTransport, StorageEventTransport};

type BrowserThemeStore = ThemeStore<BrowserStorage, HtmlRoot>;

#[derive(Clone, Copy)]
pub struct ThemeContext {
    store: StoredValue<BrowserThemeStore, LocalStorage>,
    lifecycle: RwSignal<Lifecycle>,
}

impl ThemeContext {
    /// 客户端第一个 Effect 运行之前为 `Dormant`
    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle.get()
    }

    pub fn toggle(&self) {
        self.store.with_value(|store| {
            store.toggle();
        });
    }
}

pub fn use_theme() -> ThemeContext {
    use_context::<ThemeContext>().expect("ThemeContext should be provided")
}

#[component]
pub fn ThemeProvider(children: Children) -> impl IntoView {
    let bus = EventBus::new()
        .with_transport(StorageEventTransport)
        .with_transport(InPageTransport);
    let store = ThemeStore::new(BrowserStorage, HtmlRoot, bus);

    let lifecycle = RwSignal::new(store.lifecycle());
    store.watch(move |theme| {
        let _ = lifecycle.try_set(Lifecycle::Interactive(theme));
    });

    let store = StoredValue::new_local(store);

    // Effect 只在挂载后运行，此时存储才允许操作页面
    Effect::new(move |_| {
        store.with_value(|store| {
            store.hydrate();
        });
    });
    on_cleanup(move || {
        let _ = store.try_with_value(|store| store.detach());
    });

    provide_context(ThemeContext { store, lifecycle });
    children()
}

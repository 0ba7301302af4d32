//! 主题模块：同源所有页面共享的明暗偏好
//!
//! 在客户端调用 [`ThemeStore::hydrate`] 之前，存储处于休眠状态：
//! 只报告默认主题且不做任何副作用，保证首次渲染与预渲染的标记一致。

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::events::{EventBus, Subscription};
use crate::storage::KeyValueStore;

pub const THEME_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    /// 应用到文档根节点上的 class
    pub fn class(&self) -> &'static str {
        self.as_str()
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dark" => Ok(Theme::Dark),
            "light" => Ok(Theme::Light),
            _ => Err(()),
        }
    }
}

/// 主题总线上传递的消息
///
/// `origin` 是发布方存储的 id；通过 storage 事件观察到的变化没有 origin。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeChange {
    pub theme: Theme,
    #[serde(default)]
    pub origin: Option<Uuid>,
}

/// 承载当前主题 class 的元素
pub trait DocumentRoot {
    fn add_class(&self, class: &str);
    fn remove_class(&self, class: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// 可交互前的渲染：只输出与主题无关的内容
    Dormant,
    Interactive(Theme),
}

// =========================================================
// 主题存储 (ThemeStore)
// =========================================================

type Watcher = Rc<dyn Fn(Theme)>;

struct Inner<S, D> {
    id: Uuid,
    storage: S,
    root: D,
    bus: EventBus<ThemeChange>,
    lifecycle: Cell<Lifecycle>,
    watchers: RefCell<Vec<Watcher>>,
    subscription: RefCell<Option<Subscription>>,
}

/// 克隆开销很小，克隆体共享状态
pub struct ThemeStore<S, D> {
    inner: Rc<Inner<S, D>>,
}

impl<S, D> Clone for ThemeStore<S, D> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<S, D> ThemeStore<S, D>
where
    S: KeyValueStore + 'static,
    D: DocumentRoot + 'static,
{
    pub fn new(storage: S, root: D, bus: EventBus<ThemeChange>) -> Self {
        Self {
            inner: Rc::new(Inner {
                id: Uuid::new_v4(),
                storage,
                root,
                bus,
                lifecycle: Cell::new(Lifecycle::Dormant),
                watchers: RefCell::new(Vec::new()),
                subscription: RefCell::new(None),
            }),
        }
    }

    /// 本存储发布的每条消息都带上的 id
    pub fn id(&self) -> Uuid {
        self.inner.id
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.inner.lifecycle.get()
    }

    pub fn is_interactive(&self) -> bool {
        matches!(self.lifecycle(), Lifecycle::Interactive(_))
    }

    /// 当前主题；休眠时为默认值
    pub fn get(&self) -> Theme {
        match self.lifecycle() {
            Lifecycle::Dormant => Theme::default(),
            Lifecycle::Interactive(theme) => theme,
        }
    }

    /// 读取持久化的偏好并开始监听，只执行一次
    pub fn hydrate(&self) -> Theme {
        if let Lifecycle::Interactive(theme) = self.lifecycle() {
            return theme;
        }

        let stored = self.inner.storage.get(THEME_KEY);
        let theme = match stored.as_deref().map(Theme::from_str) {
            Some(Ok(theme)) => theme,
            _ => {
                let theme = Theme::default();
                if !self.inner.storage.set(THEME_KEY, theme.as_str()) {
                    log::warn!("theme: could not persist default preference");
                }
                theme
            }
        };

        self.apply_class(theme);
        self.inner.lifecycle.set(Lifecycle::Interactive(theme));

        let weak = Rc::downgrade(&self.inner);
        let subscription = self
            .inner
            .bus
            .subscribe(move |change| Self::on_broadcast(&weak, change));
        *self.inner.subscription.borrow_mut() = Some(subscription);

        log::debug!("theme: hydrated as {}", theme);
        self.notify(theme);
        theme
    }

    /// 切换主题，持久化后通知其他订阅方
    ///
    /// 休眠状态下不做任何事。
    pub fn toggle(&self) -> Theme {
        let Lifecycle::Interactive(current) = self.lifecycle() else {
            log::debug!("theme: toggle ignored before hydration");
            return Theme::default();
        };

        let next = current.toggled();
        self.inner.lifecycle.set(Lifecycle::Interactive(next));
        self.apply_class(next);
        if !self.inner.storage.set(THEME_KEY, next.as_str()) {
            log::warn!("theme: could not persist {}", next);
        }
        self.inner.bus.publish(&ThemeChange {
            theme: next,
            origin: Some(self.inner.id),
        });

        log::info!("theme: switched to {}", next);
        self.notify(next);
        next
    }

    /// 注册回调，本地或外部的每次变化后都会调用
    pub fn watch(&self, watcher: impl Fn(Theme) + 'static) {
        self.inner.watchers.borrow_mut().push(Rc::new(watcher));
    }

    /// 停止监听总线，存储保留当前值
    pub fn detach(&self) {
        self.inner.subscription.borrow_mut().take();
    }

    fn on_broadcast(weak: &Weak<Inner<S, D>>, change: ThemeChange) {
        let Some(inner) = weak.upgrade() else {
            return;
        };
        let store = Self { inner };
        store.apply_external(change);
    }

    fn apply_external(&self, change: ThemeChange) {
        if change.origin == Some(self.inner.id) {
            return;
        }
        match self.lifecycle() {
            Lifecycle::Interactive(current) if current != change.theme => {}
            _ => return,
        }

        self.inner
            .lifecycle
            .set(Lifecycle::Interactive(change.theme));
        self.apply_class(change.theme);
        log::debug!("theme: following external change to {}", change.theme);
        self.notify(change.theme);
    }

    fn apply_class(&self, theme: Theme) {
        self.inner.root.remove_class(theme.toggled().class());
        self.inner.root.add_class(theme.class());
    }

    fn notify(&self, theme: Theme) {
        let watchers: Vec<Watcher> = self.inner.watchers.borrow().clone();
        for watcher in watchers {
            watcher(theme);
        }
    }
}

// =========================================================
// 测试替身: MemoryRoot
// =========================================================

/// 保存在内存中的 class 列表
#[cfg(test)]
#[derive(Clone, Default)]
pub struct MemoryRoot {
    pub classes: Rc<RefCell<std::collections::BTreeSet<String>>>,
}

#[cfg(test)]
impl MemoryRoot {
    pub fn classes(&self) -> Vec<String> {
        self.classes.borrow().iter().cloned().collect()
    }
}

#[cfg(test)]
impl DocumentRoot for MemoryRoot {
    fn add_class(&self, class: &str) {
        self.classes.borrow_mut().insert(class.to_string());
    }

    fn remove_class(&self, class: &str) {
        self.classes.borrow_mut().remove(class);
    }
}

#[cfg(test)]
mod tests;

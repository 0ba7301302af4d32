use super::*;
use crate::events::{BroadcastTransport, LocalBroadcast};
use crate::storage::MemoryStore;

// =========================================================
// 测试辅助 (Helpers)
// =========================================================

struct Tab {
    store: ThemeStore<MemoryStore, MemoryRoot>,
    root: MemoryRoot,
    notified: Rc<RefCell<Vec<Theme>>>,
}

fn open_tab(storage: &MemoryStore, channel: &LocalBroadcast<ThemeChange>) -> Tab {
    let root = MemoryRoot::default();
    let bus = EventBus::new().with_transport(channel.clone());
    let store = ThemeStore::new(storage.clone(), root.clone(), bus);

    let notified = Rc::new(RefCell::new(Vec::new()));
    let sink = notified.clone();
    store.watch(move |t| sink.borrow_mut().push(t));

    Tab {
        store,
        root,
        notified,
    }
}

fn count_messages(channel: &LocalBroadcast<ThemeChange>) -> (Rc<RefCell<Vec<ThemeChange>>>, Subscription) {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    let sub = channel.subscribe(Rc::new(move |m: ThemeChange| sink.borrow_mut().push(m)));
    (seen, sub)
}

// =========================================================
// 生命周期 (Lifecycle)
// =========================================================

#[test]
fn dormant_store_reports_default_and_touches_nothing() {
    let storage = MemoryStore::new();
    storage.set(THEME_KEY, "light");
    let tab = open_tab(&storage, &LocalBroadcast::new());

    assert_eq!(tab.store.lifecycle(), Lifecycle::Dormant);
    assert_eq!(tab.store.get(), Theme::Dark);
    assert_eq!(tab.store.toggle(), Theme::Dark);

    assert_eq!(storage.get(THEME_KEY).as_deref(), Some("light"));
    assert!(tab.root.classes().is_empty());
    assert!(tab.notified.borrow().is_empty());
}

#[test]
fn hydrate_defaults_to_dark_and_persists_it() {
    let storage = MemoryStore::new();
    let tab = open_tab(&storage, &LocalBroadcast::new());

    assert_eq!(tab.store.hydrate(), Theme::Dark);
    assert_eq!(tab.store.lifecycle(), Lifecycle::Interactive(Theme::Dark));
    assert_eq!(storage.get(THEME_KEY).as_deref(), Some("dark"));
    assert_eq!(tab.root.classes(), vec!["dark"]);
}

#[test]
fn hydrate_honors_a_stored_light_preference() {
    let storage = MemoryStore::new();
    storage.set(THEME_KEY, "light");
    let tab = open_tab(&storage, &LocalBroadcast::new());

    assert_eq!(tab.store.hydrate(), Theme::Light);
    assert_eq!(tab.root.classes(), vec!["light"]);
    assert_eq!(storage.get(THEME_KEY).as_deref(), Some("light"));
}

#[test]
fn unrecognized_value_is_overwritten_with_default() {
    let storage = MemoryStore::new();
    storage.set(THEME_KEY, "sepia");
    let tab = open_tab(&storage, &LocalBroadcast::new());

    assert_eq!(tab.store.hydrate(), Theme::Dark);
    assert_eq!(storage.get(THEME_KEY).as_deref(), Some("dark"));
}

#[test]
fn hydrate_runs_once() {
    let storage = MemoryStore::new();
    let channel = LocalBroadcast::new();
    let tab = open_tab(&storage, &channel);

    tab.store.hydrate();
    tab.store.toggle();
    assert_eq!(tab.store.hydrate(), Theme::Light);
    assert_eq!(channel.subscriber_count(), 1);
}

// =========================================================
// 切换与同步 (Toggle & Sync)
// =========================================================

#[test]
fn toggle_swaps_class_persists_and_publishes() {
    let storage = MemoryStore::new();
    let channel = LocalBroadcast::new();
    let tab = open_tab(&storage, &channel);
    tab.store.hydrate();
    let (messages, _sub) = count_messages(&channel);

    assert_eq!(tab.store.toggle(), Theme::Light);

    assert_eq!(tab.root.classes(), vec!["light"]);
    assert_eq!(storage.get(THEME_KEY).as_deref(), Some("light"));
    assert_eq!(
        *messages.borrow(),
        vec![ThemeChange {
            theme: Theme::Light,
            origin: Some(tab.store.id()),
        }]
    );

    tab.store.toggle();
    assert_eq!(tab.root.classes(), vec!["dark"]);
}

#[test]
fn two_tabs_converge_without_echo() {
    let storage = MemoryStore::new();
    let channel = LocalBroadcast::new();
    let a = open_tab(&storage, &channel);
    let b = open_tab(&storage, &channel);
    a.store.hydrate();
    b.store.hydrate();

    a.store.toggle();

    assert_eq!(a.store.get(), Theme::Light);
    assert_eq!(b.store.get(), Theme::Light);
    assert_eq!(b.root.classes(), vec!["light"]);
    // hydrate + 自身切换；自己广播的回声不算变化
    assert_eq!(*a.notified.borrow(), vec![Theme::Dark, Theme::Light]);
    assert_eq!(*b.notified.borrow(), vec![Theme::Dark, Theme::Light]);
}

#[test]
fn external_change_is_not_rebroadcast() {
    let storage = MemoryStore::new();
    let channel = LocalBroadcast::new();
    let tab = open_tab(&storage, &channel);
    tab.store.hydrate();
    let (messages, _sub) = count_messages(&channel);

    // 模拟来自其他标签页的 storage 事件：没有 origin
    channel.publish(&ThemeChange {
        theme: Theme::Light,
        origin: None,
    });

    assert_eq!(tab.store.get(), Theme::Light);
    assert_eq!(tab.root.classes(), vec!["light"]);
    assert_eq!(messages.borrow().len(), 1);
}

#[test]
fn redundant_external_change_does_not_notify() {
    let storage = MemoryStore::new();
    let channel = LocalBroadcast::new();
    let tab = open_tab(&storage, &channel);
    tab.store.hydrate();

    channel.publish(&ThemeChange {
        theme: Theme::Dark,
        origin: None,
    });

    assert_eq!(*tab.notified.borrow(), vec![Theme::Dark]);
}

#[test]
fn detached_store_stops_following() {
    let storage = MemoryStore::new();
    let channel = LocalBroadcast::new();
    let tab = open_tab(&storage, &channel);
    tab.store.hydrate();
    tab.store.detach();

    channel.publish(&ThemeChange {
        theme: Theme::Light,
        origin: None,
    });

    assert_eq!(tab.store.get(), Theme::Dark);
    assert_eq!(channel.subscriber_count(), 0);
}

#[test]
fn theme_change_wire_format() {
    let change = ThemeChange {
        theme: Theme::Light,
        origin: None,
    };
    let json = serde_json::to_string(&change).unwrap();
    assert_eq!(json, r#"{"theme":"light","origin":null}"#);

    let parsed: ThemeChange = serde_json::from_str(r#"{"theme":"dark"}"#).unwrap();
    assert_eq!(parsed.theme, Theme::Dark);
    assert!(parsed.origin.is_none());
}

//! 会话探测模块：首页加载时运行
//!
//! 向后端询问当前身份。会话有效则跳转到控制面板；
//! 其他情况（包括各种失败）先清理过期的本地身份缓存，再展示注册表单。

use std::cell::Cell;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use standoff_shared::User;
use standoff_shared::protocol::{MeQuery, NoVariables};

use crate::api::GraphQlGateway;
use crate::navigation::Navigator;
use crate::request::HttpClient;
use crate::storage::{KeyValueStore, SessionCache};

/// 挂载守卫：发起异步流程的页面卸载时被释放
#[derive(Debug, Clone)]
pub struct MountGuard {
    mounted: Arc<AtomicBool>,
}

impl Default for MountGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl MountGuard {
    pub fn new() -> Self {
        Self {
            mounted: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::Acquire)
    }

    pub fn release(&self) {
        self.mounted.store(false, Ordering::Release);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// 会话存在，浏览器已被送往控制面板
    Authenticated(User),
    /// 没有会话（或检查失败），应展示注册表单
    Anonymous,
}

pub struct SessionProbe<C: HttpClient, S: KeyValueStore, N: Navigator> {
    gateway: GraphQlGateway<C>,
    cache: SessionCache<S>,
    navigator: N,
    dashboard_url: String,
    fired: Cell<bool>,
    checking: Cell<bool>,
}

impl<C: HttpClient, S: KeyValueStore, N: Navigator> SessionProbe<C, S, N> {
    pub fn new(
        gateway: GraphQlGateway<C>,
        cache: SessionCache<S>,
        navigator: N,
        dashboard_url: impl Into<String>,
    ) -> Self {
        Self {
            gateway,
            cache,
            navigator,
            dashboard_url: dashboard_url.into(),
            fired: Cell::new(false),
            checking: Cell::new(true),
        }
    }

    /// 探测结束前为 true；已认证时保持 true，因为页面即将被替换
    pub fn is_checking(&self) -> bool {
        self.checking.get()
    }

    /// 本浏览器最近一次缓存的身份，用于检查期间的问候语
    pub fn cached_user(&self) -> Option<User> {
        self.cache.cached_user()
    }

    /// 执行一次身份查询
    ///
    /// 已经执行过，或响应返回前 `guard` 已被释放时返回 `None`（此时不做任何改动）。
    pub async fn run(&self, guard: &MountGuard) -> Option<ProbeOutcome> {
        if self.fired.replace(true) {
            log::debug!("session probe: already ran");
            return None;
        }

        let result = self.gateway.execute::<MeQuery>(&NoVariables {}).await;

        if !guard.is_mounted() {
            log::debug!("session probe: page gone before the answer arrived");
            return None;
        }

        let identity = match result {
            Ok(envelope) => envelope.data.and_then(|data| data.me),
            Err(e) => {
                log::warn!("session probe failed, treating as signed out: {}", e);
                None
            }
        };

        match identity {
            Some(user) => {
                log::info!("session probe: signed in as {}, leaving for dashboard", user.email);
                self.navigator.navigate(&self.dashboard_url);
                Some(ProbeOutcome::Authenticated(user))
            }
            None => {
                log::info!("session probe: no session");
                self.cache.clear();
                self.checking.set(false);
                Some(ProbeOutcome::Anonymous)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;
    use crate::navigation::RecordingNavigator;
    use crate::request::MockHttpClient;
    use crate::storage::{MemoryStore, SESSION_KEYS, USER_KEY};
    use serde_json::json;
    use std::rc::Rc;

    const DASHBOARD: &str = "http://dash.test";

    struct Harness {
        client: Rc<MockHttpClient>,
        store: MemoryStore,
        nav: Rc<RecordingNavigator>,
        probe: SessionProbe<Rc<MockHttpClient>, MemoryStore, Rc<RecordingNavigator>>,
    }

    fn harness() -> Harness {
        let client = Rc::new(MockHttpClient::new());
        let store = MemoryStore::new();
        let nav = Rc::new(RecordingNavigator::new());
        let probe = SessionProbe::new(
            GraphQlGateway::new(client.clone(), "http://api.test/query"),
            SessionCache::new(store.clone()),
            nav.clone(),
            DASHBOARD,
        );
        for key in SESSION_KEYS {
            store.set(key, "stale");
        }
        Harness {
            client,
            store,
            nav,
            probe,
        }
    }

    fn assert_cache_cleared(store: &MemoryStore) {
        for key in SESSION_KEYS {
            assert!(!store.contains(key), "{} survived", key);
        }
    }

    #[tokio::test]
    async fn live_session_redirects_and_keeps_loading() {
        let h = harness();
        h.client.mock_response(
            "Me",
            200,
            json!({ "data": { "me": {
                "id": "1", "email": "tyler@fc.com", "firstName": "Tyler", "lastName": "Durden"
            } } }),
        );

        let outcome = h.probe.run(&MountGuard::new()).await.unwrap();

        assert!(matches!(outcome, ProbeOutcome::Authenticated(ref u) if u.id == "1"));
        assert_eq!(*h.nav.visits.borrow(), vec![DASHBOARD.to_string()]);
        assert!(h.probe.is_checking());
        // 会话存在时，缓存不归探测逻辑管
        assert!(h.store.contains(USER_KEY));
    }

    #[tokio::test]
    async fn session_without_last_name_still_redirects() {
        let h = harness();
        h.client.mock_response(
            "Me",
            200,
            json!({ "data": { "me": {
                "id": "1", "email": "gh@fc.com", "firstName": "Tyler", "lastName": null
            } } }),
        );

        let outcome = h.probe.run(&MountGuard::new()).await.unwrap();

        let ProbeOutcome::Authenticated(user) = outcome else {
            panic!("expected a live session, got {outcome:?}");
        };
        assert_eq!(user.last_name, "");
        assert_eq!(h.nav.count(), 1);
        assert!(h.probe.is_checking());
    }

    #[tokio::test]
    async fn null_identity_clears_cache_and_stops_checking() {
        let h = harness();
        h.client
            .mock_response("Me", 200, json!({ "data": { "me": null } }));

        assert!(h.probe.is_checking());
        let outcome = h.probe.run(&MountGuard::new()).await;

        assert_eq!(outcome, Some(ProbeOutcome::Anonymous));
        assert!(!h.probe.is_checking());
        assert_cache_cleared(&h.store);
        assert_eq!(h.nav.count(), 0);
    }

    #[tokio::test]
    async fn every_failure_reads_as_anonymous() {
        let cases: Vec<Box<dyn Fn(&MockHttpClient)>> = vec![
            Box::new(|c: &MockHttpClient| c.mock_failure("Me", TransportError::Network("Failed to fetch".into()))),
            Box::new(|c: &MockHttpClient| c.mock_response("Me", 502, json!({ "data": null }))),
            Box::new(|c: &MockHttpClient| c.mock_raw("Me", 200, "not json")),
            Box::new(|c: &MockHttpClient| c.mock_response("Me", 200, json!({ "errors": [{ "message": "unauthenticated" }] }))),
        ];

        for setup in cases {
            let h = harness();
            setup(&h.client);

            let outcome = h.probe.run(&MountGuard::new()).await;

            assert_eq!(outcome, Some(ProbeOutcome::Anonymous));
            assert!(!h.probe.is_checking());
            assert_cache_cleared(&h.store);
            assert_eq!(h.nav.count(), 0);
        }
    }

    #[tokio::test]
    async fn cached_identity_is_readable_until_the_session_is_gone() {
        let h = harness();
        SessionCache::new(h.store.clone()).store_user(&User {
            id: "7".into(),
            email: "marla@fc.com".into(),
            first_name: "Marla".into(),
            last_name: String::new(),
        });
        h.client
            .mock_response("Me", 200, json!({ "data": { "me": null } }));

        let cached = h.probe.cached_user().unwrap();
        assert_eq!(cached.display_name(), "Marla");

        assert_eq!(h.probe.run(&MountGuard::new()).await, Some(ProbeOutcome::Anonymous));
        assert!(h.probe.cached_user().is_none());
    }

    #[tokio::test]
    async fn probe_fires_once() {
        let h = harness();
        h.client
            .mock_response("Me", 200, json!({ "data": { "me": null } }));
        let guard = MountGuard::new();

        assert!(h.probe.run(&guard).await.is_some());
        assert!(h.probe.run(&guard).await.is_none());
        assert_eq!(h.client.request_count(), 1);
    }

    #[tokio::test]
    async fn released_guard_makes_the_answer_a_no_op() {
        let h = harness();
        h.client
            .mock_response("Me", 200, json!({ "data": { "me": null } }));
        let release = h.client.hold_next();
        let guard = MountGuard::new();

        let mut pending = Box::pin(h.probe.run(&guard));
        assert!(futures::poll!(pending.as_mut()).is_pending());

        guard.release();
        release.send(()).unwrap();

        assert_eq!(pending.await, None);
        assert!(h.probe.is_checking());
        assert!(h.store.contains(USER_KEY));
    }
}

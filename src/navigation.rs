//! 整页跳转与第三方 OAuth 登录入口

#[cfg(test)]
use std::cell::RefCell;

/// 离开当前页面前往 `url`（整页跳转，而非路由切换）
pub trait Navigator {
    fn navigate(&self, url: &str);
}

impl<N: Navigator + ?Sized> Navigator for std::rc::Rc<N> {
    fn navigate(&self, url: &str) {
        (**self).navigate(url)
    }
}

/// 表单旁提供的第三方登录方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OAuthProvider {
    GitHub,
    Google,
}

impl OAuthProvider {
    pub const ALL: [OAuthProvider; 2] = [OAuthProvider::GitHub, OAuthProvider::Google];

    /// 后端 `/auth/` 下的路径段
    pub fn slug(&self) -> &'static str {
        match self {
            OAuthProvider::GitHub => "github",
            OAuthProvider::Google => "google",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            OAuthProvider::GitHub => "GitHub",
            OAuthProvider::Google => "Google",
        }
    }
}

// =========================================================
// 测试替身: RecordingNavigator
// =========================================================

#[cfg(test)]
#[derive(Default)]
pub struct RecordingNavigator {
    pub visits: RefCell<Vec<String>>,
}

#[cfg(test)]
impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.visits.borrow().len()
    }

    pub fn last(&self) -> Option<String> {
        self.visits.borrow().last().cloned()
    }
}

#[cfg(test)]
impl Navigator for RecordingNavigator {
    fn navigate(&self, url: &str) {
        self.visits.borrow_mut().push(url.to_string());
    }
}

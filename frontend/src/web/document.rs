//! 整页跳转与主题 class 的浏览器实现

use standoff_auth::{DocumentRoot, Navigator};

/// 通过 `window.location` 进行整页跳转
#[derive(Clone, Copy, Default)]
pub struct BrowserNavigator;

impl Navigator for BrowserNavigator {
    fn navigate(&self, url: &str) {
        let Some(window) = web_sys::window() else {
            log::error!("navigation to {} failed: no window", url);
            return;
        };
        if let Err(e) = window.location().set_href(url) {
            log::error!("navigation to {} failed: {:?}", url, e);
        }
    }
}

/// `<html>` 元素的 class 列表
#[derive(Clone, Copy, Default)]
pub struct HtmlRoot;

impl HtmlRoot {
    fn element() -> Option<web_sys::Element> {
        web_sys::window()?.document()?.document_element()
    }
}

impl DocumentRoot for HtmlRoot {
    fn add_class(&self, class: &str) {
        if let Some(el) = Self::element() {
            let _ = el.class_list().add_1(class);
        }
    }

    fn remove_class(&self, class: &str) {
        if let Some(el) = Self::element() {
            let _ = el.class_list().remove_1(class);
        }
    }
}

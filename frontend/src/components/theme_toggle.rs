use leptos::prelude::*;
use standoff_auth::{Lifecycle, Theme};

use crate::components::icons::{Moon, Sun};
use crate::theme::use_theme;

/// 主题切换按钮
/// 存储可交互之前渲染空按钮，避免首次绘制时显示错误的图标
#[component]
pub fn ThemeToggle() -> impl IntoView {
    let theme = use_theme();

    let label = move || match theme.lifecycle() {
        Lifecycle::Dormant => "Toggle theme",
        Lifecycle::Interactive(Theme::Dark) => "Switch to light mode",
        Lifecycle::Interactive(Theme::Light) => "Switch to dark mode",
    };

    view! {
        <button
            type="button"
            class="btn btn-ghost btn-circle fixed top-4 right-4"
            aria-label=label
            title=label
            on:click=move |_| theme.toggle()
        >
            {move || match theme.lifecycle() {
                Lifecycle::Dormant => view! { <span class="h-5 w-5"></span> }.into_any(),
                Lifecycle::Interactive(Theme::Dark) => view! { <Sun class="h-5 w-5" /> }.into_any(),
                Lifecycle::Interactive(Theme::Light) => view! { <Moon class="h-5 w-5" /> }.into_any(),
            }}
        </button>
    }
}

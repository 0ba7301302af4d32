use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use standoff_auth::{MountGuard, ProbeOutcome};

use crate::components::signup::SignupPage;
use crate::services::{session_probe, use_config};

/// 首页：先检查会话是否有效，再展示注册表单
#[component]
pub fn HomePage() -> impl IntoView {
    let probe = Rc::new(session_probe(&use_config()));
    let checking = RwSignal::new(probe.is_checking());
    let greeting = probe
        .cached_user()
        .map(|user| format!("Signed in as {}", user.display_name()));

    let guard = MountGuard::new();
    on_cleanup({
        let guard = guard.clone();
        move || guard.release()
    });

    spawn_local(async move {
        match probe.run(&guard).await {
            Some(ProbeOutcome::Anonymous) => {
                let _ = checking.try_set(probe.is_checking());
            }
            // 正在跳转到控制面板，保持加载动画
            Some(ProbeOutcome::Authenticated(_)) | None => {}
        }
    });

    view! {
        <Show
            when=move || !checking.get()
            fallback=move || {
                let greeting = greeting.clone().map(|text| {
                    view! { <p class="text-sm text-base-content/50">{text}</p> }
                });
                view! {
                    <div class="flex flex-col items-center justify-center min-h-screen gap-4">
                        <span class="loading loading-spinner loading-lg text-primary"></span>
                        <p class="text-base-content/70">"Checking authentication..."</p>
                        {greeting}
                    </div>
                }
            }
        >
            <SignupPage />
        </Show>
    }
}

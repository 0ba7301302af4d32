//! 注册页与登录页共用的表单卡片
//!
//! 控制器不是 `Send` 的，放在本地 `StoredValue` 中，
//! 每次状态变化都同步到视图读取的 `RwSignal<FormSnapshot>`。

use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use standoff_auth::{AuthForm, Field, FormSnapshot, OAuthProvider};

use crate::components::icons::{GitHub, Google, ShieldCheck};
use crate::services::{BrowserForm, form_controller, use_config};

/// 表单周围的静态文案
pub struct AuthFormCopy {
    pub title: &'static str,
    pub subtitle: &'static str,
    /// 凭据错误下方的附加提示
    pub credentials_hint: Option<&'static str>,
}

fn provider_icon(provider: OAuthProvider) -> AnyView {
    match provider {
        OAuthProvider::GitHub => view! { <GitHub class="h-5 w-5" /> }.into_any(),
        OAuthProvider::Google => view! { <Google class="h-5 w-5" /> }.into_any(),
    }
}

/// 当前错误下 `field` 是否需要标红
fn is_flagged<F: AuthForm>(snapshot: &FormSnapshot<F>, field: Field) -> bool {
    match &snapshot.error {
        Some(err) if err.highlights_credentials() => {
            matches!(field, Field::Email | Field::Password)
        }
        Some(err) => err.field() == Some(field),
        None => false,
    }
}

pub fn auth_form<F>(copy: AuthFormCopy, footer: impl IntoView + 'static) -> impl IntoView
where
    F: AuthForm + Send + Sync,
{
    let config = use_config();
    let controller: BrowserForm<F> = form_controller(&config);

    let snapshot = RwSignal::new(controller.snapshot());
    controller.watch(move |s| {
        let _ = snapshot.try_set(s.clone());
    });
    let controller = StoredValue::new_local(Rc::new(controller));

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let controller = controller.with_value(Rc::clone);
        spawn_local(async move {
            let outcome = controller.submit().await;
            log::debug!("{} submit: {:?}", F::NAME, outcome);
        });
    };

    let inputs = F::FIELDS
        .iter()
        .copied()
        .map(|field| {
            let value = move || {
                snapshot.with(|s| s.data.value(field).unwrap_or_default().to_string())
            };
            let flagged = move || snapshot.with(|s| is_flagged(s, field));

            view! {
                <div class="form-control">
                    <label class="label" for=field.name()>
                        <span class="label-text">{field.label()}</span>
                    </label>
                    <input
                        id=field.name()
                        name=field.name()
                        type=field.input_type()
                        class="input input-bordered"
                        class:input-error=flagged
                        prop:value=value
                        on:input=move |ev| {
                            let value = event_target_value(&ev);
                            controller.with_value(|c| c.edit(field, value));
                        }
                    />
                </div>
            }
        })
        .collect_view();

    let oauth_buttons = OAuthProvider::ALL
        .into_iter()
        .map(|provider| {
            view! {
                <button
                    type="button"
                    class="btn btn-outline flex-1 gap-2"
                    on:click=move |_| {
                        controller.with_value(|c| {
                            if let Err(e) = c.oauth(provider) {
                                log::error!("{} sign-in unavailable: {}", provider.label(), e);
                            }
                        });
                    }
                >
                    {provider_icon(provider)}
                    {provider.label()}
                </button>
            }
        })
        .collect_view();

    let error_message = move || snapshot.with(|s| s.error.as_ref().map(|e| e.message.clone()));
    let show_hint = move || {
        copy.credentials_hint.is_some()
            && snapshot.with(|s| s.error.as_ref().is_some_and(|e| e.highlights_credentials()))
    };
    let hint = copy.credentials_hint.unwrap_or_default();

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="text-center mb-4">
                    <div class="flex flex-col items-center gap-2">
                        <div class="p-3 bg-primary/10 rounded-2xl text-primary">
                            <ShieldCheck class="h-8 w-8" />
                        </div>
                        <h1 class="text-3xl font-bold">{copy.title}</h1>
                        <p class="text-base-content/70">{copy.subtitle}</p>
                    </div>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" novalidate=true on:submit=on_submit>
                        <Show when=move || error_message().is_some()>
                            <div role="alert" class="alert alert-error text-sm py-2 flex-col items-start">
                                <span>{move || error_message().unwrap_or_default()}</span>
                                <Show when=show_hint>
                                    <span class="opacity-80">{hint}</span>
                                </Show>
                            </div>
                        </Show>

                        {inputs}

                        <div class="form-control mt-6">
                            <button
                                type="submit"
                                class="btn btn-primary"
                                disabled=move || snapshot.with(|s| s.in_flight())
                            >
                                {move || snapshot.with(|s| s.button_label())}
                            </button>
                        </div>

                        <div class="divider text-sm">"or continue with"</div>
                        <div class="flex gap-2">{oauth_buttons}</div>

                        <div class="text-center text-sm mt-4">{footer}</div>
                    </form>
                </div>
            </div>
        </div>
    }
}

use leptos::prelude::*;
use standoff_auth::SignupForm;

use crate::components::auth_form::{AuthFormCopy, auth_form};
use crate::web::route::AppRoute;
use crate::web::router::Link;

#[component]
pub fn SignupPage() -> impl IntoView {
    let copy = AuthFormCopy {
        title: "Create your account",
        subtitle: "Sign up to get started",
        credentials_hint: None,
    };
    let footer = view! {
        <span>"Already have an account? "</span>
        <Link to=AppRoute::Login class="link link-primary">"Sign in"</Link>
    };

    auth_form::<SignupForm>(copy, footer)
}

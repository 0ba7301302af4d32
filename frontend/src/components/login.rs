use leptos::prelude::*;
use standoff_auth::LoginForm;
use standoff_auth::form::login::CREDENTIALS_HINT;

use crate::components::auth_form::{AuthFormCopy, auth_form};
use crate::web::route::AppRoute;
use crate::web::router::Link;

#[component]
pub fn LoginPage() -> impl IntoView {
    let copy = AuthFormCopy {
        title: "Welcome back",
        subtitle: "Sign in to continue to your dashboard",
        credentials_hint: Some(CREDENTIALS_HINT),
    };
    let footer = view! {
        <span>"Don't have an account? "</span>
        <Link to=AppRoute::Signup class="link link-primary">"Sign up"</Link>
    };

    auth_form::<LoginForm>(copy, footer)
}

//! Frame for routes that require a signed-in user.

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use crate::components::nav_bar::NavBar;
use crate::state::auth::AuthState;
use crate::util::auth::install_unauth_redirect;

/// Navigation bar plus page body, or a placeholder while the session is
/// checked. Leaves for `/login` once it is known there is no user.
#[component]
pub fn AuthedPage(title: &'static str, children: ChildrenFn) -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    install_unauth_redirect(auth, use_navigate());

    view! {
        <Show
            when=move || auth.with(AuthState::is_authenticated)
            fallback=move || {
                view! {
                    <div class="page page--placeholder">
                        <p>{move || if auth.get().loading { "Loading..." } else { "Redirecting to login..." }}</p>
                    </div>
                }
            }
        >
            <NavBar/>
            <main class="page">
                <h1 class="page__title">{title}</h1>
                {children()}
            </main>
        </Show>
    }
}

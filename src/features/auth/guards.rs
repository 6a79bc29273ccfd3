use crate::features::auth::state::use_auth;
use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

#[component]
pub fn RequireAuth(children: ChildrenFn) -> impl IntoView {
    let auth = use_auth();
    let navigate = use_navigate();

    Effect::new(move |_| {
        if !auth.is_loading.get() && !auth.is_authenticated.get() {
            // UX-only guard; real access control must live on the API.
            navigate("/login", Default::default());
        }
    });

    view! {
        {move || {
            if auth.is_loading.get() {
                view! {
                    <div class="flex justify-center items-center min-h-screen bg-white dark:bg-gray-900">
                        <div class="animate-pulse text-gray-400">"Loading..."</div>
                    </div>
                }
                .into_any()
            } else {
                children().into_any()
            }
        }}
    }
}

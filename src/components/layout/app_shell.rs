//! Shared layout wrapper with the back-office header and content container.
//! It centralizes header markup and the sign-out control so routes can
//! focus on content. Navigation remains client-side; backend routes must
//! enforce access control.

use crate::features::auth::state::use_auth;
use leptos::{prelude::*, task::spawn_local};
use leptos_router::components::A;

/// Wraps routes with a header and main content container.
#[component]
pub fn AppShell(children: Children) -> impl IntoView {
    let auth = use_auth();
    let is_authenticated = auth.is_authenticated;

    view! {
        <div class="min-h-screen flex flex-col bg-gray-50 dark:bg-gray-900">
            <header class="border-b border-gray-200 bg-white dark:border-gray-700 dark:bg-gray-800">
                <div class="max-w-screen-xl flex flex-wrap items-center justify-between mx-auto p-4">
                    <A
                        href="/dashboard"
                        {..}
                        class="flex items-center space-x-3"
                    >
                        <span class="font-semibold whitespace-nowrap text-emerald-800 dark:text-emerald-300">
                            "SACCO Admin"
                        </span>
                    </A>
                    <Show when=move || is_authenticated.get()>
                        <div class="flex items-center gap-4">
                            {move || {
                                auth.user
                                    .get()
                                    .map(|user| {
                                        view! {
                                            <span class="text-sm text-gray-600 dark:text-gray-300">
                                                {format!("{} {}", user.first_name, user.last_name)}
                                            </span>
                                        }
                                    })
                            }}
                            <A
                                href="/profile"
                                {..}
                                class="py-2 px-3 text-sm text-gray-900 rounded hover:bg-gray-100 dark:text-white dark:hover:bg-gray-700"
                            >
                                "Profile"
                            </A>
                            <button
                                type="button"
                                class="py-2 px-3 text-sm text-gray-900 rounded hover:bg-gray-100 dark:text-white dark:hover:bg-gray-700"
                                on:click=move |_| {
                                    spawn_local(auth.logout());
                                }
                            >
                                "Sign Out"
                            </button>
                        </div>
                    </Show>
                </div>
            </header>
            <main class="flex-1">
                <div class="container mx-auto p-4 mt-6">
                    {children()}
                </div>
            </main>
        </div>
    }
}

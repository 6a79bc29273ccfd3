//! Minimalistic 404 page for unknown or unauthorized routes.

use crate::components::AppShell;
use leptos::prelude::*;
use leptos_router::components::A;

/// Renders a clean not-found page for top-level route fallbacks.
#[component]
pub fn NotFoundPage() -> impl IntoView {
    view! {
        <AppShell>
            <div class="flex flex-col items-center justify-center min-h-[50vh] text-center px-4">
                <h1 class="text-9xl font-black text-gray-100 dark:text-gray-800 select-none">
                    "404"
                </h1>
                <p class="text-2xl font-bold text-gray-900 dark:text-white">
                    "Page not found"
                </p>
                <p class="mt-4 text-gray-500 dark:text-gray-400 max-w-sm mx-auto">
                    "The resource you requested is missing or you don't have permission to view it."
                </p>
                <div class="mt-6">
                    <A
                        href="/dashboard"
                        {..}
                        class="inline-flex items-center px-5 py-2.5 text-sm font-medium text-white bg-emerald-700 rounded-lg hover:bg-emerald-800 focus:ring-4 focus:outline-none focus:ring-emerald-300"
                    >
                        "Go Home"
                    </A>
                </div>
            </div>
        </AppShell>
    }
}

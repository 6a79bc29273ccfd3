//! Landing page after login. The wider back-office (members, loans,
//! expenses) hangs off this shell; only the auth surface lives in this
//! repository, so the page stays a greeting plus role-gated entry hints.

use crate::components::AppShell;
use crate::features::auth::RequireAuth;
use crate::features::auth::roles::Role;
use crate::features::auth::state::use_auth;
use leptos::prelude::*;

#[component]
pub fn DashboardPage() -> impl IntoView {
    view! {
        <RequireAuth>
            <DashboardContent />
        </RequireAuth>
    }
}

#[component]
fn DashboardContent() -> impl IntoView {
    let auth = use_auth();

    view! {
        <AppShell>
            <h1 class="text-2xl font-semibold text-gray-900 dark:text-white">
                "Dashboard"
            </h1>
            {move || {
                auth.user
                    .get()
                    .map(|user| {
                        view! {
                            <p class="mt-2 text-sm text-gray-600 dark:text-gray-300">
                                {format!(
                                    "Signed in as {} {} ({}).",
                                    user.first_name,
                                    user.last_name,
                                    user.role.as_str(),
                                )}
                            </p>
                        }
                    })
            }}
            <Show when=move || auth.has_permission(&[Role::Manager])>
                <div class="mt-6 rounded-lg border border-gray-200 bg-white p-5 dark:border-gray-700 dark:bg-gray-800">
                    <h2 class="text-sm font-semibold text-gray-900 dark:text-white">
                        "Operations"
                    </h2>
                    <p class="mt-1 text-sm text-gray-600 dark:text-gray-300">
                        "Member, loan, and expense administration is available to your role."
                    </p>
                </div>
            </Show>
        </AppShell>
    }
}

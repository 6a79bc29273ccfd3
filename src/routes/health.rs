//! Health page showing build metadata and backend reachability.

use crate::app_lib::build_info;
use crate::components::{Alert, AlertKind, AppShell, Spinner};
use crate::features::auth::client;
use leptos::prelude::*;

#[component]
pub fn HealthPage() -> impl IntoView {
    let health_action = Action::new_local(move |_: &()| async move { client::health().await });

    Effect::new(move |_| {
        if health_action.value().get_untracked().is_none()
            && !health_action.pending().get_untracked()
        {
            health_action.dispatch(());
        }
    });

    view! {
        <AppShell>
            <div class="max-w-lg mx-auto">
                <h1 class="text-2xl font-semibold text-gray-900 dark:text-white">"Health"</h1>
                <dl class="mt-4 space-y-1 text-sm text-gray-600 dark:text-gray-300">
                    <div class="flex gap-2">
                        <dt class="font-medium">"App:"</dt>
                        <dd>{format!("{} {}", build_info::NAME, build_info::VERSION)}</dd>
                    </div>
                    <div class="flex gap-2">
                        <dt class="font-medium">"Commit:"</dt>
                        <dd>{build_info::GIT_SHA}</dd>
                    </div>
                </dl>
                <div class="mt-6">
                    {move || match health_action.value().get() {
                        None => view! { <Spinner /> }.into_any(),
                        Some(Ok(health)) => view! {
                            <Alert
                                kind=AlertKind::Success
                                message=format!(
                                    "API: {}{}",
                                    health.status,
                                    health
                                        .version
                                        .map(|version| format!(" (v{version})"))
                                        .unwrap_or_default(),
                                )
                            />
                        }
                        .into_any(),
                        Some(Err(err)) => view! {
                            <Alert kind=AlertKind::Error message=err.to_string() />
                        }
                        .into_any(),
                    }}
                </div>
            </div>
        </AppShell>
    }
}

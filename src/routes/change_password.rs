//! Change-password route. Reached voluntarily from the shell or as the
//! forced redirect target when the post-login predicate demands a rotation
//! (`?reason=force`). A successful change ends the local session and sends
//! the user back to login with the fresh credentials.

use crate::components::{Alert, AlertKind, AppShell, Button, Spinner, use_toasts};
use crate::features::auth::password::password_issue;
use crate::features::auth::state::use_auth;
use crate::features::auth::types::ChangePasswordRequest;
use crate::features::auth::{RequireAuth, client};
use crate::routes::paths;
use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos_router::hooks::{use_navigate, use_query_map};

#[component]
pub fn ChangePasswordPage() -> impl IntoView {
    view! {
        <RequireAuth>
            <ChangePasswordForm />
        </RequireAuth>
    }
}

#[component]
fn ChangePasswordForm() -> impl IntoView {
    let auth = use_auth();
    let navigate = use_navigate();
    let toasts = use_toasts();
    let forced = use_query_map().get_untracked().get("reason").as_deref() == Some("force");

    let (current, set_current) = signal(String::new());
    let (new_password, set_new_password) = signal(String::new());
    let (confirm, set_confirm) = signal(String::new());
    let (error, set_error) = signal::<Option<String>>(None);

    let change_action = Action::new_local(move |input: &(String, String)| {
        let (current_value, new_value) = input.clone();
        let request = ChangePasswordRequest {
            current_password: current_value,
            new_password: new_value,
        };
        async move { client::change_password(&request).await }
    });

    let navigate_for_change = navigate.clone();
    Effect::new(move |_| {
        if let Some(result) = change_action.value().get() {
            match result {
                Ok(()) => {
                    auth.end_session_locally();
                    navigate_for_change(
                        paths::LOGIN_AFTER_PASSWORD_CHANGE,
                        Default::default(),
                    );
                }
                Err(err) => {
                    toasts.error(err.to_string());
                    set_error.set(Some(err.to_string()));
                }
            }
        }
    });

    let on_submit = move |event: SubmitEvent| {
        event.prevent_default();
        set_error.set(None);

        let current_value = current.get_untracked();
        let new_value = new_password.get_untracked();
        let confirm_value = confirm.get_untracked();

        if current_value.trim().is_empty() {
            set_error.set(Some("Enter your current password.".to_string()));
            return;
        }
        if let Some(issue) = password_issue(&new_value, &confirm_value) {
            set_error.set(Some(issue.to_string()));
            return;
        }

        change_action.dispatch((current_value, new_value));
    };

    view! {
        <AppShell>
            <form class="max-w-sm mx-auto" on:submit=on_submit>
                <h1 class="mb-4 text-2xl font-semibold text-gray-900 dark:text-white">
                    "Change password"
                </h1>
                {forced
                    .then_some(view! {
                        <div class="mb-4">
                            <Alert
                                kind=AlertKind::Info
                                message="Your password must be changed before continuing.".to_string()
                            />
                        </div>
                    })}
                <div class="mb-5">
                    <label
                        class="block mb-2 text-sm font-medium text-gray-900 dark:text-white"
                        for="current_password"
                    >
                        "Current password"
                    </label>
                    <input
                        id="current_password"
                        type="password"
                        class="bg-gray-50 border border-gray-300 text-gray-900 text-sm rounded-lg focus:ring-emerald-500 focus:border-emerald-500 block w-full p-2.5 dark:bg-gray-700 dark:border-gray-600 dark:text-white"
                        autocomplete="current-password"
                        required
                        prop:value=current
                        on:input=move |event| set_current.set(event_target_value(&event))
                    />
                </div>
                <div class="mb-5">
                    <label
                        class="block mb-2 text-sm font-medium text-gray-900 dark:text-white"
                        for="change_new_password"
                    >
                        "New password"
                    </label>
                    <input
                        id="change_new_password"
                        type="password"
                        class="bg-gray-50 border border-gray-300 text-gray-900 text-sm rounded-lg focus:ring-emerald-500 focus:border-emerald-500 block w-full p-2.5 dark:bg-gray-700 dark:border-gray-600 dark:text-white"
                        autocomplete="new-password"
                        required
                        prop:value=new_password
                        on:input=move |event| set_new_password.set(event_target_value(&event))
                    />
                </div>
                <div class="mb-5">
                    <label
                        class="block mb-2 text-sm font-medium text-gray-900 dark:text-white"
                        for="change_confirm_password"
                    >
                        "Confirm new password"
                    </label>
                    <input
                        id="change_confirm_password"
                        type="password"
                        class="bg-gray-50 border border-gray-300 text-gray-900 text-sm rounded-lg focus:ring-emerald-500 focus:border-emerald-500 block w-full p-2.5 dark:bg-gray-700 dark:border-gray-600 dark:text-white"
                        autocomplete="new-password"
                        required
                        prop:value=confirm
                        on:input=move |event| set_confirm.set(event_target_value(&event))
                    />
                </div>
                <Button button_type="submit" disabled=change_action.pending()>
                    "Update password"
                </Button>
                {move || {
                    change_action
                        .pending()
                        .get()
                        .then_some(view! { <div class="mt-4"><Spinner /></div> })
                }}
                {move || {
                    error
                        .get()
                        .map(|message| {
                            view! {
                                <div class="mt-4">
                                    <Alert kind=AlertKind::Error message=message />
                                </div>
                            }
                        })
                }}
            </form>
        </AppShell>
    }
}

//! Profile route. Edits the mutable parts of the signed-in user's record;
//! the in-memory session only changes after the backend accepts the update.

use crate::components::{Alert, AlertKind, AppShell, Button, Spinner, use_toasts};
use crate::features::auth::RequireAuth;
use crate::features::auth::state::use_auth;
use crate::features::auth::types::ProfileUpdate;
use leptos::ev::SubmitEvent;
use leptos::prelude::*;

#[component]
pub fn ProfilePage() -> impl IntoView {
    view! {
        <RequireAuth>
            <ProfileForm />
        </RequireAuth>
    }
}

#[component]
fn ProfileForm() -> impl IntoView {
    let auth = use_auth();
    let toasts = use_toasts();

    let current = auth.user.get_untracked();
    let (first_name, set_first_name) = signal(
        current
            .as_ref()
            .map(|user| user.first_name.clone())
            .unwrap_or_default(),
    );
    let (last_name, set_last_name) = signal(
        current
            .as_ref()
            .map(|user| user.last_name.clone())
            .unwrap_or_default(),
    );
    let (department, set_department) = signal(
        current
            .as_ref()
            .and_then(|user| user.department.clone())
            .unwrap_or_default(),
    );
    let (error, set_error) = signal::<Option<String>>(None);

    let update_action = Action::new_local(move |update: &ProfileUpdate| {
        let update = update.clone();
        async move { auth.update_profile(update).await }
    });

    Effect::new(move |_| {
        if let Some(result) = update_action.value().get() {
            match result {
                Ok(()) => {
                    set_error.set(None);
                    toasts.success("Profile updated.");
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

        let first_value = first_name.get_untracked().trim().to_string();
        let last_value = last_name.get_untracked().trim().to_string();
        if first_value.is_empty() || last_value.is_empty() {
            set_error.set(Some("First and last name are required.".to_string()));
            return;
        }
        let department_value = department.get_untracked().trim().to_string();

        update_action.dispatch(ProfileUpdate {
            first_name: Some(first_value),
            last_name: Some(last_value),
            department: (!department_value.is_empty()).then_some(department_value),
            ..ProfileUpdate::default()
        });
    };

    view! {
        <AppShell>
            <form class="max-w-sm mx-auto" on:submit=on_submit>
                <h1 class="mb-4 text-2xl font-semibold text-gray-900 dark:text-white">
                    "Profile"
                </h1>
                {move || {
                    auth.user
                        .get()
                        .map(|user| {
                            view! {
                                <p class="mb-4 text-sm text-gray-500 dark:text-gray-400">
                                    {format!("{} · {}", user.email, user.role.as_str())}
                                </p>
                            }
                        })
                }}
                <div class="mb-5">
                    <label
                        class="block mb-2 text-sm font-medium text-gray-900 dark:text-white"
                        for="first_name"
                    >
                        "First name"
                    </label>
                    <input
                        id="first_name"
                        type="text"
                        class="bg-gray-50 border border-gray-300 text-gray-900 text-sm rounded-lg focus:ring-emerald-500 focus:border-emerald-500 block w-full p-2.5 dark:bg-gray-700 dark:border-gray-600 dark:text-white"
                        prop:value=first_name
                        on:input=move |event| set_first_name.set(event_target_value(&event))
                    />
                </div>
                <div class="mb-5">
                    <label
                        class="block mb-2 text-sm font-medium text-gray-900 dark:text-white"
                        for="last_name"
                    >
                        "Last name"
                    </label>
                    <input
                        id="last_name"
                        type="text"
                        class="bg-gray-50 border border-gray-300 text-gray-900 text-sm rounded-lg focus:ring-emerald-500 focus:border-emerald-500 block w-full p-2.5 dark:bg-gray-700 dark:border-gray-600 dark:text-white"
                        prop:value=last_name
                        on:input=move |event| set_last_name.set(event_target_value(&event))
                    />
                </div>
                <div class="mb-5">
                    <label
                        class="block mb-2 text-sm font-medium text-gray-900 dark:text-white"
                        for="department"
                    >
                        "Department"
                    </label>
                    <input
                        id="department"
                        type="text"
                        class="bg-gray-50 border border-gray-300 text-gray-900 text-sm rounded-lg focus:ring-emerald-500 focus:border-emerald-500 block w-full p-2.5 dark:bg-gray-700 dark:border-gray-600 dark:text-white"
                        prop:value=department
                        on:input=move |event| set_department.set(event_target_value(&event))
                    />
                </div>
                <Button button_type="submit" disabled=update_action.pending()>
                    "Save changes"
                </Button>
                {move || {
                    update_action
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

//! Login route.
//!
//! Owns credential entry and everything layered on top of it: one-shot
//! notices driven by query params, the temporary-lockout countdown, the
//! permanent-lockout callout, and the hand-off to the OTP step when the
//! backend asks for a second factor. A pending two-factor record found on
//! mount re-enters the OTP step directly.

mod otp;

use crate::app_lib::clock;
use crate::components::{Alert, AlertKind, AppShell, Button, Spinner, use_toasts};
use crate::features::auth::state::{LoginOutcome, use_auth};
use crate::features::auth::types::LoginFailure;
use crate::features::auth::{lockout, session, two_factor};
use crate::routes::paths;
use gloo_timers::callback::Interval;
use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos_router::components::A;
use leptos_router::hooks::{use_navigate, use_query_map};
use otp::TwoFactorStep;

#[derive(Clone)]
enum LoginStep {
    Credentials,
    TwoFactor(two_factor::TwoFactorPending),
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let auth = use_auth();
    let navigate = use_navigate();
    let toasts = use_toasts();

    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (error, set_error) = signal::<Option<LoginFailure>>(None);
    let (step, set_step) = signal(match two_factor::load_pending() {
        Some(pending) => LoginStep::TwoFactor(pending),
        None => LoginStep::Credentials,
    });
    let (permanent_lock, set_permanent_lock) = signal(lockout::permanent());
    let (lockout_remaining, set_lockout_remaining) = signal(remaining_now());

    show_one_shot_notices(toasts);

    // Per-second countdown while a temporary lockout exists. Expiry clears
    // the cached lockout error so the submit control re-enables.
    Effect::new(move |_| {
        let interval = Interval::new(1_000, move || {
            let remaining = remaining_now();
            if remaining.is_none() {
                set_error.update(|current| {
                    if current
                        .as_ref()
                        .is_some_and(|failure| failure.lockout_until_ms.is_some())
                    {
                        *current = None;
                    }
                });
            }
            set_lockout_remaining.set(remaining);
        });
        let interval = StoredValue::new_local(Some(interval));
        on_cleanup(move || {
            let _ = interval.try_update_value(|slot| slot.take());
        });
    });

    let login_action = Action::new_local(move |input: &(String, String)| {
        let (email_value, password_value) = input.clone();
        async move { auth.login(&email_value, &password_value).await }
    });

    let navigate_for_login = navigate.clone();
    Effect::new(move |_| {
        if let Some(result) = login_action.value().get() {
            match result {
                Ok(LoginOutcome::Complete(redirect)) => {
                    // Same predicate, evaluated against the installed user.
                    let target = auth
                        .user
                        .get_untracked()
                        .map(|user| session::post_login_redirect(&user))
                        .unwrap_or(redirect);
                    navigate_for_login(target.path(), Default::default());
                }
                Ok(LoginOutcome::RequiresTwoFactor(pending)) => {
                    set_error.set(None);
                    set_step.set(LoginStep::TwoFactor(pending));
                }
                Err(failure) => {
                    if failure.permanently_locked {
                        set_permanent_lock.set(lockout::permanent());
                    }
                    if failure.lockout_until_ms.is_some() {
                        set_lockout_remaining.set(remaining_now());
                    }
                    toasts.error(failure.message.clone());
                    set_error.set(Some(failure));
                }
            }
        }
    });

    let is_locked = move || lockout_remaining.get().is_some();

    let on_submit = move |event: SubmitEvent| {
        event.prevent_default();
        set_error.set(None);

        if lockout_remaining.get_untracked().is_some() {
            return;
        }

        let email_value = email.get_untracked().trim().to_string();
        let password_value = password.get_untracked();
        if email_value.is_empty() || password_value.trim().is_empty() {
            set_error.set(Some(validation_failure(
                "Email and password are required.",
            )));
            return;
        }

        login_action.dispatch((email_value, password_value));
    };

    let on_cancel_two_factor = Callback::new(move |_: ()| {
        set_step.set(LoginStep::Credentials);
        set_email.set(String::new());
        set_password.set(String::new());
        set_error.set(None);
    });

    view! {
        <AppShell>
            {move || match step.get() {
                LoginStep::TwoFactor(pending) => view! {
                    <TwoFactorStep pending=pending on_cancel=on_cancel_two_factor />
                }
                .into_any(),
                LoginStep::Credentials => view! {
                    <form class="max-w-sm mx-auto" on:submit=on_submit>
                        <h1 class="mb-6 text-2xl font-semibold text-gray-900 dark:text-white">
                            "Sign in"
                        </h1>
                        <div class="mb-5">
                            <label
                                class="block mb-2 text-sm font-medium text-gray-900 dark:text-white"
                                for="email"
                            >
                                "Your email"
                            </label>
                            <input
                                id="email"
                                type="email"
                                class="bg-gray-50 border border-gray-300 text-gray-900 text-sm rounded-lg focus:ring-emerald-500 focus:border-emerald-500 block w-full p-2.5 dark:bg-gray-700 dark:border-gray-600 dark:placeholder-gray-400 dark:text-white"
                                autocomplete="email"
                                placeholder="name@sacco.coop"
                                required
                                prop:value=email
                                on:input=move |event| set_email.set(event_target_value(&event))
                            />
                        </div>
                        <div class="mb-5">
                            <label
                                class="block mb-2 text-sm font-medium text-gray-900 dark:text-white"
                                for="password"
                            >
                                "Your password"
                            </label>
                            <input
                                id="password"
                                type="password"
                                class="bg-gray-50 border border-gray-300 text-gray-900 text-sm rounded-lg focus:ring-emerald-500 focus:border-emerald-500 block w-full p-2.5 dark:bg-gray-700 dark:border-gray-600 dark:placeholder-gray-400 dark:text-white"
                                autocomplete="current-password"
                                required
                                prop:value=password
                                on:input=move |event| set_password.set(event_target_value(&event))
                            />
                        </div>
                        <Button
                            button_type="submit"
                            disabled=Signal::derive(move || {
                                login_action.pending().get() || is_locked()
                            })
                        >
                            "Sign In"
                        </Button>
                        {move || {
                            login_action
                                .pending()
                                .get()
                                .then_some(view! { <div class="mt-4"><Spinner /></div> })
                        }}
                        {move || {
                            lockout_remaining
                                .get()
                                .map(|seconds| {
                                    view! {
                                        <div class="mt-4">
                                            <Alert
                                                kind=AlertKind::Warning
                                                message=format!(
                                                    "Too many failed attempts. Try again in {}.",
                                                    clock::format_mm_ss(seconds),
                                                )
                                            />
                                        </div>
                                    }
                                })
                        }}
                        {move || {
                            permanent_lock
                                .get()
                                .map(|lock| {
                                    view! {
                                        <div class="mt-4 space-y-2">
                                            <Alert kind=AlertKind::Error message=lock.message />
                                            <A
                                                href={paths::UNLOCK}
                                                {..}
                                                class="inline-block text-sm font-medium text-emerald-700 underline underline-offset-4 hover:text-emerald-900 dark:text-emerald-300"
                                            >
                                                "Unlock Account"
                                            </A>
                                        </div>
                                    }
                                })
                        }}
                        {move || {
                            error
                                .get()
                                .map(|failure| {
                                    view! {
                                        <div class="mt-4 space-y-2">
                                            <Alert kind=AlertKind::Error message=failure.message.clone() />
                                            {failure
                                                .attempts_remaining
                                                .map(|attempts| {
                                                    view! {
                                                        <Alert
                                                            kind=AlertKind::Warning
                                                            message=format!(
                                                                "{attempts} attempts remaining before permanent lockout.",
                                                            )
                                                        />
                                                    }
                                                })}
                                        </div>
                                    }
                                })
                        }}
                    </form>
                }
                .into_any(),
            }}
        </AppShell>
    }
}

/// Seconds left on the active temporary lockout, if any. Reading also
/// purges an expired record.
fn remaining_now() -> Option<u64> {
    let now = clock::now_ms();
    lockout::temporary(now).map(|record| lockout::remaining_seconds(&record, now))
}

fn validation_failure(message: &str) -> LoginFailure {
    LoginFailure {
        message: message.to_string(),
        lockout_until_ms: None,
        attempts_remaining: None,
        permanently_locked: false,
        network: false,
    }
}

/// Fires the one-shot toasts the navigation contract encodes in query
/// params, then strips them from the URL.
fn show_one_shot_notices(toasts: crate::components::ui::ToastContext) {
    let query = use_query_map().get_untracked();
    let mut notified = false;

    if query.get("message").as_deref() == Some("session-expired") {
        toasts.info("Your session has expired. Please sign in again.");
        notified = true;
    }
    if query.get("password_changed").as_deref() == Some("true") {
        toasts.success("Password updated. Sign in with your new password.");
        notified = true;
    }
    if query.get("logout").as_deref() == Some("true") {
        toasts.info("You have been signed out.");
        notified = true;
    }

    if notified {
        clear_login_query();
    }
}

#[cfg(target_arch = "wasm32")]
fn clear_login_query() {
    use wasm_bindgen::JsValue;

    let Some(window) = web_sys::window() else {
        return;
    };
    let history = match window.history() {
        Ok(history) => history,
        Err(_) => return,
    };
    let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(super::paths::LOGIN));
}

#[cfg(not(target_arch = "wasm32"))]
fn clear_login_query() {}

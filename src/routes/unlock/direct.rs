//! Direct account unlock (`/unlock`, no link token).
//!
//! An administrator issues a one-time code out-of-band, so the first step
//! takes the email address and the code in a single submission. The
//! verification response carries the issuing administrator's id, which the
//! reset call echoes back alongside the account email.

use crate::components::{Alert, AlertKind, AppShell, Button, Spinner, use_toasts};
use crate::features::auth::types::{DirectOtpRequest, DirectOtpResponse, DirectResetRequest};
use crate::features::auth::{client, lockout, two_factor};
use crate::routes::paths;
use gloo_timers::callback::Timeout;
use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

#[derive(Clone, Copy, PartialEq, Eq)]
enum DirectStep {
    EmailOtp,
    Password,
    Done,
}

#[component]
pub fn UnlockDirectPage() -> impl IntoView {
    let navigate = use_navigate();
    let toasts = use_toasts();

    let (step, set_step) = signal(DirectStep::EmailOtp);
    let (identity, set_identity) = signal::<Option<DirectOtpResponse>>(None);
    let (email, set_email) = signal(String::new());
    let (code, set_code) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (confirm, set_confirm) = signal(String::new());
    let (error, set_error) = signal::<Option<String>>(None);

    let otp_action = Action::new_local(move |input: &(String, String)| {
        let (email_value, code_value) = input.clone();
        let request = DirectOtpRequest {
            email: email_value,
            code: code_value,
        };
        async move { client::unlock_verify_otp_direct(&request).await }
    });

    Effect::new(move |_| {
        if let Some(result) = otp_action.value().get() {
            match result {
                Ok(response) => {
                    set_identity.set(Some(response));
                    set_error.set(None);
                    set_step.set(DirectStep::Password);
                }
                Err(err) => {
                    toasts.error(err.to_string());
                    set_error.set(Some(err.to_string()));
                }
            }
        }
    });

    let reset_action = Action::new_local(move |input: &DirectResetRequest| {
        let request = input.clone();
        async move { client::unlock_reset_password_direct(&request).await }
    });

    Effect::new(move |_| {
        if let Some(result) = reset_action.value().get() {
            match result {
                Ok(ack) if ack.success => {
                    lockout::clear_permanent();
                    lockout::clear_temporary();
                    toasts.success("Account unlocked. Sign in with your new password.");
                    set_step.set(DirectStep::Done);
                }
                Ok(_) => set_error.set(Some("Password reset was not accepted.".to_string())),
                Err(err) => {
                    toasts.error(err.to_string());
                    set_error.set(Some(err.to_string()));
                }
            }
        }
    });

    let navigate_for_done = navigate.clone();
    Effect::new(move |_| {
        if step.get() != DirectStep::Done {
            return;
        }
        let navigate_for_timer = navigate_for_done.clone();
        let timeout = Timeout::new(super::SUCCESS_REDIRECT_MS, move || {
            navigate_for_timer(paths::LOGIN_AFTER_PASSWORD_CHANGE, Default::default());
        });
        let timeout = StoredValue::new_local(Some(timeout));
        on_cleanup(move || {
            let _ = timeout.try_update_value(|slot| slot.take());
        });
    });

    let on_submit_otp = move |_| {
        let email_value = email.get_untracked().trim().to_string();
        let code_value = code.get_untracked().trim().to_string();
        if email_value.is_empty() || !email_value.contains('@') {
            set_error.set(Some("Enter the email address of the locked account.".to_string()));
            return;
        }
        if !two_factor::is_valid_otp(&code_value) {
            set_error.set(Some("Enter the 6-digit code you were given.".to_string()));
            return;
        }
        set_error.set(None);
        otp_action.dispatch((email_value, code_value));
    };

    let on_submit_password = move |_| {
        let password_value = password.get_untracked();
        let confirm_value = confirm.get_untracked();
        if let Some(issue) = super::password_issue(&password_value, &confirm_value) {
            set_error.set(Some(issue.to_string()));
            return;
        }
        let Some(verified) = identity.get_untracked() else {
            set_error.set(Some("Verify your code before setting a password.".to_string()));
            return;
        };
        set_error.set(None);
        reset_action.dispatch(DirectResetRequest {
            email: verified.email,
            admin_id: verified.admin_id,
            password: password_value,
        });
    };

    let navigate_for_continue = navigate.clone();

    view! {
        <AppShell>
            <div class="max-w-sm mx-auto">
                <h1 class="text-2xl font-semibold text-gray-900 dark:text-white">
                    "Unlock your account"
                </h1>
                {move || match step.get() {
                    DirectStep::EmailOtp => view! {
                        <div class="mt-6">
                            <p class="text-sm text-gray-600 dark:text-gray-300">
                                "Enter your email and the one-time code an administrator gave you."
                            </p>
                            <div class="mt-4">
                                <label
                                    class="block mb-2 text-sm font-medium text-gray-900 dark:text-white"
                                    for="unlock_email"
                                >
                                    "Email"
                                </label>
                                <input
                                    id="unlock_email"
                                    type="email"
                                    class="bg-gray-50 border border-gray-300 text-gray-900 text-sm rounded-lg focus:ring-emerald-500 focus:border-emerald-500 block w-full p-2.5 dark:bg-gray-700 dark:border-gray-600 dark:text-white"
                                    autocomplete="email"
                                    placeholder="name@sacco.coop"
                                    prop:value=email
                                    on:input=move |event| set_email.set(event_target_value(&event))
                                />
                            </div>
                            <div class="mt-4">
                                <label
                                    class="block mb-2 text-sm font-medium text-gray-900 dark:text-white"
                                    for="unlock_code"
                                >
                                    "One-time code"
                                </label>
                                <input
                                    id="unlock_code"
                                    type="text"
                                    inputmode="numeric"
                                    maxlength="6"
                                    class="bg-gray-50 border border-gray-300 text-gray-900 text-sm rounded-lg tracking-[0.4em] text-center focus:ring-emerald-500 focus:border-emerald-500 block w-full p-2.5 dark:bg-gray-700 dark:border-gray-600 dark:text-white"
                                    autocomplete="one-time-code"
                                    prop:value=code
                                    on:input=move |event| set_code.set(event_target_value(&event))
                                />
                            </div>
                            <div class="mt-4">
                                <Button disabled=otp_action.pending() on:click=on_submit_otp>
                                    "Verify"
                                </Button>
                            </div>
                        </div>
                    }
                    .into_any(),
                    DirectStep::Password => view! {
                        <div class="mt-6">
                            {move || {
                                identity
                                    .get()
                                    .map(|verified| {
                                        view! {
                                            <p class="text-sm text-gray-600 dark:text-gray-300">
                                                {format!(
                                                    "Code verified for {} {}. Choose a new password.",
                                                    verified.first_name, verified.last_name,
                                                )}
                                            </p>
                                        }
                                    })
                            }}
                            <div class="mt-4">
                                <label
                                    class="block mb-2 text-sm font-medium text-gray-900 dark:text-white"
                                    for="direct_new_password"
                                >
                                    "New password"
                                </label>
                                <input
                                    id="direct_new_password"
                                    type="password"
                                    class="bg-gray-50 border border-gray-300 text-gray-900 text-sm rounded-lg focus:ring-emerald-500 focus:border-emerald-500 block w-full p-2.5 dark:bg-gray-700 dark:border-gray-600 dark:text-white"
                                    autocomplete="new-password"
                                    prop:value=password
                                    on:input=move |event| set_password.set(event_target_value(&event))
                                />
                            </div>
                            <div class="mt-4">
                                <label
                                    class="block mb-2 text-sm font-medium text-gray-900 dark:text-white"
                                    for="direct_confirm_password"
                                >
                                    "Confirm password"
                                </label>
                                <input
                                    id="direct_confirm_password"
                                    type="password"
                                    class="bg-gray-50 border border-gray-300 text-gray-900 text-sm rounded-lg focus:ring-emerald-500 focus:border-emerald-500 block w-full p-2.5 dark:bg-gray-700 dark:border-gray-600 dark:text-white"
                                    autocomplete="new-password"
                                    prop:value=confirm
                                    on:input=move |event| set_confirm.set(event_target_value(&event))
                                />
                            </div>
                            <div class="mt-4">
                                <Button disabled=reset_action.pending() on:click=on_submit_password>
                                    "Set new password"
                                </Button>
                            </div>
                        </div>
                    }
                    .into_any(),
                    DirectStep::Done => {
                        let navigate_now = navigate_for_continue.clone();
                        view! {
                            <div class="mt-6 space-y-4">
                                <Alert
                                    kind=AlertKind::Success
                                    message="Account unlocked. Redirecting you to sign in...".to_string()
                                />
                                <Button on:click=move |_| {
                                    navigate_now(
                                        paths::LOGIN_AFTER_PASSWORD_CHANGE,
                                        Default::default(),
                                    );
                                }>
                                    "Continue to Login"
                                </Button>
                            </div>
                        }
                        .into_any()
                    }
                }}
                {move || {
                    (otp_action.pending().get() || reset_action.pending().get())
                        .then_some(view! { <div class="mt-4"><Spinner /></div> })
                }}
                {move || {
                    error
                        .get()
                        .map(|message| view! { <div class="mt-4"><Alert kind=AlertKind::Error message=message /></div> })
                }}
            </div>
        </AppShell>
    }
}

//! Token-based account unlock (`/unlock/{token}`).
//!
//! 1. Verify the link token on mount; a failure here is terminal because
//!    the token is single-shot and time-limited.
//! 2. Confirm the emailed OTP; a fresh code can always be requested.
//! 3. Set a new password, then redirect back to login.

use crate::app_lib::AppError;
use crate::components::{Alert, AlertKind, AppShell, Button, Spinner, use_toasts};
use crate::features::auth::types::{UnlockAccountInfo, UnlockOtpRequest, UnlockResetRequest};
use crate::features::auth::{client, lockout, two_factor};
use crate::routes::paths;
use gloo_timers::callback::Timeout;
use leptos::prelude::*;
use leptos_router::components::A;
use leptos_router::hooks::{use_navigate, use_params_map};

#[derive(Clone, PartialEq)]
enum TokenStep {
    Verifying,
    Otp,
    Password,
    Done,
    Failed(String),
}

#[component]
pub fn UnlockTokenPage() -> impl IntoView {
    let navigate = use_navigate();
    let toasts = use_toasts();
    let token = use_params_map()
        .get_untracked()
        .get("token")
        .unwrap_or_default();

    let (step, set_step) = signal(TokenStep::Verifying);
    let (account, set_account) = signal::<Option<UnlockAccountInfo>>(None);
    let (code, set_code) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (confirm, set_confirm) = signal(String::new());
    let (error, set_error) = signal::<Option<String>>(None);
    let (notice, set_notice) = signal::<Option<String>>(None);

    let verify_action = Action::new_local(move |token_value: &String| {
        let token_value = token_value.clone();
        async move { client::unlock_verify_token(&token_value).await }
    });

    // The token is single-shot; verify it exactly once on mount.
    let token_for_verify = token.clone();
    Effect::new(move |_| {
        if verify_action.value().get_untracked().is_none()
            && !verify_action.pending().get_untracked()
        {
            verify_action.dispatch(token_for_verify.clone());
        }
    });

    Effect::new(move |_| {
        if let Some(result) = verify_action.value().get() {
            match result {
                Ok(info) => {
                    set_account.set(Some(info));
                    set_step.set(TokenStep::Otp);
                }
                Err(err) => set_step.set(TokenStep::Failed(terminal_message(&err))),
            }
        }
    });

    let token_for_otp = token.clone();
    let otp_action = Action::new_local(move |code_value: &String| {
        let token_value = token_for_otp.clone();
        let request = UnlockOtpRequest {
            code: code_value.clone(),
        };
        async move { client::unlock_verify_otp(&token_value, &request).await }
    });

    Effect::new(move |_| {
        if let Some(result) = otp_action.value().get() {
            match result {
                Ok(ack) if ack.success => {
                    set_error.set(None);
                    set_notice.set(None);
                    set_step.set(TokenStep::Password);
                }
                Ok(_) => {
                    set_error.set(Some("That code didn't match. Check it and try again.".to_string()));
                }
                Err(err) => {
                    toasts.error(err.to_string());
                    set_error.set(Some(err.to_string()));
                }
            }
        }
    });

    let token_for_resend = token.clone();
    let resend_action = Action::new_local(move |_: &()| {
        let token_value = token_for_resend.clone();
        async move { client::unlock_request_otp(&token_value).await }
    });

    Effect::new(move |_| {
        if let Some(result) = resend_action.value().get() {
            match result {
                Ok(()) => set_notice.set(Some("A new code is on the way.".to_string())),
                Err(err) => {
                    toasts.error(err.to_string());
                    set_error.set(Some(err.to_string()));
                }
            }
        }
    });

    let token_for_reset = token.clone();
    let reset_action = Action::new_local(move |password_value: &String| {
        let token_value = token_for_reset.clone();
        let request = UnlockResetRequest {
            password: password_value.clone(),
        };
        async move { client::unlock_reset_password(&token_value, &request).await }
    });

    Effect::new(move |_| {
        if let Some(result) = reset_action.value().get() {
            match result {
                Ok(ack) if ack.success => {
                    // The account is usable again; drop both lockout records.
                    lockout::clear_permanent();
                    lockout::clear_temporary();
                    toasts.success("Account unlocked. Sign in with your new password.");
                    set_step.set(TokenStep::Done);
                }
                Ok(_) => set_error.set(Some("Password reset was not accepted.".to_string())),
                Err(err) => {
                    toasts.error(err.to_string());
                    set_error.set(Some(err.to_string()));
                }
            }
        }
    });

    // Automatic return to login shortly after success; the button below
    // covers anyone who does not want to wait.
    let navigate_for_done = navigate.clone();
    Effect::new(move |_| {
        if step.get() != TokenStep::Done {
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

    let on_submit_code = move |_| {
        set_notice.set(None);
        let code_value = code.get_untracked().trim().to_string();
        if !two_factor::is_valid_otp(&code_value) {
            set_error.set(Some("Enter the 6-digit code from your email.".to_string()));
            return;
        }
        set_error.set(None);
        otp_action.dispatch(code_value);
    };

    let on_submit_password = move |_| {
        let password_value = password.get_untracked();
        let confirm_value = confirm.get_untracked();
        if let Some(issue) = super::password_issue(&password_value, &confirm_value) {
            set_error.set(Some(issue.to_string()));
            return;
        }
        set_error.set(None);
        reset_action.dispatch(password_value);
    };

    let navigate_for_continue = navigate.clone();

    view! {
        <AppShell>
            <div class="max-w-sm mx-auto">
                <h1 class="text-2xl font-semibold text-gray-900 dark:text-white">
                    "Unlock your account"
                </h1>
                {move || match step.get() {
                    TokenStep::Verifying => view! {
                        <div class="mt-6">
                            <p class="text-sm text-gray-600 dark:text-gray-300">
                                "Checking your unlock link..."
                            </p>
                            <div class="mt-4"><Spinner /></div>
                        </div>
                    }
                    .into_any(),
                    TokenStep::Failed(message) => view! {
                        <div class="mt-6 space-y-4">
                            <Alert kind=AlertKind::Error message=message />
                            <A
                                href={paths::LOGIN}
                                {..}
                                class="inline-block text-sm font-medium text-emerald-700 underline underline-offset-4 hover:text-emerald-900 dark:text-emerald-300"
                            >
                                "Return to Login"
                            </A>
                        </div>
                    }
                    .into_any(),
                    TokenStep::Otp => view! {
                        <div class="mt-6">
                            {move || {
                                account
                                    .get()
                                    .map(|info| {
                                        view! {
                                            <p class="text-sm text-gray-600 dark:text-gray-300">
                                                {format!(
                                                    "Hello {} {}. We sent a verification code to {}.",
                                                    info.first_name, info.last_name, info.email,
                                                )}
                                            </p>
                                        }
                                    })
                            }}
                            <div class="mt-4">
                                <label
                                    class="block mb-2 text-sm font-medium text-gray-900 dark:text-white"
                                    for="unlock_otp"
                                >
                                    "Verification code"
                                </label>
                                <input
                                    id="unlock_otp"
                                    type="text"
                                    inputmode="numeric"
                                    maxlength="6"
                                    class="bg-gray-50 border border-gray-300 text-gray-900 text-sm rounded-lg tracking-[0.4em] text-center focus:ring-emerald-500 focus:border-emerald-500 block w-full p-2.5 dark:bg-gray-700 dark:border-gray-600 dark:text-white"
                                    autocomplete="one-time-code"
                                    prop:value=code
                                    on:input=move |event| set_code.set(event_target_value(&event))
                                />
                            </div>
                            <div class="mt-4 flex items-center gap-4">
                                <Button disabled=otp_action.pending() on:click=on_submit_code>
                                    "Verify"
                                </Button>
                                <button
                                    type="button"
                                    class="text-sm font-medium text-gray-600 underline decoration-gray-300 underline-offset-4 hover:text-gray-900 dark:text-gray-300"
                                    disabled=move || resend_action.pending().get()
                                    on:click=move |_| { resend_action.dispatch(()); }
                                >
                                    "Request new code"
                                </button>
                            </div>
                        </div>
                    }
                    .into_any(),
                    TokenStep::Password => view! {
                        <div class="mt-6">
                            <p class="text-sm text-gray-600 dark:text-gray-300">
                                "Choose a new password to finish unlocking your account."
                            </p>
                            <div class="mt-4">
                                <label
                                    class="block mb-2 text-sm font-medium text-gray-900 dark:text-white"
                                    for="new_password"
                                >
                                    "New password"
                                </label>
                                <input
                                    id="new_password"
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
                                    for="confirm_password"
                                >
                                    "Confirm password"
                                </label>
                                <input
                                    id="confirm_password"
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
                    TokenStep::Done => {
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
                    notice
                        .get()
                        .map(|message| view! { <div class="mt-4"><Alert kind=AlertKind::Info message=message /></div> })
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

/// Terminal copy for a dead unlock link.
fn terminal_message(error: &AppError) -> String {
    match error {
        AppError::Timeout(_) | AppError::Network(_) => {
            "Unable to reach the server. Check your connection and reopen the link.".to_string()
        }
        _ => "Token verification failed. The link may have expired or already been used. \
              Request a new unlock link and try again."
            .to_string(),
    }
}

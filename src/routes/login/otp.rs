//! OTP entry step of the login flow. The code was already sent as a side
//! effect of the login call, so this step only collects, verifies, and
//! optionally resends. Verification success hands a login-shaped payload
//! back to the session machine.

use crate::app_lib::{AppError, clock, config::AppConfig};
use crate::components::{Alert, AlertKind, Button, Spinner, use_toasts};
use crate::features::auth::state::use_auth;
use crate::features::auth::two_factor::{self, TwoFactorPending};
use crate::features::auth::types::{RequestOtpRequest, VerifyOtpRequest};
use crate::features::auth::{client, session};
use gloo_timers::callback::Interval;
use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

#[component]
pub fn TwoFactorStep(
    pending: TwoFactorPending,
    #[prop(into)] on_cancel: Callback<()>,
) -> impl IntoView {
    let auth = use_auth();
    let navigate = use_navigate();
    let toasts = use_toasts();
    let config = AppConfig::load();
    let cooldown_secs = config.otp_resend_cooldown_secs;
    let resend_expiry_secs = config.otp_default_expiry_secs;

    let (code, set_code) = signal(String::new());
    let (error, set_error) = signal::<Option<String>>(None);
    let (notice, set_notice) = signal::<Option<String>>(None);
    let (countdown, set_countdown) = signal(two_factor::LOGIN_CODE_EXPIRY_SECS);
    let (elapsed, set_elapsed) = signal(0u64);

    // One ticker drives both the expiry display and the resend cooldown.
    // Hitting zero only freezes the display; the backend decides expiry.
    Effect::new(move |_| {
        let interval = Interval::new(1_000, move || {
            set_countdown.update(|value| *value = value.saturating_sub(1));
            set_elapsed.update(|value| *value += 1);
        });
        let interval = StoredValue::new_local(Some(interval));
        on_cleanup(move || {
            let _ = interval.try_update_value(|slot| slot.take());
        });
    });

    let user_id = pending.user_id.clone();
    let verify_action = Action::new_local(move |code_value: &String| {
        let request = VerifyOtpRequest {
            user_id: user_id.clone(),
            code: code_value.clone(),
        };
        async move { client::verify_otp(&request).await }
    });

    let navigate_for_verify = navigate.clone();
    Effect::new(move |_| {
        if let Some(result) = verify_action.value().get() {
            match result {
                Ok(response) => match auth.complete_two_factor(response) {
                    Ok(redirect) => {
                        let target = auth
                            .user
                            .get_untracked()
                            .map(|user| session::post_login_redirect(&user))
                            .unwrap_or(redirect);
                        navigate_for_verify(target.path(), Default::default());
                    }
                    Err(failure) => {
                        toasts.error(failure.message.clone());
                        set_error.set(Some(failure.message));
                    }
                },
                Err(err) => {
                    // The entered code stays put for correction.
                    toasts.error(verify_message(&err));
                    set_error.set(Some(verify_message(&err)));
                }
            }
        }
    });

    let user_id_for_resend = pending.user_id.clone();
    let resend_action = Action::new_local(move |_: &()| {
        let request = RequestOtpRequest {
            user_id: user_id_for_resend.clone(),
        };
        async move { client::request_otp(&request).await }
    });

    Effect::new(move |_| {
        if let Some(result) = resend_action.value().get() {
            match result {
                Ok(response) => {
                    set_countdown.set(response.expires_in.unwrap_or(resend_expiry_secs));
                    set_elapsed.set(0);
                    set_error.set(None);
                    set_notice.set(Some("A new code is on the way.".to_string()));
                }
                Err(err) => {
                    toasts.error(err.to_string());
                    set_error.set(Some(err.to_string()));
                }
            }
        }
    });

    let on_verify = move |_| {
        set_notice.set(None);
        let code_value = code.get_untracked().trim().to_string();
        if !two_factor::is_valid_otp(&code_value) {
            set_error.set(Some("Enter the 6-digit code from your email.".to_string()));
            return;
        }
        set_error.set(None);
        verify_action.dispatch(code_value);
    };

    let resend_blocked = move || {
        resend_action.pending().get()
            || !two_factor::resend_allowed(elapsed.get(), cooldown_secs)
    };

    let on_cancel_click = move |_| {
        two_factor::clear_pending();
        on_cancel.run(());
    };

    let email_line = format!("We sent a verification code to {}.", pending.email);

    view! {
        <div class="max-w-sm mx-auto">
            <h1 class="text-2xl font-semibold text-gray-900 dark:text-white">
                "Two-factor check"
            </h1>
            <p class="mt-2 text-sm text-gray-600 dark:text-gray-300">{email_line}</p>
            <p class="mt-1 text-sm text-gray-500 dark:text-gray-400">
                {move || {
                    let seconds = countdown.get();
                    if seconds > 0 {
                        format!("Code expires in {}.", clock::format_mm_ss(seconds))
                    } else {
                        "The code may have expired. You can still try it or request a new one.".to_string()
                    }
                }}
            </p>
            <div class="mt-6">
                <label
                    class="block mb-2 text-sm font-medium text-gray-900 dark:text-white"
                    for="otp"
                >
                    "Verification code"
                </label>
                <input
                    id="otp"
                    type="text"
                    inputmode="numeric"
                    maxlength="6"
                    class="bg-gray-50 border border-gray-300 text-gray-900 text-sm rounded-lg tracking-[0.4em] text-center focus:ring-emerald-500 focus:border-emerald-500 block w-full p-2.5 dark:bg-gray-700 dark:border-gray-600 dark:text-white"
                    autocomplete="one-time-code"
                    prop:value=code
                    on:input=move |event| set_code.set(event_target_value(&event))
                    on:keydown=move |event| {
                        if event.key() == "Enter" {
                            on_verify(());
                        }
                    }
                />
            </div>
            <div class="mt-4 flex items-center gap-4">
                <Button
                    disabled=verify_action.pending()
                    on:click=move |_| on_verify(())
                >
                    "Verify"
                </Button>
                <button
                    type="button"
                    class="text-sm font-medium text-gray-600 underline decoration-gray-300 underline-offset-4 hover:text-gray-900 dark:text-gray-300"
                    disabled=resend_blocked
                    class:opacity-50=resend_blocked
                    on:click=move |_| {
                        set_notice.set(None);
                        resend_action.dispatch(());
                    }
                >
                    "Resend code"
                </button>
                <button
                    type="button"
                    class="text-sm font-medium text-gray-600 underline decoration-gray-300 underline-offset-4 hover:text-gray-900 dark:text-gray-300"
                    on:click=on_cancel_click
                >
                    "Cancel"
                </button>
            </div>
            {move || {
                verify_action
                    .pending()
                    .get()
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
    }
}

/// Keeps transport problems distinguishable from a rejected code.
fn verify_message(error: &AppError) -> String {
    match error {
        AppError::Timeout(_) | AppError::Network(_) => {
            "Unable to reach the server. Check your connection and try again.".to_string()
        }
        AppError::Http { status: 400 | 401 | 422, .. } => {
            "That code didn't match. Check it and try again.".to_string()
        }
        other => other.to_string(),
    }
}

//! Auth session state and context for the frontend. The provider hydrates
//! the session once on mount from durable storage and owns every session
//! transition: login, two-factor install, logout, idle timeout, and the
//! cross-tab logged-out signal. Routes read the context; only this module
//! writes it.

use crate::app_lib::{clock, config::AppConfig};
use crate::features::auth::{
    client, lockout,
    roles::{self, Role},
    session::{self, RedirectTarget},
    two_factor::{self, TwoFactorPending},
    types::{AuthUser, LoginFailure, LoginRequest, LoginResponse, LoginStatus, ProfileUpdate},
};
use leptos::{prelude::*, task::spawn_local};

/// Milliseconds between idle-timeout checks.
const IDLE_POLL_MS: u32 = 60_000;

/// Window events that count as user activity.
#[cfg(target_arch = "wasm32")]
const ACTIVITY_EVENTS: [&str; 4] = ["mousemove", "keydown", "click", "scroll"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionPhase {
    /// Hydration has not finished; guards render a neutral state.
    Loading,
    Anonymous,
    Authenticated,
    /// An intentional logout is in progress; suppresses the session-expired
    /// path and a second idle-timeout firing.
    LoggingOut,
}

/// Result of a credential submission the login form acts on.
#[derive(Clone)]
pub enum LoginOutcome {
    Complete(RedirectTarget),
    RequiresTwoFactor(TwoFactorPending),
}

#[derive(Clone, Copy)]
/// Auth session context shared through Leptos.
pub struct AuthContext {
    pub user: RwSignal<Option<AuthUser>>,
    pub phase: RwSignal<SessionPhase>,
    pub is_authenticated: Signal<bool>,
    pub is_loading: Signal<bool>,
    last_activity: RwSignal<f64>,
}

impl AuthContext {
    fn new() -> Self {
        let user = RwSignal::new(None);
        let phase = RwSignal::new(SessionPhase::Loading);
        let is_authenticated =
            Signal::derive(move || phase.get() == SessionPhase::Authenticated);
        let is_loading = Signal::derive(move || phase.get() == SessionPhase::Loading);
        Self {
            user,
            phase,
            is_authenticated,
            is_loading,
            last_activity: RwSignal::new(clock::now_ms()),
        }
    }

    /// Submits credentials and advances the machine. Failures come back
    /// normalized for the form to render; lockout responses are recorded
    /// before the failure is returned.
    pub async fn login(self, email: &str, password: &str) -> Result<LoginOutcome, LoginFailure> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };

        let response = match client::login(&request).await {
            Ok(Ok(response)) => response,
            Ok(Err(wire)) => {
                let failure = LoginFailure::from_wire(wire);
                if let Some(until_ms) = failure.lockout_until_ms {
                    lockout::record_temporary(email, until_ms, &failure.message);
                }
                if failure.permanently_locked {
                    lockout::record_permanent(email, &failure.message);
                }
                return Err(failure);
            }
            Err(transport) => return Err(LoginFailure::from_transport(&transport)),
        };

        match response.status {
            LoginStatus::RequiresTwoFactor => {
                let pending = two_factor::pending_from_login(&response, email)
                    .ok_or_else(|| protocol_failure("The server sent an incomplete two-factor challenge."))?;
                two_factor::persist_pending(&pending);
                Ok(LoginOutcome::RequiresTwoFactor(pending))
            }
            LoginStatus::Success => {
                let redirect = self.install_session(response)?;
                lockout::clear_temporary();
                Ok(LoginOutcome::Complete(redirect))
            }
        }
    }

    /// Installs the session a verified OTP produced. The payload is the same
    /// shape as a login success and flows through the same install path, so
    /// the redirect decision cannot diverge between the two.
    pub fn complete_two_factor(self, response: LoginResponse) -> Result<RedirectTarget, LoginFailure> {
        let redirect = self.install_session(response)?;
        lockout::clear_temporary();
        Ok(redirect)
    }

    fn install_session(self, response: LoginResponse) -> Result<RedirectTarget, LoginFailure> {
        let token = response
            .token
            .ok_or_else(|| protocol_failure("The server response was missing a session token."))?;
        let wire_user = response
            .user
            .ok_or_else(|| protocol_failure("The server response was missing the user record."))?;

        let user = session::build_user(wire_user);
        session::persist(&token, &user);
        two_factor::clear_pending();

        self.user.set(Some(user.clone()));
        self.last_activity.set(clock::now_ms());
        self.phase.set(SessionPhase::Authenticated);

        Ok(session::post_login_redirect(&user))
    }

    /// Ends the session. Safe to call repeatedly; the backend call is
    /// best-effort and local state is cleared regardless of its outcome.
    pub async fn logout(self) {
        if self.phase.get_untracked() == SessionPhase::LoggingOut {
            return;
        }
        self.phase.set(SessionPhase::LoggingOut);

        let _ = client::logout().await;

        self.user.set(None);
        session::clear();
        two_factor::clear_pending();
        self.phase.set(SessionPhase::Anonymous);

        redirect_after_logout();
    }

    /// True iff the current user's role subsumes any required role. No user
    /// or an empty required set yields false.
    pub fn has_permission(self, required: &[Role]) -> bool {
        self.user
            .get()
            .map(|user| roles::has_permission(user.role, required))
            .unwrap_or(false)
    }

    /// Applies a partial profile update. The in-memory record only changes
    /// after the backend accepts the update; failures leave it untouched.
    pub async fn update_profile(self, update: ProfileUpdate) -> Result<(), crate::app_lib::AppError> {
        client::update_profile(&update).await?;

        self.user.update(|current| {
            if let Some(user) = current {
                apply_profile_update(user, &update);
            }
        });
        if let (Some(token), Some(user)) = (session::stored_token(), self.user.get_untracked()) {
            session::persist(&token, &user);
        }
        Ok(())
    }

    pub fn touch_activity(self) {
        self.last_activity.set(clock::now_ms());
    }

    /// Drops the local session after a completed password rotation; the
    /// rotation invalidates the issued token server-side, so there is no
    /// backend logout to call.
    pub fn end_session_locally(self) {
        self.user.set(None);
        session::clear();
        two_factor::clear_pending();
        self.phase.set(SessionPhase::Anonymous);
    }

    /// Reacts to the token disappearing from durable storage in another tab
    /// or from a 401 interceptor: drop the in-memory session without a
    /// backend call and surface the expired-session notice.
    fn handle_external_logout(self) {
        if self.phase.get_untracked() != SessionPhase::Authenticated {
            return;
        }
        self.user.set(None);
        session::clear();
        two_factor::clear_pending();
        self.phase.set(SessionPhase::Anonymous);
        redirect_to_session_expired();
    }
}

fn protocol_failure(message: &str) -> LoginFailure {
    LoginFailure {
        message: message.to_string(),
        lockout_until_ms: None,
        attempts_remaining: None,
        permanently_locked: false,
        network: false,
    }
}

/// Merges a partial update into the user record.
pub fn apply_profile_update(user: &mut AuthUser, update: &ProfileUpdate) {
    if let Some(first_name) = &update.first_name {
        user.first_name = first_name.clone();
    }
    if let Some(last_name) = &update.last_name {
        user.last_name = last_name.clone();
    }
    if let Some(department) = &update.department {
        user.department = Some(department.clone());
    }
    if let Some(profile_picture) = &update.profile_picture {
        user.profile_picture = Some(profile_picture.clone());
    }
}

/// True when no observed activity falls within the idle threshold.
pub fn idle_expired(now_ms: f64, last_activity_ms: f64, timeout_ms: f64) -> bool {
    now_ms - last_activity_ms >= timeout_ms
}

/// Classifies a storage mutation as an external logout: either the token key
/// was removed or the whole storage area was cleared.
pub fn external_token_removal(key: Option<&str>, new_value: Option<&str>) -> bool {
    match key {
        None => true,
        Some(key) => key == session::TOKEN_KEY && new_value.is_none(),
    }
}

/// Provides auth context and hydrates the session once on mount.
#[component]
pub fn AuthProvider(children: Children) -> impl IntoView {
    let auth = AuthContext::new();
    provide_context(auth);

    if let Some((_token, user)) = session::load() {
        auth.user.set(Some(user));
        auth.phase.set(SessionPhase::Authenticated);
    } else {
        auth.phase.set(SessionPhase::Anonymous);
    }

    start_idle_poll(auth);
    attach_activity_listeners(auth);
    attach_storage_listener(auth);

    view! { {children()} }
}

/// Returns the current auth context or a fallback empty context.
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().unwrap_or_else(|| {
        let auth = AuthContext::new();
        auth.phase.set(SessionPhase::Anonymous);
        auth
    })
}

/// Checks idle expiry once a minute while a session exists. The interval is
/// dropped the moment the session goes away, and the `LoggingOut` phase
/// keeps a slow backend logout from being fired twice.
fn start_idle_poll(auth: AuthContext) {
    Effect::new(move |_| {
        if !auth.is_authenticated.get() {
            return;
        }
        let interval = gloo_timers::callback::Interval::new(IDLE_POLL_MS, move || {
            if auth.phase.get_untracked() != SessionPhase::Authenticated {
                return;
            }
            let config = AppConfig::load();
            if idle_expired(
                clock::now_ms(),
                auth.last_activity.get_untracked(),
                config.idle_timeout_ms(),
            ) {
                spawn_local(auth.logout());
            }
        });
        let interval = StoredValue::new_local(Some(interval));
        on_cleanup(move || {
            let _ = interval.try_update_value(|slot| slot.take());
        });
    });
}

#[cfg(target_arch = "wasm32")]
fn attach_activity_listeners(auth: AuthContext) {
    use wasm_bindgen::JsCast;
    use wasm_bindgen::closure::Closure;

    Effect::new(move |_| {
        if !auth.is_authenticated.get() {
            return;
        }
        let Some(window) = web_sys::window() else {
            return;
        };
        let callback = Closure::<dyn FnMut(web_sys::Event)>::new(move |_event: web_sys::Event| {
            auth.touch_activity();
        });
        for event in ACTIVITY_EVENTS {
            let _ = window
                .add_event_listener_with_callback(event, callback.as_ref().unchecked_ref());
        }
        on_cleanup(move || {
            if let Some(window) = web_sys::window() {
                for event in ACTIVITY_EVENTS {
                    let _ = window.remove_event_listener_with_callback(
                        event,
                        callback.as_ref().unchecked_ref(),
                    );
                }
            }
        });
    });
}

#[cfg(not(target_arch = "wasm32"))]
fn attach_activity_listeners(_auth: AuthContext) {}

#[cfg(target_arch = "wasm32")]
fn attach_storage_listener(auth: AuthContext) {
    use wasm_bindgen::JsCast;
    use wasm_bindgen::closure::Closure;

    let Some(window) = web_sys::window() else {
        return;
    };
    let callback = Closure::<dyn FnMut(web_sys::StorageEvent)>::new(
        move |event: web_sys::StorageEvent| {
            if external_token_removal(event.key().as_deref(), event.new_value().as_deref()) {
                auth.handle_external_logout();
            }
        },
    );
    let _ = window.add_event_listener_with_callback("storage", callback.as_ref().unchecked_ref());
    // App-lifetime listener; the closure is intentionally leaked.
    callback.forget();
}

#[cfg(not(target_arch = "wasm32"))]
fn attach_storage_listener(_auth: AuthContext) {}

#[cfg(target_arch = "wasm32")]
fn redirect_after_logout() {
    if let Some(window) = web_sys::window() {
        let href = format!("/login?logout=true&t={}", clock::now_ms() as u64);
        let _ = window.location().set_href(&href);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn redirect_after_logout() {}

#[cfg(target_arch = "wasm32")]
fn redirect_to_session_expired() {
    if let Some(window) = web_sys::window() {
        let path = window.location().pathname().unwrap_or_default();
        if !path.starts_with("/login") {
            let _ = window.location().set_href("/login?message=session-expired");
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn redirect_to_session_expired() {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_expiry_is_threshold_inclusive() {
        let twenty_minutes = 1_200_000.0;
        assert!(!idle_expired(1_199_999.0, 0.0, twenty_minutes));
        assert!(idle_expired(1_200_000.0, 0.0, twenty_minutes));
        assert!(idle_expired(5_000_000.0, 0.0, twenty_minutes));
    }

    #[test]
    fn only_token_removal_counts_as_external_logout() {
        assert!(external_token_removal(None, None));
        assert!(external_token_removal(Some(session::TOKEN_KEY), None));
        assert!(!external_token_removal(Some(session::TOKEN_KEY), Some("fresh")));
        assert!(!external_token_removal(Some("sacco_user"), None));
    }

    #[test]
    fn profile_update_merges_only_present_fields() {
        let mut user = AuthUser {
            id: "u-1".to_string(),
            first_name: "Grace".to_string(),
            last_name: "Mwangi".to_string(),
            email: "grace@sacco.coop".to_string(),
            role: Role::Clerk,
            department: Some("Savings".to_string()),
            status: None,
            password_change_required: false,
            last_password_changed_at: None,
            password_expires_at: None,
            profile_picture: None,
        };
        let update = ProfileUpdate {
            first_name: Some("Gracie".to_string()),
            profile_picture: Some("avatars/u-1.png".to_string()),
            ..ProfileUpdate::default()
        };

        apply_profile_update(&mut user, &update);

        assert_eq!(user.first_name, "Gracie");
        assert_eq!(user.last_name, "Mwangi");
        assert_eq!(user.department.as_deref(), Some("Savings"));
        assert_eq!(user.profile_picture.as_deref(), Some("avatars/u-1.png"));
    }
}

//! Session record logic: coercing the wire user into the domain record,
//! the post-login redirect decision, and token/user persistence. Both the
//! credential and OTP-verification success paths install sessions through
//! this module so the redirect predicate cannot drift between them.

use crate::app_lib::storage::{self, Scope};
use crate::features::auth::roles::Role;
use crate::features::auth::types::{AuthUser, WireUser};

/// Durable key holding the opaque bearer token. Watched by the cross-tab
/// storage listener; removal anywhere logs this tab out.
pub const TOKEN_KEY: &str = "sacco_token";
/// Durable key holding the serialized [`AuthUser`].
pub const USER_KEY: &str = "sacco_user";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RedirectTarget {
    Dashboard,
    ChangePassword,
}

impl RedirectTarget {
    pub fn path(self) -> &'static str {
        match self {
            RedirectTarget::Dashboard => "/dashboard",
            RedirectTarget::ChangePassword => "/change-password?reason=force",
        }
    }
}

/// Builds the domain user from the wire payload. The role collapses to the
/// closed enum, and a missing password date forces a rotation: without both
/// dates the expiry policy cannot be evaluated, so the safe reading is
/// "change it now".
pub fn build_user(wire: WireUser) -> AuthUser {
    let dates_missing =
        wire.last_password_changed_at.is_none() || wire.password_expires_at.is_none();

    AuthUser {
        id: wire.id,
        first_name: wire.first_name,
        last_name: wire.last_name,
        email: wire.email,
        role: Role::parse(&wire.role),
        department: wire.department,
        status: wire.status,
        password_change_required: wire.password_change_required.unwrap_or(true) || dates_missing,
        last_password_changed_at: wire.last_password_changed_at,
        password_expires_at: wire.password_expires_at,
        profile_picture: wire.profile_picture,
    }
}

/// The one post-login redirect predicate, shared by the credential and 2FA
/// success paths.
pub fn needs_password_change(user: &AuthUser) -> bool {
    user.password_change_required
        || user.last_password_changed_at.is_none()
        || user.password_expires_at.is_none()
}

pub fn post_login_redirect(user: &AuthUser) -> RedirectTarget {
    if needs_password_change(user) {
        RedirectTarget::ChangePassword
    } else {
        RedirectTarget::Dashboard
    }
}

pub fn persist(token: &str, user: &AuthUser) {
    storage::set_string(Scope::Durable, TOKEN_KEY, token);
    storage::set_json(Scope::Durable, USER_KEY, user);
}

pub fn stored_token() -> Option<String> {
    storage::get_string(Scope::Durable, TOKEN_KEY)
}

/// Restores a persisted session. The user is only ever valid alongside its
/// token; a half-present pair reads as no session.
pub fn load() -> Option<(String, AuthUser)> {
    let token = stored_token()?;
    let user: AuthUser = storage::get_json(Scope::Durable, USER_KEY)?;
    Some((token, user))
}

pub fn clear() {
    storage::remove(Scope::Durable, TOKEN_KEY);
    storage::remove(Scope::Durable, USER_KEY);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wire_user() -> WireUser {
        WireUser {
            id: "u-1".to_string(),
            first_name: "Grace".to_string(),
            last_name: "Mwangi".to_string(),
            email: "grace@sacco.coop".to_string(),
            role: "manager".to_string(),
            department: Some("Credit".to_string()),
            status: Some("active".to_string()),
            password_change_required: Some(false),
            last_password_changed_at: Some("2026-05-01T08:00:00Z".to_string()),
            password_expires_at: Some("2026-11-01T08:00:00Z".to_string()),
            profile_picture: None,
        }
    }

    #[test]
    fn build_user_keeps_explicit_flag_when_dates_present() {
        let user = build_user(wire_user());
        assert_eq!(user.role, Role::Manager);
        assert!(!user.password_change_required);
        assert_eq!(post_login_redirect(&user), RedirectTarget::Dashboard);
    }

    #[test]
    fn missing_password_date_forces_rotation() {
        let mut wire = wire_user();
        wire.password_expires_at = None;
        let user = build_user(wire);
        assert!(user.password_change_required);
        assert_eq!(post_login_redirect(&user), RedirectTarget::ChangePassword);
    }

    #[test]
    fn missing_flag_defaults_to_rotation() {
        let mut wire = wire_user();
        wire.password_change_required = None;
        let user = build_user(wire);
        assert!(user.password_change_required);
    }

    #[test]
    fn redirect_predicate_ignores_flag_when_dates_absent() {
        let mut user = build_user(wire_user());
        user.password_change_required = false;
        user.last_password_changed_at = None;
        assert_eq!(post_login_redirect(&user), RedirectTarget::ChangePassword);
    }

    #[test]
    fn load_requires_both_token_and_user() {
        let user = build_user(wire_user());
        persist("tok-123", &user);
        let (token, restored) = load().expect("session present");
        assert_eq!(token, "tok-123");
        assert_eq!(restored, user);

        crate::app_lib::storage::remove(crate::app_lib::storage::Scope::Durable, TOKEN_KEY);
        assert!(load().is_none());
        clear();
    }
}

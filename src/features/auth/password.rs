//! Client-side password pre-checks shared by the unlock flows and the
//! change-password page. The backend applies the real policy; these checks
//! only save a round trip for the obvious cases.

/// Minimum accepted password length.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Returns the first problem with a new-password pair, if any.
pub fn password_issue(password: &str, confirm: &str) -> Option<&'static str> {
    if password.len() < MIN_PASSWORD_LEN {
        return Some("Password must be at least 8 characters.");
    }
    if password != confirm {
        return Some("Passwords do not match.");
    }
    None
}

#[cfg(test)]
mod tests {
    use super::password_issue;

    #[test]
    fn short_password_is_rejected_before_match_check() {
        assert_eq!(
            password_issue("abc", "different"),
            Some("Password must be at least 8 characters.")
        );
    }

    #[test]
    fn mismatch_is_rejected() {
        assert_eq!(
            password_issue("longenough", "longenuff"),
            Some("Passwords do not match.")
        );
    }

    #[test]
    fn valid_pair_passes() {
        assert_eq!(password_issue("longenough", "longenough"), None);
    }
}

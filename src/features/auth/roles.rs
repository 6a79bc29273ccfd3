//! Closed role enum and the static permission hierarchy. A role grants the
//! permissions of every role it subsumes: `admin` subsumes everything,
//! `manager` the operational roles, and everyone else only themselves.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Manager,
    LoanOfficer,
    Accountant,
    Clerk,
}

impl Role {
    /// Coerces a backend role string into the closed enum. Unknown values
    /// fall back to the least-privileged role.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "admin" => Role::Admin,
            "manager" => Role::Manager,
            "loan_officer" | "loan-officer" => Role::LoanOfficer,
            "accountant" => Role::Accountant,
            _ => Role::Clerk,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::LoanOfficer => "loan_officer",
            Role::Accountant => "accountant",
            Role::Clerk => "clerk",
        }
    }

    /// Roles whose permissions this role subsumes, itself included.
    fn subsumed(self) -> &'static [Role] {
        match self {
            Role::Admin => &[
                Role::Admin,
                Role::Manager,
                Role::LoanOfficer,
                Role::Accountant,
                Role::Clerk,
            ],
            Role::Manager => &[
                Role::Manager,
                Role::LoanOfficer,
                Role::Accountant,
                Role::Clerk,
            ],
            Role::LoanOfficer => &[Role::LoanOfficer],
            Role::Accountant => &[Role::Accountant],
            Role::Clerk => &[Role::Clerk],
        }
    }
}

/// True iff any required role is within the holder's subsumed set. An empty
/// required set is never satisfied.
pub fn has_permission(role: Role, required: &[Role]) -> bool {
    if required.is_empty() {
        return false;
    }
    required.iter().any(|needed| role.subsumed().contains(needed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_subsumes_every_role() {
        assert!(has_permission(Role::Admin, &[Role::Clerk]));
        assert!(has_permission(Role::Admin, &[Role::Manager]));
        assert!(has_permission(Role::Admin, &[Role::Admin]));
    }

    #[test]
    fn clerk_cannot_act_as_admin() {
        assert!(!has_permission(Role::Clerk, &[Role::Admin]));
        assert!(has_permission(Role::Clerk, &[Role::Clerk]));
    }

    #[test]
    fn manager_covers_operational_roles_only() {
        assert!(has_permission(Role::Manager, &[Role::Accountant]));
        assert!(has_permission(Role::Manager, &[Role::LoanOfficer]));
        assert!(!has_permission(Role::Manager, &[Role::Admin]));
    }

    #[test]
    fn empty_required_set_is_never_satisfied() {
        assert!(!has_permission(Role::Admin, &[]));
        assert!(!has_permission(Role::Clerk, &[]));
    }

    #[test]
    fn parse_falls_back_to_least_privilege() {
        assert_eq!(Role::parse("Admin"), Role::Admin);
        assert_eq!(Role::parse("loan-officer"), Role::LoanOfficer);
        assert_eq!(Role::parse("superuser"), Role::Clerk);
        assert_eq!(Role::parse(""), Role::Clerk);
    }
}

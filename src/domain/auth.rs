//! Identity of the caller as issued by the external auth service.

use serde::{Deserialize, Serialize};

use crate::domain::types::{HubId, TypeConstraintError, UserEmail};

/// Claims carried by the JWT stored in the identity cookie or bearer header.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub sub: String,
    pub email: String,
    pub hub_id: i32,
    pub name: String,
    pub roles: Vec<String>,
    pub exp: usize,
}

impl AuthenticatedUser {
    /// Whether the user holds the given service role.
    pub fn has_role(&self, role: &str) -> bool {
        check_role(role, &self.roles)
    }

    /// Hub the user belongs to.
    pub fn hub(&self) -> Result<HubId, TypeConstraintError> {
        HubId::new(self.hub_id)
    }

    /// Normalized email used to find the user in the hub roster.
    pub fn user_email(&self) -> Result<UserEmail, TypeConstraintError> {
        UserEmail::new(self.email.as_str())
    }
}

/// Returns `true` when `role` is present in `roles`.
pub fn check_role(role: &str, roles: &[String]) -> bool {
    roles.iter().any(|r| r == role)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_lookup_is_exact() {
        let roles = vec!["leads".to_string(), "leads_admin".to_string()];
        assert!(check_role("leads", &roles));
        assert!(!check_role("lead", &roles));
    }

    #[test]
    fn derives_typed_identity() {
        let user = AuthenticatedUser {
            sub: "7".into(),
            email: "Manager@Example.com".into(),
            hub_id: 3,
            name: "Manager".into(),
            roles: vec![],
            exp: 0,
        };
        assert_eq!(user.hub().unwrap().get(), 3);
        assert_eq!(user.user_email().unwrap().as_str(), "manager@example.com");
    }
}

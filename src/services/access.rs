//! Permission checks shared by every service.
//!
//! The auth service decides who may use the application at all through the
//! service roles in the token. Inside a hub, what a user may do comes from the
//! role assigned to them in the hub roster.

use log::warn;

use crate::domain::auth::AuthenticatedUser;
use crate::domain::types::{HubId, UserId};
use crate::repository::{RoleReader, UserReader};
use crate::services::{ServiceError, ServiceResult};
use crate::{SERVICE_ACCESS_ROLE, SERVICE_ADMIN_ROLE};

pub const CAMPAIGNS_VIEW: &str = "campaigns.view";
pub const CAMPAIGNS_MANAGE: &str = "campaigns.manage";
pub const INQUIRIES_VIEW: &str = "inquiries.view";
pub const INQUIRIES_MANAGE: &str = "inquiries.manage";
pub const TASKS_VIEW: &str = "tasks.view";
pub const TASKS_MANAGE: &str = "tasks.manage";
pub const USERS_MANAGE: &str = "users.manage";
pub const ROLES_MANAGE: &str = "roles.manage";
pub const REPORTS_EXPORT: &str = "reports.export";

/// The caller after a successful permission check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub hub_id: HubId,
    /// Roster entry of the caller; admins may act without one.
    pub user_id: Option<UserId>,
    is_admin: bool,
    permissions: Vec<String>,
}

impl Actor {
    pub fn is_admin(&self) -> bool {
        self.is_admin
    }

    pub fn can(&self, permission: &str) -> bool {
        self.is_admin || self.permissions.iter().any(|p| p == permission)
    }
}

/// Checks that `user` holds `permission` in their hub.
///
/// Service admins hold every permission. Other users need the service access
/// role plus an active roster entry whose role grants `permission`.
pub fn authorize<R>(repo: &R, user: &AuthenticatedUser, permission: &str) -> ServiceResult<Actor>
where
    R: UserReader + RoleReader + ?Sized,
{
    let hub_id = user.hub().map_err(|_| ServiceError::Unauthorized)?;
    let roster_entry = match user.user_email() {
        Ok(email) => repo.get_user_by_email(&email, hub_id)?,
        Err(_) => None,
    };

    if user.has_role(SERVICE_ADMIN_ROLE) {
        return Ok(Actor {
            hub_id,
            user_id: roster_entry.map(|entry| entry.id),
            is_admin: true,
            permissions: Vec::new(),
        });
    }

    if !user.has_role(SERVICE_ACCESS_ROLE) {
        return Err(ServiceError::Unauthorized);
    }

    let Some(entry) = roster_entry.filter(|entry| entry.is_active) else {
        warn!("{} is not an active member of hub {hub_id}", user.email);
        return Err(ServiceError::Unauthorized);
    };

    let role = match entry.role_id {
        Some(role_id) => repo.get_role_by_id(role_id, hub_id)?,
        None => None,
    };
    let permissions: Vec<String> = role
        .map(|role| {
            role.permissions
                .into_iter()
                .map(|p| p.code.into_inner())
                .collect()
        })
        .unwrap_or_default();

    if !permissions.iter().any(|p| p == permission) {
        return Err(ServiceError::Unauthorized);
    }

    Ok(Actor {
        hub_id,
        user_id: Some(entry.id),
        is_admin: false,
        permissions,
    })
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::repository::mock::MockRepository;

    #[test]
    fn admin_bypasses_roster() {
        let repo = repo_for_admin();

        let actor = authorize(&repo, &admin(), USERS_MANAGE).unwrap();

        assert!(actor.is_admin());
        assert!(actor.can(ROLES_MANAGE));
        assert_eq!(actor.user_id, None);
    }

    #[test]
    fn member_with_permission_is_allowed() {
        let repo = repo_for_member(&[TASKS_VIEW]);

        let actor = authorize(&repo, &member(), TASKS_VIEW).unwrap();

        assert_eq!(actor.user_id.map(|id| id.get()), Some(1));
        assert!(!actor.can(TASKS_MANAGE));
    }

    #[test]
    fn member_without_permission_is_rejected() {
        let repo = repo_for_member(&[TASKS_VIEW]);

        let result = authorize(&repo, &member(), CAMPAIGNS_MANAGE);

        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    #[test]
    fn inactive_member_is_rejected() {
        let mut repo = MockRepository::new();
        repo.expect_get_user_by_email()
            .returning(|_, _| Ok(Some(roster_user(1, false))));

        let result = authorize(&repo, &member(), TASKS_VIEW);

        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    #[test]
    fn unknown_member_is_rejected() {
        let mut repo = MockRepository::new();
        repo.expect_get_user_by_email().returning(|_, _| Ok(None));

        assert!(matches!(
            authorize(&repo, &member(), TASKS_VIEW),
            Err(ServiceError::Unauthorized)
        ));
    }

    #[test]
    fn token_without_service_role_is_rejected() {
        let mut repo = MockRepository::new();
        repo.expect_get_user_by_email()
            .returning(|_, _| Ok(Some(roster_user(1, true))));

        assert!(matches!(
            authorize(&repo, &token(&["crm"]), TASKS_VIEW),
            Err(ServiceError::Unauthorized)
        ));
    }
}

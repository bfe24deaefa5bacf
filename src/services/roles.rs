use std::collections::HashSet;

use crate::domain::auth::AuthenticatedUser;
use crate::domain::role::{Permission, Role};
use crate::domain::types::{PermissionId, RoleId};
use crate::dto::access::RolesPageData;
use crate::forms::role::RoleForm;
use crate::repository::{RoleReader, RoleWriter, UserReader};
use crate::services::access::{ROLES_MANAGE, authorize};
use crate::services::{ServiceError, ServiceResult, path_id};

/// Rejects permission ids missing from the global catalogue.
fn ensure_permissions<R>(repo: &R, ids: &[PermissionId]) -> ServiceResult<()>
where
    R: RoleReader + ?Sized,
{
    let known: HashSet<PermissionId> = repo.list_permissions()?.into_iter().map(|p| p.id).collect();
    match ids.iter().find(|id| !known.contains(*id)) {
        Some(id) => Err(ServiceError::Form(format!("Unknown permission {id}"))),
        None => Ok(()),
    }
}

fn duplicate_name(err: ServiceError) -> ServiceError {
    match err {
        ServiceError::Conflict(_) => {
            ServiceError::Conflict("A role with this name already exists".to_string())
        }
        other => other,
    }
}

pub fn list_roles<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<Vec<Role>>
where
    R: RoleReader + UserReader + ?Sized,
{
    let actor = authorize(repo, user, ROLES_MANAGE)?;
    Ok(repo.list_roles(actor.hub_id)?)
}

pub fn list_permissions<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<Vec<Permission>>
where
    R: RoleReader + UserReader + ?Sized,
{
    authorize(repo, user, ROLES_MANAGE)?;
    Ok(repo.list_permissions()?)
}

pub fn load_roles_page<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<RolesPageData>
where
    R: RoleReader + UserReader + ?Sized,
{
    let actor = authorize(repo, user, ROLES_MANAGE)?;
    Ok(RolesPageData {
        roles: repo.list_roles(actor.hub_id)?,
        permissions: repo.list_permissions()?,
    })
}

pub fn create_role<R>(repo: &R, user: &AuthenticatedUser, form: RoleForm) -> ServiceResult<Role>
where
    R: RoleReader + RoleWriter + UserReader + ?Sized,
{
    let actor = authorize(repo, user, ROLES_MANAGE)?;
    let new = form.into_new(actor.hub_id)?;
    ensure_permissions(repo, &new.permission_ids)?;

    repo.create_role(&new).map_err(|e| duplicate_name(e.into()))
}

/// Replaces the role name, description and permission set.
pub fn update_role<R>(
    repo: &R,
    user: &AuthenticatedUser,
    id: i32,
    form: RoleForm,
) -> ServiceResult<Role>
where
    R: RoleReader + RoleWriter + UserReader + ?Sized,
{
    let actor = authorize(repo, user, ROLES_MANAGE)?;
    let id: RoleId = path_id(id)?;
    let updates = form.into_update()?;
    ensure_permissions(repo, &updates.permission_ids)?;

    repo.update_role(id, actor.hub_id, &updates)
        .map_err(|e| duplicate_name(e.into()))
}

/// Deletes a role nobody holds any more.
pub fn delete_role<R>(repo: &R, user: &AuthenticatedUser, id: i32) -> ServiceResult<()>
where
    R: RoleReader + RoleWriter + UserReader + ?Sized,
{
    let actor = authorize(repo, user, ROLES_MANAGE)?;
    let id: RoleId = path_id(id)?;
    repo.get_role_by_id(id, actor.hub_id)?
        .ok_or(ServiceError::NotFound)?;

    let holders = repo.count_users_with_role(id)?;
    if holders > 0 {
        return Err(ServiceError::Conflict(format!(
            "The role is assigned to {holders} user(s)"
        )));
    }

    repo.delete_role(id, actor.hub_id)?;
    log::info!("Deleted role {id} from hub {}", actor.hub_id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::PermissionCode;
    use crate::services::access::test_support::*;

    fn catalogue() -> Vec<Permission> {
        ["tasks.view", "tasks.manage"]
            .iter()
            .enumerate()
            .map(|(i, code)| Permission {
                id: PermissionId::new(i as i32 + 1).unwrap(),
                code: PermissionCode::new(*code).unwrap(),
                description: String::new(),
            })
            .collect()
    }

    fn form(body: &str) -> RoleForm {
        serde_html_form::from_str(body).unwrap()
    }

    #[test]
    fn create_checks_the_catalogue() {
        let mut repo = repo_for_admin();
        repo.expect_list_permissions().returning(|| Ok(catalogue()));
        repo.expect_create_role().never();

        let result = create_role(&repo, &admin(), form("name=Viewer&permission_ids=1&permission_ids=9"));

        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[test]
    fn create_returns_role_with_permissions() {
        let mut repo = repo_for_admin();
        repo.expect_list_permissions().returning(|| Ok(catalogue()));
        repo.expect_create_role()
            .withf(|new| new.permission_ids.len() == 2)
            .returning(|_| Ok(role_with(&["tasks.view", "tasks.manage"])));

        let role = create_role(&repo, &admin(), form("name=Viewer&permission_ids=1&permission_ids=2"))
            .unwrap();

        assert!(role.grants("tasks.manage"));
    }

    #[test]
    fn role_in_use_cannot_be_deleted() {
        let mut repo = repo_for_admin();
        repo.expect_get_role_by_id()
            .returning(|_, _| Ok(Some(role_with(&[]))));
        repo.expect_count_users_with_role().returning(|_| Ok(2));
        repo.expect_delete_role().never();

        let result = delete_role(&repo, &admin(), 1);

        assert!(matches!(result, Err(ServiceError::Conflict(_))));
    }

    #[test]
    fn unused_role_is_deleted() {
        let mut repo = repo_for_admin();
        repo.expect_get_role_by_id()
            .returning(|_, _| Ok(Some(role_with(&[]))));
        repo.expect_count_users_with_role().returning(|_| Ok(0));
        repo.expect_delete_role().times(1).returning(|_, _| Ok(()));

        assert!(delete_role(&repo, &admin(), 1).is_ok());
    }

    #[test]
    fn missing_role_is_not_found() {
        let mut repo = repo_for_admin();
        repo.expect_get_role_by_id().returning(|_, _| Ok(None));

        assert!(matches!(
            delete_role(&repo, &admin(), 5),
            Err(ServiceError::NotFound)
        ));
    }
}

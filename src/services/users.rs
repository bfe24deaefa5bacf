use std::collections::HashMap;

use crate::domain::auth::AuthenticatedUser;
use crate::domain::types::{HubId, RoleId, UserId};
use crate::domain::user::User;
use crate::dto::access::{UserQuery, UserSummary, UsersPageData};
use crate::forms::user::UserForm;
use crate::pagination::Listing;
use crate::repository::{RoleReader, UserListQuery, UserReader, UserWriter};
use crate::services::access::{USERS_MANAGE, authorize};
use crate::services::{ServiceError, ServiceResult, path_id};

fn ensure_role<R>(repo: &R, hub_id: HubId, role_id: Option<RoleId>) -> ServiceResult<()>
where
    R: RoleReader + ?Sized,
{
    let Some(id) = role_id else {
        return Ok(());
    };
    match repo.get_role_by_id(id, hub_id)? {
        Some(_) => Ok(()),
        None => Err(ServiceError::Form("Role not found".to_string())),
    }
}

fn duplicate_email(err: ServiceError) -> ServiceError {
    match err {
        ServiceError::Conflict(_) => {
            ServiceError::Conflict("A user with this email already exists".to_string())
        }
        other => other,
    }
}

/// Hub roster, ordered by name, with role names attached.
pub fn list_users<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: &UserQuery,
) -> ServiceResult<Listing<UserSummary>>
where
    R: UserReader + RoleReader + ?Sized,
{
    let actor = authorize(repo, user, USERS_MANAGE)?;
    let params = query.page_params();

    let mut list = UserListQuery::new(actor.hub_id).paginate(params.page(), params.per_page());
    if let Some(search) = &query.search {
        list = list.search(search.as_str());
    }
    if let Some(role_id) = query.role_id {
        list = list.role(path_id(role_id)?);
    }
    if let Some(active) = query.active {
        list = list.active(active);
    }

    let (total, users) = repo.list_users(list)?;
    let role_names: HashMap<RoleId, String> = repo
        .list_roles(actor.hub_id)?
        .into_iter()
        .map(|role| (role.id, role.name.into_inner()))
        .collect();

    let items = users
        .into_iter()
        .map(|user| UserSummary {
            role_name: user.role_id.and_then(|id| role_names.get(&id).cloned()),
            user,
        })
        .collect();

    Ok(Listing::new(items, params, total))
}

pub fn load_users_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: UserQuery,
) -> ServiceResult<UsersPageData>
where
    R: UserReader + RoleReader + ?Sized,
{
    let users = list_users(repo, user, &query)?;
    let hub_id = user.hub().map_err(|_| ServiceError::Unauthorized)?;
    let roles = repo.list_roles(hub_id)?;

    Ok(UsersPageData {
        users: users.into(),
        roles,
        filters: query,
    })
}

pub fn create_user<R>(repo: &R, user: &AuthenticatedUser, form: UserForm) -> ServiceResult<User>
where
    R: UserWriter + UserReader + RoleReader + ?Sized,
{
    let actor = authorize(repo, user, USERS_MANAGE)?;
    let new = form.into_new(actor.hub_id)?;
    ensure_role(repo, actor.hub_id, new.role_id)?;

    repo.create_user(&new).map_err(|e| duplicate_email(e.into()))
}

pub fn update_user<R>(
    repo: &R,
    user: &AuthenticatedUser,
    id: i32,
    form: UserForm,
) -> ServiceResult<User>
where
    R: UserWriter + UserReader + RoleReader + ?Sized,
{
    let actor = authorize(repo, user, USERS_MANAGE)?;
    let id: UserId = path_id(id)?;
    let updates = form.into_update()?;
    ensure_role(repo, actor.hub_id, updates.role_id)?;

    repo.update_user(id, actor.hub_id, &updates)
        .map_err(|e| duplicate_email(e.into()))
}

/// Removes the user from the roster; their inquiries and tasks become
/// unassigned.
pub fn delete_user<R>(repo: &R, user: &AuthenticatedUser, id: i32) -> ServiceResult<()>
where
    R: UserWriter + UserReader + RoleReader + ?Sized,
{
    let actor = authorize(repo, user, USERS_MANAGE)?;
    repo.delete_user(path_id(id)?, actor.hub_id)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::errors::RepositoryError;
    use crate::services::access::test_support::*;

    fn form(body: &str) -> UserForm {
        serde_html_form::from_str(body).unwrap()
    }

    #[test]
    fn list_attaches_role_names() {
        let mut repo = repo_for_admin();
        repo.expect_list_users()
            .withf(|q| q.active == Some(true) && q.search.as_deref() == Some("mem"))
            .returning(|_| Ok((1, vec![roster_user(5, true)])));
        repo.expect_list_roles()
            .returning(|_| Ok(vec![role_with(&[])]));

        let query = UserQuery {
            search: Some("mem".into()),
            active: Some(true),
            ..Default::default()
        };
        let listing = list_users(&repo, &admin(), &query).unwrap();

        assert_eq!(listing.items[0].role_name.as_deref(), Some("Counsellor"));
        assert_eq!(listing.pagination.total, 1);
    }

    #[test]
    fn create_rejects_foreign_role() {
        let mut repo = repo_for_admin();
        repo.expect_get_role_by_id().returning(|_, _| Ok(None));
        repo.expect_create_user().never();

        let result = create_user(&repo, &admin(), form("name=Eve&email=eve%40example.com&role_id=4"));

        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[test]
    fn duplicate_email_is_a_conflict() {
        let mut repo = repo_for_admin();
        repo.expect_create_user().returning(|_| {
            Err(RepositoryError::ConstraintViolation(
                "unique constraint violated".into(),
            ))
        });

        let result = create_user(&repo, &admin(), form("name=Eve&email=eve%40example.com"));

        assert!(matches!(result, Err(ServiceError::Conflict(_))));
    }

    #[test]
    fn members_need_users_manage() {
        let repo = repo_for_member(&["tasks.view"]);

        let result = delete_user(&repo, &member(), 3);

        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }
}

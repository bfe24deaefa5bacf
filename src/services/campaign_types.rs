use crate::domain::auth::AuthenticatedUser;
use crate::domain::campaign_type::CampaignType;
use crate::domain::types::CampaignTypeId;
use crate::forms::campaign_type::CampaignTypeForm;
use crate::repository::{CampaignTypeReader, CampaignTypeWriter, RoleReader, UserReader};
use crate::services::access::{CAMPAIGNS_MANAGE, CAMPAIGNS_VIEW, authorize};
use crate::services::{ServiceError, ServiceResult, path_id};

fn duplicate_name(err: ServiceError) -> ServiceError {
    match err {
        ServiceError::Conflict(_) => {
            ServiceError::Conflict("A campaign type with this name already exists".to_string())
        }
        other => other,
    }
}

/// All campaign types of the caller's hub, ordered by name.
pub fn list_campaign_types<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<Vec<CampaignType>>
where
    R: CampaignTypeReader + UserReader + RoleReader + ?Sized,
{
    let actor = authorize(repo, user, CAMPAIGNS_VIEW)?;
    Ok(repo.list_campaign_types(actor.hub_id)?)
}

pub fn create_campaign_type<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: CampaignTypeForm,
) -> ServiceResult<CampaignType>
where
    R: CampaignTypeWriter + UserReader + RoleReader + ?Sized,
{
    let actor = authorize(repo, user, CAMPAIGNS_MANAGE)?;
    let new = form.into_new(actor.hub_id)?;
    repo.create_campaign_type(&new)
        .map_err(|e| duplicate_name(e.into()))
}

pub fn update_campaign_type<R>(
    repo: &R,
    user: &AuthenticatedUser,
    id: i32,
    form: CampaignTypeForm,
) -> ServiceResult<CampaignType>
where
    R: CampaignTypeWriter + UserReader + RoleReader + ?Sized,
{
    let actor = authorize(repo, user, CAMPAIGNS_MANAGE)?;
    let id: CampaignTypeId = path_id(id)?;
    let updates = form.into_update()?;
    repo.update_campaign_type(id, actor.hub_id, &updates)
        .map_err(|e| duplicate_name(e.into()))
}

/// Deletes the type; campaigns that used it keep existing without a type.
pub fn delete_campaign_type<R>(repo: &R, user: &AuthenticatedUser, id: i32) -> ServiceResult<()>
where
    R: CampaignTypeWriter + UserReader + RoleReader + ?Sized,
{
    let actor = authorize(repo, user, CAMPAIGNS_MANAGE)?;
    let id: CampaignTypeId = path_id(id)?;
    repo.delete_campaign_type(id, actor.hub_id)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::CampaignTypeName;
    use crate::repository::errors::RepositoryError;
    use crate::services::access::test_support::*;

    fn campaign_type(id: i32, name: &str) -> CampaignType {
        CampaignType {
            id: CampaignTypeId::new(id).unwrap(),
            hub_id: hub(),
            name: CampaignTypeName::new(name).unwrap(),
            description: None,
            is_active: true,
            created_at: now(),
            updated_at: now(),
        }
    }

    fn form(name: &str) -> CampaignTypeForm {
        CampaignTypeForm {
            name: name.to_string(),
            description: None,
            is_active: true,
        }
    }

    #[test]
    fn list_is_scoped_to_the_hub() {
        let mut repo = repo_for_member(&[CAMPAIGNS_VIEW]);
        repo.expect_list_campaign_types()
            .withf(|hub_id| hub_id.get() == 1)
            .returning(|_| Ok(vec![campaign_type(1, "Facebook"), campaign_type(2, "TV")]));

        let types = list_campaign_types(&repo, &member()).unwrap();

        assert_eq!(types.len(), 2);
    }

    #[test]
    fn create_returns_stored_entity() {
        let mut repo = repo_for_admin();
        repo.expect_create_campaign_type()
            .withf(|new| new.name.as_str() == "Radio")
            .returning(|_| Ok(campaign_type(3, "Radio")));

        let created = create_campaign_type(&repo, &admin(), form(" Radio ")).unwrap();

        assert_eq!(created.id.get(), 3);
    }

    #[test]
    fn invalid_form_writes_nothing() {
        let mut repo = repo_for_admin();
        repo.expect_create_campaign_type().never();

        let result = create_campaign_type(&repo, &admin(), form(""));

        assert!(matches!(result, Err(ServiceError::Validation(_))));
    }

    #[test]
    fn duplicate_name_is_a_conflict() {
        let mut repo = repo_for_admin();
        repo.expect_update_campaign_type().returning(|_, _, _| {
            Err(RepositoryError::ConstraintViolation(
                "unique constraint violated".into(),
            ))
        });

        let result = update_campaign_type(&repo, &admin(), 1, form("TV"));

        assert!(matches!(result, Err(ServiceError::Conflict(_))));
    }

    #[test]
    fn viewers_cannot_delete() {
        let mut repo = repo_for_member(&[CAMPAIGNS_VIEW]);
        repo.expect_delete_campaign_type().never();

        let result = delete_campaign_type(&repo, &member(), 1);

        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }
}

//! Inquiry (seeker) workflows: listing, detail tabs, stage pipeline,
//! interaction history and the trash.

use std::collections::HashMap;

use crate::domain::auth::AuthenticatedUser;
use crate::domain::inquiry::Inquiry;
use crate::domain::interaction::{Interaction, NewInteraction};
use crate::domain::types::{CampaignId, HubId, InquiryId, Stage, UserId};
use crate::dto::inquiries::{
    InquiriesPageData, InquiryDetail, InquiryFormOptions, InquiryPageData, InquiryQuery,
    InquirySummary,
};
use crate::forms::inquiry::{InquiryForm, InteractionForm, StageForm};
use crate::pagination::Listing;
use crate::repository::{
    CampaignListQuery, CampaignReader, FollowUpTaskListQuery, InquiryListQuery, InquiryReader,
    InquiryWriter, RoleReader, TaskReader, UserListQuery, UserReader,
};
use crate::services::access::{INQUIRIES_MANAGE, INQUIRIES_VIEW, authorize};
use crate::services::{
    ServiceError, ServiceResult, ensure_assignee, ensure_campaign, parse_filter, path_id,
};

/// Translates request filters into a repository query without paging.
pub(crate) fn inquiry_list_query(
    hub_id: HubId,
    query: &InquiryQuery,
) -> ServiceResult<InquiryListQuery> {
    let mut list = InquiryListQuery::new(hub_id);
    if let Some(search) = &query.search {
        list = list.search(search.as_str());
    }
    if let Some(stage) = parse_filter::<Stage>(query.stage.as_deref(), "stage")? {
        list = list.stage(stage);
    }
    if let Some(campaign_id) = query.campaign_id {
        list = list.campaign(path_id(campaign_id)?);
    }
    if let Some(user_id) = query.assigned_to {
        list = list.assigned_to(path_id(user_id)?);
    }
    Ok(list)
}

/// Campaigns and users of the hub, for filters, forms and name lookups.
fn form_options<R>(repo: &R, hub_id: HubId) -> ServiceResult<InquiryFormOptions>
where
    R: CampaignReader + UserReader + ?Sized,
{
    let (_, campaigns) = repo.list_campaigns(CampaignListQuery::new(hub_id))?;
    let (_, users) = repo.list_users(UserListQuery::new(hub_id))?;
    Ok(InquiryFormOptions { campaigns, users })
}

fn summarize(inquiries: Vec<Inquiry>, options: &InquiryFormOptions) -> Vec<InquirySummary> {
    let campaigns: HashMap<CampaignId, &str> = options
        .campaigns
        .iter()
        .map(|c| (c.id, c.name.as_str()))
        .collect();
    let users: HashMap<UserId, &str> = options
        .users
        .iter()
        .map(|u| (u.id, u.name.as_str()))
        .collect();

    inquiries
        .into_iter()
        .map(|inquiry| InquirySummary {
            campaign_name: inquiry
                .campaign_id
                .and_then(|id| campaigns.get(&id).map(|name| name.to_string())),
            assignee_name: inquiry
                .assigned_to
                .and_then(|id| users.get(&id).map(|name| name.to_string())),
            inquiry,
        })
        .collect()
}

fn list_with_options<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: &InquiryQuery,
    trashed: bool,
) -> ServiceResult<(Listing<InquirySummary>, InquiryFormOptions)>
where
    R: InquiryReader + CampaignReader + UserReader + RoleReader + ?Sized,
{
    let actor = authorize(repo, user, INQUIRIES_VIEW)?;
    let params = query.page_params();
    let mut list =
        inquiry_list_query(actor.hub_id, query)?.paginate(params.page(), params.per_page());
    if trashed {
        list = list.trashed();
    }

    let (total, inquiries) = repo.list_inquiries(list)?;
    let options = form_options(repo, actor.hub_id)?;
    let items = summarize(inquiries, &options);

    Ok((Listing::new(items, params, total), options))
}

/// Live inquiries, newest first. With `trashed` set, the trash instead.
pub fn list_inquiries<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: &InquiryQuery,
    trashed: bool,
) -> ServiceResult<Listing<InquirySummary>>
where
    R: InquiryReader + CampaignReader + UserReader + RoleReader + ?Sized,
{
    list_with_options(repo, user, query, trashed).map(|(listing, _)| listing)
}

pub fn load_inquiries_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: InquiryQuery,
    trashed: bool,
) -> ServiceResult<InquiriesPageData>
where
    R: InquiryReader + CampaignReader + UserReader + RoleReader + ?Sized,
{
    let (listing, options) = list_with_options(repo, user, &query, trashed)?;
    Ok(InquiriesPageData {
        inquiries: listing.into(),
        options,
        filters: query,
    })
}

fn detail<R>(repo: &R, hub_id: HubId, id: InquiryId) -> ServiceResult<InquiryDetail>
where
    R: InquiryReader + CampaignReader + UserReader + TaskReader + ?Sized,
{
    let inquiry = repo
        .get_inquiry_by_id(id, hub_id)?
        .ok_or(ServiceError::NotFound)?;
    let campaign = match inquiry.campaign_id {
        Some(campaign_id) => repo.get_campaign_by_id(campaign_id, hub_id)?,
        None => None,
    };
    let assignee = match inquiry.assigned_to {
        Some(user_id) => repo.get_user_by_id(user_id, hub_id)?,
        None => None,
    };
    let answers = repo.list_inquiry_answers(id)?;
    let interactions = repo.list_interactions(id)?;
    let follow_ups = repo.list_follow_up_tasks(FollowUpTaskListQuery::new(hub_id).inquiry(id))?;

    Ok(InquiryDetail {
        inquiry,
        campaign,
        assignee,
        answers,
        interactions,
        follow_ups,
    })
}

/// Inquiry with its history, follow-ups and Q&A. Trashed inquiries can still
/// be opened.
pub fn get_inquiry_detail<R>(
    repo: &R,
    user: &AuthenticatedUser,
    id: i32,
) -> ServiceResult<InquiryDetail>
where
    R: InquiryReader + CampaignReader + UserReader + RoleReader + TaskReader + ?Sized,
{
    let actor = authorize(repo, user, INQUIRIES_VIEW)?;
    detail(repo, actor.hub_id, path_id(id)?)
}

pub fn load_inquiry_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
    id: i32,
) -> ServiceResult<InquiryPageData>
where
    R: InquiryReader + CampaignReader + UserReader + RoleReader + TaskReader + ?Sized,
{
    let actor = authorize(repo, user, INQUIRIES_VIEW)?;
    Ok(InquiryPageData {
        detail: detail(repo, actor.hub_id, path_id(id)?)?,
        options: form_options(repo, actor.hub_id)?,
    })
}

/// Loads an inquiry that is not in the trash; trashed ones cannot be edited.
fn live_inquiry<R>(repo: &R, hub_id: HubId, id: InquiryId) -> ServiceResult<Inquiry>
where
    R: InquiryReader + ?Sized,
{
    repo.get_inquiry_by_id(id, hub_id)?
        .filter(|inquiry| !inquiry.is_trashed())
        .ok_or(ServiceError::NotFound)
}

pub fn create_inquiry<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: InquiryForm,
) -> ServiceResult<Inquiry>
where
    R: InquiryWriter + CampaignReader + UserReader + RoleReader + ?Sized,
{
    let actor = authorize(repo, user, INQUIRIES_MANAGE)?;
    let new = form.into_new(actor.hub_id)?;
    ensure_campaign(repo, actor.hub_id, new.campaign_id)?;
    ensure_assignee(repo, actor.hub_id, new.assigned_to)?;

    Ok(repo.create_inquiry(&new)?)
}

/// Replaces the inquiry fields and its Q&A answers.
pub fn update_inquiry<R>(
    repo: &R,
    user: &AuthenticatedUser,
    id: i32,
    form: InquiryForm,
) -> ServiceResult<Inquiry>
where
    R: InquiryReader + InquiryWriter + CampaignReader + UserReader + RoleReader + ?Sized,
{
    let actor = authorize(repo, user, INQUIRIES_MANAGE)?;
    let id: InquiryId = path_id(id)?;
    let updates = form.into_update()?;
    live_inquiry(repo, actor.hub_id, id)?;
    ensure_campaign(repo, actor.hub_id, updates.campaign_id)?;
    ensure_assignee(repo, actor.hub_id, updates.assigned_to)?;

    Ok(repo.update_inquiry(id, actor.hub_id, &updates)?)
}

/// Moves the inquiry to `form.stage`, recording the change in its history.
/// Setting the current stage again changes nothing.
pub fn change_stage<R>(
    repo: &R,
    user: &AuthenticatedUser,
    id: i32,
    form: StageForm,
) -> ServiceResult<Inquiry>
where
    R: InquiryReader + InquiryWriter + UserReader + RoleReader + ?Sized,
{
    let actor = authorize(repo, user, INQUIRIES_MANAGE)?;
    let id: InquiryId = path_id(id)?;
    let stage = form.stage()?;
    let inquiry = live_inquiry(repo, actor.hub_id, id)?;

    if inquiry.stage == stage {
        return Ok(inquiry);
    }

    let history = NewInteraction::stage_change(id, actor.user_id, inquiry.stage, stage);
    Ok(repo.set_inquiry_stage(id, actor.hub_id, stage, &history)?)
}

pub fn add_interaction<R>(
    repo: &R,
    user: &AuthenticatedUser,
    id: i32,
    form: InteractionForm,
) -> ServiceResult<Interaction>
where
    R: InquiryReader + InquiryWriter + UserReader + RoleReader + ?Sized,
{
    let actor = authorize(repo, user, INQUIRIES_MANAGE)?;
    let id: InquiryId = path_id(id)?;
    let new = form.into_new(id, actor.user_id)?;
    live_inquiry(repo, actor.hub_id, id)?;

    Ok(repo.create_interaction(&new)?)
}

pub fn trash_inquiry<R>(repo: &R, user: &AuthenticatedUser, id: i32) -> ServiceResult<Inquiry>
where
    R: InquiryWriter + UserReader + RoleReader + ?Sized,
{
    let actor = authorize(repo, user, INQUIRIES_MANAGE)?;
    Ok(repo.trash_inquiry(path_id(id)?, actor.hub_id)?)
}

pub fn restore_inquiry<R>(repo: &R, user: &AuthenticatedUser, id: i32) -> ServiceResult<Inquiry>
where
    R: InquiryWriter + UserReader + RoleReader + ?Sized,
{
    let actor = authorize(repo, user, INQUIRIES_MANAGE)?;
    Ok(repo.restore_inquiry(path_id(id)?, actor.hub_id)?)
}

/// Deletes a trashed inquiry for good, with its answers, history and
/// follow-ups. Live inquiries are reported as not found.
pub fn purge_inquiry<R>(repo: &R, user: &AuthenticatedUser, id: i32) -> ServiceResult<()>
where
    R: InquiryWriter + UserReader + RoleReader + ?Sized,
{
    let actor = authorize(repo, user, INQUIRIES_MANAGE)?;
    let id: InquiryId = path_id(id)?;
    repo.purge_inquiry(id, actor.hub_id)?;
    log::info!("Purged inquiry {id} from hub {}", actor.hub_id);
    Ok(())
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::domain::inquiry::Inquiry;
    use crate::domain::types::{ContactEmail, InquiryId, SeekerName, Stage};
    use crate::services::access::test_support::{hub, now};

    pub fn inquiry(id: i32, stage: Stage) -> Inquiry {
        Inquiry {
            id: InquiryId::new(id).unwrap(),
            hub_id: hub(),
            campaign_id: None,
            assigned_to: None,
            name: SeekerName::new(format!("Seeker {id}")).unwrap(),
            email: Some(ContactEmail::new("seeker@example.com").unwrap()),
            phone: None,
            city: None,
            message: None,
            stage,
            deleted_at: None,
            created_at: now(),
            updated_at: now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::inquiry;
    use super::*;
    use crate::domain::interaction::Interaction;
    use crate::domain::types::{InteractionId, InteractionKind};
    use crate::repository::errors::RepositoryError;
    use crate::repository::mock::MockRepository;
    use crate::services::access::test_support::*;
    use crate::services::campaigns::fixtures::campaign;

    fn expect_options(repo: &mut MockRepository) {
        repo.expect_list_campaigns()
            .returning(|_| Ok((1, vec![campaign(3, None)])));
        repo.expect_list_users()
            .returning(|_| Ok((1, vec![roster_user(1, true)])));
    }

    #[test]
    fn list_resolves_names() {
        let mut repo = repo_for_member(&[INQUIRIES_VIEW]);
        expect_options(&mut repo);
        repo.expect_list_inquiries()
            .withf(|q| !q.trashed && q.stage == Some(Stage::New))
            .returning(|_| {
                let mut seeker = inquiry(1, Stage::New);
                seeker.campaign_id = Some(CampaignId::new(3).unwrap());
                seeker.assigned_to = Some(UserId::new(1).unwrap());
                Ok((1, vec![seeker]))
            });

        let query = InquiryQuery {
            stage: Some("new".into()),
            ..Default::default()
        };
        let listing = list_inquiries(&repo, &member(), &query, false).unwrap();

        assert_eq!(listing.items[0].campaign_name.as_deref(), Some("Campaign 3"));
        assert_eq!(listing.items[0].assignee_name.as_deref(), Some("Member"));
        assert!(!listing.pagination.has_more);
    }

    #[test]
    fn trash_listing_queries_trashed_rows() {
        let mut repo = repo_for_member(&[INQUIRIES_VIEW]);
        expect_options(&mut repo);
        repo.expect_list_inquiries()
            .withf(|q| q.trashed)
            .returning(|_| Ok((0, vec![])));

        let listing = list_inquiries(&repo, &member(), &InquiryQuery::default(), true).unwrap();

        assert!(listing.items.is_empty());
    }

    #[test]
    fn stage_change_records_history() {
        let mut repo = repo_for_member(&[INQUIRIES_MANAGE]);
        repo.expect_get_inquiry_by_id()
            .returning(|_, _| Ok(Some(inquiry(4, Stage::New))));
        repo.expect_set_inquiry_stage()
            .withf(|_, _, stage, history| {
                *stage == Stage::Contacted
                    && history.kind == InteractionKind::StageChange
                    && history.note.as_str() == "NEW → CONTACTED"
                    && history.user_id.map(|id| id.get()) == Some(1)
            })
            .times(1)
            .returning(|_, _, stage, _| Ok(inquiry(4, stage)));

        let form = StageForm {
            stage: "contacted".into(),
        };
        let updated = change_stage(&repo, &member(), 4, form).unwrap();

        assert_eq!(updated.stage, Stage::Contacted);
    }

    #[test]
    fn same_stage_writes_nothing() {
        let mut repo = repo_for_member(&[INQUIRIES_MANAGE]);
        repo.expect_get_inquiry_by_id()
            .returning(|_, _| Ok(Some(inquiry(4, Stage::Qualified))));
        repo.expect_set_inquiry_stage().never();

        let form = StageForm {
            stage: "QUALIFIED".into(),
        };
        let unchanged = change_stage(&repo, &member(), 4, form).unwrap();

        assert_eq!(unchanged.stage, Stage::Qualified);
    }

    #[test]
    fn trashed_inquiry_cannot_be_edited() {
        let mut repo = repo_for_member(&[INQUIRIES_MANAGE]);
        repo.expect_get_inquiry_by_id().returning(|_, _| {
            let mut seeker = inquiry(4, Stage::New);
            seeker.deleted_at = Some(now());
            Ok(Some(seeker))
        });
        repo.expect_create_interaction().never();

        let form = InteractionForm {
            kind: "CALL".into(),
            note: "No answer".into(),
        };
        let result = add_interaction(&repo, &member(), 4, form);

        assert!(matches!(result, Err(ServiceError::NotFound)));
    }

    #[test]
    fn interaction_is_attributed_to_the_actor() {
        let mut repo = repo_for_member(&[INQUIRIES_MANAGE]);
        repo.expect_get_inquiry_by_id()
            .returning(|_, _| Ok(Some(inquiry(4, Stage::New))));
        repo.expect_create_interaction()
            .withf(|new| new.user_id.map(|id| id.get()) == Some(1))
            .returning(|new| {
                Ok(Interaction {
                    id: InteractionId::new(1).unwrap(),
                    inquiry_id: new.inquiry_id,
                    user_id: new.user_id,
                    user_name: Some("Member".into()),
                    kind: new.kind,
                    note: new.note.as_str().to_string(),
                    created_at: now(),
                })
            });

        let form = InteractionForm {
            kind: "call".into(),
            note: "Discussed <b>fees</b>".into(),
        };
        let interaction = add_interaction(&repo, &member(), 4, form).unwrap();

        assert_eq!(interaction.note, "Discussed <b>fees</b>");
    }

    #[test]
    fn create_rejects_foreign_assignee() {
        let mut repo = repo_for_member(&[INQUIRIES_MANAGE]);
        repo.expect_get_user_by_id().returning(|_, _| Ok(None));
        repo.expect_create_inquiry().never();

        let form: InquiryForm =
            serde_json::from_str(r#"{"name": "Ann", "email": "ann@example.com", "assigned_to": 7}"#)
                .unwrap();
        let result = create_inquiry(&repo, &member(), form);

        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[test]
    fn failed_create_returns_validation_error() {
        let mut repo = repo_for_member(&[INQUIRIES_MANAGE]);
        repo.expect_create_inquiry().never();

        let form: InquiryForm = serde_json::from_str(r#"{"name": "Ann"}"#).unwrap();
        let result = create_inquiry(&repo, &member(), form);

        assert!(matches!(result, Err(ServiceError::Validation(_))));
    }

    #[test]
    fn purge_of_live_inquiry_is_not_found() {
        let mut repo = repo_for_member(&[INQUIRIES_MANAGE]);
        repo.expect_purge_inquiry()
            .returning(|_, _| Err(RepositoryError::NotFound));

        assert!(matches!(
            purge_inquiry(&repo, &member(), 4),
            Err(ServiceError::NotFound)
        ));
    }
}

use std::collections::HashMap;

use crate::domain::auth::AuthenticatedUser;
use crate::domain::campaign::Campaign;
use crate::domain::types::{CampaignId, CampaignStatus, CampaignTypeId, HubId};
use crate::dto::campaigns::{CampaignQuery, CampaignSummary, CampaignsPageData};
use crate::forms::campaign::CampaignForm;
use crate::pagination::Listing;
use crate::repository::{
    CampaignListQuery, CampaignReader, CampaignTypeReader, CampaignWriter, RoleReader, UserReader,
};
use crate::services::access::{CAMPAIGNS_MANAGE, CAMPAIGNS_VIEW, authorize};
use crate::services::{ServiceError, ServiceResult, parse_filter, path_id};

/// Translates request filters into a repository query without paging.
pub(crate) fn campaign_list_query(
    hub_id: HubId,
    query: &CampaignQuery,
) -> ServiceResult<CampaignListQuery> {
    let mut list = CampaignListQuery::new(hub_id);
    if let Some(search) = &query.search {
        list = list.search(search.as_str());
    }
    if let Some(status) = parse_filter::<CampaignStatus>(query.status.as_deref(), "status")? {
        list = list.status(status);
    }
    if let Some(type_id) = query.campaign_type_id {
        list = list.campaign_type(path_id(type_id)?);
    }
    Ok(list)
}

/// Attaches type names and live inquiry counts to campaigns.
pub(crate) fn summarize<R>(
    repo: &R,
    hub_id: HubId,
    campaigns: Vec<Campaign>,
) -> ServiceResult<Vec<CampaignSummary>>
where
    R: CampaignReader + CampaignTypeReader + ?Sized,
{
    let type_names: HashMap<CampaignTypeId, String> = repo
        .list_campaign_types(hub_id)?
        .into_iter()
        .map(|t| (t.id, t.name.into_inner()))
        .collect();
    let ids: Vec<CampaignId> = campaigns.iter().map(|c| c.id).collect();
    let counts = repo.count_inquiries_by_campaign(hub_id, &ids)?;

    Ok(campaigns
        .into_iter()
        .map(|campaign| CampaignSummary {
            campaign_type_name: campaign
                .campaign_type_id
                .and_then(|id| type_names.get(&id).cloned()),
            inquiry_count: counts.get(&campaign.id).copied().unwrap_or(0),
            campaign,
        })
        .collect())
}

fn ensure_campaign_type<R>(
    repo: &R,
    hub_id: HubId,
    campaign_type_id: Option<CampaignTypeId>,
) -> ServiceResult<()>
where
    R: CampaignTypeReader + ?Sized,
{
    let Some(id) = campaign_type_id else {
        return Ok(());
    };
    match repo.get_campaign_type_by_id(id, hub_id)? {
        Some(_) => Ok(()),
        None => Err(ServiceError::Form("Campaign type not found".to_string())),
    }
}

/// One page of campaigns, newest start date first.
pub fn list_campaigns<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: &CampaignQuery,
) -> ServiceResult<Listing<CampaignSummary>>
where
    R: CampaignReader + CampaignTypeReader + UserReader + RoleReader + ?Sized,
{
    let actor = authorize(repo, user, CAMPAIGNS_VIEW)?;
    let params = query.page_params();
    let list = campaign_list_query(actor.hub_id, query)?.paginate(params.page(), params.per_page());

    let (total, campaigns) = repo.list_campaigns(list)?;
    let items = summarize(repo, actor.hub_id, campaigns)?;

    Ok(Listing::new(items, params, total))
}

/// Campaign list plus the choices the dashboard filters need.
pub fn load_campaigns_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: CampaignQuery,
) -> ServiceResult<CampaignsPageData>
where
    R: CampaignReader + CampaignTypeReader + UserReader + RoleReader + ?Sized,
{
    let campaigns = list_campaigns(repo, user, &query)?;
    let hub_id = user.hub().map_err(|_| ServiceError::Unauthorized)?;
    let campaign_types = repo.list_campaign_types(hub_id)?;

    Ok(CampaignsPageData {
        campaigns: campaigns.into(),
        campaign_types,
        filters: query,
    })
}

pub fn get_campaign<R>(repo: &R, user: &AuthenticatedUser, id: i32) -> ServiceResult<CampaignSummary>
where
    R: CampaignReader + CampaignTypeReader + UserReader + RoleReader + ?Sized,
{
    let actor = authorize(repo, user, CAMPAIGNS_VIEW)?;
    let campaign = repo
        .get_campaign_by_id(path_id(id)?, actor.hub_id)?
        .ok_or(ServiceError::NotFound)?;

    summarize(repo, actor.hub_id, vec![campaign])?
        .pop()
        .ok_or(ServiceError::NotFound)
}

pub fn create_campaign<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: CampaignForm,
) -> ServiceResult<Campaign>
where
    R: CampaignWriter + CampaignTypeReader + UserReader + RoleReader + ?Sized,
{
    let actor = authorize(repo, user, CAMPAIGNS_MANAGE)?;
    let new = form.into_new(actor.hub_id)?;
    ensure_campaign_type(repo, actor.hub_id, new.campaign_type_id)?;

    Ok(repo.create_campaign(&new)?)
}

/// Replaces every editable field of the campaign.
pub fn update_campaign<R>(
    repo: &R,
    user: &AuthenticatedUser,
    id: i32,
    form: CampaignForm,
) -> ServiceResult<Campaign>
where
    R: CampaignWriter + CampaignTypeReader + UserReader + RoleReader + ?Sized,
{
    let actor = authorize(repo, user, CAMPAIGNS_MANAGE)?;
    let id: CampaignId = path_id(id)?;
    let updates = form.into_update()?;
    ensure_campaign_type(repo, actor.hub_id, updates.campaign_type_id)?;

    Ok(repo.update_campaign(id, actor.hub_id, &updates)?)
}

/// Deletes the campaign; its inquiries stay without a campaign.
pub fn delete_campaign<R>(repo: &R, user: &AuthenticatedUser, id: i32) -> ServiceResult<()>
where
    R: CampaignWriter + UserReader + RoleReader + ?Sized,
{
    let actor = authorize(repo, user, CAMPAIGNS_MANAGE)?;
    repo.delete_campaign(path_id(id)?, actor.hub_id)?;
    Ok(())
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::NaiveDate;

    use crate::domain::campaign::{Campaign, CampaignAnalytics};
    use crate::domain::types::{CampaignId, CampaignName, CampaignStatus, CampaignTypeId};
    use crate::services::access::test_support::{hub, now};

    pub fn campaign(id: i32, type_id: Option<i32>) -> Campaign {
        Campaign {
            id: CampaignId::new(id).unwrap(),
            hub_id: hub(),
            campaign_type_id: type_id.map(|t| CampaignTypeId::new(t).unwrap()),
            name: CampaignName::new(format!("Campaign {id}")).unwrap(),
            description: None,
            status: CampaignStatus::Active,
            start_date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            end_date: None,
            budget: None,
            analytics: CampaignAnalytics::default(),
            created_at: now(),
            updated_at: now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::fixtures::campaign;
    use super::*;
    use crate::domain::campaign_type::CampaignType;
    use crate::domain::types::CampaignTypeName;
    use crate::services::access::test_support::*;

    fn facebook() -> CampaignType {
        CampaignType {
            id: CampaignTypeId::new(2).unwrap(),
            hub_id: hub(),
            name: CampaignTypeName::new("Facebook").unwrap(),
            description: None,
            is_active: true,
            created_at: now(),
            updated_at: now(),
        }
    }

    fn form(body: &str) -> CampaignForm {
        serde_html_form::from_str(body).unwrap()
    }

    #[test]
    fn list_attaches_type_names_and_counts() {
        let mut repo = repo_for_member(&[CAMPAIGNS_VIEW]);
        repo.expect_list_campaigns()
            .withf(|q| {
                q.status == Some(CampaignStatus::Active)
                    && q.search.as_deref() == Some("open")
                    && q.pagination.map(|p| (p.page, p.per_page)) == Some((2, 1))
            })
            .returning(|_| Ok((3, vec![campaign(5, Some(2))])));
        repo.expect_list_campaign_types()
            .returning(|_| Ok(vec![facebook()]));
        repo.expect_count_inquiries_by_campaign().returning(|_, ids| {
            Ok(ids.iter().map(|id| (*id, 4)).collect::<HashMap<_, _>>())
        });

        let query = CampaignQuery {
            search: Some("open".into()),
            status: Some("active".into()),
            page: Some(2),
            per_page: Some(1),
            ..Default::default()
        };
        let listing = list_campaigns(&repo, &member(), &query).unwrap();

        assert_eq!(listing.items[0].campaign_type_name.as_deref(), Some("Facebook"));
        assert_eq!(listing.items[0].inquiry_count, 4);
        assert_eq!(listing.pagination.total, 3);
        assert!(listing.pagination.has_more);
    }

    #[test]
    fn unknown_status_filter_is_rejected() {
        let repo = repo_for_member(&[CAMPAIGNS_VIEW]);
        let query = CampaignQuery {
            status: Some("ARCHIVED".into()),
            ..Default::default()
        };

        let result = list_campaigns(&repo, &member(), &query);

        assert!(matches!(result, Err(ServiceError::Validation(_))));
    }

    #[test]
    fn create_checks_campaign_type_ownership() {
        let mut repo = repo_for_member(&[CAMPAIGNS_MANAGE]);
        repo.expect_get_campaign_type_by_id()
            .returning(|_, _| Ok(None));
        repo.expect_create_campaign().never();

        let result = create_campaign(
            &repo,
            &member(),
            form("name=Spring&start_date=2025-03-01&campaign_type_id=9"),
        );

        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[test]
    fn create_returns_stored_campaign() {
        let mut repo = repo_for_admin();
        repo.expect_create_campaign()
            .withf(|new| new.name.as_str() == "Spring")
            .returning(|_| Ok(campaign(8, None)));

        let created =
            create_campaign(&repo, &admin(), form("name=Spring&start_date=2025-03-01")).unwrap();

        assert_eq!(created.id.get(), 8);
    }

    #[test]
    fn invalid_period_writes_nothing() {
        let mut repo = repo_for_admin();
        repo.expect_update_campaign().never();

        let result = update_campaign(
            &repo,
            &admin(),
            8,
            form("name=Spring&start_date=2025-03-10&end_date=2025-03-01"),
        );

        assert!(matches!(result, Err(ServiceError::Validation(_))));
    }

    #[test]
    fn missing_campaign_is_not_found() {
        let mut repo = repo_for_admin();
        repo.expect_get_campaign_by_id().returning(|_, _| Ok(None));

        assert!(matches!(
            get_campaign(&repo, &admin(), 44),
            Err(ServiceError::NotFound)
        ));
    }
}

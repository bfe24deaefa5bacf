//! CSV exports of the campaign and inquiry lists.
//!
//! Exports take the list filters but ignore paging: every matching row is
//! written.

use serde::Serialize;

use crate::domain::auth::AuthenticatedUser;
use crate::dto::campaigns::{CampaignQuery, CampaignSummary};
use crate::dto::inquiries::{InquiryQuery, InquirySummary};
use crate::repository::{
    CampaignListQuery, CampaignReader, CampaignTypeReader, InquiryReader, RoleReader,
    UserListQuery, UserReader,
};
use crate::services::access::{REPORTS_EXPORT, authorize};
use crate::services::campaigns::{campaign_list_query, summarize};
use crate::services::inquiries::inquiry_list_query;
use crate::services::{ServiceError, ServiceResult};

#[derive(Serialize)]
struct CampaignRow<'a> {
    id: i32,
    name: &'a str,
    campaign_type: Option<&'a str>,
    status: &'a str,
    start_date: String,
    end_date: Option<String>,
    budget: Option<f64>,
    impressions: Option<i64>,
    clicks: Option<i64>,
    conversions: Option<i64>,
    inquiries: usize,
}

impl<'a> From<&'a CampaignSummary> for CampaignRow<'a> {
    fn from(summary: &'a CampaignSummary) -> Self {
        let campaign = &summary.campaign;
        let analytics = &campaign.analytics;
        Self {
            id: campaign.id.get(),
            name: campaign.name.as_str(),
            campaign_type: summary.campaign_type_name.as_deref(),
            status: campaign.status.as_str(),
            start_date: campaign.start_date.to_string(),
            end_date: campaign.end_date.map(|d| d.to_string()),
            budget: campaign.budget.map(|b| b.get()),
            impressions: analytics.impressions.map(|c| c.get()),
            clicks: analytics.clicks.map(|c| c.get()),
            conversions: analytics.conversions.map(|c| c.get()),
            inquiries: summary.inquiry_count,
        }
    }
}

#[derive(Serialize)]
struct InquiryRow<'a> {
    id: i32,
    name: &'a str,
    email: Option<&'a str>,
    phone: Option<&'a str>,
    city: Option<&'a str>,
    stage: &'a str,
    campaign: Option<&'a str>,
    assigned_to: Option<&'a str>,
    created_at: String,
}

impl<'a> From<&'a InquirySummary> for InquiryRow<'a> {
    fn from(summary: &'a InquirySummary) -> Self {
        let inquiry = &summary.inquiry;
        Self {
            id: inquiry.id.get(),
            name: inquiry.name.as_str(),
            email: inquiry.email.as_ref().map(|e| e.as_str()),
            phone: inquiry.phone.as_ref().map(|p| p.as_str()),
            city: inquiry.city.as_deref(),
            stage: inquiry.stage.as_str(),
            campaign: summary.campaign_name.as_deref(),
            assigned_to: summary.assignee_name.as_deref(),
            created_at: inquiry.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

fn write_csv<T, I>(rows: I) -> ServiceResult<Vec<u8>>
where
    T: Serialize,
    I: IntoIterator<Item = T>,
{
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer
            .serialize(row)
            .map_err(|e| ServiceError::Internal(format!("CSV export failed: {e}")))?;
    }
    writer
        .into_inner()
        .map_err(|e| ServiceError::Internal(format!("CSV export failed: {e}")))
}

pub fn export_campaigns<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: &CampaignQuery,
) -> ServiceResult<Vec<u8>>
where
    R: CampaignReader + CampaignTypeReader + UserReader + RoleReader + ?Sized,
{
    let actor = authorize(repo, user, REPORTS_EXPORT)?;
    let (_, campaigns) = repo.list_campaigns(campaign_list_query(actor.hub_id, query)?)?;
    let summaries = summarize(repo, actor.hub_id, campaigns)?;

    write_csv(summaries.iter().map(CampaignRow::from))
}

/// Live inquiries matching the filters.
pub fn export_inquiries<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: &InquiryQuery,
) -> ServiceResult<Vec<u8>>
where
    R: InquiryReader + CampaignReader + UserReader + RoleReader + ?Sized,
{
    let actor = authorize(repo, user, REPORTS_EXPORT)?;
    let (_, inquiries) = repo.list_inquiries(inquiry_list_query(actor.hub_id, query)?)?;
    let (_, campaigns) = repo.list_campaigns(CampaignListQuery::new(actor.hub_id))?;
    let (_, users) = repo.list_users(UserListQuery::new(actor.hub_id))?;

    let summaries: Vec<InquirySummary> = inquiries
        .into_iter()
        .map(|inquiry| InquirySummary {
            campaign_name: inquiry.campaign_id.and_then(|id| {
                campaigns
                    .iter()
                    .find(|c| c.id == id)
                    .map(|c| c.name.to_string())
            }),
            assignee_name: inquiry.assigned_to.and_then(|id| {
                users
                    .iter()
                    .find(|u| u.id == id)
                    .map(|u| u.name.to_string())
            }),
            inquiry,
        })
        .collect();

    write_csv(summaries.iter().map(InquiryRow::from))
}

use serde::{Deserialize, Serialize};

use crate::domain::campaign::Campaign;
use crate::domain::inquiry::{Inquiry, InquiryAnswer};
use crate::domain::interaction::Interaction;
use crate::domain::task::FollowUpTask;
use crate::domain::user::User;
use crate::forms::{optional_id, optional_text};
use crate::pagination::{PageParams, Paginated};

/// Filters shared by the live list, the trash and the CSV export.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct InquiryQuery {
    #[serde(default, deserialize_with = "optional_text")]
    pub search: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub stage: Option<String>,
    #[serde(default, deserialize_with = "optional_id")]
    pub campaign_id: Option<i32>,
    #[serde(default, deserialize_with = "optional_id")]
    pub assigned_to: Option<i32>,
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

impl InquiryQuery {
    pub fn page_params(&self) -> PageParams {
        PageParams {
            page: self.page,
            per_page: self.per_page,
        }
    }
}

/// Inquiry list row with the names the table shows.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct InquirySummary {
    #[serde(flatten)]
    pub inquiry: Inquiry,
    pub campaign_name: Option<String>,
    pub assignee_name: Option<String>,
}

/// Everything shown in the inquiry detail view, one field per tab.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct InquiryDetail {
    pub inquiry: Inquiry,
    pub campaign: Option<Campaign>,
    pub assignee: Option<User>,
    pub answers: Vec<InquiryAnswer>,
    /// Newest first.
    pub interactions: Vec<Interaction>,
    pub follow_ups: Vec<FollowUpTask>,
}

/// Choices offered by the inquiry filters and forms.
#[derive(Debug, Clone, Serialize)]
pub struct InquiryFormOptions {
    pub campaigns: Vec<Campaign>,
    pub users: Vec<User>,
}

#[derive(Debug, Serialize)]
pub struct InquiriesPageData {
    pub inquiries: Paginated<InquirySummary>,
    pub options: InquiryFormOptions,
    pub filters: InquiryQuery,
}

#[derive(Debug, Serialize)]
pub struct InquiryPageData {
    pub detail: InquiryDetail,
    pub options: InquiryFormOptions,
}

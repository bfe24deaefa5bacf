use serde::{Deserialize, Serialize};

use crate::domain::campaign::Campaign;
use crate::domain::campaign_type::CampaignType;
use crate::forms::{optional_id, optional_text};
use crate::pagination::{PageParams, Paginated};

/// Filters accepted by the campaign list, its export and the dashboard page.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CampaignQuery {
    #[serde(default, deserialize_with = "optional_text")]
    pub search: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "optional_id")]
    pub campaign_type_id: Option<i32>,
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

impl CampaignQuery {
    pub fn page_params(&self) -> PageParams {
        PageParams {
            page: self.page,
            per_page: self.per_page,
        }
    }
}

/// Campaign list row: the campaign with its type name and inquiry count.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CampaignSummary {
    #[serde(flatten)]
    pub campaign: Campaign,
    pub campaign_type_name: Option<String>,
    pub inquiry_count: usize,
}

/// Data required to render the campaigns page.
#[derive(Debug, Serialize)]
pub struct CampaignsPageData {
    pub campaigns: Paginated<CampaignSummary>,
    /// Choices for the type filter and the create/edit form.
    pub campaign_types: Vec<CampaignType>,
    pub filters: CampaignQuery,
}

//! Campaign types categorize campaigns by channel (Facebook, TV, ...).

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::types::{CampaignTypeId, CampaignTypeName, HubId, SanitizedText};

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct CampaignType {
    pub id: CampaignTypeId,
    pub hub_id: HubId,
    pub name: CampaignTypeName,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Clone, Debug)]
pub struct NewCampaignType {
    pub hub_id: HubId,
    pub name: CampaignTypeName,
    pub description: Option<SanitizedText>,
    pub is_active: bool,
}

impl NewCampaignType {
    #[must_use]
    pub fn new(
        hub_id: HubId,
        name: CampaignTypeName,
        description: Option<SanitizedText>,
        is_active: bool,
    ) -> Self {
        Self {
            hub_id,
            name,
            description,
            is_active,
        }
    }
}

/// Full replacement of the editable campaign type fields.
#[derive(Clone, Debug)]
pub struct UpdateCampaignType {
    pub name: CampaignTypeName,
    pub description: Option<SanitizedText>,
    pub is_active: bool,
}

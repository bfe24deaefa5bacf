use chrono::NaiveDate;
use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::domain::campaign::{CampaignAnalytics, CampaignPeriod, NewCampaign, UpdateCampaign};
use crate::domain::types::{
    Budget, CampaignName, CampaignStatus, CampaignTypeId, Counter, HubId, SanitizedText,
};
use crate::forms::{
    FieldResult, FormError, optional_date, optional_f64, optional_i64, optional_id, optional_text,
};

fn default_status() -> String {
    CampaignStatus::Draft.as_str().to_string()
}

/// Create/edit form for a campaign; `PUT` replaces every field.
#[derive(Debug, Clone, Deserialize, Validate)]
#[validate(schema(function = "validate_period"))]
pub struct CampaignForm {
    #[serde(default, deserialize_with = "optional_id")]
    pub campaign_type_id: Option<i32>,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[serde(default, deserialize_with = "optional_text")]
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    #[serde(default = "default_status")]
    pub status: String,
    pub start_date: NaiveDate,
    #[serde(default, deserialize_with = "optional_date")]
    pub end_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "optional_f64")]
    #[validate(range(min = 0.0))]
    pub budget: Option<f64>,
    #[serde(default, deserialize_with = "optional_i64")]
    #[validate(range(min = 0))]
    pub impressions: Option<i64>,
    #[serde(default, deserialize_with = "optional_i64")]
    #[validate(range(min = 0))]
    pub clicks: Option<i64>,
    #[serde(default, deserialize_with = "optional_i64")]
    #[validate(range(min = 0))]
    pub conversions: Option<i64>,
}

fn validate_period(form: &CampaignForm) -> Result<(), ValidationError> {
    match form.end_date {
        Some(end) if end < form.start_date => Err(ValidationError::new("end_before_start")),
        _ => Ok(()),
    }
}

/// Validated field values shared by create and update.
struct CampaignFields {
    campaign_type_id: Option<CampaignTypeId>,
    name: CampaignName,
    description: Option<SanitizedText>,
    status: CampaignStatus,
    period: CampaignPeriod,
    budget: Option<Budget>,
    analytics: CampaignAnalytics,
}

fn counter(value: Option<i64>, field: &'static str) -> Result<Option<Counter>, FormError> {
    value.map(Counter::new).transpose().field(field)
}

impl CampaignForm {
    fn fields(self) -> Result<CampaignFields, FormError> {
        self.validate()?;

        let analytics = CampaignAnalytics::new(
            counter(self.impressions, "impressions")?,
            counter(self.clicks, "clicks")?,
            counter(self.conversions, "conversions")?,
        )
        .field("analytics")?;

        Ok(CampaignFields {
            campaign_type_id: self
                .campaign_type_id
                .map(CampaignTypeId::new)
                .transpose()
                .field("campaign_type_id")?,
            name: CampaignName::new(self.name.trim()).field("name")?,
            description: SanitizedText::optional(self.description),
            status: self.status.parse().field("status")?,
            period: CampaignPeriod::new(self.start_date, self.end_date).field("end_date")?,
            budget: self.budget.map(Budget::new).transpose().field("budget")?,
            analytics,
        })
    }

    pub fn into_new(self, hub_id: HubId) -> Result<NewCampaign, FormError> {
        let fields = self.fields()?;
        Ok(NewCampaign {
            hub_id,
            campaign_type_id: fields.campaign_type_id,
            name: fields.name,
            description: fields.description,
            status: fields.status,
            period: fields.period,
            budget: fields.budget,
            analytics: fields.analytics,
        })
    }

    pub fn into_update(self) -> Result<UpdateCampaign, FormError> {
        let fields = self.fields()?;
        Ok(UpdateCampaign {
            campaign_type_id: fields.campaign_type_id,
            name: fields.name,
            description: fields.description,
            status: fields.status,
            period: fields.period,
            budget: fields.budget,
            analytics: fields.analytics,
        })
    }
}

//! Diesel models for campaigns.

use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use crate::domain::campaign::{
    Campaign as DomainCampaign, CampaignAnalytics, NewCampaign as DomainNewCampaign,
    UpdateCampaign as DomainUpdateCampaign,
};
use crate::domain::types::{
    Budget, CampaignId, CampaignName, CampaignTypeId, Counter, HubId, TypeConstraintError,
};

/// Diesel model for [`crate::domain::campaign::Campaign`].
#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::campaigns)]
pub struct Campaign {
    pub id: i32,
    pub hub_id: i32,
    pub campaign_type_id: Option<i32>,
    pub name: String,
    pub description: Option<String>,
    pub status: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub budget: Option<f64>,
    pub impressions: Option<i64>,
    pub clicks: Option<i64>,
    pub conversions: Option<i64>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::campaigns)]
pub struct NewCampaign<'a> {
    pub hub_id: i32,
    pub campaign_type_id: Option<i32>,
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub status: &'a str,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub budget: Option<f64>,
    pub impressions: Option<i64>,
    pub clicks: Option<i64>,
    pub conversions: Option<i64>,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::campaigns)]
#[diesel(treat_none_as_null = true)]
pub struct UpdateCampaign<'a> {
    pub campaign_type_id: Option<i32>,
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub status: &'a str,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub budget: Option<f64>,
    pub impressions: Option<i64>,
    pub clicks: Option<i64>,
    pub conversions: Option<i64>,
    pub updated_at: NaiveDateTime,
}

fn counter(value: Option<i64>) -> Result<Option<Counter>, TypeConstraintError> {
    value.map(Counter::new).transpose()
}

impl TryFrom<Campaign> for DomainCampaign {
    type Error = TypeConstraintError;

    fn try_from(value: Campaign) -> Result<Self, Self::Error> {
        Ok(Self {
            id: CampaignId::new(value.id)?,
            hub_id: HubId::new(value.hub_id)?,
            campaign_type_id: value.campaign_type_id.map(CampaignTypeId::new).transpose()?,
            name: CampaignName::new(value.name)?,
            description: value.description,
            status: value.status.parse()?,
            start_date: value.start_date,
            end_date: value.end_date,
            budget: value.budget.map(Budget::new).transpose()?,
            // Stored counters are shown as recorded, even if the funnel is off.
            analytics: CampaignAnalytics {
                impressions: counter(value.impressions)?,
                clicks: counter(value.clicks)?,
                conversions: counter(value.conversions)?,
            },
            created_at: value.created_at,
            updated_at: value.updated_at,
        })
    }
}

impl<'a> From<&'a DomainNewCampaign> for NewCampaign<'a> {
    fn from(value: &'a DomainNewCampaign) -> Self {
        Self {
            hub_id: value.hub_id.get(),
            campaign_type_id: value.campaign_type_id.map(CampaignTypeId::get),
            name: value.name.as_str(),
            description: value.description.as_ref().map(|d| d.as_str()),
            status: value.status.as_str(),
            start_date: value.period.start(),
            end_date: value.period.end(),
            budget: value.budget.map(Budget::get),
            impressions: value.analytics.impressions.map(Counter::get),
            clicks: value.analytics.clicks.map(Counter::get),
            conversions: value.analytics.conversions.map(Counter::get),
        }
    }
}

impl<'a> From<&'a DomainUpdateCampaign> for UpdateCampaign<'a> {
    fn from(value: &'a DomainUpdateCampaign) -> Self {
        Self {
            campaign_type_id: value.campaign_type_id.map(CampaignTypeId::get),
            name: value.name.as_str(),
            description: value.description.as_ref().map(|d| d.as_str()),
            status: value.status.as_str(),
            start_date: value.period.start(),
            end_date: value.period.end(),
            budget: value.budget.map(Budget::get),
            impressions: value.analytics.impressions.map(Counter::get),
            clicks: value.analytics.clicks.map(Counter::get),
            conversions: value.analytics.conversions.map(Counter::get),
            updated_at: chrono::Utc::now().naive_utc(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::campaign::CampaignPeriod;
    use crate::domain::types::CampaignStatus;

    fn db_campaign() -> Campaign {
        let now = chrono::Utc::now().naive_utc();
        Campaign {
            id: 4,
            hub_id: 1,
            campaign_type_id: Some(2),
            name: "Spring intake".to_string(),
            description: None,
            status: "ACTIVE".to_string(),
            start_date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            end_date: None,
            budget: Some(1500.0),
            impressions: Some(1000),
            clicks: Some(80),
            conversions: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn converts_from_db_to_domain() {
        let domain = DomainCampaign::try_from(db_campaign()).expect("valid campaign");

        assert_eq!(domain.id.get(), 4);
        assert_eq!(domain.status, CampaignStatus::Active);
        assert_eq!(domain.campaign_type_id.map(CampaignTypeId::get), Some(2));
        assert_eq!(domain.budget.map(Budget::get), Some(1500.0));
        assert_eq!(domain.analytics.clicks.map(Counter::get), Some(80));
    }

    #[test]
    fn rejects_unknown_status_from_db() {
        let mut db = db_campaign();
        db.status = "ARCHIVED".to_string();

        assert!(DomainCampaign::try_from(db).is_err());
    }

    #[test]
    fn converts_from_domain_to_insertable() {
        let start = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 4, 1).unwrap();
        let domain = DomainNewCampaign {
            hub_id: HubId::new(1).unwrap(),
            campaign_type_id: None,
            name: CampaignName::new("Open day").unwrap(),
            description: None,
            status: CampaignStatus::Draft,
            period: CampaignPeriod::new(start, Some(end)).unwrap(),
            budget: None,
            analytics: CampaignAnalytics::default(),
        };

        let insertable: NewCampaign = (&domain).into();

        assert_eq!(insertable.status, "DRAFT");
        assert_eq!(insertable.start_date, start);
        assert_eq!(insertable.end_date, Some(end));
        assert_eq!(insertable.campaign_type_id, None);
        assert_eq!(insertable.impressions, None);
    }
}

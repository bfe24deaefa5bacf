//! Diesel models for campaign types.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::campaign_type::{
    CampaignType as DomainCampaignType, NewCampaignType as DomainNewCampaignType,
    UpdateCampaignType as DomainUpdateCampaignType,
};
use crate::domain::types::{CampaignTypeId, CampaignTypeName, HubId, TypeConstraintError};

/// Diesel model for [`crate::domain::campaign_type::CampaignType`].
#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::campaign_types)]
pub struct CampaignType {
    pub id: i32,
    pub hub_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::campaign_types)]
pub struct NewCampaignType<'a> {
    pub hub_id: i32,
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub is_active: bool,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::campaign_types)]
#[diesel(treat_none_as_null = true)]
pub struct UpdateCampaignType<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub is_active: bool,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<CampaignType> for DomainCampaignType {
    type Error = TypeConstraintError;

    fn try_from(value: CampaignType) -> Result<Self, Self::Error> {
        Ok(Self {
            id: CampaignTypeId::new(value.id)?,
            hub_id: HubId::new(value.hub_id)?,
            name: CampaignTypeName::new(value.name)?,
            description: value.description,
            is_active: value.is_active,
            created_at: value.created_at,
            updated_at: value.updated_at,
        })
    }
}

impl<'a> From<&'a DomainNewCampaignType> for NewCampaignType<'a> {
    fn from(value: &'a DomainNewCampaignType) -> Self {
        Self {
            hub_id: value.hub_id.get(),
            name: value.name.as_str(),
            description: value.description.as_ref().map(|d| d.as_str()),
            is_active: value.is_active,
        }
    }
}

impl<'a> From<&'a DomainUpdateCampaignType> for UpdateCampaignType<'a> {
    fn from(value: &'a DomainUpdateCampaignType) -> Self {
        Self {
            name: value.name.as_str(),
            description: value.description.as_ref().map(|d| d.as_str()),
            is_active: value.is_active,
            updated_at: chrono::Utc::now().naive_utc(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::SanitizedText;

    #[test]
    fn converts_from_db_to_domain() {
        let now = chrono::Utc::now().naive_utc();
        let db = CampaignType {
            id: 3,
            hub_id: 1,
            name: "Facebook".to_string(),
            description: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        let domain = DomainCampaignType::try_from(db).expect("valid campaign type");

        assert_eq!(domain.id.get(), 3);
        assert_eq!(domain.name.as_str(), "Facebook");
        assert!(domain.is_active);
    }

    #[test]
    fn rejects_blank_names_from_db() {
        let now = chrono::Utc::now().naive_utc();
        let db = CampaignType {
            id: 3,
            hub_id: 1,
            name: "  ".to_string(),
            description: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        assert!(DomainCampaignType::try_from(db).is_err());
    }

    #[test]
    fn converts_from_domain_to_insertable() {
        let domain = DomainNewCampaignType::new(
            HubId::new(9).unwrap(),
            CampaignTypeName::new("TV").unwrap(),
            SanitizedText::optional(Some("Prime time")),
            false,
        );

        let insertable: NewCampaignType = (&domain).into();

        assert_eq!(insertable.hub_id, 9);
        assert_eq!(insertable.name, "TV");
        assert_eq!(insertable.description, Some("Prime time"));
        assert!(!insertable.is_active);
    }
}

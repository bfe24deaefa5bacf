use serde::Deserialize;
use validator::Validate;

use crate::domain::campaign_type::{NewCampaignType, UpdateCampaignType};
use crate::domain::types::{CampaignTypeName, HubId, SanitizedText};
use crate::forms::{FieldResult, FormError, default_true, flag, optional_text};

/// Create/edit form for a campaign type.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CampaignTypeForm {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[serde(default, deserialize_with = "optional_text")]
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    #[serde(default = "default_true", deserialize_with = "flag")]
    pub is_active: bool,
}

impl CampaignTypeForm {
    fn name(&self) -> Result<CampaignTypeName, FormError> {
        CampaignTypeName::new(self.name.trim()).field("name")
    }

    pub fn into_new(self, hub_id: HubId) -> Result<NewCampaignType, FormError> {
        self.validate()?;
        Ok(NewCampaignType::new(
            hub_id,
            self.name()?,
            SanitizedText::optional(self.description),
            self.is_active,
        ))
    }

    pub fn into_update(self) -> Result<UpdateCampaignType, FormError> {
        self.validate()?;
        Ok(UpdateCampaignType {
            name: self.name()?,
            description: SanitizedText::optional(self.description),
            is_active: self.is_active,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_body_defaults_to_active() {
        let form: CampaignTypeForm = serde_json::from_str(r#"{"name": " Radio "}"#).unwrap();
        let new = form.into_new(HubId::new(1).unwrap()).unwrap();

        assert_eq!(new.name.as_str(), "Radio");
        assert!(new.is_active);
        assert!(new.description.is_none());
    }

    #[test]
    fn blank_name_is_rejected() {
        let form: CampaignTypeForm =
            serde_html_form::from_str("name=&is_active=false").unwrap();

        assert!(matches!(form.into_update(), Err(FormError::Validation(_))));
    }

    #[test]
    fn overlong_name_is_rejected() {
        let form = CampaignTypeForm {
            name: "x".repeat(101),
            description: None,
            is_active: true,
        };

        assert!(form.into_new(HubId::new(1).unwrap()).is_err());
    }
}

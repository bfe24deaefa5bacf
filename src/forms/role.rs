use serde::Deserialize;
use validator::Validate;

use crate::domain::role::{NewRole, UpdateRole};
use crate::domain::types::{HubId, PermissionId, RoleName, SanitizedText};
use crate::forms::{FieldResult, FormError, optional_text};

/// Role form; HTML submits one `permission_ids` input per checked box.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RoleForm {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[serde(default, deserialize_with = "optional_text")]
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    #[serde(default)]
    pub permission_ids: Vec<i32>,
}

impl RoleForm {
    /// Distinct permission ids in ascending order.
    fn permission_ids(&self) -> Result<Vec<PermissionId>, FormError> {
        let mut ids = self
            .permission_ids
            .iter()
            .map(|id| PermissionId::new(*id))
            .collect::<Result<Vec<_>, _>>()
            .field("permission_ids")?;
        ids.sort();
        ids.dedup();
        Ok(ids)
    }

    pub fn into_new(self, hub_id: HubId) -> Result<NewRole, FormError> {
        let update = self.into_update()?;
        Ok(NewRole {
            hub_id,
            name: update.name,
            description: update.description,
            permission_ids: update.permission_ids,
        })
    }

    pub fn into_update(self) -> Result<UpdateRole, FormError> {
        self.validate()?;
        Ok(UpdateRole {
            name: RoleName::new(self.name.trim()).field("name")?,
            permission_ids: self.permission_ids()?,
            description: SanitizedText::optional(self.description).map(SanitizedText::into_inner),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_permission_inputs_are_collected() {
        let form: RoleForm = serde_html_form::from_str(
            "name=Counsellor&permission_ids=3&permission_ids=1&permission_ids=3",
        )
        .unwrap();

        let new = form.into_new(HubId::new(1).unwrap()).unwrap();

        let ids: Vec<i32> = new.permission_ids.iter().map(|id| id.get()).collect();
        assert_eq!(ids, vec![1, 3]);
        assert!(new.description.is_none());
    }

    #[test]
    fn invalid_permission_id_is_rejected() {
        let form: RoleForm =
            serde_json::from_str(r#"{"name": "Counsellor", "permission_ids": [0]}"#).unwrap();

        assert!(form.into_update().is_err());
    }
}

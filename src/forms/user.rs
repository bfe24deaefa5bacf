use serde::Deserialize;
use validator::Validate;

use crate::domain::types::{HubId, RoleId, UserEmail, UserName};
use crate::domain::user::{NewUser, UpdateUser};
use crate::forms::{FieldResult, FormError, default_true, flag, optional_id};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UserForm {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[serde(default, deserialize_with = "optional_id")]
    pub role_id: Option<i32>,
    #[serde(default = "default_true", deserialize_with = "flag")]
    pub is_active: bool,
}

impl UserForm {
    pub fn role_id(&self) -> Result<Option<RoleId>, FormError> {
        self.role_id.map(RoleId::new).transpose().field("role_id")
    }

    pub fn into_new(self, hub_id: HubId) -> Result<NewUser, FormError> {
        let update = self.into_update()?;
        Ok(NewUser::new(
            hub_id,
            update.name,
            update.email,
            update.role_id,
            update.is_active,
        ))
    }

    pub fn into_update(self) -> Result<UpdateUser, FormError> {
        self.validate()?;
        Ok(UpdateUser {
            name: UserName::new(self.name.trim()).field("name")?,
            email: UserEmail::new(self.email.as_str()).field("email")?,
            role_id: self.role_id()?,
            is_active: self.is_active,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_is_normalized() {
        let form: UserForm = serde_html_form::from_str(
            "name=Dana&email=Dana%40Example.com&role_id=2&is_active=false",
        )
        .unwrap();

        let new = form.into_new(HubId::new(1).unwrap()).unwrap();

        assert_eq!(new.email.as_str(), "dana@example.com");
        assert_eq!(new.role_id.map(RoleId::get), Some(2));
        assert!(!new.is_active);
    }

    #[test]
    fn invalid_email_is_rejected() {
        let form: UserForm =
            serde_json::from_str(r#"{"name": "Dana", "email": "dana"}"#).unwrap();

        let err = form.into_update().unwrap_err();

        assert!(err.details().contains_key("email"));
    }
}

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::types::{HubId, RoleId, UserEmail, UserId, UserName};

/// Hub staff member; tasks and inquiries are assigned to users.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct User {
    pub id: UserId,
    pub hub_id: HubId,
    pub name: UserName,
    pub email: UserEmail,
    pub role_id: Option<RoleId>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Clone, Debug)]
pub struct NewUser {
    pub hub_id: HubId,
    pub name: UserName,
    pub email: UserEmail,
    pub role_id: Option<RoleId>,
    pub is_active: bool,
}

impl NewUser {
    #[must_use]
    pub fn new(
        hub_id: HubId,
        name: UserName,
        email: UserEmail,
        role_id: Option<RoleId>,
        is_active: bool,
    ) -> Self {
        Self {
            hub_id,
            name,
            email,
            role_id,
            is_active,
        }
    }
}

#[derive(Clone, Debug)]
pub struct UpdateUser {
    pub name: UserName,
    pub email: UserEmail,
    pub role_id: Option<RoleId>,
    pub is_active: bool,
}

//! DTOs for the user, role and permission administration pages.

use serde::{Deserialize, Serialize};

use crate::domain::role::{Permission, Role};
use crate::domain::user::User;
use crate::forms::{optional_flag, optional_id, optional_text};
use crate::pagination::{PageParams, Paginated};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct UserQuery {
    #[serde(default, deserialize_with = "optional_text")]
    pub search: Option<String>,
    #[serde(default, deserialize_with = "optional_id")]
    pub role_id: Option<i32>,
    #[serde(default, deserialize_with = "optional_flag")]
    pub active: Option<bool>,
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

impl UserQuery {
    pub fn page_params(&self) -> PageParams {
        PageParams {
            page: self.page,
            per_page: self.per_page,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct UserSummary {
    #[serde(flatten)]
    pub user: User,
    pub role_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UsersPageData {
    pub users: Paginated<UserSummary>,
    pub roles: Vec<Role>,
    pub filters: UserQuery,
}

#[derive(Debug, Serialize)]
pub struct RolesPageData {
    pub roles: Vec<Role>,
    pub permissions: Vec<Permission>,
}

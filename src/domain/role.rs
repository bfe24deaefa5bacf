//! Roles group permissions; permissions form a global catalogue.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::types::{HubId, PermissionCode, PermissionId, RoleId, RoleName};

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct Permission {
    pub id: PermissionId,
    pub code: PermissionCode,
    pub description: String,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Role {
    pub id: RoleId,
    pub hub_id: HubId,
    pub name: RoleName,
    pub description: Option<String>,
    pub permissions: Vec<Permission>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Role {
    pub fn grants(&self, code: &str) -> bool {
        self.permissions.iter().any(|p| p.code.as_str() == code)
    }
}

#[derive(Clone, Debug)]
pub struct NewRole {
    pub hub_id: HubId,
    pub name: RoleName,
    pub description: Option<String>,
    pub permission_ids: Vec<PermissionId>,
}

/// Full replacement of the role, permission set included.
#[derive(Clone, Debug)]
pub struct UpdateRole {
    pub name: RoleName,
    pub description: Option<String>,
    pub permission_ids: Vec<PermissionId>,
}

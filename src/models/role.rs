use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::role::{
    NewRole as DomainNewRole, Permission as DomainPermission, Role as DomainRole,
    UpdateRole as DomainUpdateRole,
};
use crate::domain::types::{
    HubId, PermissionCode, PermissionId, RoleId, RoleName, TypeConstraintError,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::permissions)]
pub struct Permission {
    pub id: i32,
    pub code: String,
    pub description: String,
}

/// Diesel model for [`crate::domain::role::Role`] without its permissions.
#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::roles)]
pub struct Role {
    pub id: i32,
    pub hub_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::roles)]
pub struct NewRole<'a> {
    pub hub_id: i32,
    pub name: &'a str,
    pub description: Option<&'a str>,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::roles)]
#[diesel(treat_none_as_null = true)]
pub struct UpdateRole<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::role_permissions)]
pub struct NewRolePermission {
    pub role_id: i32,
    pub permission_id: i32,
}

impl NewRolePermission {
    pub fn rows(role_id: i32, permission_ids: &[PermissionId]) -> Vec<Self> {
        permission_ids
            .iter()
            .map(|permission_id| Self {
                role_id,
                permission_id: permission_id.get(),
            })
            .collect()
    }
}

impl TryFrom<Permission> for DomainPermission {
    type Error = TypeConstraintError;

    fn try_from(value: Permission) -> Result<Self, Self::Error> {
        Ok(Self {
            id: PermissionId::new(value.id)?,
            code: PermissionCode::new(value.code)?,
            description: value.description,
        })
    }
}

/// A role row together with the permissions it grants.
impl TryFrom<(Role, Vec<Permission>)> for DomainRole {
    type Error = TypeConstraintError;

    fn try_from((value, permissions): (Role, Vec<Permission>)) -> Result<Self, Self::Error> {
        Ok(Self {
            id: RoleId::new(value.id)?,
            hub_id: HubId::new(value.hub_id)?,
            name: RoleName::new(value.name)?,
            description: value.description,
            permissions: permissions
                .into_iter()
                .map(DomainPermission::try_from)
                .collect::<Result<_, _>>()?,
            created_at: value.created_at,
            updated_at: value.updated_at,
        })
    }
}

impl<'a> From<&'a DomainNewRole> for NewRole<'a> {
    fn from(value: &'a DomainNewRole) -> Self {
        Self {
            hub_id: value.hub_id.get(),
            name: value.name.as_str(),
            description: value.description.as_deref(),
        }
    }
}

impl<'a> From<&'a DomainUpdateRole> for UpdateRole<'a> {
    fn from(value: &'a DomainUpdateRole) -> Self {
        Self {
            name: value.name.as_str(),
            description: value.description.as_deref(),
            updated_at: chrono::Utc::now().naive_utc(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_with_permissions_into_domain() {
        let now = chrono::Utc::now().naive_utc();
        let role = Role {
            id: 1,
            hub_id: 1,
            name: "Operator".to_string(),
            description: None,
            created_at: now,
            updated_at: now,
        };
        let permissions = vec![Permission {
            id: 3,
            code: "inquiries.view".to_string(),
            description: "View inquiries".to_string(),
        }];

        let domain = DomainRole::try_from((role, permissions)).unwrap();

        assert!(domain.grants("inquiries.view"));
        assert!(!domain.grants("inquiries.manage"));
    }

    #[test]
    fn permission_rows_for_role() {
        let ids = vec![PermissionId::new(2).unwrap(), PermissionId::new(5).unwrap()];

        let rows = NewRolePermission::rows(7, &ids);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].permission_id, 5);
        assert!(rows.iter().all(|row| row.role_id == 7));
    }
}

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::types::{HubId, RoleId, TypeConstraintError, UserEmail, UserId, UserName};
use crate::domain::user::{
    NewUser as DomainNewUser, UpdateUser as DomainUpdateUser, User as DomainUser,
};

/// Diesel model for [`crate::domain::user::User`].
#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::users)]
pub struct User {
    pub id: i32,
    pub hub_id: i32,
    pub name: String,
    pub email: String,
    pub role_id: Option<i32>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::users)]
pub struct NewUser<'a> {
    pub hub_id: i32,
    pub name: &'a str,
    pub email: &'a str,
    pub role_id: Option<i32>,
    pub is_active: bool,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::users)]
#[diesel(treat_none_as_null = true)]
pub struct UpdateUser<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub role_id: Option<i32>,
    pub is_active: bool,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<User> for DomainUser {
    type Error = TypeConstraintError;

    fn try_from(value: User) -> Result<Self, Self::Error> {
        Ok(Self {
            id: UserId::new(value.id)?,
            hub_id: HubId::new(value.hub_id)?,
            name: UserName::new(value.name)?,
            email: UserEmail::new(value.email)?,
            role_id: value.role_id.map(RoleId::new).transpose()?,
            is_active: value.is_active,
            created_at: value.created_at,
            updated_at: value.updated_at,
        })
    }
}

impl<'a> From<&'a DomainNewUser> for NewUser<'a> {
    fn from(value: &'a DomainNewUser) -> Self {
        Self {
            hub_id: value.hub_id.get(),
            name: value.name.as_str(),
            email: value.email.as_str(),
            role_id: value.role_id.map(RoleId::get),
            is_active: value.is_active,
        }
    }
}

impl<'a> From<&'a DomainUpdateUser> for UpdateUser<'a> {
    fn from(value: &'a DomainUpdateUser) -> Self {
        Self {
            name: value.name.as_str(),
            email: value.email.as_str(),
            role_id: value.role_id.map(RoleId::get),
            is_active: value.is_active,
            updated_at: chrono::Utc::now().naive_utc(),
        }
    }
}

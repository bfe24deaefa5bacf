use diesel::prelude::*;
use diesel::sqlite::Sqlite;

use crate::domain::types::{HubId, UserEmail, UserId};
use crate::domain::user::{NewUser, UpdateUser, User};
use crate::models::user::{NewUser as DbNewUser, UpdateUser as DbUpdateUser, User as DbUser};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{
    DieselRepository, LIKE_ESCAPE, UserListQuery, UserReader, UserWriter, like_pattern,
};
use crate::schema::users;

fn filtered(query: &UserListQuery) -> users::BoxedQuery<'static, Sqlite> {
    let mut items = users::table
        .filter(users::hub_id.eq(query.hub_id.get()))
        .into_boxed::<Sqlite>();

    if let Some(term) = query.search.as_deref().filter(|t| !t.trim().is_empty()) {
        let pattern = like_pattern(term);
        items = items.filter(
            users::name
                .like(pattern.clone())
                .escape(LIKE_ESCAPE)
                .or(users::email.like(pattern).escape(LIKE_ESCAPE)),
        );
    }
    if let Some(role_id) = query.role_id {
        items = items.filter(users::role_id.eq(role_id.get()));
    }
    if let Some(active) = query.active {
        items = items.filter(users::is_active.eq(active));
    }

    items
}

fn to_domain(row: DbUser) -> RepositoryResult<User> {
    User::try_from(row).map_err(RepositoryError::from)
}

impl UserReader for DieselRepository {
    fn list_users(&self, query: UserListQuery) -> RepositoryResult<(usize, Vec<User>)> {
        let mut conn = self.conn()?;

        let total = filtered(&query).count().get_result::<i64>(&mut conn)?;

        let mut items = filtered(&query)
            .order((users::name.asc(), users::id.asc()))
            .select(DbUser::as_select());
        if let Some(pagination) = &query.pagination {
            items = items.limit(pagination.limit()).offset(pagination.offset());
        }

        let users = items
            .load::<DbUser>(&mut conn)?
            .into_iter()
            .map(to_domain)
            .collect::<RepositoryResult<Vec<_>>>()?;

        Ok((total as usize, users))
    }

    fn get_user_by_id(&self, id: UserId, hub_id: HubId) -> RepositoryResult<Option<User>> {
        let mut conn = self.conn()?;
        let row = users::table
            .filter(users::id.eq(id.get()))
            .filter(users::hub_id.eq(hub_id.get()))
            .select(DbUser::as_select())
            .first::<DbUser>(&mut conn)
            .optional()?;

        row.map(to_domain).transpose()
    }

    fn get_user_by_email(
        &self,
        email: &UserEmail,
        hub_id: HubId,
    ) -> RepositoryResult<Option<User>> {
        let mut conn = self.conn()?;
        let row = users::table
            .filter(users::email.eq(email.as_str()))
            .filter(users::hub_id.eq(hub_id.get()))
            .select(DbUser::as_select())
            .first::<DbUser>(&mut conn)
            .optional()?;

        row.map(to_domain).transpose()
    }
}

impl UserWriter for DieselRepository {
    fn create_user(&self, new: &NewUser) -> RepositoryResult<User> {
        let mut conn = self.conn()?;
        let insertable: DbNewUser = new.into();
        let row = diesel::insert_into(users::table)
            .values(&insertable)
            .returning(DbUser::as_returning())
            .get_result::<DbUser>(&mut conn)?;

        to_domain(row)
    }

    fn update_user(
        &self,
        id: UserId,
        hub_id: HubId,
        updates: &UpdateUser,
    ) -> RepositoryResult<User> {
        let mut conn = self.conn()?;
        let changes: DbUpdateUser = updates.into();
        let row = diesel::update(
            users::table
                .filter(users::id.eq(id.get()))
                .filter(users::hub_id.eq(hub_id.get())),
        )
        .set(&changes)
        .returning(DbUser::as_returning())
        .get_result::<DbUser>(&mut conn)?;

        to_domain(row)
    }

    fn delete_user(&self, id: UserId, hub_id: HubId) -> RepositoryResult<()> {
        let mut conn = self.conn()?;
        // Assignments on inquiries and tasks fall back to NULL.
        let deleted = diesel::delete(
            users::table
                .filter(users::id.eq(id.get()))
                .filter(users::hub_id.eq(hub_id.get())),
        )
        .execute(&mut conn)?;

        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

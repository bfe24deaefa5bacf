use diesel::dsl::count_star;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::domain::role::{NewRole, Permission, Role, UpdateRole};
use crate::domain::types::{HubId, RoleId};
use crate::models::role::{
    NewRole as DbNewRole, NewRolePermission as DbNewRolePermission, Permission as DbPermission,
    Role as DbRole, UpdateRole as DbUpdateRole,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, RoleReader, RoleWriter};
use crate::schema::{permissions, role_permissions, roles};

/// Permissions granted to each of `role_ids`, tagged with the role id.
fn granted_permissions(
    conn: &mut SqliteConnection,
    role_ids: &[i32],
) -> QueryResult<Vec<(i32, DbPermission)>> {
    role_permissions::table
        .inner_join(permissions::table)
        .filter(role_permissions::role_id.eq_any(role_ids))
        .order(permissions::code.asc())
        .select((role_permissions::role_id, DbPermission::as_select()))
        .load::<(i32, DbPermission)>(conn)
}

fn assemble(roles: Vec<DbRole>, granted: Vec<(i32, DbPermission)>) -> RepositoryResult<Vec<Role>> {
    roles
        .into_iter()
        .map(|role| {
            let permissions = granted
                .iter()
                .filter(|(role_id, _)| *role_id == role.id)
                .map(|(_, permission)| permission.clone())
                .collect::<Vec<_>>();
            Role::try_from((role, permissions)).map_err(RepositoryError::from)
        })
        .collect()
}

fn load_role(conn: &mut SqliteConnection, role: DbRole) -> RepositoryResult<Role> {
    let granted = granted_permissions(conn, &[role.id])?;
    assemble(vec![role], granted)?
        .pop()
        .ok_or(RepositoryError::NotFound)
}

impl RoleReader for DieselRepository {
    fn list_roles(&self, hub_id: HubId) -> RepositoryResult<Vec<Role>> {
        let mut conn = self.conn()?;
        let rows = roles::table
            .filter(roles::hub_id.eq(hub_id.get()))
            .order((roles::name.asc(), roles::id.asc()))
            .select(DbRole::as_select())
            .load::<DbRole>(&mut conn)?;

        let role_ids = rows.iter().map(|role| role.id).collect::<Vec<_>>();
        let granted = granted_permissions(&mut conn, &role_ids)?;

        assemble(rows, granted)
    }

    fn get_role_by_id(&self, id: RoleId, hub_id: HubId) -> RepositoryResult<Option<Role>> {
        let mut conn = self.conn()?;
        let row = roles::table
            .filter(roles::id.eq(id.get()))
            .filter(roles::hub_id.eq(hub_id.get()))
            .select(DbRole::as_select())
            .first::<DbRole>(&mut conn)
            .optional()?;

        match row {
            Some(row) => Ok(Some(load_role(&mut conn, row)?)),
            None => Ok(None),
        }
    }

    fn list_permissions(&self) -> RepositoryResult<Vec<Permission>> {
        let mut conn = self.conn()?;
        let rows = permissions::table
            .order(permissions::code.asc())
            .select(DbPermission::as_select())
            .load::<DbPermission>(&mut conn)?;

        rows.into_iter()
            .map(|row| Permission::try_from(row).map_err(RepositoryError::from))
            .collect()
    }

    fn count_users_with_role(&self, id: RoleId) -> RepositoryResult<usize> {
        use crate::schema::users;

        let mut conn = self.conn()?;
        let count = users::table
            .filter(users::role_id.eq(id.get()))
            .select(count_star())
            .first::<i64>(&mut conn)?;

        Ok(count as usize)
    }
}

impl RoleWriter for DieselRepository {
    fn create_role(&self, new: &NewRole) -> RepositoryResult<Role> {
        let mut conn = self.conn()?;
        let insertable: DbNewRole = new.into();

        conn.transaction::<Role, RepositoryError, _>(|conn| {
            let row = diesel::insert_into(roles::table)
                .values(&insertable)
                .returning(DbRole::as_returning())
                .get_result::<DbRole>(conn)?;

            let grants = DbNewRolePermission::rows(row.id, &new.permission_ids);
            if !grants.is_empty() {
                diesel::insert_into(role_permissions::table)
                    .values(&grants)
                    .execute(conn)?;
            }

            load_role(conn, row)
        })
    }

    fn update_role(
        &self,
        id: RoleId,
        hub_id: HubId,
        updates: &UpdateRole,
    ) -> RepositoryResult<Role> {
        let mut conn = self.conn()?;
        let changes: DbUpdateRole = updates.into();

        conn.transaction::<Role, RepositoryError, _>(|conn| {
            let row = diesel::update(
                roles::table
                    .filter(roles::id.eq(id.get()))
                    .filter(roles::hub_id.eq(hub_id.get())),
            )
            .set(&changes)
            .returning(DbRole::as_returning())
            .get_result::<DbRole>(conn)?;

            diesel::delete(role_permissions::table.filter(role_permissions::role_id.eq(row.id)))
                .execute(conn)?;
            let grants = DbNewRolePermission::rows(row.id, &updates.permission_ids);
            if !grants.is_empty() {
                diesel::insert_into(role_permissions::table)
                    .values(&grants)
                    .execute(conn)?;
            }

            load_role(conn, row)
        })
    }

    fn delete_role(&self, id: RoleId, hub_id: HubId) -> RepositoryResult<()> {
        let mut conn = self.conn()?;
        let deleted = diesel::delete(
            roles::table
                .filter(roles::id.eq(id.get()))
                .filter(roles::hub_id.eq(hub_id.get())),
        )
        .execute(&mut conn)?;

        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

use chrono::Utc;
use diesel::prelude::*;
use diesel::sqlite::{Sqlite, SqliteConnection};

use crate::domain::task::{
    BoardTask, FollowUpTask, NewFollowUpTask, NewRegularTask, RegularTask, TaskKind, TaskRef,
    UpdateFollowUpTask, UpdateRegularTask,
};
use crate::domain::types::{HubId, TaskId, TaskStatus};
use crate::models::task::{
    FollowUpTask as DbFollowUpTask, NewFollowUpTask as DbNewFollowUpTask,
    NewRegularTask as DbNewRegularTask, RegularTask as DbRegularTask,
    UpdateFollowUpTask as DbUpdateFollowUpTask, UpdateRegularTask as DbUpdateRegularTask,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{
    DieselRepository, FollowUpTaskListQuery, RegularTaskListQuery, TaskReader, TaskWriter,
};
use crate::schema::{follow_up_tasks, inquiries, tasks};

/// Attaches the seeker's name to a follow-up row.
fn with_seeker(conn: &mut SqliteConnection, row: DbFollowUpTask) -> RepositoryResult<FollowUpTask> {
    let seeker_name = inquiries::table
        .find(row.inquiry_id)
        .select(inquiries::name)
        .first::<String>(conn)?;

    Ok(FollowUpTask::try_from((row, seeker_name))?)
}

fn regular(row: DbRegularTask) -> RepositoryResult<RegularTask> {
    RegularTask::try_from(row).map_err(RepositoryError::from)
}

impl TaskReader for DieselRepository {
    fn list_follow_up_tasks(
        &self,
        query: FollowUpTaskListQuery,
    ) -> RepositoryResult<Vec<FollowUpTask>> {
        let mut conn = self.conn()?;

        let mut items = follow_up_tasks::table
            .inner_join(inquiries::table)
            .filter(follow_up_tasks::hub_id.eq(query.hub_id.get()))
            .into_boxed::<Sqlite>();

        match query.inquiry_id {
            Some(inquiry_id) => {
                items = items.filter(follow_up_tasks::inquiry_id.eq(inquiry_id.get()));
            }
            // Reminders about trashed seekers stay off the board.
            None => {
                items = items.filter(inquiries::deleted_at.is_null());
            }
        }
        if let Some(user_id) = query.assigned_to {
            items = items.filter(follow_up_tasks::assigned_to.eq(user_id.get()));
        }
        if let Some(status) = query.status {
            items = items.filter(follow_up_tasks::status.eq(status.as_str()));
        }

        let rows = items
            .order((follow_up_tasks::due_at.asc(), follow_up_tasks::id.asc()))
            .select((DbFollowUpTask::as_select(), inquiries::name))
            .load::<(DbFollowUpTask, String)>(&mut conn)?;

        rows.into_iter()
            .map(|row| FollowUpTask::try_from(row).map_err(RepositoryError::from))
            .collect()
    }

    fn list_regular_tasks(
        &self,
        query: RegularTaskListQuery,
    ) -> RepositoryResult<Vec<RegularTask>> {
        let mut conn = self.conn()?;

        let mut items = tasks::table
            .filter(tasks::hub_id.eq(query.hub_id.get()))
            .into_boxed::<Sqlite>();

        if let Some(user_id) = query.assigned_to {
            items = items.filter(tasks::assigned_to.eq(user_id.get()));
        }
        if let Some(status) = query.status {
            items = items.filter(tasks::status.eq(status.as_str()));
        }
        if let Some(priority) = query.priority {
            items = items.filter(tasks::priority.eq(priority.as_str()));
        }

        let rows = items
            .order((tasks::due_at.is_null(), tasks::due_at.asc(), tasks::id.asc()))
            .select(DbRegularTask::as_select())
            .load::<DbRegularTask>(&mut conn)?;

        rows.into_iter().map(regular).collect()
    }

    fn get_follow_up_task_by_id(
        &self,
        id: TaskId,
        hub_id: HubId,
    ) -> RepositoryResult<Option<FollowUpTask>> {
        let mut conn = self.conn()?;
        let row = follow_up_tasks::table
            .inner_join(inquiries::table)
            .filter(follow_up_tasks::id.eq(id.get()))
            .filter(follow_up_tasks::hub_id.eq(hub_id.get()))
            .select((DbFollowUpTask::as_select(), inquiries::name))
            .first::<(DbFollowUpTask, String)>(&mut conn)
            .optional()?;

        row.map(|row| FollowUpTask::try_from(row).map_err(RepositoryError::from))
            .transpose()
    }

    fn get_regular_task_by_id(
        &self,
        id: TaskId,
        hub_id: HubId,
    ) -> RepositoryResult<Option<RegularTask>> {
        let mut conn = self.conn()?;
        let row = tasks::table
            .filter(tasks::id.eq(id.get()))
            .filter(tasks::hub_id.eq(hub_id.get()))
            .select(DbRegularTask::as_select())
            .first::<DbRegularTask>(&mut conn)
            .optional()?;

        row.map(regular).transpose()
    }
}

impl TaskWriter for DieselRepository {
    fn create_follow_up_task(&self, new: &NewFollowUpTask) -> RepositoryResult<FollowUpTask> {
        let mut conn = self.conn()?;
        let insertable: DbNewFollowUpTask = new.into();
        let row = diesel::insert_into(follow_up_tasks::table)
            .values(&insertable)
            .returning(DbFollowUpTask::as_returning())
            .get_result::<DbFollowUpTask>(&mut conn)?;

        with_seeker(&mut conn, row)
    }

    fn update_follow_up_task(
        &self,
        id: TaskId,
        hub_id: HubId,
        updates: &UpdateFollowUpTask,
    ) -> RepositoryResult<FollowUpTask> {
        let mut conn = self.conn()?;
        let changes: DbUpdateFollowUpTask = updates.into();
        let row = diesel::update(
            follow_up_tasks::table
                .filter(follow_up_tasks::id.eq(id.get()))
                .filter(follow_up_tasks::hub_id.eq(hub_id.get())),
        )
        .set(&changes)
        .returning(DbFollowUpTask::as_returning())
        .get_result::<DbFollowUpTask>(&mut conn)?;

        with_seeker(&mut conn, row)
    }

    fn create_regular_task(&self, new: &NewRegularTask) -> RepositoryResult<RegularTask> {
        let mut conn = self.conn()?;
        let insertable: DbNewRegularTask = new.into();
        let row = diesel::insert_into(tasks::table)
            .values(&insertable)
            .returning(DbRegularTask::as_returning())
            .get_result::<DbRegularTask>(&mut conn)?;

        regular(row)
    }

    fn update_regular_task(
        &self,
        id: TaskId,
        hub_id: HubId,
        updates: &UpdateRegularTask,
    ) -> RepositoryResult<RegularTask> {
        let mut conn = self.conn()?;
        let changes: DbUpdateRegularTask = updates.into();
        let row = diesel::update(
            tasks::table
                .filter(tasks::id.eq(id.get()))
                .filter(tasks::hub_id.eq(hub_id.get())),
        )
        .set(&changes)
        .returning(DbRegularTask::as_returning())
        .get_result::<DbRegularTask>(&mut conn)?;

        regular(row)
    }

    fn set_task_status(
        &self,
        task: TaskRef,
        hub_id: HubId,
        status: TaskStatus,
    ) -> RepositoryResult<BoardTask> {
        let mut conn = self.conn()?;
        let now = Utc::now().naive_utc();

        match task.kind {
            TaskKind::FollowUp => {
                let row = diesel::update(
                    follow_up_tasks::table
                        .filter(follow_up_tasks::id.eq(task.id.get()))
                        .filter(follow_up_tasks::hub_id.eq(hub_id.get())),
                )
                .set((
                    follow_up_tasks::status.eq(status.as_str()),
                    follow_up_tasks::updated_at.eq(now),
                ))
                .returning(DbFollowUpTask::as_returning())
                .get_result::<DbFollowUpTask>(&mut conn)?;

                with_seeker(&mut conn, row).map(BoardTask::FollowUp)
            }
            TaskKind::Regular => {
                let row = diesel::update(
                    tasks::table
                        .filter(tasks::id.eq(task.id.get()))
                        .filter(tasks::hub_id.eq(hub_id.get())),
                )
                .set((tasks::status.eq(status.as_str()), tasks::updated_at.eq(now)))
                .returning(DbRegularTask::as_returning())
                .get_result::<DbRegularTask>(&mut conn)?;

                regular(row).map(BoardTask::Regular)
            }
        }
    }

    fn delete_task(&self, task: TaskRef, hub_id: HubId) -> RepositoryResult<()> {
        let mut conn = self.conn()?;

        let deleted = match task.kind {
            TaskKind::FollowUp => diesel::delete(
                follow_up_tasks::table
                    .filter(follow_up_tasks::id.eq(task.id.get()))
                    .filter(follow_up_tasks::hub_id.eq(hub_id.get())),
            )
            .execute(&mut conn)?,
            TaskKind::Regular => diesel::delete(
                tasks::table
                    .filter(tasks::id.eq(task.id.get()))
                    .filter(tasks::hub_id.eq(hub_id.get())),
            )
            .execute(&mut conn)?,
        };

        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

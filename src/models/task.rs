//! Diesel models for follow-up tasks and regular tasks.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::task::{
    FollowUpTask as DomainFollowUpTask, NewFollowUpTask as DomainNewFollowUpTask,
    NewRegularTask as DomainNewRegularTask, RegularTask as DomainRegularTask,
    UpdateFollowUpTask as DomainUpdateFollowUpTask, UpdateRegularTask as DomainUpdateRegularTask,
};
use crate::domain::types::{HubId, InquiryId, TaskId, TaskTitle, TypeConstraintError, UserId};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::follow_up_tasks)]
pub struct FollowUpTask {
    pub id: i32,
    pub hub_id: i32,
    pub inquiry_id: i32,
    pub assigned_to: Option<i32>,
    pub title: String,
    pub notes: Option<String>,
    pub due_at: NaiveDateTime,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::follow_up_tasks)]
pub struct NewFollowUpTask<'a> {
    pub hub_id: i32,
    pub inquiry_id: i32,
    pub assigned_to: Option<i32>,
    pub title: &'a str,
    pub notes: Option<&'a str>,
    pub due_at: NaiveDateTime,
    pub status: &'a str,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::follow_up_tasks)]
#[diesel(treat_none_as_null = true)]
pub struct UpdateFollowUpTask<'a> {
    pub assigned_to: Option<i32>,
    pub title: &'a str,
    pub notes: Option<&'a str>,
    pub due_at: NaiveDateTime,
    pub status: &'a str,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::tasks)]
pub struct RegularTask {
    pub id: i32,
    pub hub_id: i32,
    pub assigned_to: Option<i32>,
    pub title: String,
    pub description: Option<String>,
    pub priority: String,
    pub due_at: Option<NaiveDateTime>,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::tasks)]
pub struct NewRegularTask<'a> {
    pub hub_id: i32,
    pub assigned_to: Option<i32>,
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub priority: &'a str,
    pub due_at: Option<NaiveDateTime>,
    pub status: &'a str,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::tasks)]
#[diesel(treat_none_as_null = true)]
pub struct UpdateRegularTask<'a> {
    pub assigned_to: Option<i32>,
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub priority: &'a str,
    pub due_at: Option<NaiveDateTime>,
    pub status: &'a str,
    pub updated_at: NaiveDateTime,
}

/// Follow-up row joined with the seeker's name.
impl TryFrom<(FollowUpTask, String)> for DomainFollowUpTask {
    type Error = TypeConstraintError;

    fn try_from((value, seeker_name): (FollowUpTask, String)) -> Result<Self, Self::Error> {
        Ok(Self {
            id: TaskId::new(value.id)?,
            hub_id: HubId::new(value.hub_id)?,
            inquiry_id: InquiryId::new(value.inquiry_id)?,
            seeker_name,
            assigned_to: value.assigned_to.map(UserId::new).transpose()?,
            title: TaskTitle::new(value.title)?,
            notes: value.notes,
            due_at: value.due_at,
            status: value.status.parse()?,
            created_at: value.created_at,
            updated_at: value.updated_at,
        })
    }
}

impl TryFrom<RegularTask> for DomainRegularTask {
    type Error = TypeConstraintError;

    fn try_from(value: RegularTask) -> Result<Self, Self::Error> {
        Ok(Self {
            id: TaskId::new(value.id)?,
            hub_id: HubId::new(value.hub_id)?,
            assigned_to: value.assigned_to.map(UserId::new).transpose()?,
            title: TaskTitle::new(value.title)?,
            description: value.description,
            priority: value.priority.parse()?,
            due_at: value.due_at,
            status: value.status.parse()?,
            created_at: value.created_at,
            updated_at: value.updated_at,
        })
    }
}

impl<'a> From<&'a DomainNewFollowUpTask> for NewFollowUpTask<'a> {
    fn from(value: &'a DomainNewFollowUpTask) -> Self {
        Self {
            hub_id: value.hub_id.get(),
            inquiry_id: value.inquiry_id.get(),
            assigned_to: value.assigned_to.map(UserId::get),
            title: value.title.as_str(),
            notes: value.notes.as_ref().map(|n| n.as_str()),
            due_at: value.due_at,
            status: value.status.as_str(),
        }
    }
}

impl<'a> From<&'a DomainUpdateFollowUpTask> for UpdateFollowUpTask<'a> {
    fn from(value: &'a DomainUpdateFollowUpTask) -> Self {
        Self {
            assigned_to: value.assigned_to.map(UserId::get),
            title: value.title.as_str(),
            notes: value.notes.as_ref().map(|n| n.as_str()),
            due_at: value.due_at,
            status: value.status.as_str(),
            updated_at: chrono::Utc::now().naive_utc(),
        }
    }
}

impl<'a> From<&'a DomainNewRegularTask> for NewRegularTask<'a> {
    fn from(value: &'a DomainNewRegularTask) -> Self {
        Self {
            hub_id: value.hub_id.get(),
            assigned_to: value.assigned_to.map(UserId::get),
            title: value.title.as_str(),
            description: value.description.as_ref().map(|d| d.as_str()),
            priority: value.priority.as_str(),
            due_at: value.due_at,
            status: value.status.as_str(),
        }
    }
}

impl<'a> From<&'a DomainUpdateRegularTask> for UpdateRegularTask<'a> {
    fn from(value: &'a DomainUpdateRegularTask) -> Self {
        Self {
            assigned_to: value.assigned_to.map(UserId::get),
            title: value.title.as_str(),
            description: value.description.as_ref().map(|d| d.as_str()),
            priority: value.priority.as_str(),
            due_at: value.due_at,
            status: value.status.as_str(),
            updated_at: chrono::Utc::now().naive_utc(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{TaskPriority, TaskStatus};

    #[test]
    fn follow_up_row_into_domain() {
        let now = chrono::Utc::now().naive_utc();
        let row = FollowUpTask {
            id: 1,
            hub_id: 1,
            inquiry_id: 9,
            assigned_to: None,
            title: "Call back".to_string(),
            notes: None,
            due_at: now,
            status: "IN_PROGRESS".to_string(),
            created_at: now,
            updated_at: now,
        };

        let task = DomainFollowUpTask::try_from((row, "Eve".to_string())).unwrap();

        assert_eq!(task.status, TaskStatus::InProgress);
        assert_eq!(task.seeker_name, "Eve");
        assert_eq!(task.inquiry_id.get(), 9);
    }

    #[test]
    fn regular_row_rejects_unknown_priority() {
        let now = chrono::Utc::now().naive_utc();
        let row = RegularTask {
            id: 1,
            hub_id: 1,
            assigned_to: None,
            title: "Print flyers".to_string(),
            description: None,
            priority: "URGENT".to_string(),
            due_at: None,
            status: "PENDING".to_string(),
            created_at: now,
            updated_at: now,
        };

        assert!(DomainRegularTask::try_from(row).is_err());
    }

    #[test]
    fn regular_task_into_insertable() {
        let domain = DomainNewRegularTask {
            hub_id: HubId::new(2).unwrap(),
            assigned_to: Some(UserId::new(5).unwrap()),
            title: TaskTitle::new("Print flyers").unwrap(),
            description: None,
            priority: TaskPriority::High,
            due_at: None,
            status: TaskStatus::Pending,
        };

        let insertable: NewRegularTask = (&domain).into();

        assert_eq!(insertable.priority, "HIGH");
        assert_eq!(insertable.status, "PENDING");
        assert_eq!(insertable.assigned_to, Some(5));
    }
}

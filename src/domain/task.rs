//! Follow-up tasks (tied to a seeker) and regular tasks, plus the tagged
//! union the Kanban board works with.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{
    HubId, InquiryId, SanitizedText, TaskId, TaskPriority, TaskStatus, TaskTitle,
    TypeConstraintError, UserId,
};

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct FollowUpTask {
    pub id: TaskId,
    pub hub_id: HubId,
    pub inquiry_id: InquiryId,
    /// Name of the seeker the reminder is about.
    pub seeker_name: String,
    pub assigned_to: Option<UserId>,
    pub title: TaskTitle,
    pub notes: Option<String>,
    pub due_at: NaiveDateTime,
    pub status: TaskStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct RegularTask {
    pub id: TaskId,
    pub hub_id: HubId,
    pub assigned_to: Option<UserId>,
    pub title: TaskTitle,
    pub description: Option<String>,
    pub priority: TaskPriority,
    pub due_at: Option<NaiveDateTime>,
    pub status: TaskStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Clone, Debug)]
pub struct NewFollowUpTask {
    pub hub_id: HubId,
    pub inquiry_id: InquiryId,
    pub assigned_to: Option<UserId>,
    pub title: TaskTitle,
    pub notes: Option<SanitizedText>,
    pub due_at: NaiveDateTime,
    pub status: TaskStatus,
}

/// Full replacement of the editable follow-up task fields.
#[derive(Clone, Debug)]
pub struct UpdateFollowUpTask {
    pub assigned_to: Option<UserId>,
    pub title: TaskTitle,
    pub notes: Option<SanitizedText>,
    pub due_at: NaiveDateTime,
    pub status: TaskStatus,
}

#[derive(Clone, Debug)]
pub struct NewRegularTask {
    pub hub_id: HubId,
    pub assigned_to: Option<UserId>,
    pub title: TaskTitle,
    pub description: Option<SanitizedText>,
    pub priority: TaskPriority,
    pub due_at: Option<NaiveDateTime>,
    pub status: TaskStatus,
}

/// Full replacement of the editable regular task fields.
#[derive(Clone, Debug)]
pub struct UpdateRegularTask {
    pub assigned_to: Option<UserId>,
    pub title: TaskTitle,
    pub description: Option<SanitizedText>,
    pub priority: TaskPriority,
    pub due_at: Option<NaiveDateTime>,
    pub status: TaskStatus,
}

/// Discriminates the two task tables.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    FollowUp,
    Regular,
}

impl TaskKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            TaskKind::FollowUp => "follow_up",
            TaskKind::Regular => "regular",
        }
    }
}

impl Display for TaskKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskKind {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "follow_up" | "follow-up" => Ok(TaskKind::FollowUp),
            "regular" => Ok(TaskKind::Regular),
            other => Err(TypeConstraintError::InvalidValue(other.to_string())),
        }
    }
}

/// Identifies a single card on the board: `follow_up:12`, `regular:7`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TaskRef {
    pub kind: TaskKind,
    pub id: TaskId,
}

impl TaskRef {
    #[must_use]
    pub const fn new(kind: TaskKind, id: TaskId) -> Self {
        Self { kind, id }
    }
}

impl Display for TaskRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}

impl FromStr for TaskRef {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, id) = s
            .trim()
            .split_once(':')
            .ok_or_else(|| TypeConstraintError::InvalidValue(s.to_string()))?;
        let id = id
            .parse::<i32>()
            .map_err(|_| TypeConstraintError::InvalidValue(s.to_string()))?;
        Ok(Self {
            kind: kind.parse()?,
            id: TaskId::new(id)?,
        })
    }
}

/// A task of either kind, tagged with `type` when serialized.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BoardTask {
    FollowUp(FollowUpTask),
    Regular(RegularTask),
}

impl BoardTask {
    pub fn reference(&self) -> TaskRef {
        match self {
            BoardTask::FollowUp(task) => TaskRef::new(TaskKind::FollowUp, task.id),
            BoardTask::Regular(task) => TaskRef::new(TaskKind::Regular, task.id),
        }
    }

    pub fn status(&self) -> TaskStatus {
        match self {
            BoardTask::FollowUp(task) => task.status,
            BoardTask::Regular(task) => task.status,
        }
    }

    pub fn due_at(&self) -> Option<NaiveDateTime> {
        match self {
            BoardTask::FollowUp(task) => Some(task.due_at),
            BoardTask::Regular(task) => task.due_at,
        }
    }

    pub fn assigned_to(&self) -> Option<UserId> {
        match self {
            BoardTask::FollowUp(task) => task.assigned_to,
            BoardTask::Regular(task) => task.assigned_to,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            BoardTask::FollowUp(task) => task.title.as_str(),
            BoardTask::Regular(task) => task.title.as_str(),
        }
    }
}

impl From<FollowUpTask> for BoardTask {
    fn from(task: FollowUpTask) -> Self {
        BoardTask::FollowUp(task)
    }
}

impl From<RegularTask> for BoardTask {
    fn from(task: RegularTask) -> Self {
        BoardTask::Regular(task)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_ref_round_trips_through_text() {
        let reference: TaskRef = "follow_up:12".parse().unwrap();
        assert_eq!(
            reference,
            TaskRef::new(TaskKind::FollowUp, TaskId::new(12).unwrap())
        );
        assert_eq!(reference.to_string(), "follow_up:12");
    }

    #[test]
    fn task_ref_rejects_garbage() {
        assert!("regular".parse::<TaskRef>().is_err());
        assert!("regular:abc".parse::<TaskRef>().is_err());
        assert!("regular:0".parse::<TaskRef>().is_err());
        assert!("meeting:3".parse::<TaskRef>().is_err());
    }

    #[test]
    fn board_task_serializes_with_type_tag() {
        let now = chrono::NaiveDate::from_ymd_opt(2025, 5, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        let task = BoardTask::Regular(RegularTask {
            id: TaskId::new(7).unwrap(),
            hub_id: HubId::new(1).unwrap(),
            assigned_to: None,
            title: TaskTitle::new("Order brochures").unwrap(),
            description: None,
            priority: TaskPriority::High,
            due_at: None,
            status: TaskStatus::Pending,
            created_at: now,
            updated_at: now,
        });

        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["type"], "regular");
        assert_eq!(json["id"], 7);
        assert_eq!(json["priority"], "HIGH");
        assert_eq!(task.reference().to_string(), "regular:7");
    }
}

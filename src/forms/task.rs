use chrono::NaiveDateTime;
use serde::Deserialize;
use validator::Validate;

use crate::domain::board::DropTarget;
use crate::domain::task::{
    NewFollowUpTask, NewRegularTask, TaskKind, TaskRef, UpdateFollowUpTask, UpdateRegularTask,
};
use crate::domain::types::{
    HubId, InquiryId, SanitizedText, TaskId, TaskPriority, TaskStatus, TaskTitle, UserId,
};
use crate::forms::{FieldResult, FormError, datetime, optional_datetime, optional_id, optional_text};

fn default_status() -> String {
    TaskStatus::Pending.as_str().to_string()
}

fn default_priority() -> String {
    TaskPriority::Medium.as_str().to_string()
}

fn assignee(value: Option<i32>) -> Result<Option<UserId>, FormError> {
    value.map(UserId::new).transpose().field("assigned_to")
}

/// Reminder to get back to a seeker at a given time.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct FollowUpTaskForm {
    pub inquiry_id: i32,
    #[serde(default, deserialize_with = "optional_id")]
    pub assigned_to: Option<i32>,
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[serde(default, deserialize_with = "optional_text")]
    #[validate(length(max = 5000))]
    pub notes: Option<String>,
    #[serde(deserialize_with = "datetime")]
    pub due_at: NaiveDateTime,
    #[serde(default = "default_status")]
    pub status: String,
}

impl FollowUpTaskForm {
    pub fn inquiry_id(&self) -> Result<InquiryId, FormError> {
        InquiryId::new(self.inquiry_id).field("inquiry_id")
    }

    pub fn into_new(self, hub_id: HubId) -> Result<NewFollowUpTask, FormError> {
        self.validate()?;
        Ok(NewFollowUpTask {
            hub_id,
            inquiry_id: self.inquiry_id()?,
            assigned_to: assignee(self.assigned_to)?,
            title: TaskTitle::new(self.title.trim()).field("title")?,
            status: self.status.parse().field("status")?,
            notes: SanitizedText::optional(self.notes),
            due_at: self.due_at,
        })
    }

    /// The seeker of an existing follow-up is fixed; `inquiry_id` is ignored.
    pub fn into_update(self) -> Result<UpdateFollowUpTask, FormError> {
        self.validate()?;
        Ok(UpdateFollowUpTask {
            assigned_to: assignee(self.assigned_to)?,
            title: TaskTitle::new(self.title.trim()).field("title")?,
            status: self.status.parse().field("status")?,
            notes: SanitizedText::optional(self.notes),
            due_at: self.due_at,
        })
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegularTaskForm {
    #[serde(default, deserialize_with = "optional_id")]
    pub assigned_to: Option<i32>,
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[serde(default, deserialize_with = "optional_text")]
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    #[serde(default = "default_priority")]
    pub priority: String,
    #[serde(default, deserialize_with = "optional_datetime")]
    pub due_at: Option<NaiveDateTime>,
    #[serde(default = "default_status")]
    pub status: String,
}

impl RegularTaskForm {
    pub fn into_new(self, hub_id: HubId) -> Result<NewRegularTask, FormError> {
        let update = self.into_update()?;
        Ok(NewRegularTask {
            hub_id,
            assigned_to: update.assigned_to,
            title: update.title,
            description: update.description,
            priority: update.priority,
            due_at: update.due_at,
            status: update.status,
        })
    }

    pub fn into_update(self) -> Result<UpdateRegularTask, FormError> {
        self.validate()?;
        Ok(UpdateRegularTask {
            assigned_to: assignee(self.assigned_to)?,
            title: TaskTitle::new(self.title.trim()).field("title")?,
            priority: self.priority.parse().field("priority")?,
            status: self.status.parse().field("status")?,
            description: SanitizedText::optional(self.description),
            due_at: self.due_at,
        })
    }
}

/// A card dropped on the board: the dragged card and the element under it.
#[derive(Debug, Clone, Deserialize)]
pub struct MoveTaskForm {
    pub kind: String,
    pub id: i32,
    pub target: String,
}

impl MoveTaskForm {
    pub fn parse(&self) -> Result<(TaskRef, DropTarget), FormError> {
        let kind = self.kind.parse::<TaskKind>().field("kind")?;
        let id = TaskId::new(self.id).field("id")?;
        let target = self.target.parse::<DropTarget>().field("target")?;
        Ok((TaskRef::new(kind, id), target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hub() -> HubId {
        HubId::new(1).unwrap()
    }

    #[test]
    fn follow_up_from_html_form() {
        let form: FollowUpTaskForm = serde_html_form::from_str(
            "inquiry_id=5&assigned_to=&title=Call+back&notes=&due_at=2025-06-02T14%3A30",
        )
        .unwrap();

        let new = form.into_new(hub()).unwrap();

        assert_eq!(new.inquiry_id.get(), 5);
        assert_eq!(new.status, TaskStatus::Pending);
        assert!(new.assigned_to.is_none());
        assert_eq!(new.due_at.to_string(), "2025-06-02 14:30:00");
    }

    #[test]
    fn follow_up_requires_due_date() {
        let parsed = serde_json::from_str::<FollowUpTaskForm>(
            r#"{"inquiry_id": 5, "title": "Call back", "due_at": ""}"#,
        );
        assert!(parsed.is_err());
    }

    #[test]
    fn regular_task_defaults() {
        let form: RegularTaskForm =
            serde_json::from_str(r#"{"title": "Print flyers", "due_at": null}"#).unwrap();

        let new = form.into_new(hub()).unwrap();

        assert_eq!(new.priority, TaskPriority::Medium);
        assert_eq!(new.status, TaskStatus::Pending);
        assert!(new.due_at.is_none());
    }

    #[test]
    fn regular_task_rejects_unknown_priority() {
        let form: RegularTaskForm =
            serde_json::from_str(r#"{"title": "Print flyers", "priority": "URGENT"}"#).unwrap();

        let err = form.into_update().unwrap_err();

        assert!(err.details().contains_key("priority"));
    }

    #[test]
    fn move_form_parses_card_and_target() {
        let form: MoveTaskForm =
            serde_json::from_str(r#"{"kind": "regular", "id": 7, "target": "follow_up:3"}"#)
                .unwrap();

        let (task, target) = form.parse().unwrap();

        assert_eq!(task.to_string(), "regular:7");
        assert!(matches!(target, DropTarget::Card(card) if card.to_string() == "follow_up:3"));
    }

    #[test]
    fn move_form_rejects_unknown_target() {
        let form = MoveTaskForm {
            kind: "regular".to_string(),
            id: 7,
            target: "backlog".to_string(),
        };

        let err = form.parse().unwrap_err();

        assert!(err.details().contains_key("target"));
    }
}

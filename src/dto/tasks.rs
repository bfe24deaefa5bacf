use serde::{Deserialize, Serialize};

use crate::domain::board::Board;
use crate::domain::task::BoardTask;
use crate::domain::user::User;
use crate::forms::{optional_id, optional_text};

/// Filters for the task lists; `inquiry_id` only applies to follow-ups and
/// `priority` only to regular tasks.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TaskQuery {
    #[serde(default, deserialize_with = "optional_id")]
    pub inquiry_id: Option<i32>,
    #[serde(default, deserialize_with = "optional_id")]
    pub assigned_to: Option<i32>,
    #[serde(default, deserialize_with = "optional_text")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub priority: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct BoardQuery {
    #[serde(default, deserialize_with = "optional_id")]
    pub assigned_to: Option<i32>,
}

/// Result of a board move: the card as stored after the request.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MoveOutcome {
    pub task: BoardTask,
    /// `false` when the card was dropped into the column it already had.
    pub moved: bool,
}

#[derive(Debug, Serialize)]
pub struct BoardPageData {
    pub board: Board,
    pub users: Vec<User>,
    pub filters: BoardQuery,
}

//! Kanban board: both task kinds distributed into status columns, and the
//! rules for resolving where a dragged card was dropped.

use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

use crate::domain::task::{BoardTask, TaskRef};
use crate::domain::types::{TaskStatus, TypeConstraintError};

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct BoardColumn {
    pub status: TaskStatus,
    pub tasks: Vec<BoardTask>,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Board {
    pub columns: Vec<BoardColumn>,
}

/// Where a card was released: on a column, or on top of another card.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DropTarget {
    Column(TaskStatus),
    Card(TaskRef),
}

impl FromStr for DropTarget {
    type Err = TypeConstraintError;

    /// Column ids are status codes; anything else must be a card id.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(status) = s.parse::<TaskStatus>() {
            return Ok(DropTarget::Column(status));
        }
        s.parse::<TaskRef>().map(DropTarget::Card)
    }
}

/// Outcome of resolving a drop against the current board.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MovePlan {
    /// Dropped into the column it already occupies.
    Unchanged,
    Move { from: TaskStatus, to: TaskStatus },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BoardError {
    #[error("task {0} is not on the board")]
    UnknownTask(TaskRef),
    #[error("drop target {0} is not on the board")]
    UnknownTarget(TaskRef),
}

impl Board {
    /// Distributes tasks into one column per status, in status order.
    ///
    /// Within a column, tasks are ordered by due date with undated tasks
    /// last, then by kind and id so the order is stable between reloads.
    pub fn new<I>(tasks: I) -> Self
    where
        I: IntoIterator<Item = BoardTask>,
    {
        let mut columns: Vec<BoardColumn> = TaskStatus::ALL
            .iter()
            .map(|&status| BoardColumn {
                status,
                tasks: Vec::new(),
            })
            .collect();

        for task in tasks {
            if let Some(column) = columns.iter_mut().find(|c| c.status == task.status()) {
                column.tasks.push(task);
            }
        }

        for column in &mut columns {
            column
                .tasks
                .sort_by_key(|task| (task.due_at().is_none(), task.due_at(), task.reference()));
        }

        Self { columns }
    }

    pub fn column(&self, status: TaskStatus) -> Option<&BoardColumn> {
        self.columns.iter().find(|column| column.status == status)
    }

    pub fn find(&self, reference: TaskRef) -> Option<&BoardTask> {
        self.columns
            .iter()
            .flat_map(|column| column.tasks.iter())
            .find(|task| task.reference() == reference)
    }

    pub fn task_count(&self) -> usize {
        self.columns.iter().map(|column| column.tasks.len()).sum()
    }

    /// Status a drop target stands for: the column itself, or the column
    /// of the card under the cursor.
    pub fn resolve_drop(&self, target: DropTarget) -> Result<TaskStatus, BoardError> {
        match target {
            DropTarget::Column(status) => Ok(status),
            DropTarget::Card(reference) => self
                .find(reference)
                .map(BoardTask::status)
                .ok_or(BoardError::UnknownTarget(reference)),
        }
    }

    pub fn plan_move(&self, task: TaskRef, target: DropTarget) -> Result<MovePlan, BoardError> {
        let from = self
            .find(task)
            .map(BoardTask::status)
            .ok_or(BoardError::UnknownTask(task))?;
        let to = self.resolve_drop(target)?;
        if from == to {
            Ok(MovePlan::Unchanged)
        } else {
            Ok(MovePlan::Move { from, to })
        }
    }
}

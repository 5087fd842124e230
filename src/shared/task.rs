/**
 * Task Data Structure
 *
 * Defines the Task record shown as a card on the Kanban board and its
 * serialization to the JSON shape kept in the remote `tasks` collection.
 *
 * The remote store omits empty arrays and empty strings, so every field except
 * the id deserializes with a default.
 */
use serde::{Deserialize, Serialize};

use crate::shared::entity::{Entity, EntityId};

/// A card on the board
///
/// # Example
/// ```rust
/// use taskboard_sync::shared::{Task, TaskStatus};
///
/// let task = Task::new("Write release notes").with_status(TaskStatus::InProgress);
/// assert!(task.id.is_none());
/// assert_eq!(task.status, TaskStatus::InProgress);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Identifier, assigned when the task is first stored
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    /// Card title
    #[serde(default)]
    pub title: String,
    /// Free-form description
    #[serde(default)]
    pub description: String,
    /// Due date as an ISO 8601 date (`YYYY-MM-DD`)
    #[serde(default)]
    pub due_date: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub category: Category,
    /// Board column
    #[serde(default)]
    pub status: TaskStatus,
    /// Contact ids assigned to the task
    #[serde(default)]
    pub assigned_to: Vec<EntityId>,
    #[serde(default)]
    pub subtasks: Vec<Subtask>,
}

/// Checklist entry inside a task
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Subtask {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub done: bool,
}

/// Task priority
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Priority {
    Urgent,
    #[default]
    Medium,
    Low,
}

/// Task category
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    #[default]
    TechnicalTask,
    UserStory,
}

/// Board column a task sits in
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    AwaitFeedback,
    Done,
}

impl TaskStatus {
    /// All columns in board order
    pub const ALL: [TaskStatus; 4] = [
        TaskStatus::Todo,
        TaskStatus::InProgress,
        TaskStatus::AwaitFeedback,
        TaskStatus::Done,
    ];

    /// Wire name of the column
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::AwaitFeedback => "await-feedback",
            TaskStatus::Done => "done",
        }
    }

    /// Parse a column from its wire name
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_str() == name)
    }
}

impl Priority {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "urgent" => Some(Priority::Urgent),
            "medium" => Some(Priority::Medium),
            "low" => Some(Priority::Low),
            _ => None,
        }
    }
}

impl Category {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "technical-task" => Some(Category::TechnicalTask),
            "user-story" => Some(Category::UserStory),
            _ => None,
        }
    }
}

impl Task {
    /// Create an unsaved task in the `todo` column
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_subtask(mut self, title: impl Into<String>) -> Self {
        self.subtasks.push(Subtask {
            title: title.into(),
            done: false,
        });
        self
    }

    /// Flip a subtask's `done` flag. Returns false when the index is out of range.
    pub fn toggle_subtask(&mut self, index: usize) -> bool {
        match self.subtasks.get_mut(index) {
            Some(subtask) => {
                subtask.done = !subtask.done;
                true
            }
            None => false,
        }
    }

    /// `(done, total)` subtask counts for the card progress bar
    pub fn subtask_progress(&self) -> (usize, usize) {
        let done = self.subtasks.iter().filter(|s| s.done).count();
        (done, self.subtasks.len())
    }

    /// Drop a contact from the assignee list. Returns true if it was assigned.
    pub fn unassign(&mut self, contact_id: EntityId) -> bool {
        let before = self.assigned_to.len();
        self.assigned_to.retain(|id| *id != contact_id);
        self.assigned_to.len() != before
    }
}

impl Entity for Task {
    const KIND: &'static str = "task";

    fn id(&self) -> Option<EntityId> {
        self.id
    }

    fn set_id(&mut self, id: EntityId) {
        self.id = Some(id);
    }
}

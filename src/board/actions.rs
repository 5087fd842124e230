//! Typed board actions
//!
//! Every user-triggered change to the board is one [`BoardAction`]. Front ends
//! that receive action names as text (a CLI argument, a button's data
//! attribute) resolve them through [`ActionName`]; an unknown name is an
//! error, never a lookup into some global table.
//!
//! ```rust
//! use taskboard_sync::board::{ActionName, BoardAction};
//! use taskboard_sync::shared::TaskStatus;
//!
//! let name: ActionName = "move-task".parse().unwrap();
//! assert_eq!(name, ActionName::MoveTask);
//!
//! let args = vec!["42".to_string(), "status=done".to_string()];
//! let action = BoardAction::from_args("move-task", &args).unwrap();
//! assert_eq!(action, BoardAction::MoveTask { id: 42, status: TaskStatus::Done });
//! ```

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::shared::entity::{EntityId, IntoEntityId};
use crate::shared::{Category, Contact, Priority, Task, TaskStatus};

/// Textual action names understood by the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionName {
    AddTask,
    EditTask,
    MoveTask,
    ToggleSubtask,
    DeleteTask,
    AddContact,
    EditContact,
    DeleteContact,
}

impl ActionName {
    pub const ALL: [ActionName; 8] = [
        ActionName::AddTask,
        ActionName::EditTask,
        ActionName::MoveTask,
        ActionName::ToggleSubtask,
        ActionName::DeleteTask,
        ActionName::AddContact,
        ActionName::EditContact,
        ActionName::DeleteContact,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionName::AddTask => "add-task",
            ActionName::EditTask => "edit-task",
            ActionName::MoveTask => "move-task",
            ActionName::ToggleSubtask => "toggle-subtask",
            ActionName::DeleteTask => "delete-task",
            ActionName::AddContact => "add-contact",
            ActionName::EditContact => "edit-contact",
            ActionName::DeleteContact => "delete-contact",
        }
    }
}

impl fmt::Display for ActionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionName {
    type Err = ActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|name| name.as_str() == wanted)
            .ok_or_else(|| ActionError::UnknownAction(s.to_string()))
    }
}

/// Field changes for an existing task; `None` leaves a field alone
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskEdit {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<String>,
    pub priority: Option<Priority>,
    pub category: Option<Category>,
    pub assigned_to: Option<Vec<EntityId>>,
    /// Subtasks appended to the checklist
    pub add_subtasks: Vec<String>,
}

impl TaskEdit {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply(&self, task: &mut Task) {
        if let Some(title) = &self.title {
            task.title = title.clone();
        }
        if let Some(description) = &self.description {
            task.description = description.clone();
        }
        if let Some(due_date) = &self.due_date {
            task.due_date = due_date.clone();
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(category) = self.category {
            task.category = category;
        }
        if let Some(assigned_to) = &self.assigned_to {
            task.assigned_to = assigned_to.clone();
        }
        for title in &self.add_subtasks {
            task.subtasks.push(crate::shared::Subtask {
                title: title.clone(),
                done: false,
            });
        }
    }
}

/// Field changes for an existing contact
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactEdit {
    pub name: Option<String>,
    pub mail: Option<String>,
    pub phone: Option<String>,
}

impl ContactEdit {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply(&self, contact: &mut Contact) {
        if let Some(name) = &self.name {
            contact.name = name.clone();
        }
        if let Some(mail) = &self.mail {
            contact.mail = mail.clone();
        }
        if let Some(phone) = &self.phone {
            contact.phone = phone.clone();
        }
    }
}

/// A change to the board
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardAction {
    AddTask(Task),
    EditTask { id: EntityId, edit: TaskEdit },
    MoveTask { id: EntityId, status: TaskStatus },
    ToggleSubtask { id: EntityId, index: usize },
    DeleteTask { id: EntityId },
    AddContact(Contact),
    EditContact { id: EntityId, edit: ContactEdit },
    /// Also removes the contact from every task it is assigned to
    DeleteContact { id: EntityId },
}

impl BoardAction {
    pub fn name(&self) -> ActionName {
        match self {
            BoardAction::AddTask(_) => ActionName::AddTask,
            BoardAction::EditTask { .. } => ActionName::EditTask,
            BoardAction::MoveTask { .. } => ActionName::MoveTask,
            BoardAction::ToggleSubtask { .. } => ActionName::ToggleSubtask,
            BoardAction::DeleteTask { .. } => ActionName::DeleteTask,
            BoardAction::AddContact(_) => ActionName::AddContact,
            BoardAction::EditContact { .. } => ActionName::EditContact,
            BoardAction::DeleteContact { .. } => ActionName::DeleteContact,
        }
    }

    /// Build an action from its name and command-line style arguments.
    ///
    /// Actions on an existing entity take its id as the first bare argument.
    /// Everything else is `key=value`:
    ///
    /// | key           | used by                   |
    /// |---------------|---------------------------|
    /// | `title`       | add-task, edit-task       |
    /// | `description` | add-task, edit-task       |
    /// | `due`         | add-task, edit-task       |
    /// | `priority`    | add-task, edit-task       |
    /// | `category`    | add-task, edit-task       |
    /// | `status`      | add-task, move-task       |
    /// | `assign`      | add-task, edit-task (comma separated ids) |
    /// | `subtask`     | add-task, edit-task (repeatable) |
    /// | `index`       | toggle-subtask            |
    /// | `name`, `mail`, `phone` | add-contact, edit-contact |
    pub fn from_args(name: &str, args: &[String]) -> Result<Self, ActionError> {
        let action: ActionName = name.parse()?;
        let args = ParsedArgs::parse(args)?;

        let built = match action {
            ActionName::AddTask => {
                let mut task = Task::new(args.required("title")?);
                task.status = args.status()?.unwrap_or_default();
                args.task_edit()?.apply(&mut task);
                BoardAction::AddTask(task)
            }
            ActionName::EditTask => BoardAction::EditTask {
                id: args.id()?,
                edit: args.task_edit()?,
            },
            ActionName::MoveTask => BoardAction::MoveTask {
                id: args.id()?,
                status: args
                    .status()?
                    .ok_or(ActionError::MissingArgument("status"))?,
            },
            ActionName::ToggleSubtask => BoardAction::ToggleSubtask {
                id: args.id()?,
                index: args.index()?,
            },
            ActionName::DeleteTask => BoardAction::DeleteTask { id: args.id()? },
            ActionName::AddContact => {
                let mut contact = Contact::new(args.required("name")?, args.get("mail").unwrap_or_default());
                contact.phone = args.get("phone").unwrap_or_default();
                BoardAction::AddContact(contact)
            }
            ActionName::EditContact => BoardAction::EditContact {
                id: args.id()?,
                edit: ContactEdit {
                    name: args.get("name"),
                    mail: args.get("mail"),
                    phone: args.get("phone"),
                },
            },
            ActionName::DeleteContact => BoardAction::DeleteContact { id: args.id()? },
        };
        Ok(built)
    }
}

/// What a dispatched action did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    Created(EntityId),
    Updated(EntityId),
    Deleted(EntityId),
}

impl ActionOutcome {
    pub fn id(&self) -> EntityId {
        match self {
            ActionOutcome::Created(id) | ActionOutcome::Updated(id) | ActionOutcome::Deleted(id) => *id,
        }
    }
}

/// Errors building or applying an action
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ActionError {
    #[error("unknown action: {0}")]
    UnknownAction(String),
    #[error("missing argument: {0}")]
    MissingArgument(&'static str),
    #[error("invalid {field}: {value}")]
    InvalidArgument { field: &'static str, value: String },
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: EntityId },
}

impl ActionError {
    fn invalid(field: &'static str, value: impl Into<String>) -> Self {
        ActionError::InvalidArgument {
            field,
            value: value.into(),
        }
    }
}

/// Bare and `key=value` arguments
struct ParsedArgs {
    positional: Vec<String>,
    options: HashMap<String, Vec<String>>,
}

impl ParsedArgs {
    fn parse(args: &[String]) -> Result<Self, ActionError> {
        let mut positional = Vec::new();
        let mut options: HashMap<String, Vec<String>> = HashMap::new();
        for arg in args {
            match arg.split_once('=') {
                Some((key, value)) => {
                    let key = key.trim().to_lowercase();
                    if key.is_empty() {
                        return Err(ActionError::invalid("argument", arg.as_str()));
                    }
                    options.entry(key).or_default().push(value.to_string());
                }
                None => positional.push(arg.clone()),
            }
        }
        Ok(Self { positional, options })
    }

    /// Last value given for `key`
    fn get(&self, key: &str) -> Option<String> {
        self.options.get(key).and_then(|values| values.last()).cloned()
    }

    fn all(&self, key: &str) -> Vec<String> {
        self.options.get(key).cloned().unwrap_or_default()
    }

    fn required(&self, key: &'static str) -> Result<String, ActionError> {
        match self.get(key) {
            Some(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
            Some(value) => Err(ActionError::invalid(key, value)),
            None => Err(ActionError::MissingArgument(key)),
        }
    }

    fn id(&self) -> Result<EntityId, ActionError> {
        let raw = self.positional.first().ok_or(ActionError::MissingArgument("id"))?;
        raw.as_str()
            .into_entity_id()
            .ok_or_else(|| ActionError::invalid("id", raw.as_str()))
    }

    fn index(&self) -> Result<usize, ActionError> {
        let raw = self
            .get("index")
            .or_else(|| self.positional.get(1).cloned())
            .ok_or(ActionError::MissingArgument("index"))?;
        raw.trim().parse().map_err(|_| ActionError::invalid("index", raw))
    }

    fn status(&self) -> Result<Option<TaskStatus>, ActionError> {
        self.get("status")
            .map(|raw| TaskStatus::parse(raw.trim()).ok_or_else(|| ActionError::invalid("status", raw)))
            .transpose()
    }

    fn task_edit(&self) -> Result<TaskEdit, ActionError> {
        let priority = self
            .get("priority")
            .map(|raw| Priority::parse(raw.trim()).ok_or_else(|| ActionError::invalid("priority", raw)))
            .transpose()?;
        let category = self
            .get("category")
            .map(|raw| Category::parse(raw.trim()).ok_or_else(|| ActionError::invalid("category", raw)))
            .transpose()?;
        let due_date = self.get("due").map(|raw| parse_due_date(&raw)).transpose()?;
        let assigned_to = self.get("assign").map(|raw| parse_id_list(&raw)).transpose()?;

        Ok(TaskEdit {
            title: self.get("title").map(|t| t.trim().to_string()),
            description: self.get("description"),
            due_date,
            priority,
            category,
            assigned_to,
            add_subtasks: self
                .all("subtask")
                .into_iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        })
    }
}

fn parse_due_date(raw: &str) -> Result<String, ActionError> {
    chrono::NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map(|date| date.format("%Y-%m-%d").to_string())
        .map_err(|_| ActionError::invalid("due", raw))
}

fn parse_id_list(raw: &str) -> Result<Vec<EntityId>, ActionError> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| part.into_entity_id().ok_or_else(|| ActionError::invalid("assign", part)))
        .collect()
}

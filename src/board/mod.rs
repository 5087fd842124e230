//! # Board Session
//!
//! One loaded board: the task and contact stores plus the remote adapter they
//! sync through.
//!
//! ## Lifecycle
//!
//! 1. [`Board::connect`] builds the adapter from an [`AppConfig`]
//! 2. [`Board::reload`] loads both collections concurrently
//! 3. [`Board::dispatch`] applies [`BoardAction`]s to the local stores
//! 4. [`Board::save`] flushes tasks, then contacts
//!
//! A failed load leaves that collection as it was locally and is reported in
//! [`LoadReport`]; the board stays usable for the collection that did load.

pub mod actions;

pub use actions::{ActionError, ActionName, ActionOutcome, BoardAction, ContactEdit, TaskEdit};

use std::sync::Arc;
use thiserror::Error;

use crate::offline::SaveControl;
use crate::remote::{ErrorPolicy, LoadOptions, RemoteStore, TransportError};
use crate::shared::config::{AppConfig, ConfigError};
use crate::shared::contact::sorted_by_name;
use crate::shared::entity::EntityId;
use crate::shared::error::RemoteResult;
use crate::shared::{Contact, Task, TaskStatus};
use crate::store::{EntityStore, FlushReport};

/// Errors setting up a board session
#[derive(Debug, Error)]
pub enum BoardError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("could not create HTTP client: {0}")]
    Transport(#[from] TransportError),
}

/// Result of loading both collections
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub tasks: RemoteResult<usize>,
    pub contacts: RemoteResult<usize>,
}

impl LoadReport {
    pub fn is_complete(&self) -> bool {
        self.tasks.is_ok() && self.contacts.is_ok()
    }

    /// Names of the collections that failed to load
    pub fn failed(&self) -> Vec<&'static str> {
        let mut failed = Vec::new();
        if self.tasks.is_err() {
            failed.push("tasks");
        }
        if self.contacts.is_err() {
            failed.push("contacts");
        }
        failed
    }
}

/// Result of saving both collections
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveReport {
    pub tasks: FlushReport,
    pub contacts: FlushReport,
}

/// Task and contact stores bound to one remote store
#[derive(Debug)]
pub struct Board {
    config: AppConfig,
    remote: RemoteStore,
    tasks: EntityStore<Task>,
    contacts: EntityStore<Contact>,
}

impl Board {
    /// Board over an existing adapter, with empty stores
    pub fn new(config: AppConfig, remote: RemoteStore) -> Self {
        let tasks = EntityStore::new(config.tasks_path.clone());
        let contacts = EntityStore::new(config.users_path.clone());
        Self {
            config,
            remote,
            tasks,
            contacts,
        }
    }

    /// Board over an HTTP adapter built from `config`
    pub fn connect(config: AppConfig, policy: Arc<ErrorPolicy>) -> Result<Self, BoardError> {
        config.validate()?;
        let remote = RemoteStore::from_config(&config, policy)?;
        Ok(Self::new(config, remote))
    }

    /// Connect with the default error policy and load both collections.
    ///
    /// Load failures are logged and already shown to the user; they do not
    /// fail the call.
    pub async fn load(config: AppConfig) -> Result<Self, BoardError> {
        let board = Self::connect(config, Arc::new(ErrorPolicy::new()))?;
        let report = board.reload().await;
        if !report.is_complete() {
            tracing::warn!("Board loaded without: {}", report.failed().join(", "));
        }
        Ok(board)
    }

    /// Load tasks and contacts concurrently
    pub async fn reload(&self) -> LoadReport {
        let task_options = LoadOptions::new("load tasks");
        let contact_options = LoadOptions::new("load contacts");
        let (tasks, contacts) = futures_util::future::join(
            self.tasks.load(&self.remote, &task_options),
            self.contacts.load(&self.remote, &contact_options),
        )
        .await;
        LoadReport { tasks, contacts }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn remote(&self) -> &RemoteStore {
        &self.remote
    }

    pub fn tasks(&self) -> &EntityStore<Task> {
        &self.tasks
    }

    pub fn contacts(&self) -> &EntityStore<Contact> {
        &self.contacts
    }

    /// Tasks in one board column, in storage order
    pub async fn column(&self, status: TaskStatus) -> Vec<Task> {
        self.tasks
            .all()
            .await
            .into_iter()
            .filter(|task| task.status == status)
            .collect()
    }

    /// Contacts in display order
    pub async fn contact_list(&self) -> Vec<Contact> {
        sorted_by_name(&self.contacts.all().await)
    }

    /// Apply an action to the local stores. Nothing is sent until [`Board::save`].
    pub async fn dispatch(&self, action: BoardAction) -> Result<ActionOutcome, ActionError> {
        let name = action.name();
        let outcome = match action {
            BoardAction::AddTask(task) => {
                if task.title.trim().is_empty() {
                    return Err(ActionError::MissingArgument("title"));
                }
                ActionOutcome::Created(self.tasks.insert(task).await)
            }
            BoardAction::EditTask { id, edit } => {
                self.update_task(id, |task| edit.apply(task)).await?;
                ActionOutcome::Updated(id)
            }
            BoardAction::MoveTask { id, status } => {
                self.update_task(id, |task| task.status = status).await?;
                ActionOutcome::Updated(id)
            }
            BoardAction::ToggleSubtask { id, index } => {
                let task = self.tasks.get_by_id(id).await.ok_or(ActionError::NotFound { kind: "task", id })?;
                if index >= task.subtasks.len() {
                    return Err(ActionError::InvalidArgument {
                        field: "index",
                        value: index.to_string(),
                    });
                }
                self.update_task(id, |task| {
                    task.toggle_subtask(index);
                })
                .await?;
                ActionOutcome::Updated(id)
            }
            BoardAction::DeleteTask { id } => {
                if self.tasks.remove(id).await.is_none() {
                    tracing::debug!("Task {} not held locally; queued remote delete anyway", id);
                }
                ActionOutcome::Deleted(id)
            }
            BoardAction::AddContact(mut contact) => {
                if contact.name.trim().is_empty() {
                    return Err(ActionError::MissingArgument("name"));
                }
                contact.assign_color(self.contacts.len().await);
                ActionOutcome::Created(self.contacts.insert(contact).await)
            }
            BoardAction::EditContact { id, edit } => {
                if !self.contacts.update(id, |contact| edit.apply(contact)).await {
                    return Err(ActionError::NotFound { kind: "contact", id });
                }
                ActionOutcome::Updated(id)
            }
            BoardAction::DeleteContact { id } => {
                self.contacts.remove(id).await;
                let unassigned = self.unassign_everywhere(id).await;
                tracing::debug!("Contact {} removed from {} tasks", id, unassigned);
                ActionOutcome::Deleted(id)
            }
        };
        tracing::info!("{} -> {:?}", name, outcome);
        Ok(outcome)
    }

    /// Flush tasks, then contacts. Stops at the first failure, which has
    /// already been reported to the user.
    pub async fn save(&self) -> RemoteResult<SaveReport> {
        self.save_with(None).await
    }

    /// [`Board::save`] with the triggering control disabled while it runs
    pub async fn save_with(&self, control: Option<&dyn SaveControl>) -> RemoteResult<SaveReport> {
        let tasks = self.tasks.flush(&self.remote, control).await?;
        let contacts = self.contacts.flush(&self.remote, control).await?;
        Ok(SaveReport { tasks, contacts })
    }

    async fn update_task<F>(&self, id: EntityId, f: F) -> Result<(), ActionError>
    where
        F: FnOnce(&mut Task),
    {
        if self.tasks.update(id, f).await {
            Ok(())
        } else {
            Err(ActionError::NotFound { kind: "task", id })
        }
    }

    async fn unassign_everywhere(&self, contact_id: EntityId) -> usize {
        let affected: Vec<EntityId> = self
            .tasks
            .all()
            .await
            .iter()
            .filter(|task| task.assigned_to.contains(&contact_id))
            .filter_map(|task| task.id)
            .collect();
        for task_id in &affected {
            self.tasks.update(*task_id, |task| {
                task.unassign(contact_id);
            })
            .await;
        }
        affected.len()
    }
}

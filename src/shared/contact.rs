//! Contact records
//!
//! Contacts double as the board's users: tasks reference them by id in
//! `assignedTo`. The remote collection keeps them in insertion order; display
//! order is always by name.

use serde::{Deserialize, Serialize};

use crate::shared::entity::{Entity, EntityId};

/// Badge colors handed out to new contacts in rotation
pub const BADGE_COLORS: [&str; 8] = [
    "#FF7A00", "#9327FF", "#6E52FF", "#FC71FF", "#FFBB2B", "#1FD7C1", "#462F8A", "#FF4646",
];

/// A contact / board user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Contact {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub mail: String,
    #[serde(default)]
    pub phone: String,
    /// Badge background color (CSS hex)
    #[serde(default)]
    pub color: String,
}

impl Contact {
    pub fn new(name: impl Into<String>, mail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mail: mail.into(),
            ..Default::default()
        }
    }

    /// Upper-case initials of the first and last name part
    pub fn initials(&self) -> String {
        let mut parts = self.name.split_whitespace();
        let first = parts.next().and_then(|p| p.chars().next());
        let last = parts.last().and_then(|p| p.chars().next());
        first
            .into_iter()
            .chain(last)
            .flat_map(char::to_uppercase)
            .collect()
    }

    /// Pick a badge color from the rotation based on how many contacts exist
    pub fn assign_color(&mut self, existing: usize) {
        if self.color.is_empty() {
            self.color = BADGE_COLORS[existing % BADGE_COLORS.len()].to_string();
        }
    }
}

/// Contacts in display order (case-insensitive by name), storage order untouched
pub fn sorted_by_name(contacts: &[Contact]) -> Vec<Contact> {
    let mut sorted = contacts.to_vec();
    sorted.sort_by_cached_key(|c| c.name.to_lowercase());
    sorted
}

impl Entity for Contact {
    const KIND: &'static str = "contact";

    fn id(&self) -> Option<EntityId> {
        self.id
    }

    fn set_id(&mut self, id: EntityId) {
        self.id = Some(id);
    }
}

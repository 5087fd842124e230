//! # Offline Write Path
//!
//! Local-first pieces of the sync core: entities get ids on the client, edits
//! are recorded as pending ids, and a flush later ships them in one batch.
//!
//! ## Key Components
//!
//! - `id.rs`: collision-safe id generation
//! - `queue.rs`: pending upsert/delete sets
//! - `control.rs`: save-control and in-flight guards used by flush

pub mod control;
pub mod id;
pub mod queue;

// Re-export main types
pub use control::{ControlGuard, FlightGuard, SaveControl};
pub use id::{generate_id, EntropySource, IdGenerator, SystemEntropy, PRIMARY_ATTEMPTS};
pub use queue::{PendingChanges, PendingSnapshot};

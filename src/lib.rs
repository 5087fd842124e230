//! Taskboard Sync - Main Library
//!
//! Synchronization core of a Kanban task board whose tasks and contacts live in a
//! Firebase Realtime-Database-style REST store.
//!
//! # Overview
//!
//! The library keeps an in-memory copy of each collection, lets the UI layer
//! mutate it locally, and writes the changes back in batches:
//!
//! - Collision-safe numeric IDs for entities created on the client
//! - Tolerant collection loading that never fails the caller
//! - A pending-change queue flushed as one PATCH plus per-ID DELETEs
//! - A single channel for user-visible failure messages
//!
//! # Module Structure
//!
//! - **`shared`** - Entity types, configuration and error types
//!   - `Task`, `Contact`, the `Entity` trait and `EntityId`
//!   - `AppConfig` and its builder
//!   - `RemoteError`
//!
//! - **`remote`** - Remote-collection adapter
//!   - `Transport` trait and the `reqwest` implementation
//!   - Payload normalization and URL construction
//!   - Error policy and `SafeLoad` results
//!
//! - **`offline`** - Local-first write path
//!   - ID generator
//!   - Pending-change queue and save-control guard
//!
//! - **`store`** - `EntityStore<T>`, one per collection
//!
//! - **`board`** - Board session (tasks + contacts) and typed actions
//!
//! # Usage
//!
//! ```rust,no_run
//! use taskboard_sync::board::{Board, BoardAction};
//! use taskboard_sync::shared::AppConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::builder()
//!     .base_url("https://join-board-default-rtdb.firebaseio.com/")
//!     .build()?;
//! let board = Board::load(config).await?;
//! board.dispatch(BoardAction::DeleteTask { id: 42 }).await?;
//! board.save().await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Thread Safety
//!
//! Stores guard their collections with `tokio::sync::RwLock` and their pending
//! sets with a mutex, so every operation takes `&self`. At most one flush per
//! store is in flight at a time.

/// Shared types and data structures
pub mod shared;

/// Remote-collection adapter and error policy
pub mod remote;

/// ID generation and the pending-change queue
pub mod offline;

/// Entity stores
pub mod store;

/// Board session and actions
pub mod board;

#[cfg(test)]
pub(crate) mod test_support;

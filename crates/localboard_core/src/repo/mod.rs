//! Persistence layer: durable slots and the adapters writing into them.
//!
//! # Responsibility
//! - Define the durable key-value medium contract (`SlotRepository`).
//! - Isolate SQLite query details from store/controller orchestration.
//! - Serialize record collections and the theme preference into slots.
//!
//! # Invariants
//! - Reads degrade to "no prior state"; they never fail the caller.
//! - Writes are whole-value overwrites.

pub mod json_slot;
pub mod slot_repo;
pub mod theme_repo;

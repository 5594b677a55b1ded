//! Domain model for tracked records.
//!
//! # Responsibility
//! - Define the generic `Record`/`Category` contracts.
//! - Define the job application and cart line records.
//!
//! # Invariants
//! - Every record has a store-unique identity.
//! - Category dimensions are closed enums.

pub mod application;
pub mod cart;
pub mod record;
pub mod theme;

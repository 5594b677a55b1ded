//! Query/view pipeline over store snapshots.
//!
//! # Responsibility
//! - Derive filtered, sorted projections for display.
//! - Keep projection logic pure and recomputed on demand.

pub mod projection;

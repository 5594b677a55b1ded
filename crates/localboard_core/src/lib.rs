//! Core domain logic for the local job tracker and shopping cart.
//! This crate is the single source of truth for record invariants.

pub mod clock;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;
pub mod store;
pub mod transfer;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{CartConfig, TrackerConfig};
pub use db::{open_db, open_db_in_memory, DbError};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::application::{
    ApplicationFields, ApplicationId, ApplicationPatch, ApplicationStatus, JobApplication,
};
pub use model::cart::{CartLine, Product, ProductCategory, ProductId, QuantityChange, CATALOG};
pub use model::record::{Category, Record, RecordValidationError};
pub use model::theme::Theme;
pub use repo::json_slot::JsonSlot;
pub use repo::slot_repo::{
    MemorySlotRepository, RepoError, RepoResult, SlotRepository, SqliteSlotRepository,
};
pub use repo::theme_repo::ThemeSlot;
pub use search::projection::{category_counts, project, CategoryFilter, ViewQuery};
pub use service::cart_service::{open_cart_store, CartError, CartService, CartStore};
pub use service::feedback::{Confirm, Notice, NoticeKind};
pub use service::tracker_controller::{
    open_tracker_store, ClearOutcome, ControllerError, DeleteOutcome, EditorMode, SubmitOutcome,
    TrackerController, TrackerStore,
};
pub use store::{InsertPosition, RecordStore, StoreError, StoreEvent, StoreResult, UpdateOutcome};
pub use transfer::{ExportFile, ImportError, ImportReport, TRACKER_TRANSFER};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

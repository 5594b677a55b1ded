//! Session configuration for the tracker and cart cores.
//!
//! # Invariants
//! - Record slots and the theme slot use distinct keys.
//! - Durations are milliseconds and strictly positive.

use crate::transfer::{TransferFormat, TRACKER_TRANSFER};

pub const TRACKER_RECORDS_KEY: &str = "jobTrackerApps";
pub const TRACKER_THEME_KEY: &str = "jobTrackerTheme";
pub const CART_RECORDS_KEY: &str = "shopping-cart";

const TRACKER_NOTICE_MS: i64 = 2_200;
const TRACKER_HIGHLIGHT_MS: i64 = 900;
const CART_NOTICE_MS: i64 = 2_000;

/// Job tracker settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerConfig {
    /// Slot holding the application array.
    pub records_key: String,
    /// Slot holding the `light`/`dark` preference.
    pub theme_key: String,
    pub notice_duration_ms: i64,
    /// How long an updated record stays highlighted.
    pub highlight_duration_ms: i64,
    pub transfer: TransferFormat,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            records_key: TRACKER_RECORDS_KEY.to_string(),
            theme_key: TRACKER_THEME_KEY.to_string(),
            notice_duration_ms: TRACKER_NOTICE_MS,
            highlight_duration_ms: TRACKER_HIGHLIGHT_MS,
            transfer: TRACKER_TRANSFER,
        }
    }
}

/// Shopping cart settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartConfig {
    pub records_key: String,
    pub notice_duration_ms: i64,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            records_key: CART_RECORDS_KEY.to_string(),
            notice_duration_ms: CART_NOTICE_MS,
        }
    }
}

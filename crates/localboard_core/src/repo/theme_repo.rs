//! Theme preference persistence.
//!
//! # Invariants
//! - The slot only ever holds `light` or `dark`.
//! - Unknown or unreadable values read as "no preference".

use crate::model::theme::Theme;
use crate::repo::slot_repo::SlotRepository;
use log::warn;

/// Theme preference bound to its own slot, independent of record slots.
pub struct ThemeSlot<S: SlotRepository> {
    repo: S,
    key: String,
}

impl<S: SlotRepository> ThemeSlot<S> {
    pub fn new(repo: S, key: impl Into<String>) -> Self {
        Self {
            repo,
            key: key.into(),
        }
    }

    /// Returns the saved preference, if any.
    pub fn saved(&self) -> Option<Theme> {
        match self.repo.read_slot(&self.key) {
            Ok(value) => value.as_deref().and_then(Theme::parse),
            Err(err) => {
                warn!(
                    "event=theme_load module=repo status=degraded error_code={} error={err}",
                    err.error_code()
                );
                None
            }
        }
    }

    /// Saved preference, falling back to `Theme::default()`.
    pub fn current(&self) -> Theme {
        self.saved().unwrap_or_default()
    }

    /// Persists `theme`; failures are logged and swallowed.
    pub fn set(&self, theme: Theme) {
        if let Err(err) = self.repo.write_slot(&self.key, theme.as_str()) {
            warn!(
                "event=theme_save module=repo status=error error_code={} error={err}",
                err.error_code()
            );
        }
    }

    /// Flips the current theme, persists it and returns the new value.
    pub fn toggle(&self) -> Theme {
        let next = self.current().toggled();
        self.set(next);
        next
    }
}

#[cfg(test)]
mod tests {
    use super::ThemeSlot;
    use crate::model::theme::Theme;
    use crate::repo::slot_repo::{MemorySlotRepository, SlotRepository};

    #[test]
    fn unknown_value_reads_as_default_and_toggle_persists() {
        let repo = MemorySlotRepository::new();
        repo.write_slot("theme", "sepia").expect("write");
        let slot = ThemeSlot::new(repo.clone(), "theme");

        assert_eq!(slot.saved(), None);
        assert_eq!(slot.current(), Theme::Light);
        assert_eq!(slot.toggle(), Theme::Dark);
        assert_eq!(repo.read_slot("theme").expect("read").as_deref(), Some("dark"));
        assert_eq!(slot.toggle(), Theme::Light);
    }
}

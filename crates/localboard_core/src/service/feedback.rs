//! Transient UI feedback primitives.
//!
//! # Responsibility
//! - Model auto-dismissing notices and highlights as cancellable deferred
//!   actions driven by caller-supplied time.
//! - Model the confirmation step required before irreversible actions.
//!
//! # Invariants
//! - At most one pending value per `Deferred`; scheduling replaces the
//!   pending value and re-arms its deadline.
//! - A value is visible strictly before its deadline.

/// Single-slot deferred dismissal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deferred<T> {
    pending: Option<Pending<T>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Pending<T> {
    value: T,
    deadline_ms: i64,
}

impl<T> Default for Deferred<T> {
    fn default() -> Self {
        Self { pending: None }
    }
}

impl<T> Deferred<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shows `value` until `now_ms + duration_ms`, superseding any pending one.
    pub fn schedule(&mut self, value: T, now_ms: i64, duration_ms: i64) {
        self.pending = Some(Pending {
            value,
            deadline_ms: now_ms.saturating_add(duration_ms),
        });
    }

    /// Drops the pending value without waiting for its deadline.
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|pending| pending.value)
    }

    /// Pending value, if still before its deadline.
    pub fn current(&self, now_ms: i64) -> Option<&T> {
        self.pending
            .as_ref()
            .filter(|pending| now_ms < pending.deadline_ms)
            .map(|pending| &pending.value)
    }

    /// Dismisses an expired value and returns it.
    pub fn tick(&mut self, now_ms: i64) -> Option<T> {
        let expired = self
            .pending
            .as_ref()
            .is_some_and(|pending| now_ms >= pending.deadline_ms);
        if expired {
            self.cancel()
        } else {
            None
        }
    }
}

/// Visual category of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Info,
    Danger,
}

/// User-visible transient message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn new(kind: NoticeKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Confirmation step for irreversible actions.
pub trait Confirm {
    /// Returns `true` when the user accepted `prompt`.
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F: FnMut(&str) -> bool> Confirm for F {
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

#[cfg(test)]
mod tests {
    use super::{Confirm, Deferred};

    #[test]
    fn schedule_replaces_pending_value_and_rearms_deadline() {
        let mut toast = Deferred::new();
        toast.schedule("first", 0, 2_000);
        toast.schedule("second", 1_500, 2_000);

        assert_eq!(toast.current(2_500), Some(&"second"));
        assert_eq!(toast.tick(3_499), None);
        assert_eq!(toast.tick(3_500), Some("second"));
        assert_eq!(toast.current(3_500), None);
    }

    #[test]
    fn cancel_clears_immediately() {
        let mut highlight = Deferred::new();
        highlight.schedule(7_u32, 0, 900);
        assert_eq!(highlight.cancel(), Some(7));
        assert_eq!(highlight.current(1), None);
    }

    #[test]
    fn closures_act_as_confirmations() {
        let mut prompts = Vec::new();
        let mut accept = |prompt: &str| {
            prompts.push(prompt.to_string());
            true
        };
        assert!(accept.confirm("sure?"));
        assert_eq!(prompts, vec!["sure?".to_string()]);
    }
}

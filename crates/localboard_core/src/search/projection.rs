//! Filtered, sorted projections over a store snapshot.
//!
//! # Responsibility
//! - Derive the display sequence for a text query and a category filter.
//! - Aggregate per-category counts over the full snapshot.
//!
//! # Invariants
//! - Pure: identical inputs give identical output; the snapshot is never
//!   mutated.
//! - Ordering is `created_at DESC`, missing timestamps as 0, stable on ties.

use crate::model::record::{Category, Record};
use std::collections::BTreeMap;

/// Sentinel accepted by `CategoryFilter::parse` for "no category filter".
pub const ALL_CATEGORIES: &str = "All";

/// Category predicate of a view query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryFilter<C> {
    All,
    Only(C),
}

impl<C> Default for CategoryFilter<C> {
    fn default() -> Self {
        Self::All
    }
}

impl<C: Category> CategoryFilter<C> {
    /// Parses `All` or an exact category name.
    pub fn parse(value: &str) -> Option<Self> {
        if value == ALL_CATEGORIES {
            return Some(Self::All);
        }
        C::parse(value).map(Self::Only)
    }

    pub fn matches(&self, category: C) -> bool {
        match self {
            Self::All => true,
            Self::Only(expected) => *expected == category,
        }
    }
}

/// Inputs of one projection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewQuery<C> {
    /// Free text; trimmed and matched case-insensitively.
    pub text: String,
    pub category: CategoryFilter<C>,
}

impl<C> Default for ViewQuery<C> {
    fn default() -> Self {
        Self {
            text: String::new(),
            category: CategoryFilter::All,
        }
    }
}

impl<C: Category> ViewQuery<C> {
    pub fn new(text: impl Into<String>, category: CategoryFilter<C>) -> Self {
        Self {
            text: text.into(),
            category,
        }
    }

    /// Query with text only.
    pub fn text(text: impl Into<String>) -> Self {
        Self::new(text, CategoryFilter::All)
    }

    /// Query with a category filter only.
    pub fn category(category: C) -> Self {
        Self::new(String::new(), CategoryFilter::Only(category))
    }
}

/// Returns the records passing both predicates, newest first.
pub fn project<R: Record>(records: &[R], query: &ViewQuery<R::Category>) -> Vec<R> {
    let needle = query.text.trim().to_lowercase();
    let mut matched: Vec<R> = records
        .iter()
        .filter(|record| {
            matches_text(*record, &needle) && query.category.matches(record.category())
        })
        .cloned()
        .collect();

    // `sort_by` is stable, so equal timestamps keep snapshot order.
    matched.sort_by(|left, right| {
        right
            .created_at()
            .unwrap_or(0)
            .cmp(&left.created_at().unwrap_or(0))
    });
    matched
}

/// Counts records per category. Every category is present, zeros included.
pub fn category_counts<R: Record>(records: &[R]) -> BTreeMap<R::Category, usize> {
    let mut counts: BTreeMap<R::Category, usize> = <R::Category as Category>::ALL
        .iter()
        .map(|category| (*category, 0))
        .collect();
    for record in records {
        *counts.entry(record.category()).or_insert(0) += 1;
    }
    counts
}

fn matches_text<R: Record>(record: &R, needle: &str) -> bool {
    needle.is_empty()
        || record
            .text_fields()
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
}

#[cfg(test)]
mod tests {
    use super::{project, CategoryFilter, ViewQuery};
    use crate::model::application::{ApplicationStatus, JobApplication};

    fn app(id: &str, company: &str, created_at: Option<i64>) -> JobApplication {
        JobApplication {
            id: id.to_string(),
            company: company.to_string(),
            position: "Engineer".to_string(),
            applied_date: "2024-01-01".to_string(),
            status: ApplicationStatus::Applied,
            notes: String::new(),
            created_at,
            updated_at: None,
        }
    }

    #[test]
    fn ties_keep_input_order_and_missing_timestamp_sorts_last() {
        let records = vec![
            app("old", "A", None),
            app("tie-1", "B", Some(10)),
            app("tie-2", "C", Some(10)),
            app("new", "D", Some(20)),
        ];
        let ids: Vec<_> = project(&records, &ViewQuery::default())
            .into_iter()
            .map(|record| record.id)
            .collect();
        assert_eq!(ids, vec!["new", "tie-1", "tie-2", "old"]);
    }

    #[test]
    fn text_query_is_trimmed_and_case_insensitive() {
        let records = vec![app("1", "Acme Corp", Some(1)), app("2", "Globex", Some(2))];
        let hits = project(&records, &ViewQuery::text("  aCmE "));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "1");
    }

    #[test]
    fn category_filter_parses_sentinel_and_members() {
        assert_eq!(
            CategoryFilter::<ApplicationStatus>::parse("All"),
            Some(CategoryFilter::All)
        );
        assert_eq!(
            CategoryFilter::parse("Rejected"),
            Some(CategoryFilter::Only(ApplicationStatus::Rejected))
        );
        assert_eq!(CategoryFilter::<ApplicationStatus>::parse("all"), None);
    }
}

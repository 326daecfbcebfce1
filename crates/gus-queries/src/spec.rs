//! Query specification
//!
//! A `QuerySpec` is built incrementally, rendered once, and discarded; it
//! holds no caches or counters, so rendering the same spec twice yields
//! byte-identical strings.

use gus_core::error::QueryError;

use crate::assemble::{assemble, FieldList, Sort, SortDirection};
use crate::filters::Fragment;

/// Row cap applied when a caller asks for "the default limit".
pub const DEFAULT_LIMIT: u32 = 15;

/// Connective used when merging a new predicate into an existing filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combine {
    And,
    Or,
}

impl Combine {
    fn as_str(&self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }
}

/// Incrementally-built description of one query
#[derive(Debug, Clone, Default)]
pub struct QuerySpec {
    fields: FieldList,
    filter: Option<Fragment>,
    sort: Option<Sort>,
    limit: Option<u32>,
}

impl QuerySpec {
    /// Create a spec selecting the default `Id` field.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the field list.
    pub fn set_fields(&mut self, fields: impl Into<FieldList>) {
        self.fields = fields.into();
    }

    /// Merge a predicate into the existing filter with the given
    /// connective. Merging appends; it never replaces what is already
    /// there.
    pub fn merge_filter(&mut self, fragment: Fragment, combine: Combine) {
        self.filter = Some(match self.filter.take() {
            Some(existing) => Fragment::raw(format!(
                "{} {} {}",
                existing,
                combine.as_str(),
                fragment
            )),
            None => fragment,
        });
    }

    /// Set the sort clause; field and direction always travel together.
    pub fn set_sort(&mut self, field: impl Into<String>, direction: SortDirection) {
        self.sort = Some(Sort::new(field, direction));
    }

    /// Cap the result set. Zero is rejected at render time.
    pub fn set_limit(&mut self, rows: u32) {
        self.limit = Some(rows);
    }

    /// Cap the result set at [`DEFAULT_LIMIT`] rows.
    pub fn set_default_limit(&mut self) {
        self.set_limit(DEFAULT_LIMIT);
    }

    /// The merged filter so far, if any.
    pub fn filter(&self) -> Option<&Fragment> {
        self.filter.as_ref()
    }

    /// Render the spec against a concrete object name.
    pub fn render(&self, object: &str) -> Result<String, QueryError> {
        assemble(
            object,
            &self.fields,
            self.filter.as_ref(),
            self.sort.as_ref(),
            self.limit,
        )
    }
}

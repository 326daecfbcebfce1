//! # gus-queries
//!
//! Query construction for GUS RS.
//!
//! This crate turns human-friendly requests ("comments for these case
//! numbers", "cases owned by the release teams") into finished query
//! strings, without the caller hand-writing the query language or tracking
//! concrete field names across schema changes.
//!
//! ## Structure
//!
//! - `filters` - Predicate fragments and their combinators
//! - `assemble` - Clause-by-clause rendering of the final string
//! - `spec` - The incrementally-built query specification
//! - `objects` - Per-entity builders with relationship resolution
//! - `shifts` - Regional shift window resolution for time filters
//!
//! ## Example
//!
//! ```
//! use gus_queries::ObjectQuery;
//! use gus_schema::SchemaRegistry;
//!
//! let registry = SchemaRegistry::builtin();
//!
//! // Comments for two cases, resolved through a nested Case subquery.
//! let soql = ObjectQuery::comment(registry)
//!     .fields("Id, CommentBody")
//!     .build_for(vec!["02801523", "02801524"])
//!     .unwrap();
//! assert!(soql.contains("ParentId IN (SELECT Id FROM Case"));
//!
//! // The fixed release-team scope.
//! let gre = ObjectQuery::case(registry).gre().build().unwrap();
//! assert!(gre.starts_with("SELECT Id FROM Case WHERE"));
//! ```

pub mod assemble;
pub mod filters;
pub mod objects;
pub mod shifts;
pub mod spec;

// Re-exports for convenience
pub use assemble::{assemble, FieldList, Sort, SortDirection};
pub use filters::{bracket, quote, FilterResult, Fragment, Lenient};
pub use objects::{EntityConfig, IntoFragment, KeySet, ObjectQuery};
pub use shifts::{Shift, ShiftWindow};
pub use spec::{Combine, QuerySpec, DEFAULT_LIMIT};

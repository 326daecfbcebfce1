//! # gus-schema
//!
//! Logical-to-concrete schema name mapping for GUS RS.
//!
//! Callers refer to entities by stable logical names (`"Case"`,
//! `"ScrumMember"`) and to fields by per-entity aliases (`"Team"`,
//! `"MemberName"`); the registry maps both to the concrete schema names the
//! query language expects. The mapping is loaded once from a static JSON
//! resource and never mutated, so a registry value is safe to share across
//! threads by reference.
//!
//! A name missing from the catalogue is not an error: it is passed through
//! literally with a warning diagnostic, so objects outside the catalogue
//! stay queryable.

pub mod registry;

pub use registry::{SchemaEntry, SchemaError, SchemaRegistry};

//! # gus-core
//!
//! Core types shared across the GUS RS crates:
//! - Common error types and result aliases
//! - Datetime literal rendering for the query language
//!
//! Higher layers (`gus-schema`, `gus-queries`, `gus-client`) build on these
//! without depending on each other.

pub mod datetime;
pub mod error;

pub use error::*;

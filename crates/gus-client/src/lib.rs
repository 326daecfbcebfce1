//! # gus-client
//!
//! The authenticated-session boundary for GUS RS.
//!
//! The query layer never talks to the platform itself: it hands a finished
//! query string to an implementation of [`QueryExecutor`] and receives
//! rows back. This crate carries that abstraction plus the session
//! bookkeeping an implementation needs — credentials, session state, and a
//! retry wrapper that reconnects once after a session expiry.
//!
//! Actual network transport is out of scope and supplied by the embedding
//! application; [`StaticExecutor`] serves tests and offline use.

pub mod executor;
pub mod records;
pub mod session;

pub use executor::{QueryExecutor, Reconnecting, StaticExecutor};
pub use records::Record;
pub use session::{Credentials, SessionState};

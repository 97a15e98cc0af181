//! # sqlx-sqlite-session
//!
//! Config-driven initialization of a single SQLite session over SQLx.
//!
//! A "session" here is one open engine connection, held for the lifetime of
//! the owning component. Node code that needs a named on-disk database
//! describes it with a [`SessionConfig`] (directory, name, extension) and
//! opens it once; maintenance layers such as a WAL checkpointer can then
//! borrow the session's raw engine handle for the connection's entire open
//! lifetime.
//!
//! ## Core Types
//!
//! - **[`SessionConfig`]**: where the database file lives and which backend
//!   serves it
//! - **[`SqliteSession`]**: one open connection, WAL journal mode, with
//!   engine memory diagnostics
//! - **[`Error`]**: error type for session operations
//!
//! ## Architecture
//!
//! - **Single connection**: the session is one `SqliteConnection` behind an
//!   async mutex; writes are serialized by construction and the engine's own
//!   concurrency control handles the rest
//! - **Fail-fast configuration**: an empty name/directory or an unsupported
//!   backend is a construction error, never a runtime one

mod config;
mod error;
mod session;

pub use config::SessionConfig;
pub use error::{Error, Result};
pub use session::SqliteSession;

//! # sqlx-sqlite-checkpoint
//!
//! Coalescing WAL checkpoint coordination for SQLite connections.
//!
//! SQLite in WAL journal mode appends committed pages to a write-ahead log
//! that must periodically be folded back into the main database file. This
//! crate owns that maintenance: a [`WalCheckpointer`] registers itself as a
//! connection's WAL hook, watches log growth notifications arriving on the
//! write path, and once the log passes a configurable page threshold hands
//! exactly one passive-checkpoint job to a background
//! [`job_pool::JobPool`]. Growth bursts coalesce into that single pending
//! job; the write path itself never checkpoints and never blocks beyond a
//! check-and-set of one flag.
//!
//! Checkpointing is best-effort maintenance: the engine guarantees
//! durability without it, so no outcome here is ever escalated beyond a
//! warning.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use job_pool::TokioJobPool;
//! use sqlx_sqlite_session::{SessionConfig, SqliteSession};
//! use sqlx_sqlite_checkpoint::{self as checkpoint, CheckpointConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!    let session = SqliteSession::open(&SessionConfig::new("/tmp/dbs", "ledger")).await?;
//!    let jobs = Arc::new(TokioJobPool::current());
//!
//!    let checkpointer =
//!       checkpoint::attach(&session, jobs, CheckpointConfig::default()).await?;
//!
//!    // ... writes on the session now schedule background checkpoints ...
//!
//!    checkpointer.detach();
//!    Ok(())
//! }
//! ```

mod config;
mod connection;
mod coordinator;
mod error;
mod hook;

#[cfg(feature = "session")]
mod session;

pub use config::CheckpointConfig;
pub use connection::{CheckpointOutcome, CheckpointStatus, RawWalConnection, WalConnection};
pub use coordinator::{WalCheckpointer, WalObserver};
pub use error::{Error, Result};

#[cfg(feature = "session")]
pub use session::{attach, make_checkpointer};

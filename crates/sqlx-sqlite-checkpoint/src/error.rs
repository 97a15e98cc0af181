//! Error types for the sqlx-sqlite-checkpoint crate.

/// Errors that can occur when installing a checkpoint coordinator.
#[derive(Debug, thiserror::Error)]
pub enum Error {
   /// The connection handle is missing or not usable for checkpointing.
   #[error("didn't get a usable database connection")]
   InvalidConnection,

   /// SQLx error while borrowing the connection's raw handle.
   #[cfg(feature = "session")]
   #[error("Database error: {0}")]
   Sqlx(#[from] sqlx::Error),

   /// Error from the session crate.
   #[cfg(feature = "session")]
   #[error(transparent)]
   Session(#[from] sqlx_sqlite_session::Error),
}

/// A type alias for Results with our Error type
pub type Result<T> = std::result::Result<T, Error>;

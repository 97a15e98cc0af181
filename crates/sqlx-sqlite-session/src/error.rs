//! Error types for sqlx-sqlite-session

use thiserror::Error;

/// Errors that may occur when opening or inspecting a session
#[derive(Error, Debug)]
pub enum Error {
   /// IO error when accessing database files. Standard library IO errors
   /// are converted to this variant.
   #[error("IO error: {0}")]
   Io(#[from] std::io::Error),

   /// Error from the sqlx library. Standard sqlx errors are converted to this variant
   #[error("Sqlx error: {0}")]
   Sqlx(#[from] sqlx::Error),

   /// Session config did not name both a directory and a database name
   #[error("SQLite sessions must specify a dir and a name. Name: {name} Dir: {directory}")]
   InvalidConfig { name: String, directory: String },

   /// Only the sqlite backend is supported
   #[error("Unsupported session backend: {0}")]
   UnsupportedBackend(String),

   /// An engine status query failed with the given result code
   #[error("engine status query failed with code {0}")]
   Status(i32),
}

/// A type alias for Results with our Error type
pub type Result<T> = std::result::Result<T, Error>;

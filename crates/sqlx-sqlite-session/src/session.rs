//! A single open SQLite connection with engine memory diagnostics

use std::fs::create_dir_all;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use libsqlite3_sys::{SQLITE_DBSTATUS_CACHE_USED, SQLITE_OK, sqlite3_db_status, sqlite3_memory_used};
use sqlx::ConnectOptions;
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection, SqliteJournalMode};
use tokio::sync::{Mutex, MutexGuard};
use tracing::debug;

use crate::config::SessionConfig;
use crate::error::{Error, Result};

/// One open SQLite connection, held for the lifetime of the owning component.
///
/// The connection is opened in WAL journal mode and guarded by an async
/// mutex: all statements on the session are serialized by construction.
/// Maintenance layers (e.g. a WAL checkpointer) may borrow the raw engine
/// handle through [`SqliteSession::conn`] + `lock_handle()`; the handle stays
/// valid for as long as the session is alive, so such layers should hold the
/// session `Arc`.
#[derive(Debug)]
pub struct SqliteSession {
   /// The session's sole connection.
   conn: Mutex<SqliteConnection>,

   /// Path to the database file (used for diagnostics).
   path: PathBuf,
}

impl SqliteSession {
   /// Open the session described by `config`.
   ///
   /// Creates the configured directory if it does not exist and the database
   /// file on first open. Fails fast on an invalid config (empty name or
   /// directory, unsupported backend).
   pub async fn open(config: &SessionConfig) -> Result<Arc<Self>> {
      let path = config.resolve_path()?;
      create_dir_all(&config.directory)?;
      Self::open_at(&path).await
   }

   /// Open a session on an explicit database file path.
   ///
   /// This is the core open method used by [`SqliteSession::open`]. It's also
   /// exposed for testing purposes where there is no named config.
   pub async fn open_at(path: impl AsRef<Path>) -> Result<Arc<Self>> {
      let path = path.as_ref();
      let options = SqliteConnectOptions::new()
         .filename(path)
         .create_if_missing(true)
         .journal_mode(SqliteJournalMode::Wal);

      let conn = options.connect().await?;
      debug!(path = %path.display(), "opened sqlite session");

      Ok(Arc::new(Self {
         conn: Mutex::new(conn),
         path: path.to_path_buf(),
      }))
   }

   /// Lock the session's connection for use.
   pub async fn conn(&self) -> MutexGuard<'_, SqliteConnection> {
      self.conn.lock().await
   }

   /// Path of the database file.
   pub fn path(&self) -> &Path {
      &self.path
   }

   /// Database filename for diagnostics.
   pub fn filename(&self) -> String {
      self.path.display().to_string()
   }

   /// Kilobytes of memory the engine has allocated process-wide, across
   /// every connection.
   pub fn memory_used_kb() -> u64 {
      // sqlite3_memory_used reports a signed byte count
      (unsafe { sqlite3_memory_used() }.max(0) as u64) / 1024
   }

   /// Kilobytes of page-cache memory used by this session's connection.
   pub async fn page_cache_used_kb(&self) -> Result<u64> {
      let mut conn = self.conn.lock().await;
      let mut handle = conn.lock_handle().await?;
      let db = handle.as_raw_handle().as_ptr();

      let mut current: i32 = 0;
      let mut highwater: i32 = 0;
      // SAFETY: `db` comes from the locked handle and stays valid while the
      // guard is held.
      let rc = unsafe {
         sqlite3_db_status(
            db,
            SQLITE_DBSTATUS_CACHE_USED,
            &mut current,
            &mut highwater,
            0,
         )
      };
      if rc != SQLITE_OK {
         return Err(Error::Status(rc));
      }

      Ok(current.max(0) as u64 / 1024)
   }
}

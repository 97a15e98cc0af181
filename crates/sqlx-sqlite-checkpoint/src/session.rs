//! Integration with the sqlx-sqlite-session crate.
//!
//! Attaches a checkpoint coordinator to a session's connection for the
//! session's open lifetime. Enable with the `session` feature (on by
//! default).

use std::sync::Arc;

use job_pool::JobPool;
use sqlx_sqlite_session::SqliteSession;
use tracing::{debug, warn};

use crate::config::CheckpointConfig;
use crate::connection::{CheckpointOutcome, RawWalConnection, WalConnection};
use crate::coordinator::{Inner, WalCheckpointer};
use crate::error::Result;
use crate::hook::WalHookGuard;

/// [`WalConnection`] borrowed from a session.
///
/// Holds the session `Arc` so the raw handle stays valid for as long as a
/// checkpoint job may still run.
struct SessionWalConnection {
   raw: RawWalConnection,
   _session: Arc<SqliteSession>,
}

impl WalConnection for SessionWalConnection {
   fn passive_checkpoint(&self) -> CheckpointOutcome {
      self.raw.passive_checkpoint()
   }

   fn filename(&self) -> String {
      self.raw.filename()
   }
}

/// Attach a checkpoint coordinator to the session's connection.
///
/// The coordinator becomes the connection's WAL hook until it is detached
/// or dropped.
pub async fn attach(
   session: &Arc<SqliteSession>,
   jobs: Arc<dyn JobPool>,
   config: CheckpointConfig,
) -> Result<WalCheckpointer> {
   let db = {
      let mut conn = session.conn().await;
      let mut handle = conn.lock_handle().await?;
      handle.as_raw_handle().as_ptr()
   };

   // SAFETY: the handle belongs to the session's connection, and the
   // wrapper keeps the session alive for the coordinator's lifetime.
   let conn: Arc<dyn WalConnection> = Arc::new(SessionWalConnection {
      raw: unsafe { RawWalConnection::new(db) },
      _session: Arc::clone(session),
   });

   let inner = Inner::new(conn, jobs, config);
   // SAFETY: same handle as above; the coordinator owns the registration.
   let hook = unsafe { WalHookGuard::install(db, &inner) };

   debug!(db = %session.filename(), "wal checkpointer attached");
   Ok(WalCheckpointer::from_parts(inner, hook))
}

/// Attach a coordinator with the default config, returning `None` when the
/// session's connection is unusable for checkpointing.
pub async fn make_checkpointer(
   session: &Arc<SqliteSession>,
   jobs: Arc<dyn JobPool>,
) -> Option<WalCheckpointer> {
   match attach(session, jobs, CheckpointConfig::default()).await {
      Ok(checkpointer) => Some(checkpointer),
      Err(e) => {
         warn!(db = %session.filename(), error = %e, "could not attach wal checkpointer");
         None
      }
   }
}

//! The checkpoint coordinator: trigger decision, coalescing, and the
//! background checkpoint job.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use job_pool::{JobKind, JobPool};
use libsqlite3_sys::sqlite3;
use parking_lot::Mutex;
use tracing::{trace, warn};

use crate::config::CheckpointConfig;
use crate::connection::{CheckpointStatus, RawWalConnection, WalConnection};
use crate::error::{Error, Result};
use crate::hook::WalHookGuard;

/// Shared coordinator state. The engine's WAL hook holds a `Weak` to this,
/// and so does every [`WalObserver`]; checkpoint jobs hold a strong
/// reference so the connection wrapper stays alive until they finish.
pub(crate) struct Inner {
   conn: Arc<dyn WalConnection>,
   jobs: Arc<dyn JobPool>,
   threshold_pages: i32,
   /// True while a checkpoint job is queued or executing.
   running: Mutex<bool>,
   /// Set by detach; gates any notification that raced past a weak upgrade.
   detached: AtomicBool,
   /// Self-handle handed to checkpoint job closures.
   me: Weak<Inner>,
}

impl Inner {
   pub(crate) fn new(
      conn: Arc<dyn WalConnection>,
      jobs: Arc<dyn JobPool>,
      config: CheckpointConfig,
   ) -> Arc<Self> {
      Arc::new_cyclic(|me| Self {
         conn,
         jobs,
         threshold_pages: config.threshold_pages.min(i32::MAX as u32) as i32,
         running: Mutex::new(false),
         detached: AtomicBool::new(false),
         me: me.clone(),
      })
   }

   /// The trigger decision. Runs on the thread performing the write, so it
   /// must not block beyond the check-and-set below and must never surface
   /// an error to that write.
   pub(crate) fn on_log_growth(&self, db_name: &str, pages: i32) {
      if self.detached.load(Ordering::Acquire) {
         return;
      }
      if pages < self.threshold_pages {
         return;
      }

      {
         let mut running = self.running.lock();
         if *running {
            // A checkpoint is already queued or in flight; this growth
            // event needs no separate action.
            return;
         }
         *running = true;
      }

      trace!(db = db_name, pages, "wal grew past threshold, scheduling checkpoint");

      let Some(inner) = self.me.upgrade() else {
         return;
      };
      self
         .jobs
         .submit(JobKind::WalCheckpoint, "wal-checkpoint", Box::new(move || inner.checkpoint()));
   }

   /// The background checkpoint job. Blocking engine I/O happens here, off
   /// the write path.
   pub(crate) fn checkpoint(&self) {
      let outcome = self.conn.passive_checkpoint();
      let db = self.conn.filename();

      match outcome.status {
         CheckpointStatus::Ok => {
            trace!(
               db = %db,
               frames = outcome.frames_in_log,
               written = outcome.frames_written,
               "wal checkpoint complete"
            );
         }
         CheckpointStatus::Contended => {
            trace!(db = %db, "wal checkpoint deferred, database locked");
         }
         CheckpointStatus::Failed(code) => {
            warn!(db = %db, code, "wal checkpoint failed");
         }
      }

      *self.running.lock() = false;
   }

   pub(crate) fn is_running(&self) -> bool {
      *self.running.lock()
   }

   pub(crate) fn is_detached(&self) -> bool {
      self.detached.load(Ordering::Acquire)
   }

   pub(crate) fn detach(&self) {
      self.detached.store(true, Ordering::Release);
   }
}

/// Coordinates WAL checkpoints for one database connection.
///
/// At most one checkpoint job is queued or executing per coordinator at any
/// time; growth-notification bursts coalesce into that single pending job.
/// The coordinator is registered as the connection's exclusive WAL hook for
/// its entire lifetime. Dropping it (or calling
/// [`detach`](WalCheckpointer::detach)) deregisters the hook before any
/// other teardown, so no notification is ever delivered into a destroyed
/// coordinator.
pub struct WalCheckpointer {
   inner: Arc<Inner>,
   hook: Option<WalHookGuard>,
}

impl WalCheckpointer {
   /// Coordinator driven by explicit [`on_log_growth`] calls (or a
   /// [`WalObserver`]); no engine hook is installed.
   ///
   /// [`on_log_growth`]: WalCheckpointer::on_log_growth
   pub fn new(
      conn: Arc<dyn WalConnection>,
      jobs: Arc<dyn JobPool>,
      config: CheckpointConfig,
   ) -> Self {
      Self {
         inner: Inner::new(conn, jobs, config),
         hook: None,
      }
   }

   /// Register a coordinator as the WAL hook of a raw connection handle.
   ///
   /// Fails only when the handle is null.
   ///
   /// # Safety
   ///
   /// `db` must point to an open connection that outlives the returned
   /// coordinator, and the coordinator must be the connection's only WAL
   /// hook user.
   pub unsafe fn install_raw(
      db: *mut sqlite3,
      jobs: Arc<dyn JobPool>,
      config: CheckpointConfig,
   ) -> Result<Self> {
      if db.is_null() {
         return Err(Error::InvalidConnection);
      }
      let conn: Arc<dyn WalConnection> = Arc::new(unsafe { RawWalConnection::new(db) });
      let inner = Inner::new(conn, jobs, config);
      let hook = unsafe { WalHookGuard::install(db, &inner) };
      Ok(Self {
         inner,
         hook: Some(hook),
      })
   }

   #[cfg(feature = "session")]
   pub(crate) fn from_parts(inner: Arc<Inner>, hook: WalHookGuard) -> Self {
      Self {
         inner,
         hook: Some(hook),
      }
   }

   /// Deliver a log-growth notification.
   ///
   /// This is what the engine hook calls on the write path: it performs the
   /// trigger decision and, at most, hands one checkpoint job to the pool.
   pub fn on_log_growth(&self, db_name: &str, pages: i32) {
      self.inner.on_log_growth(db_name, pages);
   }

   /// Engine-side handle for delivering notifications without owning the
   /// coordinator.
   pub fn observer(&self) -> WalObserver {
      WalObserver {
         inner: Arc::downgrade(&self.inner),
      }
   }

   /// True while a checkpoint job is queued or executing.
   pub fn is_running(&self) -> bool {
      self.inner.is_running()
   }

   /// Deregister the WAL hook and stop accepting notifications.
   ///
   /// Idempotent. An in-flight checkpoint job is allowed to finish; it holds
   /// the connection wrapper alive until it does.
   pub fn detach(&self) {
      self.inner.detach();
      if let Some(hook) = &self.hook {
         hook.remove();
      }
   }
}

impl Drop for WalCheckpointer {
   fn drop(&mut self) {
      self.detach();
   }
}

/// Weak engine-side handle through which log-growth notifications are
/// delivered.
///
/// This is the shape of the engine's own back-reference: it can outlive the
/// coordinator, and deliveries after the coordinator is gone simply report
/// `false`.
#[derive(Clone)]
pub struct WalObserver {
   inner: Weak<Inner>,
}

impl WalObserver {
   /// Deliver a growth notification. Returns `false` once the coordinator
   /// has been detached or dropped.
   pub fn notify(&self, db_name: &str, pages: i32) -> bool {
      match self.inner.upgrade() {
         Some(inner) if !inner.is_detached() => {
            inner.on_log_growth(db_name, pages);
            true
         }
         _ => false,
      }
   }
}

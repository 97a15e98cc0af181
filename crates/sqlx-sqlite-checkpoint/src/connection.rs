//! The WAL maintenance surface of one open database connection.

use std::ptr;

use libsqlite3_sys::{
   SQLITE_BUSY, SQLITE_CHECKPOINT_PASSIVE, SQLITE_LOCKED, SQLITE_OK, sqlite3,
   sqlite3_db_filename, sqlite3_wal_checkpoint_v2,
};

/// How one passive checkpoint pass ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckpointStatus {
   /// Every reachable log frame was copied back into the database file.
   Ok,
   /// Another connection held a conflicting lock. Expected under write
   /// load; the next trigger retries.
   Contended,
   /// The checkpoint failed with the given engine result code.
   Failed(i32),
}

/// Result of one passive checkpoint pass.
///
/// Frame counts are reported by the engine and may be -1 when it could not
/// determine them (e.g. a contended pass).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckpointOutcome {
   /// Frames in the write-ahead log at the end of the pass.
   pub frames_in_log: i32,
   /// Frames written back to the database file.
   pub frames_written: i32,
   /// How the pass ended.
   pub status: CheckpointStatus,
}

/// Write-ahead-log maintenance capability of one open connection.
///
/// The coordinator only ever asks a connection for a passive checkpoint and
/// for its filename; everything else about the connection (statement
/// execution, locking, the page cache) belongs to its owner.
pub trait WalConnection: Send + Sync {
   /// Flush as many log frames as possible without blocking concurrent
   /// readers or writers. Never fails the caller; the outcome reports how
   /// far the pass got.
   fn passive_checkpoint(&self) -> CheckpointOutcome;

   /// Database filename for diagnostics.
   fn filename(&self) -> String;
}

/// [`WalConnection`] over a raw engine handle.
pub struct RawWalConnection {
   db: *mut sqlite3,
}

// SAFETY: the handle is only used for checkpoint calls and filename lookups;
// SQLite serializes cross-thread use of a connection in its default
// threading mode.
unsafe impl Send for RawWalConnection {}
unsafe impl Sync for RawWalConnection {}

impl RawWalConnection {
   /// Wrap a raw connection handle.
   ///
   /// # Safety
   ///
   /// `db` must point to an open connection that outlives the returned
   /// value, and the engine library must be built in its default
   /// (serialized) threading mode.
   pub unsafe fn new(db: *mut sqlite3) -> Self {
      Self { db }
   }
}

impl WalConnection for RawWalConnection {
   fn passive_checkpoint(&self) -> CheckpointOutcome {
      let mut frames_in_log: i32 = 0;
      let mut frames_written: i32 = 0;

      // SAFETY: `db` is open for as long as this value exists, per the
      // constructor contract.
      let rc = unsafe {
         sqlite3_wal_checkpoint_v2(
            self.db,
            ptr::null(),
            SQLITE_CHECKPOINT_PASSIVE,
            &mut frames_in_log,
            &mut frames_written,
         )
      };

      let status = match rc {
         SQLITE_OK => CheckpointStatus::Ok,
         SQLITE_BUSY | SQLITE_LOCKED => CheckpointStatus::Contended,
         code => CheckpointStatus::Failed(code),
      };

      CheckpointOutcome {
         frames_in_log,
         frames_written,
         status,
      }
   }

   fn filename(&self) -> String {
      // SAFETY: see passive_checkpoint. The returned pointer is owned by
      // the connection and copied out before any other engine call.
      let name = unsafe { sqlite3_db_filename(self.db, c"main".as_ptr()) };
      if name.is_null() {
         String::new()
      } else {
         unsafe { std::ffi::CStr::from_ptr(name) }
            .to_string_lossy()
            .into_owned()
      }
   }
}

//! Registration of the coordinator as a connection's WAL hook.
//!
//! The engine invokes the hook synchronously on the thread performing a
//! write, passing back the user-data pointer handed over at registration.
//! That pointer is a leaked `Weak` to the coordinator internals: the engine
//! never owns the coordinator, a late invocation after the coordinator is
//! gone upgrades to nothing, and deregistration reclaims the leak.

use std::ffi::{CStr, c_char, c_int, c_void};
use std::mem::ManuallyDrop;
use std::ptr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use libsqlite3_sys::{SQLITE_OK, sqlite3, sqlite3_wal_hook};

use crate::coordinator::Inner;

/// Owns one WAL hook registration and removes it at most once.
pub(crate) struct WalHookGuard {
   db: *mut sqlite3,
   installed: AtomicBool,
}

// SAFETY: the pointer is only used to swap the connection's WAL hook, and
// SQLite serializes cross-thread use of a connection in its default
// threading mode.
unsafe impl Send for WalHookGuard {}
unsafe impl Sync for WalHookGuard {}

impl WalHookGuard {
   /// Register `inner` as the connection's WAL hook.
   ///
   /// # Safety
   ///
   /// `db` must point to an open connection that outlives the guard, and
   /// the coordinator must be the connection's only WAL hook user (the
   /// engine keeps a single hook per connection; installing over a foreign
   /// hook would silently replace it).
   pub(crate) unsafe fn install(db: *mut sqlite3, inner: &Arc<Inner>) -> Self {
      let data = Weak::into_raw(Arc::downgrade(inner)) as *mut c_void;
      let _prev = unsafe { sqlite3_wal_hook(db, Some(wal_hook_trampoline), data) };
      Self {
         db,
         installed: AtomicBool::new(true),
      }
   }

   /// Deregister the hook. Idempotent; once this returns the engine can no
   /// longer invoke the trampoline for this registration.
   pub(crate) fn remove(&self) {
      if self.installed.swap(false, Ordering::AcqRel) {
         let prev = unsafe { sqlite3_wal_hook(self.db, None, ptr::null_mut()) };
         if !prev.is_null() {
            // Reclaim the weak reference leaked at install.
            drop(unsafe { Weak::from_raw(prev as *const Inner) });
         }
      }
   }
}

impl Drop for WalHookGuard {
   fn drop(&mut self) {
      self.remove();
   }
}

unsafe extern "C" fn wal_hook_trampoline(
   data: *mut c_void,
   _db: *mut sqlite3,
   db_name: *const c_char,
   pages: c_int,
) -> c_int {
   if data.is_null() {
      return SQLITE_OK;
   }

   // The engine borrows the Weak; it is reclaimed at deregistration, never
   // here.
   let weak = ManuallyDrop::new(unsafe { Weak::from_raw(data as *const Inner) });
   if let Some(inner) = weak.upgrade() {
      let name = if db_name.is_null() {
         String::new()
      } else {
         unsafe { CStr::from_ptr(db_name) }.to_string_lossy().into_owned()
      };
      inner.on_log_growth(&name, pages);
   }

   SQLITE_OK
}

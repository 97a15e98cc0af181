//! # job-pool
//!
//! Fire-and-forget submission of named background work onto a shared worker
//! pool.
//!
//! Database maintenance (WAL checkpoints) and outbound event delivery both
//! hand work off this way: the submitting thread must return immediately, the
//! job runs later on a pool thread, and nothing is reported back to the
//! submitter. There is no ordering guarantee across independently submitted
//! jobs.
//!
//! ## Core Types
//!
//! - **[`JobPool`]**: the submission trait
//! - **[`TokioJobPool`]**: runs jobs on tokio's blocking thread pool
//! - **[`InlineJobPool`]**: runs jobs synchronously on the submitting thread

use tokio::runtime::Handle;
use tracing::trace;

/// Category of background work, used for scheduling diagnostics and log
/// fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobKind {
   /// WAL checkpoint maintenance triggered by log growth.
   WalCheckpoint,
   /// Outbound event delivery to a subscriber.
   EventRelay,
}

impl JobKind {
   /// Stable name for log fields.
   pub fn as_str(&self) -> &'static str {
      match self {
         JobKind::WalCheckpoint => "wal-checkpoint",
         JobKind::EventRelay => "event-relay",
      }
   }
}

/// A unit of background work.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Fire-and-forget submission of named background work.
///
/// `submit` must never block on the job's execution; jobs may block
/// internally (engine I/O, outbound HTTP) once they are running on a pool
/// thread.
pub trait JobPool: Send + Sync + 'static {
   /// Submit a job for asynchronous execution. The label identifies the
   /// submission in logs; it carries no scheduling meaning.
   fn submit(&self, kind: JobKind, label: &str, job: Job);
}

/// Runs jobs on tokio's blocking thread pool.
///
/// Jobs are allowed to block (checkpointing and HTTP delivery both do), so
/// they go to `spawn_blocking` rather than onto the async executor.
#[derive(Debug, Clone)]
pub struct TokioJobPool {
   handle: Handle,
}

impl TokioJobPool {
   /// Create a pool that submits onto the given runtime.
   pub fn new(handle: Handle) -> Self {
      Self { handle }
   }

   /// Create a pool bound to the current runtime.
   ///
   /// # Panics
   ///
   /// Panics when called outside a tokio runtime context.
   pub fn current() -> Self {
      Self::new(Handle::current())
   }
}

impl JobPool for TokioJobPool {
   fn submit(&self, kind: JobKind, label: &str, job: Job) {
      trace!(kind = kind.as_str(), label, "submitting background job");
      self.handle.spawn_blocking(job);
   }
}

/// Runs jobs synchronously on the submitting thread.
///
/// Useful in tests and single-threaded tools. Callers must not submit while
/// holding a lock the job itself acquires.
#[derive(Debug, Default, Clone, Copy)]
pub struct InlineJobPool;

impl JobPool for InlineJobPool {
   fn submit(&self, kind: JobKind, label: &str, job: Job) {
      trace!(kind = kind.as_str(), label, "running job inline");
      job();
   }
}

#[cfg(test)]
mod tests {
   use std::sync::Arc;
   use std::sync::atomic::{AtomicUsize, Ordering};
   use std::time::Duration;

   use super::*;

   #[test]
   fn test_job_kind_names() {
      assert_eq!(JobKind::WalCheckpoint.as_str(), "wal-checkpoint");
      assert_eq!(JobKind::EventRelay.as_str(), "event-relay");
   }

   #[test]
   fn test_inline_pool_runs_job_immediately() {
      let ran = Arc::new(AtomicUsize::new(0));
      let counter = Arc::clone(&ran);

      InlineJobPool.submit(
         JobKind::EventRelay,
         "test",
         Box::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
         }),
      );

      assert_eq!(ran.load(Ordering::SeqCst), 1);
   }

   #[tokio::test(flavor = "multi_thread")]
   async fn test_tokio_pool_runs_job_off_thread() {
      let (tx, rx) = tokio::sync::oneshot::channel();
      let pool = TokioJobPool::current();

      pool.submit(
         JobKind::WalCheckpoint,
         "test",
         Box::new(move || {
            let _ = tx.send(std::thread::current().id());
         }),
      );

      let job_thread = tokio::time::timeout(Duration::from_secs(5), rx)
         .await
         .expect("job did not run")
         .expect("job dropped the channel");
      assert_ne!(job_thread, std::thread::current().id());
   }
}

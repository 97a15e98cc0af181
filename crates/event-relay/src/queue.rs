//! Bounded per-subscriber event buffer and its drain worker.

use std::collections::VecDeque;
use std::sync::{Arc, Weak};

use job_pool::{JobKind, JobPool};
use parking_lot::Mutex;
use serde_json::Value as JsonValue;
use tracing::{trace, warn};

use crate::sink::EventSink;

/// Configuration for a subscriber's outbound event buffer.
///
/// # Examples
///
/// ```
/// use event_relay::QueueConfig;
///
/// // Use the default 64-entry buffer
/// let config = QueueConfig::default();
///
/// // Allow a deeper backlog for a slow subscriber
/// let config = QueueConfig::new().with_capacity(256);
/// ```
#[derive(Debug, Clone)]
pub struct QueueConfig {
   /// Maximum number of buffered events. On overflow the oldest buffered
   /// event is discarded to admit the newest.
   ///
   /// Default: 64
   pub capacity: usize,
}

impl Default for QueueConfig {
   fn default() -> Self {
      Self { capacity: 64 }
   }
}

impl QueueConfig {
   /// Create a config with the default capacity.
   pub fn new() -> Self {
      Self::default()
   }

   /// Override the buffer capacity.
   pub fn with_capacity(mut self, capacity: usize) -> Self {
      self.capacity = capacity;
      self
   }
}

/// An event stamped with its per-subscriber delivery sequence number.
///
/// Sequence numbers start at 1 and increase by one per accepted event for
/// the subscriber's lifetime, including events later discarded on overflow.
#[derive(Debug, Clone, PartialEq)]
pub struct SequencedEvent {
   pub seq: u64,
   pub payload: JsonValue,
}

struct QueueState {
   buffer: VecDeque<SequencedEvent>,
   next_seq: u64,
   /// True while a drain worker is active for this queue.
   sending: bool,
}

/// Bounded FIFO of outbound events with a lazily spawned drain worker.
///
/// At most one drain worker is active per queue at a time, which together
/// with the FIFO gives strictly increasing sequence order at the sink, no
/// duplicates, and no re-delivery after a failure.
pub struct EventQueue {
   state: Mutex<QueueState>,
   capacity: usize,
   sink: Arc<dyn EventSink>,
   jobs: Arc<dyn JobPool>,
   /// Subscriber identity for log fields.
   label: String,
   /// Self-handle handed to drain job closures.
   me: Weak<EventQueue>,
}

impl EventQueue {
   /// Create a queue draining into `sink`.
   pub fn new(
      sink: Arc<dyn EventSink>,
      jobs: Arc<dyn JobPool>,
      config: QueueConfig,
      label: impl Into<String>,
   ) -> Arc<Self> {
      Arc::new_cyclic(|me| Self {
         state: Mutex::new(QueueState {
            buffer: VecDeque::new(),
            next_seq: 1,
            sending: false,
         }),
         capacity: config.capacity.max(1),
         sink,
         jobs,
         label: label.into(),
         me: me.clone(),
      })
   }

   /// Stamp and buffer an event, spawning a drain worker if none is active.
   ///
   /// Never blocks on delivery; the producer only takes the queue lock for
   /// the append and the worker check.
   pub fn push(&self, payload: JsonValue) {
      let start_drain = {
         let mut state = self.state.lock();

         if state.buffer.len() >= self.capacity {
            // Drop the oldest buffered event; the one being pushed is
            // never the one discarded.
            if let Some(dropped) = state.buffer.pop_front() {
               warn!(
                  subscriber = %self.label,
                  seq = dropped.seq,
                  "event buffer full, dropping oldest event"
               );
            }
         }

         let seq = state.next_seq;
         state.next_seq += 1;

         let mut payload = payload;
         if let Some(object) = payload.as_object_mut() {
            object.insert("seq".to_string(), seq.into());
         }

         trace!(subscriber = %self.label, seq, "buffered event");
         state.buffer.push_back(SequencedEvent { seq, payload });

         if state.sending {
            false
         } else {
            state.sending = true;
            true
         }
      };

      // Submit outside the lock; an inline pool would otherwise deadlock
      // against the drain loop.
      if start_drain {
         let Some(queue) = self.me.upgrade() else {
            return;
         };
         self.jobs.submit(
            JobKind::EventRelay,
            "event-drain",
            Box::new(move || queue.drain()),
         );
      }
   }

   /// The drain worker: pop under the lock, deliver outside it, stop when
   /// the buffer is empty. Delivery failures are logged and never retried.
   fn drain(&self) {
      loop {
         let event = {
            let mut state = self.state.lock();
            match state.buffer.pop_front() {
               Some(event) => event,
               None => {
                  state.sending = false;
                  break;
               }
            }
         };

         if let Err(e) = self.sink.deliver(&event) {
            warn!(
               subscriber = %self.label,
               seq = event.seq,
               error = %e,
               "event delivery failed"
            );
         }
      }
   }

   /// Number of buffered, undelivered events.
   pub fn len(&self) -> usize {
      self.state.lock().buffer.len()
   }

   /// True when no events are buffered.
   pub fn is_empty(&self) -> bool {
      self.len() == 0
   }

   /// True while a drain worker is active.
   pub fn is_sending(&self) -> bool {
      self.state.lock().sending
   }
}

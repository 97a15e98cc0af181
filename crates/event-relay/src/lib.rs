//! # event-relay
//!
//! Bounded per-subscriber event buffering with best-effort, in-order
//! outbound delivery.
//!
//! Producers push JSON events at a [`HttpSubscriber`] (or directly at an
//! [`EventQueue`]); each event is stamped with a per-subscriber sequence
//! number and buffered in a fixed-capacity FIFO. When the buffer is full the
//! **oldest** entry is discarded to admit the newest. A single drain worker
//! per subscriber is spawned lazily on a [`job_pool::JobPool`] and delivers
//! buffered events in sequence order; a failed delivery is logged and
//! dropped, never retried, so delivery is at-most-once and strictly ordered.
//!
//! ## Core Types
//!
//! - **[`EventQueue`]**: the bounded buffer and drain worker
//! - **[`EventSink`]**: the outbound-transmission seam
//! - **[`HttpEventSink`]**: JSON-RPC-shaped POSTs over http/https
//! - **[`HttpSubscriber`]**: validated endpoint + credentials + queue

mod error;
mod queue;
mod sink;
mod subscriber;

pub use error::{Error, Result};
pub use queue::{EventQueue, QueueConfig, SequencedEvent};
pub use sink::{EventSink, HttpEventSink};
pub use subscriber::HttpSubscriber;

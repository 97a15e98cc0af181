//! One remote endpoint receiving events over HTTP.

use std::sync::Arc;

use job_pool::JobPool;
use serde_json::Value as JsonValue;
use tracing::info;
use url::Url;

use crate::error::Result;
use crate::queue::{EventQueue, QueueConfig};
use crate::sink::HttpEventSink;

/// A subscriber endpoint with its own bounded event buffer.
///
/// Construction fails fast on an unparseable URL or an unsupported scheme;
/// everything after that is best-effort. Pushed events are stamped,
/// buffered, and delivered in order by the queue's drain worker.
pub struct HttpSubscriber {
   endpoint: Url,
   queue: Arc<EventQueue>,
}

impl HttpSubscriber {
   /// Register a subscriber at `url`, with optional basic-auth
   /// credentials.
   pub fn new(
      url: &str,
      auth: Option<(String, String)>,
      jobs: Arc<dyn JobPool>,
      config: QueueConfig,
   ) -> Result<Self> {
      let mut sink = HttpEventSink::new(url)?;
      if let Some((username, password)) = auth {
         sink = sink.with_credentials(username, password);
      }
      let endpoint = sink.endpoint().clone();

      info!(endpoint = %endpoint, "subscriber registered");

      let queue = EventQueue::new(Arc::new(sink), jobs, config, endpoint.as_str());
      Ok(Self { endpoint, queue })
   }

   /// Queue an event for delivery to this subscriber.
   pub fn push(&self, payload: JsonValue) {
      self.queue.push(payload);
   }

   /// The subscriber's validated endpoint.
   pub fn endpoint(&self) -> &Url {
      &self.endpoint
   }

   /// The subscriber's event buffer.
   pub fn queue(&self) -> &Arc<EventQueue> {
      &self.queue
   }
}

//! Outbound transmission of events to a subscriber endpoint.

use std::time::Duration;

use reqwest::blocking::Client;
use serde_json::json;
use tracing::trace;
use url::Url;

use crate::error::{Error, Result};
use crate::queue::SequencedEvent;

/// Outbound transmission of one event.
///
/// `deliver` runs on a background pool thread and may block on network I/O.
pub trait EventSink: Send + Sync + 'static {
   fn deliver(&self, event: &SequencedEvent) -> Result<()>;
}

/// Delivers events as JSON-RPC-shaped notifications over http or https.
///
/// The request body is `{"method": "event", "params": [payload]}`; a
/// non-success response status counts as a delivery failure.
pub struct HttpEventSink {
   client: Client,
   endpoint: Url,
   auth: Option<(String, String)>,
}

impl HttpEventSink {
   /// Parse and validate the endpoint URL.
   ///
   /// Only http and https are supported; default ports follow the scheme.
   pub fn new(url: &str) -> Result<Self> {
      let endpoint = Url::parse(url)?;
      match endpoint.scheme() {
         "http" | "https" => {}
         other => return Err(Error::UnsupportedScheme(other.to_string())),
      }

      let client = Client::builder()
         .timeout(Duration::from_secs(30))
         .build()?;

      Ok(Self {
         client,
         endpoint,
         auth: None,
      })
   }

   /// Send basic-auth credentials with each delivery.
   pub fn with_credentials(
      mut self,
      username: impl Into<String>,
      password: impl Into<String>,
   ) -> Self {
      self.auth = Some((username.into(), password.into()));
      self
   }

   /// The validated endpoint.
   pub fn endpoint(&self) -> &Url {
      &self.endpoint
   }
}

impl EventSink for HttpEventSink {
   fn deliver(&self, event: &SequencedEvent) -> Result<()> {
      let body = json!({
         "method": "event",
         "params": [event.payload],
      });

      let mut request = self.client.post(self.endpoint.clone()).json(&body);
      if let Some((username, password)) = &self.auth {
         request = request.basic_auth(username, Some(password));
      }

      request.send()?.error_for_status()?;
      trace!(endpoint = %self.endpoint, seq = event.seq, "event delivered");
      Ok(())
   }
}

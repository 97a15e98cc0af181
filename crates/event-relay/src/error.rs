//! Error types for the event-relay crate.

use thiserror::Error;

/// Errors from subscriber construction and event delivery.
#[derive(Error, Debug)]
pub enum Error {
   /// The subscriber endpoint could not be parsed as a URL.
   #[error("invalid subscriber url: {0}")]
   InvalidUrl(#[from] url::ParseError),

   /// The subscriber endpoint uses a scheme other than http or https.
   #[error("unsupported url scheme '{0}': only http and https are supported")]
   UnsupportedScheme(String),

   /// Outbound delivery failed (connection, timeout, or non-success
   /// status).
   #[error("event delivery failed: {0}")]
   Delivery(#[from] reqwest::Error),

   /// Generic error for sinks that don't fit other categories.
   #[error("{0}")]
   Other(String),
}

/// A type alias for Results with our Error type
pub type Result<T> = std::result::Result<T, Error>;

//! HTTP sink and subscriber tests against a local mock server.

use std::sync::Arc;

use event_relay::{Error, EventSink, HttpEventSink, HttpSubscriber, QueueConfig, SequencedEvent};
use httpmock::prelude::*;
use job_pool::InlineJobPool;
use serde_json::json;

#[test]
fn test_sink_posts_json_rpc_event() {
   let server = MockServer::start();
   let mock = server.mock(|when, then| {
      when
         .method(POST)
         .path("/events")
         .json_body(json!({
            "method": "event",
            "params": [{ "type": "ledgerClosed" }],
         }));
      then.status(200);
   });

   let sink = HttpEventSink::new(&server.url("/events")).unwrap();
   let event = SequencedEvent {
      seq: 7,
      payload: json!({ "type": "ledgerClosed" }),
   };

   sink.deliver(&event).unwrap();
   mock.assert();
}

#[test]
fn test_sink_sends_basic_auth() {
   let server = MockServer::start();
   let mock = server.mock(|when, then| {
      when
         .method(POST)
         .path("/events")
         .header("authorization", "Basic dXNlcjpwYXNz");
      then.status(200);
   });

   let sink = HttpEventSink::new(&server.url("/events"))
      .unwrap()
      .with_credentials("user", "pass");
   let event = SequencedEvent {
      seq: 1,
      payload: json!({}),
   };

   sink.deliver(&event).unwrap();
   mock.assert();
}

#[test]
fn test_sink_treats_error_status_as_failure() {
   let server = MockServer::start();
   server.mock(|when, then| {
      when.method(POST).path("/events");
      then.status(500);
   });

   let sink = HttpEventSink::new(&server.url("/events")).unwrap();
   let event = SequencedEvent {
      seq: 1,
      payload: json!({}),
   };

   assert!(matches!(sink.deliver(&event), Err(Error::Delivery(_))));
}

#[test]
fn test_subscriber_rejects_unsupported_scheme() {
   let result = HttpSubscriber::new(
      "ws://127.0.0.1:9999/events",
      None,
      Arc::new(InlineJobPool),
      QueueConfig::default(),
   );

   match result {
      Err(Error::UnsupportedScheme(scheme)) => assert_eq!(scheme, "ws"),
      other => panic!("expected UnsupportedScheme, got {:?}", other.map(|_| ())),
   }
}

#[test]
fn test_subscriber_rejects_invalid_url() {
   let result = HttpSubscriber::new(
      "not a url",
      None,
      Arc::new(InlineJobPool),
      QueueConfig::default(),
   );

   assert!(matches!(result, Err(Error::InvalidUrl(_))));
}

#[test]
fn test_subscriber_delivers_pushed_events() {
   let server = MockServer::start();
   let mock = server.mock(|when, then| {
      when.method(POST).path("/relay");
      then.status(200);
   });

   let subscriber = HttpSubscriber::new(
      &server.url("/relay"),
      None,
      Arc::new(InlineJobPool),
      QueueConfig::default(),
   )
   .unwrap();

   for i in 0..3 {
      subscriber.push(json!({ "type": "tx", "n": i }));
   }

   mock.assert_hits(3);
   assert!(subscriber.queue().is_empty());
   assert!(!subscriber.queue().is_sending());
}

#[test]
fn test_rejected_events_do_not_stall_the_queue() {
   let server = MockServer::start();
   let mock = server.mock(|when, then| {
      when.method(POST).path("/relay");
      then.status(503);
   });

   let subscriber = HttpSubscriber::new(
      &server.url("/relay"),
      None,
      Arc::new(InlineJobPool),
      QueueConfig::default(),
   )
   .unwrap();

   subscriber.push(json!({ "n": 0 }));
   subscriber.push(json!({ "n": 1 }));

   // Both events were attempted exactly once despite the failures.
   mock.assert_hits(2);
   assert!(subscriber.queue().is_empty());
}

//! Tests for the stream consumer.

use std::sync::{Arc, Mutex};

use serde_json::Value;
use tokio::sync::mpsc;

use super::*;
use crate::ingest::{AttemptError, BuildError};
use crate::message::{ContainerInfo, Envelope};
use crate::time::FixedClock;
use crate::transport::HttpError;

/// Outcome a mock sender produces for one envelope.
#[derive(Debug, Clone, Copy)]
enum Outcome {
    Delivered,
    Exhausted,
    BuildFailure,
}

/// Sender recording every envelope it is asked to deliver.
#[derive(Debug, Default)]
struct MockSender {
    outcomes: Mutex<Vec<Outcome>>,
    sent: Mutex<Vec<Envelope>>,
}

impl MockSender {
    fn with_outcomes(outcomes: Vec<Outcome>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes),
            sent: Mutex::new(Vec::new()),
        }
    }

    fn sent(&self) -> Vec<Envelope> {
        self.sent.lock().unwrap().clone()
    }

    fn messages(&self) -> Vec<String> {
        self.sent()
            .iter()
            .map(|e| {
                let body: Value = serde_json::from_slice(&e.body).unwrap();
                body["msg"].as_str().unwrap_or_default().to_string()
            })
            .collect()
    }
}

impl EnvelopeSender for MockSender {
    async fn send(&self, envelope: &Envelope) -> Result<(), DeliveryError> {
        self.sent.lock().unwrap().push(envelope.clone());
        let outcome = {
            let mut outcomes = self.outcomes.lock().unwrap();
            if outcomes.is_empty() {
                Outcome::Delivered
            } else {
                outcomes.remove(0)
            }
        };

        match outcome {
            Outcome::Delivered => Ok(()),
            Outcome::Exhausted => Err(DeliveryError::Exhausted {
                attempts: 10,
                last_error: AttemptError::Http(HttpError::Timeout),
            }),
            Outcome::BuildFailure => Err(DeliveryError::Build(BuildError {
                name: "log-type",
                source: http::HeaderValue::from_str("\n").unwrap_err(),
            })),
        }
    }
}

fn container() -> Arc<ContainerInfo> {
    Arc::new(ContainerInfo {
        name: "c1".to_string(),
        id: "i1".to_string(),
        image: "img".to_string(),
        hostname: "h1".to_string(),
        ..ContainerInfo::default()
    })
}

fn transformer() -> Transformer<FixedClock> {
    Transformer::new().with_clock(FixedClock::from_unix_secs(1_459_756_800))
}

fn channel_with(lines: &[&str]) -> mpsc::UnboundedReceiver<LogMessage> {
    let (tx, rx) = mpsc::unbounded_channel();
    for line in lines {
        tx.send(LogMessage::new(*line, "stdout", container()))
            .unwrap();
    }
    rx
}

#[tokio::test]
async fn delivers_in_arrival_order() {
    let mut rx = channel_with(&["one", "two", "three"]);
    let sender = MockSender::default();

    let stats = consume(&mut rx, &transformer(), &sender).await.unwrap();

    assert_eq!(sender.messages(), vec!["one", "two", "three"]);
    assert_eq!(
        stats,
        StreamStats {
            delivered: 3,
            dropped: 0
        }
    );
}

#[tokio::test]
async fn empty_closed_channel_ends_gracefully() {
    let mut rx = channel_with(&[]);
    let sender = MockSender::default();

    let stats = consume(&mut rx, &transformer(), &sender).await.unwrap();

    assert_eq!(stats, StreamStats::default());
    assert!(sender.sent().is_empty());
}

#[tokio::test]
async fn content_error_drops_message_and_continues() {
    let mut rx = channel_with(&["before", r#"{"Type":"a\u0001b"}"#, "after"]);
    let sender = MockSender::default();

    let stats = consume(&mut rx, &transformer(), &sender).await.unwrap();

    assert_eq!(sender.messages(), vec!["before", "after"]);
    assert_eq!(stats.delivered, 2);
    assert_eq!(stats.dropped, 1);
}

#[tokio::test]
async fn build_failure_drops_message_and_continues() {
    let mut rx = channel_with(&["a", "b"]);
    let sender = MockSender::with_outcomes(vec![Outcome::BuildFailure]);

    let stats = consume(&mut rx, &transformer(), &sender).await.unwrap();

    assert_eq!(sender.sent().len(), 2);
    assert_eq!(
        stats,
        StreamStats {
            delivered: 1,
            dropped: 1
        }
    );
}

#[tokio::test]
async fn exhaustion_stops_the_stream() {
    let mut rx = channel_with(&["a", "b", "c"]);
    let sender = MockSender::with_outcomes(vec![Outcome::Delivered, Outcome::Exhausted]);

    let result = consume(&mut rx, &transformer(), &sender).await;

    assert!(matches!(result, Err(StreamError::Unrecoverable(_))));
    assert_eq!(sender.messages(), vec!["a", "b"]);
    // The third message is left in the channel.
    assert_eq!(rx.recv().await.unwrap().data, "c");
}

#[tokio::test]
async fn waits_for_messages_sent_later() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let sender = Arc::new(MockSender::default());

    let consumer = {
        let sender = sender.clone();
        tokio::spawn(async move {
            let transformer = transformer();
            consume(&mut rx, &transformer, &*sender).await
        })
    };

    for line in ["late-1", "late-2"] {
        tx.send(LogMessage::new(line, "stderr", container()))
            .unwrap();
        tokio::task::yield_now().await;
    }
    drop(tx);

    let stats = consumer.await.unwrap().unwrap();
    assert_eq!(stats.delivered, 2);
    assert_eq!(sender.messages(), vec!["late-1", "late-2"]);
}

#[tokio::test]
async fn structured_payload_keeps_its_log_type() {
    let mut rx = channel_with(&[r#"{"Type":"Custom","x":1}"#]);
    let sender = MockSender::default();

    consume(&mut rx, &transformer(), &sender).await.unwrap();

    let sent = sender.sent();
    assert_eq!(sent[0].log_type.to_string(), "Custom");
    let body: Value = serde_json::from_slice(&sent[0].body).unwrap();
    assert_eq!(body["x"], 1);
    assert_eq!(body["dockerinfo"]["name"], "c1");
}

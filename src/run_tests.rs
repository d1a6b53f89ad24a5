//! Tests for the run module.

use super::*;

const KEY: &str = "MDEyMzQ1Njc4OWFiY2RlZjAxMjM0NTY3ODlhYmNkZWY=";

fn container() -> Arc<ContainerInfo> {
    Arc::new(ContainerInfo {
        name: "web".to_string(),
        ..ContainerInfo::default()
    })
}

mod run_error {
    use super::*;
    use oms_shipper::ingest::{AttemptError, CredentialError};
    use oms_shipper::transport::HttpError;

    #[test]
    fn adapter_error_displays_source() {
        let error = RunError::from(AdapterError::from(CredentialError::MissingKey));
        assert!(error.to_string().starts_with("Failed to create adapter"));
    }

    #[test]
    fn stream_error_is_transparent() {
        let stream = StreamError::Unrecoverable(DeliveryError::Exhausted {
            attempts: 10,
            last_error: AttemptError::Http(HttpError::Timeout),
        });
        let expected = stream.to_string();

        let error = RunError::from(stream);

        assert_eq!(error.to_string(), expected);
    }

    #[test]
    fn input_error_displays_message() {
        let error = RunError::Input(std::io::Error::other("broken pipe"));
        assert!(error.to_string().contains("broken pipe"));
    }
}

mod forward_lines {
    use super::*;

    #[tokio::test]
    async fn forwards_each_line_in_order() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let input: &[u8] = b"first\nsecond\r\nthird";

        let count = forward_lines(input, tx, container(), "stdout", std::future::pending())
            .await
            .unwrap();

        assert_eq!(count, 3);
        let mut lines = Vec::new();
        while let Some(message) = rx.recv().await {
            assert_eq!(message.source, "stdout");
            assert_eq!(message.container.name, "web");
            lines.push(message.data);
        }
        assert_eq!(lines, ["first", "second", "third"]);
    }

    #[tokio::test]
    async fn skips_blank_lines() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let input: &[u8] = b"a\n\n   \nb\n";

        let count = forward_lines(input, tx, container(), "stderr", std::future::pending())
            .await
            .unwrap();

        assert_eq!(count, 2);
        assert_eq!(rx.recv().await.map(|m| m.data).as_deref(), Some("a"));
        assert_eq!(rx.recv().await.map(|m| m.data).as_deref(), Some("b"));
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn stops_on_shutdown() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let input: &[u8] = b"never read\n";

        let count = forward_lines(input, tx, container(), "stdout", std::future::ready(()))
            .await
            .unwrap();

        assert_eq!(count, 0);
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn stops_when_receiver_dropped() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        let input: &[u8] = b"one\ntwo\n";

        let count = forward_lines(input, tx, container(), "stdout", std::future::pending())
            .await
            .unwrap();

        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn invalid_utf8_is_an_error() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let input: &[u8] = b"ok\n\xff\xfe\n";

        let result = forward_lines(input, tx, container(), "stdout", std::future::pending()).await;

        assert!(result.is_err());
        assert_eq!(rx.recv().await.map(|m| m.data).as_deref(), Some("ok"));
    }
}

mod dry_run {
    use super::*;

    fn sender() -> DryRunSender {
        DryRunSender::new(&AdapterConfig::new("ws1", KEY)).unwrap()
    }

    #[test]
    fn rejects_invalid_key() {
        let result = DryRunSender::new(&AdapterConfig::new("ws1", "not base64!"));

        assert!(matches!(result, Err(AdapterError::Credential(_))));
    }

    #[tokio::test]
    async fn send_succeeds_without_network() {
        let envelope = Transformer::new()
            .transform(&LogMessage::new("hello", "stdout", container()))
            .unwrap();

        assert!(sender().send(&envelope).await.is_ok());
    }

    #[tokio::test]
    async fn consumes_stream_with_dry_run_sender() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let input: &[u8] = b"one\n{\"Type\":\"Custom\"}\n";
        let transformer = Transformer::new();
        let sender = sender();

        let stats = run_pipeline(
            forward_lines(input, tx, container(), "stdout", std::future::pending()),
            consume(&mut rx, &transformer, &sender),
        )
        .await
        .unwrap();

        assert_eq!(stats.delivered, 2);
        assert_eq!(stats.dropped, 0);
    }
}

mod run_pipeline {
    use super::*;
    use oms_shipper::ingest::AttemptError;
    use oms_shipper::transport::HttpError;

    #[tokio::test]
    async fn delivery_failure_stops_before_input_ends() {
        let reader = std::future::pending::<Result<u64, std::io::Error>>();
        let consumer = async {
            Err::<StreamStats, _>(StreamError::Unrecoverable(DeliveryError::Exhausted {
                attempts: 10,
                last_error: AttemptError::Http(HttpError::Timeout),
            }))
        };

        let result = run_pipeline(reader, consumer).await;

        assert!(matches!(result, Err(RunError::Stream(_))));
    }

    #[tokio::test]
    async fn input_error_reported_after_drain() {
        let reader = async { Err::<u64, _>(std::io::Error::other("read failed")) };
        let consumer = async {
            tokio::task::yield_now().await;
            Ok::<_, StreamError>(StreamStats {
                delivered: 4,
                dropped: 0,
            })
        };

        let result = run_pipeline(reader, consumer).await;

        assert!(matches!(result, Err(RunError::Input(_))));
    }
}

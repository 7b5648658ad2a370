//! # Integration Tests
//!
//! 集成测试与端到端测试。
//!
//! 负责：
//! - 线格式兼容性测试 (新版 schema 的未知字段)
//! - 模拟 e2e 测试 (文件存储 + 重启 + 本地回环 HTTP)

#[cfg(test)]
mod wire_tests {
    use codec::{decode_struct, BufferTransport, CompactWriter, TType, ThriftEnum};
    use contracts::{Edition, EventType, NativeAppSubmission};

    /// Submission as a newer schema would write it: extra fields at every level
    fn newer_schema_submission() -> bytes::Bytes {
        let mut w = CompactWriter::new(BufferTransport::new());
        w.write_struct_begin("NativeAppSubmission").unwrap();

        w.write_field_begin("app", 2, TType::Struct).unwrap();
        w.write_struct_begin("App").unwrap();
        w.write_field_begin("version", 1, TType::String).unwrap();
        w.write_string("9.0").unwrap();
        w.write_field_begin("darkMode", 20, TType::Bool).unwrap();
        w.write_bool(true).unwrap();
        w.write_field_begin("theme", 21, TType::I32).unwrap();
        w.write_i32(Edition::Au.value()).unwrap();
        w.write_field_stop().unwrap();
        w.write_struct_end().unwrap();

        w.write_field_begin("deviceId", 4, TType::String).unwrap();
        w.write_string("dev-9").unwrap();

        w.write_field_begin("events", 7, TType::List).unwrap();
        w.write_list_begin(TType::Struct, 1).unwrap();
        w.write_struct_begin("Event").unwrap();
        w.write_field_begin("eventId", 1, TType::String).unwrap();
        w.write_string("e-1").unwrap();
        w.write_field_begin("eventType", 3, TType::I32).unwrap();
        w.write_i32(EventType::View.value()).unwrap();
        w.write_field_begin("experiments", 40, TType::Map).unwrap();
        w.write_map_begin(TType::String, TType::I64, 2).unwrap();
        w.write_string("ab").unwrap();
        w.write_i64(1).unwrap();
        w.write_string("cd").unwrap();
        w.write_i64(-7).unwrap();
        w.write_map_end().unwrap();
        w.write_field_begin("weights", 41, TType::Set).unwrap();
        w.write_set_begin(TType::Double, 1).unwrap();
        w.write_double(0.25).unwrap();
        w.write_set_end().unwrap();
        w.write_field_begin("path", 4, TType::String).unwrap();
        w.write_string("/au").unwrap();
        w.write_field_stop().unwrap();
        w.write_struct_end().unwrap();
        w.write_list_end().unwrap();

        w.write_field_begin("tags", 99, TType::List).unwrap();
        w.write_list_begin(TType::List, 1).unwrap();
        w.write_list_begin(TType::String, 2).unwrap();
        w.write_string("x").unwrap();
        w.write_string("y").unwrap();
        w.write_list_end().unwrap();
        w.write_list_end().unwrap();

        w.write_field_stop().unwrap();
        w.write_struct_end().unwrap();
        w.into_transport().into_bytes()
    }

    #[test]
    fn test_unknown_fields_are_skipped_at_every_level() {
        let submission: NativeAppSubmission = decode_struct(newer_schema_submission()).unwrap();

        assert_eq!(submission.app.version.as_deref(), Some("9.0"));
        assert_eq!(submission.app.edition, None);
        assert_eq!(submission.device_id, "dev-9");
        assert_eq!(submission.events.len(), 1);
        let event = &submission.events[0];
        assert_eq!(event.event_id, "e-1");
        assert_eq!(event.event_type, EventType::View);
        assert_eq!(event.path.as_deref(), Some("/au"));
    }

    #[test]
    fn test_truncated_submission_is_rejected() {
        let bytes = newer_schema_submission();
        let truncated = bytes.slice(..bytes.len() / 2);
        assert!(decode_struct::<NativeAppSubmission>(truncated).is_err());
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    use bytes::Bytes;
    use codec::decode_struct;
    use contracts::{ContractError, Event, NativeAppSubmission, RecordStore, SubmissionTransport};
    use dispatcher::{
        create_dispatcher, Dispatcher, DispatcherConfig, FileRecordStore, FlushOutcome,
        HttpTransport, InMemoryRecordStore,
    };
    use tokio::runtime::Handle;

    /// Collector stand-in that can be switched between up and down
    #[derive(Default)]
    struct SwitchableCollector {
        down: AtomicBool,
        received: parking_lot::Mutex<Vec<NativeAppSubmission>>,
    }

    impl SwitchableCollector {
        fn down() -> Self {
            Self {
                down: AtomicBool::new(true),
                ..Default::default()
            }
        }
    }

    impl SubmissionTransport for SwitchableCollector {
        fn name(&self) -> &str {
            "switchable"
        }

        async fn post(&self, body: Bytes, _content_type: &str) -> Result<(), ContractError> {
            if self.down.load(Ordering::SeqCst) {
                return Err(ContractError::transport("collector down"));
            }
            self.received.lock().push(decode_struct(body)?);
            Ok(())
        }
    }

    fn identity() -> DispatcherConfig {
        DispatcherConfig {
            device_id: "device-e2e".into(),
            ..Default::default()
        }
    }

    /// Events stored while the collector is down survive a restart and
    /// are delivered in one batch by the next process.
    #[tokio::test]
    async fn test_file_store_survives_restart() {
        let dir = tempfile::tempdir().unwrap();

        {
            let store = Arc::new(FileRecordStore::new("file", dir.path()).unwrap());
            let collector = Arc::new(SwitchableCollector::down());
            let d = Dispatcher::new(identity(), store, collector, Handle::current());
            for id in ["a", "b", "c"] {
                let outcome = d.dispatch(Event::new(id)).await.unwrap().unwrap();
                assert!(matches!(outcome, FlushOutcome::SendFailed { .. }));
            }
            assert_eq!(d.metrics().send_failures, 3);
        }

        // next process
        let store = Arc::new(FileRecordStore::new("file", dir.path()).unwrap());
        assert_eq!(store.get_all().await.unwrap().len(), 3);
        let collector = Arc::new(SwitchableCollector::default());
        let d = Dispatcher::new(identity(), store, collector, Handle::current());

        assert_eq!(d.flush().await.unwrap(), FlushOutcome::Delivered { events: 3 });
        assert!(d.store().get_all().await.unwrap().is_empty());

        let received = d.transport().received.lock().clone();
        assert_eq!(received.len(), 1);
        let mut ids: Vec<_> = received[0].events.iter().map(|e| e.event_id.clone()).collect();
        ids.sort();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert!(received[0].events.iter().all(|e| e.age_ms_long.is_some()));
        assert_eq!(received[0].device_id, "device-e2e");

        assert_eq!(d.flush().await.unwrap(), FlushOutcome::Empty);
    }

    /// Loaded configuration drives store and transport selection
    #[tokio::test]
    async fn test_config_to_dry_run_dispatcher() {
        let dir = tempfile::tempdir().unwrap();
        let toml = format!(
            r#"
[app]
version = "2.1"
edition = "uk"

[identity]
device_id = "dev-cfg"
subscription = "digital_pack"

[store]
kind = "file"
path = "{}"
"#,
            dir.path().display().to_string().replace('\\', "/")
        );
        let config = config_loader::ConfigLoader::load_from_str(
            &toml,
            config_loader::ConfigFormat::Toml,
        )
        .unwrap();

        let d = create_dispatcher(&config, true).unwrap();
        assert_eq!(d.store().name(), "file");
        assert_eq!(d.transport().name(), "dry_run");

        let outcome = d.dispatch(Event::new("cfg-1")).await.unwrap().unwrap();
        assert_eq!(outcome, FlushOutcome::Delivered { events: 1 });
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    /// Loopback collector answering each request with the next status,
    /// closing the connection after every response
    async fn scripted_collector(
        statuses: Vec<&'static str>,
    ) -> (String, tokio::task::JoinHandle<Vec<Vec<u8>>>) {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/mob", listener.local_addr().unwrap());
        let server = tokio::spawn(async move {
            let mut requests = Vec::new();
            for status in statuses {
                let (mut socket, _) = listener.accept().await.unwrap();
                let mut request = Vec::new();
                let mut chunk = [0u8; 4096];
                loop {
                    let n = socket.read(&mut chunk).await.unwrap();
                    request.extend_from_slice(&chunk[..n]);
                    if n == 0 || request_complete(&request) {
                        break;
                    }
                }
                let response = format!(
                    "HTTP/1.1 {status}\r\ncontent-length: 0\r\nconnection: close\r\n\r\n"
                );
                socket.write_all(response.as_bytes()).await.unwrap();
                requests.push(request);
            }
            requests
        });
        (url, server)
    }

    fn request_complete(request: &[u8]) -> bool {
        let Some(end) = request.windows(4).position(|w| w == b"\r\n\r\n") else {
            return false;
        };
        let head = String::from_utf8_lossy(&request[..end]).to_ascii_lowercase();
        let length = head
            .lines()
            .find_map(|line| line.strip_prefix("content-length:"))
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(0);
        request.len() >= end + 4 + length
    }

    /// A 503 keeps the event stored; the next dispatch delivers both over HTTP
    #[tokio::test]
    async fn test_http_collector_outage_then_recovery() {
        let (url, server) = scripted_collector(vec![
            "503 Service Unavailable",
            "204 No Content",
        ])
        .await;
        let transport =
            HttpTransport::new("http", url, Some(std::time::Duration::from_secs(5))).unwrap();
        let d = Dispatcher::new(
            identity(),
            Arc::new(InMemoryRecordStore::default()),
            Arc::new(transport),
            Handle::current(),
        );

        let first = d.dispatch(Event::new("before")).await.unwrap().unwrap();
        assert_eq!(first, FlushOutcome::SendFailed { events: 1 });
        let second = d.dispatch(Event::new("after")).await.unwrap().unwrap();
        assert_eq!(second, FlushOutcome::Delivered { events: 2 });
        assert!(d.store().is_empty());

        let requests = server.await.unwrap();
        assert_eq!(requests.len(), 2);
        let delivered = &requests[1];
        let head_end = delivered.windows(4).position(|w| w == b"\r\n\r\n").unwrap();
        let head = String::from_utf8_lossy(&delivered[..head_end]).to_ascii_lowercase();
        assert!(head.starts_with("post /mob "));
        assert!(head.contains("content-type: application/vnd.apache.thrift.compact"));

        let body = Bytes::copy_from_slice(&delivered[head_end + 4..]);
        let submission: NativeAppSubmission = decode_struct(body).unwrap();
        let mut ids: Vec<_> = submission.events.iter().map(|e| e.event_id.as_str()).collect();
        ids.sort();
        assert_eq!(ids, vec!["after", "before"]);
        assert_eq!(submission.device_id, "device-e2e");
    }
}

use statsd_gateway::{
    MetricClientTrait, StatsdClient, StatsdClientOptions, TransportType, Writer,
};
use std::sync::{Arc, Mutex};

/// A custom writer that keeps every datagram in memory for inspection
#[derive(Clone, Default)]
pub struct TestWriter {
    packets: Arc<Mutex<Vec<String>>>,
}

impl TestWriter {
    pub fn packets(&self) -> Vec<String> {
        self.packets.lock().unwrap().clone()
    }
}

impl Writer for TestWriter {
    fn write(&self, buf: &[u8]) -> std::io::Result<usize> {
        self.packets
            .lock()
            .unwrap()
            .push(String::from_utf8(buf.to_vec()).unwrap());
        Ok(buf.len())
    }
}

/// A writer whose every send fails
struct FailingWriter;

impl Writer for FailingWriter {
    fn write(&self, _buf: &[u8]) -> std::io::Result<usize> {
        Err(std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            "collector unreachable",
        ))
    }
}

fn create_client(writer: Arc<dyn Writer>, stats_prefix: &str) -> StatsdClient {
    let client = StatsdClient::new(StatsdClientOptions {
        stats_prefix: stats_prefix.to_string(),
        transport_type: TransportType::Custom(writer),
        ..Default::default()
    });
    client.open();
    client
}

#[test]
fn test_custom_writer_receives_wire_format() {
    let writer = TestWriter::default();
    let client = create_client(Arc::new(writer.clone()), "app.");

    client.count("jobs.done", 2, 1.0);
    client.count("jobs.done", 5, 1.0);
    client.flush();
    client.timing("jobs.duration", 120, 1.0);
    client.flush();
    client.shutdown();

    assert_eq!(
        writer.packets(),
        vec![
            "app.jobs.done:5|c".to_string(),
            "app.jobs.duration:120|t".to_string(),
        ]
    );
}

#[test]
fn test_custom_writer_sees_nothing_for_empty_flush() {
    let writer = TestWriter::default();
    let client = create_client(Arc::new(writer.clone()), "");

    client.flush();
    client.flush();
    client.shutdown();

    assert!(writer.packets().is_empty());
}

#[test]
fn test_failing_writer_never_surfaces_errors() {
    let client = create_client(Arc::new(FailingWriter), "");
    client.set_autoflush(true);

    client.gauge("lost", 1);
    client.set("lost.set", 2);
    client.shutdown();
}

#[test]
fn test_reopen_after_close_resumes_sending() {
    let writer = TestWriter::default();
    let client = create_client(Arc::new(writer.clone()), "");

    client.close();
    client.open();
    client.gauge("kept", 2);
    client.flush();
    client.shutdown();

    assert_eq!(writer.packets(), vec!["kept:2|g".to_string()]);
}

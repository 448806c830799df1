use statsd_gateway::{
    count, gauge, set, timing, ClientState, MetricClientTrait, StatsdClient, StatsdClientOptions,
};
use std::collections::HashSet;
use std::net::UdpSocket;
use std::time::Duration;

// ============================================================================
// Helper functions
// ============================================================================

/// Binds a collector socket on an ephemeral loopback port.
fn bind_collector() -> UdpSocket {
    let socket = UdpSocket::bind("127.0.0.1:0").expect("couldn't bind to address");
    socket
        .set_read_timeout(Some(Duration::from_secs(2)))
        .expect("set_read_timeout failed");
    socket
}

/// Reads datagrams until the socket stays quiet for the read timeout.
fn drain_collector(socket: &UdpSocket) -> Vec<String> {
    let mut buf = [0; 10000];
    let mut received = Vec::new();
    while let Ok((number_of_bytes, _)) = socket.recv_from(&mut buf) {
        received.push(String::from_utf8(buf[..number_of_bytes].to_vec()).unwrap());
    }
    received
}

fn lines(packets: &[String]) -> HashSet<String> {
    packets
        .iter()
        .flat_map(|packet| packet.split('\n'))
        .map(str::to_string)
        .collect()
}

fn create_client(socket: &UdpSocket, autoflush: bool, stats_prefix: &str) -> StatsdClient {
    let port = socket.local_addr().unwrap().port();
    let client = StatsdClient::new(StatsdClientOptions {
        host: "127.0.0.1".to_string(),
        port,
        autoflush,
        stats_prefix: stats_prefix.to_string(),
        sampler_seed: Some(7),
        ..Default::default()
    });
    client.open();
    client
}

// ============================================================================
// Tests
// ============================================================================

#[test]
fn test_autoflush_sends_one_datagram_per_call() {
    let collector = bind_collector();
    let client = create_client(&collector, true, "");
    assert_eq!(client.state(), ClientState::Open);

    client.count("requests", 3, 1.0);
    client.gauge("connections", 12);
    client.timing("latency", 42, 1.0);
    client.set("users", 7);
    client.shutdown();

    let received = drain_collector(&collector);
    assert_eq!(received.len(), 4, "received: {received:?}");
    assert_eq!(
        lines(&received),
        HashSet::from([
            "requests:3|c".to_string(),
            "connections:12|g".to_string(),
            "latency:42|t".to_string(),
            "users:7|s".to_string(),
        ])
    );
}

#[test]
fn test_manual_flush_coalesces_into_one_packet() {
    let collector = bind_collector();
    let client = create_client(&collector, false, "");

    client.gauge("a", 1);
    client.gauge("a", 2);
    client.count("b", 3, 1.0);
    assert_eq!(client.pending(), 2);

    client.flush();
    assert_eq!(client.pending(), 0);
    client.shutdown();

    let received = drain_collector(&collector);
    assert_eq!(received.len(), 1, "received: {received:?}");
    assert_eq!(
        lines(&received),
        HashSet::from(["a:2|g".to_string(), "b:3|c".to_string()])
    );
}

#[test]
fn test_prefix_and_sample_rate_on_the_wire() {
    let collector = bind_collector();
    let client = create_client(&collector, true, "edge.");

    // a rate of 1 never carries a suffix; a rate of 0 is never sent
    client.count("hits", 1, 1.0);
    client.count("misses", 1, 0.0);
    client.shutdown();

    let received = drain_collector(&collector);
    assert_eq!(received, vec!["edge.hits:1|c".to_string()]);
}

#[test]
fn test_sampled_metrics_carry_the_rate() {
    let collector = bind_collector();
    let client = create_client(&collector, false, "");

    for _ in 0..200 {
        client.timing("render", 5, 0.5);
    }
    client.flush();
    client.shutdown();

    let received = drain_collector(&collector);
    assert_eq!(received, vec!["render:5|t|@0.500000".to_string()]);
}

#[test]
fn test_drop_flushes_pending_metrics() {
    let collector = bind_collector();
    {
        let client = create_client(&collector, false, "");
        client.set("visitors", 99);
    }

    let received = drain_collector(&collector);
    assert_eq!(received, vec!["visitors:99|s".to_string()]);
}

#[test]
fn test_periodic_flush_without_manual_calls() {
    let collector = bind_collector();
    let port = collector.local_addr().unwrap().port();
    let client = StatsdClient::new(StatsdClientOptions {
        port,
        flush_interval: Some(Duration::from_millis(20)),
        ..Default::default()
    });
    client.open();

    client.gauge("queue.depth", 4);

    let mut buf = [0; 1024];
    let (n, _) = collector.recv_from(&mut buf).expect("expected a periodic flush");
    assert_eq!(&buf[..n], b"queue.depth:4|g");
    assert_eq!(client.pending(), 0);
}

#[test]
fn test_closed_client_drops_silently() {
    let collector = bind_collector();
    let client = create_client(&collector, true, "");
    client.close();
    assert_eq!(client.state(), ClientState::Closed);

    client.count("after.close", 1, 1.0);
    client.shutdown();

    collector
        .set_read_timeout(Some(Duration::from_millis(200)))
        .unwrap();
    assert!(drain_collector(&collector).is_empty());
}

#[test]
fn test_unresolvable_host_stays_unopened() {
    let client = StatsdClient::new(StatsdClientOptions {
        host: "host.invalid".to_string(),
        ..Default::default()
    });
    assert!(client.try_open().is_err());
    assert_eq!(client.state(), ClientState::Unopened);

    // calls keep working, sends are dropped
    client.gauge("still.alive", 1);
    client.flush();
}

#[test]
fn test_macros_record_with_defaults() {
    let collector = bind_collector();
    let client = create_client(&collector, false, "");

    count!(client, "macro.count");
    gauge!(client, "macro.gauge", 3);
    timing!(client, "macro.timing", 15);
    set!(client, "macro.set");
    client.flush();
    client.shutdown();

    let received = drain_collector(&collector);
    assert_eq!(
        lines(&received),
        HashSet::from([
            "macro.count:1|c".to_string(),
            "macro.gauge:3|g".to_string(),
            "macro.timing:15|t".to_string(),
            "macro.set:1|s".to_string(),
        ])
    );
}

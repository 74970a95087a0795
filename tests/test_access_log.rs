use std::net::{Ipv4Addr, SocketAddr};

use chrono::{TimeZone, Utc};
use waypoint::access_log::{AccessLog, format_log_entry, network_order};
use waypoint::proxy::Exchange;

#[test]
fn test_format_log_entry() {
    let at = Utc.with_ymd_and_hms(2026, 10, 19, 14, 3, 27).unwrap();
    let line = format_log_entry(
        &at,
        network_order(Ipv4Addr::new(10, 0, 0, 7)),
        "http://example.com/index.html",
        5120,
    );

    assert_eq!(
        line,
        "Mon 19 Oct 2026 14:03:27 UTC: 10.0.0.7 http://example.com/index.html 5120"
    );
}

#[test]
fn test_format_log_entry_is_deterministic() {
    let at = Utc.with_ymd_and_hms(2024, 3, 5, 9, 0, 0).unwrap();
    let client = network_order(Ipv4Addr::new(192, 168, 1, 254));

    let first = format_log_entry(&at, client, "http://a/", 0);
    let second = format_log_entry(&at, client, "http://a/", 0);

    assert_eq!(first, second);
    assert!(first.starts_with("Tue 05 Mar 2024 09:00:00 UTC: 192.168.1.254 "));
}

#[test]
fn test_network_order_octets() {
    let raw = network_order(Ipv4Addr::new(1, 2, 3, 4));
    assert_eq!(raw.to_ne_bytes(), [1, 2, 3, 4]);
    assert_eq!(u32::from_be(raw), 0x0102_0304);
}

#[tokio::test]
async fn test_access_log_appends_lines() {
    let path = std::env::temp_dir().join(format!("waypoint-access-log-{}.log", std::process::id()));
    let _ = std::fs::remove_file(&path);

    let mut log = AccessLog::open(Some(&path)).await.unwrap();
    let peer: SocketAddr = "127.0.0.1:50000".parse().unwrap();
    let exchange = Exchange {
        uri: "http://example.com/".to_string(),
        response_bytes: 17,
    };

    log.record(peer, &exchange).await.unwrap();
    log.record(peer, &exchange).await.unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 2);
    for line in lines {
        assert!(line.ends_with(": 127.0.0.1 http://example.com/ 17"));
    }

    let _ = std::fs::remove_file(&path);
}

#[tokio::test]
async fn test_access_log_without_file() {
    let mut log = AccessLog::open(None).await.unwrap();
    let peer: SocketAddr = "[::1]:50000".parse().unwrap();
    let exchange = Exchange {
        uri: "http://example.com/".to_string(),
        response_bytes: 0,
    };

    assert!(log.record(peer, &exchange).await.is_ok());
}

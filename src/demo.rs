// Built-in demo snapshot
//
// A small deterministic VPC used when no snapshot file is given, so the
// diagram can be explored without live flow-log data. Exercises every
// interface kind, all three statuses, and the full range of traffic bands.

use chrono::{Duration, Utc};

use crate::model::{Group, Interface, InterfaceKind, Snapshot, TrafficRecord};

pub fn demo_snapshot() -> Snapshot {
    let now = Utc::now();

    let iface = |id: &str, name: &str, group: &str, ip: &str, kind: InterfaceKind| Interface {
        id: id.into(),
        name: name.into(),
        group: group.into(),
        ips: vec![ip.into()],
        public_ips: vec![],
        kind,
        status: Default::default(),
        created_at: Some(now - Duration::hours(6)),
        subnet: Some(format!("subnet-{}", &ip[..6])),
        az: Some(if ip.ends_with(|c: char| c.is_ascii_digit() && c < '5') {
            "us-east-1a".into()
        } else {
            "us-east-1b".into()
        }),
        tags: [("env".to_string(), group.to_string())].into(),
    };

    let record = |id: &str, src: &str, dst: &str, bytes: f64, failed: f64| TrafficRecord {
        id: id.into(),
        srcaddr: src.into(),
        dstaddr: dst.into(),
        srcport: None,
        dstport: Some(443),
        protocol: "6".into(),
        bytes,
        packets: (bytes / 1000.0) as u64,
        success: 10.0,
        failed,
        connection_strength: None,
    };

    let mut interfaces = vec![
        iface("eni-web-1", "web-1", "frontend", "10.0.1.10", InterfaceKind::Standard),
        iface("eni-web-2", "web-2", "frontend", "10.0.1.11", InterfaceKind::Standard),
        iface("eni-api-1", "api-1", "backend", "10.0.2.10", InterfaceKind::Standard),
        iface("eni-api-2", "api-2", "backend", "10.0.2.11", InterfaceKind::Standard),
        iface("eni-db-1", "db-1", "data", "10.0.3.10", InterfaceKind::Standard),
        iface("eni-db-2", "db-2", "data", "10.0.3.11", InterfaceKind::Standard),
        iface("vpce-s3", "s3-endpoint", "vpc", "10.0.0.20", InterfaceKind::Endpoint),
        iface("vpce-dynamo", "ddb-endpoint", "vpc", "10.0.0.21", InterfaceKind::Endpoint),
        iface("igw-main", "internet", "vpc", "10.0.0.1", InterfaceKind::Igw),
        iface("dns-resolver", "resolver", "vpc", "10.0.0.2", InterfaceKind::Dns),
        iface("pcx-shared", "peering", "vpc", "10.0.0.3", InterfaceKind::Peering),
    ];
    // One freshly created interface to show the "new" status.
    interfaces.push(Interface {
        created_at: Some(now - Duration::minutes(2)),
        ..iface("eni-web-3", "web-3", "frontend", "10.0.1.12", InterfaceKind::Standard)
    });

    Snapshot {
        groups: vec![
            Group::new("frontend", "Frontend"),
            Group::new("backend", "Backend"),
            Group::new("data", "Data"),
        ],
        interfaces,
        traffic: vec![
            // Dominant flow sets the top-traffic reference.
            record("eni-web-1", "10.0.1.10", "10.0.2.10", 900_000.0, 0.0),
            record("eni-web-2", "10.0.1.11", "10.0.2.11", 400_000.0, 0.0),
            record("eni-api-1", "10.0.2.10", "10.0.3.10", 150_000.0, 0.0),
            // Failing flow marks both ends bad and the curve alert.
            record("eni-api-2", "10.0.2.11", "10.0.3.11", 60_000.0, 4.0),
            record("eni-api-1", "10.0.2.10", "10.0.0.20", 20_000.0, 0.0),
            record("eni-db-1", "10.0.3.10", "10.0.0.21", 5_000.0, 0.0),
            // Whisker-thin flow below the narrow threshold.
            record("eni-web-1", "10.0.1.10", "10.0.0.2", 500.0, 0.0),
        ],
    }
}

//! Rapid and concurrent writes to the same operation's artifact

use ecb_channel::{ArtifactKind, OperationResult, ResultChannel};
use serde_json::json;
use std::collections::HashSet;

fn parse(channel: &ResultChannel, operation: &str) -> OperationResult {
    let text = std::fs::read_to_string(channel.artifact_path(operation, ArtifactKind::Result)).unwrap();
    serde_json::from_str(&text).expect("artifact must be complete JSON")
}

#[test]
fn back_to_back_scans_each_leave_a_parseable_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let channel = ResultChannel::new(dir.path(), dir.path().join("ecb.log"));

    let first = channel.write_result("scan", json!({"totalNodes": 3})).unwrap();
    assert_eq!(parse(&channel, "scan"), first);

    let second = channel.write_result("scan", json!({"totalNodes": 4})).unwrap();
    let on_disk = parse(&channel, "scan");
    assert_eq!(on_disk, second);
    assert_ne!(first.operation_id, second.operation_id);
}

#[test]
fn concurrent_writers_never_interleave() {
    let dir = tempfile::tempdir().unwrap();
    let channel = ResultChannel::new(dir.path(), dir.path().join("ecb.log"));
    let payload: Vec<u32> = (0..2_000).collect();

    let ids: HashSet<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|worker| {
                let channel = &channel;
                let payload = &payload;
                scope.spawn(move || {
                    (0..10)
                        .map(|round| {
                            let result = channel
                                .write_result("scan", json!({"worker": worker, "round": round, "payload": payload}))
                                .unwrap();
                            // any reader at any time sees a complete artifact
                            let _ = parse(channel, "scan");
                            result.operation_id
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        handles.into_iter().flat_map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(ids.len(), 80);
    let last = parse(&channel, "scan");
    assert!(ids.contains(&last.operation_id));

    let log = std::fs::read_to_string(dir.path().join("ecb.log")).unwrap();
    assert_eq!(log.lines().count(), 80);
    assert!(log.lines().all(|l| l.starts_with('[') && l.contains("scan")));
}

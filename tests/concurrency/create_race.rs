//! Document creation races
//!
//! Many clients create the same missing document at once. Exactly one
//! `add` wins; every loser retries against the winner's document, so no
//! client sees a failure and no write is lost.

use std::sync::{Arc, Barrier};
use std::thread;

use crate::common::*;

const THREADS: usize = 16;

#[test]
fn concurrent_mkdoc_pushes_all_land() {
    let mock = Arc::new(mock());
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|i| {
            let mock = Arc::clone(&mock);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                let cmd = SubdocCommand::new("shared", Opcode::ArrayPushLast, "items")
                    .with_value(i.to_string())
                    .with_doc_flags(DocFlags::MKDOC);
                // Losers of the create race go on to replace; retry CAS conflicts
                loop {
                    let resp = mock.execute(&cmd).unwrap();
                    match resp.status {
                        Status::Success => return,
                        Status::KeyExists => continue,
                        other => panic!("unexpected status {}", other),
                    }
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let doc: serde_json::Value = serde_json::from_str(&body(&mock, "shared")).unwrap();
    let mut items: Vec<u64> = doc["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_u64().unwrap())
        .collect();
    items.sort_unstable();
    assert_eq!(items, (0..THREADS as u64).collect::<Vec<_>>());
}

#[test]
fn concurrent_add_flag_has_single_winner() {
    let mock = Arc::new(mock());
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|i| {
            let mock = Arc::clone(&mock);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                let cmd = SubdocCommand::new("once", Opcode::DictAdd, "owner")
                    .with_value(i.to_string())
                    .with_doc_flags(DocFlags::ADD);
                mock.execute(&cmd).unwrap().status
            })
        })
        .collect();
    let statuses: Vec<Status> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    let winners = statuses.iter().filter(|s| **s == Status::Success).count();
    assert_eq!(winners, 1);
    assert!(statuses
        .iter()
        .all(|s| matches!(s, Status::Success | Status::KeyExists)));
}

#[test]
fn concurrent_mkdoc_distinct_paths_merge() {
    let mock = Arc::new(mock());
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|i| {
            let mock = Arc::clone(&mock);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                let cmd = SubdocCommand::new("merged", Opcode::DictUpsert, format!("k{}", i))
                    .with_value("true")
                    .with_doc_flags(DocFlags::MKDOC);
                while mock.execute(&cmd).unwrap().status == Status::KeyExists {}
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let doc: serde_json::Value = serde_json::from_str(&body(&mock, "merged")).unwrap();
    assert_eq!(doc.as_object().unwrap().len(), THREADS);
}

#[test]
fn concurrent_mkdoc_nested_paths_all_land() {
    let mock = Arc::new(mock());
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|i| {
            let mock = Arc::clone(&mock);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                let cmd = SubdocCommand::new("nested", Opcode::DictUpsert, format!("t{}.v", i))
                    .with_value(i.to_string())
                    .with_doc_flags(DocFlags::MKDOC);
                loop {
                    match mock.execute(&cmd).unwrap().status {
                        Status::Success => return,
                        Status::KeyExists => continue,
                        other => panic!("unexpected status {}", other),
                    }
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let doc: serde_json::Value = serde_json::from_str(&body(&mock, "nested")).unwrap();
    assert_eq!(doc.as_object().unwrap().len(), THREADS);
    for i in 0..THREADS {
        assert_eq!(doc[format!("t{}", i)]["v"], i as u64);
    }
}

//! CAS conflicts between concurrent mutators
//!
//! Mutations of an existing document are not retried: a writer that loses
//! the compare-and-swap is answered KEY_EEXISTS and its change is dropped.

use std::sync::{Arc, Barrier};
use std::thread;

use parking_lot::Mutex;

use crate::common::*;

const THREADS: usize = 8;
const INCREMENTS: usize = 50;

#[test]
fn counter_reflects_exactly_the_successful_increments() {
    let mock = Arc::new(mock_with("counter", r#"{"n":0}"#));
    let barrier = Arc::new(Barrier::new(THREADS));
    let successes = Arc::new(Mutex::new(0usize));

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let mock = Arc::clone(&mock);
            let barrier = Arc::clone(&barrier);
            let successes = Arc::clone(&successes);
            thread::spawn(move || {
                barrier.wait();
                let cmd = SubdocCommand::new("counter", Opcode::Counter, "n").with_value("1");
                for _ in 0..INCREMENTS {
                    match mock.execute(&cmd).unwrap().status {
                        Status::Success => *successes.lock() += 1,
                        Status::KeyExists => {}
                        other => panic!("unexpected status {}", other),
                    }
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let total = *successes.lock();
    assert!(total > 0);
    assert_eq!(body(&mock, "counter"), format!(r#"{{"n":{}}}"#, total));
}

#[test]
fn explicit_cas_allows_one_writer() {
    let mock = Arc::new(mock_with("doc", "{}"));
    let start_cas = cas(&mock, "doc");
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|i| {
            let mock = Arc::clone(&mock);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                let cmd = SubdocCommand::new("doc", Opcode::DictUpsert, "writer")
                    .with_value(i.to_string())
                    .with_cas(start_cas);
                mock.execute(&cmd).unwrap().status
            })
        })
        .collect();
    let statuses: Vec<Status> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(
        statuses.iter().filter(|s| **s == Status::Success).count(),
        1
    );
    assert_eq!(
        statuses.iter().filter(|s| **s == Status::KeyExists).count(),
        THREADS - 1
    );
}

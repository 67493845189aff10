//! Concurrency soak tests.
//!
//! The pool's contract is linearizability under a single mutex: any
//! number of threads may commit, read, and release concurrently, and a
//! tier-2 relocation in one thread must never corrupt a payload another
//! thread is about to read.

use blobpool::{MemoryPool, PoolConfig};
use std::thread;

#[test]
fn ten_threads_commit_read_release() {
    let pool = MemoryPool::with_config(
        PoolConfig::default()
            .with_capacity(64)
            .with_name("soak <10x1000>"),
    )
    .unwrap();

    thread::scope(|scope| {
        for tid in 0u8..10 {
            let pool = &pool;
            scope.spawn(move || {
                let payload = [tid; 4];
                for _ in 0..1000 {
                    let handle = pool.commit(&payload).unwrap();
                    assert_eq!(pool.read(handle).unwrap(), payload);
                    pool.release(handle).unwrap();
                }
            });
        }
    });

    assert_eq!(pool.available_space(), 64);
    assert_eq!(pool.used_entries(), 0);
    assert_eq!(pool.stats().commits(), 10_000);
    assert_eq!(pool.stats().releases(), 10_000);
    assert_eq!(pool.stats().reads(), 10_000);
}

#[test]
fn mixed_sizes_survive_relocation_under_contention() {
    let pool = MemoryPool::new(2048).unwrap();

    thread::scope(|scope| {
        for tid in 0u8..8 {
            let pool = &pool;
            scope.spawn(move || {
                let mut held: Vec<(blobpool::BlobHandle, Vec<u8>)> = Vec::new();
                for i in 0..500usize {
                    let len = 1 + (i * 13 + tid as usize) % 24;
                    let payload = vec![tid ^ (i as u8), len as u8]
                        .into_iter()
                        .cycle()
                        .take(len)
                        .collect::<Vec<u8>>();
                    let handle = pool.commit(&payload).unwrap();
                    held.push((handle, payload));

                    // Hold a few handles across other threads' commits so
                    // relocations happen while payloads are live.
                    if held.len() > 4 {
                        let (handle, expected) = held.remove(0);
                        assert_eq!(pool.read(handle).unwrap(), expected);
                        pool.release(handle).unwrap();
                    }
                }
                for (handle, expected) in held {
                    assert_eq!(pool.read_and_release(handle).unwrap(), expected);
                }
            });
        }
    });

    assert_eq!(pool.available_space(), 2048);
    assert_eq!(pool.used_entries(), 0);
    assert_eq!(pool.stats().commits(), 8 * 500);
    assert_eq!(pool.stats().releases(), 8 * 500);
    assert_eq!(pool.stats().failed_commits(), 0);
}

#[test]
fn available_space_is_safe_to_poll_unlocked() {
    let pool = MemoryPool::new(256).unwrap();

    thread::scope(|scope| {
        let workers = scope.spawn(|| {
            for i in 0..2000usize {
                let handle = pool.commit(&[i as u8; 16]).unwrap();
                pool.release(handle).unwrap();
            }
        });

        // Concurrent stale reads must stay within the arena bounds.
        for _ in 0..2000 {
            let available = pool.available_space();
            assert!(available <= 256);
        }
        workers.join().unwrap();
    });

    assert_eq!(pool.available_space(), 256);
}

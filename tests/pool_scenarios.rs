//! End-to-end allocation and fragmentation scenarios.
//!
//! Exercises the public API the way the surrounding pipeline does:
//! commit intermediate blobs, hand handles around, release when
//! consumed. Handles are injected sequentially so layouts are
//! deterministic.

use blobpool::{MemoryPool, PoolConfig, SequentialHandles};
use std::sync::Arc;

fn test_pool(capacity: usize) -> MemoryPool {
    MemoryPool::with_handle_source(
        PoolConfig::default().with_capacity(capacity),
        Arc::new(SequentialHandles::new()),
    )
    .unwrap()
}

// Basic lifecycle

#[test]
fn commit_then_read_leaves_the_rest_free() {
    let pool = test_pool(100);
    let h1 = pool.commit(b"AAAA").unwrap();
    assert_eq!(pool.available_space(), 96);
    assert_eq!(pool.read(h1).unwrap(), b"AAAA");
}

#[test]
fn released_space_serves_the_next_commit() {
    let pool = test_pool(10);
    let h1 = pool.commit(b"ABCDE").unwrap();
    let h2 = pool.commit(b"FGHIJ").unwrap();
    pool.release(h1).unwrap();

    let h3 = pool.commit(b"KLM").unwrap();
    assert_eq!(pool.read(h3).unwrap(), b"KLM");
    assert_eq!(pool.read(h2).unwrap(), b"FGHIJ");
}

// Fragmentation control

#[test]
fn non_adjacent_holes_are_resolved_by_relocation() {
    let pool = test_pool(10);
    let handles: Vec<_> = [&b"AB"[..], b"CD", b"EF", b"GH", b"IJ"]
        .iter()
        .map(|payload| pool.commit(payload).unwrap())
        .collect();

    pool.release(handles[0]).unwrap();
    pool.release(handles[2]).unwrap();
    pool.release(handles[4]).unwrap();
    assert_eq!(pool.available_space(), 6);

    // Three free runs of length 2, none adjacent: coalescing cannot
    // produce a 4-run, relocation must.
    let h6 = pool.commit(b"XXXX").unwrap();
    assert_eq!(pool.stats().l2_compaction(), 1);
    assert_eq!(pool.read(h6).unwrap(), b"XXXX");
    assert_eq!(pool.read(handles[1]).unwrap(), b"CD");
    assert_eq!(pool.read(handles[3]).unwrap(), b"GH");
}

#[test]
fn churn_conserves_bytes_and_payloads() {
    let pool = test_pool(256);
    let mut live: Vec<(blobpool::BlobHandle, Vec<u8>)> = Vec::new();

    for round in 0u8..100 {
        let len = 1 + (round as usize * 7) % 24;
        let payload = vec![round; len];
        let handle = pool.commit(&payload).unwrap();
        live.push((handle, payload));

        // Release every third blob to scatter holes.
        if round % 3 == 0 {
            let (handle, _) = live.remove(live.len() / 2);
            pool.release(handle).unwrap();
        }
        // Keep the working set under capacity.
        while live.iter().map(|(_, p)| p.len()).sum::<usize>() > 160 {
            let (handle, _) = live.remove(0);
            pool.release(handle).unwrap();
        }

        // Coverage: free plus used always equals capacity.
        let used: usize = live.iter().map(|(_, p)| p.len()).sum();
        assert_eq!(pool.available_space() + used, 256);
    }

    // Every surviving payload reads back verbatim.
    for (handle, payload) in &live {
        assert_eq!(&pool.read(*handle).unwrap(), payload);
    }

    for (handle, _) in live {
        pool.release(handle).unwrap();
    }
    assert_eq!(pool.available_space(), 256);
    assert_eq!(pool.used_entries(), 0);
}

#[test]
fn drain_with_read_and_release() {
    let pool = test_pool(64);
    let handles: Vec<_> = (0u8..8)
        .map(|i| pool.commit(&[i; 8]).unwrap())
        .collect();
    assert_eq!(pool.available_space(), 0);

    for (i, handle) in handles.into_iter().enumerate() {
        assert_eq!(pool.read_and_release(handle).unwrap(), vec![i as u8; 8]);
    }
    assert_eq!(pool.available_space(), 64);
    assert_eq!(pool.stats().reads(), 8);
    assert_eq!(pool.stats().releases(), 8);
}

// Counter monotonicity

#[test]
fn counters_never_decrease() {
    let pool = test_pool(32);
    let mut previous = pool.stats().snapshot();

    let mut held = Vec::new();
    for i in 0u8..20 {
        match pool.commit(&[i; 12]) {
            Ok(handle) => held.push(handle),
            Err(err) => assert!(err.is_out_of_space()),
        }
        if i % 2 == 1 {
            if let Some(handle) = held.pop() {
                pool.read(handle).unwrap();
                pool.release(handle).unwrap();
            }
        }

        let current = pool.stats().snapshot();
        assert!(current.commits >= previous.commits);
        assert!(current.failed_commits >= previous.failed_commits);
        assert!(current.reads >= previous.reads);
        assert!(current.read_locks >= previous.read_locks);
        assert!(current.l1_compaction >= previous.l1_compaction);
        assert!(current.l2_compaction >= previous.l2_compaction);
        assert!(current.releases >= previous.releases);
        previous = current;
    }
}

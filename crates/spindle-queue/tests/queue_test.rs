use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use spindle_queue::LockFreeQueue;

const PRODUCERS: usize = 4;
const CONSUMERS: usize = 4;
const PER_PRODUCER: usize = 25_000;

#[test]
fn mpmc_stress_no_loss_no_duplication() {
    let produced = PRODUCERS * PER_PRODUCER;
    let queue = Arc::new(LockFreeQueue::new());
    let consumed = Arc::new(AtomicUsize::new(0));

    let mut producers = Vec::new();
    for producer in 0..PRODUCERS {
        let queue = Arc::clone(&queue);
        producers.push(thread::spawn(move || {
            // Values are unique across producers: high part identifies the
            // producer, low part its sequence number.
            for i in 0..PER_PRODUCER {
                queue.enqueue(producer * PER_PRODUCER + i);
            }
        }));
    }

    let mut consumers = Vec::new();
    for _ in 0..CONSUMERS {
        let queue = Arc::clone(&queue);
        let consumed = Arc::clone(&consumed);
        consumers.push(thread::spawn(move || {
            let mut taken = Vec::new();
            while consumed.load(Ordering::SeqCst) < produced {
                if let Some(value) = queue.dequeue() {
                    consumed.fetch_add(1, Ordering::SeqCst);
                    taken.push(value);
                } else {
                    thread::yield_now();
                }
            }
            taken
        }));
    }

    for handle in producers {
        handle.join().unwrap();
    }

    let mut union = HashSet::new();
    for handle in consumers {
        let taken = handle.join().unwrap();

        // Within one consumer, values from the same producer must appear in
        // enqueue order: each consumer observes a subsequence of a valid
        // linearization.
        let mut last_seen = vec![None::<usize>; PRODUCERS];
        for &value in &taken {
            let producer = value / PER_PRODUCER;
            let sequence = value % PER_PRODUCER;
            if let Some(prev) = last_seen[producer] {
                assert!(
                    sequence > prev,
                    "producer {producer} reordered: {sequence} after {prev}"
                );
            }
            last_seen[producer] = Some(sequence);
        }

        for value in taken {
            assert!(union.insert(value), "value {value} dequeued twice");
        }
    }

    assert_eq!(union.len(), produced, "values lost");
    assert!(queue.dequeue().is_none());
}

#[test]
fn producers_draining_into_one_consumer() {
    let queue = Arc::new(LockFreeQueue::new());
    let mut handles = Vec::new();
    for producer in 0..PRODUCERS {
        let queue = Arc::clone(&queue);
        handles.push(thread::spawn(move || {
            for i in 0..PER_PRODUCER {
                queue.enqueue(producer * PER_PRODUCER + i);
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    let mut seen = HashSet::new();
    while let Some(value) = queue.dequeue() {
        assert!(seen.insert(value));
    }
    assert_eq!(seen.len(), PRODUCERS * PER_PRODUCER);
}

#[test]
fn dropping_a_contended_queue_releases_the_remainder() {
    static DROPS: AtomicUsize = AtomicUsize::new(0);

    struct Tracked(#[allow(dead_code)] usize);
    impl Drop for Tracked {
        fn drop(&mut self) {
            DROPS.fetch_add(1, Ordering::Relaxed);
        }
    }

    let queue = Arc::new(LockFreeQueue::new());
    let mut handles = Vec::new();
    for producer in 0..PRODUCERS {
        let queue = Arc::clone(&queue);
        handles.push(thread::spawn(move || {
            for i in 0..1_000 {
                queue.enqueue(Tracked(producer * 1_000 + i));
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    for _ in 0..500 {
        assert!(queue.dequeue().is_some());
    }
    drop(queue);
    assert_eq!(DROPS.load(Ordering::Relaxed), PRODUCERS * 1_000);
}

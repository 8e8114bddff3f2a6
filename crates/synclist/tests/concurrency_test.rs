//! Integration tests for multi-threaded access through the sequence facade.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{mpsc, Arc, Barrier};
use std::thread;
use std::time::Duration;

use synclist::{ArbiterConfig, SyncSeq};

fn strategies() -> [ArbiterConfig; 2] {
    [ArbiterConfig::spinning(), ArbiterConfig::parking()]
}

fn wait_for(mut condition: impl FnMut() -> bool) {
    while !condition() {
        thread::yield_now();
    }
}

fn assert_idle<T>(seq: &SyncSeq<T>) {
    let arbiter = seq.arbiter();
    assert_eq!(arbiter.active_readers(), 0);
    assert!(!arbiter.is_writer_active());
    assert_eq!(arbiter.waiting_writers(), 0);
}

#[test]
fn test_readers_overlap() {
    const READERS: usize = 8;

    for config in strategies() {
        let seq = SyncSeq::with_config((0..10_000u32).collect::<Vec<_>>(), config);
        // Every reader must be inside its bracket at the same time to get
        // past the barrier; if reads serialized, this would never finish.
        let barrier = Barrier::new(READERS);

        thread::scope(|scope| {
            for t in 0..READERS {
                let seq = &seq;
                let barrier = &barrier;
                scope.spawn(move || {
                    let index = t * 1_000;
                    let value = seq
                        .read_with(index, |v| {
                            barrier.wait();
                            *v
                        })
                        .unwrap();
                    assert_eq!(value as usize, index);
                });
            }
        });

        assert_idle(&seq);
        assert_eq!(seq.arbiter().stats().contended_reads, 0);
    }
}

#[test]
fn test_concurrent_gets() {
    const THREADS: usize = 8;

    for config in strategies() {
        let seq = Arc::new(SyncSeq::with_config(
            (0..10_000u32).collect::<Vec<_>>(),
            config,
        ));

        let handles: Vec<_> = (0..THREADS)
            .map(|t| {
                let seq = Arc::clone(&seq);
                thread::spawn(move || {
                    let mut sum = 0u64;
                    for i in (t..10_000).step_by(THREADS) {
                        sum += u64::from(seq.get(i).unwrap());
                    }
                    sum
                })
            })
            .collect();

        let total: u64 = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(total, (0..10_000u64).sum());
        assert_idle(&seq);
    }
}

#[test]
fn test_no_new_reader_while_writer_waits() {
    for config in strategies() {
        let seq = Arc::new(SyncSeq::with_config(vec![1, 2, 3], config));
        let (release_tx, release_rx) = mpsc::channel::<()>();
        let (entered_tx, entered_rx) = mpsc::channel::<()>();

        // Reader admitted first, held open until told to leave
        let early_reader = {
            let seq = Arc::clone(&seq);
            thread::spawn(move || {
                seq.read_with(0, |_| {
                    entered_tx.send(()).unwrap();
                    release_rx.recv().unwrap();
                })
                .unwrap();
            })
        };
        entered_rx.recv().unwrap();

        let writer = {
            let seq = Arc::clone(&seq);
            thread::spawn(move || seq.push(4))
        };
        wait_for(|| seq.arbiter().waiting_writers() == 1);

        // Requested after the writer registered: must observe its push
        let late_reader = {
            let seq = Arc::clone(&seq);
            thread::spawn(move || seq.len())
        };

        thread::sleep(Duration::from_millis(20));
        assert_eq!(seq.arbiter().active_readers(), 1);
        assert!(!late_reader.is_finished());

        release_tx.send(()).unwrap();
        early_reader.join().unwrap();
        writer.join().unwrap();
        assert_eq!(late_reader.join().unwrap(), 4);

        assert_idle(&seq);
    }
}

#[test]
fn test_writer_not_starved_by_reader_stream() {
    const READERS: usize = 4;
    const PUSHES: usize = 50;

    for config in strategies() {
        let seq = Arc::new(SyncSeq::with_config(vec![0u32; 64], config));
        let done = Arc::new(AtomicBool::new(false));

        let readers: Vec<_> = (0..READERS)
            .map(|_| {
                let seq = Arc::clone(&seq);
                let done = Arc::clone(&done);
                thread::spawn(move || {
                    let mut reads = 0usize;
                    while !done.load(Ordering::Relaxed) {
                        assert!(seq.len() >= 64);
                        reads += 1;
                    }
                    reads
                })
            })
            .collect();

        for i in 0..PUSHES {
            seq.push(u32::try_from(i).unwrap());
        }
        done.store(true, Ordering::Relaxed);

        for r in readers {
            r.join().unwrap();
        }
        assert_eq!(seq.len(), 64 + PUSHES);
        assert_idle(&seq);
    }
}

#[test]
fn test_readers_and_writers_never_overlap() {
    const THREADS: usize = 6;
    const ROUNDS: usize = 500;

    for config in strategies() {
        let seq = SyncSeq::with_config((0..32u32).collect::<Vec<_>>(), config);
        let readers_inside = AtomicUsize::new(0);
        let writers_inside = AtomicUsize::new(0);

        thread::scope(|scope| {
            for t in 0..THREADS {
                let seq = &seq;
                let readers_inside = &readers_inside;
                let writers_inside = &writers_inside;
                scope.spawn(move || {
                    for i in 0..ROUNDS {
                        if (i + t) % 4 == 0 {
                            let mut first = true;
                            seq.retain(|_| {
                                if first {
                                    first = false;
                                    assert_eq!(writers_inside.fetch_add(1, Ordering::SeqCst), 0);
                                    assert_eq!(readers_inside.load(Ordering::SeqCst), 0);
                                    writers_inside.fetch_sub(1, Ordering::SeqCst);
                                }
                                true
                            });
                        } else {
                            seq.read_with(i % 32, |_| {
                                readers_inside.fetch_add(1, Ordering::SeqCst);
                                assert_eq!(writers_inside.load(Ordering::SeqCst), 0);
                                readers_inside.fetch_sub(1, Ordering::SeqCst);
                            })
                            .unwrap();
                        }
                    }
                });
            }
        });

        assert_idle(&seq);
        assert_eq!(seq.len(), 32);
    }
}

#[test]
fn test_mixed_workload_balances() {
    const THREADS: usize = 6;
    const ROUNDS: usize = 300;

    let seq = SyncSeq::from(Vec::<usize>::new());

    thread::scope(|scope| {
        for t in 0..THREADS {
            let seq = &seq;
            scope.spawn(move || {
                for i in 0..ROUNDS {
                    match (i + t) % 6 {
                        0 => seq.push(i),
                        1 => {
                            // May race with removals; errors are fine
                            let _ = seq.remove(0);
                        }
                        2 => {
                            let _ = seq.get(i);
                        }
                        3 => {
                            let _ = seq.insert(i % 3, t);
                        }
                        4 => {
                            let mut cursor = seq.cursor();
                            while cursor.has_next() {
                                if cursor.next().is_err() {
                                    break;
                                }
                            }
                        }
                        _ => {
                            let _ = seq.contains(&t);
                        }
                    }
                }
            });
        }
    });

    assert_idle(&seq);
}

#[test]
fn test_cursor_shrink_recovery_across_threads() {
    let seq = SyncSeq::from(vec!['A', 'B', 'C']);
    let mut cursor = seq.cursor();
    for expected in ['A', 'B', 'C'] {
        assert_eq!(cursor.next(), Ok(expected));
    }
    assert_eq!(cursor.position(), 3);

    thread::scope(|scope| {
        scope.spawn(|| {
            assert!(seq.remove_item(&'B'));
            assert!(seq.remove_item(&'C'));
        });
    });

    assert_eq!(cursor.previous(), Ok('A'));
    assert_eq!(cursor.position(), 0);
    assert_idle(&seq);
}

#[test]
fn test_paused_cursor_sees_insert() {
    let seq = SyncSeq::from(vec![10, 20, 30]);
    let mut cursor = seq.cursor();
    assert_eq!(cursor.next(), Ok(10));

    thread::scope(|scope| {
        scope.spawn(|| seq.insert(1, 15).unwrap());
    });

    assert_eq!(cursor.next(), Ok(15));
    assert_eq!(cursor.next(), Ok(20));
    assert_eq!(cursor.next(), Ok(30));
    assert!(cursor.next().is_err());
}

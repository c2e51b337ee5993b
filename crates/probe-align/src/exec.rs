// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Serial and parallel execution of stateless per-item work.
//!
//! Workers dynamically claim items via an atomic counter (work-stealing) and
//! results are gathered back by item index, so the output order never
//! depends on scheduling.

use std::sync::atomic::{AtomicUsize, Ordering};

/// Serial execution baseline.
pub fn execute_serial<T, R, F>(items: &[T], f: F) -> Vec<R>
where
    F: Fn(&T) -> R,
{
    items.iter().map(f).collect()
}

/// Maps `f` over `items` using up to `workers` scoped threads.
///
/// # Determinism
///
/// Execution order is non-deterministic (workers race for items); the
/// returned vector is always in input order.
///
/// # Thread Safety
///
/// - `items` are only read (`T: Sync`).
/// - Each worker owns its result buffer (no shared mutable state besides the
///   claim counter).
///
/// A worker panic is re-raised on the calling thread.
pub fn parallel_map<T, R, F>(items: &[T], workers: usize, f: F) -> Vec<R>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> R + Sync,
{
    // No point spawning more threads than there are items.
    let workers = workers.min(items.len());
    if workers <= 1 {
        return execute_serial(items, f);
    }

    let next = AtomicUsize::new(0);
    let buffers: Vec<Vec<(usize, R)>> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..workers)
            .map(|_| {
                let next = &next;
                let f = &f;
                s.spawn(move || {
                    let mut out = Vec::new();
                    loop {
                        let i = next.fetch_add(1, Ordering::Relaxed);
                        let Some(item) = items.get(i) else {
                            break;
                        };
                        out.push((i, f(item)));
                    }
                    out
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|h| match h.join() {
                Ok(out) => out,
                Err(e) => std::panic::resume_unwind(e),
            })
            .collect()
    });

    let mut slots: Vec<Option<R>> = std::iter::repeat_with(|| None).take(items.len()).collect();
    for (i, r) in buffers.into_iter().flatten() {
        slots[i] = Some(r);
    }
    slots.into_iter().flatten().collect()
}

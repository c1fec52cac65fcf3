//! Elastic, mutex-protected free-list of codec contexts.
//!
//! A pool's backing store is a single `Vec<Option<T>>`. A `Some` slot holds a
//! free, ready-to-use context; a `None` slot is a *hole* marking a context
//! currently on loan to a caller. Folding "free" and "checked out" into one
//! array this way means [`Pool::grab`] and [`Pool::ungrab`] never need a
//! separate outstanding-borrow set, at the cost of [`Pool::reap`] having to
//! refuse whenever any hole is open — see the module-level note in
//! `SPEC_FULL.md` for why this encoding was kept rather than split into a
//! free-list plus a count.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use zblock_format::constants::POOL_REAP_INTERVAL_SECS;

struct PoolInner<T> {
    slots: Vec<Option<T>>,
    last_access: Instant,
}

/// A thread-safe elastic free-list of codec contexts of type `T`.
pub struct Pool<T> {
    name: &'static str,
    context_byte_size: usize,
    alloc_fn: Box<dyn Fn() -> Option<T> + Send + Sync>,
    reset_fn: Box<dyn Fn(&mut T) + Send + Sync>,
    inner: Mutex<PoolInner<T>>,
}

/// Point-in-time occupancy of a pool, for the `pool_buffer_count` /
/// `pool_buffer_bytes` statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStats {
    /// Number of contexts currently held free by the pool (excludes holes).
    pub context_count: usize,
    /// Approximate total byte size of those contexts.
    pub approx_bytes: usize,
}

impl<T> Pool<T> {
    /// Prepare an empty, named pool.
    ///
    /// `alloc_fn` constructs a new context (called outside the pool's lock);
    /// `reset_fn` performs the cheap per-checkout parameter reset (called
    /// while the lock is held, per the concurrency model: the lock is never
    /// held across a context operation except this one).
    /// `context_byte_size` is an approximate per-context footprint, used
    /// only for the `pool_buffer_bytes` statistic.
    pub fn new(
        name: &'static str,
        context_byte_size: usize,
        alloc_fn: impl Fn() -> Option<T> + Send + Sync + 'static,
        reset_fn: impl Fn(&mut T) + Send + Sync + 'static,
    ) -> Self {
        Self {
            name,
            context_byte_size,
            alloc_fn: Box::new(alloc_fn),
            reset_fn: Box::new(reset_fn),
            inner: Mutex::new(PoolInner {
                slots: Vec::new(),
                last_access: Instant::now(),
            }),
        }
    }

    /// The pool's diagnostic name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Lend a context to the caller.
    ///
    /// Returns `None` only if `alloc_fn` itself returned `None` (e.g. the
    /// allocator shim declined a non-blocking allocation); callers must
    /// treat that as "compression disabled for this block", not an error.
    pub fn grab(&self) -> Option<T> {
        {
            let mut guard = self.inner.lock().unwrap();
            if let Some(slot) = guard.slots.iter_mut().find(|slot| slot.is_some()) {
                let mut context = slot.take().expect("slot checked Some above");
                (self.reset_fn)(&mut context);
                guard.last_access = Instant::now();
                return Some(context);
            }
        }

        // No free slot; allocate a new context outside the lock so the
        // allocator's (possibly slow) work never blocks other grab/ungrab
        // callers.
        let context = (self.alloc_fn)()?;

        let mut guard = self.inner.lock().unwrap();
        // Grow the slot array by one hole representing this borrow. Growth
        // failure is tolerated: the freshly allocated context is still
        // returned, and the next `ungrab` simply frees it for lack of a
        // hole to return into.
        if guard.slots.try_reserve(1).is_ok() {
            guard.slots.push(None);
        }
        guard.last_access = Instant::now();
        Some(context)
    }

    /// Return a context to the pool.
    ///
    /// If no hole is open (every slot is concurrently occupied by another
    /// live context), the context is dropped instead of retained — freeing
    /// happens outside the lock.
    pub fn ungrab(&self, context: T) {
        let leftover = {
            let mut guard = self.inner.lock().unwrap();
            let placed = if let Some(slot) = guard.slots.iter_mut().find(|slot| slot.is_none()) {
                *slot = Some(context);
                None
            } else {
                Some(context)
            };
            guard.last_access = Instant::now();
            placed
        };
        drop(leftover);
    }

    /// Free every pooled context if the pool has been idle longer than the
    /// reap interval *and* no borrow is currently outstanding.
    ///
    /// A single open hole — meaning some caller has not yet called
    /// `ungrab` — is enough to refuse the whole reap, because the backing
    /// array would otherwise be invalidated out from under that borrow's
    /// eventual `ungrab`.
    pub fn reap(&self) {
        let drained = {
            let mut guard = self.inner.lock().unwrap();
            if guard.last_access.elapsed() < Duration::from_secs(POOL_REAP_INTERVAL_SECS) {
                return;
            }
            if guard.slots.iter().any(Option::is_none) {
                return;
            }
            let drained: Vec<T> = guard.slots.drain(..).flatten().collect();
            guard.last_access = Instant::now();
            drained
        };
        tracing::debug!(pool = self.name, freed = drained.len(), "pool reap");
        drop(drained);
    }

    /// Free every pooled context unconditionally. Must be preceded by
    /// draining every outstanding borrow; an open hole at this point is a
    /// programming error, not a recoverable condition.
    pub fn destroy(&self) {
        let drained = {
            let mut guard = self.inner.lock().unwrap();
            debug_assert!(
                guard.slots.iter().all(Option::is_some),
                "pool {} destroyed with a borrow still outstanding",
                self.name
            );
            guard.slots.drain(..).flatten().collect::<Vec<T>>()
        };
        drop(drained);
    }

    /// Current occupancy, for the pool-buffer statistics.
    pub fn stats(&self) -> PoolStats {
        let guard = self.inner.lock().unwrap();
        let context_count = guard.slots.iter().filter(|slot| slot.is_some()).count();
        PoolStats {
            context_count,
            approx_bytes: context_count * self.context_byte_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counting_pool() -> (Pool<u32>, Arc<AtomicUsize>, Arc<AtomicUsize>) {
        let allocations = Arc::new(AtomicUsize::new(0));
        let resets = Arc::new(AtomicUsize::new(0));
        let alloc_counter = allocations.clone();
        let reset_counter = resets.clone();
        let pool = Pool::new(
            "test",
            64,
            move || {
                alloc_counter.fetch_add(1, Ordering::SeqCst);
                Some(0u32)
            },
            move |ctx: &mut u32| {
                reset_counter.fetch_add(1, Ordering::SeqCst);
                *ctx = 0;
            },
        );
        (pool, allocations, resets)
    }

    #[test]
    fn grab_allocates_when_empty() {
        let (pool, allocations, _) = counting_pool();
        let ctx = pool.grab().unwrap();
        assert_eq!(allocations.load(Ordering::SeqCst), 1);
        pool.ungrab(ctx);
    }

    #[test]
    fn grab_after_ungrab_reuses_and_resets() {
        let (pool, allocations, resets) = counting_pool();
        let ctx = pool.grab().unwrap();
        pool.ungrab(ctx);
        let ctx2 = pool.grab().unwrap();
        assert_eq!(allocations.load(Ordering::SeqCst), 1, "second grab must reuse, not allocate");
        assert_eq!(resets.load(Ordering::SeqCst), 1, "reuse must go through reset_fn");
        pool.ungrab(ctx2);
    }

    #[test]
    fn grab_ungrab_roundtrip_preserves_stats() {
        let (pool, _, _) = counting_pool();
        let ctx = pool.grab().unwrap();
        assert_eq!(pool.stats().context_count, 0, "borrowed context is not counted as pooled");
        pool.ungrab(ctx);
        assert_eq!(pool.stats().context_count, 1);
    }

    #[test]
    fn reap_refuses_while_any_borrow_outstanding() {
        let (pool, _, _) = counting_pool();
        let ctx = pool.grab().unwrap();
        // Force the idle timer to look expired without waiting 15s.
        {
            let mut guard = pool.inner.lock().unwrap();
            guard.last_access = Instant::now() - Duration::from_secs(POOL_REAP_INTERVAL_SECS + 1);
        }
        pool.reap();
        // The hole for `ctx` is still open, so reap must have refused; the
        // pool is therefore still able to accept the matching ungrab below.
        pool.ungrab(ctx);
        assert_eq!(pool.stats().context_count, 1);
    }

    #[test]
    fn reap_frees_when_fully_idle() {
        let (pool, allocations, _) = counting_pool();
        let ctx = pool.grab().unwrap();
        pool.ungrab(ctx);
        {
            let mut guard = pool.inner.lock().unwrap();
            guard.last_access = Instant::now() - Duration::from_secs(POOL_REAP_INTERVAL_SECS + 1);
        }
        pool.reap();
        assert_eq!(pool.stats().context_count, 0);
        // A subsequent grab must allocate again since the pool was emptied.
        let _ = pool.grab().unwrap();
        assert_eq!(allocations.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn destroy_frees_everything() {
        let (pool, _, _) = counting_pool();
        let ctx = pool.grab().unwrap();
        pool.ungrab(ctx);
        pool.destroy();
        assert_eq!(pool.stats().context_count, 0);
    }

    #[test]
    fn concurrent_grab_ungrab_does_not_corrupt_slot_count() {
        let pool = Arc::new(Pool::new(
            "concurrent",
            8,
            || Some(0u32),
            |ctx: &mut u32| *ctx = 0,
        ));
        std::thread::scope(|scope| {
            for _ in 0..8 {
                let pool = Arc::clone(&pool);
                scope.spawn(move || {
                    for _ in 0..200 {
                        let ctx = pool.grab().unwrap();
                        pool.ungrab(ctx);
                    }
                });
            }
        });
        // Fully quiesced: every borrow was returned, so no holes remain and
        // the slot array should hold only free contexts.
        let stats = pool.stats();
        assert!(stats.context_count >= 1);
    }
}

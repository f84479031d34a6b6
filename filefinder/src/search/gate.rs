use std::num::NonZeroUsize;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

/// Counting semaphore bounding how many directories are listed at once.
///
/// Each [`SearchEngine`](super::SearchEngine) owns its own gate, so separate
/// searches never compete for permits.
#[derive(Debug)]
pub struct ConcurrencyGate {
    capacity: usize,
    state: Mutex<GateState>,
    released: Condvar,
}

#[derive(Debug, Default)]
struct GateState {
    in_use: usize,
    peak: usize,
}

/// Held while a directory is being expanded; returns its permit on drop
#[derive(Debug)]
pub struct GatePermit<'a> {
    gate: &'a ConcurrencyGate,
}

impl ConcurrencyGate {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            capacity: capacity.get(),
            state: Mutex::new(GateState::default()),
            released: Condvar::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of permits currently held
    pub fn in_use(&self) -> usize {
        self.lock().in_use
    }

    /// Highest number of permits held at the same time since the last reset
    pub fn peak(&self) -> usize {
        self.lock().peak
    }

    pub fn reset_peak(&self) {
        let mut state = self.lock();
        state.peak = state.in_use;
    }

    /// Blocks until a permit is free
    pub fn acquire(&self) -> GatePermit<'_> {
        let mut state = self.lock();
        while state.in_use >= self.capacity {
            state = self
                .released
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
        state.in_use += 1;
        state.peak = state.peak.max(state.in_use);
        GatePermit { gate: self }
    }

    fn release(&self) {
        let mut state = self.lock();
        state.in_use -= 1;
        drop(state);
        self.released.notify_one();
    }

    // The counters stay consistent even if a holder panicked
    fn lock(&self) -> MutexGuard<'_, GateState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for GatePermit<'_> {
    fn drop(&mut self) {
        self.gate.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_permits_are_returned() {
        let gate = ConcurrencyGate::new(NonZeroUsize::new(2).unwrap());
        assert_eq!(gate.capacity(), 2);

        let first = gate.acquire();
        let second = gate.acquire();
        assert_eq!(gate.in_use(), 2);

        drop(first);
        assert_eq!(gate.in_use(), 1);
        drop(second);
        assert_eq!(gate.in_use(), 0);
    }

    #[test]
    fn test_never_exceeds_capacity() {
        let gate = ConcurrencyGate::new(NonZeroUsize::new(3).unwrap());
        let active = AtomicUsize::new(0);
        let peak = AtomicUsize::new(0);

        thread::scope(|scope| {
            for _ in 0..16 {
                scope.spawn(|| {
                    let _permit = gate.acquire();
                    let now = active.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    thread::sleep(Duration::from_millis(5));
                    active.fetch_sub(1, Ordering::SeqCst);
                });
            }
        });

        assert!(peak.load(Ordering::SeqCst) <= 3);
        assert!(gate.peak() <= 3);
        assert_eq!(gate.in_use(), 0);
    }

    #[test]
    fn test_peak_tracks_high_water_mark() {
        let gate = ConcurrencyGate::new(NonZeroUsize::new(4).unwrap());
        {
            let _a = gate.acquire();
            let _b = gate.acquire();
        }
        let _c = gate.acquire();
        assert_eq!(gate.peak(), 2);

        gate.reset_peak();
        assert_eq!(gate.peak(), 1);
    }
}

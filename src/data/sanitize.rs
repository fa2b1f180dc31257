use std::sync::mpsc::{channel, Receiver, TryRecvError};
use std::thread;
use std::time::Duration;

// ---------------------------------------------------------------------------
// Like-bound sanitiser
// ---------------------------------------------------------------------------

/// Clamp a pair of entered like bounds into `0 <= min <= max <= dataset_max`.
///
/// Steps run in a fixed order:
/// 1. a negative minimum becomes 0;
/// 2. a minimum above the maximum pushes the maximum to `min + 1`;
/// 3. a maximum above `dataset_max` is clamped to it;
/// 4. a minimum still above the maximum is pulled down to it.
pub fn sanitize_like_bounds(raw_min: i64, raw_max: i64, dataset_max: i64) -> (i64, i64) {
    let mut min = raw_min;
    let mut max = raw_max;

    if min < 0 {
        min = 0;
    }
    if min > max {
        max = min.saturating_add(1);
    }
    if max > dataset_max {
        max = dataset_max;
    }
    if min > max {
        min = max;
    }
    (min, max)
}

// ---------------------------------------------------------------------------
// Background job with the artificial delay
// ---------------------------------------------------------------------------

/// Result of one sanitiser run, tagged with the request generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sanitized {
    pub generation: u64,
    pub min: i64,
    pub max: i64,
}

/// A sanitiser run on a worker thread. The delay drives the loading
/// indicators in the UI.
pub struct SanitizeJob {
    generation: u64,
    rx: Receiver<Sanitized>,
}

impl SanitizeJob {
    pub fn spawn(
        generation: u64,
        raw_min: i64,
        raw_max: i64,
        dataset_max: i64,
        delay: Duration,
    ) -> Self {
        let (tx, rx) = channel();
        thread::spawn(move || {
            thread::sleep(delay);
            let (min, max) = sanitize_like_bounds(raw_min, raw_max, dataset_max);
            // The receiver is gone when a newer job replaced this one.
            let _ = tx.send(Sanitized { generation, min, max });
        });
        Self { generation, rx }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Non-blocking poll. `Ok(None)` while the job is still sleeping.
    pub fn poll(&self) -> Result<Option<Sanitized>, TryRecvError> {
        match self.rx.try_recv() {
            Ok(done) => Ok(Some(done)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

//! Paced, cancellable reveal of a line's text.
//!
//! A reveal counts "visible units" from 0 up to the text's total, one unit per
//! interval, and ends itself one interval after the last unit is shown. The
//! engine keeps at most one [`RevealProcess`] alive and cancels the previous
//! one before starting the next.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, error};

/// Who drives the ticks of a reveal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RevealMode {
    /// The host calls `tick` from its own loop (frame-driven UIs, tests).
    #[default]
    Manual,
    /// A background thread ticks once per interval.
    Threaded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealSnapshot {
    pub visible: usize,
    pub total: usize,
    pub finished: bool,
    pub cancelled: bool,
}

/// Counter state of one reveal, independent of how it is driven.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealProgress {
    visible: usize,
    total: usize,
    finished: bool,
}

impl RevealProgress {
    pub fn new(total: usize) -> Self {
        Self {
            visible: 0,
            total,
            finished: false,
        }
    }

    /// Advances one unit. Returns `false` once the counter has passed the total.
    pub fn step(&mut self) -> bool {
        if self.finished {
            return false;
        }
        if self.visible < self.total {
            self.visible += 1;
            true
        } else {
            self.finished = true;
            false
        }
    }

    pub fn finish(&mut self) {
        self.visible = self.total;
        self.finished = true;
    }

    pub fn visible(&self) -> usize {
        self.visible
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

#[derive(Debug)]
struct SharedReveal {
    total: usize,
    visible: AtomicUsize,
    finished: AtomicBool,
    cancelled: AtomicBool,
}

impl SharedReveal {
    // CAS so a concurrent `finish_now` is never overwritten by a late tick.
    fn step(&self) -> bool {
        let total = self.total;
        let advanced = self
            .visible
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |visible| {
                (visible < total).then_some(visible + 1)
            })
            .is_ok();
        if !advanced {
            self.finished.store(true, Ordering::Release);
        }
        advanced
    }
}

#[derive(Debug)]
enum Driver {
    Manual {
        progress: RevealProgress,
        cancelled: bool,
    },
    Threaded {
        shared: Arc<SharedReveal>,
        worker: Option<JoinHandle<()>>,
    },
}

/// Handle to one running (or finished) reveal.
#[derive(Debug)]
pub struct RevealProcess {
    interval: Duration,
    driver: Driver,
}

impl RevealProcess {
    pub fn start(mode: RevealMode, total: usize, interval: Duration) -> Self {
        debug!(total, ?interval, ?mode, "starting text reveal");
        let driver = match mode {
            RevealMode::Manual => Driver::Manual {
                progress: RevealProgress::new(total),
                cancelled: false,
            },
            RevealMode::Threaded => spawn_worker(total, interval),
        };
        Self { interval, driver }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// One tick for manually driven reveals. Threaded reveals ignore it.
    /// Returns whether the reveal is still running afterwards.
    pub fn tick(&mut self) -> bool {
        match &mut self.driver {
            Driver::Manual {
                progress,
                cancelled,
            } => !*cancelled && progress.step(),
            Driver::Threaded { .. } => self.is_running(),
        }
    }

    pub fn cancel(&mut self) {
        match &mut self.driver {
            Driver::Manual { cancelled, .. } => *cancelled = true,
            Driver::Threaded { shared, .. } => shared.cancelled.store(true, Ordering::Release),
        }
    }

    /// Shows everything at once and marks the reveal finished.
    pub fn finish_now(&mut self) {
        match &mut self.driver {
            Driver::Manual { progress, .. } => progress.finish(),
            Driver::Threaded { shared, .. } => {
                shared.cancelled.store(true, Ordering::Release);
                shared.visible.store(shared.total, Ordering::Release);
                shared.finished.store(true, Ordering::Release);
            }
        }
    }

    pub fn snapshot(&self) -> RevealSnapshot {
        match &self.driver {
            Driver::Manual {
                progress,
                cancelled,
            } => RevealSnapshot {
                visible: progress.visible(),
                total: progress.total(),
                finished: progress.is_finished(),
                cancelled: *cancelled,
            },
            Driver::Threaded { shared, .. } => RevealSnapshot {
                visible: shared.visible.load(Ordering::Acquire),
                total: shared.total,
                finished: shared.finished.load(Ordering::Acquire),
                cancelled: shared.cancelled.load(Ordering::Acquire),
            },
        }
    }

    pub fn is_running(&self) -> bool {
        let snapshot = self.snapshot();
        !snapshot.finished && !snapshot.cancelled
    }

    /// Blocks until a threaded reveal's worker exits (finished or cancelled).
    pub fn wait(&mut self) {
        if let Driver::Threaded { worker, .. } = &mut self.driver {
            if let Some(handle) = worker.take() {
                if handle.join().is_err() {
                    error!("text reveal worker panicked");
                }
            }
        }
    }
}

impl Drop for RevealProcess {
    fn drop(&mut self) {
        self.cancel();
    }
}

fn spawn_worker(total: usize, interval: Duration) -> Driver {
    let shared = Arc::new(SharedReveal {
        total,
        visible: AtomicUsize::new(0),
        finished: AtomicBool::new(false),
        cancelled: AtomicBool::new(false),
    });
    let worker_shared = Arc::clone(&shared);
    let spawned = thread::Builder::new()
        .name("dl-reveal".to_string())
        .spawn(move || loop {
            thread::sleep(interval);
            if worker_shared.cancelled.load(Ordering::Acquire) {
                break;
            }
            if !worker_shared.step() {
                break;
            }
        });

    let worker = match spawned {
        Ok(handle) => Some(handle),
        Err(spawn_error) => {
            error!(%spawn_error, "could not spawn text reveal worker, showing text at once");
            shared.visible.store(total, Ordering::Release);
            shared.finished.store(true, Ordering::Release);
            None
        }
    };
    Driver::Threaded { shared, worker }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_counts_past_total_before_finishing() {
        let mut progress = RevealProgress::new(2);
        assert_eq!(progress.visible(), 0);
        assert!(progress.step());
        assert!(progress.step());
        assert_eq!(progress.visible(), 2);
        assert!(!progress.is_finished());
        assert!(!progress.step());
        assert!(progress.is_finished());
        assert!(!progress.step());
        assert_eq!(progress.visible(), 2);
    }

    #[test]
    fn empty_text_finishes_on_first_tick() {
        let mut reveal = RevealProcess::start(RevealMode::Manual, 0, Duration::from_millis(1));
        assert!(reveal.is_running());
        assert!(!reveal.tick());
        assert!(reveal.snapshot().finished);
    }

    #[test]
    fn cancelled_manual_reveal_stops_counting() {
        let mut reveal = RevealProcess::start(RevealMode::Manual, 5, Duration::from_millis(1));
        reveal.tick();
        reveal.cancel();
        assert!(!reveal.tick());
        let snapshot = reveal.snapshot();
        assert_eq!(snapshot.visible, 1);
        assert!(snapshot.cancelled);
        assert!(!reveal.is_running());
    }

    #[test]
    fn finish_now_shows_everything() {
        let mut reveal = RevealProcess::start(RevealMode::Manual, 4, Duration::from_millis(1));
        reveal.finish_now();
        let snapshot = reveal.snapshot();
        assert_eq!(snapshot.visible, 4);
        assert!(snapshot.finished);
    }

    #[test]
    fn threaded_reveal_completes_on_its_own() {
        let mut reveal = RevealProcess::start(RevealMode::Threaded, 3, Duration::from_millis(1));
        reveal.wait();
        let snapshot = reveal.snapshot();
        assert_eq!(snapshot.visible, 3);
        assert!(snapshot.finished);
        assert!(!snapshot.cancelled);
    }

    #[test]
    fn threaded_reveal_honors_cancel_between_ticks() {
        let mut reveal =
            RevealProcess::start(RevealMode::Threaded, 10_000, Duration::from_millis(5));
        reveal.cancel();
        reveal.wait();
        let snapshot = reveal.snapshot();
        assert!(snapshot.cancelled);
        assert!(!snapshot.finished);
        assert!(snapshot.visible < 10_000);
    }

    #[test]
    fn threaded_finish_now_stops_worker() {
        let mut reveal =
            RevealProcess::start(RevealMode::Threaded, 10_000, Duration::from_millis(5));
        reveal.finish_now();
        reveal.wait();
        let snapshot = reveal.snapshot();
        assert_eq!(snapshot.visible, 10_000);
        assert!(snapshot.finished);
    }
}

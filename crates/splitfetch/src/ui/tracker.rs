use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use once_cell::sync::Lazy;
use splitfetch_core::{DownloadPhase, Progress};

pub trait Tracker {
    type Ctx: Clone;
    type Inc: Clone;
    fn new(ctx: Self::Ctx) -> Self;
    fn step(&self, step: Self::Inc) -> &Self;
    fn finish(&self, msg: Option<String>);
}

const PB_STYLE: &str = "{spinner:.blue} {msg:.cyan} [{elapsed_precise}] {wide_bar:.cyan/blue} {bytes}/{total_bytes} ({bytes_per_sec}, {eta})";

const TICK: &str = "⠁⠂⠄⡀⢀⠠⠐⠈ ";

const PB_CHARS: &str = "█▓▒░  ";

const FALLBACK_NOTICE: &str = "Parallel download not supported, falling back to normal download";

static PB_TEMPLATE: Lazy<Option<ProgressStyle>> = Lazy::new(|| {
    let pb_style = match ProgressStyle::with_template(PB_STYLE) {
        Ok(pb_style) => pb_style.tick_chars(TICK).progress_chars(PB_CHARS),
        Err(_) => return None,
    };

    Some(pb_style)
});

/// Renders download progress; safe to drive from concurrent fetch tasks.
pub struct ProgressTracker {
    pub pb: ProgressBar,
    noticed_fallback: AtomicBool,
    /// Highest byte count drawn so far; held while the bar is moved.
    shown: Mutex<u64>,
}

#[derive(Debug, Clone)]
pub struct ProgressTrackerConfig {
    pub hidden: bool,
    pub msg: Option<String>,
}

impl Tracker for ProgressTracker {
    type Ctx = ProgressTrackerConfig;
    type Inc = Progress;

    fn new(ctx: Self::Ctx) -> Self {
        let pb = ProgressBar::no_length();
        if ctx.hidden {
            pb.set_draw_target(ProgressDrawTarget::hidden());
        }

        let pb = if let Some(style) = PB_TEMPLATE.as_ref() {
            pb.with_style(style.clone())
        } else {
            pb
        };

        let pb = pb.with_message(ctx.msg.unwrap_or_default());

        ProgressTracker {
            pb,
            noticed_fallback: AtomicBool::new(false),
            shown: Mutex::new(0),
        }
    }

    fn step(&self, progress: Progress) -> &Self {
        if progress.phase == DownloadPhase::SequentialFallback
            && !self.noticed_fallback.swap(true, Ordering::Relaxed)
        {
            self.pb.suspend(|| println!("{FALLBACK_NOTICE}"));
        }

        if self.pb.length() != Some(progress.total_bytes) {
            self.pb.set_length(progress.total_bytes);
        }
        // Concurrent writers may report slightly out of order.
        let mut shown = self.shown.lock().unwrap_or_else(PoisonError::into_inner);
        if progress.bytes_read > *shown {
            *shown = progress.bytes_read;
            self.pb.set_position(progress.bytes_read);
        }
        drop(shown);
        self.pb.set_message(progress.phase.to_string());
        self
    }

    fn finish(&self, msg: Option<String>) {
        if let Some(msg) = msg {
            self.pb.finish_with_message(msg);
        }
        self.pb.finish();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hidden() -> ProgressTracker {
        ProgressTracker::new(ProgressTrackerConfig {
            hidden: true,
            msg: None,
        })
    }

    #[test]
    fn follows_progress() {
        let t = hidden();
        t.step(Progress {
            phase: DownloadPhase::Fetching,
            bytes_read: 40,
            total_bytes: 100,
        });
        assert_eq!(t.pb.length(), Some(100));
        assert_eq!(t.pb.position(), 40);
    }

    #[test]
    fn position_never_moves_back() {
        let t = hidden();
        for bytes_read in [10, 30, 20] {
            t.step(Progress {
                phase: DownloadPhase::Fetching,
                bytes_read,
                total_bytes: 100,
            });
        }
        assert_eq!(t.pb.position(), 30);
    }

    #[test]
    fn concurrent_steps_settle_on_the_highest_count() {
        let t = std::sync::Arc::new(hidden());
        let handles: Vec<_> = (0..8u64)
            .map(|worker| {
                let t = std::sync::Arc::clone(&t);
                std::thread::spawn(move || {
                    for i in 0..500u64 {
                        t.step(Progress {
                            phase: DownloadPhase::Fetching,
                            bytes_read: i * 8 + worker,
                            total_bytes: 4_000,
                        });
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(t.pb.position(), 499 * 8 + 7);
    }

    #[test]
    fn fallback_notice_ignores_resource_size() {
        let t = hidden();
        t.step(Progress {
            phase: DownloadPhase::Fetching,
            bytes_read: 0,
            total_bytes: 0,
        });
        assert!(!t.noticed_fallback.load(Ordering::Relaxed));

        t.step(Progress {
            phase: DownloadPhase::SequentialFallback,
            bytes_read: 0,
            total_bytes: 0,
        });
        assert!(t.noticed_fallback.load(Ordering::Relaxed));
    }
}

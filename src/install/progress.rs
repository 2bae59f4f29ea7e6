//! Download progress reporting
//!
//! The downloader only knows about [`ProgressObserver`]; rendering lives in
//! [`TerminalProgress`] so transfer mechanics stay independent of presentation.

use std::sync::Mutex;

use indicatif::{ProgressBar, ProgressStyle};

/// Receives cumulative transfer progress.
///
/// `total` is `None` until (and unless) the server reports a content length.
pub trait ProgressObserver: Send + Sync {
    fn on_progress(&self, received: u64, total: Option<u64>);

    /// Called once after the last chunk was written.
    fn on_finish(&self, _received: u64) {}
}

impl<F> ProgressObserver for F
where
    F: Fn(u64, Option<u64>) + Send + Sync,
{
    fn on_progress(&self, received: u64, total: Option<u64>) {
        self(received, total)
    }
}

/// Observer that discards every update
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn on_progress(&self, _received: u64, _total: Option<u64>) {}
}

/// indicatif renderer: byte bar when the length is known, spinner otherwise.
pub struct TerminalProgress {
    bar: ProgressBar,
    // Whether the bar style has been chosen yet
    styled: Mutex<bool>,
}

impl TerminalProgress {
    pub fn new(label: impl Into<String>) -> Self {
        let bar = ProgressBar::hidden();
        bar.set_message(label.into());
        Self {
            bar,
            styled: Mutex::new(false),
        }
    }

    fn style_for(&self, total: Option<u64>) {
        let Ok(mut styled) = self.styled.lock() else {
            return;
        };
        if *styled {
            return;
        }
        *styled = true;

        self.bar
            .set_draw_target(indicatif::ProgressDrawTarget::stderr());
        match total {
            Some(total) if total > 0 => {
                self.bar.set_length(total);
                if let Ok(style) = ProgressStyle::default_bar()
                    .template("   [{bar:50.green/blue}] {bytes}/{total_bytes}  {msg}")
                {
                    self.bar.set_style(style.progress_chars("█▓░"));
                }
            }
            _ => {
                if let Ok(style) =
                    ProgressStyle::default_spinner().template("   {spinner:.green} {bytes}  {msg}")
                {
                    self.bar.set_style(style);
                }
            }
        }
    }
}

impl ProgressObserver for TerminalProgress {
    fn on_progress(&self, received: u64, total: Option<u64>) {
        self.style_for(total);
        self.bar.set_position(received);
        if total.is_none() {
            self.bar.tick();
        }
    }

    fn on_finish(&self, _received: u64) {
        self.bar.finish_and_clear();
    }
}

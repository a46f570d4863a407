//! Progress sinks for long running pipeline operations.
//!
//! Messages are advisory milestones ("Found 12 releases...") and carry no
//! control-flow meaning.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

pub trait ProgressSink {
    fn report(&mut self, message: &str);
}

impl<F> ProgressSink for F
where
    F: FnMut(&str),
{
    fn report(&mut self, message: &str) {
        self(message)
    }
}

/// Discards every message.
pub struct Silent;

impl ProgressSink for Silent {
    fn report(&mut self, _message: &str) {}
}

/// Terminal spinner that shows the latest milestone.
pub struct Spinner {
    pb: ProgressBar,
}

impl Spinner {
    pub fn start(message: &str) -> Self {
        let pb = ProgressBar::new_spinner();
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
            pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
        }
        Self { pb }
    }

    pub fn finish(self) {
        self.pb.finish_and_clear();
    }
}

impl ProgressSink for Spinner {
    fn report(&mut self, message: &str) {
        log::debug!("{}", message);
        self.pb.set_message(message.to_string());
    }
}

// vidfit-cli/src/progress.rs
//
// Terminal and JSON observers for the core's progress event stream.

use std::sync::Mutex;

use indicatif::{ProgressBar, ProgressStyle};
use vidfit_core::{format_duration, ProgressEvent, ProgressObserver};

/// Renders encode progress as an indicatif bar, one bar per file.
pub struct TerminalProgress {
    bar: Mutex<Option<ProgressBar>>,
}

impl TerminalProgress {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }
}

impl ProgressObserver for TerminalProgress {
    fn on_event(&self, event: &ProgressEvent) {
        let Ok(mut slot) = self.bar.lock() else {
            return;
        };
        match event {
            ProgressEvent::Started { filename, .. } => {
                let bar = ProgressBar::new(100);
                bar.set_style(
                    ProgressStyle::with_template("  [{bar:50}] {pos:>3}% {msg}")
                        .expect("static template is valid")
                        .progress_chars("=>-"),
                );
                bar.set_message(filename.clone());
                *slot = Some(bar);
            }
            ProgressEvent::Progress {
                elapsed_secs,
                percent,
                ..
            } => {
                if let Some(bar) = slot.as_ref() {
                    if let Some(percent) = percent {
                        bar.set_position(*percent as u64);
                    }
                    bar.set_message(format_duration(*elapsed_secs));
                }
            }
            ProgressEvent::Completed { .. } => {
                if let Some(bar) = slot.take() {
                    bar.finish_and_clear();
                }
            }
            ProgressEvent::Failed { .. } => {
                if let Some(bar) = slot.take() {
                    bar.abandon();
                }
            }
        }
    }
}

/// Prints each progress event as a JSON line on stdout.
pub struct JsonProgress;

impl ProgressObserver for JsonProgress {
    fn on_event(&self, event: &ProgressEvent) {
        if let Ok(line) = serde_json::to_string(event) {
            println!("{line}");
        }
    }
}

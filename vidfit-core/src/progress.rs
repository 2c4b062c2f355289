//! Typed progress event stream for encode monitoring.
//!
//! The encoder's line-oriented progress output is translated into
//! [`ProgressEvent`] values and handed to a [`ProgressObserver`]. Monitoring
//! is advisory: events are produced from a channel filled by the sidecar's
//! own reader threads, so a slow observer cannot stall the encode.

use serde::Serialize;

/// A single progress notification for one encode.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ProgressEvent {
    /// Encoding of a file has begun.
    Started {
        filename: String,
        /// Total source duration in seconds, when known.
        duration_secs: Option<f64>,
    },
    /// Periodic position report while encoding.
    Progress {
        /// Output timestamp reached so far, in seconds.
        elapsed_secs: f64,
        /// Percentage of the total duration, when the duration is known.
        percent: Option<f64>,
        /// Encoding speed relative to realtime, when reported.
        speed: Option<f32>,
    },
    /// The file finished encoding successfully.
    Completed { filename: String },
    /// The encoder exited with a failure for this file.
    Failed { filename: String, message: String },
}

/// Consumer of progress events. Implementations must be cheap; they run on
/// the thread draining the encoder's event stream.
pub trait ProgressObserver {
    fn on_event(&self, event: &ProgressEvent);
}

/// Observer that discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl ProgressObserver for NullObserver {
    fn on_event(&self, _event: &ProgressEvent) {}
}

/// Rate-limits raw position reports into [`ProgressEvent::Progress`] values.
///
/// Emits only when the percentage advances by a step (or on reaching 100%),
/// so observers see a bounded number of events per file. With an unknown
/// duration every report passes through unstepped.
#[derive(Debug)]
pub struct ProgressThrottle {
    duration_secs: Option<f64>,
    last_percent: f64,
    step: f64,
}

impl ProgressThrottle {
    #[must_use]
    pub fn new(duration_secs: Option<f64>) -> Self {
        Self {
            duration_secs: duration_secs.filter(|d| *d > 0.0),
            last_percent: -1.0,
            step: 1.0,
        }
    }

    /// Feeds a raw position report, returning an event when it should be
    /// surfaced to the observer.
    pub fn update(&mut self, elapsed_secs: f64, speed: Option<f32>) -> Option<ProgressEvent> {
        let percent = self
            .duration_secs
            .map(|d| (elapsed_secs / d * 100.0).min(100.0));

        if let Some(percent) = percent {
            let crossed_step = percent >= self.last_percent + self.step;
            let reached_end = percent >= 100.0 && self.last_percent < 100.0;
            if !crossed_step && !reached_end {
                return None;
            }
            self.last_percent = percent;
        }

        Some(ProgressEvent::Progress {
            elapsed_secs,
            percent,
            speed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn percent_of(event: Option<ProgressEvent>) -> Option<f64> {
        match event {
            Some(ProgressEvent::Progress { percent, .. }) => percent,
            _ => None,
        }
    }

    #[test]
    fn test_throttle_steps_percent() {
        let mut throttle = ProgressThrottle::new(Some(100.0));

        // First report always emits
        assert_eq!(percent_of(throttle.update(0.0, None)), Some(0.0));
        // Sub-step movement is suppressed
        assert!(throttle.update(0.5, None).is_none());
        // Crossing the step emits again
        assert_eq!(percent_of(throttle.update(1.5, None)), Some(1.5));
        // Reaching the end always emits
        assert_eq!(percent_of(throttle.update(100.0, None)), Some(100.0));
        // And only once
        assert!(throttle.update(100.0, None).is_none());
    }

    #[test]
    fn test_throttle_clamps_overshoot() {
        let mut throttle = ProgressThrottle::new(Some(10.0));
        assert_eq!(percent_of(throttle.update(20.0, None)), Some(100.0));
    }

    #[test]
    fn test_throttle_unknown_duration_passes_through() {
        let mut throttle = ProgressThrottle::new(None);
        let event = throttle.update(12.5, Some(1.5));
        assert_eq!(
            event,
            Some(ProgressEvent::Progress {
                elapsed_secs: 12.5,
                percent: None,
                speed: Some(1.5),
            })
        );
        // No stepping without a duration
        assert!(throttle.update(12.6, None).is_some());
    }

    #[test]
    fn test_zero_duration_treated_as_unknown() {
        let mut throttle = ProgressThrottle::new(Some(0.0));
        assert_eq!(percent_of(throttle.update(1.0, None)), None);
    }
}

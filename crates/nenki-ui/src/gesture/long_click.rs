use std::time::{Duration, Instant};

/// Outcome of [`ClickDisambiguator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    Click,
    LongClick,
}

/// Tells single clicks from quick double presses ("long clicks").
///
/// A completed click is held back until either a second click arrives
/// within `threshold` (long click) or the threshold passes (single click).
/// Only worth running when a long-click handler exists: it delays every
/// plain click by up to `threshold`.
#[derive(Debug, Clone)]
pub struct ClickDisambiguator {
    threshold: Duration,
    counter: u32,
    last_end: Option<Instant>,
}

impl ClickDisambiguator {
    pub fn new(threshold: Duration) -> Self {
        Self { threshold, counter: 0, last_end: None }
    }

    #[inline]
    pub fn threshold(&self) -> Duration {
        self.threshold
    }

    pub fn set_threshold(&mut self, threshold: Duration) {
        self.threshold = threshold;
    }

    /// Feeds a completed click. `interval` is the gap since the previous
    /// completed press, `end` the time this one ended.
    pub fn completed(&mut self, interval: Option<Duration>, end: Instant) -> Option<Gesture> {
        self.last_end = Some(end);
        let quick = interval.is_some_and(|d| d < self.threshold);
        if quick && self.counter > 0 {
            self.counter += 1;
            if self.counter >= 2 {
                self.counter = 0;
                return Some(Gesture::LongClick);
            }
            return None;
        }
        let pending = self.counter > 0;
        self.counter = 1;
        pending.then_some(Gesture::Click)
    }

    /// Releases a held-back click once its threshold has passed.
    pub fn poll(&mut self, now: Instant) -> Option<Gesture> {
        match self.deadline() {
            Some(at) if now >= at => {
                self.counter = 0;
                Some(Gesture::Click)
            }
            _ => None,
        }
    }

    /// When the held-back click resolves, if one is pending.
    pub fn deadline(&self) -> Option<Instant> {
        if self.counter == 0 {
            return None;
        }
        self.last_end.map(|end| end + self.threshold)
    }

    pub fn reset(&mut self) {
        self.counter = 0;
        self.last_end = None;
    }
}

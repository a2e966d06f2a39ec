use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use crate::coords::Viewport;
use crate::input::{InputEvent, InputFrame, InputState};
use crate::scene::DrawList;

use super::{FrameEvent, Platform, PlatformEvent, Waker};

/// Headless host configuration.
#[derive(Debug, Clone)]
pub struct HeadlessConfig {
    pub viewport: Viewport,
    /// Simulated time between scripted frames.
    pub frame_interval: Duration,
}

impl Default for HeadlessConfig {
    fn default() -> Self {
        Self {
            viewport: Viewport::new(800.0, 600.0, 1.0),
            frame_interval: Duration::from_millis(16),
        }
    }
}

#[derive(Debug, Default)]
struct WakeState {
    pending: AtomicBool,
    count: AtomicUsize,
}

/// Scripted platform without a window.
///
/// Frames are queued up front; once the script runs dry the platform keeps
/// producing frames while a wake is pending and then reports shutdown.
#[derive(Debug)]
pub struct HeadlessPlatform {
    config: HeadlessConfig,
    script: VecDeque<PlatformEvent>,
    input: InputState,
    clock: Instant,
    wake: Arc<WakeState>,
    presented: usize,
    last: Option<DrawList>,
    last_redraw_at: Option<Instant>,
    fail_present: Option<String>,
}

impl HeadlessPlatform {
    pub fn new(config: HeadlessConfig) -> Self {
        Self {
            config,
            script: VecDeque::new(),
            input: InputState::default(),
            clock: Instant::now(),
            wake: Arc::new(WakeState::default()),
            presented: 0,
            last: None,
            last_redraw_at: None,
            fail_present: None,
        }
    }

    /// Queues a frame carrying `events`, folded through the input state.
    pub fn push_frame(&mut self, events: impl IntoIterator<Item = InputEvent>) -> &mut Self {
        let mut frame = InputFrame::default();
        for ev in events {
            self.input.apply_event(&mut frame, ev);
        }
        self.clock += self.config.frame_interval;
        self.script.push_back(PlatformEvent::Frame(FrameEvent {
            viewport: self.config.viewport,
            now: self.clock,
            input: Some(frame),
        }));
        self
    }

    /// Queues a frame that renders without input handling.
    pub fn push_passive_frame(&mut self) -> &mut Self {
        self.clock += self.config.frame_interval;
        self.script.push_back(PlatformEvent::Frame(FrameEvent {
            viewport: self.config.viewport,
            now: self.clock,
            input: None,
        }));
        self
    }

    pub fn push_destroy(&mut self, err: Option<anyhow::Error>) -> &mut Self {
        self.script.push_back(PlatformEvent::Destroy(err));
        self
    }

    /// Makes every later `present` fail with `message`.
    pub fn fail_present(&mut self, message: impl Into<String>) -> &mut Self {
        self.fail_present = Some(message.into());
        self
    }

    pub fn frames_presented(&self) -> usize {
        self.presented
    }

    pub fn last_frame(&self) -> Option<&DrawList> {
        self.last.as_ref()
    }

    pub fn last_redraw_at(&self) -> Option<Instant> {
        self.last_redraw_at
    }

    pub fn wake_count(&self) -> usize {
        self.wake.count.load(Ordering::SeqCst)
    }
}

impl Default for HeadlessPlatform {
    fn default() -> Self {
        Self::new(HeadlessConfig::default())
    }
}

impl Platform for HeadlessPlatform {
    fn next_event(&mut self) -> PlatformEvent {
        if let Some(ev) = self.script.pop_front() {
            return ev;
        }
        if self.wake.pending.swap(false, Ordering::SeqCst) {
            self.clock += self.config.frame_interval;
            return PlatformEvent::Frame(FrameEvent {
                viewport: self.config.viewport,
                now: self.clock,
                input: Some(InputFrame::default()),
            });
        }
        PlatformEvent::Destroy(None)
    }

    fn present(&mut self, frame: &DrawList, redraw_at: Option<Instant>) -> anyhow::Result<()> {
        if let Some(message) = &self.fail_present {
            anyhow::bail!("present failed: {message}");
        }
        self.presented += 1;
        self.last = Some(frame.clone());
        self.last_redraw_at = redraw_at;
        Ok(())
    }

    fn waker(&self) -> Waker {
        let wake = Arc::clone(&self.wake);
        Waker::new(move || {
            wake.count.fetch_add(1, Ordering::SeqCst);
            wake.pending.store(true, Ordering::SeqCst);
        })
    }
}

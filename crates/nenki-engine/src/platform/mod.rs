//! Contract between the UI loop and whatever hosts it.
//!
//! A platform owns the window (or test script), produces frame and
//! shutdown events, presents the recorded draw stream and can be woken from
//! any thread when new work is queued.

mod headless;

pub use headless::{HeadlessConfig, HeadlessPlatform};

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use crate::coords::Viewport;
use crate::input::InputFrame;
use crate::scene::DrawList;

/// One frame request from the platform.
#[derive(Debug, Clone)]
pub struct FrameEvent {
    /// Drawable area and scale for this frame.
    pub viewport: Viewport,
    /// Timestamp the frame is for.
    pub now: Instant,
    /// Input since the previous frame. `None` renders without interaction.
    pub input: Option<InputFrame>,
}

/// Event delivered by [`Platform::next_event`].
#[derive(Debug)]
pub enum PlatformEvent {
    Frame(FrameEvent),
    /// The host is going away. `Some` carries the failure that caused it.
    Destroy(Option<anyhow::Error>),
}

/// Thread-safe "please produce a frame" signal.
#[derive(Clone)]
pub struct Waker(Arc<dyn Fn() + Send + Sync>);

impl Waker {
    pub fn new(f: impl Fn() + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    /// A waker that does nothing. Used before a platform is attached.
    pub fn noop() -> Self {
        Self::new(|| {})
    }

    #[inline]
    pub fn wake(&self) {
        (self.0)()
    }
}

impl fmt::Debug for Waker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Waker")
    }
}

/// Host of a UI loop.
pub trait Platform {
    /// Blocks until the next frame or shutdown.
    fn next_event(&mut self) -> PlatformEvent;

    /// Presents a finished frame. `redraw_at` asks for another frame no
    /// later than the given instant even without input.
    fn present(&mut self, frame: &DrawList, redraw_at: Option<Instant>) -> anyhow::Result<()>;

    /// Signal used to request a frame from another thread.
    fn waker(&self) -> Waker;
}

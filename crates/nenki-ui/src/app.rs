//! The frame loop.
//!
//! [`AppUi`] owns the widget tree and a root [`ContainerLayout`]. Each
//! frame it paints the background, runs the update hook, drains the
//! one-shot mutations queued through [`UiHandle`], routes input against the
//! previous frame's hit areas and lays the root out to the viewport.

use std::time::{Duration, Instant};

use nenki_engine::coords::Rect;
use nenki_engine::paint::Color;
use nenki_engine::platform::{FrameEvent, Platform, PlatformEvent, Waker};
use nenki_engine::scene::{DrawList, ZIndex};
use nenki_engine::text::{ApproxMetrics, TextMetrics};
use nenki_engine::time::FrameClock;

use crate::constraints::Constraints;
use crate::context::{FrameInfo, layout_root};
use crate::queue::UiHandle;
use crate::registry::WidgetRegistry;
use crate::router::InputRouter;
use crate::tree::{Handle, WidgetTree};
use crate::widgets::button::LONG_CLICK_THRESHOLD;
use crate::widgets::container::ContainerLayout;

/// App-wide settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UiConfig {
    /// Painted under everything each frame.
    pub background: Option<Color>,
    /// Default click/long-click gap for buttons.
    pub long_click_threshold: Duration,
    /// Pixels per wheel line step.
    pub scroll_line: f32,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self { background: None, long_click_threshold: LONG_CLICK_THRESHOLD, scroll_line: 24.0 }
    }
}

/// What the update hook and queued mutations get to work with.
pub struct UiCx<'a> {
    pub tree: &'a mut WidgetTree,
    pub registry: &'a mut WidgetRegistry,
    root: Handle<ContainerLayout>,
    handle: &'a UiHandle,
    now: Instant,
}

impl UiCx<'_> {
    pub fn root(&self) -> Handle<ContainerLayout> {
        self.root
    }

    /// For queueing follow-up work; it runs next frame.
    pub fn handle(&self) -> &UiHandle {
        self.handle
    }

    pub fn now(&self) -> Instant {
        self.now
    }
}

type UpdateHook = Box<dyn FnMut(&mut UiCx<'_>)>;
type FatalHook = Box<dyn FnMut(&anyhow::Error)>;

pub struct AppUi {
    tree: WidgetTree,
    registry: WidgetRegistry,
    root: Handle<ContainerLayout>,
    handle: UiHandle,
    on_update: Option<UpdateHook>,
    on_fatal: FatalHook,
    config: UiConfig,
    router: InputRouter,
    scene: DrawList,
    prev_scene: DrawList,
    clock: FrameClock,
    metrics: Box<dyn TextMetrics>,
    redraw_at: Option<Instant>,
}

impl AppUi {
    pub fn new(config: UiConfig) -> Self {
        let mut tree = WidgetTree::new();
        let root = tree.insert(ContainerLayout::default());
        Self {
            tree,
            registry: WidgetRegistry::new(),
            root,
            handle: UiHandle::new(),
            on_update: None,
            on_fatal: Box::new(|err| {
                log::error!("fatal: {err:#}");
                std::process::abort()
            }),
            config,
            router: InputRouter::new(),
            scene: DrawList::new(),
            prev_scene: DrawList::new(),
            clock: FrameClock::new(),
            metrics: Box::new(ApproxMetrics::default()),
            redraw_at: None,
        }
    }

    /// Swaps the text measurer, e.g. for one backed by real fonts.
    pub fn with_metrics(mut self, metrics: impl TextMetrics + 'static) -> Self {
        self.metrics = Box::new(metrics);
        self
    }

    pub fn tree(&self) -> &WidgetTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut WidgetTree {
        &mut self.tree
    }

    pub fn registry(&self) -> &WidgetRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut WidgetRegistry {
        &mut self.registry
    }

    pub fn root(&self) -> Handle<ContainerLayout> {
        self.root
    }

    pub fn config(&self) -> &UiConfig {
        &self.config
    }

    /// Cloneable entry point for other threads.
    pub fn handle(&self) -> UiHandle {
        self.handle.clone()
    }

    /// Runs every frame, before queued mutations.
    pub fn on_update(&mut self, f: impl FnMut(&mut UiCx<'_>) + 'static) -> &mut Self {
        self.on_update = Some(Box::new(f));
        self
    }

    /// Replaces the default fatal handler, which logs and aborts.
    pub fn on_fatal(&mut self, f: impl FnMut(&anyhow::Error) + 'static) -> &mut Self {
        self.on_fatal = Box::new(f);
        self
    }

    /// Latest instant a widget asked to be redrawn by, from the last frame.
    pub fn redraw_at(&self) -> Option<Instant> {
        self.redraw_at
    }

    /// Builds one frame.
    pub fn frame(&mut self, event: FrameEvent) -> &DrawList {
        let time = self.clock.tick_at(event.now);
        std::mem::swap(&mut self.scene, &mut self.prev_scene);
        self.scene.clear();

        if let Some(color) = self.config.background {
            self.scene.push_rect(ZIndex::BASE, Rect::from_size(event.viewport.size()), color);
        }

        if let Some(update) = self.on_update.as_mut() {
            let mut cx = UiCx {
                tree: &mut self.tree,
                registry: &mut self.registry,
                root: self.root,
                handle: &self.handle,
                now: event.now,
            };
            update(&mut cx);
        }

        let tasks = self.handle.take_snapshot();
        if !tasks.is_empty() {
            log::debug!("running {} queued mutation(s)", tasks.len());
        }
        for task in tasks {
            let mut cx = UiCx {
                tree: &mut self.tree,
                registry: &mut self.registry,
                root: self.root,
                handle: &self.handle,
                now: event.now,
            };
            task(&mut cx);
        }

        let interactive = event.input.is_some();
        if let Some(input) = &event.input {
            self.router.route(&self.prev_scene, input, self.config.scroll_line);
        }

        self.redraw_at = None;
        let frame = FrameInfo {
            time,
            scale: event.viewport.scale,
            metrics: self.metrics.as_ref(),
            long_click_threshold: self.config.long_click_threshold,
        };
        layout_root(
            frame,
            &mut self.tree,
            &mut self.scene,
            interactive.then_some(&mut self.router),
            &mut self.redraw_at,
            self.root.id(),
            Constraints::tight(event.viewport.size()),
        );

        let freed = self.tree.collect_garbage();
        if freed > 0 {
            log::debug!("freed {freed} destroyed widget(s)");
        }
        if interactive {
            let tree = &self.tree;
            self.router.end_frame(|id| tree.contains(id));
        }

        &self.scene
    }

    /// Drives frames from `platform` until it shuts down.
    ///
    /// Present failures and destroy events carrying an error go to the
    /// fatal handler and are returned.
    pub fn run<P: Platform>(&mut self, platform: &mut P) -> anyhow::Result<()> {
        self.handle.set_waker(platform.waker());
        log::debug!("ui loop started");

        let result = loop {
            match platform.next_event() {
                PlatformEvent::Frame(event) => {
                    self.frame(event);
                    if let Err(err) = platform.present(&self.scene, self.redraw_at) {
                        break Err(err.context("presenting frame"));
                    }
                }
                PlatformEvent::Destroy(None) => break Ok(()),
                PlatformEvent::Destroy(Some(err)) => break Err(err),
            }
        };

        self.handle.set_waker(Waker::noop());
        log::debug!("ui loop stopped");

        if let Err(err) = &result {
            log::error!("ui loop failed: {err:#}");
            (self.on_fatal)(err);
        }
        result
    }
}

impl Default for AppUi {
    fn default() -> Self {
        Self::new(UiConfig::default())
    }
}

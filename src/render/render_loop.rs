use std::{sync::Arc, time::Duration};

use tokio::{sync::watch, time::MissedTickBehavior};

use crate::{
    editor::project::ProjectSettings,
    foundation::core::FrameIndex,
    render::{
        renderer::{FrameRenderer, RenderDispatch, RendererOpts, SkipReason},
        source::FrameSource,
        surface::{SharedSurface, Surface},
    },
    scene::nodes::RenderTree,
};

/// Current playback position, polled once per tick.
pub trait PlaybackClock {
    fn current_time(&self) -> f64;
}

impl PlaybackClock for watch::Receiver<f64> {
    fn current_time(&self) -> f64 {
        *self.borrow()
    }
}

impl PlaybackClock for f64 {
    fn current_time(&self) -> f64 {
        *self
    }
}

/// What a single tick did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    NoScene,
    Busy,
    UpToDate,
    Started(FrameIndex),
}

/// Render geometry for `project`, or `fallback` when no project is loaded.
pub fn opts_for_project(project: Option<&ProjectSettings>, fallback: RendererOpts) -> RendererOpts {
    match project {
        Some(p) => RendererOpts {
            width: p.canvas.width,
            height: p.canvas.height,
            fps: p.fps,
        },
        None => fallback,
    }
}

/// Drives a [`FrameRenderer`] once per display tick.
///
/// A tick never waits for a render; it starts one when the renderer is idle and the frame or
/// tree changed, and otherwise does nothing.
#[derive(Debug)]
pub struct RenderLoop<S: FrameSource> {
    renderer: FrameRenderer<S>,
    surface: SharedSurface,
    fallback: RendererOpts,
    ticks: u64,
}

impl<S: FrameSource> RenderLoop<S> {
    pub fn new(renderer: FrameRenderer<S>, fallback: RendererOpts) -> Self {
        let opts = renderer.opts();
        Self {
            renderer,
            surface: Surface::shared(opts.width, opts.height),
            fallback,
            ticks: 0,
        }
    }

    /// Shared handle to the surface frames are presented into.
    pub fn surface(&self) -> SharedSurface {
        Arc::clone(&self.surface)
    }

    pub fn renderer(&self) -> &FrameRenderer<S> {
        &self.renderer
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn tick(&mut self, clock: &impl PlaybackClock, tree: Option<&Arc<RenderTree>>) -> TickOutcome {
        self.ticks += 1;
        let Some(tree) = tree else {
            return TickOutcome::NoScene;
        };
        let time = clock.current_time();
        match self
            .renderer
            .render_to_canvas(Arc::clone(tree), time, Arc::clone(&self.surface))
        {
            RenderDispatch::Started(frame) => TickOutcome::Started(frame),
            RenderDispatch::Skipped(SkipReason::Busy) => TickOutcome::Busy,
            RenderDispatch::Skipped(SkipReason::UpToDate) => TickOutcome::UpToDate,
        }
    }

    /// Follow the active project's canvas and fps, falling back to the preview defaults.
    pub async fn reconfigure(&mut self, project: Option<&ProjectSettings>) {
        let opts = opts_for_project(project, self.fallback);
        if opts == self.renderer.opts() {
            return;
        }
        self.renderer.settle().await;
        self.renderer.reconfigure(opts);
    }

    pub async fn settle(&mut self) {
        self.renderer.settle().await;
    }

    /// Tick every `period` until `shutdown` flips to `true` or its sender is dropped.
    ///
    /// The tree is re-read from `scene` on every tick, so swaps are picked up whole.
    pub async fn run(
        &mut self,
        clock: &impl PlaybackClock,
        scene: watch::Receiver<Option<Arc<RenderTree>>>,
        period: Duration,
        mut shutdown: watch::Receiver<bool>,
    ) {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tracing::debug!(?period, "render loop started");
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let tree = scene.borrow().clone();
                    self.tick(clock, tree.as_ref());
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }
        self.renderer.settle().await;
        tracing::debug!(ticks = self.ticks, "render loop stopped");
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/render_loop.rs"]
mod tests;

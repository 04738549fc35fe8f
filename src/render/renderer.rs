use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use image::RgbaImage;
use tokio::task::JoinHandle;

use crate::{
    foundation::{
        core::{Fps, FrameIndex},
        error::{ReelError, ReelResult},
    },
    render::{
        painter::{PaintInputs, TextRasterizer, paint_tree},
        source::{FrameImage, FrameSource},
        surface::SharedSurface,
    },
    scene::nodes::{ContentNode, RenderTree, SceneNode},
};

/// Output geometry and frame rate of a renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RendererOpts {
    pub width: u32,
    pub height: u32,
    pub fps: Fps,
}

/// Why a render request did not start.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// A render is still in flight.
    Busy,
    /// The last painted frame index and tree are unchanged.
    UpToDate,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderDispatch {
    Started(FrameIndex),
    Skipped(SkipReason),
}

/// Counters shared with in-flight render tasks.
#[derive(Debug, Default)]
pub struct RenderStats {
    dispatched: AtomicU64,
    completed: AtomicU64,
    failed: AtomicU64,
}

impl RenderStats {
    /// Renders started (calls into the paint path).
    pub fn dispatched(&self) -> u64 {
        self.dispatched.load(Ordering::Relaxed)
    }

    pub fn completed(&self) -> u64 {
        self.completed.load(Ordering::Relaxed)
    }

    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }
}

/// Paints render trees into a surface, one render at a time.
///
/// A request made while a render is in flight is skipped, not queued; the caller retries on its
/// next tick. A started render always runs to completion even if its result is already stale.
pub struct FrameRenderer<S: FrameSource> {
    opts: RendererOpts,
    source: Arc<S>,
    text: Option<Arc<dyn TextRasterizer>>,
    in_flight: Option<JoinHandle<()>>,
    last_painted: Option<(FrameIndex, Arc<RenderTree>)>,
    stats: Arc<RenderStats>,
}

impl<S: FrameSource> std::fmt::Debug for FrameRenderer<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameRenderer")
            .field("opts", &self.opts)
            .field("rendering", &self.is_rendering())
            .field("last_frame", &self.last_painted.as_ref().map(|(f, _)| *f))
            .finish()
    }
}

impl<S: FrameSource> FrameRenderer<S> {
    pub fn new(opts: RendererOpts, source: Arc<S>) -> Self {
        Self {
            opts,
            source,
            text: None,
            in_flight: None,
            last_painted: None,
            stats: Arc::new(RenderStats::default()),
        }
    }

    pub fn with_text_rasterizer(mut self, text: Arc<dyn TextRasterizer>) -> Self {
        self.text = Some(text);
        self
    }

    pub fn opts(&self) -> RendererOpts {
        self.opts
    }

    pub fn stats(&self) -> &RenderStats {
        &self.stats
    }

    /// `floor(time * fps)`.
    pub fn frame_index(&self, time: f64) -> FrameIndex {
        self.opts.fps.frame_at(time)
    }

    pub fn is_rendering(&self) -> bool {
        self.in_flight.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Whether painting `tree` at `time` would differ from the last painted frame.
    pub fn needs_repaint(&self, tree: &Arc<RenderTree>, time: f64) -> bool {
        match &self.last_painted {
            Some((frame, painted)) => {
                *frame != self.frame_index(time) || !Arc::ptr_eq(painted, tree)
            }
            None => true,
        }
    }

    /// Start painting `tree` at `time` into `target` unless busy or already up to date.
    ///
    /// Must be called from within a tokio runtime.
    pub fn render_to_canvas(
        &mut self,
        tree: Arc<RenderTree>,
        time: f64,
        target: SharedSurface,
    ) -> RenderDispatch {
        if self.is_rendering() {
            return RenderDispatch::Skipped(SkipReason::Busy);
        }
        if !self.needs_repaint(&tree, time) {
            return RenderDispatch::Skipped(SkipReason::UpToDate);
        }

        let frame = self.frame_index(time);
        self.last_painted = Some((frame, Arc::clone(&tree)));
        self.stats.dispatched.fetch_add(1, Ordering::Relaxed);

        let source = Arc::clone(&self.source);
        let text = self.text.clone();
        let stats = Arc::clone(&self.stats);
        let RendererOpts { width, height, .. } = self.opts;
        self.in_flight = Some(tokio::spawn(async move {
            match render_frame(source.as_ref(), text.as_deref(), &tree, time, width, height).await {
                Ok(image) => {
                    target.lock().present(image);
                    stats.completed.fetch_add(1, Ordering::Relaxed);
                }
                Err(err) => {
                    stats.failed.fetch_add(1, Ordering::Relaxed);
                    tracing::warn!(frame = frame.0, error = %err, "frame render failed");
                }
            }
        }));
        tracing::debug!(frame = frame.0, time, "render started");
        RenderDispatch::Started(frame)
    }

    /// Switch output geometry or frame rate; the next request always repaints.
    pub fn reconfigure(&mut self, opts: RendererOpts) {
        if opts != self.opts {
            tracing::debug!(?opts, "renderer reconfigured");
            self.opts = opts;
            self.last_painted = None;
        }
    }

    /// Wait for the in-flight render, if any, to finish.
    pub async fn settle(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            if let Err(err) = handle.await {
                tracing::warn!(error = %err, "render task aborted");
            }
        }
    }
}

/// Fetch the frames visible at `time` and paint `tree` into a new image.
pub async fn render_frame<S: FrameSource>(
    source: &S,
    text: Option<&dyn TextRasterizer>,
    tree: &RenderTree,
    time: f64,
    width: u32,
    height: u32,
) -> ReelResult<RgbaImage> {
    if width == 0 || height == 0 {
        return Err(ReelError::render(format!(
            "render target must be non-empty, got {width}x{height}"
        )));
    }
    let mut frames: HashMap<String, FrameImage> = HashMap::new();
    for node in visible_media(tree, time) {
        let (ContentNode::Video(media) | ContentNode::Image(media)) = node else {
            continue;
        };
        if frames.contains_key(&media.element_id) {
            continue;
        }
        if let Some(frame) = source.frame(&media.asset, media.source_time(time)).await? {
            frames.insert(media.element_id.clone(), frame);
        }
    }
    Ok(paint_tree(
        tree,
        time,
        width,
        height,
        PaintInputs {
            frames: &frames,
            text,
        },
    ))
}

fn visible_media(tree: &RenderTree, time: f64) -> impl Iterator<Item = &ContentNode> {
    tree.children
        .iter()
        .flat_map(|child| match child {
            SceneNode::BlurBackground(blur) => blur.content.iter().collect::<Vec<_>>(),
            SceneNode::Content(node) => vec![node],
        })
        .filter(move |n| n.is_visible_at(time) && !matches!(n, ContentNode::Text(_)))
}

#[cfg(test)]
#[path = "../../tests/unit/render/renderer.rs"]
mod tests;

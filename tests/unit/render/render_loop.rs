use std::sync::atomic::{AtomicUsize, Ordering};

use image::RgbaImage;

use super::*;
use crate::{
    assets::library::{MediaAsset, MediaType},
    foundation::{
        core::{Canvas, Fps},
        error::ReelResult,
    },
    render::source::FrameImage,
    scene::nodes::{ContentNode, MediaNode, SceneNode, TimeWindow},
};

#[derive(Default)]
struct CountingSource {
    calls: AtomicUsize,
}

impl FrameSource for CountingSource {
    async fn frame(&self, _asset: &MediaAsset, _t: f64) -> ReelResult<Option<FrameImage>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Some(Arc::new(RgbaImage::new(2, 2))))
    }
}

fn fallback() -> RendererOpts {
    RendererOpts {
        width: 600,
        height: 320,
        fps: Fps::default(),
    }
}

fn scene() -> Arc<RenderTree> {
    Arc::new(RenderTree {
        duration: 10.0,
        canvas: Canvas::new(600, 320).unwrap(),
        background: None,
        children: vec![SceneNode::Content(ContentNode::Video(MediaNode {
            element_id: "v".to_owned(),
            asset: MediaAsset::new("m", "clip", MediaType::Video),
            window: TimeWindow { start: 0.0, end: 10.0 },
            trim_start: 0.0,
        }))],
    })
}

fn render_loop(source: &Arc<CountingSource>) -> RenderLoop<CountingSource> {
    RenderLoop::new(FrameRenderer::new(fallback(), Arc::clone(source)), fallback())
}

#[tokio::test]
async fn identical_ticks_paint_at_most_once() {
    let source = Arc::new(CountingSource::default());
    let mut lp = render_loop(&source);
    let tree = scene();

    assert_eq!(lp.tick(&1.0, Some(&tree)), TickOutcome::Started(FrameIndex(30)));
    lp.settle().await;
    assert_eq!(lp.tick(&1.0, Some(&tree)), TickOutcome::UpToDate);
    lp.settle().await;

    assert_eq!(lp.renderer().stats().dispatched(), 1);
    assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    assert_eq!(lp.ticks(), 2);
}

#[tokio::test]
async fn busy_tick_does_not_queue() {
    let source = Arc::new(CountingSource::default());
    let mut lp = render_loop(&source);
    let tree = scene();

    assert!(matches!(lp.tick(&0.0, Some(&tree)), TickOutcome::Started(_)));
    assert_eq!(lp.tick(&0.5, Some(&tree)), TickOutcome::Busy);
    lp.settle().await;
    assert_eq!(lp.renderer().stats().dispatched(), 1);

    // The skipped frame is picked up on the next free tick.
    assert_eq!(lp.tick(&0.5, Some(&tree)), TickOutcome::Started(FrameIndex(15)));
    lp.settle().await;
}

#[tokio::test]
async fn no_scene_is_a_no_op() {
    let source = Arc::new(CountingSource::default());
    let mut lp = render_loop(&source);
    assert_eq!(lp.tick(&0.0, None), TickOutcome::NoScene);
    assert_eq!(lp.renderer().stats().dispatched(), 0);
}

#[tokio::test]
async fn reconfigure_follows_project_and_falls_back() {
    let source = Arc::new(CountingSource::default());
    let mut lp = render_loop(&source);
    let project = ProjectSettings::new(
        "p",
        Canvas::new(1920, 1080).unwrap(),
        Fps::new(25, 1).unwrap(),
    );

    lp.reconfigure(Some(&project)).await;
    let opts = lp.renderer().opts();
    assert_eq!((opts.width, opts.height, opts.fps.num), (1920, 1080, 25));

    lp.reconfigure(None).await;
    assert_eq!(lp.renderer().opts(), fallback());
}

#[tokio::test(start_paused = true)]
async fn run_ticks_until_shutdown() {
    let source = Arc::new(CountingSource::default());
    let mut lp = render_loop(&source);
    let (scene_tx, scene_rx) = watch::channel(Some(scene()));
    let (time_tx, time_rx) = watch::channel(0.0_f64);
    let (stop_tx, stop_rx) = watch::channel(false);

    let driver = async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        time_tx.send_replace(1.0);
        tokio::time::sleep(Duration::from_millis(50)).await;
        stop_tx.send_replace(true);
    };
    tokio::join!(
        lp.run(&time_rx, scene_rx, Duration::from_millis(16), stop_rx),
        driver
    );
    drop(scene_tx);

    // One paint for frame 0 and one for frame 30; every other tick was idle.
    assert_eq!(lp.renderer().stats().dispatched(), 2);
    assert!(lp.ticks() > 2);
}

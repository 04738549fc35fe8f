use std::sync::atomic::{AtomicUsize, Ordering};

use image::RgbaImage;

use super::*;
use crate::{
    assets::library::MediaType,
    filmstrip::service::FilmstripSettings,
    foundation::error::{ReelError, ReelResult},
    render::source::FrameImage,
};

#[derive(Default)]
struct CountingSource {
    calls: AtomicUsize,
    broken: bool,
}

impl FrameSource for CountingSource {
    async fn frame(&self, _asset: &MediaAsset, _t: f64) -> ReelResult<Option<FrameImage>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.broken {
            return Err(ReelError::decode("unsupported codec"));
        }
        Ok(Some(Arc::new(RgbaImage::new(16, 9))))
    }
}

fn setup(broken: bool) -> (Arc<CountingSource>, Arc<FilmstripService<CountingSource>>) {
    let source = Arc::new(CountingSource {
        broken,
        ..CountingSource::default()
    });
    let svc = FilmstripService::new(Arc::clone(&source), FilmstripSettings::default()).unwrap();
    (source, Arc::new(svc))
}

fn clip() -> MediaAsset {
    MediaAsset::new("clip", "clip.mp4", MediaType::Video)
}

fn range(start: f64, end: f64, zoom: f64) -> VisibleRange {
    VisibleRange { start, end, zoom }
}

#[tokio::test]
async fn generates_gap_then_becomes_ready() {
    let (source, svc) = setup(false);
    let mut view = FilmstripView::new(Arc::clone(&svc), "clip");

    view.track(Some(&clip()), 20.0, range(0.0, 10.0, 0.1));
    assert_eq!(view.status(), FilmstripStatus::Generating);
    assert_eq!(view.progress(), 0.0);
    assert_eq!(view.tier(), Some(Tier::COARSEST));

    svc.flush().await;
    assert!(view.poll_events());
    assert_eq!(view.status(), FilmstripStatus::Ready);
    assert_eq!(view.progress(), 100.0);
    assert_eq!(view.frames().len(), 3);
    assert_eq!(source.calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn cached_range_is_ready_without_generation() {
    let (source, svc) = setup(false);
    let mut first = FilmstripView::new(Arc::clone(&svc), "clip");
    first.track(Some(&clip()), 20.0, range(0.0, 10.0, 0.1));
    svc.flush().await;

    let mut second = FilmstripView::new(Arc::clone(&svc), "clip");
    second.track(Some(&clip()), 20.0, range(0.0, 5.0, 0.1));
    assert_eq!(second.status(), FilmstripStatus::Ready);
    assert_eq!(second.frames().len(), 2);
    assert_eq!(source.calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn events_for_a_stale_tier_are_ignored() {
    let (_source, svc) = setup(false);
    let mut view = FilmstripView::new(Arc::clone(&svc), "clip");
    view.track(Some(&clip()), 20.0, range(0.0, 1.0, 10.0));

    let stale = FilmstripEvent::FrameReady {
        media_id: "clip".to_owned(),
        tier: Tier::COARSEST,
        timestamp: 0.0,
    };
    assert!(!view.handle_event(&stale));
    let foreign = FilmstripEvent::Error {
        media_id: "other".to_owned(),
        message: "boom".to_owned(),
    };
    assert!(!view.handle_event(&foreign));
    assert_eq!(view.status(), FilmstripStatus::Generating);
}

#[tokio::test]
async fn error_event_marks_view() {
    let (_source, svc) = setup(true);
    let mut view = FilmstripView::new(Arc::clone(&svc), "clip");
    view.track(Some(&clip()), 20.0, range(0.0, 5.0, 0.1));
    svc.flush().await;
    view.poll_events();
    assert_eq!(view.status(), FilmstripStatus::Error);
}

#[tokio::test]
async fn range_change_and_drop_cancel_pending_work() {
    let (source, svc) = setup(false);
    let mut view = FilmstripView::new(Arc::clone(&svc), "clip");
    view.track(Some(&clip()), 20.0, range(0.0, 10.0, 0.1));
    assert_eq!(svc.pending_count("clip"), 3);

    view.track(None, 20.0, range(0.0, 10.0, 0.1));
    assert_eq!(view.status(), FilmstripStatus::Idle);
    assert_eq!(svc.pending_count("clip"), 0);

    view.track(Some(&clip()), 20.0, range(0.0, 5.0, 0.1));
    assert_eq!(svc.pending_count("clip"), 2);
    drop(view);
    assert_eq!(svc.pending_count("clip"), 0);
    svc.flush().await;
    assert_eq!(source.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn asset_for_other_media_is_an_error() {
    let (source, svc) = setup(false);
    let mut view = FilmstripView::new(Arc::clone(&svc), "clip");
    let other = MediaAsset::new("other", "other.mp4", MediaType::Video);

    view.track(Some(&other), 20.0, range(0.0, 10.0, 0.1));
    assert_eq!(view.status(), FilmstripStatus::Error);
    assert!(view.tier().is_none());
    assert_eq!(svc.pending_count("other"), 0);
    assert_eq!(svc.pending_count("clip"), 0);
    svc.flush().await;
    assert_eq!(source.calls.load(Ordering::SeqCst), 0);
}

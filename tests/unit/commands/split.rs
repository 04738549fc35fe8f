use super::*;
use crate::{
    commands::test_support::Fixture,
    timeline::model::{Track, TrackKind},
};

fn trimmed_clip() -> Element {
    let mut el = Element::video("clip", "m", 2.0, 10.0);
    el.trim_start = 1.0;
    el.trim_end = 1.0;
    el
}

fn fixture_with(el: Element) -> (Fixture, ElementRef) {
    let mut track = Track::main();
    let at = ElementRef::new(track.id.clone(), el.id.clone());
    track.elements.push(el);
    (Fixture::new(vec![track]), at)
}

#[test]
fn both_preserves_total_effective_duration() {
    let el = trimmed_clip();
    let original = el.effective_duration();
    for t in [2.5, 5.0, 9.99] {
        let (left, right) = split_element(&el, t).unwrap();
        assert!(left.effective_duration() >= 0.0);
        assert!(right.effective_duration() >= 0.0);
        let sum = left.effective_duration() + right.effective_duration();
        assert!((sum - original).abs() < 1e-9, "t={t}: {sum} != {original}");
        assert_eq!(left.id, el.id);
        assert_ne!(right.id, el.id);
        assert_eq!(right.start_time, t);
        assert!((left.end_time() - t).abs() < 1e-9);
    }
}

#[test]
fn split_outside_or_on_boundary_is_noop() {
    let el = trimmed_clip();
    assert!(split_element(&el, 2.0).is_none());
    assert!(split_element(&el, 10.0).is_none());
    assert!(split_element(&el, 11.0).is_none());
}

#[test]
fn both_mode_names_pieces_and_reports_new_ids() {
    let (fx, at) = fixture_with(trimmed_clip());
    let mut cmd = SplitElements::new(vec![at.clone()], 4.0, SplitRetain::Both);
    cmd.execute(&fx.ctx()).unwrap();
    let tracks = fx.tracks();
    let els = &tracks[0].elements;
    assert_eq!(els.len(), 2);
    assert_eq!(els[0].name, "clip (left)");
    assert_eq!(els[1].name, "clip (right)");
    assert_eq!(els[0].id, at.element_id);
    assert_eq!(cmd.new_element_ids(), &[els[1].id.clone()]);
    assert_eq!(els[1].trim_start, 3.0);
    assert_eq!(els[0].trim_end, 7.0);
}

#[test]
fn retain_left_and_right() {
    let (fx, at) = fixture_with(trimmed_clip());
    let mut left = SplitElements::new(vec![at.clone()], 4.0, SplitRetain::Left);
    left.execute(&fx.ctx()).unwrap();
    let tracks = fx.tracks();
    assert_eq!(tracks[0].elements.len(), 1);
    assert_eq!(tracks[0].elements[0].id, at.element_id);
    assert_eq!(tracks[0].elements[0].end_time(), 4.0);
    left.undo(&fx.ctx()).unwrap();

    let mut right = SplitElements::new(vec![at.clone()], 4.0, SplitRetain::Right);
    right.execute(&fx.ctx()).unwrap();
    let tracks = fx.tracks();
    assert_eq!(tracks[0].elements.len(), 1);
    assert_ne!(tracks[0].elements[0].id, at.element_id);
    assert_eq!(tracks[0].elements[0].start_time, 4.0);
    assert_eq!(tracks[0].elements[0].end_time(), 10.0);
}

#[test]
fn untargeted_elements_untouched_and_round_trip() {
    let a = trimmed_clip();
    let b = trimmed_clip();
    let mut track = Track::main();
    let at_a = ElementRef::new(track.id.clone(), a.id.clone());
    track.elements = vec![a, b.clone()];
    let text = Track::new(TrackKind::Text, "Text Track");
    let fx = Fixture::new(vec![track, text]);

    let mut cmd = SplitElements::new(vec![at_a], 5.0, SplitRetain::Both);
    fx.assert_round_trip(&mut cmd);
    cmd.execute(&fx.ctx()).unwrap();
    let tracks = fx.tracks();
    assert_eq!(tracks[0].elements.len(), 3);
    assert_eq!(tracks[0].elements[2], b);
}

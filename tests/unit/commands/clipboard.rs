use super::*;
use crate::commands::test_support::Fixture;

fn two_track_fixture() -> (Fixture, Vec<ElementRef>) {
    let v = Element::video("v", "m", 3.0, 2.0);
    let t = Element::text("title", 5.0, 1.0);
    let mut media = Track::main();
    let mut text = Track::new(TrackKind::Text, "Text Track");
    let refs = vec![
        ElementRef::new(media.id.clone(), v.id.clone()),
        ElementRef::new(text.id.clone(), t.id.clone()),
    ];
    media.elements.push(v);
    text.elements.push(t);
    (Fixture::new(vec![media, text]), refs)
}

#[test]
fn copy_records_track_kind() {
    let (fx, mut refs) = two_track_fixture();
    refs.push(ElementRef::new("ghost", "ghost"));
    let mut clip = Clipboard::default();
    assert_eq!(clip.copy(&fx.tracks(), &refs), 2);
    assert_eq!(clip.items()[0].track_kind, TrackKind::Media);
    assert_eq!(clip.items()[1].track_kind, TrackKind::Text);
    clip.clear();
    assert!(clip.is_empty());
}

#[test]
fn paste_keeps_relative_offsets_from_anchor() {
    let (fx, refs) = two_track_fixture();
    let mut clip = Clipboard::default();
    clip.copy(&fx.tracks(), &refs);

    let mut paste = PasteElements::new(10.0, clip.items().to_vec());
    fx.assert_round_trip(&mut paste);
    paste.execute(&fx.ctx()).unwrap();
    let tracks = fx.tracks();
    assert_eq!(tracks[0].elements.len(), 2);
    assert_eq!(tracks[1].elements.len(), 2);
    assert_eq!(tracks[0].elements[1].start_time, 10.0);
    assert_eq!(tracks[1].elements[1].start_time, 12.0);
    assert_eq!(paste.pasted_ids().len(), 2);
    assert_ne!(tracks[0].elements[1].id, tracks[0].elements[0].id);
}

#[test]
fn paste_clamps_to_zero_and_never_crosses_track_kinds() {
    let (fx, refs) = two_track_fixture();
    let mut clip = Clipboard::default();
    clip.copy(&fx.tracks(), &refs[1..]);

    // Only a media track exists in the destination.
    let dest = Fixture::new(vec![Track::main()]);
    let err = PasteElements::new(0.0, clip.items().to_vec())
        .execute(&dest.ctx())
        .unwrap_err();
    assert!(matches!(err, ReelError::NotFound(_)));
    assert!(dest.tracks()[0].elements.is_empty());

    clip.copy(&fx.tracks(), &refs);
    let mut paste = PasteElements::new(-5.0, clip.items().to_vec());
    paste.execute(&fx.ctx()).unwrap();
    let tracks = fx.tracks();
    assert_eq!(tracks[0].elements[1].start_time, 0.0);
    // -5 + (5 - 3) clamps to 0 as well
    assert_eq!(tracks[1].elements[1].start_time, 0.0);
}

#[test]
fn empty_paste_is_rejected() {
    let fx = Fixture::new(vec![Track::main()]);
    assert!(PasteElements::new(1.0, Vec::new()).execute(&fx.ctx()).is_err());
}

#[test]
fn paste_copies_onto_every_track_of_the_kind() {
    let (fx, refs) = two_track_fixture();
    let mut clip = Clipboard::default();
    clip.copy(&fx.tracks(), &refs[..1]);

    let mut tracks = fx.tracks().to_vec();
    tracks.push(Track::new(TrackKind::Media, "Media Track"));
    let fx = Fixture::new(tracks);

    let mut paste = PasteElements::new(7.0, clip.items().to_vec());
    paste.execute(&fx.ctx()).unwrap();
    let tracks = fx.tracks();
    let counts: Vec<usize> = tracks.iter().map(|t| t.elements.len()).collect();
    assert_eq!(counts, vec![2, 1, 1]);
    assert_eq!(paste.pasted_ids().len(), 2);
    assert_ne!(paste.pasted_ids()[0], paste.pasted_ids()[1]);
    assert_eq!(tracks[2].elements[0].start_time, 7.0);
}

#[test]
fn paste_rejects_items_whose_element_does_not_fit_the_track() {
    let fx = Fixture::new(vec![Track::main()]);
    let mislabeled = ClipboardItem {
        track_kind: TrackKind::Media,
        element: Element::text("hello", 0.0, 1.0),
    };
    let err = PasteElements::new(1.0, vec![mislabeled])
        .execute(&fx.ctx())
        .unwrap_err();
    assert!(matches!(err, ReelError::Validation(_)));
    assert!(fx.tracks()[0].elements.is_empty());

    let blank = ClipboardItem {
        track_kind: TrackKind::Text,
        element: Element::text("   ", 0.0, 1.0),
    };
    let fx = Fixture::new(vec![Track::main(), Track::new(TrackKind::Text, "Text Track")]);
    assert!(PasteElements::new(0.0, vec![blank]).execute(&fx.ctx()).is_err());
    assert!(fx.tracks()[1].elements.is_empty());
}

use super::*;
use crate::timeline::model::{Element, TrackKind};

fn settings() -> ProjectSettings {
    ProjectSettings::new("demo", Canvas::new(1280, 720).unwrap(), Fps::new(30, 1).unwrap())
}

#[test]
fn background_fill_and_blur() {
    assert_eq!(Background::default().fill().unwrap(), Some(Rgba8::BLACK));
    let transparent = Background::Color {
        color: "transparent".to_owned(),
    };
    assert_eq!(transparent.fill().unwrap(), None);
    let blur = Background::Blur {
        blur_intensity: Some(12.0),
    };
    assert_eq!(blur.fill().unwrap(), None);
    assert!(blur.is_blur());

    let parsed: Background = serde_json::from_str(r#"{"type":"blur"}"#).unwrap();
    assert_eq!(
        parsed,
        Background::Blur {
            blur_intensity: None
        }
    );
}

#[test]
fn store_update_requires_active_project() {
    let store = ProjectStore::default();
    assert!(!store.update(|s| s.fps = Fps::new(24, 1).unwrap()));
    store.load(settings());
    assert!(store.update(|s| s.fps = Fps::new(24, 1).unwrap()));
    assert_eq!(store.active().unwrap().fps, Fps::new(24, 1).unwrap());
    assert!(store.close().is_some());
    assert!(store.active().is_none());
}

#[test]
fn document_json_roundtrip_and_validation() {
    let mut track = Track::new(TrackKind::Text, "Text Track");
    track.elements.push(Element::text("hello", 0.0, 2.0));
    let doc = ProjectDocument {
        settings: settings(),
        media: Vec::new(),
        tracks: vec![track],
    };
    let json = doc.to_json_string().unwrap();
    assert!(json.contains("\"type\": \"text\""));
    assert_eq!(ProjectDocument::from_json_str(&json).unwrap(), doc);

    let mut bad = doc.clone();
    bad.tracks[0].kind = TrackKind::Media;
    let bad_json = bad.to_json_string().unwrap();
    assert!(matches!(
        ProjectDocument::from_json_str(&bad_json),
        Err(ReelError::Validation(_))
    ));
    assert!(matches!(
        ProjectDocument::from_json_str("{"),
        Err(ReelError::Serde(_))
    ));
}

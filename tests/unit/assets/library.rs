use super::*;

#[test]
fn add_lookup_remove() {
    let lib = MediaLibrary::default();
    lib.add(MediaAsset::new("m1", "clip.mp4", MediaType::Video).with_dimensions(1920, 1080))
        .unwrap();
    assert!(lib.add(MediaAsset::new("m1", "dup", MediaType::Image)).is_err());

    let found = lib.media_asset("m1").unwrap();
    assert_eq!(found.dimensions(), Some((1920, 1080)));
    assert!(found.is_visual());

    let before = lib.snapshot();
    lib.remove("m1").unwrap();
    assert!(lib.media_asset("m1").is_none());
    assert_eq!(before.len(), 1, "earlier snapshots are unaffected");
    assert!(matches!(lib.remove("m1"), Err(ReelError::NotFound(_))));
}

#[test]
fn bytes_are_not_persisted() {
    let asset = MediaAsset::new("m", "pic.png", MediaType::Image).with_bytes(vec![1u8, 2, 3]);
    let json = serde_json::to_value(&asset).unwrap();
    assert_eq!(json["type"], "image");
    assert!(json.get("bytes").is_none());
    let back: MediaAsset = serde_json::from_value(json).unwrap();
    assert!(back.bytes.is_none());
}

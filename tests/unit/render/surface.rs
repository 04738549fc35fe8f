use super::*;

#[test]
fn present_replaces_pixels_and_bumps_generation() {
    let mut surface = Surface::new(4, 2);
    assert_eq!(surface.generation(), 0);
    assert_eq!(surface.image().get_pixel(0, 0).0, [0, 0, 0, 0]);

    surface.present(RgbaImage::from_pixel(8, 8, image::Rgba([1, 2, 3, 255])));
    assert_eq!(surface.generation(), 1);
    assert_eq!((surface.width(), surface.height()), (8, 8));
    assert_eq!(surface.image().get_pixel(7, 7).0, [1, 2, 3, 255]);
}

#[test]
fn clear_fills_without_presenting() {
    let shared = Surface::shared(3, 3);
    shared.lock().clear(Rgba8::WHITE);
    let surface = shared.lock();
    assert_eq!(surface.generation(), 0);
    assert!(surface.image().pixels().all(|p| p.0 == [255, 255, 255, 255]));
}

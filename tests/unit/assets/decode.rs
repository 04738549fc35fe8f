use std::io::Cursor;

use super::*;
use crate::assets::library::MediaType;

fn png_bytes(w: u32, h: u32, px: [u8; 4]) -> Vec<u8> {
    let img = RgbaImage::from_pixel(w, h, image::Rgba(px));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn decode_image_png_keeps_straight_alpha() {
    let buf = png_bytes(2, 1, [100, 50, 200, 128]);
    let img = decode_image(&buf).unwrap();
    assert_eq!(img.dimensions(), (2, 1));
    assert_eq!(img.get_pixel(0, 0).0, [100, 50, 200, 128]);
}

#[test]
fn decode_garbage_is_a_decode_error() {
    assert!(matches!(decode_image(b"not an image"), Err(ReelError::Decode(_))));
}

#[test]
fn load_asset_bytes_prefers_memory_and_reports_missing_source() {
    let asset = MediaAsset::new("m", "a.png", MediaType::Image).with_bytes(vec![9u8, 9]);
    assert_eq!(&*load_asset_bytes(&asset).unwrap(), &[9u8, 9]);

    let missing = MediaAsset::new("m", "a.png", MediaType::Image);
    assert!(matches!(load_asset_bytes(&missing), Err(ReelError::NotFound(_))));

    let bad_path = MediaAsset::new("m", "a.png", MediaType::Image).with_path("/nonexistent/reelcore/a.png");
    assert!(matches!(load_asset_bytes(&bad_path), Err(ReelError::Other(_))));
}

#[test]
fn thumbnail_resizes_to_exact_size() {
    let img = RgbaImage::from_pixel(320, 180, image::Rgba([10, 20, 30, 255]));
    let thumb = thumbnail(&img, 106, 60);
    assert_eq!(thumb.dimensions(), (106, 60));
    assert_eq!(thumb.get_pixel(50, 30).0, [10, 20, 30, 255]);
}

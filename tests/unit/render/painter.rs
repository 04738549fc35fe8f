use std::sync::Arc;

use super::*;
use crate::{
    assets::library::{MediaAsset, MediaType},
    foundation::core::Canvas,
    scene::nodes::{BlurBackgroundNode, MediaNode, TimeWindow},
    timeline::model::TextContent,
};

fn media(id: &str, start: f64, end: f64) -> ContentNode {
    ContentNode::Image(MediaNode {
        element_id: id.to_owned(),
        asset: MediaAsset::new("m", "pic", MediaType::Image),
        window: TimeWindow { start, end },
        trim_start: 0.0,
    })
}

fn solid(w: u32, h: u32, px: [u8; 4]) -> FrameImage {
    Arc::new(RgbaImage::from_pixel(w, h, image::Rgba(px)))
}

fn tree(children: Vec<SceneNode>, background: Option<Rgba8>) -> RenderTree {
    RenderTree {
        duration: 10.0,
        canvas: Canvas::new(20, 10).unwrap(),
        background,
        children,
    }
}

#[test]
fn background_fills_surface() {
    let frames = HashMap::new();
    let out = paint_tree(
        &tree(Vec::new(), Some(Rgba8::opaque(9, 8, 7))),
        0.0,
        20,
        10,
        PaintInputs { frames: &frames, text: None },
    );
    assert_eq!(out.get_pixel(0, 0).0, [9, 8, 7, 255]);
    assert_eq!(out.get_pixel(19, 9).0, [9, 8, 7, 255]);
}

#[test]
fn media_is_contain_fitted_and_time_gated() {
    let mut frames = HashMap::new();
    frames.insert("a".to_owned(), solid(10, 10, [255, 0, 0, 255]));
    let t = tree(
        vec![SceneNode::Content(media("a", 1.0, 2.0))],
        Some(Rgba8::BLACK),
    );
    let inputs = PaintInputs { frames: &frames, text: None };

    let before = paint_tree(&t, 0.5, 20, 10, inputs);
    assert_eq!(before.get_pixel(10, 5).0, [0, 0, 0, 255]);

    let during = paint_tree(&t, 1.5, 20, 10, inputs);
    // Square frame in a 20x10 canvas covers the middle 10 columns.
    assert_eq!(during.get_pixel(10, 5).0, [255, 0, 0, 255]);
    assert_eq!(during.get_pixel(2, 5).0, [0, 0, 0, 255]);
    assert_eq!(during.get_pixel(17, 5).0, [0, 0, 0, 255]);
}

#[test]
fn later_children_paint_on_top() {
    let mut frames = HashMap::new();
    frames.insert("below".to_owned(), solid(20, 10, [0, 255, 0, 255]));
    frames.insert("above".to_owned(), solid(20, 10, [0, 0, 255, 255]));
    let t = tree(
        vec![
            SceneNode::Content(media("below", 0.0, 5.0)),
            SceneNode::Content(media("above", 0.0, 5.0)),
        ],
        None,
    );
    let out = paint_tree(&t, 1.0, 20, 10, PaintInputs { frames: &frames, text: None });
    assert_eq!(out.get_pixel(5, 5).0, [0, 0, 255, 255]);
}

#[test]
fn blur_backdrop_paints_under_content() {
    let mut frames = HashMap::new();
    frames.insert("a".to_owned(), solid(10, 10, [200, 100, 50, 255]));
    let t = tree(
        vec![
            SceneNode::BlurBackground(BlurBackgroundNode {
                blur_intensity: 2.0,
                content: vec![media("a", 0.0, 5.0)],
            }),
            SceneNode::Content(media("a", 0.0, 5.0)),
        ],
        None,
    );
    let out = paint_tree(&t, 1.0, 20, 10, PaintInputs { frames: &frames, text: None });
    // Center is the sharp frame; the margin picks up blurred color bleeding outwards.
    assert_eq!(out.get_pixel(10, 5).0, [200, 100, 50, 255]);
    assert!(out.get_pixel(4, 5).0[3] > 0);
}

struct BlockGlyphs;

impl TextRasterizer for BlockGlyphs {
    fn rasterize(&self, node: &TextNode, _scale: f64) -> Option<RgbaImage> {
        Some(RgbaImage::from_pixel(4, 2, node.color.to_pixel()))
    }
}

fn text_node(align: TextAlign, background: Option<Rgba8>) -> TextNode {
    TextNode {
        element_id: "t".to_owned(),
        window: TimeWindow { start: 0.0, end: 5.0 },
        text: TextContent {
            content: "ab".to_owned(),
            font_size: 5.0,
            text_align: align,
            ..TextContent::default()
        },
        position: kurbo::Point::new(10.0, 5.0),
        color: Rgba8::WHITE,
        background,
    }
}

#[test]
fn text_uses_rasterizer_and_alignment() {
    let frames = HashMap::new();
    let t = tree(
        vec![SceneNode::Content(ContentNode::Text(text_node(TextAlign::Left, None)))],
        Some(Rgba8::BLACK),
    );
    let raster = BlockGlyphs;
    let out = paint_tree(
        &t,
        1.0,
        20,
        10,
        PaintInputs { frames: &frames, text: Some(&raster) },
    );
    // Left-aligned glyphs start at the anchor x and are vertically centered on it.
    assert_eq!(out.get_pixel(10, 4).0, [255, 255, 255, 255]);
    assert_eq!(out.get_pixel(13, 5).0, [255, 255, 255, 255]);
    assert_eq!(out.get_pixel(9, 4).0, [0, 0, 0, 255]);
}

#[test]
fn text_background_box_without_rasterizer() {
    let frames = HashMap::new();
    let node = text_node(TextAlign::Center, Some(Rgba8::opaque(0, 255, 0)));
    let size = estimate_text_size(&node, 1.0);
    assert!((size.width - 6.0).abs() < 1e-9);
    assert!((size.height - 6.0).abs() < 1e-9);

    let t = tree(vec![SceneNode::Content(ContentNode::Text(node))], Some(Rgba8::BLACK));
    let out = paint_tree(&t, 1.0, 20, 10, PaintInputs { frames: &frames, text: None });
    assert_eq!(out.get_pixel(10, 5).0, [0, 255, 0, 255]);
    assert_eq!(out.get_pixel(1, 1).0, [0, 0, 0, 255]);
}

#[test]
fn fill_rect_clips_and_blends() {
    let mut img = RgbaImage::from_pixel(4, 4, image::Rgba([0, 0, 0, 255]));
    fill_rect(&mut img, Rect::new(-5.0, -5.0, 2.0, 2.0), Rgba8::WHITE);
    assert_eq!(img.get_pixel(1, 1).0, [255, 255, 255, 255]);
    assert_eq!(img.get_pixel(2, 2).0, [0, 0, 0, 255]);
}

use std::collections::HashMap;

use image::{Pixel, RgbaImage, imageops::FilterType};
use kurbo::Rect;

use crate::{
    foundation::core::{Rgba8, contain_rect, cover_rect},
    render::source::FrameImage,
    scene::nodes::{ContentNode, RenderTree, SceneNode, TextNode},
    timeline::model::TextAlign,
};

/// Turns a text node into glyph pixels.
///
/// `scale` maps canvas units to surface pixels. The returned image is positioned by the painter
/// according to the node's alignment and already carries the node's color and opacity.
pub trait TextRasterizer: Send + Sync {
    fn rasterize(&self, node: &TextNode, scale: f64) -> Option<RgbaImage>;
}

/// Per-frame inputs gathered before painting.
#[derive(Clone, Copy)]
pub struct PaintInputs<'a> {
    /// Decoded media frames keyed by element id.
    pub frames: &'a HashMap<String, FrameImage>,
    pub text: Option<&'a dyn TextRasterizer>,
}

/// Paint `tree` at time `t` into a fresh `width` x `height` image.
///
/// The project canvas is contain-fitted into the image; media frames are contain-fitted into the
/// canvas. Nodes without a decoded frame are skipped.
#[tracing::instrument(skip(tree, inputs), fields(children = tree.children.len()))]
pub fn paint_tree(tree: &RenderTree, t: f64, width: u32, height: u32, inputs: PaintInputs<'_>) -> RgbaImage {
    let bg = tree.background.unwrap_or(Rgba8::transparent());
    let mut img = RgbaImage::from_pixel(width, height, bg.to_pixel());
    let target = Rect::new(0.0, 0.0, f64::from(width), f64::from(height));
    let canvas_rect = contain_rect(tree.canvas.width, tree.canvas.height, target);
    let scale = canvas_rect.width() / f64::from(tree.canvas.width.max(1));
    let view = View { canvas_rect, scale };

    for child in &tree.children {
        match child {
            SceneNode::BlurBackground(blur) => {
                let mut offscreen = RgbaImage::new(width, height);
                for node in blur.content.iter().filter(|n| n.is_visible_at(t)) {
                    paint_content(&mut offscreen, node, &view, inputs);
                }
                let sigma = (blur.blur_intensity * scale) as f32;
                let blurred = if sigma > 0.0 {
                    image::imageops::blur(&offscreen, sigma)
                } else {
                    offscreen
                };
                let dst = cover_rect(blurred.width(), blurred.height(), target);
                draw_scaled(&mut img, &blurred, dst);
            }
            SceneNode::Content(node) if node.is_visible_at(t) => {
                paint_content(&mut img, node, &view, inputs);
            }
            SceneNode::Content(_) => {}
        }
    }
    img
}

struct View {
    canvas_rect: Rect,
    scale: f64,
}

impl View {
    fn to_surface(&self, p: kurbo::Point) -> kurbo::Point {
        kurbo::Point::new(
            self.canvas_rect.x0 + p.x * self.scale,
            self.canvas_rect.y0 + p.y * self.scale,
        )
    }
}

fn paint_content(img: &mut RgbaImage, node: &ContentNode, view: &View, inputs: PaintInputs<'_>) {
    match node {
        ContentNode::Video(media) | ContentNode::Image(media) => {
            let Some(frame) = inputs.frames.get(&media.element_id) else {
                return;
            };
            let dst = contain_rect(frame.width(), frame.height(), view.canvas_rect);
            draw_scaled(img, frame, dst);
        }
        ContentNode::Text(text) => paint_text(img, text, view, inputs.text),
    }
}

fn paint_text(img: &mut RgbaImage, node: &TextNode, view: &View, raster: Option<&dyn TextRasterizer>) {
    let anchor = view.to_surface(node.position);
    let glyphs = raster.and_then(|r| r.rasterize(node, view.scale));
    let size = match &glyphs {
        Some(g) => kurbo::Size::new(f64::from(g.width()), f64::from(g.height())),
        None => estimate_text_size(node, view.scale),
    };
    let x0 = match node.text.text_align {
        TextAlign::Left => anchor.x,
        TextAlign::Center => anchor.x - size.width / 2.0,
        TextAlign::Right => anchor.x - size.width,
    };
    let rect = Rect::from_origin_size((x0, anchor.y - size.height / 2.0), size);

    if let Some(bg) = node.background {
        fill_rect(img, rect, bg);
    }
    if let Some(glyphs) = glyphs {
        image::imageops::overlay(img, &glyphs, rect.x0.round() as i64, rect.y0.round() as i64);
    }
}

/// Rough box for text when no rasterizer is installed: 0.6em per char, 1.2em per line.
pub fn estimate_text_size(node: &TextNode, scale: f64) -> kurbo::Size {
    let em = node.text.font_size * scale;
    let lines: Vec<&str> = node.text.content.lines().collect();
    let widest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    kurbo::Size::new(widest as f64 * em * 0.6, lines.len().max(1) as f64 * em * 1.2)
}

/// Blend `color` over every pixel of `rect` clipped to the image.
pub fn fill_rect(img: &mut RgbaImage, rect: Rect, color: Rgba8) {
    if color.is_transparent() {
        return;
    }
    let x0 = rect.x0.round().max(0.0) as u32;
    let y0 = rect.y0.round().max(0.0) as u32;
    let x1 = (rect.x1.round().max(0.0) as u32).min(img.width());
    let y1 = (rect.y1.round().max(0.0) as u32).min(img.height());
    let px = color.to_pixel();
    for y in y0..y1 {
        for x in x0..x1 {
            img.get_pixel_mut(x, y).blend(&px);
        }
    }
}

/// Resize `src` to `dst` and alpha-composite it onto `img`.
pub fn draw_scaled(img: &mut RgbaImage, src: &RgbaImage, dst: Rect) {
    let w = dst.width().round();
    let h = dst.height().round();
    if w < 1.0 || h < 1.0 {
        return;
    }
    let (w, h) = (w as u32, h as u32);
    let x = dst.x0.round() as i64;
    let y = dst.y0.round() as i64;
    if src.dimensions() == (w, h) {
        image::imageops::overlay(img, src, x, y);
    } else {
        let resized = image::imageops::resize(src, w, h, FilterType::Triangle);
        image::imageops::overlay(img, &resized, x, y);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/painter.rs"]
mod tests;

//! Painting render trees into surfaces.
//!
//! [`renderer::FrameRenderer`] owns the single-flight gate, [`render_loop::RenderLoop`] polls it
//! once per display tick, and [`painter::paint_tree`] does the CPU compositing.

pub mod painter;
pub mod render_loop;
pub mod renderer;
pub mod source;
pub mod surface;

//! reelcore is the preview-rendering core of a timeline video editor.
//!
//! It keeps an undoable track model, composes it with media assets into an immutable render
//! tree, paints that tree into a surface from a single-flight render loop, and serves timeline
//! filmstrips from a tiered thumbnail cache.
//!
//! # Data flow
//!
//! 1. **Edit**: a [`Command`] replaces the whole [`TrackList`] and keeps the prior list for undo.
//! 2. **Compose**: [`SceneComposer`] rebuilds the [`RenderTree`] when its inputs change by value.
//! 3. **Render**: [`RenderLoop`] asks [`FrameRenderer`] to paint when the frame index or tree
//!    instance changed and no render is in flight.
//! 4. **Filmstrip**: [`FilmstripService`] serves cached thumbnails and back-fills the gaps.
//!
//! [`Editor`] wires the stores, history, composer and playhead together.
#![forbid(unsafe_code)]

mod assets;
mod commands;
mod editor;
mod filmstrip;
mod foundation;
mod render;
mod scene;
mod timeline;

pub use assets::decode::{decode_image, load_asset_bytes, thumbnail};
pub use assets::library::{MediaAsset, MediaAssetStore, MediaLibrary, MediaList, MediaType};
pub use commands::clipboard::{Clipboard, ClipboardItem, PasteElements};
pub use commands::duplicate::{DUPLICATE_GAP, DuplicateElements, duplicate_element};
pub use commands::element::{
    AddElement, DeleteElements, MoveElement, ToggleElementHidden, TrimElement,
    UpdateElementStartTime,
};
pub use commands::manager::CommandManager;
pub use commands::split::{SplitElements, SplitRetain, split_element};
pub use commands::track::{AddTrack, RemoveTrack, ToggleTrackMute};
pub use commands::{Command, CommandContext, ElementRef};
pub use editor::config::{EditorConfig, PreviewSettings};
pub use editor::playback::{MAX_SPEED, MIN_SPEED, Playback};
pub use editor::project::{Background, ProjectDocument, ProjectSettings, ProjectStore};
pub use editor::state::Editor;
pub use filmstrip::cache::{FilmstripFrame, FrameCache, FrameKey};
pub use filmstrip::service::{FilmstripEvent, FilmstripService, FilmstripSettings};
pub use filmstrip::tiers::{Tier, timestamp_key, timestamps_for_range};
pub use filmstrip::view::{FilmstripStatus, FilmstripView, VisibleRange};
pub use foundation::core::{Canvas, Fps, FrameIndex, Rgba8, contain_rect, cover_rect};
pub use foundation::error::{ReelError, ReelResult};
pub use foundation::ids::generate_id;
pub use foundation::observable::Observable;
pub use render::painter::{
    PaintInputs, TextRasterizer, draw_scaled, estimate_text_size, fill_rect, paint_tree,
};
pub use render::render_loop::{PlaybackClock, RenderLoop, TickOutcome, opts_for_project};
pub use render::renderer::{
    FrameRenderer, RenderDispatch, RenderStats, RendererOpts, SkipReason, render_frame,
};
pub use render::source::{FrameImage, FrameSource, StillImageSource};
pub use render::surface::{SharedSurface, Surface};
pub use scene::builder::{PaintOrder, SceneParams, build_scene};
pub use scene::composer::{SceneComposer, SceneInputs};
pub use scene::nodes::{
    BlurBackgroundNode, ContentNode, MediaNode, RenderTree, SceneNode, TextNode, TimeWindow,
};
pub use timeline::model::{
    DecodedAudio, Element, ElementKind, FontStyle, FontWeight, TextAlign, TextContent,
    TextDecoration, Track, TrackKind, TrackList, calculate_total_duration, ensure_main_track,
    find_element, main_track,
};
pub use timeline::order::sort_tracks_for_display;
pub use timeline::store::TimelineStore;
pub use timeline::validate::{
    Compatibility, check_element_overlaps, validate_element_timing,
    validate_element_track_compatibility, validate_required_fields, validate_track_list,
    would_element_overlap,
};

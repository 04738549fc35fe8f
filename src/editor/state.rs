use std::{collections::HashSet, sync::Arc};

use tokio::sync::watch;

use crate::{
    assets::library::{MediaAsset, MediaAssetStore, MediaLibrary},
    commands::{
        Command, CommandContext, ElementRef,
        clipboard::{Clipboard, PasteElements},
        manager::CommandManager,
    },
    editor::{
        config::EditorConfig,
        playback::Playback,
        project::{Background, ProjectDocument, ProjectSettings, ProjectStore},
    },
    foundation::{
        core::{Canvas, Fps},
        error::{ReelError, ReelResult},
        observable::Observable,
    },
    render::{render_loop::opts_for_project, renderer::RendererOpts},
    scene::{
        composer::{SceneComposer, SceneInputs},
        nodes::RenderTree,
    },
    timeline::{
        model::{Track, ensure_main_track},
        order::sort_tracks_for_display,
        store::TimelineStore,
        validate::validate_track_list,
    },
};

/// Explicit application state tying the stores, history, composer and playhead together.
///
/// Every mutation goes through [`Editor::execute`], [`Editor::undo`] or [`Editor::redo`], each of
/// which recomposes the scene afterwards.
#[derive(Debug)]
pub struct Editor {
    config: EditorConfig,
    timeline: TimelineStore,
    media: MediaLibrary,
    project: ProjectStore,
    history: CommandManager,
    clipboard: Clipboard,
    composer: SceneComposer,
    scene: Observable<Option<Arc<RenderTree>>>,
    playback: Playback,
}

macro_rules! ctx {
    ($self:ident) => {
        CommandContext {
            timeline: &$self.timeline,
            media: &$self.media,
            project: &$self.project,
        }
    };
}

impl Editor {
    /// Empty editor with no project loaded and a lone main track.
    pub fn new(config: EditorConfig) -> ReelResult<Self> {
        config.validate()?;
        let mut editor = Self {
            history: CommandManager::new(config.history_depth),
            config,
            timeline: TimelineStore::new(vec![Track::main()]),
            media: MediaLibrary::default(),
            project: ProjectStore::default(),
            clipboard: Clipboard::default(),
            composer: SceneComposer::new(),
            scene: Observable::new(None),
            playback: Playback::new(),
        };
        editor.refresh_scene()?;
        Ok(editor)
    }

    /// Open a saved project. The track list must pass [`validate_track_list`].
    pub fn from_document(doc: ProjectDocument, config: EditorConfig) -> ReelResult<Self> {
        config.validate()?;
        validate_track_list(&doc.tracks)?;
        let tracks = ensure_main_track(&doc.track_list());
        let mut editor = Self {
            history: CommandManager::new(config.history_depth),
            config,
            timeline: TimelineStore::new(tracks.as_ref().clone()),
            media: MediaLibrary::new(doc.media),
            project: ProjectStore::new(Some(doc.settings)),
            clipboard: Clipboard::default(),
            composer: SceneComposer::new(),
            scene: Observable::new(None),
            playback: Playback::new(),
        };
        editor.refresh_scene()?;
        Ok(editor)
    }

    /// Plain-value snapshot for persistence; `None` without an active project.
    pub fn to_document(&self) -> Option<ProjectDocument> {
        Some(ProjectDocument {
            settings: self.project.active()?,
            media: self.media.snapshot().as_ref().clone(),
            tracks: self.timeline.tracks().as_ref().clone(),
        })
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn timeline(&self) -> &TimelineStore {
        &self.timeline
    }

    pub fn media(&self) -> &MediaLibrary {
        &self.media
    }

    pub fn project(&self) -> &ProjectStore {
        &self.project
    }

    pub fn history(&self) -> &CommandManager {
        &self.history
    }

    pub fn clipboard(&self) -> &Clipboard {
        &self.clipboard
    }

    pub fn playback(&self) -> &Playback {
        &self.playback
    }

    pub fn playback_mut(&mut self) -> &mut Playback {
        &mut self.playback
    }

    pub fn load_project(&mut self, settings: ProjectSettings) -> ReelResult<Arc<RenderTree>> {
        tracing::debug!(project = %settings.name, "project loaded");
        self.project.load(settings);
        self.refresh_scene()
    }

    pub fn add_media(&mut self, asset: MediaAsset) -> ReelResult<Arc<RenderTree>> {
        self.media.add(asset)?;
        self.refresh_scene()
    }

    pub fn remove_media(&mut self, id: &str) -> ReelResult<MediaAsset> {
        let asset = self.media.remove(id)?;
        self.refresh_scene()?;
        Ok(asset)
    }

    pub fn execute(&mut self, cmd: impl Command + 'static) -> ReelResult<()> {
        self.history.execute(&ctx!(self), Box::new(cmd))?;
        self.refresh_scene()?;
        Ok(())
    }

    pub fn undo(&mut self) -> ReelResult<bool> {
        let undone = self.history.undo(&ctx!(self))?;
        if undone {
            self.refresh_scene()?;
        }
        Ok(undone)
    }

    pub fn redo(&mut self) -> ReelResult<bool> {
        let redone = self.history.redo(&ctx!(self))?;
        if redone {
            self.refresh_scene()?;
        }
        Ok(redone)
    }

    pub fn total_duration(&self) -> f64 {
        self.timeline.total_duration()
    }

    /// Tracks in display order (text first, audio last, main after other media).
    pub fn sorted_tracks(&self) -> Vec<Track> {
        let tracks = self.timeline.tracks();
        sort_tracks_for_display(&tracks).into_iter().cloned().collect()
    }

    /// Copy `selection` to the editor clipboard; returns how many elements were copied.
    pub fn copy_selected(&mut self, selection: &[ElementRef]) -> usize {
        self.clipboard.copy(&self.timeline.tracks(), selection)
    }

    /// Paste the clipboard at `time`; returns the ids of the new elements.
    pub fn paste_at(&mut self, time: f64) -> ReelResult<Vec<String>> {
        let before: HashSet<String> = self
            .timeline
            .tracks()
            .iter()
            .flat_map(|t| t.elements.iter().map(|e| e.id.clone()))
            .collect();
        self.execute(PasteElements::new(time, self.clipboard.items().to_vec()))?;
        Ok(self
            .timeline
            .tracks()
            .iter()
            .flat_map(|t| t.elements.iter())
            .filter(|e| !before.contains(&e.id))
            .map(|e| e.id.clone())
            .collect())
    }

    /// Move the playhead within the project duration.
    pub fn seek(&mut self, time: f64) -> f64 {
        let duration = self.total_duration();
        self.playback.seek(time, duration)
    }

    pub fn toggle_playback(&mut self) {
        let (duration, fps) = (self.total_duration(), self.fps());
        self.playback.toggle(duration, fps);
    }

    /// Advance a playing playhead by `elapsed` wall seconds.
    pub fn advance(&mut self, elapsed: f64) -> f64 {
        let (duration, fps) = (self.total_duration(), self.fps());
        self.playback.advance(elapsed, duration, fps)
    }

    /// Project fps, or the preview fps when no project is loaded.
    pub fn fps(&self) -> Fps {
        self.project
            .active()
            .map(|p| p.fps)
            .or_else(|| Fps::from_f64(self.config.preview.fps).ok())
            .unwrap_or_default()
    }

    /// Geometry a preview renderer should use right now.
    pub fn renderer_opts(&self) -> ReelResult<RendererOpts> {
        let fallback = self.config.preview.renderer_opts()?;
        Ok(opts_for_project(self.project.active().as_ref(), fallback))
    }

    /// Recompose the scene from the current stores.
    ///
    /// Unchanged inputs hand back the current tree instance; a new tree is published to
    /// subscribers only when it differs.
    pub fn refresh_scene(&mut self) -> ReelResult<Arc<RenderTree>> {
        let project = self.project.active();
        let canvas = match &project {
            Some(p) => p.canvas,
            None => Canvas::new(self.config.preview.width, self.config.preview.height)?,
        };
        let background = project.map(|p| p.background).unwrap_or_else(Background::default);
        let tracks = ensure_main_track(&self.timeline.tracks());
        let tree = self.composer.compose(SceneInputs {
            duration: self.timeline.total_duration(),
            tracks,
            media: self.media.snapshot(),
            canvas,
            background,
            default_blur_intensity: self.config.default_blur_intensity,
            paint_order: self.config.paint_order,
        });
        let changed = self
            .scene
            .borrow()
            .as_ref()
            .is_none_or(|current| !Arc::ptr_eq(current, &tree));
        if changed {
            tracing::debug!(children = tree.children.len(), "scene updated");
            self.scene.set(Some(Arc::clone(&tree)));
        }
        Ok(tree)
    }

    pub fn scene(&self) -> Option<Arc<RenderTree>> {
        self.scene.get()
    }

    /// Receiver that sees every published scene, for driving a render loop.
    pub fn subscribe_scene(&self) -> watch::Receiver<Option<Arc<RenderTree>>> {
        self.scene.subscribe()
    }

    /// Media asset by id.
    pub fn media_asset(&self, id: &str) -> ReelResult<MediaAsset> {
        self.media
            .media_asset(id)
            .ok_or_else(|| ReelError::not_found(format!("media asset '{id}'")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/editor/state.rs"]
mod tests;

use crate::{
    assets::library::MediaLibrary,
    commands::{Command, CommandContext},
    editor::project::ProjectStore,
    timeline::{
        model::{Track, TrackList},
        store::TimelineStore,
    },
};

pub(crate) struct Fixture {
    pub timeline: TimelineStore,
    pub media: MediaLibrary,
    pub project: ProjectStore,
}

impl Fixture {
    pub fn new(tracks: Vec<Track>) -> Self {
        Self {
            timeline: TimelineStore::new(tracks),
            media: MediaLibrary::default(),
            project: ProjectStore::default(),
        }
    }

    pub fn ctx(&self) -> CommandContext<'_> {
        CommandContext {
            timeline: &self.timeline,
            media: &self.media,
            project: &self.project,
        }
    }

    pub fn tracks(&self) -> TrackList {
        self.timeline.tracks()
    }

    /// Execute then undo, asserting the track list comes back unchanged.
    pub fn assert_round_trip(&self, cmd: &mut dyn Command) {
        let before = self.tracks();
        cmd.execute(&self.ctx()).unwrap();
        cmd.undo(&self.ctx()).unwrap();
        assert_eq!(*self.tracks(), *before);
    }
}

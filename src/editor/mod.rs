pub mod config;
pub mod playback;
pub mod project;
pub mod state;

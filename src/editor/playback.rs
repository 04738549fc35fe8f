use tokio::sync::watch;

use crate::{
    foundation::{core::Fps, observable::Observable},
    render::render_loop::PlaybackClock,
};

pub const MIN_SPEED: f64 = 0.1;
pub const MAX_SPEED: f64 = 2.0;

/// Playhead state. Duration and frame rate are passed in by the caller since both change with
/// edits.
#[derive(Debug)]
pub struct Playback {
    time: Observable<f64>,
    playing: bool,
    speed: f64,
    volume: f64,
    muted: bool,
    previous_volume: f64,
}

impl Default for Playback {
    fn default() -> Self {
        Self {
            time: Observable::new(0.0),
            playing: false,
            speed: 1.0,
            volume: 1.0,
            muted: false,
            previous_volume: 1.0,
        }
    }
}

/// Last time playback can rest on: one frame before the end.
fn end_threshold(duration: f64, fps: Fps) -> f64 {
    (duration - fps.frame_duration_secs()).max(0.0)
}

impl Playback {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_time(&self) -> f64 {
        self.time.get()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Receiver usable as a [`PlaybackClock`] by a render loop.
    pub fn subscribe(&self) -> watch::Receiver<f64> {
        self.time.subscribe()
    }

    /// Start playing; restarts from 0 when parked at the end.
    pub fn play(&mut self, duration: f64, fps: Fps) {
        if duration > 0.0 && self.current_time() >= end_threshold(duration, fps) {
            self.time.set(0.0);
        }
        self.playing = true;
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }

    pub fn toggle(&mut self, duration: f64, fps: Fps) {
        if self.playing {
            self.pause();
        } else {
            self.play(duration, fps);
        }
    }

    /// Move the playhead, clamped to `[0, duration]`.
    pub fn seek(&mut self, time: f64, duration: f64) -> f64 {
        let t = time.min(duration).max(0.0);
        self.time.set(t);
        t
    }

    /// Clamped to `[0.1, 2.0]`.
    pub fn set_speed(&mut self, speed: f64) {
        self.speed = speed.clamp(MIN_SPEED, MAX_SPEED);
    }

    pub fn set_volume(&mut self, volume: f64) {
        let v = volume.clamp(0.0, 1.0);
        self.volume = v;
        self.muted = v == 0.0;
        if v > 0.0 {
            self.previous_volume = v;
        }
    }

    pub fn mute(&mut self) {
        if self.volume > 0.0 {
            self.previous_volume = self.volume;
        }
        self.muted = true;
        self.volume = 0.0;
    }

    pub fn unmute(&mut self) {
        self.muted = false;
        self.volume = self.previous_volume;
    }

    pub fn toggle_mute(&mut self) {
        if self.muted {
            self.unmute();
        } else {
            self.mute();
        }
    }

    /// Advance by `elapsed` wall seconds scaled by the speed.
    ///
    /// Reaching the end pauses playback one frame before `duration`. Returns the new time.
    pub fn advance(&mut self, elapsed: f64, duration: f64, fps: Fps) -> f64 {
        let now = self.current_time();
        if !self.playing {
            return now;
        }
        let next = now + elapsed * self.speed;
        if duration > 0.0 && next >= duration {
            let stop = end_threshold(duration, fps);
            self.playing = false;
            self.time.set(stop);
            tracing::debug!(stop, "playback reached end");
            return stop;
        }
        self.time.set(next);
        next
    }
}

impl PlaybackClock for Playback {
    fn current_time(&self) -> f64 {
        Playback::current_time(self)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/editor/playback.rs"]
mod tests;

//! Animation playback seam used by the controller.
//!
//! The controller never owns clip data. It holds a [`ClipRegistry`] of handles
//! by name and asks an [`AnimationMixer`] to play, fade and advance them.
//! [`ClipMixer`] is a small software mixer that tracks weights and local time
//! per clip; engine hosts copy its weights into their own animation player.

use std::collections::HashMap;
use std::hash::Hash;

/// Something that plays and cross-fades clips identified by `Clip` handles.
pub trait AnimationMixer {
    type Clip: Copy;

    /// Start `clip` without touching its weight or time.
    fn play(&mut self, clip: Self::Clip);

    /// Ramp `clip` down to zero weight over `duration` seconds, then stop it.
    fn fade_out(&mut self, clip: Self::Clip, duration: f32);

    /// Rewind `clip`, ramp it up from zero over `duration` seconds and play it.
    fn reset_and_fade_in(&mut self, clip: Self::Clip, duration: f32);

    /// Advance all playing clips and fades by `delta` seconds.
    fn update(&mut self, delta: f32);
}

/// Clip handles by animation name.
///
/// Lookups are permissive: an unknown name yields `None` and callers skip
/// whatever they meant to do with the clip.
#[derive(Clone, Debug)]
pub struct ClipRegistry<C> {
    clips: HashMap<String, C>,
}

impl<C> Default for ClipRegistry<C> {
    fn default() -> Self {
        Self {
            clips: HashMap::new(),
        }
    }
}

impl<C: Copy> ClipRegistry<C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, clip: C) {
        self.clips.insert(name.into(), clip);
    }

    pub fn get(&self, name: &str) -> Option<C> {
        self.clips.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.clips.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.clips.keys().map(String::as_str)
    }
}

impl<C, S: Into<String>> FromIterator<(S, C)> for ClipRegistry<C> {
    fn from_iter<I: IntoIterator<Item = (S, C)>>(iter: I) -> Self {
        Self {
            clips: iter
                .into_iter()
                .map(|(name, clip)| (name.into(), clip))
                .collect(),
        }
    }
}

/// Playback state of one clip inside a [`ClipMixer`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClipPlayback {
    /// Current blend weight in `0..=1`.
    pub weight: f32,
    /// Local clip time in seconds since the last reset.
    pub time: f32,
    pub playing: bool,
    fade_from: f32,
    fade_to: f32,
    fade_duration: f32,
    fade_elapsed: f32,
}

impl ClipPlayback {
    fn stopped() -> Self {
        Self {
            weight: 1.0,
            time: 0.0,
            playing: false,
            fade_from: 1.0,
            fade_to: 1.0,
            fade_duration: 0.0,
            fade_elapsed: 0.0,
        }
    }

    fn start_fade(&mut self, to: f32, duration: f32) {
        let duration = duration.max(0.0);
        self.fade_from = self.weight;
        self.fade_to = to;
        self.fade_elapsed = 0.0;
        self.fade_duration = duration;
        if duration <= 0.0 {
            self.finish_fade();
        }
    }

    fn finish_fade(&mut self) {
        self.weight = self.fade_to;
        self.fade_duration = 0.0;
        self.fade_elapsed = 0.0;
        if self.fade_to <= 0.0 {
            self.playing = false;
        }
    }

    pub fn is_fading(&self) -> bool {
        self.fade_duration > 0.0
    }

    fn advance(&mut self, dt: f32) {
        if !self.playing {
            return;
        }

        if self.fade_duration > 0.0 {
            self.fade_elapsed = (self.fade_elapsed + dt).min(self.fade_duration);
            let alpha = (self.fade_elapsed / self.fade_duration).clamp(0.0, 1.0);
            self.weight = self.fade_from + (self.fade_to - self.fade_from) * alpha;
            if self.fade_elapsed >= self.fade_duration {
                self.finish_fade();
            }
        }

        if self.playing {
            self.time += dt;
        }
    }
}

/// Software mixer keyed by clip handle.
#[derive(Clone, Debug)]
pub struct ClipMixer<C> {
    clips: HashMap<C, ClipPlayback>,
    elapsed: f32,
}

impl<C> Default for ClipMixer<C> {
    fn default() -> Self {
        Self {
            clips: HashMap::new(),
            elapsed: 0.0,
        }
    }
}

impl<C: Copy + Eq + Hash> ClipMixer<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total time this mixer has been advanced by.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn playback(&self, clip: C) -> Option<&ClipPlayback> {
        self.clips.get(&clip)
    }

    pub fn weight(&self, clip: C) -> f32 {
        self.clips
            .get(&clip)
            .filter(|p| p.playing)
            .map_or(0.0, |p| p.weight)
    }

    pub fn is_playing(&self, clip: C) -> bool {
        self.clips.get(&clip).is_some_and(|p| p.playing)
    }

    /// Every clip the mixer has seen, with its playback state.
    pub fn iter(&self) -> impl Iterator<Item = (C, &ClipPlayback)> {
        self.clips.iter().map(|(clip, playback)| (*clip, playback))
    }
}

impl<C: Copy + Eq + Hash> AnimationMixer for ClipMixer<C> {
    type Clip = C;

    fn play(&mut self, clip: C) {
        self.clips
            .entry(clip)
            .or_insert_with(ClipPlayback::stopped)
            .playing = true;
    }

    fn fade_out(&mut self, clip: C, duration: f32) {
        let Some(playback) = self.clips.get_mut(&clip) else {
            return;
        };
        if !playback.playing {
            return;
        }
        playback.start_fade(0.0, duration);
    }

    fn reset_and_fade_in(&mut self, clip: C, duration: f32) {
        let playback = self.clips.entry(clip).or_insert_with(ClipPlayback::stopped);
        playback.time = 0.0;
        playback.weight = 0.0;
        playback.playing = true;
        playback.start_fade(1.0, duration);
    }

    fn update(&mut self, delta: f32) {
        let dt = delta.max(0.0);
        self.elapsed += dt;
        for playback in self.clips.values_mut() {
            playback.advance(dt);
        }
    }
}

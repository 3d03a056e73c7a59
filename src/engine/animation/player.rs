// Stateful animation playback over a parsed descriptor

use super::animator::{Animator, On, PlaybackMode};
use super::descriptor;
use super::frame::{FrameList, OverrideFrame};
use crate::engine::assets::AssetError;
use crate::engine::renderer::AnimationTarget;
use glam::Vec2;
use log::{debug, warn};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// A set of named animations loaded from one descriptor, plus the playback
/// state of whichever one is active.
///
/// Animation names are case-insensitive: they are stored and looked up
/// upper-cased.
#[derive(Debug, Default)]
pub struct Animation {
    animations: HashMap<String, FrameList>,
    current_animation: String,
    /// Seconds into the current cycle
    progress: f32,
    path: PathBuf,
    animator: Animator,
}

impl Animation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the descriptor at `path`
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, AssetError> {
        let mut animation = Self {
            path: path.as_ref().to_path_buf(),
            ..Self::default()
        };
        animation.reload()?;
        Ok(animation)
    }

    /// Build from descriptor text held in memory
    pub fn from_descriptor(text: &str) -> Self {
        let mut animation = Self::new();
        animation.load_from_str(text);
        animation
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn set_path<P: AsRef<Path>>(&mut self, path: P) {
        self.path = path.as_ref().to_path_buf();
    }

    pub fn load(&mut self) -> Result<(), AssetError> {
        self.reload()
    }

    /// Re-read the descriptor file and replace the animation table
    pub fn reload(&mut self) -> Result<(), AssetError> {
        if !self.path.exists() {
            return Err(AssetError::NotFound(
                self.path.to_string_lossy().to_string(),
            ));
        }

        let text = std::fs::read_to_string(&self.path)?;
        self.load_from_str(&text);
        Ok(())
    }

    /// Replace the animation table with the parsed contents of `text`.
    ///
    /// The active animation name is kept if the new table still has it.
    /// Otherwise no animation is active until another one is set.
    pub fn load_from_str(&mut self, text: &str) {
        self.animations = descriptor::parse(text);
        self.progress = 0.0;

        if !self.current_animation.is_empty()
            && !self.animations.contains_key(&self.current_animation)
        {
            warn!(
                "Animation {} is gone after reload, nothing is playing",
                self.current_animation
            );
            self.current_animation.clear();
        }

        debug!(
            "Loaded {} animations from {}",
            self.animations.len(),
            if self.path.as_os_str().is_empty() {
                "<memory>".into()
            } else {
                self.path.to_string_lossy()
            }
        );
    }

    /// Advance playback by `elapsed` seconds at normal speed
    pub fn update<T: AnimationTarget + ?Sized>(&mut self, elapsed: f32, target: &mut T) {
        self.update_with_speed(elapsed, target, 1.0);
    }

    /// Advance playback by `elapsed * |playback_speed|` seconds.
    ///
    /// If a callback switches animation during the update, the new
    /// animation's first frame is applied before returning.
    pub fn update_with_speed<T: AnimationTarget + ?Sized>(
        &mut self,
        elapsed: f32,
        target: &mut T,
        playback_speed: f32,
    ) {
        let Some(sequence) = self.animations.get(&self.current_animation) else {
            return;
        };

        let progress = self.progress + elapsed * playback_speed.abs();
        self.progress = self.animator.update(progress, target, sequence);

        if let Some(requested) = self.animator.take_requested_animation() {
            self.progress = 0.0;

            if self.switch_to(requested) {
                if let Some(sequence) = self.animations.get(&self.current_animation) {
                    self.animator.update(0.0, target, sequence);
                }
            }
        }

        let duration = self
            .animations
            .get(&self.current_animation)
            .map_or(0.0, FrameList::total_duration);

        if duration <= 0.0 {
            return;
        }

        // A cycle that ran out without restarting ends here
        if self.progress >= duration && self.animator.mode().contains(PlaybackMode::LOOP) {
            self.progress = if self.progress.is_finite() {
                self.progress.rem_euclid(duration)
            } else {
                0.0
            };
            self.animator.rearm_loop_callbacks();
        }
    }

    /// Re-apply the current frame without advancing
    pub fn refresh<T: AnimationTarget + ?Sized>(&mut self, target: &mut T) {
        self.update(0.0, target);
    }

    pub fn sync_time(&mut self, progress: f32) {
        self.progress = progress.max(0.0);
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Show the 1-based `frame` of the current animation.
    ///
    /// Out-of-range frames show the last frame and reset progress. Otherwise
    /// progress is moved to the start of that frame, so playback continues
    /// from there.
    pub fn set_frame<T: AnimationTarget + ?Sized>(&mut self, frame: usize, target: &mut T) {
        let Some(sequence) = self.animations.get(&self.current_animation) else {
            return;
        };

        let count = sequence.frame_count();

        if frame == 0 || frame > count {
            self.progress = 0.0;
            self.animator.set_frame(count, target, sequence);
        } else {
            self.animator.set_frame(frame, target, sequence);
            self.progress = sequence.frames()[..frame - 1]
                .iter()
                .map(|f| f.duration)
                .sum();
        }
    }

    /// Switch to `state`, dropping every pending callback.
    ///
    /// Unknown states are logged and leave the current animation in place.
    pub fn set_animation(&mut self, state: &str) -> &mut Self {
        self.animator.clear();
        self.progress = 0.0;
        self.switch_to(state.to_uppercase());
        self
    }

    /// Returns true if the active animation changed
    fn switch_to(&mut self, state: String) -> bool {
        if !self.animations.contains_key(&state) {
            warn!("No animation found in file for {}", state);
            return false;
        }

        if self.current_animation == state {
            return false;
        }

        self.current_animation = state;
        true
    }

    pub fn with_callback(&mut self, on: On) -> &mut Self {
        self.animator.with_callback(on);
        self
    }

    pub fn with_mode(&mut self, mode: PlaybackMode) -> &mut Self {
        self.animator.with_mode(mode);
        self
    }

    pub fn with_finish(&mut self, on_finish: impl FnMut(&mut Animator) + 'static) -> &mut Self {
        self.animator.with_finish(on_finish);
        self
    }

    pub fn remove_callbacks(&mut self) {
        self.animator.clear();
    }

    pub fn mode(&self) -> PlaybackMode {
        self.animator.mode()
    }

    /// Name of the active animation, upper-cased
    pub fn animation_string(&self) -> &str {
        &self.current_animation
    }

    pub fn has_animation(&self, state: &str) -> bool {
        self.animations.contains_key(&state.to_uppercase())
    }

    pub fn frame_list(&self, state: &str) -> Option<&FrameList> {
        self.animations.get(&state.to_uppercase())
    }

    pub fn animation_names(&self) -> impl Iterator<Item = &str> {
        self.animations.keys().map(String::as_str)
    }

    pub fn animator(&self) -> &Animator {
        &self.animator
    }

    pub fn animator_mut(&mut self) -> &mut Animator {
        &mut self.animator
    }

    /// Named point on the frame currently shown
    pub fn get_point(&self, name: &str) -> Vec2 {
        self.animator.point(name)
    }

    /// Store a retimed copy of `state` as a new animation.
    ///
    /// The copy is stored under `uuid` (upper-cased) or, when none is given,
    /// under `STATE@timestamp`. An existing animation with that key is left
    /// untouched. Returns the key, or `None` if `state` is unknown.
    pub fn override_animation_frames(
        &mut self,
        state: &str,
        frames: &[OverrideFrame],
        uuid: Option<&str>,
    ) -> Option<String> {
        let state = state.to_uppercase();

        let Some(source) = self.animations.get(&state) else {
            warn!("Cannot override frames of unknown animation {}", state);
            return None;
        };

        let derived = source.make_new_from_override_data(frames);

        let key = match uuid {
            Some(uuid) => uuid.to_uppercase(),
            None => self.fresh_key(&state),
        };

        if self.animations.contains_key(&key) {
            debug!("Animation {} already exists, keeping it", key);
        } else {
            self.animations.insert(key.clone(), derived);
        }

        Some(key)
    }

    fn fresh_key(&self, state: &str) -> String {
        let stamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or_default();

        let mut key = format!("{}@{}", state, stamp);
        let mut bump = 0;
        while self.animations.contains_key(&key) {
            bump += 1;
            key = format!("{}@{}-{}", state, stamp, bump);
        }
        key
    }

    /// Put `other` on the same animation and progress as this one
    pub fn sync_animation(&self, other: &mut Animation) {
        other.progress = self.progress;
        other.current_animation = self.current_animation.clone();
    }
}

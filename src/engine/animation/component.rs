// Animation component for entities that own a sprite

use super::animator::{Animator, On, PlaybackMode};
use super::frame::OverrideFrame;
use super::player::Animation;
use crate::engine::assets::{AssetError, HotReloadWatcher};
use crate::engine::renderer::AnimationTarget;
use glam::Vec2;
use log::info;
use std::path::Path;

/// Drives an [`Animation`] for one entity at the entity's playback speed
#[derive(Debug)]
pub struct AnimationComponent {
    animation: Animation,
    /// Playback speed multiplier (1.0 = normal)
    playback_speed: f32,
}

impl Default for AnimationComponent {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimationComponent {
    pub fn new() -> Self {
        Self {
            animation: Animation::new(),
            playback_speed: 1.0,
        }
    }

    /// Use descriptor text held in memory
    pub fn from_descriptor(text: &str) -> Self {
        Self {
            animation: Animation::from_descriptor(text),
            playback_speed: 1.0,
        }
    }

    /// Point the component at a descriptor file; call [`AnimationComponent::load`] next
    pub fn setup<P: AsRef<Path>>(&mut self, path: P) {
        self.animation.set_path(path);
    }

    pub fn load(&mut self) -> Result<(), AssetError> {
        self.animation.load()
    }

    /// Reload the descriptor and restart the active animation from its first frame
    pub fn reload(&mut self) -> Result<(), AssetError> {
        self.animation.reload()
    }

    /// Reload if the watcher saw the descriptor change. Returns true on reload.
    pub fn poll_hot_reload(&mut self, watcher: &mut HotReloadWatcher) -> Result<bool, AssetError> {
        if !watcher.has_changed(self.animation.path()) {
            return Ok(false);
        }

        info!("Reloading animation {}", self.animation.path().display());
        self.reload()?;
        Ok(true)
    }

    /// Advance by `elapsed` seconds scaled by the playback speed
    pub fn update<T: AnimationTarget + ?Sized>(&mut self, elapsed: f32, target: &mut T) {
        self.animation
            .update_with_speed(elapsed, target, self.playback_speed);
    }

    pub fn refresh<T: AnimationTarget + ?Sized>(&mut self, target: &mut T) {
        self.animation.refresh(target);
    }

    pub fn set_playback_speed(&mut self, speed: f32) {
        self.playback_speed = speed;
    }

    pub fn playback_speed(&self) -> f32 {
        self.playback_speed
    }

    /// Switch animation and set its playback mode
    pub fn set_animation(&mut self, state: &str, mode: PlaybackMode) {
        self.animation.set_animation(state).with_mode(mode);
    }

    /// Switch animation, set its playback mode and run `on_finish` at the end
    pub fn set_animation_then(
        &mut self,
        state: &str,
        mode: PlaybackMode,
        on_finish: impl FnMut(&mut Animator) + 'static,
    ) {
        self.animation
            .set_animation(state)
            .with_mode(mode)
            .with_finish(on_finish);
    }

    /// Run `callback` when playback crosses the 1-based `frame`
    pub fn add_callback(
        &mut self,
        frame: usize,
        callback: impl FnMut(&mut Animator) + 'static,
        do_once: bool,
    ) {
        let on = if do_once {
            On::once(frame, callback)
        } else {
            On::new(frame, callback)
        };
        self.animation.with_callback(on);
    }

    pub fn cancel_callbacks(&mut self) {
        self.animation.remove_callbacks();
    }

    pub fn animation_string(&self) -> &str {
        self.animation.animation_string()
    }

    pub fn get_point(&self, name: &str) -> Vec2 {
        self.animation.get_point(name)
    }

    pub fn override_animation_frames(
        &mut self,
        state: &str,
        frames: &[OverrideFrame],
        uuid: Option<&str>,
    ) -> Option<String> {
        self.animation.override_animation_frames(state, frames, uuid)
    }

    /// Keep `other` on the same animation and time as this component
    pub fn sync_animation(&self, other: &mut AnimationComponent) {
        self.animation.sync_animation(&mut other.animation);
    }

    pub fn animation(&self) -> &Animation {
        &self.animation
    }

    pub fn animation_mut(&mut self) -> &mut Animation {
        &mut self.animation
    }
}

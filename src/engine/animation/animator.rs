// Frame selection and callback scheduling for sprite animations

use super::frame::{Frame, FrameList};
use crate::engine::renderer::AnimationTarget;
use glam::{IVec2, Vec2};
use log::warn;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};

/// A function run by the animator.
///
/// Callbacks receive the animator that fired them, so they can register
/// more callbacks, change the playback mode, clear the animator or request
/// a different animation while playback is in progress.
pub type Callback = Box<dyn FnMut(&mut Animator)>;

/// Playback mode flags. Loop, Bounce and Reverse combine freely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PlaybackMode(u8);

impl PlaybackMode {
    pub const NONE: Self = Self(0);
    /// Restart when the last frame is passed
    pub const LOOP: Self = Self(0x01);
    /// On restart, play the frames in the opposite order
    pub const BOUNCE: Self = Self(0x02);
    /// Play the frames last to first
    pub const REVERSE: Self = Self(0x04);

    const ALL: u8 = 0x07;

    pub const fn from_bits_truncate(bits: u8) -> Self {
        Self(bits & Self::ALL)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// True when every flag of `other` is set
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: Self) {
        self.0 &= !other.0;
    }
}

impl BitOr for PlaybackMode {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for PlaybackMode {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for PlaybackMode {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

/// A callback registration for a frame index
pub struct On {
    /// 1-based frame index
    pub frame: usize,
    pub callback: Callback,
    /// Fire once and forget instead of re-arming every loop
    pub do_once: bool,
}

impl On {
    /// Fire on `frame` every time playback crosses it
    pub fn new(frame: usize, callback: impl FnMut(&mut Animator) + 'static) -> Self {
        Self {
            frame,
            callback: Box::new(callback),
            do_once: false,
        }
    }

    /// Fire on `frame` the next time playback crosses it, then forget
    pub fn once(frame: usize, callback: impl FnMut(&mut Animator) + 'static) -> Self {
        Self {
            frame,
            callback: Box::new(callback),
            do_once: true,
        }
    }
}

impl fmt::Debug for On {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("On")
            .field("frame", &self.frame)
            .field("do_once", &self.do_once)
            .finish_non_exhaustive()
    }
}

/// Next callback due during a pass
enum Due {
    Recurring(usize),
    Once(usize),
}

/// Plays a [`FrameList`] onto a target and fires frame callbacks.
///
/// The animator does not track time itself: each call to [`Animator::update`]
/// is given the total progress into the current cycle and works out which
/// frame that lands on. Callbacks registered while a pass is running are
/// queued and merged once the pass ends.
pub struct Animator {
    /// Recurring callbacks still due in the current cycle
    callbacks: BTreeMap<usize, Callback>,
    onetime_callbacks: BTreeMap<usize, Callback>,
    /// Recurring callbacks that fired this cycle, re-armed on loop
    next_loop_callbacks: BTreeMap<usize, Callback>,
    queued_callbacks: BTreeMap<usize, Callback>,
    queued_onetime_callbacks: BTreeMap<usize, Callback>,
    on_finish: Option<Callback>,
    queued_on_finish: Option<Callback>,
    is_updating: bool,
    callbacks_are_valid: bool,
    current_points: HashMap<String, IVec2>,
    playback_mode: PlaybackMode,
    requested_animation: Option<String>,
}

impl Default for Animator {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Animator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Animator")
            .field("callbacks", &self.callbacks.keys().collect::<Vec<_>>())
            .field(
                "onetime_callbacks",
                &self.onetime_callbacks.keys().collect::<Vec<_>>(),
            )
            .field("has_on_finish", &self.on_finish.is_some())
            .field("is_updating", &self.is_updating)
            .field("playback_mode", &self.playback_mode)
            .field("current_points", &self.current_points)
            .finish_non_exhaustive()
    }
}

impl Animator {
    pub fn new() -> Self {
        Self {
            callbacks: BTreeMap::new(),
            onetime_callbacks: BTreeMap::new(),
            next_loop_callbacks: BTreeMap::new(),
            queued_callbacks: BTreeMap::new(),
            queued_onetime_callbacks: BTreeMap::new(),
            on_finish: None,
            queued_on_finish: None,
            is_updating: false,
            callbacks_are_valid: true,
            current_points: HashMap::new(),
            playback_mode: PlaybackMode::NONE,
            requested_animation: None,
        }
    }

    /// Register a frame callback.
    ///
    /// An existing registration for the same frame index is kept and the
    /// new one is dropped.
    pub fn with_callback(&mut self, on: On) -> &mut Self {
        let registry = match (on.do_once, self.is_updating) {
            (true, true) => &mut self.queued_onetime_callbacks,
            (true, false) => &mut self.onetime_callbacks,
            (false, true) => &mut self.queued_callbacks,
            (false, false) => &mut self.callbacks,
        };
        registry.entry(on.frame).or_insert(on.callback);
        self
    }

    /// Set the callback fired when playback reaches the end of the last frame
    pub fn with_finish(&mut self, on_finish: impl FnMut(&mut Animator) + 'static) -> &mut Self {
        let on_finish: Callback = Box::new(on_finish);
        if self.is_updating {
            self.queued_on_finish = Some(on_finish);
        } else {
            self.on_finish = Some(on_finish);
        }
        self
    }

    pub fn with_mode(&mut self, mode: PlaybackMode) -> &mut Self {
        self.playback_mode = mode;
        self
    }

    /// Ask the owning animation to switch to `state`.
    ///
    /// Pending callbacks are dropped right away, as with [`Animator::clear`];
    /// the switch itself happens once the current update returns.
    pub fn set_animation(&mut self, state: &str) -> &mut Self {
        self.clear();
        self.requested_animation = Some(state.to_uppercase());
        self
    }

    /// Take the animation requested by a callback, if any
    pub fn take_requested_animation(&mut self) -> Option<String> {
        self.requested_animation.take()
    }

    pub fn mode(&self) -> PlaybackMode {
        self.playback_mode
    }

    pub fn is_updating(&self) -> bool {
        self.is_updating
    }

    /// Number of callbacks that may still fire, including queued ones
    pub fn pending_callbacks(&self) -> usize {
        self.callbacks.len()
            + self.onetime_callbacks.len()
            + self.next_loop_callbacks.len()
            + self.queued_callbacks.len()
            + self.queued_onetime_callbacks.len()
    }

    pub fn has_on_finish(&self) -> bool {
        self.on_finish.is_some() || self.queued_on_finish.is_some()
    }

    /// Drop every callback and reset the playback mode.
    ///
    /// When called from inside a callback, the rest of the running pass
    /// fires nothing further.
    pub fn clear(&mut self) {
        self.callbacks_are_valid = false;
        self.callbacks.clear();
        self.onetime_callbacks.clear();
        self.next_loop_callbacks.clear();
        self.queued_callbacks.clear();
        self.queued_onetime_callbacks.clear();
        self.on_finish = None;
        self.queued_on_finish = None;
        self.playback_mode = PlaybackMode::NONE;
    }

    /// Named points of the frame last applied
    pub fn current_points(&self) -> &HashMap<String, IVec2> {
        &self.current_points
    }

    /// Look up a named point on the frame last applied.
    ///
    /// Unknown names are logged and yield the zero point.
    pub fn point(&self, name: &str) -> Vec2 {
        let name = name.to_uppercase();
        match self.current_points.get(&name) {
            Some(point) => point.as_vec2(),
            None => {
                warn!("Could not find point in current sequence named {}", name);
                Vec2::ZERO
            }
        }
    }

    /// Show the 1-based `frame_index` of `sequence` without running callbacks
    pub fn set_frame<T: AnimationTarget + ?Sized>(
        &mut self,
        frame_index: usize,
        target: &mut T,
        sequence: &FrameList,
    ) -> bool {
        match frame_index.checked_sub(1).and_then(|i| sequence.frame(i)) {
            Some(frame) => {
                self.apply_frame(frame, target);
                true
            }
            None => {
                warn!(
                    "Frame {} not applied, sequence has {} frames",
                    frame_index,
                    sequence.frame_count()
                );
                false
            }
        }
    }

    /// Apply the frame that `progress` seconds into `sequence` lands on and
    /// fire every callback crossed on the way.
    ///
    /// Returns how far into its cycle the pass stopped. This is `progress`
    /// itself unless the pass looped back to the start.
    pub fn update<T: AnimationTarget + ?Sized>(
        &mut self,
        progress: f32,
        target: &mut T,
        sequence: &FrameList,
    ) -> f32 {
        let reverse = self.playback_mode.contains(PlaybackMode::REVERSE);

        // Zero progress only resets the visual
        if progress == 0.0 && !sequence.is_empty() {
            let index = if reverse { sequence.frame_count() - 1 } else { 0 };
            if let Some(frame) = sequence.frame(index) {
                self.apply_frame(frame, target);
            }
            return 0.0;
        }

        self.callbacks_are_valid = true;
        self.is_updating = true;

        if sequence.is_empty() || sequence.total_duration() == 0.0 {
            if let Some(mut on_finish) = self.on_finish.take() {
                on_finish(self);
            }
            self.end_update();
            return progress;
        }

        let mut frames: Vec<&Frame> = sequence.frames().iter().collect();
        if reverse {
            frames.reverse();
        }

        let last = frames.len() - 1;
        let total_duration = sequence.total_duration();
        let start_progress = progress;
        let mut progress = progress;
        let mut cycle_start = progress;
        let mut pos = 0;

        loop {
            let frame = frames[pos];
            progress -= frame.duration;
            let reached_last = pos == last;

            // Boundary-exact progress stays on the frame it exits
            if progress > 0.0 && !reached_last {
                pos += 1;
                continue;
            }

            self.fire_due_callbacks(pos + 1);

            if reached_last && start_progress >= total_duration && self.callbacks_are_valid {
                if let Some(mut on_finish) = self.on_finish.take() {
                    on_finish(self);

                    if self.callbacks_are_valid
                        && self.playback_mode.contains(PlaybackMode::LOOP)
                        && self.on_finish.is_none()
                    {
                        self.on_finish = Some(on_finish);
                    }
                }
            }

            // A cycle that consumed no time would never end
            let restart = self.playback_mode.contains(PlaybackMode::LOOP)
                && self.callbacks_are_valid
                && reached_last
                && progress > 0.0
                && progress < cycle_start;

            if restart {
                if self.playback_mode.contains(PlaybackMode::BOUNCE) {
                    frames.reverse();
                    pos = if frames.len() > 1 { 1 } else { 0 };
                } else {
                    pos = 0;
                }

                self.callbacks = std::mem::take(&mut self.next_loop_callbacks);
                self.callbacks_are_valid = true;
                cycle_start = progress;
                continue;
            }

            self.apply_frame(frame, target);
            break;
        }

        self.end_update();
        cycle_start
    }

    /// Begin a new cycle without a restart inside [`Animator::update`].
    ///
    /// Recurring callbacks that fired in the finished cycle are due again.
    pub fn rearm_loop_callbacks(&mut self) {
        for (key, callback) in std::mem::take(&mut self.next_loop_callbacks) {
            self.callbacks.entry(key).or_insert(callback);
        }
    }

    /// Fire callbacks registered at or before `index`, lowest index first.
    fn fire_due_callbacks(&mut self, index: usize) {
        while self.callbacks_are_valid {
            let recurring = self.callbacks.keys().next().copied().filter(|k| *k <= index);
            let onetime = self
                .onetime_callbacks
                .keys()
                .next()
                .copied()
                .filter(|k| *k <= index);

            let due = match (recurring, onetime) {
                (Some(r), Some(o)) if o < r => Due::Once(o),
                (Some(r), _) => Due::Recurring(r),
                (None, Some(o)) => Due::Once(o),
                (None, None) => break,
            };

            match due {
                Due::Recurring(key) => {
                    if let Some(mut callback) = self.callbacks.remove(&key) {
                        callback(self);

                        if self.callbacks_are_valid {
                            self.next_loop_callbacks.entry(key).or_insert(callback);
                        }
                    }
                }
                Due::Once(key) => {
                    if let Some(mut callback) = self.onetime_callbacks.remove(&key) {
                        callback(self);
                    }
                }
            }
        }
    }

    fn end_update(&mut self) {
        self.is_updating = false;
        self.callbacks_are_valid = true;

        for (key, callback) in std::mem::take(&mut self.queued_callbacks) {
            self.callbacks.entry(key).or_insert(callback);
        }

        for (key, callback) in std::mem::take(&mut self.queued_onetime_callbacks) {
            self.onetime_callbacks.entry(key).or_insert(callback);
        }

        if let Some(on_finish) = self.queued_on_finish.take() {
            self.on_finish = Some(on_finish);
        }
    }

    fn apply_frame<T: AnimationTarget + ?Sized>(&mut self, frame: &Frame, target: &mut T) {
        target.set_texture_rect(frame.subregion);
        if frame.apply_origin {
            target.set_origin(frame.origin);
        }
        self.current_points = frame.points.clone();
    }
}

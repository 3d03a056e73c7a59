// Frame data for sprite animations

use crate::core::math::IntRect;
use glam::{IVec2, Vec2};
use log::warn;
use std::collections::HashMap;

/// A single frame of an animation
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Frame {
    /// Region of the texture atlas shown during this frame
    pub subregion: IntRect,
    /// How long the frame is shown, in seconds
    pub duration: f32,
    /// Origin applied to the target when `apply_origin` is set
    pub origin: Vec2,
    pub apply_origin: bool,
    /// Named anchor points, keyed by upper-case label
    pub points: HashMap<String, IVec2>,
}

/// Selects a frame of an existing list and gives it a new duration.
///
/// `frame_index` is 1-based, matching callback addressing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverrideFrame {
    pub frame_index: usize,
    pub duration: f32,
}

impl OverrideFrame {
    pub const fn new(frame_index: usize, duration: f32) -> Self {
        Self {
            frame_index,
            duration,
        }
    }
}

/// An ordered list of frames with a cached total duration
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FrameList {
    frames: Vec<Frame>,
    total_duration: f32,
}

impl FrameList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a frame that leaves the target's origin untouched
    pub fn add(&mut self, duration: f32, subregion: IntRect) {
        self.push(Frame {
            subregion,
            duration,
            ..Frame::default()
        });
    }

    /// Append a frame that also sets the target's origin
    pub fn add_with_origin(&mut self, duration: f32, subregion: IntRect, origin: Vec2) {
        self.push(Frame {
            subregion,
            duration,
            origin,
            apply_origin: true,
            points: HashMap::new(),
        });
    }

    fn push(&mut self, frame: Frame) {
        self.frames.push(frame);
        self.total_duration = self.frames.iter().map(|f| f.duration).sum();
    }

    /// Attach a named point to the most recently added frame.
    ///
    /// Returns false when the list has no frames yet.
    pub fn set_point(&mut self, label: impl Into<String>, x: i32, y: i32) -> bool {
        match self.frames.last_mut() {
            Some(frame) => {
                frame.points.insert(label.into(), IVec2::new(x, y));
                true
            }
            None => false,
        }
    }

    /// Frame at a 0-based position
    pub fn frame(&self, index: usize) -> Option<&Frame> {
        self.frames.get(index)
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn total_duration(&self) -> f32 {
        self.total_duration
    }

    /// Build a new list by picking frames out of this one with new durations.
    ///
    /// Entries pointing outside `[1, frame_count]` are skipped.
    pub fn make_new_from_override_data(&self, overrides: &[OverrideFrame]) -> FrameList {
        let mut list = FrameList::new();

        for entry in overrides {
            let Some(source) = entry
                .frame_index
                .checked_sub(1)
                .and_then(|i| self.frames.get(i))
            else {
                warn!(
                    "Override frame {} is out of range (frame count {})",
                    entry.frame_index,
                    self.frames.len()
                );
                continue;
            };

            list.push(Frame {
                duration: entry.duration,
                ..source.clone()
            });
        }

        list
    }
}

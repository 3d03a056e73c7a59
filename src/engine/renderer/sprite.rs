// Sprite render target for animation playback

use crate::core::math::IntRect;
use glam::{Vec2, Vec4};

/// Anything that can display an animation frame.
///
/// The animation engine never owns its target; the caller hands one in on
/// every update and the engine writes the active frame's texture region
/// and, when the frame carries one, its origin.
pub trait AnimationTarget {
    /// Set the region of the texture atlas to display
    fn set_texture_rect(&mut self, rect: IntRect);

    /// Set the local origin (pivot) in pixels
    fn set_origin(&mut self, origin: Vec2);
}

/// A 2D sprite showing a region of a texture atlas
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    /// Position in world space
    pub position: Vec2,
    /// Rotation in radians
    pub rotation: f32,
    /// Scale (1.0 = original size)
    pub scale: Vec2,
    /// Color tint (RGBA, 1.0 = full color)
    pub color: Vec4,
    /// Displayed region of the texture atlas
    pub texture_rect: IntRect,
    /// Local origin in pixels, relative to the top-left of the region
    pub origin: Vec2,
    /// Z-order for layering (higher = drawn on top)
    pub z_order: f32,
}

impl Default for Sprite {
    fn default() -> Self {
        Self::new(Vec2::ZERO)
    }
}

impl Sprite {
    /// Create a new sprite
    pub fn new(position: Vec2) -> Self {
        Self {
            position,
            rotation: 0.0,
            scale: Vec2::ONE,
            color: Vec4::ONE,
            texture_rect: IntRect::default(),
            origin: Vec2::ZERO,
            z_order: 0.0,
        }
    }

    /// Size of the displayed region after scaling
    pub fn size(&self) -> Vec2 {
        Vec2::new(
            self.texture_rect.width as f32 * self.scale.x,
            self.texture_rect.height as f32 * self.scale.y,
        )
    }

    /// World-space position of the top-left corner, accounting for origin and scale
    pub fn top_left(&self) -> Vec2 {
        self.position - self.origin * self.scale
    }

    /// Convert a point in frame pixels (e.g. an animation point) to world space
    pub fn frame_to_world(&self, point: Vec2) -> Vec2 {
        self.top_left() + point * self.scale
    }
}

impl AnimationTarget for Sprite {
    fn set_texture_rect(&mut self, rect: IntRect) {
        self.texture_rect = rect;
    }

    fn set_origin(&mut self, origin: Vec2) {
        self.origin = origin;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sprite_defaults() {
        let sprite = Sprite::default();
        assert_eq!(sprite.position, Vec2::ZERO);
        assert_eq!(sprite.scale, Vec2::ONE);
        assert_eq!(sprite.texture_rect, IntRect::default());
    }

    #[test]
    fn test_target_contract() {
        let mut sprite = Sprite::new(Vec2::new(100.0, 50.0));
        sprite.set_texture_rect(IntRect::new(0, 0, 32, 48));
        sprite.set_origin(Vec2::new(16.0, 48.0));

        assert_eq!(sprite.size(), Vec2::new(32.0, 48.0));
        assert_eq!(sprite.top_left(), Vec2::new(84.0, 2.0));
    }

    #[test]
    fn test_frame_to_world_with_scale() {
        let mut sprite = Sprite::new(Vec2::new(100.0, 100.0));
        sprite.scale = Vec2::new(2.0, 2.0);
        sprite.set_origin(Vec2::new(10.0, 20.0));

        // top-left is (80, 60); point (5, 5) scaled is (10, 10)
        assert_eq!(sprite.frame_to_world(Vec2::new(5.0, 5.0)), Vec2::new(90.0, 70.0));
    }
}

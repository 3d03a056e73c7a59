// Rendering side of animation playback
//
// Drawing itself is handled by whichever backend owns the window; this
// module only defines what an animation writes into each frame.

mod sprite;

pub use sprite::{AnimationTarget, Sprite};

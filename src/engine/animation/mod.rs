// Sprite animation system
//
// Descriptors are parsed into named frame lists; an `Animation` tracks
// playback time for the active one and hands each update to its
// `Animator`, which picks the frame and fires frame callbacks.

mod animator;
mod component;
pub mod descriptor;
mod frame;
mod player;

pub use animator::{Animator, Callback, On, PlaybackMode};
pub use component::AnimationComponent;
pub use frame::{Frame, FrameList, OverrideFrame};
pub use player::Animation;

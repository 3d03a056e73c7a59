//! Sprite animation and frame callback scheduling for battle entities.
//!
//! Descriptors are parsed into per-state [`FrameList`]s, an [`Animation`]
//! owns the table and elapsed time, and its [`Animator`] maps time to a
//! frame and fires the callbacks registered against frame indices.
//!
//! [`FrameList`]: engine::animation::FrameList
//! [`Animation`]: engine::animation::Animation
//! [`Animator`]: engine::animation::Animator

pub mod config;
pub mod core;
pub mod engine;
pub mod game;

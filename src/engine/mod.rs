// Engine modules: animation, assets, timing, render targets

pub mod animation;
pub mod assets;
pub mod game_loop;
pub mod renderer;

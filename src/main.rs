use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{info, warn};
use netbattle::config::Config;
use netbattle::engine::animation::{AnimationComponent, Animator};
use netbattle::engine::assets::{AssetLoader, AssetType, HotReloadWatcher};
use netbattle::engine::game_loop::GameLoop;
use netbattle::engine::renderer::Sprite;
use std::time::Duration;

/// Sleep between frames so the headless loop does not spin
const FRAME_SLEEP: Duration = Duration::from_millis(4);

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    info!("Starting NetBattle animation player...");

    let config = Config::parse();

    let loader = AssetLoader::new(&config.assets);
    let path = loader.resolve_path(AssetType::Animation, &config.descriptor);

    let mut component = AnimationComponent::new();
    component.setup(&path);
    component
        .load()
        .with_context(|| format!("Failed to load {}", path.display()))?;
    component.set_playback_speed(config.speed);

    let state = match &config.state {
        Some(state) => state.to_uppercase(),
        None => {
            let mut names: Vec<&str> = component.animation().animation_names().collect();
            names.sort_unstable();
            match names.first() {
                Some(name) => name.to_string(),
                None => bail!("{} defines no animations", path.display()),
            }
        }
    };

    if !component.animation().has_animation(&state) {
        bail!("{} has no animation named {}", path.display(), state);
    }

    let mode = config.playback_mode();
    info!("Playing {} ({:?}) at {}x", state, mode, config.speed);

    let finished_state = state.clone();
    component.set_animation_then(&state, mode, move |_: &mut Animator| {
        info!("Animation {} finished", finished_state);
    });

    let mut watcher = HotReloadWatcher::new(config.watch);
    if let Err(e) = watcher.watch_file(&path) {
        warn!("Hot reload disabled for {}: {}", path.display(), e);
        watcher.set_enabled(false);
    }

    let mut game_loop = match config.timestep() {
        Some(timestep) => GameLoop::with_timestep(timestep),
        None => GameLoop::new(),
    };

    let mut sprite = Sprite::default();
    component.refresh(&mut sprite);

    let play_duration = config.play_duration();
    let mut last_rect = None;

    while game_loop.elapsed() < play_duration {
        if component.poll_hot_reload(&mut watcher)? {
            component.refresh(&mut sprite);
        }

        for _ in 0..game_loop.begin_frame() {
            component.update(game_loop.timestep_secs(), &mut sprite);
        }

        if last_rect != Some(sprite.texture_rect) {
            last_rect = Some(sprite.texture_rect);
            info!(
                "{} @ {:.3}s: rect {:?} origin {} points {:?}",
                component.animation_string(),
                component.animation().progress(),
                sprite.texture_rect,
                sprite.origin,
                component.animation().animator().current_points()
            );
        }

        std::thread::sleep(FRAME_SLEEP);
    }

    info!(
        "Stopped after {} frames and {} updates",
        game_loop.frame_count(),
        game_loop.update_count()
    );

    Ok(())
}

// Command line configuration for the descriptor player

use crate::engine::animation::PlaybackMode;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Play an animation descriptor headless and log what it shows
#[derive(Parser, Debug, Clone)]
#[command(version)]
pub struct Config {
    /// Descriptor to play, relative to `<assets>/animations` unless absolute
    #[arg(value_name = "DESCRIPTOR")]
    pub descriptor: String,

    /// Asset base directory
    #[arg(long, value_name = "DIR", default_value = "assets")]
    pub assets: PathBuf,

    /// Animation state to play (defaults to the first name in sorted order)
    #[arg(long)]
    pub state: Option<String>,

    /// Playback speed multiplier
    #[arg(long, default_value_t = 1.0)]
    pub speed: f32,

    /// Restart the animation when it ends
    #[arg(long = "loop")]
    pub looping: bool,

    /// Play back and forth instead of restarting
    #[arg(long)]
    pub bounce: bool,

    /// Play from the last frame to the first
    #[arg(long)]
    pub reverse: bool,

    /// How long to play, in seconds
    #[arg(long, default_value_t = 3.0)]
    pub seconds: f32,

    /// Reload the descriptor when it changes on disk
    #[arg(long)]
    pub watch: bool,

    /// Update rate in ticks per second
    #[arg(long, value_name = "HZ")]
    pub tick_rate: Option<u32>,
}

impl Config {
    /// Playback flags selected on the command line
    pub fn playback_mode(&self) -> PlaybackMode {
        let mut mode = PlaybackMode::NONE;
        if self.looping {
            mode |= PlaybackMode::LOOP;
        }
        if self.bounce {
            mode |= PlaybackMode::BOUNCE;
        }
        if self.reverse {
            mode |= PlaybackMode::REVERSE;
        }
        mode
    }

    /// Tick length for the game loop, if overridden
    pub fn timestep(&self) -> Option<Duration> {
        self.tick_rate
            .filter(|hz| *hz > 0)
            .map(|hz| Duration::from_secs_f64(1.0 / f64::from(hz)))
    }

    pub fn play_duration(&self) -> Duration {
        Duration::from_secs_f32(self.seconds.max(0.0))
    }
}

/// Fixed-timestep driver for animation updates
///
/// Frame time is accumulated and paid out in whole ticks, so animations
/// advance by the same `elapsed` every update regardless of render rate.
use std::time::{Duration, Instant};

/// Default update rate (60 updates per second)
pub const FIXED_TIMESTEP: f32 = 1.0 / 60.0;

/// Maximum number of ticks per frame to prevent spiral of death
const MAX_STEPS_PER_FRAME: u32 = 5;

/// Game loop timing state
pub struct GameLoop {
    /// Length of one tick
    timestep: Duration,

    /// Time not yet paid out as ticks
    accumulator: Duration,

    /// Time of last frame
    last_frame_time: Instant,

    /// Time when game loop started
    start_time: Instant,

    /// Whether the game is paused
    paused: bool,

    /// Current frame number
    frame_count: u64,

    /// Total ticks executed
    update_count: u64,
}

impl GameLoop {
    /// Create a game loop ticking at [`FIXED_TIMESTEP`]
    pub fn new() -> Self {
        Self::with_timestep(Duration::from_secs_f32(FIXED_TIMESTEP))
    }

    /// Create a game loop with a custom tick length
    pub fn with_timestep(timestep: Duration) -> Self {
        let now = Instant::now();
        Self {
            timestep: timestep.max(Duration::from_micros(100)),
            accumulator: Duration::ZERO,
            last_frame_time: now,
            start_time: now,
            paused: false,
            frame_count: 0,
            update_count: 0,
        }
    }

    /// Begin a new frame from the wall clock, returns the number of ticks to run
    pub fn begin_frame(&mut self) -> u32 {
        let now = Instant::now();
        let frame_time = now.duration_since(self.last_frame_time);
        self.last_frame_time = now;
        self.advance(frame_time)
    }

    /// Account for `frame_time` of elapsed time, returns the number of ticks to run
    pub fn advance(&mut self, frame_time: Duration) -> u32 {
        self.frame_count += 1;

        // If paused, don't accumulate time for updates
        if self.paused {
            return 0;
        }

        self.accumulator += frame_time;

        let mut ticks = 0;
        while self.accumulator >= self.timestep && ticks < MAX_STEPS_PER_FRAME {
            self.accumulator -= self.timestep;
            ticks += 1;
        }

        // Drop time we could not catch up on
        if ticks == MAX_STEPS_PER_FRAME && self.accumulator >= self.timestep {
            log::debug!("Dropping {:?} of backlog", self.accumulator);
            self.accumulator = Duration::ZERO;
        }

        self.update_count += ticks as u64;
        ticks
    }

    /// Tick length in seconds, the `elapsed` passed to animation updates
    pub fn timestep_secs(&self) -> f32 {
        self.timestep.as_secs_f32()
    }

    /// Fraction of a tick waiting in the accumulator
    pub fn alpha(&self) -> f32 {
        self.accumulator.as_secs_f32() / self.timestep.as_secs_f32()
    }

    /// Get total elapsed time since start
    pub fn elapsed(&self) -> Duration {
        Instant::now().duration_since(self.start_time)
    }

    /// Get total number of frames
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Get total number of ticks executed
    pub fn update_count(&self) -> u64 {
        self.update_count
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn pause(&mut self) {
        if !self.paused {
            self.paused = true;
            log::info!("Playback paused");
        }
    }

    pub fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            // Reset accumulator to prevent update burst
            self.accumulator = Duration::ZERO;
            log::info!("Playback resumed");
        }
    }

    pub fn toggle_pause(&mut self) {
        if self.paused {
            self.resume();
        } else {
            self.pause();
        }
    }
}

impl Default for GameLoop {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_game_loop_creation() {
        let game_loop = GameLoop::new();
        assert_eq!(game_loop.frame_count(), 0);
        assert_eq!(game_loop.update_count(), 0);
        assert!(!game_loop.is_paused());
        assert_relative_eq!(game_loop.timestep_secs(), FIXED_TIMESTEP, epsilon = 1e-6);
    }

    #[test]
    fn test_ticks_from_frame_time() {
        let mut game_loop = GameLoop::with_timestep(ms(10));

        assert_eq!(game_loop.advance(ms(25)), 2);
        assert_relative_eq!(game_loop.alpha(), 0.5, epsilon = 1e-4);

        // Leftover time carries into the next frame
        assert_eq!(game_loop.advance(ms(5)), 1);
        assert_eq!(game_loop.update_count(), 3);
        assert_eq!(game_loop.frame_count(), 2);
    }

    #[test]
    fn test_steps_capped() {
        let mut game_loop = GameLoop::with_timestep(ms(10));

        assert_eq!(game_loop.advance(ms(300)), MAX_STEPS_PER_FRAME);
        assert_eq!(game_loop.alpha(), 0.0, "backlog is dropped");
    }

    #[test]
    fn test_paused_no_updates() {
        let mut game_loop = GameLoop::with_timestep(ms(10));
        game_loop.pause();
        assert_eq!(game_loop.advance(ms(50)), 0);

        game_loop.resume();
        assert_eq!(game_loop.advance(ms(10)), 1);
    }

    #[test]
    fn test_toggle_pause() {
        let mut game_loop = GameLoop::new();
        game_loop.toggle_pause();
        assert!(game_loop.is_paused());

        game_loop.toggle_pause();
        assert!(!game_loop.is_paused());
    }

    #[test]
    fn test_begin_frame_counts() {
        let mut game_loop = GameLoop::new();
        game_loop.begin_frame();
        game_loop.begin_frame();
        assert_eq!(game_loop.frame_count(), 2);
        assert!(game_loop.update_count() <= 2 * MAX_STEPS_PER_FRAME as u64);
    }
}

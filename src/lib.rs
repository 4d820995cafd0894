//! Aerobot - a descending arcade dodger
//!
//! Core modules:
//! - `sim`: Simulation (player, spawning, collisions, scoring, particles)
//! - `lifecycle`: Start / playing / game-over orchestration and high score relay
//! - `renderer`: Vertex frame building and WebGPU upload
//! - `platform`: Frame clock and loop cancellation
//! - `persistence`: Best-effort high score storage (local first, remote sync)
//! - `config`: Data-driven game balance

pub mod config;
pub mod highscores;
pub mod lifecycle;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod sim;

pub use config::GameConfig;
pub use highscores::HighScoreTracker;
pub use lifecycle::{Game, Hud};

/// Baseline tuning. Lengths ending in `_FRAC` are fractions of the viewport,
/// so the game plays the same on a phone and a desktop monitor.
pub mod consts {
    /// Maximum simulation step (seconds); longer stalls are clamped
    pub const MAX_DT: f32 = 0.05;

    /// Score gained per second of descent
    pub const SCORE_RATE: f64 = 10.0;
    /// Bonus for a puzzle piece
    pub const COIN_BONUS: u64 = 100;
    /// Bonus for an hourglass
    pub const POWERUP_BONUS: u64 = 300;

    /// Initial scroll speed as a fraction of viewport height (px/s)
    pub const SCROLL_SPEED_FRAC: f32 = 0.4;
    /// Scroll speed increase per second (px/s²)
    pub const SCROLL_ACCELERATION: f32 = 5.0;

    /// Player radius as a fraction of viewport width
    pub const PLAYER_RADIUS_FRAC: f32 = 0.03;
    /// Horizontal speed as a fraction of viewport width (px/s)
    pub const PLAYER_SPEED_FRAC: f32 = 0.6;
    /// Fixed player height as a fraction of viewport height
    pub const PLAYER_Y_FRAC: f32 = 0.3;
    /// Visual tilt at full lean (degrees)
    pub const PLAYER_TILT_DEG: f32 = 15.0;
    /// Tilt easing rate (1/s)
    pub const PLAYER_TILT_RESPONSE: f32 = 10.0;

    /// Each wall is 5% of the viewport width
    pub const WALL_WIDTH_FRAC: f32 = 0.05;
    /// Wall texture repeats every 100 px of scroll
    pub const WALL_TEXTURE_PERIOD: f32 = 100.0;

    /// Base obstacle interval (ms), shortened as the game speeds up
    pub const OBSTACLE_SPAWN_MS: f32 = 1500.0;
    /// Obstacles never come faster than this (ms)
    pub const OBSTACLE_SPAWN_MIN_MS: f32 = 500.0;
    /// Milliseconds shaved off the obstacle interval per px/s of scroll speed
    pub const OBSTACLE_SPAWN_SPEED_FACTOR: f32 = 0.5;
    /// Collectible interval (ms)
    pub const ITEM_SPAWN_MS: f32 = 2000.0;

    /// Obstacle edge length as a fraction of viewport width
    pub const OBSTACLE_SIZE_FRAC: f32 = 0.08;
    /// Collectible edge length as a fraction of viewport width
    pub const ITEM_SIZE_FRAC: f32 = 0.05;
    /// Entities appear this far below the bottom edge (px)
    pub const SPAWN_MARGIN: f32 = 50.0;
    /// Entities are culled this far above the top edge (px)
    pub const CULL_MARGIN: f32 = 50.0;
    /// Entity spin (rad/s)
    pub const ENTITY_SPIN: f32 = 2.0;

    /// Particle burst sizes
    pub const WALL_BURST: usize = 20;
    pub const OBSTACLE_BURST: usize = 15;
    pub const PICKUP_BURST: usize = 10;
    /// Max initial particle speed along each axis (px/s, symmetric)
    pub const PARTICLE_SPREAD: f32 = 200.0;
}

/// Linear scale factor between two lengths, guarding against a zero origin.
#[inline]
pub fn rescale(old: f32, new: f32) -> f32 {
    if old > 0.0 { new / old } else { 1.0 }
}

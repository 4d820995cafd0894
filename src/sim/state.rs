//! World state and core simulation types
//!
//! Everything the tick mutates lives in [`World`]. Coordinates are viewport
//! pixels with y growing downward; the player holds a fixed height and the
//! world scrolls up past it.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::rescale;

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, nothing simulated
    #[default]
    Start,
    /// Active descent
    Playing,
    /// Run ended (wall or obstacle)
    GameOver,
}

/// Lifecycle requests from the outside world
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Restart,
}

impl GamePhase {
    /// Phase reached by applying `command`, or `None` if the transition is
    /// not allowed from here.
    pub fn next(self, command: Command) -> Option<GamePhase> {
        match (self, command) {
            (GamePhase::Start, Command::Start) => Some(GamePhase::Playing),
            (GamePhase::GameOver, Command::Restart) => Some(GamePhase::Playing),
            _ => None,
        }
    }
}

/// What ended a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    Wall,
    Obstacle,
}

/// Notable things that happened during a tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// A collectible was picked up
    Collected { kind: EntityKind, bonus: u64 },
    /// Terminal event; `score` is the floored final score
    GameOver { cause: DeathCause, score: u64 },
}

/// The descending robot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub radius: f32,
    /// +1 right, -1 left
    pub direction: f32,
    /// Horizontal speed (px/s)
    pub speed_x: f32,
    /// Visual lean (radians)
    pub tilt: f32,
}

impl Player {
    /// Fresh player centered in an area of the given size
    pub fn new(config: &GameConfig, width: f32, height: f32) -> Self {
        Self {
            pos: Vec2::new(width / 2.0, height * config.player_y_frac),
            radius: width * config.player_radius_frac,
            direction: -1.0,
            speed_x: width * config.player_speed_frac,
            tilt: 0.0,
        }
    }

    pub fn flip(&mut self) {
        self.direction = -self.direction;
    }

    /// Move horizontally and ease the tilt toward the current heading
    pub fn advance(&mut self, config: &GameConfig, dt: f32) {
        self.pos.x += self.speed_x * self.direction * dt;
        let target = config.target_tilt(self.direction);
        self.tilt += (target - self.tilt) * config.tilt_response * dt;
    }
}

/// Entity categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// Hieroglyph block, ends the run on contact
    Obstacle,
    /// Puzzle piece, small bonus
    Coin,
    /// Hourglass, large bonus
    Powerup,
}

impl EntityKind {
    pub fn is_collectible(self) -> bool {
        !matches!(self, EntityKind::Obstacle)
    }
}

/// A spawned obstacle or collectible (square footprint)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: u32,
    pub kind: EntityKind,
    /// Center position
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    pub rotation: f32,
    pub marked_for_deletion: bool,
}

impl Entity {
    /// Radius used for contact tests
    #[inline]
    pub fn contact_radius(&self) -> f32 {
        self.width / 2.0
    }
}

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Remaining life (seconds); doubles as opacity
    pub life: f32,
    pub max_life: f32,
    pub color: [f32; 4],
    pub size: f32,
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct World {
    pub config: GameConfig,
    /// Play area in pixels
    pub width: f32,
    pub height: f32,
    pub phase: GamePhase,
    /// Fractional score; read through [`World::score`]
    pub score: f64,
    /// Seconds spent in the current run
    pub elapsed: f32,
    /// Current upward scroll speed (px/s)
    pub scroll_speed: f32,
    pub player: Player,
    pub entities: Vec<Entity>,
    /// Visual particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    /// Milliseconds since the last obstacle
    pub obstacle_timer: f32,
    /// Milliseconds since the last collectible
    pub item_timer: f32,
    /// Wall texture scroll, wraps at `config.wall_texture_period`
    pub wall_offset: f32,
    pub rng: Pcg32,
    next_id: u32,
    /// Last non-degenerate area, kept while the viewport is collapsed
    last_valid: Option<(f32, f32)>,
}

fn is_valid_size(width: f32, height: f32) -> bool {
    width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0
}

impl World {
    /// Create a world on the title screen
    pub fn new(config: GameConfig, width: f32, height: f32, seed: u64) -> Self {
        let player = Player::new(&config, width, height);
        let scroll_speed = height * config.scroll_speed_frac;
        Self {
            config,
            width,
            height,
            phase: GamePhase::Start,
            score: 0.0,
            elapsed: 0.0,
            scroll_speed,
            player,
            entities: Vec::new(),
            particles: Vec::new(),
            obstacle_timer: 0.0,
            item_timer: 0.0,
            wall_offset: 0.0,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
            last_valid: is_valid_size(width, height).then_some((width, height)),
        }
    }

    /// Floored score as shown to the player
    #[inline]
    pub fn score(&self) -> u64 {
        self.score.max(0.0).floor() as u64
    }

    /// Width of one side wall in pixels
    #[inline]
    pub fn wall_width(&self) -> f32 {
        self.config.wall_width(self.width)
    }

    /// Whether the play area can be simulated
    pub fn has_valid_area(&self) -> bool {
        is_valid_size(self.width, self.height)
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    /// Apply a lifecycle command. Returns `true` if the phase changed.
    ///
    /// Entering `Playing` rebuilds the whole run at the current area size.
    pub fn apply(&mut self, command: Command) -> bool {
        match self.phase.next(command) {
            Some(next) => {
                self.reset();
                self.phase = next;
                true
            }
            None => false,
        }
    }

    /// Reinitialize the run (player, entities, particles, timers, score)
    fn reset(&mut self) {
        self.player = Player::new(&self.config, self.width, self.height);
        self.entities.clear();
        self.particles.clear();
        self.scroll_speed = self.height * self.config.scroll_speed_frac;
        self.obstacle_timer = 0.0;
        self.item_timer = 0.0;
        self.wall_offset = 0.0;
        self.score = 0.0;
        self.elapsed = 0.0;
        self.next_id = 1;
    }

    /// Adapt to a new viewport size.
    ///
    /// Positions and speeds scale with the area; size-relative constants are
    /// recomputed. Phase and score are untouched. A degenerate size pauses
    /// the simulation; the next valid size rescales from the last valid one.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
        if !is_valid_size(width, height) {
            return;
        }
        let Some((old_width, old_height)) = self.last_valid.replace((width, height)) else {
            // Never had a usable area: nothing to scale from
            self.player = Player {
                direction: self.player.direction,
                tilt: self.player.tilt,
                ..Player::new(&self.config, width, height)
            };
            if self.scroll_speed <= 0.0 {
                self.scroll_speed = height * self.config.scroll_speed_frac;
            }
            return;
        };

        let sx = rescale(old_width, width);
        let sy = rescale(old_height, height);

        self.player.pos = Vec2::new(self.player.pos.x * sx, height * self.config.player_y_frac);
        self.player.radius = width * self.config.player_radius_frac;
        self.player.speed_x = width * self.config.player_speed_frac;
        self.scroll_speed *= sy;

        for entity in &mut self.entities {
            entity.pos.x *= sx;
            entity.pos.y *= sy;
            entity.width *= sx;
            entity.height *= sx;
        }
        for particle in &mut self.particles {
            particle.pos *= Vec2::new(sx, sy);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world() -> World {
        World::new(GameConfig::default(), 400.0, 800.0, 7)
    }

    #[test]
    fn test_phase_transitions() {
        assert_eq!(GamePhase::Start.next(Command::Start), Some(GamePhase::Playing));
        assert_eq!(GamePhase::GameOver.next(Command::Restart), Some(GamePhase::Playing));
        assert_eq!(GamePhase::Start.next(Command::Restart), None);
        assert_eq!(GamePhase::Playing.next(Command::Start), None);
        assert_eq!(GamePhase::Playing.next(Command::Restart), None);
        assert_eq!(GamePhase::GameOver.next(Command::Start), None);
    }

    #[test]
    fn test_player_sized_to_area() {
        let w = world();
        assert_eq!(w.player.pos, Vec2::new(200.0, 240.0));
        assert!((w.player.radius - 12.0).abs() < 1e-4);
        assert!((w.player.speed_x - 240.0).abs() < 1e-4);
        assert_eq!(w.player.direction, -1.0);
        assert!((w.scroll_speed - 320.0).abs() < 1e-4);
    }

    #[test]
    fn test_apply_rejects_invalid_commands() {
        let mut w = world();
        assert!(!w.apply(Command::Restart));
        assert_eq!(w.phase, GamePhase::Start);
        assert!(w.apply(Command::Start));
        assert_eq!(w.phase, GamePhase::Playing);
        w.score = 42.0;
        assert!(!w.apply(Command::Start));
        assert_eq!(w.score, 42.0);
    }

    #[test]
    fn test_tilt_eases_toward_heading() {
        let config = GameConfig::default();
        let mut player = Player::new(&config, 400.0, 800.0);
        player.speed_x = 0.0;
        for _ in 0..120 {
            player.advance(&config, 1.0 / 60.0);
        }
        let target = -15f32.to_radians();
        assert!((player.tilt - target).abs() < 0.01);
        // Never overshoots
        assert!(player.tilt >= target);
    }

    #[test]
    fn test_resize_scales_world() {
        let mut w = world();
        w.apply(Command::Start);
        w.entities.push(Entity {
            id: 1,
            kind: EntityKind::Coin,
            pos: Vec2::new(100.0, 400.0),
            width: 20.0,
            height: 20.0,
            rotation: 0.0,
            marked_for_deletion: false,
        });
        w.resize(800.0, 400.0);
        assert_eq!(w.entities[0].pos, Vec2::new(200.0, 200.0));
        assert_eq!(w.entities[0].width, 40.0);
        assert_eq!(w.player.pos, Vec2::new(400.0, 120.0));
        assert!((w.player.radius - 24.0).abs() < 1e-4);
        assert!((w.scroll_speed - 160.0).abs() < 1e-3);
        assert_eq!(w.phase, GamePhase::Playing);
    }

    #[test]
    fn test_resize_from_degenerate_area() {
        let mut w = World::new(GameConfig::default(), 0.0, 0.0, 1);
        assert!(!w.has_valid_area());
        w.resize(400.0, 800.0);
        assert!(w.has_valid_area());
        assert_eq!(w.player.pos, Vec2::new(200.0, 240.0));
        assert!((w.scroll_speed - 320.0).abs() < 1e-4);
    }

    #[test]
    fn test_collapsed_area_keeps_run_state() {
        let mut w = world();
        w.apply(Command::Start);
        w.player.pos.x = 120.0;
        w.player.direction = 1.0;
        w.entities.push(Entity {
            id: 1,
            kind: EntityKind::Obstacle,
            pos: Vec2::new(100.0, 400.0),
            width: 20.0,
            height: 20.0,
            rotation: 0.5,
            marked_for_deletion: false,
        });
        let scroll_speed = w.scroll_speed;

        w.resize(0.0, 0.0);
        assert!(!w.has_valid_area());
        w.resize(400.0, 800.0);

        assert!(w.has_valid_area());
        assert_eq!(w.player.pos, Vec2::new(120.0, 240.0));
        assert_eq!(w.player.direction, 1.0);
        assert_eq!(w.entities[0].pos, Vec2::new(100.0, 400.0));
        assert_eq!(w.entities[0].width, 20.0);
        assert_eq!(w.scroll_speed, scroll_speed);

        // Recovering at another size scales from the last valid area
        w.resize(0.0, 800.0);
        w.resize(800.0, 400.0);
        assert_eq!(w.player.pos, Vec2::new(240.0, 120.0));
        assert_eq!(w.entities[0].pos, Vec2::new(200.0, 200.0));
    }
}

//! Simulation module
//!
//! All gameplay logic lives here. This module is pure:
//! - Variable timestep, clamped to `max_dt`
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod particles;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{WallSide, player_touches, wall_contact};
pub use state::{
    Command, DeathCause, Entity, EntityKind, GameEvent, GamePhase, Particle, Player, World,
};
pub use tick::{TickInput, clamp_dt, tick};

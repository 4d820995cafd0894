//! Per-frame simulation tick
//!
//! Advances the world by one clamped, variable time step.

use super::collision::{player_touches, wall_contact};
use super::particles;
use super::spawn;
use super::state::{DeathCause, EntityKind, GameEvent, GamePhase, World};
use crate::config::palette;

/// Input gathered since the previous tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Reverse horizontal direction (tap/click/space)
    pub flip: bool,
}

/// Clamp a raw frame delta to `[0, max_dt]`; non-finite deltas become 0
#[inline]
pub fn clamp_dt(dt: f32, max_dt: f32) -> f32 {
    if dt.is_finite() { dt.clamp(0.0, max_dt) } else { 0.0 }
}

/// Advance the world by `dt` seconds and report what happened.
///
/// Outside `Playing` only the particles move, so a terminal burst can play
/// out on the game-over screen. A degenerate play area skips the tick.
pub fn tick(world: &mut World, input: &TickInput, dt: f32) -> Vec<GameEvent> {
    let mut events = Vec::new();

    if !world.has_valid_area() {
        return events;
    }
    let dt = clamp_dt(dt, world.config.max_dt);

    match world.phase {
        GamePhase::Playing => {}
        GamePhase::GameOver => {
            particles::advance(&mut world.particles, dt);
            return events;
        }
        GamePhase::Start => return events,
    }

    if input.flip {
        world.player.flip();
    }

    // 1. Depth score
    world.score += f64::from(dt) * world.config.score_rate;
    world.elapsed += dt;

    // 2. Difficulty ramp
    world.scroll_speed += world.config.scroll_acceleration * dt;

    // 3. Player
    world.player.advance(&world.config, dt);

    // 4. Walls
    if wall_contact(&world.player, world.width, world.wall_width()).is_some() {
        game_over(world, DeathCause::Wall, &mut events);
        return events;
    }

    // 5. Spawning
    spawn::advance_timers(world, dt);

    // 6. Entities: scroll, spin, cull, collide. Every entity advances, even
    // on the tick that ends the run; collisions stop at the first obstacle.
    let rise = world.scroll_speed * dt;
    let spin = world.config.entity_spin * dt;
    let cull_y = -world.config.cull_margin;

    // Bursts are deferred until the entity borrow ends
    let mut pickups = Vec::new();
    let mut hit_obstacle = false;

    for entity in &mut world.entities {
        entity.pos.y -= rise;
        entity.rotation += spin;

        if entity.pos.y < cull_y {
            entity.marked_for_deletion = true;
            continue;
        }
        if hit_obstacle
            || entity.marked_for_deletion
            || !player_touches(&world.player, entity)
        {
            continue;
        }

        let bonus = match entity.kind {
            EntityKind::Obstacle => {
                hit_obstacle = true;
                continue;
            }
            EntityKind::Coin => world.config.coin_bonus,
            EntityKind::Powerup => world.config.powerup_bonus,
        };
        world.score += bonus as f64;
        entity.marked_for_deletion = true;
        pickups.push((entity.kind, entity.pos));
        events.push(GameEvent::Collected {
            kind: entity.kind,
            bonus,
        });
    }

    world.entities.retain(|e| !e.marked_for_deletion);

    for (kind, pos) in pickups {
        let color = match kind {
            EntityKind::Powerup => palette::POWERUP,
            _ => palette::COIN,
        };
        let count = world.config.pickup_burst;
        let spread = world.config.particle_spread;
        particles::burst(&mut world.particles, &mut world.rng, pos, color, count, spread);
    }

    if hit_obstacle {
        game_over(world, DeathCause::Obstacle, &mut events);
        return events;
    }

    // 7. Particles
    particles::advance(&mut world.particles, dt);

    // 8. Wall texture scroll
    world.wall_offset = (world.wall_offset + rise) % world.config.wall_texture_period;

    events
}

/// End the run: freeze the phase, burst at the player, report the final score
fn game_over(world: &mut World, cause: DeathCause, events: &mut Vec<GameEvent>) {
    world.phase = GamePhase::GameOver;

    let (color, count) = match cause {
        DeathCause::Wall => (palette::PLAYER_ACCENT, world.config.wall_burst),
        DeathCause::Obstacle => (palette::PLAYER, world.config.obstacle_burst),
    };
    let origin = world.player.pos;
    let spread = world.config.particle_spread;
    particles::burst(&mut world.particles, &mut world.rng, origin, color, count, spread);

    let score = world.score();
    log::info!("Game over ({:?}) at {}m after {:.1}s", cause, score, world.elapsed);
    events.push(GameEvent::GameOver { cause, score });
}

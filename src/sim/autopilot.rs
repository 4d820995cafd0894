//! Demo-mode pilot
//!
//! Decides, once per tick, whether tapping would help. Drives the headless
//! native run and the web idle mode.

use glam::Vec2;

use super::state::{EntityKind, GamePhase, World};

/// How far ahead (seconds) to project the player toward the walls
const WALL_LOOKAHEAD: f32 = 0.25;
/// How far ahead (seconds) to sweep for obstacles
const OBSTACLE_HORIZON: f32 = 0.5;
const OBSTACLE_SAMPLES: u32 = 10;

/// Whether to flip direction this tick
pub fn should_flip(world: &World) -> bool {
    if world.phase != GamePhase::Playing || !world.has_valid_area() {
        return false;
    }

    let dir = world.player.direction;
    let wall_ahead = heads_into_wall(world, dir);
    if wall_ahead {
        return !heads_into_wall(world, -dir);
    }

    course_hits_obstacle(world, dir) && !course_hits_obstacle(world, -dir)
}

/// Projected position leaves the safe band within the look-ahead
fn heads_into_wall(world: &World, direction: f32) -> bool {
    let p = &world.player;
    let margin = p.radius * 0.5;
    let lo = world.wall_width() + p.radius + margin;
    let hi = world.width - world.wall_width() - p.radius - margin;
    let projected = p.pos.x + p.speed_x * direction * WALL_LOOKAHEAD;
    projected < lo || projected > hi
}

/// Sweep the player's course against every obstacle's rise
fn course_hits_obstacle(world: &World, direction: f32) -> bool {
    let p = &world.player;
    let clearance = p.radius * 0.25;

    world
        .entities
        .iter()
        .filter(|e| e.kind == EntityKind::Obstacle && !e.marked_for_deletion)
        .any(|e| {
            let reach = p.radius + e.contact_radius() + clearance;
            (0..=OBSTACLE_SAMPLES).any(|i| {
                let t = OBSTACLE_HORIZON * i as f32 / OBSTACLE_SAMPLES as f32;
                let player = Vec2::new(p.pos.x + p.speed_x * direction * t, p.pos.y);
                let obstacle = Vec2::new(e.pos.x, e.pos.y - world.scroll_speed * t);
                player.distance_squared(obstacle) < reach * reach
            })
        })
}

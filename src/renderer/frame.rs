//! Frame building: world snapshot to a triangle list in pixel space

use glam::Vec2;

use super::shapes::{circle, ellipse, rect, rect_outline, ring, transformed, triangle};
use super::vertex::Vertex;
use crate::config::palette;
use crate::sim::{Entity, EntityKind, GamePhase, Player, World};

/// Vertical distance between wall spikes (px)
const SPIKE_SPACING: f32 = 40.0;
/// How far a spike tip reaches past the wall edge (px)
const SPIKE_REACH: f32 = 5.0;
const CIRCLE_SEGMENTS: u32 = 20;
const PARTICLE_SEGMENTS: u32 = 8;

/// Build one frame without touching the world.
///
/// Draw order: background, walls, entities, player (only while playing),
/// particles on top.
pub fn build_frame(world: &World) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(4096);
    if !world.has_valid_area() {
        return vertices;
    }

    vertices.extend(rect(
        Vec2::new(world.width / 2.0, world.height / 2.0),
        Vec2::new(world.width / 2.0, world.height / 2.0),
        0.0,
        palette::BG_SAND,
    ));
    walls(world, &mut vertices);

    for entity in &world.entities {
        vertices.extend(entity_shape(entity));
    }

    if world.phase == GamePhase::Playing {
        vertices.extend(robot(&world.player));
    }

    for p in &world.particles {
        let alpha = p.life.clamp(0.0, 1.0) * p.color[3];
        let color = palette::with_alpha(p.color, alpha);
        vertices.extend(circle(p.pos, p.size, color, PARTICLE_SEGMENTS));
    }

    vertices
}

/// Side walls with spikes that scroll up with the world
fn walls(world: &World, out: &mut Vec<Vertex>) {
    let (w, h) = (world.width, world.height);
    let ww = world.wall_width();
    let half = Vec2::new(ww / 2.0, h / 2.0);

    out.extend(rect(Vec2::new(ww / 2.0, h / 2.0), half, 0.0, palette::WALL));
    out.extend(rect(Vec2::new(w - ww / 2.0, h / 2.0), half, 0.0, palette::WALL));

    let phase = world.wall_offset.rem_euclid(SPIKE_SPACING);
    let mut y = -phase;
    while y < h {
        let mid = y + SPIKE_SPACING / 2.0;
        let bottom = y + SPIKE_SPACING;
        out.extend(triangle(
            Vec2::new(0.0, y),
            Vec2::new(ww + SPIKE_REACH, mid),
            Vec2::new(0.0, bottom),
            palette::WALL_PATTERN,
        ));
        out.extend(triangle(
            Vec2::new(w, y),
            Vec2::new(w - ww - SPIKE_REACH, mid),
            Vec2::new(w, bottom),
            palette::WALL_PATTERN,
        ));
        y += SPIKE_SPACING;
    }
}

fn entity_shape(entity: &Entity) -> Vec<Vertex> {
    let half = Vec2::new(entity.width / 2.0, entity.height / 2.0);
    match entity.kind {
        EntityKind::Obstacle => {
            // Block with an inset glyph frame
            let mut v = rect(entity.pos, half, entity.rotation, palette::OBSTACLE);
            v.extend(rect_outline(
                entity.pos,
                half * 0.6,
                2.0,
                entity.rotation,
                palette::OBSTACLE_HIGHLIGHT,
            ));
            v
        }
        EntityKind::Coin => {
            let mut v = circle(entity.pos, half.x, palette::COIN, CIRCLE_SEGMENTS);
            v.extend(ring(
                entity.pos,
                half.x * 0.4,
                half.x * 0.55,
                palette::WHITE,
                CIRCLE_SEGMENTS,
            ));
            v
        }
        EntityKind::Powerup => {
            // Hourglass: two triangles meeting at the center
            let mut v = triangle(
                Vec2::new(-half.x, -half.y),
                Vec2::new(half.x, -half.y),
                Vec2::ZERO,
                palette::POWERUP,
            );
            v.extend(triangle(
                Vec2::new(half.x, half.y),
                Vec2::new(-half.x, half.y),
                Vec2::ZERO,
                palette::POWERUP,
            ));
            transformed(v, entity.pos, entity.rotation)
        }
    }
}

/// The robot, built around the origin then leaned by its tilt
fn robot(player: &Player) -> Vec<Vertex> {
    let r = player.radius;
    let mut v = ellipse(
        Vec2::new(0.0, r + 5.0),
        Vec2::new(r * 0.8, r * 0.3),
        palette::SHADOW,
        CIRCLE_SEGMENTS,
    );
    v.extend(rect(Vec2::ZERO, Vec2::splat(r), 0.0, palette::PLAYER));
    v.extend(rect(Vec2::ZERO, Vec2::new(r * 0.7, r * 0.3), 0.0, palette::VISOR));
    for eye_x in [-0.3 * r, 0.3 * r] {
        v.extend(circle(
            Vec2::new(eye_x, 0.0),
            r * 0.15,
            palette::PLAYER_ACCENT,
            CIRCLE_SEGMENTS / 2,
        ));
    }
    v.extend(rect(
        Vec2::new(0.0, -r - 4.0),
        Vec2::new(1.0, 4.0),
        0.0,
        palette::ANTENNA,
    ));
    v.extend(circle(
        Vec2::new(0.0, -r - 8.0),
        3.0,
        palette::ANTENNA_TIP,
        CIRCLE_SEGMENTS / 2,
    ));
    transformed(v, player.pos, player.tilt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::sim::{Command, Particle};

    fn world() -> World {
        World::new(GameConfig::default(), 400.0, 800.0, 3)
    }

    fn has_color(vertices: &[Vertex], color: [f32; 4]) -> bool {
        vertices.iter().any(|v| v.color == color)
    }

    #[test]
    fn test_triangle_list() {
        let mut world = world();
        world.apply(Command::Start);
        let verts = build_frame(&world);
        assert!(!verts.is_empty());
        assert_eq!(verts.len() % 3, 0);
    }

    #[test]
    fn test_player_only_while_playing() {
        let mut world = world();
        assert!(!has_color(&build_frame(&world), palette::VISOR));

        world.apply(Command::Start);
        assert!(has_color(&build_frame(&world), palette::VISOR));

        world.phase = GamePhase::GameOver;
        assert!(!has_color(&build_frame(&world), palette::VISOR));
    }

    #[test]
    fn test_does_not_mutate_world() {
        let mut world = world();
        world.apply(Command::Start);
        world.wall_offset = 17.0;
        let before = (world.player.pos, world.wall_offset, world.entities.len());
        build_frame(&world);
        assert_eq!(before, (world.player.pos, world.wall_offset, world.entities.len()));
    }

    #[test]
    fn test_spikes_stay_near_walls() {
        let mut world = world();
        world.wall_offset = 23.0;
        let ww = world.wall_width();
        let spikes: Vec<_> = build_frame(&world)
            .into_iter()
            .filter(|v| v.color == palette::WALL_PATTERN)
            .collect();
        assert!(!spikes.is_empty());
        for v in spikes {
            let x = v.position[0];
            assert!(x <= ww + SPIKE_REACH + 1e-3 || x >= world.width - ww - SPIKE_REACH - 1e-3);
        }
    }

    #[test]
    fn test_particle_alpha_is_life() {
        let mut world = world();
        world.particles.push(Particle {
            pos: Vec2::new(100.0, 100.0),
            vel: Vec2::ZERO,
            life: 0.25,
            max_life: 1.0,
            color: palette::COIN,
            size: 3.0,
        });
        let verts = build_frame(&world);
        let particle = palette::with_alpha(palette::COIN, 0.25);
        assert!(has_color(&verts, particle));
    }

    #[test]
    fn test_degenerate_area_draws_nothing() {
        let mut world = world();
        world.resize(0.0, 800.0);
        assert!(build_frame(&world).is_empty());
    }
}

//! Collision tests
//!
//! Entities are square but collide as circles of radius `width / 2`. The
//! approximation is part of the game's feel: corners of a spinning block
//! never clip the robot.

use super::state::{Entity, Player};

/// Which wall was hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WallSide {
    Left,
    Right,
}

/// Check the player against both inner wall faces.
///
/// `wall_width` is the width of one wall; the play area spans
/// `[wall_width, area_width - wall_width]`.
pub fn wall_contact(player: &Player, area_width: f32, wall_width: f32) -> Option<WallSide> {
    if player.pos.x < wall_width + player.radius {
        Some(WallSide::Left)
    } else if player.pos.x > area_width - wall_width - player.radius {
        Some(WallSide::Right)
    } else {
        None
    }
}

/// Circle-vs-circle proximity between the player and an entity.
///
/// Touching exactly at the threshold does not count.
pub fn player_touches(player: &Player, entity: &Entity) -> bool {
    let min_dist = player.radius + entity.contact_radius();
    player.pos.distance_squared(entity.pos) < min_dist * min_dist
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::EntityKind;
    use glam::Vec2;

    fn player_at(x: f32, y: f32) -> Player {
        Player {
            pos: Vec2::new(x, y),
            radius: 10.0,
            direction: 1.0,
            speed_x: 0.0,
            tilt: 0.0,
        }
    }

    fn block_at(x: f32, y: f32, size: f32) -> Entity {
        Entity {
            id: 1,
            kind: EntityKind::Obstacle,
            pos: Vec2::new(x, y),
            width: size,
            height: size,
            rotation: 0.0,
            marked_for_deletion: false,
        }
    }

    #[test]
    fn test_wall_contact() {
        // Area 400 wide, 20 px walls → free band for a radius-10 player is [30, 370]
        assert_eq!(wall_contact(&player_at(200.0, 0.0), 400.0, 20.0), None);
        assert_eq!(wall_contact(&player_at(30.0, 0.0), 400.0, 20.0), None);
        assert_eq!(wall_contact(&player_at(29.9, 0.0), 400.0, 20.0), Some(WallSide::Left));
        assert_eq!(wall_contact(&player_at(370.0, 0.0), 400.0, 20.0), None);
        assert_eq!(wall_contact(&player_at(370.1, 0.0), 400.0, 20.0), Some(WallSide::Right));
    }

    #[test]
    fn test_overlap_uses_half_width() {
        let player = player_at(100.0, 100.0);
        // radius 10 + half width 15 = 25
        assert!(player_touches(&player, &block_at(124.0, 100.0, 30.0)));
        assert!(!player_touches(&player, &block_at(125.0, 100.0, 30.0)));
        assert!(!player_touches(&player, &block_at(126.0, 100.0, 30.0)));
    }

    #[test]
    fn test_diagonal_corner_does_not_hit() {
        let player = player_at(0.0, 0.0);
        // Square corner would overlap, circle approximation does not
        let block = block_at(20.0, 20.0, 30.0);
        assert!(!player_touches(&player, &block));
    }
}

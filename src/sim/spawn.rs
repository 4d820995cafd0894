//! Entity spawning
//!
//! Two independent timers drive spawning: one for obstacles (interval
//! shrinking with scroll speed, floored) and one for collectibles (constant).

use glam::Vec2;
use rand::Rng;

use super::state::{Entity, EntityKind, World};

/// Edge length of an entity of `kind` at the current area width
pub fn entity_size(world: &World, kind: EntityKind) -> f32 {
    let frac = match kind {
        EntityKind::Obstacle => world.config.obstacle_size_frac,
        EntityKind::Coin | EntityKind::Powerup => world.config.item_size_frac,
    };
    world.width * frac
}

/// Create an entity of `kind` just below the visible area.
///
/// The horizontal placement keeps the whole footprint between the walls.
/// When the band is too narrow for that the entity is centered.
pub fn spawn_entity(world: &mut World, kind: EntityKind) -> Entity {
    let size = entity_size(world, kind);
    let wall = world.wall_width();
    let playable = world.width - wall * 2.0;
    let slack = playable - size * 2.0;

    let x = if slack > 0.0 {
        wall + size + world.rng.random::<f32>() * slack
    } else {
        world.width / 2.0
    };
    let y = world.height + world.config.spawn_margin;

    let rotation = match kind {
        EntityKind::Obstacle => world.rng.random::<f32>() * std::f32::consts::TAU,
        EntityKind::Coin | EntityKind::Powerup => 0.0,
    };

    Entity {
        id: world.next_entity_id(),
        kind,
        pos: Vec2::new(x, y),
        width: size,
        height: size,
        rotation,
        marked_for_deletion: false,
    }
}

/// Pick a collectible kind: coin or powerup with equal odds
pub fn roll_collectible<R: Rng>(rng: &mut R) -> EntityKind {
    if rng.random_bool(0.5) {
        EntityKind::Coin
    } else {
        EntityKind::Powerup
    }
}

/// Advance both spawn timers by `dt` seconds and spawn whatever is due.
///
/// Returns the number of entities added.
pub fn advance_timers(world: &mut World, dt: f32) -> usize {
    let dt_ms = dt * 1000.0;
    world.obstacle_timer += dt_ms;
    world.item_timer += dt_ms;

    let mut spawned = 0;

    if world.obstacle_timer > world.config.obstacle_interval_ms(world.scroll_speed) {
        let entity = spawn_entity(world, EntityKind::Obstacle);
        log::debug!("Spawned obstacle {} at x={:.1}", entity.id, entity.pos.x);
        world.entities.push(entity);
        world.obstacle_timer = 0.0;
        spawned += 1;
    }

    if world.item_timer > world.config.item_spawn_ms {
        let kind = roll_collectible(&mut world.rng);
        let entity = spawn_entity(world, kind);
        log::debug!("Spawned {:?} {} at x={:.1}", kind, entity.id, entity.pos.x);
        world.entities.push(entity);
        world.item_timer = 0.0;
        spawned += 1;
    }

    spawned
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;

    fn world() -> World {
        World::new(GameConfig::default(), 400.0, 800.0, 11)
    }

    #[test]
    fn test_spawn_stays_inside_playable_band() {
        let mut w = world();
        let wall = w.wall_width();
        for i in 0..500 {
            let kind = if i % 2 == 0 { EntityKind::Obstacle } else { EntityKind::Coin };
            let e = spawn_entity(&mut w, kind);
            let half = e.width / 2.0;
            assert!(e.pos.x - half >= wall, "left edge {} inside wall", e.pos.x - half);
            assert!(e.pos.x + half <= w.width - wall, "right edge {} inside wall", e.pos.x + half);
            assert_eq!(e.pos.y, 850.0);
        }
    }

    #[test]
    fn test_obstacles_are_larger_and_spun() {
        let mut w = world();
        let obstacle = spawn_entity(&mut w, EntityKind::Obstacle);
        let coin = spawn_entity(&mut w, EntityKind::Coin);
        assert!(obstacle.width > coin.width);
        assert_eq!(obstacle.width, obstacle.height);
        assert!((0.0..std::f32::consts::TAU).contains(&obstacle.rotation));
        assert_eq!(coin.rotation, 0.0);
    }

    #[test]
    fn test_ids_are_unique() {
        let mut w = world();
        let a = spawn_entity(&mut w, EntityKind::Coin);
        let b = spawn_entity(&mut w, EntityKind::Powerup);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_narrow_band_centers_entity() {
        let mut w = World::new(GameConfig::default(), 10.0, 800.0, 1);
        w.config.obstacle_size_frac = 0.6;
        let e = spawn_entity(&mut w, EntityKind::Obstacle);
        assert_eq!(e.pos.x, 5.0);
    }

    #[test]
    fn test_timers_spawn_and_reset() {
        let mut w = world();
        // scroll speed 320 → obstacle interval 1340 ms
        assert_eq!(advance_timers(&mut w, 1.3), 0);
        assert_eq!(advance_timers(&mut w, 0.05), 1);
        assert_eq!(w.obstacle_timer, 0.0);
        assert_eq!(w.entities[0].kind, EntityKind::Obstacle);

        // Item timer is at 1350 ms; 700 ms more crosses 2000
        assert_eq!(advance_timers(&mut w, 0.7), 1);
        assert_eq!(w.item_timer, 0.0);
        assert!(w.entities[1].kind.is_collectible());
    }

    #[test]
    fn test_collectible_roll_is_fair() {
        let mut w = world();
        let coins = (0..2000)
            .filter(|_| roll_collectible(&mut w.rng) == EntityKind::Coin)
            .count();
        assert!((800..1200).contains(&coins), "coins = {}", coins);
    }
}

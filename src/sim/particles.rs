//! Cosmetic particle bursts

use glam::Vec2;
use rand::Rng;

use super::state::Particle;

/// Push `count` particles flying out of `origin` in random directions.
///
/// Velocity components are uniform in `[-spread/2, spread/2)`. Every particle
/// starts at full opacity (life 1.0) regardless of its nominal max life.
pub fn burst<R: Rng>(
    particles: &mut Vec<Particle>,
    rng: &mut R,
    origin: Vec2,
    color: [f32; 4],
    count: usize,
    spread: f32,
) {
    particles.reserve(count);
    for _ in 0..count {
        let vel = Vec2::new(
            (rng.random::<f32>() - 0.5) * spread,
            (rng.random::<f32>() - 0.5) * spread,
        );
        particles.push(Particle {
            pos: origin,
            vel,
            life: 1.0,
            max_life: 0.5 + rng.random::<f32>() * 0.5,
            color,
            size: rng.random::<f32>() * 3.0 + 1.0,
        });
    }
}

/// Integrate and age particles, dropping the expired ones
pub fn advance(particles: &mut Vec<Particle>, dt: f32) {
    for particle in particles.iter_mut() {
        particle.pos += particle.vel * dt;
        particle.life -= dt;
    }
    particles.retain(|p| p.life > 0.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_burst_shape() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut particles = Vec::new();
        burst(&mut particles, &mut rng, Vec2::new(10.0, 20.0), [1.0; 4], 25, 200.0);

        assert_eq!(particles.len(), 25);
        for p in &particles {
            assert_eq!(p.pos, Vec2::new(10.0, 20.0));
            assert_eq!(p.life, 1.0);
            assert!(p.vel.x.abs() <= 100.0 && p.vel.y.abs() <= 100.0);
            assert!((0.5..1.0).contains(&p.max_life));
            assert!((1.0..4.0).contains(&p.size));
        }
    }

    #[test]
    fn test_particles_expire() {
        let mut particles = vec![Particle {
            pos: Vec2::ZERO,
            vel: Vec2::new(10.0, -20.0),
            life: 0.1,
            max_life: 0.7,
            color: [1.0; 4],
            size: 2.0,
        }];

        advance(&mut particles, 0.05);
        assert_eq!(particles.len(), 1);
        assert!((particles[0].pos - Vec2::new(0.5, -1.0)).length() < 1e-5);

        advance(&mut particles, 0.06);
        assert!(particles.is_empty());
    }
}

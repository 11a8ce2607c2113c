//! Particle field for the reveal backdrop
//!
//! Simulation only: spawning and aging live here, drawing lives in
//! `renderer::shapes` and never touches this state.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::{polar_to_cartesian, reference_frames};

/// Number of palette entries a particle may pick from
pub const PALETTE_SIZE: u8 = 7;

/// Visual flavour of a particle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleKind {
    /// Small sharp four-point sparkle
    Spark,
    /// Soft glowing orb
    Orb,
    /// Dot that shrinks as it fades
    Trail,
}

/// A single particle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    /// Pixels per reference frame
    pub vel: Vec2,
    /// 1.0 at spawn, removed at 0.0
    pub life: f32,
    /// Lifetime scale in seconds (0.5 - 1.5)
    pub max_life: f32,
    pub size: f32,
    /// Palette index for color lookup
    pub color: u8,
    pub kind: ParticleKind,
}

impl Particle {
    /// Spawn a particle on the ring around `center`
    pub fn spawn(rng: &mut impl Rng, center: Vec2, intensity: f32) -> Self {
        let angle = rng.random::<f32>() * std::f32::consts::TAU;
        let distance = SPAWN_RADIUS_MIN + rng.random::<f32>() * SPAWN_RADIUS_SPREAD;

        let kind = if rng.random::<f32>() > 0.7 {
            ParticleKind::Orb
        } else if rng.random::<f32>() > 0.5 {
            ParticleKind::Trail
        } else {
            ParticleKind::Spark
        };

        let vel = Vec2::new(
            (rng.random::<f32>() - 0.5) * 2.0 * intensity,
            (rng.random::<f32>() - 0.5) * 2.0 * intensity,
        );
        let max_life = 0.5 + rng.random::<f32>();
        let size = match kind {
            ParticleKind::Orb => 4.0 + rng.random::<f32>() * 6.0,
            _ => 2.0 + rng.random::<f32>() * 3.0,
        };

        Self {
            pos: center + polar_to_cartesian(distance, angle),
            vel,
            life: 1.0,
            max_life,
            size,
            color: rng.random_range(0..PALETTE_SIZE),
            kind,
        }
    }

    /// Move and age by `frames` reference frames. Returns false once expired.
    fn age(&mut self, frames: f32) -> bool {
        self.pos += self.vel * frames;
        self.life -= LIFE_DECAY_PER_FRAME * frames / self.max_life;
        self.life > 0.0
    }
}

/// Pure step: advance every particle by `dt` seconds and drop the expired ones
pub fn advance(particles: Vec<Particle>, dt: f32) -> Vec<Particle> {
    let frames = reference_frames(dt);
    particles
        .into_iter()
        .filter_map(|mut p| p.age(frames).then_some(p))
        .collect()
}

/// Chance of spawning during a step of `dt` seconds at `intensity`
pub fn spawn_chance(intensity: f32, dt: f32) -> f32 {
    (SPAWN_CHANCE * intensity * reference_frames(dt)).clamp(0.0, 1.0)
}

/// The live particle set of one widget
#[derive(Debug, Clone, Default)]
pub struct ParticleField {
    pub particles: Vec<Particle>,
    /// Spawn ring centre (canvas coordinates)
    pub center: Vec2,
    /// Soft cap from user settings (None = unbounded)
    pub max_particles: Option<usize>,
}

impl ParticleField {
    pub fn new(center: Vec2) -> Self {
        Self {
            particles: Vec::new(),
            center,
            max_particles: None,
        }
    }

    /// One frame: maybe spawn one particle, then advance and expire
    pub fn step(&mut self, intensity: f32, dt: f32, rng: &mut impl Rng) {
        if intensity > 0.0 && rng.random::<f32>() < spawn_chance(intensity, dt) {
            let at_cap = self
                .max_particles
                .is_some_and(|cap| self.particles.len() >= cap);
            if !at_cap {
                self.particles.push(Particle::spawn(rng, self.center, intensity));
            }
        }
        self.particles = advance(std::mem::take(&mut self.particles), dt);
    }

    /// Drop every particle
    pub fn clear(&mut self) {
        self.particles.clear();
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn particle(life: f32, max_life: f32) -> Particle {
        Particle {
            pos: Vec2::ZERO,
            vel: Vec2::new(1.0, -2.0),
            life,
            max_life,
            size: 3.0,
            color: 0,
            kind: ParticleKind::Spark,
        }
    }

    #[test]
    fn test_advance_moves_and_ages() {
        let out = advance(vec![particle(1.0, 1.0)], FRAME_DT);
        assert_eq!(out.len(), 1);
        assert!((out[0].pos - Vec2::new(1.0, -2.0)).length() < 1e-4);
        assert!((out[0].life - (1.0 - LIFE_DECAY_PER_FRAME)).abs() < 1e-5);
    }

    #[test]
    fn test_advance_expires() {
        let out = advance(vec![particle(0.01, 0.5), particle(1.0, 1.0)], FRAME_DT);
        assert_eq!(out.len(), 1);
        assert!((out[0].life - (1.0 - LIFE_DECAY_PER_FRAME)).abs() < 1e-5);
    }

    #[test]
    fn test_particle_lives_about_max_life_seconds() {
        let mut ps = vec![particle(1.0, 1.0)];
        let mut frames = 0;
        while !ps.is_empty() {
            ps = advance(ps, FRAME_DT);
            frames += 1;
        }
        // 1 / 0.016 = 62.5 frames
        assert_eq!(frames, 63);
    }

    #[test]
    fn test_spawn_ring_and_sizes() {
        let mut rng = Pcg32::seed_from_u64(42);
        let center = Vec2::new(400.0, 300.0);
        for _ in 0..500 {
            let p = Particle::spawn(&mut rng, center, 1.0);
            let d = (p.pos - center).length();
            let ring = SPAWN_RADIUS_MIN - 0.01..=SPAWN_RADIUS_MIN + SPAWN_RADIUS_SPREAD + 0.01;
            assert!(ring.contains(&d));
            assert!(p.color < PALETTE_SIZE);
            assert!(p.vel.x.abs() <= 1.0 && p.vel.y.abs() <= 1.0);
            match p.kind {
                ParticleKind::Orb => assert!((4.0..=10.0).contains(&p.size)),
                _ => assert!((2.0..=5.0).contains(&p.size)),
            }
        }
    }

    #[test]
    fn test_zero_intensity_never_spawns() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut field = ParticleField::new(Vec2::ZERO);
        for _ in 0..1000 {
            field.step(0.0, FRAME_DT, &mut rng);
        }
        assert!(field.is_empty());
    }

    #[test]
    fn test_higher_intensity_spawns_more() {
        let count = |intensity: f32| {
            let mut rng = Pcg32::seed_from_u64(11);
            let mut spawned = 0;
            for _ in 0..600 {
                let mut field = ParticleField::new(Vec2::ZERO);
                field.step(intensity, FRAME_DT, &mut rng);
                spawned += field.len();
            }
            spawned
        };
        assert!(count(2.0) > count(1.0));
    }

    #[test]
    fn test_cap_respected() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut field = ParticleField::new(Vec2::ZERO);
        field.max_particles = Some(3);
        for _ in 0..200 {
            field.step(2.0, FRAME_DT, &mut rng);
            assert!(field.len() <= 3);
        }
    }

    proptest! {
        #[test]
        fn prop_advance_keeps_life_in_range(
            lives in prop::collection::vec((0.001f32..=1.0, 0.5f32..1.5), 0..64),
            dt in 0.001f32..0.1,
        ) {
            let ps: Vec<Particle> = lives.iter().map(|&(l, m)| particle(l, m)).collect();
            let n = ps.len();
            let out = advance(ps, dt);
            prop_assert!(out.len() <= n);
            for p in &out {
                prop_assert!(p.life > 0.0 && p.life <= 1.0);
            }
        }

        #[test]
        fn prop_field_stays_small(seed in any::<u64>()) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut field = ParticleField::new(Vec2::ZERO);
            for _ in 0..1200 {
                field.step(2.0, FRAME_DT, &mut rng);
            }
            // At most one spawn per frame, and nothing outlives 94 frames
            prop_assert!(field.len() <= 95);
        }
    }
}

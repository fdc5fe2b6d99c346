use bevy_math::Vec3;
use tracing::debug;
use tracing::warn;

/// A simulation that runs ahead of the renderer and publishes its results separately.
///
/// The frame loop calls [`ParticleSimulation::advance`] before drawing and,
/// when it returned true, [`ParticleSimulation::fetch`] after drawing.
pub trait ParticleSimulation {
    /// Spawns the initial particle set.
    fn init_particles(&mut self);

    /// Advances simulated time by `dt` seconds.
    /// Returns true when new results are waiting to be fetched.
    fn advance(&mut self, dt: f32) -> bool;

    /// Publishes the most recent results.
    fn fetch(&mut self);
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub position: Vec3,
    pub velocity: Vec3,
    pub age: f32,
}

/// CPU particle fountain stepped at a fixed rate.
///
/// Steps write into a back buffer, `fetch` swaps it to the front.
pub struct FountainSimulation {
    origin: Vec3,
    gravity: Vec3,
    lifetime: f32,
    step: f32,
    count: usize,
    accumulator: f32,
    front: Vec<Particle>,
    back: Vec<Particle>,
    pending: bool,
    steps_taken: u64,
}

impl FountainSimulation {
    pub const STEP: f32 = 1.0 / 60.0;
    /// Simulated time beyond this many steps in one call is dropped.
    pub const MAX_STEPS_PER_ADVANCE: u32 = 8;

    pub fn new(count: usize) -> Self {
        Self {
            origin: Vec3::new(0.0, 0.0, 20.0),
            gravity: Vec3::new(0.0, -9.81, 0.0),
            lifetime: 3.0,
            step: Self::STEP,
            count,
            accumulator: 0.0,
            front: Vec::new(),
            back: Vec::new(),
            pending: false,
            steps_taken: 0,
        }
    }

    pub fn steps_taken(&self) -> u64 {
        self.steps_taken
    }

    /// Deterministic spray direction for particle `index`, spread around +Y.
    fn spawn(&self, index: usize) -> Particle {
        let golden_angle = 2.399_963_2_f32;
        let angle = index as f32 * golden_angle;
        let spread = 0.35 * ((index % 7) as f32 + 1.0) / 7.0;
        let velocity = Vec3::new(angle.cos() * spread, 1.0, angle.sin() * spread).normalize() * 8.0;
        Particle {
            position: self.origin,
            velocity,
            // Stagger ages so the fountain does not pulse.
            age: self.lifetime * index as f32 / self.count.max(1) as f32,
        }
    }

    fn simulate_step(&mut self) {
        for index in 0..self.back.len() {
            let mut particle = self.back[index];
            particle.velocity += self.gravity * self.step;
            particle.position += particle.velocity * self.step;
            particle.age += self.step;
            if particle.age >= self.lifetime {
                particle = Particle {
                    age: 0.0,
                    ..self.spawn(index)
                };
            }
            self.back[index] = particle;
        }
        self.steps_taken += 1;
    }
}

impl ParticleSimulation for FountainSimulation {
    fn init_particles(&mut self) {
        self.back = (0..self.count).map(|index| self.spawn(index)).collect();
        self.front = self.back.clone();
        self.accumulator = 0.0;
        self.pending = false;
        debug!("Spawned {} particles", self.count);
    }

    fn advance(&mut self, dt: f32) -> bool {
        if dt.is_nan() {
            warn!("Ignoring NaN particle time step");
            return self.pending;
        }
        let budget = self.step * Self::MAX_STEPS_PER_ADVANCE as f32;
        let accumulated = self.accumulator + dt.max(0.0);
        if accumulated > budget {
            debug!("Particle simulation fell behind by {}s, dropping it", accumulated - budget);
        }
        self.accumulator = accumulated.min(budget);
        while self.accumulator >= self.step {
            self.accumulator -= self.step;
            self.simulate_step();
            self.pending = true;
        }
        self.pending
    }

    fn fetch(&mut self) {
        if !self.pending {
            return;
        }
        self.front.clone_from(&self.back);
        self.pending = false;
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    impl FountainSimulation {
        fn particles(&self) -> &[Particle] {
            &self.front
        }
    }

    fn simulation() -> FountainSimulation {
        let mut simulation = FountainSimulation::new(32);
        simulation.init_particles();
        simulation
    }

    #[test]
    fn small_steps_accumulate_before_simulating() {
        let mut simulation = simulation();
        // The engine's default fixed dt is a millisecond.
        for _ in 0..16 {
            assert!(!simulation.advance(0.001));
        }
        assert!(simulation.advance(0.001));
        assert_eq!(simulation.steps_taken(), 1);
    }

    #[test]
    fn large_steps_run_several_substeps() {
        let mut simulation = simulation();
        assert!(simulation.advance(FountainSimulation::STEP * 3.5));
        assert_eq!(simulation.steps_taken(), 3);
    }

    #[test]
    fn huge_steps_are_capped() {
        let mut simulation = simulation();
        assert!(simulation.advance(f32::INFINITY));
        assert!(simulation.steps_taken() <= FountainSimulation::MAX_STEPS_PER_ADVANCE as u64);
        assert!(simulation.advance(1e10));
        assert!(simulation.steps_taken() <= 2 * FountainSimulation::MAX_STEPS_PER_ADVANCE as u64);
        // The backlog was dropped, so a short frame runs at most one more step.
        let taken = simulation.steps_taken();
        simulation.advance(0.001);
        assert!(simulation.steps_taken() <= taken + 1);
    }

    #[test]
    fn nan_steps_are_ignored() {
        let mut simulation = simulation();
        assert!(!simulation.advance(f32::NAN));
        assert_eq!(simulation.steps_taken(), 0);
        assert!(simulation.advance(FountainSimulation::STEP));
    }

    #[test]
    fn results_are_only_visible_after_fetch() {
        let mut simulation = simulation();
        let before = simulation.particles().to_vec();
        assert!(simulation.advance(0.1));
        assert_eq!(simulation.particles(), before.as_slice());

        simulation.fetch();
        assert_ne!(simulation.particles(), before.as_slice());
        assert!(!simulation.advance(0.0));
    }

    #[test]
    fn particles_respawn_when_their_lifetime_ends() {
        let mut simulation = simulation();
        for _ in 0..600 {
            simulation.advance(FountainSimulation::STEP);
        }
        simulation.fetch();
        assert_eq!(simulation.particles().len(), 32);
        assert!(simulation.particles().iter().all(|particle| particle.age < 3.0));
        // Nothing should have fallen forever.
        assert!(simulation.particles().iter().all(|particle| particle.position.y > -60.0));
    }
}

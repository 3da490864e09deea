//! Particle store and core simulation types
//!
//! Particles are addressed by their index in the store. Collision and graph
//! code compare ids, never particle values, since two particles may share
//! the same state.

use std::fmt;

use glam::DVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Stable index of a particle within its store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ParticleId(pub usize);

impl ParticleId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ParticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Binary particle class, flipped on every collision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Tag {
    /// Initial class
    #[default]
    Green,
    Red,
}

impl Tag {
    pub fn toggled(self) -> Self {
        match self {
            Tag::Green => Tag::Red,
            Tag::Red => Tag::Green,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Tag::Green => "green",
            Tag::Red => "red",
        }
    }
}

/// A fluid particle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: DVec2,
    pub vel: DVec2,
    pub radius: f64,
    pub tag: Tag,
}

impl Particle {
    pub fn new(pos: DVec2, vel: DVec2, radius: f64) -> Self {
        Self {
            pos,
            vel,
            radius,
            tag: Tag::Green,
        }
    }

    #[inline]
    pub fn speed(&self) -> f64 {
        self.vel.length()
    }

    /// Kinetic energy with unit mass: 1/2 |v|^2
    #[inline]
    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.vel.length_squared()
    }

    #[inline]
    pub fn toggle_tag(&mut self) {
        self.tag = self.tag.toggled();
    }
}

/// Axis-aligned rectangle used for canvas bounds and the confinement box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: DVec2,
    pub max: DVec2,
}

impl Rect {
    pub fn new(min: DVec2, max: DVec2) -> Self {
        Self { min, max }
    }

    /// Rectangle anchored at the origin
    pub fn from_size(width: f64, height: f64) -> Self {
        Self::new(DVec2::ZERO, DVec2::new(width, height))
    }

    /// Square of side `size` centered inside `outer`
    pub fn centered_square(outer: &Rect, size: f64) -> Self {
        let min = outer.center() - DVec2::splat(size / 2.0);
        Self::new(min, min + DVec2::splat(size))
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    #[inline]
    pub fn center(&self) -> DVec2 {
        (self.min + self.max) / 2.0
    }

    /// Inclusive containment test
    #[inline]
    pub fn contains(&self, p: DVec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Uniform point in `[min, max)`
    pub fn random_point<R: Rng>(&self, rng: &mut R) -> DVec2 {
        DVec2::new(
            self.min.x + rng.random::<f64>() * self.width(),
            self.min.y + rng.random::<f64>() * self.height(),
        )
    }
}

/// All live particles, indexed by `ParticleId`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParticleStore {
    particles: Vec<Particle>,
}

impl ParticleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from explicit particles; ids follow vector order
    pub fn from_particles(particles: Vec<Particle>) -> Self {
        Self { particles }
    }

    /// Spawn `count` green particles uniformly inside `region`
    ///
    /// Velocities are uniform in `[-0.5, 0.5) * speed_scale` per axis.
    pub fn initialize<R: Rng>(
        count: usize,
        region: &Rect,
        speed_scale: f64,
        radius: f64,
        rng: &mut R,
    ) -> Self {
        let mut particles = Vec::with_capacity(count);
        for _ in 0..count {
            let pos = region.random_point(rng);
            let vel = DVec2::new(
                (rng.random::<f64>() - 0.5) * speed_scale,
                (rng.random::<f64>() - 0.5) * speed_scale,
            );
            particles.push(Particle::new(pos, vel, radius));
        }
        Self { particles }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn get(&self, id: ParticleId) -> Option<&Particle> {
        self.particles.get(id.index())
    }

    /// Like `get`, but unknown ids are an error
    pub fn particle(&self, id: ParticleId) -> Result<&Particle> {
        self.get(id).ok_or(Error::UnknownParticle(id))
    }

    pub fn as_slice(&self) -> &[Particle] {
        &self.particles
    }

    pub fn as_mut_slice(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    /// Iterate `(id, particle)` in store order
    pub fn iter(&self) -> impl Iterator<Item = (ParticleId, &Particle)> {
        self.particles
            .iter()
            .enumerate()
            .map(|(i, p)| (ParticleId(i), p))
    }

    /// Ids of all particles carrying `tag`, in store order
    pub fn ids_with_tag(&self, tag: Tag) -> Vec<ParticleId> {
        self.iter()
            .filter(|(_, p)| p.tag == tag)
            .map(|(id, _)| id)
            .collect()
    }

    pub fn count_tag(&self, tag: Tag) -> usize {
        self.particles.iter().filter(|p| p.tag == tag).count()
    }

    /// Owned copy of the current state for the host to draw
    pub fn snapshot(&self) -> Vec<Particle> {
        self.particles.clone()
    }

    /// Apply a new radius to every live particle
    pub fn set_radius(&mut self, radius: f64) {
        for p in &mut self.particles {
            p.radius = radius;
        }
    }

    /// Total unit-mass kinetic energy
    pub fn kinetic_energy(&self) -> f64 {
        self.particles.iter().map(Particle::kinetic_energy).sum()
    }

    /// First particle whose center lies strictly within its radius of `point`
    pub fn pick(&self, point: DVec2) -> Option<ParticleId> {
        self.iter()
            .find(|(_, p)| p.pos.distance(point) < p.radius)
            .map(|(id, _)| id)
    }
}

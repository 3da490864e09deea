//! Explicit Euler sub-step with friction and wall reflection

use super::state::{Particle, Rect};

/// Advance every particle by one sub-step
///
/// Friction is applied first, then the particle moves by its velocity, then
/// any axis found outside the active walls has its velocity negated. The
/// position is left where it is, so a particle can sit just past a wall for
/// a step before the flipped velocity brings it back.
pub fn step(
    particles: &mut [Particle],
    bounds: &Rect,
    confined: bool,
    box_region: &Rect,
    friction: f64,
) {
    let walls = if confined { box_region } else { bounds };
    for particle in particles.iter_mut() {
        particle.vel *= friction;
        particle.pos += particle.vel;
        reflect(particle, walls);
    }
}

#[inline]
fn reflect(particle: &mut Particle, walls: &Rect) {
    if particle.pos.x < walls.min.x || particle.pos.x > walls.max.x {
        particle.vel.x = -particle.vel.x;
    }
    if particle.pos.y < walls.min.y || particle.pos.y > walls.max.y {
        particle.vel.y = -particle.vel.y;
    }
}

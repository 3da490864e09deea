//! Pairwise collision detection and elastic response
//!
//! Every ordered pair (i, j) is tested each tick, so a single overlap can be
//! resolved from both sides. The overlap test only looks at particle i's
//! diameter. Both quirks are kept to match the reference behavior.

use std::f64::consts::FRAC_PI_2;

use glam::DVec2;

use super::state::Particle;

/// Test all ordered pairs and respond to every overlap
///
/// Returns the number of responses applied this pass.
pub fn resolve(particles: &mut [Particle]) -> usize {
    let n = particles.len();
    let mut hits = 0;
    for i in 0..n {
        for j in 0..n {
            if i == j {
                continue;
            }
            let (particle, other) = pair_mut(particles, i, j);
            if apply_collision(particle, other) {
                hits += 1;
            }
        }
    }
    if hits > 0 {
        log::trace!("resolved {} collisions among {} particles", hits, n);
    }
    hits
}

/// Collide `particle` with `other` if they overlap
///
/// Overlap means `distance < particle.radius * 2`. On a hit both tags flip,
/// velocities are exchanged along the contact normal and the pair is pushed
/// apart by half the penetration each.
pub fn apply_collision(particle: &mut Particle, other: &mut Particle) -> bool {
    let delta = other.pos - particle.pos;
    let distance = delta.length();
    let diameter = particle.radius * 2.0;
    if distance >= diameter {
        return false;
    }

    particle.toggle_tag();
    other.toggle_tag();

    let angle = delta.y.atan2(delta.x);
    let (v1, v2) = elastic_velocities(particle.vel, other.vel, angle);
    particle.vel = v1;
    other.vel = v2;

    let separation = (diameter - distance) / 2.0;
    let normal = DVec2::new(angle.cos(), angle.sin());
    particle.pos -= normal * separation;
    other.pos += normal * separation;
    true
}

/// Equal-mass elastic collision along the normal at `angle`
///
/// Each velocity is rotated into the contact frame, the normal components
/// are swapped, the tangential components kept, and both are rotated back.
pub fn elastic_velocities(v1: DVec2, v2: DVec2, angle: f64) -> (DVec2, DVec2) {
    let speed1 = v1.length();
    let speed2 = v2.length();
    let direction1 = v1.y.atan2(v1.x);
    let direction2 = v2.y.atan2(v2.x);

    let normal1 = speed2 * (direction2 - angle).cos();
    let tangent1 = speed1 * (direction1 - angle).sin();
    let normal2 = speed1 * (direction1 - angle).cos();
    let tangent2 = speed2 * (direction2 - angle).sin();

    (
        from_contact_frame(normal1, tangent1, angle),
        from_contact_frame(normal2, tangent2, angle),
    )
}

#[inline]
fn from_contact_frame(normal: f64, tangent: f64, angle: f64) -> DVec2 {
    let perp = angle + FRAC_PI_2;
    DVec2::new(
        angle.cos() * normal + perp.cos() * tangent,
        angle.sin() * normal + perp.sin() * tangent,
    )
}

/// Two distinct mutable borrows out of one slice
fn pair_mut(particles: &mut [Particle], i: usize, j: usize) -> (&mut Particle, &mut Particle) {
    debug_assert_ne!(i, j);
    if i < j {
        let (head, tail) = particles.split_at_mut(j);
        (&mut head[i], &mut tail[0])
    } else {
        let (head, tail) = particles.split_at_mut(i);
        (&mut tail[0], &mut head[j])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Tag;
    use proptest::prelude::*;

    const EPS: f64 = 1e-9;

    fn pair_energy(a: &Particle, b: &Particle) -> f64 {
        a.kinetic_energy() + b.kinetic_energy()
    }

    #[test]
    fn head_on_swaps_velocities_and_flips_tags() {
        let mut ps = vec![
            Particle::new(DVec2::new(0.0, 0.0), DVec2::new(1.0, 0.0), 2.0),
            Particle::new(DVec2::new(3.0, 0.0), DVec2::new(-1.0, 0.0), 2.0),
        ];
        let hits = resolve(&mut ps);

        // The first response separates the pair to exactly one diameter,
        // so the reverse order no longer overlaps
        assert_eq!(hits, 1);
        assert_eq!(ps[0].tag, Tag::Red);
        assert_eq!(ps[1].tag, Tag::Red);
        assert!((ps[0].vel - DVec2::new(-1.0, 0.0)).length() < EPS);
        assert!((ps[1].vel - DVec2::new(1.0, 0.0)).length() < EPS);
        assert_eq!(ps[0].pos, DVec2::new(-0.5, 0.0));
        assert_eq!(ps[1].pos, DVec2::new(3.5, 0.0));
    }

    #[test]
    fn separated_pair_is_untouched() {
        let mut ps = vec![
            Particle::new(DVec2::new(0.0, 0.0), DVec2::new(1.0, 0.0), 2.0),
            Particle::new(DVec2::new(4.0, 0.0), DVec2::new(-1.0, 0.0), 2.0),
        ];
        let before = ps.clone();
        assert_eq!(resolve(&mut ps), 0);
        assert_eq!(ps, before);
    }

    #[test]
    fn overlap_test_uses_first_particle_radius() {
        // Distance 3: overlaps from the big particle's side only
        let mut big = Particle::new(DVec2::ZERO, DVec2::ZERO, 2.0);
        let mut small = Particle::new(DVec2::new(3.0, 0.0), DVec2::ZERO, 1.0);
        assert!(!apply_collision(&mut small, &mut big));
        assert_eq!(small.tag, Tag::Green);
        assert!(apply_collision(&mut big, &mut small));
        assert_eq!(small.tag, Tag::Red);
        assert_eq!(big.tag, Tag::Red);
    }

    #[test]
    fn persistent_overlap_is_resolved_from_both_sides() {
        // A radius-2 particle next to a radius-4 one: after the first
        // response they sit 4 apart, which the radius-4 particle still
        // sees as overlapping
        let mut ps = vec![
            Particle::new(DVec2::ZERO, DVec2::ZERO, 2.0),
            Particle::new(DVec2::new(3.0, 0.0), DVec2::ZERO, 4.0),
        ];
        assert_eq!(resolve(&mut ps), 2);
        // Two flips cancel out
        assert_eq!(ps[0].tag, Tag::Green);
        assert_eq!(ps[1].tag, Tag::Green);
    }

    #[test]
    fn glancing_collision_keeps_tangential_parts() {
        // Contact normal along +x; y components are tangential and stay put
        let (v1, v2) = elastic_velocities(DVec2::new(2.0, 1.0), DVec2::new(-1.0, -3.0), 0.0);
        assert!((v1 - DVec2::new(-1.0, 1.0)).length() < EPS);
        assert!((v2 - DVec2::new(2.0, -3.0)).length() < EPS);
    }

    #[test]
    fn resting_pair_is_pushed_apart() {
        let mut a = Particle::new(DVec2::new(10.0, 10.0), DVec2::ZERO, 2.0);
        let mut b = Particle::new(DVec2::new(10.0, 12.0), DVec2::ZERO, 2.0);
        assert!(apply_collision(&mut a, &mut b));
        assert!(a.vel.length() < EPS && b.vel.length() < EPS);
        assert!((a.pos.distance(b.pos) - 4.0).abs() < EPS);
    }

    proptest! {
        #[test]
        fn response_conserves_pair_energy(
            x in -3.0f64..3.0,
            y in -3.0f64..3.0,
            v1 in (-5.0f64..5.0, -5.0f64..5.0),
            v2 in (-5.0f64..5.0, -5.0f64..5.0),
        ) {
            prop_assume!(x.hypot(y) > 1e-6);
            let mut a = Particle::new(DVec2::ZERO, DVec2::new(v1.0, v1.1), 2.0);
            let mut b = Particle::new(DVec2::new(x, y), DVec2::new(v2.0, v2.1), 2.0);
            let before = pair_energy(&a, &b);
            apply_collision(&mut a, &mut b);
            let after = pair_energy(&a, &b);
            prop_assert!((before - after).abs() <= 1e-9 * before.max(1.0));
        }

        #[test]
        fn resolve_conserves_total_energy(
            starts in prop::collection::vec(
                (0.0f64..20.0, 0.0f64..20.0, -2.0f64..2.0, -2.0f64..2.0),
                2..12,
            ),
        ) {
            let mut ps: Vec<Particle> = starts
                .iter()
                .map(|&(x, y, vx, vy)| Particle::new(DVec2::new(x, y), DVec2::new(vx, vy), 2.0))
                .collect();
            let before: f64 = ps.iter().map(Particle::kinetic_energy).sum();
            resolve(&mut ps);
            let after: f64 = ps.iter().map(Particle::kinetic_energy).sum();
            prop_assert!((before - after).abs() <= 1e-8 * before.max(1.0));
        }
    }
}

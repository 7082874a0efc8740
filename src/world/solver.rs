//! Sequential impulse contact solver.
//!
//! Each function works on one manifold and the two bodies it names.
//! `dt` is the tick length in milliseconds.

use crate::collision::{Manifold, EPSILON};
use crate::math::vec2::Vec2;
use crate::objects::rigid_body::RigidBody;

/// Mutable references to two distinct bodies, `a_idx < b_idx`.
pub(crate) fn pair_mut(
    bodies: &mut [RigidBody],
    a_idx: usize,
    b_idx: usize,
) -> (&mut RigidBody, &mut RigidBody) {
    debug_assert!(a_idx < b_idx);
    let (head, tail) = bodies.split_at_mut(b_idx);
    (&mut head[a_idx], &mut tail[0])
}

fn relative_velocity(a: &RigidBody, b: &RigidBody, ra: Vec2, rb: Vec2) -> Vec2 {
    b.velocity + Vec2::cross_scalar(b.angular_velocity, rb)
        - a.velocity
        - Vec2::cross_scalar(a.angular_velocity, ra)
}

fn apply_impulse(body: &mut RigidBody, impulse: Vec2, contact: Vec2) {
    if !body.enabled {
        return;
    }
    body.velocity += impulse * body.inv_mass;
    if !body.freeze_orient {
        body.angular_velocity += body.inv_inertia * contact.cross(impulse);
    }
}

/// Mixes the surface coefficients and drops restitution for resting contacts,
/// i.e. when no contact moves faster than one tick of gravity.
pub(crate) fn initialize_manifold(
    manifold: &mut Manifold,
    a: &RigidBody,
    b: &RigidBody,
    gravity: Vec2,
    dt: f64,
) {
    let mixed = a.material.mix(&b.material);
    manifold.restitution = mixed.restitution;
    manifold.static_friction = mixed.static_friction;
    manifold.dynamic_friction = mixed.dynamic_friction;

    let resting_threshold = (gravity * (dt / 1000.0)).magnitude_squared() + EPSILON;
    let resting = manifold.contact_points().iter().any(|&contact| {
        let ra = contact - a.position;
        let rb = contact - b.position;
        relative_velocity(a, b, ra, rb).magnitude_squared() < resting_threshold
    });
    if resting {
        manifold.restitution = 0.0;
    }
}

/// One solver pass over a manifold: normal impulse, then Coulomb friction.
pub(crate) fn integrate_impulses(manifold: &Manifold, a: &mut RigidBody, b: &mut RigidBody) {
    // Two immovable bodies: nothing to distribute the impulse over.
    if (a.inv_mass + b.inv_mass).abs() <= EPSILON {
        a.velocity = Vec2::ZERO;
        b.velocity = Vec2::ZERO;
        return;
    }

    let normal = manifold.normal;
    let count = manifold.contact_count as f64;

    for &contact in manifold.contact_points() {
        let ra = contact - a.position;
        let rb = contact - b.position;

        let mut rv = relative_velocity(a, b, ra, rb);
        let contact_velocity = rv.dot(normal);
        if contact_velocity > 0.0 {
            return;
        }

        let ra_cross_n = ra.cross(normal);
        let rb_cross_n = rb.cross(normal);
        let inv_mass_sum = a.inv_mass
            + b.inv_mass
            + ra_cross_n * ra_cross_n * a.inv_inertia
            + rb_cross_n * rb_cross_n * b.inv_inertia;

        let j = -(1.0 + manifold.restitution) * contact_velocity / inv_mass_sum / count;
        let impulse = normal * j;
        apply_impulse(a, -impulse, ra);
        apply_impulse(b, impulse, rb);

        rv = relative_velocity(a, b, ra, rb);
        let tangent = (rv - normal * rv.dot(normal)).normalize();
        let jt = -rv.dot(tangent) / inv_mass_sum / count;
        if jt.abs() <= EPSILON {
            return;
        }

        let tangent_impulse = if jt.abs() < j * manifold.static_friction {
            tangent * jt
        } else {
            tangent * (-j * manifold.dynamic_friction)
        };
        apply_impulse(a, -tangent_impulse, ra);
        apply_impulse(b, tangent_impulse, rb);
    }
}

/// Pushes the bodies apart along the normal by a fraction of the penetration
/// beyond `allowance`, split by inverse mass.
pub(crate) fn correct_positions(
    manifold: &Manifold,
    a: &mut RigidBody,
    b: &mut RigidBody,
    allowance: f64,
    correction: f64,
) {
    let inv_mass_sum = a.inv_mass + b.inv_mass;
    if inv_mass_sum == 0.0 {
        return;
    }
    let depth = (manifold.penetration - allowance).max(0.0);
    let push = manifold.normal * (depth / inv_mass_sum * correction);

    if a.enabled {
        a.position -= push * a.inv_mass;
    }
    if b.enabled {
        b.position += push * b.inv_mass;
    }
}

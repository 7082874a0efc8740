use crate::math::vec2::Vec2;
use crate::objects::rigid_body::RigidBody;

/// Applies half a tick of accumulated force, torque and gravity to the velocities.
///
/// `dt` is the tick length in milliseconds. Gravity is expressed per second,
/// so it is scaled by `dt / 1000`. Immovable and disabled bodies are skipped.
pub fn integrate_forces(body: &mut RigidBody, dt: f64, gravity: Vec2) {
    if body.is_static() || !body.enabled {
        return;
    }

    body.velocity += body.force * (body.inv_mass * dt / 2.0);
    if body.use_gravity {
        body.velocity += gravity * (dt / 1000.0 / 2.0);
    }
    if !body.freeze_orient {
        body.angular_velocity += body.torque * body.inv_inertia * (dt / 2.0);
    }
}

/// Advances position and orientation by one tick, then applies the second
/// force half-step.
pub fn integrate_velocity(body: &mut RigidBody, dt: f64, gravity: Vec2) {
    if !body.enabled {
        return;
    }

    body.position += body.velocity * dt;
    if !body.freeze_orient {
        body.orient += body.angular_velocity * dt;
    }
    // Keep the polygon rotation matrix in step with `orient`.
    body.set_rotation(body.orient);

    integrate_forces(body, dt, gravity);
}

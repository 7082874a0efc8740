use std::f64::consts::PI;

use super::polygon::MassData;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub radius: f64,
}

impl Circle {
    pub fn new(radius: f64) -> Self {
        Self { radius }
    }

    pub fn area(&self) -> f64 {
        PI * self.radius * self.radius
    }

    /// Mass and rotational inertia of a solid disc: `m = ρπr²`, `I = ½mr²`.
    pub fn mass_data(&self, density: f64) -> MassData {
        let mass = density * self.area();
        MassData {
            mass,
            inertia: 0.5 * mass * self.radius * self.radius,
            centroid: crate::math::Vec2::ZERO,
        }
    }
}

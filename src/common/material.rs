//! Surface properties used when two bodies touch.

/// Friction and bounce coefficients of a body's surface.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Material {
    /// Friction coefficient that must be overcome before sliding starts.
    pub static_friction: f64,
    /// Friction coefficient applied while sliding.
    pub dynamic_friction: f64,
    /// Coefficient of restitution (bounciness). 0 = no bounce, 1 = perfectly elastic.
    pub restitution: f64,
}

impl Material {
    pub fn new(static_friction: f64, dynamic_friction: f64, restitution: f64) -> Self {
        Material {
            static_friction: static_friction.max(0.0),
            dynamic_friction: dynamic_friction.max(0.0),
            restitution: restitution.clamp(0.0, 1.0),
        }
    }

    /// Combines two surfaces with the geometric mean of each coefficient.
    pub fn mix(&self, other: &Material) -> Material {
        Material {
            static_friction: (self.static_friction * other.static_friction).sqrt(),
            dynamic_friction: (self.dynamic_friction * other.dynamic_friction).sqrt(),
            restitution: (self.restitution * other.restitution).sqrt(),
        }
    }
}

impl Default for Material {
    fn default() -> Self {
        Material {
            static_friction: 0.4,
            dynamic_friction: 0.2,
            restitution: 0.0,
        }
    }
}

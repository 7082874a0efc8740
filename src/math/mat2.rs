use super::vec2::Vec2;

/// 2x2 rotation matrix. Row-major: `m00 m01 / m10 m11`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Mat2 {
    pub m00: f64,
    pub m01: f64,
    pub m10: f64,
    pub m11: f64,
}

impl Mat2 {
    pub const IDENTITY: Mat2 = Mat2 {
        m00: 1.0,
        m01: 0.0,
        m10: 0.0,
        m11: 1.0,
    };

    /// Creates the rotation matrix for an angle in radians.
    pub fn from_radians(radians: f64) -> Self {
        let (s, c) = radians.sin_cos();
        Self {
            m00: c,
            m01: -s,
            m10: s,
            m11: c,
        }
    }

    /// Returns the transpose. For a rotation this is also the inverse.
    pub fn transpose(self) -> Self {
        Self {
            m00: self.m00,
            m01: self.m10,
            m10: self.m01,
            m11: self.m11,
        }
    }

    /// Applies the matrix to a vector (local to world for a body rotation).
    pub fn mul_vec(self, v: Vec2) -> Vec2 {
        Vec2::new(
            self.m00 * v.x + self.m01 * v.y,
            self.m10 * v.x + self.m11 * v.y,
        )
    }
}

impl Default for Mat2 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

use crate::error::{PhysicsError, Result};
use crate::math::{Mat2, Vec2};

/// One third, used by the triangle-fan centroid and inertia integrals.
const K: f64 = 1.0 / 3.0;
const AREA_EPSILON: f64 = 1e-9;

/// Mass properties produced from a shape and a density.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MassData {
    pub mass: f64,
    /// Rotational inertia about `centroid`.
    pub inertia: f64,
    /// Center of mass in the shape's local frame.
    pub centroid: Vec2,
}

impl MassData {
    pub fn inverse_mass(&self) -> f64 {
        if self.mass != 0.0 {
            1.0 / self.mass
        } else {
            0.0
        }
    }

    pub fn inverse_inertia(&self) -> f64 {
        if self.inertia != 0.0 {
            1.0 / self.inertia
        } else {
            0.0
        }
    }
}

/// Convex polygon in local space.
///
/// Vertices wind counter-clockwise (positive signed area) and `normals[i]` is
/// the outward unit normal of the edge `vertices[i] -> vertices[i + 1]`.
/// `transform` is the body's current rotation and is refreshed by the
/// integrator.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    pub vertices: Vec<Vec2>,
    pub normals: Vec<Vec2>,
    pub transform: Mat2,
}

impl Polygon {
    fn from_ccw(vertices: Vec<Vec2>) -> Self {
        let normals = edge_normals(&vertices);
        Polygon {
            vertices,
            normals,
            transform: Mat2::IDENTITY,
        }
    }

    /// Axis-aligned rectangle of full extents `size` centered on `center`.
    pub fn rectangle(center: Vec2, size: Vec2) -> Self {
        let h = size * 0.5;
        Self::from_ccw(vec![
            Vec2::new(center.x + h.x, center.y - h.y),
            Vec2::new(center.x + h.x, center.y + h.y),
            Vec2::new(center.x - h.x, center.y + h.y),
            Vec2::new(center.x - h.x, center.y - h.y),
        ])
    }

    /// `sides` vertices evenly spaced on a circle of `radius` around the origin.
    pub fn regular(radius: f64, sides: usize) -> Self {
        let step = std::f64::consts::TAU / sides as f64;
        let vertices = (0..sides)
            .map(|i| {
                let (s, c) = (step * i as f64).sin_cos();
                Vec2::new(c * radius, s * radius)
            })
            .collect();
        Self::from_ccw(vertices)
    }

    /// Builds a polygon from an arbitrary convex outline, re-winding it
    /// counter-clockwise if it was given clockwise.
    pub fn from_vertices(mut vertices: Vec<Vec2>) -> Result<Self> {
        if vertices.len() < 3 {
            return Err(PhysicsError::InvalidGeometry(
                "polygon needs at least 3 vertices",
            ));
        }
        if vertices.iter().any(|v| !v.is_finite()) {
            return Err(PhysicsError::InvalidGeometry("non-finite vertex"));
        }

        let area = signed_area(&vertices);
        if area.abs() <= AREA_EPSILON {
            return Err(PhysicsError::InvalidGeometry("polygon has zero area"));
        }
        if area < 0.0 {
            vertices.reverse();
        }

        let n = vertices.len();
        for i in 0..n {
            let a = vertices[i];
            let b = vertices[(i + 1) % n];
            let c = vertices[(i + 2) % n];
            if (b - a).magnitude_squared() <= AREA_EPSILON {
                return Err(PhysicsError::InvalidGeometry("repeated vertex"));
            }
            if (b - a).cross(c - b) < -AREA_EPSILON {
                return Err(PhysicsError::InvalidGeometry("polygon is not convex"));
            }
        }

        Ok(Self::from_ccw(vertices))
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Signed area; positive for counter-clockwise winding.
    pub fn signed_area(&self) -> f64 {
        signed_area(&self.vertices)
    }

    /// Area, centroid and inertia (about the centroid) for a uniform density.
    ///
    /// Integrates over the triangle fan from the local origin. A degenerate
    /// outline yields zero mass and a centroid at the origin.
    pub fn mass_data(&self, density: f64) -> MassData {
        let n = self.vertices.len();
        let mut area = 0.0;
        let mut center = Vec2::ZERO;
        for i in 0..n {
            let p1 = self.vertices[i];
            let p2 = self.vertices[(i + 1) % n];
            let triangle_area = p1.cross(p2) * 0.5;
            area += triangle_area;
            center += (p1 + p2) * (triangle_area * K);
        }

        if area <= AREA_EPSILON {
            return MassData {
                mass: 0.0,
                inertia: 0.0,
                centroid: Vec2::ZERO,
            };
        }
        center = center / area;

        let mut inertia = 0.0;
        for i in 0..n {
            let p1 = self.vertices[i] - center;
            let p2 = self.vertices[(i + 1) % n] - center;
            let d = p1.cross(p2);
            let intx2 = p1.x * p1.x + p2.x * p1.x + p2.x * p2.x;
            let inty2 = p1.y * p1.y + p2.y * p1.y + p2.y * p2.y;
            inertia += (0.25 * K * d) * (intx2 + inty2);
        }

        MassData {
            mass: density * area,
            inertia: density * inertia,
            centroid: center,
        }
    }

    /// Shifts every vertex by `-offset`. Normals are unaffected.
    pub fn recenter(&mut self, offset: Vec2) {
        for v in &mut self.vertices {
            *v -= offset;
        }
    }

    /// Vertex furthest along `direction`, in local space.
    pub fn support(&self, direction: Vec2) -> Vec2 {
        let mut best_projection = f64::NEG_INFINITY;
        let mut best_vertex = Vec2::ZERO;
        for &v in &self.vertices {
            let projection = v.dot(direction);
            if projection > best_projection {
                best_projection = projection;
                best_vertex = v;
            }
        }
        best_vertex
    }

    /// World-space position of vertex `index` for a body at `position`.
    pub fn world_vertex(&self, index: usize, position: Vec2) -> Vec2 {
        position + self.transform.mul_vec(self.vertices[index])
    }

    /// True if the local-space point is inside or on the outline.
    pub fn contains_local(&self, point: Vec2) -> bool {
        self.vertices
            .iter()
            .zip(&self.normals)
            .all(|(&v, &n)| n.dot(point - v) <= 0.0)
    }
}

fn signed_area(vertices: &[Vec2]) -> f64 {
    let n = vertices.len();
    (0..n)
        .map(|i| vertices[i].cross(vertices[(i + 1) % n]))
        .sum::<f64>()
        * 0.5
}

fn edge_normals(vertices: &[Vec2]) -> Vec<Vec2> {
    let n = vertices.len();
    (0..n)
        .map(|i| (vertices[(i + 1) % n] - vertices[i]).perpendicular_cw().normalize())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn unit_square() -> Polygon {
        Polygon::rectangle(Vec2::ZERO, Vec2::new(1.0, 1.0))
    }

    #[test]
    fn test_rectangle_vertices_and_normals() {
        let p = Polygon::rectangle(Vec2::ZERO, Vec2::new(4.0, 2.0));
        assert_eq!(p.vertex_count(), 4);
        assert_eq!(p.vertices[0], Vec2::new(2.0, -1.0));
        assert_eq!(p.vertices[1], Vec2::new(2.0, 1.0));
        assert_eq!(p.vertices[2], Vec2::new(-2.0, 1.0));
        assert_eq!(p.vertices[3], Vec2::new(-2.0, -1.0));

        assert_eq!(p.normals[0], Vec2::new(1.0, 0.0));
        assert_eq!(p.normals[1], Vec2::new(0.0, 1.0));
        assert_eq!(p.normals[2], Vec2::new(-1.0, 0.0));
        assert_eq!(p.normals[3], Vec2::new(0.0, -1.0));
        assert!((p.signed_area() - 8.0).abs() < EPSILON);
    }

    #[test]
    fn test_normals_are_outward_unit_and_perpendicular() {
        for poly in [unit_square(), Polygon::regular(3.0, 7)] {
            let n = poly.vertex_count();
            assert_eq!(poly.normals.len(), n);
            for i in 0..n {
                let edge = poly.vertices[(i + 1) % n] - poly.vertices[i];
                let normal = poly.normals[i];
                assert!((normal.magnitude() - 1.0).abs() < EPSILON);
                assert!(normal.dot(edge).abs() < EPSILON);
                // The origin is interior, so it lies behind every face.
                assert!(normal.dot(Vec2::ZERO - poly.vertices[i]) < 0.0);
            }
        }
    }

    #[test]
    fn test_regular_polygon() {
        let p = Polygon::regular(2.0, 6);
        assert_eq!(p.vertex_count(), 6);
        assert!((p.vertices[0].x - 2.0).abs() < EPSILON);
        assert!(p.vertices[0].y.abs() < EPSILON);
        for v in &p.vertices {
            assert!((v.magnitude() - 2.0).abs() < EPSILON);
        }
        assert!(p.signed_area() > 0.0);
    }

    #[test]
    fn test_mass_data_square() {
        let md = unit_square().mass_data(1.0);
        assert!((md.mass - 1.0).abs() < EPSILON);
        assert!(md.centroid.magnitude() < EPSILON);
        // w = h = 1: I = m (w² + h²) / 12
        assert!((md.inertia - 1.0 / 6.0).abs() < EPSILON);
    }

    #[test]
    fn test_mass_data_offset_square_uses_centroid() {
        let p = Polygon::rectangle(Vec2::new(10.0, -5.0), Vec2::new(1.0, 1.0));
        let md = p.mass_data(2.0);
        assert!((md.mass - 2.0).abs() < EPSILON);
        assert!((md.centroid.x - 10.0).abs() < EPSILON);
        assert!((md.centroid.y + 5.0).abs() < EPSILON);
        assert!((md.inertia - 2.0 / 6.0).abs() < EPSILON);
    }

    #[test]
    fn test_mass_data_triangle_centroid() {
        let p = Polygon::from_vertices(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(3.0, 0.0),
            Vec2::new(0.0, 3.0),
        ])
        .unwrap();
        let md = p.mass_data(1.0);
        assert!((md.mass - 4.5).abs() < EPSILON);
        assert!((md.centroid.x - 1.0).abs() < EPSILON);
        assert!((md.centroid.y - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_mass_data_zero_density() {
        let md = unit_square().mass_data(0.0);
        assert_eq!(md.mass, 0.0);
        assert_eq!(md.inverse_mass(), 0.0);
        assert_eq!(md.inverse_inertia(), 0.0);
    }

    #[test]
    fn test_mass_data_degenerate_polygon_has_no_mass() {
        let p = Polygon::from_ccw(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(2.0, 2.0),
        ]);
        let md = p.mass_data(1.0);
        assert_eq!(md.mass, 0.0);
        assert_eq!(md.centroid, Vec2::ZERO);
        assert!(md.inverse_mass().is_finite());
    }

    #[test]
    fn test_from_vertices_rewinds_clockwise_input() {
        let p = Polygon::from_vertices(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(0.0, 1.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(1.0, 0.0),
        ])
        .unwrap();
        assert!((p.signed_area() - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_from_vertices_rejects_bad_input() {
        assert!(Polygon::from_vertices(vec![Vec2::ZERO, Vec2::X]).is_err());
        assert!(Polygon::from_vertices(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(2.0, 0.0),
        ])
        .is_err());
        // Concave arrowhead
        assert!(Polygon::from_vertices(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(2.0, 1.0),
            Vec2::new(0.0, 2.0),
            Vec2::new(0.5, 1.0),
        ])
        .is_err());
        assert!(Polygon::from_vertices(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(f64::NAN, 0.0),
            Vec2::new(0.0, 1.0),
        ])
        .is_err());
    }

    #[test]
    fn test_recenter_and_support() {
        let mut p = Polygon::rectangle(Vec2::new(3.0, 3.0), Vec2::new(2.0, 2.0));
        p.recenter(Vec2::new(3.0, 3.0));
        assert_eq!(p.support(Vec2::new(1.0, 1.0)), Vec2::new(1.0, 1.0));
        assert_eq!(p.support(Vec2::new(-1.0, -1.0)), Vec2::new(-1.0, -1.0));
    }

    #[test]
    fn test_contains_local_and_world_vertex() {
        let mut p = unit_square();
        assert!(p.contains_local(Vec2::new(0.25, -0.25)));
        assert!(!p.contains_local(Vec2::new(0.75, 0.0)));

        p.transform = Mat2::from_radians(std::f64::consts::FRAC_PI_2);
        let w = p.world_vertex(0, Vec2::new(10.0, 10.0));
        // (0.5, -0.5) rotated 90° is (0.5, 0.5)
        assert!((w.x - 10.5).abs() < EPSILON);
        assert!((w.y - 10.5).abs() < EPSILON);
    }
}

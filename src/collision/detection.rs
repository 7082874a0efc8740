use super::manifold::Manifold;
use super::sat::check_polygon_polygon;
use super::EPSILON;
use crate::math::vec2::Vec2;
use crate::objects::rigid_body::RigidBody;
use crate::shapes::Shape;

/// Narrow phase entry point: dispatches on the shape pair.
/// Returns a manifold with at least one contact, or None.
pub fn solve_manifold(
    body_a: &RigidBody,
    body_a_idx: usize,
    body_b: &RigidBody,
    body_b_idx: usize,
) -> Option<Manifold> {
    match (&body_a.shape, &body_b.shape) {
        (Shape::Circle(_), Shape::Circle(_)) => {
            check_circle_circle(body_a, body_a_idx, body_b, body_b_idx)
        }
        (Shape::Circle(_), Shape::Polygon(_)) => {
            check_circle_polygon(body_a, body_a_idx, body_b, body_b_idx)
        }
        (Shape::Polygon(_), Shape::Circle(_)) => {
            check_polygon_circle(body_a, body_a_idx, body_b, body_b_idx)
        }
        (Shape::Polygon(_), Shape::Polygon(_)) => {
            check_polygon_polygon(body_a, body_a_idx, body_b, body_b_idx)
        }
    }
}

/// Checks for collision between two circles.
pub fn check_circle_circle(
    body_a: &RigidBody,
    body_a_idx: usize,
    body_b: &RigidBody,
    body_b_idx: usize,
) -> Option<Manifold> {
    let (Shape::Circle(circle_a), Shape::Circle(circle_b)) = (&body_a.shape, &body_b.shape) else {
        return None;
    };

    let dist_vec = body_b.position - body_a.position;
    let dist_sq = dist_vec.magnitude_squared();
    let radii_sum = circle_a.radius + circle_b.radius;
    if dist_sq >= radii_sum * radii_sum {
        return None;
    }

    let mut manifold = Manifold::new(body_a_idx, body_b_idx);
    let distance = dist_sq.sqrt();
    manifold.contact_count = 1;

    if distance == 0.0 {
        // Coincident centers: any axis will do.
        manifold.penetration = circle_a.radius;
        manifold.normal = Vec2::X;
        manifold.contacts[0] = body_a.position;
    } else {
        manifold.penetration = radii_sum - distance;
        manifold.normal = dist_vec / distance;
        manifold.contacts[0] = body_a.position + manifold.normal * circle_a.radius;
    }

    Some(manifold)
}

/// Checks a circle (A) against a polygon (B).
///
/// The circle center is moved into the polygon's frame, the face of least
/// penetration is found, then the Voronoi region of that face decides
/// whether the closest feature is an endpoint or the face itself.
pub fn check_circle_polygon(
    body_a: &RigidBody,
    body_a_idx: usize,
    body_b: &RigidBody,
    body_b_idx: usize,
) -> Option<Manifold> {
    let (Shape::Circle(circle), Shape::Polygon(polygon)) = (&body_a.shape, &body_b.shape) else {
        return None;
    };
    let radius = circle.radius;
    let to_world = polygon.transform;
    let center = to_world.transpose().mul_vec(body_a.position - body_b.position);

    let mut separation = f64::NEG_INFINITY;
    let mut face_normal = 0;
    for (i, (&vertex, &normal)) in polygon.vertices.iter().zip(&polygon.normals).enumerate() {
        let s = normal.dot(center - vertex);
        if s > radius {
            return None;
        }
        if s > separation {
            separation = s;
            face_normal = i;
        }
    }

    let n = polygon.vertex_count();
    let v1 = polygon.vertices[face_normal];
    let v2 = polygon.vertices[(face_normal + 1) % n];

    let mut manifold = Manifold::new(body_a_idx, body_b_idx);
    manifold.contact_count = 1;

    // Center inside the polygon
    if separation < EPSILON {
        manifold.normal = -to_world.mul_vec(polygon.normals[face_normal]);
        manifold.contacts[0] = body_a.position + manifold.normal * radius;
        manifold.penetration = radius;
        return Some(manifold);
    }

    let dot1 = (center - v1).dot(v2 - v1);
    let dot2 = (center - v2).dot(v1 - v2);

    if dot1 <= 0.0 || dot2 <= 0.0 {
        // Closest to an endpoint of the face
        let vertex = if dot1 <= 0.0 { v1 } else { v2 };
        let dist_sq = center.distance_squared(vertex);
        if dist_sq > radius * radius {
            return None;
        }
        manifold.normal = to_world.mul_vec(vertex - center).normalize();
        manifold.contacts[0] = to_world.mul_vec(vertex) + body_b.position;
        manifold.penetration = radius - dist_sq.sqrt();
    } else {
        let normal = polygon.normals[face_normal];
        if (center - v1).dot(normal) > radius {
            return None;
        }
        manifold.normal = -to_world.mul_vec(normal);
        manifold.contacts[0] = body_a.position + manifold.normal * radius;
        manifold.penetration = radius - separation;
    }

    Some(manifold)
}

/// Checks a polygon (A) against a circle (B) by running the circle test with
/// the roles swapped and flipping the normal back to point from A to B.
pub fn check_polygon_circle(
    body_a: &RigidBody,
    body_a_idx: usize,
    body_b: &RigidBody,
    body_b_idx: usize,
) -> Option<Manifold> {
    let mut manifold = check_circle_polygon(body_b, body_b_idx, body_a, body_a_idx)?;
    manifold.body_a_idx = body_a_idx;
    manifold.body_b_idx = body_b_idx;
    manifold.normal = -manifold.normal;
    Some(manifold)
}

//! Polygon-polygon contact generation.
//!
//! Separating axis search over the face normals of both polygons, then the
//! incident face of the other polygon is clipped against the side planes of
//! the reference face. Up to two contact points survive.

use super::manifold::Manifold;
use crate::math::vec2::Vec2;
use crate::objects::rigid_body::RigidBody;
use crate::shapes::{Polygon, Shape};

/// Checks for collision between two polygons.
pub fn check_polygon_polygon(
    body_a: &RigidBody,
    body_a_idx: usize,
    body_b: &RigidBody,
    body_b_idx: usize,
) -> Option<Manifold> {
    let (Shape::Polygon(poly_a), Shape::Polygon(poly_b)) = (&body_a.shape, &body_b.shape) else {
        return None;
    };

    let (penetration_a, face_a) =
        find_axis_least_penetration(poly_a, body_a.position, poly_b, body_b.position);
    if penetration_a >= 0.0 {
        return None;
    }

    let (penetration_b, face_b) =
        find_axis_least_penetration(poly_b, body_b.position, poly_a, body_a.position);
    if penetration_b >= 0.0 {
        return None;
    }

    // Hysteresis keeps the reference face from flickering between near-equal axes.
    let (ref_poly, ref_pos, inc_poly, inc_pos, ref_index, flip) =
        if bias_greater_than(penetration_a, penetration_b) {
            (poly_a, body_a.position, poly_b, body_b.position, face_a, false)
        } else {
            (poly_b, body_b.position, poly_a, body_a.position, face_b, true)
        };

    let mut incident = find_incident_face(ref_poly, inc_poly, inc_pos, ref_index);

    let n = ref_poly.vertex_count();
    let v1 = ref_poly.world_vertex(ref_index, ref_pos);
    let v2 = ref_poly.world_vertex((ref_index + 1) % n, ref_pos);

    let side_normal = (v2 - v1).normalize();
    let ref_face_normal = side_normal.perpendicular_cw();
    let ref_c = ref_face_normal.dot(v1);
    let neg_side = -side_normal.dot(v1);
    let pos_side = side_normal.dot(v2);

    if clip(-side_normal, neg_side, &mut incident) < 2 {
        return None;
    }
    if clip(side_normal, pos_side, &mut incident) < 2 {
        return None;
    }

    let mut manifold = Manifold::new(body_a_idx, body_b_idx);
    manifold.normal = if flip { -ref_face_normal } else { ref_face_normal };

    // Keep the clipped points that lie behind the reference face.
    let mut total_depth = 0.0;
    for point in incident {
        let separation = ref_face_normal.dot(point) - ref_c;
        if separation <= 0.0 {
            manifold.contacts[manifold.contact_count] = point;
            manifold.contact_count += 1;
            total_depth -= separation;
        }
    }
    if !manifold.has_contacts() {
        return None;
    }
    manifold.penetration = total_depth / manifold.contact_count as f64;

    Some(manifold)
}

/// For every face of `a`, the signed distance from that face to the deepest
/// vertex of `b`. Returns the largest distance and its face index; a
/// non-negative distance means `a`'s face separates the polygons.
pub fn find_axis_least_penetration(
    a: &Polygon,
    pos_a: Vec2,
    b: &Polygon,
    pos_b: Vec2,
) -> (f64, usize) {
    let to_b_local = b.transform.transpose();
    let mut best_distance = f64::NEG_INFINITY;
    let mut best_index = 0;

    for (i, (&vertex, &normal)) in a.vertices.iter().zip(&a.normals).enumerate() {
        let n = to_b_local.mul_vec(a.transform.mul_vec(normal));
        let support = b.support(-n);
        let v = to_b_local.mul_vec(a.transform.mul_vec(vertex) + pos_a - pos_b);
        let d = n.dot(support - v);
        if d > best_distance {
            best_distance = d;
            best_index = i;
        }
    }

    (best_distance, best_index)
}

/// The face of `inc` most anti-parallel to the reference face normal, in world space.
pub fn find_incident_face(
    reference: &Polygon,
    inc: &Polygon,
    inc_pos: Vec2,
    reference_index: usize,
) -> [Vec2; 2] {
    let ref_normal = inc
        .transform
        .transpose()
        .mul_vec(reference.transform.mul_vec(reference.normals[reference_index]));

    let mut incident_face = 0;
    let mut min_dot = f64::INFINITY;
    for (i, normal) in inc.normals.iter().enumerate() {
        let dot = ref_normal.dot(*normal);
        if dot < min_dot {
            min_dot = dot;
            incident_face = i;
        }
    }

    let next = (incident_face + 1) % inc.vertex_count();
    [
        inc.world_vertex(incident_face, inc_pos),
        inc.world_vertex(next, inc_pos),
    ]
}

/// Clips the segment `face` against the half-plane `normal·p <= c`.
/// Returns how many points remain; `face` holds them on return.
pub fn clip(normal: Vec2, c: f64, face: &mut [Vec2; 2]) -> usize {
    let mut out = *face;
    let mut count = 0;

    let d1 = normal.dot(face[0]) - c;
    let d2 = normal.dot(face[1]) - c;

    if d1 <= 0.0 {
        out[count] = face[0];
        count += 1;
    }
    if d2 <= 0.0 {
        out[count] = face[1];
        count += 1;
    }

    // One point on each side: keep the crossing too.
    if d1 * d2 < 0.0 {
        let alpha = d1 / (d1 - d2);
        out[count] = face[0] + (face[1] - face[0]) * alpha;
        count += 1;
    }

    *face = out;
    count
}

/// `a >= b` with a relative tolerance that favours `a`.
pub fn bias_greater_than(a: f64, b: f64) -> bool {
    const BIAS_RELATIVE: f64 = 0.95;
    const BIAS_ABSOLUTE: f64 = 0.01;
    a >= b * BIAS_RELATIVE + a * BIAS_ABSOLUTE
}

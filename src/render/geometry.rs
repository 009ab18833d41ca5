//! Geometry processing: object space to clip space.
//!
//! Clip positions are recomputed for every model on every pass. A model's
//! world matrix may change between passes, so nothing is cached.

use crate::math::{Mat4, Vec3, Vec4};

/// `mvp * (v, 1)` for every vertex, in input order.
pub fn transform_vertices(vertices: &[Vec3], mvp: Mat4) -> Vec<Vec4> {
    let mut out = Vec::with_capacity(vertices.len());
    transform_into(vertices, mvp, &mut out);
    out
}

/// Like [`transform_vertices`] but reuses `out`'s allocation.
pub fn transform_into(vertices: &[Vec3], mvp: Mat4, out: &mut Vec<Vec4>) {
    out.clear();
    out.extend(vertices.iter().map(|&v| mvp * Vec4::point(v)));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_clip_vertex_per_input_in_order() {
        let vertices = [Vec3::new(1.0, 2.0, 3.0), Vec3::new(-1.0, 0.0, 4.0)];
        let mvp = Mat4::translation(0.0, 0.0, 1.0);
        let clip = transform_vertices(&vertices, mvp);
        assert_eq!(
            clip,
            vec![Vec4::new(1.0, 2.0, 4.0, 1.0), Vec4::new(-1.0, 0.0, 5.0, 1.0)]
        );
    }

    #[test]
    fn transform_into_replaces_previous_contents() {
        let mut out = vec![Vec4::ZERO; 10];
        transform_into(&[Vec3::ONE], Mat4::identity(), &mut out);
        assert_eq!(out, vec![Vec4::new(1.0, 1.0, 1.0, 1.0)]);
    }

    #[test]
    fn empty_mesh_yields_nothing() {
        assert!(transform_vertices(&[], Mat4::identity()).is_empty());
    }
}

//! Triangle meshes.
//!
//! A [`Mesh`] is an immutable list of object-space positions plus an index
//! list grouped in triples. Front faces are the ones whose projected NDC
//! triangle has a positive edge-function area, which for this pipeline means
//! clockwise as seen by the camera. Back faces are never covered.

use std::io::BufRead;
use std::path::Path;

use crate::error::MeshError;
use crate::math::vec3::Vec3;

const CUBE_VERTICES: [Vec3; 8] = [
    Vec3::new(-0.5, -0.5, -0.5),
    Vec3::new(-0.5, 0.5, -0.5),
    Vec3::new(0.5, 0.5, -0.5),
    Vec3::new(0.5, -0.5, -0.5),
    Vec3::new(0.5, 0.5, 0.5),
    Vec3::new(0.5, -0.5, 0.5),
    Vec3::new(-0.5, 0.5, 0.5),
    Vec3::new(-0.5, -0.5, 0.5),
];

#[rustfmt::skip]
const CUBE_INDICES: [u32; 36] = [
    0, 1, 2,  0, 2, 3, // front (-Z)
    3, 2, 4,  3, 4, 5, // right (+X)
    5, 4, 6,  5, 6, 7, // back (+Z)
    7, 6, 1,  7, 1, 0, // left (-X)
    1, 6, 4,  1, 4, 2, // top (+Y)
    5, 7, 0,  5, 0, 3, // bottom (-Y)
];

const QUAD_VERTICES: [Vec3; 4] = [
    Vec3::new(-0.5, -0.5, 0.0),
    Vec3::new(-0.5, 0.5, 0.0),
    Vec3::new(0.5, 0.5, 0.0),
    Vec3::new(0.5, -0.5, 0.0),
];

const QUAD_INDICES: [u32; 6] = [0, 1, 2, 0, 2, 3];

#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    vertices: Vec<Vec3>,
    indices: Vec<u32>,
}

impl Mesh {
    /// Builds a mesh, checking that indices form whole triangles and stay in
    /// range. The rasterizer indexes without bounds checks beyond this.
    pub fn new(vertices: Vec<Vec3>, indices: Vec<u32>) -> Result<Self, MeshError> {
        if indices.len() % 3 != 0 {
            return Err(MeshError::IndexCountNotMultipleOfThree(indices.len()));
        }
        if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertices.len()) {
            return Err(MeshError::IndexOutOfRange {
                index,
                vertex_count: vertices.len(),
            });
        }
        Ok(Self { vertices, indices })
    }

    pub fn empty() -> Self {
        Self {
            vertices: Vec::new(),
            indices: Vec::new(),
        }
    }

    /// Unit quad in the XY plane centered at the origin, front face toward -Z.
    pub fn quad() -> Self {
        Self {
            vertices: QUAD_VERTICES.to_vec(),
            indices: QUAD_INDICES.to_vec(),
        }
    }

    /// Unit cube centered at the origin with outward front faces.
    pub fn cube() -> Self {
        Self {
            vertices: CUBE_VERTICES.to_vec(),
            indices: CUBE_INDICES.to_vec(),
        }
    }

    /// Loads every object in an OBJ file into a single mesh.
    ///
    /// OBJ data is right-handed with counter-clockwise front faces. X is
    /// mirrored on import, which converts to the left-handed convention and
    /// flips the winding to clockwise in one step.
    pub fn from_obj<P: AsRef<Path>>(path: P) -> Result<Self, MeshError> {
        let (models, _materials) = tobj::load_obj(path.as_ref(), &Self::load_options())?;
        Self::from_tobj_models(models)
    }

    /// Same as [`Mesh::from_obj`] for in-memory OBJ text. `mtllib`
    /// references are ignored.
    pub fn from_obj_reader<R: BufRead>(reader: &mut R) -> Result<Self, MeshError> {
        let (models, _materials) = tobj::load_obj_buf(reader, &Self::load_options(), |_| {
            Err(tobj::LoadError::OpenFileFailed)
        })?;
        Self::from_tobj_models(models)
    }

    fn load_options() -> tobj::LoadOptions {
        tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        }
    }

    fn from_tobj_models(models: Vec<tobj::Model>) -> Result<Self, MeshError> {
        let mut vertices = Vec::new();
        let mut indices = Vec::new();

        for model in models {
            let base = vertices.len() as u32;
            vertices.extend(
                model
                    .mesh
                    .positions
                    .chunks_exact(3)
                    .map(|p| Vec3::new(-p[0], p[1], p[2])),
            );
            indices.extend(model.mesh.indices.iter().map(|&i| base + i));
        }

        Self::new(vertices, indices)
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn new_rejects_partial_triangles() {
        let err = Mesh::new(QUAD_VERTICES.to_vec(), vec![0, 1]).unwrap_err();
        assert!(matches!(err, MeshError::IndexCountNotMultipleOfThree(2)));
    }

    #[test]
    fn new_rejects_out_of_range_indices() {
        let err = Mesh::new(QUAD_VERTICES.to_vec(), vec![0, 1, 4]).unwrap_err();
        assert!(matches!(
            err,
            MeshError::IndexOutOfRange {
                index: 4,
                vertex_count: 4
            }
        ));
    }

    #[test]
    fn builtin_meshes_are_well_formed() {
        let quad = Mesh::quad();
        assert_eq!(quad.triangle_count(), 2);
        assert_eq!(Mesh::new(quad.vertices.clone(), quad.indices.clone()).unwrap(), quad);

        let cube = Mesh::cube();
        assert_eq!(cube.vertex_count(), 8);
        assert_eq!(cube.triangle_count(), 12);
        assert!(cube.indices().iter().all(|&i| (i as usize) < cube.vertex_count()));
    }

    #[test]
    fn quad_indices_form_two_triangles() {
        assert_eq!(Mesh::quad().indices(), &[0, 1, 2, 0, 2, 3]);
    }

    #[test]
    fn obj_import_mirrors_x_and_triangulates() {
        let obj = "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n";
        let mesh = Mesh::from_obj_reader(&mut Cursor::new(obj)).unwrap();
        assert_eq!(mesh.triangle_count(), 2);
        assert!(mesh.vertices().contains(&Vec3::new(-1.0, 1.0, 0.0)));
        assert!(mesh.vertices().iter().all(|v| v.x <= 0.0));
    }

    #[test]
    fn empty_mesh_has_no_triangles() {
        assert_eq!(Mesh::empty().triangle_count(), 0);
    }
}

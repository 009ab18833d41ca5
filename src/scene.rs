//! Scene files.
//!
//! Uses RON (Rusty Object Notation) for human-readable render jobs. A file
//! describes one pass: resolution, depth settings, camera and models. It is
//! resolved into plain [`Camera`] / [`Model`] values before drawing, so the
//! pipeline never sees the description types.
//!
//! ```ron
//! (
//!     resolution: (64, 64),
//!     camera: (eye: (0.0, 0.0, -5.0), target: (0.0, 0.0, 0.0), fov_y: 60.0, near: 0.1, far: 100.0),
//!     models: [(mesh: Quad, color: (1.0, 0.0, 0.0, 1.0))],
//! )
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::camera::Camera;
use crate::color::Color;
use crate::error::SceneError;
use crate::math::{Mat4, Vec3};
use crate::mesh::Mesh;
use crate::model::Model;
use crate::projection::{DepthConvention, Projection};
use crate::render::{DepthCompare, RenderConfig};
use crate::transform::Transform;

/// Where a model's mesh comes from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MeshSource {
    Quad,
    Cube,
    /// OBJ file, relative to the scene file's directory.
    Obj(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraDescription {
    pub eye: [f32; 3],
    pub target: [f32; 3],
    #[serde(default = "default_up")]
    pub up: [f32; 3],
    /// Vertical field of view in degrees.
    pub fov_y: f32,
    /// Defaults to `width / height` of the scene resolution.
    #[serde(default)]
    pub aspect: Option<f32>,
    pub near: f32,
    pub far: f32,
    #[serde(default)]
    pub background: Color,
}

/// Placement with rotation in degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformDescription {
    pub position: [f32; 3],
    pub rotation: [f32; 3],
    pub scale: [f32; 3],
}

impl Default for TransformDescription {
    fn default() -> Self {
        Self {
            position: [0.0; 3],
            rotation: [0.0; 3],
            scale: [1.0; 3],
        }
    }
}

impl TransformDescription {
    pub fn to_matrix(&self) -> Mat4 {
        Transform::new()
            .with_position(self.position.into())
            .with_rotation_degrees(self.rotation.into())
            .with_scale(self.scale.into())
            .to_matrix()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDescription {
    pub mesh: MeshSource,
    #[serde(default)]
    pub transform: TransformDescription,
    pub color: Color,
    #[serde(default = "default_active")]
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDescription {
    pub resolution: (u32, u32),
    #[serde(default)]
    pub depth_convention: DepthConvention,
    #[serde(default)]
    pub depth_compare: DepthCompare,
    #[serde(default)]
    pub parallel: bool,
    pub camera: CameraDescription,
    #[serde(default)]
    pub models: Vec<ModelDescription>,
}

fn default_up() -> [f32; 3] {
    [0.0, 1.0, 0.0]
}

fn default_active() -> bool {
    true
}

/// A resolved render job.
#[derive(Debug, Clone)]
pub struct Scene {
    pub config: RenderConfig,
    pub camera: Camera,
    pub models: Vec<Model>,
}

impl Scene {
    /// Red unit quad at the origin seen from `(0, 0, -5)`: 60 degree fov,
    /// near 0.1, far 100, reversed-Z.
    pub fn unit_quad_demo(width: u32, height: u32) -> Self {
        let config = RenderConfig::new(width, height);
        let camera = Camera::look_at(
            Vec3::new(0.0, 0.0, -5.0),
            Vec3::ZERO,
            Vec3::UP,
            Projection::new(60.0, config.aspect_ratio(), 0.1, 100.0),
        );
        let models = vec![Model::new(
            Arc::new(Mesh::quad()),
            Mat4::identity(),
            Color::RED,
        )];
        Self {
            config,
            camera,
            models,
        }
    }
}

impl SceneDescription {
    /// Builds the camera, loads meshes and validates everything.
    ///
    /// Each distinct mesh source is loaded once and shared between models.
    pub fn resolve(&self, base_dir: &Path) -> Result<Scene, SceneError> {
        let (width, height) = self.resolution;
        let config = RenderConfig::new(width, height)
            .with_depth_convention(self.depth_convention)
            .with_depth_compare(self.depth_compare)
            .with_parallel(self.parallel);
        config.validate()?;

        let cam = &self.camera;
        let projection = Projection::new(
            cam.fov_y,
            cam.aspect.unwrap_or_else(|| config.aspect_ratio()),
            cam.near,
            cam.far,
        );
        let camera = Camera::look_at(cam.eye.into(), cam.target.into(), cam.up.into(), projection)
            .with_background(cam.background);
        camera.validate()?;

        let mut meshes: HashMap<&MeshSource, Arc<Mesh>> = HashMap::new();
        let mut models = Vec::with_capacity(self.models.len());
        for desc in &self.models {
            let mesh = match meshes.get(&desc.mesh) {
                Some(mesh) => mesh.clone(),
                None => {
                    let mesh = Arc::new(load_mesh(&desc.mesh, base_dir)?);
                    meshes.insert(&desc.mesh, mesh.clone());
                    mesh
                }
            };
            models.push(
                Model::new(mesh, desc.transform.to_matrix(), desc.color).with_active(desc.active),
            );
        }

        log::debug!(
            "resolved scene: {}x{}, {} models, {} distinct meshes",
            width,
            height,
            models.len(),
            meshes.len()
        );

        Ok(Scene {
            config,
            camera,
            models,
        })
    }
}

fn load_mesh(source: &MeshSource, base_dir: &Path) -> Result<Mesh, SceneError> {
    let mesh = match source {
        MeshSource::Quad => Mesh::quad(),
        MeshSource::Cube => Mesh::cube(),
        MeshSource::Obj(path) => {
            let path = base_dir.join(path);
            log::info!("loading mesh {}", path.display());
            Mesh::from_obj(&path)?
        }
    };
    Ok(mesh)
}

/// Load and resolve a scene from a RON file. OBJ paths are relative to the
/// file's directory.
pub fn load_scene<P: AsRef<Path>>(path: P) -> Result<Scene, SceneError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    let description: SceneDescription = ron::from_str(&contents)?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    description.resolve(base_dir)
}

/// Load and resolve a scene from a RON string. OBJ paths are relative to the
/// current directory.
pub fn load_scene_from_str(s: &str) -> Result<Scene, SceneError> {
    let description: SceneDescription = ron::from_str(s)?;
    description.resolve(Path::new("."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;
    use crate::render::Pipeline;

    const MINIMAL: &str = r#"
        (
            resolution: (64, 64),
            camera: (
                eye: (0.0, 0.0, -5.0),
                target: (0.0, 0.0, 0.0),
                fov_y: 60.0,
                near: 0.1,
                far: 100.0,
            ),
            models: [
                (mesh: Quad, color: (1.0, 0.0, 0.0, 1.0)),
            ],
        )
    "#;

    #[test]
    fn minimal_scene_uses_defaults() {
        let scene = load_scene_from_str(MINIMAL).unwrap();
        assert_eq!(scene.config, RenderConfig::new(64, 64));
        assert_eq!(scene.camera.background(), Color::BLACK);
        assert_eq!(scene.camera.projection().aspect_ratio(), 1.0);
        assert_eq!(scene.models.len(), 1);
        assert!(scene.models[0].is_active());
        assert_eq!(scene.models[0].world(), Mat4::identity());
    }

    #[test]
    fn minimal_scene_renders_like_the_demo() {
        let scene = load_scene_from_str(MINIMAL).unwrap();
        let demo = Scene::unit_quad_demo(64, 64);

        let a = Pipeline::new(scene.config).unwrap().draw(&scene.camera, &scene.models).unwrap();
        let b = Pipeline::new(demo.config).unwrap().draw(&demo.camera, &demo.models).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn bundled_example_scene_resolves() {
        let scene = load_scene_from_str(include_str!("../scenes/quad_and_cube.ron")).unwrap();
        assert_eq!(scene.config.depth_convention, DepthConvention::Reversed);
        assert!(scene.config.parallel);
        assert_eq!(scene.models.len(), 3);
        assert!(!scene.models[2].is_active());
        assert_eq!(scene.models[1].mesh().triangle_count(), 12);
    }

    #[test]
    fn shared_sources_load_once() {
        let ron = MINIMAL.replace(
            "(mesh: Quad, color: (1.0, 0.0, 0.0, 1.0)),",
            "(mesh: Cube, color: (1.0, 0.0, 0.0, 1.0)), (mesh: Cube, color: (0.0, 1.0, 0.0, 1.0)),",
        );
        let scene = load_scene_from_str(&ron).unwrap();
        assert!(std::ptr::eq(scene.models[0].mesh(), scene.models[1].mesh()));
    }

    #[test]
    fn invalid_camera_is_a_config_error() {
        let ron = MINIMAL.replace("far: 100.0", "far: 0.05");
        let err = load_scene_from_str(&ron).unwrap_err();
        assert!(matches!(
            err,
            SceneError::Config(ConfigError::InvalidClipPlanes { .. })
        ));
    }

    #[test]
    fn zero_resolution_is_a_config_error() {
        let ron = MINIMAL.replace("(64, 64)", "(0, 64)");
        assert!(matches!(
            load_scene_from_str(&ron).unwrap_err(),
            SceneError::Config(ConfigError::InvalidResolution { .. })
        ));
    }

    #[test]
    fn malformed_ron_is_a_parse_error() {
        assert!(matches!(
            load_scene_from_str("(resolution: 64)").unwrap_err(),
            SceneError::Parse(_)
        ));
    }

    #[test]
    fn missing_obj_is_a_mesh_error() {
        let ron = MINIMAL.replace("mesh: Quad", r#"mesh: Obj("does/not/exist.obj")"#);
        assert!(matches!(
            load_scene_from_str(&ron).unwrap_err(),
            SceneError::Mesh(_)
        ));
    }

    #[test]
    fn load_scene_resolves_obj_relative_to_file() {
        let dir = std::env::temp_dir().join(format!("rasterpipe-scene-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("tri.obj"), "v 0 0 0\nv 0 1 0\nv 1 0 0\nf 1 2 3\n").unwrap();
        let ron = MINIMAL.replace("mesh: Quad", r#"mesh: Obj("tri.obj")"#);
        std::fs::write(dir.join("scene.ron"), ron).unwrap();

        let scene = load_scene(dir.join("scene.ron")).unwrap();
        assert_eq!(scene.models[0].mesh().triangle_count(), 1);

        std::fs::remove_dir_all(&dir).unwrap();
    }
}

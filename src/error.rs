//! Error types.
//!
//! The pipeline itself never fails once its inputs are validated: degenerate
//! triangles are skipped and empty scenes leave the cleared framebuffer
//! untouched. Errors come from bad configuration, malformed meshes, scene
//! files and image export.

use std::fmt;

/// Caller contract violations caught before a pass starts.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Width or height is zero.
    InvalidResolution { width: u32, height: u32 },
    /// Aspect ratio is not a positive finite number.
    InvalidAspect(f32),
    /// Requires `0 < z_near < z_far`.
    InvalidClipPlanes { z_near: f32, z_far: f32 },
    /// Vertical field of view outside `(0, 180)` degrees.
    InvalidFieldOfView(f32),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidResolution { width, height } => {
                write!(f, "invalid resolution {}x{}", width, height)
            }
            ConfigError::InvalidAspect(aspect) => {
                write!(f, "aspect ratio must be positive, got {}", aspect)
            }
            ConfigError::InvalidClipPlanes { z_near, z_far } => write!(
                f,
                "clip planes must satisfy 0 < near < far, got near={} far={}",
                z_near, z_far
            ),
            ConfigError::InvalidFieldOfView(fov) => {
                write!(f, "vertical fov must be in (0, 180) degrees, got {}", fov)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Errors building or loading a [`Mesh`](crate::Mesh).
#[derive(Debug)]
pub enum MeshError {
    /// Index list length is not a multiple of three.
    IndexCountNotMultipleOfThree(usize),
    /// An index names a vertex that does not exist.
    IndexOutOfRange { index: u32, vertex_count: usize },
    /// The OBJ loader rejected the file.
    Load(tobj::LoadError),
}

impl From<tobj::LoadError> for MeshError {
    fn from(e: tobj::LoadError) -> Self {
        MeshError::Load(e)
    }
}

impl fmt::Display for MeshError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeshError::IndexCountNotMultipleOfThree(n) => {
                write!(f, "index count {} is not a multiple of 3", n)
            }
            MeshError::IndexOutOfRange {
                index,
                vertex_count,
            } => write!(
                f,
                "index {} out of range for {} vertices",
                index, vertex_count
            ),
            MeshError::Load(e) => write!(f, "OBJ load error: {}", e),
        }
    }
}

impl std::error::Error for MeshError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MeshError::Load(e) => Some(e),
            _ => None,
        }
    }
}

/// Errors writing buffers out as images.
#[derive(Debug)]
pub enum ExportError {
    Image(image::ImageError),
}

impl From<image::ImageError> for ExportError {
    fn from(e: image::ImageError) -> Self {
        ExportError::Image(e)
    }
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::Image(e) => write!(f, "image error: {}", e),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExportError::Image(e) => Some(e),
        }
    }
}

/// Errors loading a scene description.
#[derive(Debug)]
pub enum SceneError {
    Io(std::io::Error),
    Parse(ron::error::SpannedError),
    Mesh(MeshError),
    Config(ConfigError),
}

impl From<std::io::Error> for SceneError {
    fn from(e: std::io::Error) -> Self {
        SceneError::Io(e)
    }
}

impl From<ron::error::SpannedError> for SceneError {
    fn from(e: ron::error::SpannedError) -> Self {
        SceneError::Parse(e)
    }
}

impl From<MeshError> for SceneError {
    fn from(e: MeshError) -> Self {
        SceneError::Mesh(e)
    }
}

impl From<ConfigError> for SceneError {
    fn from(e: ConfigError) -> Self {
        SceneError::Config(e)
    }
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneError::Io(e) => write!(f, "IO error: {}", e),
            SceneError::Parse(e) => write!(f, "Parse error: {}", e),
            SceneError::Mesh(e) => write!(f, "Mesh error: {}", e),
            SceneError::Config(e) => write!(f, "Config error: {}", e),
        }
    }
}

impl std::error::Error for SceneError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SceneError::Io(e) => Some(e),
            SceneError::Parse(e) => Some(e),
            SceneError::Mesh(e) => Some(e),
            SceneError::Config(e) => Some(e),
        }
    }
}

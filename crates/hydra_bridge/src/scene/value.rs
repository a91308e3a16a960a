//! Typed attribute values and the tokens that name them

use std::path::PathBuf;

use crate::foundation::math::{Mat4, Vec2, Vec3};

/// Attribute tokens understood by the delegate's pull queries.
pub mod tokens {
    /// Vertex positions
    pub const POINTS: &str = "points";
    /// Face-varying normals
    pub const NORMALS: &str = "normals";
    /// Face-varying texture coordinates
    pub const ST: &str = "st";
    /// Vertices per face
    pub const FACE_VERTEX_COUNTS: &str = "faceVertexCounts";
    /// Flat face-vertex index buffer
    pub const FACE_VERTEX_INDICES: &str = "faceVertexIndices";

    /// Light intensity
    pub const INTENSITY: &str = "intensity";
    /// Light colour
    pub const COLOR: &str = "color";
    /// Light exposure (stops)
    pub const EXPOSURE: &str = "exposure";
    /// Normalize power by emitter area
    pub const NORMALIZE: &str = "normalize";
    /// Sphere/disk radius
    pub const RADIUS: &str = "radius";
    /// Rect width
    pub const WIDTH: &str = "width";
    /// Rect height
    pub const HEIGHT: &str = "height";
    /// Distant light angular diameter in degrees
    pub const ANGLE: &str = "angle";
    /// Spot cone half-angle in degrees
    pub const SHAPING_CONE_ANGLE: &str = "shaping:cone:angle";
    /// Spot cone edge softness
    pub const SHAPING_CONE_SOFTNESS: &str = "shaping:cone:softness";
    /// Treat sphere light as a point emitter
    pub const TREAT_AS_POINT: &str = "treatAsPoint";
    /// Shadow casting toggle
    pub const SHADOW_ENABLE: &str = "shadow:enable";

    /// Exported shading network file of a material
    pub const MATERIAL_PATH: &str = "materialPath";
}

/// A typed attribute value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Boolean
    Bool(bool),
    /// 32-bit integer
    Int(i32),
    /// 32-bit float
    Float(f32),
    /// 3-vector (colours, directions)
    Vec3(Vec3),
    /// 4x4 matrix
    Matrix(Mat4),
    /// String
    String(String),
    /// Filesystem path to an asset
    AssetPath(PathBuf),
    /// Integer array
    IntArray(Vec<i32>),
    /// 2-vector array
    Vec2Array(Vec<Vec2>),
    /// 3-vector array
    Vec3Array(Vec<Vec3>),
}

impl Value {
    /// Float payload
    pub const fn as_float(&self) -> Option<f32> {
        match self {
            Self::Float(value) => Some(*value),
            _ => None,
        }
    }

    /// Bool payload
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// Vec3 payload
    pub const fn as_vec3(&self) -> Option<&Vec3> {
        match self {
            Self::Vec3(value) => Some(value),
            _ => None,
        }
    }

    /// Integer array payload
    pub fn as_int_array(&self) -> Option<&[i32]> {
        match self {
            Self::IntArray(values) => Some(values),
            _ => None,
        }
    }

    /// Vec2 array payload
    pub fn as_vec2_array(&self) -> Option<&[Vec2]> {
        match self {
            Self::Vec2Array(values) => Some(values),
            _ => None,
        }
    }

    /// Vec3 array payload
    pub fn as_vec3_array(&self) -> Option<&[Vec3]> {
        match self {
            Self::Vec3Array(values) => Some(values),
            _ => None,
        }
    }

    /// Asset path payload
    pub fn as_asset_path(&self) -> Option<&std::path::Path> {
        match self {
            Self::AssetPath(path) => Some(path),
            _ => None,
        }
    }

    /// Number of elements for arrays, 1 otherwise
    pub fn len(&self) -> usize {
        match self {
            Self::IntArray(values) => values.len(),
            Self::Vec2Array(values) => values.len(),
            Self::Vec3Array(values) => values.len(),
            _ => 1,
        }
    }

    /// Whether an array value has no elements
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Self::Float(value)
    }
}

impl From<Vec3> for Value {
    fn from(value: Vec3) -> Self {
        Self::Vec3(value)
    }
}

impl From<Mat4> for Value {
    fn from(value: Mat4) -> Self {
        Self::Matrix(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<PathBuf> for Value {
    fn from(value: PathBuf) -> Self {
        Self::AssetPath(value)
    }
}

impl From<Vec<i32>> for Value {
    fn from(values: Vec<i32>) -> Self {
        Self::IntArray(values)
    }
}

impl From<Vec<Vec2>> for Value {
    fn from(values: Vec<Vec2>) -> Self {
        Self::Vec2Array(values)
    }
}

impl From<Vec<Vec3>> for Value {
    fn from(values: Vec<Vec3>) -> Self {
        Self::Vec3Array(values)
    }
}

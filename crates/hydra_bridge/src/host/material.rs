//! Host material data-block

/// A material as the host stores it.
///
/// The bridge only needs the name to ask the exporter for a shading
/// network; the surface values are carried for exporters that want them.
#[derive(Debug, Clone, PartialEq)]
pub struct HostMaterial {
    /// Display name, also the key used by the material exporter
    pub name: String,
    /// Linear RGBA base colour
    pub base_color: [f32; 4],
    /// Surface roughness
    pub roughness: f32,
    /// Metalness
    pub metallic: f32,
}

impl HostMaterial {
    /// Create a grey dielectric material
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_color: [0.8, 0.8, 0.8, 1.0],
            roughness: 0.5,
            metallic: 0.0,
        }
    }

    /// Set the base colour
    #[must_use]
    pub const fn with_base_color(mut self, base_color: [f32; 4]) -> Self {
        self.base_color = base_color;
        self
    }
}

//! Host light data-block

use crate::foundation::math::Vec3;

/// Light type as the host enumerates it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightType {
    /// Omni-directional light with a spherical emitter
    Point,
    /// Infinitely distant directional light
    Sun,
    /// Cone-restricted point light
    Spot,
    /// Planar emitter, see [`AreaShape`]
    Area,
}

/// Shape of an area light
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AreaShape {
    /// Square with side `size`
    Square,
    /// Rectangle `size` x `size_y`
    Rectangle,
    /// Disk with diameter `size`
    Disk,
    /// Ellipse with diameters `size` and `size_y`
    Ellipse,
    /// A shape code this bridge does not know about
    Other(u8),
}

/// Light data as stored by the host. Angles are in radians.
#[derive(Debug, Clone, PartialEq)]
pub struct HostLight {
    /// Light type
    pub light_type: LightType,
    /// Linear RGB colour
    pub color: Vec3,
    /// Power in watts (irradiance for sun lights)
    pub energy: f32,
    /// Emitter radius for point and spot lights
    pub radius: f32,
    /// Full cone angle of a spot light
    pub spot_size: f32,
    /// Spot edge softness in `[0, 1]`
    pub spot_blend: f32,
    /// Angular diameter of the sun disk
    pub sun_angle: f32,
    /// Area light shape
    pub area_shape: AreaShape,
    /// Area light size (X)
    pub size: f32,
    /// Area light size (Y), used by rectangles and ellipses
    pub size_y: f32,
    /// Whether the light casts shadows
    pub cast_shadows: bool,
}

impl Default for HostLight {
    fn default() -> Self {
        Self {
            light_type: LightType::Point,
            color: Vec3::new(1.0, 1.0, 1.0),
            energy: 1000.0,
            radius: 0.1,
            spot_size: std::f32::consts::FRAC_PI_4,
            spot_blend: 0.15,
            sun_angle: 0.00918,
            area_shape: AreaShape::Square,
            size: 1.0,
            size_y: 1.0,
            cast_shadows: true,
        }
    }
}

impl HostLight {
    /// Point light with the given power
    pub fn point(energy: f32, radius: f32) -> Self {
        Self {
            light_type: LightType::Point,
            energy,
            radius,
            ..Default::default()
        }
    }

    /// Sun light with the given angular diameter
    pub fn sun(strength: f32, angle: f32) -> Self {
        Self {
            light_type: LightType::Sun,
            energy: strength,
            sun_angle: angle,
            ..Default::default()
        }
    }

    /// Spot light with full cone angle `spot_size`
    pub fn spot(energy: f32, spot_size: f32, spot_blend: f32) -> Self {
        Self {
            light_type: LightType::Spot,
            energy,
            spot_size,
            spot_blend,
            ..Default::default()
        }
    }

    /// Area light
    pub fn area(energy: f32, shape: AreaShape, size: f32, size_y: f32) -> Self {
        Self {
            light_type: LightType::Area,
            energy,
            area_shape: shape,
            size,
            size_y,
            ..Default::default()
        }
    }

    /// Set the colour
    #[must_use]
    pub const fn with_color(mut self, color: Vec3) -> Self {
        self.color = color;
        self
    }
}

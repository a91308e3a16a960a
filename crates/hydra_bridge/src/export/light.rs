//! Light export
//!
//! Maps host light types onto the four Hydra light prims. Shape parameters
//! are only emitted for combinations that have a defined mapping.

use std::f32::consts::PI;

use crate::foundation::math::rad_to_deg;
use crate::host::{AreaShape, HostLight, LightType};
use crate::scene::{tokens, AttributeCache, PrimType};

/// Exported light: the prim type to insert plus its parameters
#[derive(Debug, Clone, PartialEq)]
pub struct LightExport {
    /// Which light sprim represents this light
    pub prim_type: PrimType,
    /// Light parameters
    pub attributes: AttributeCache,
}

/// Export a host light.
///
/// Power conversion: sun strength is passed through as irradiance; every
/// other type has its wattage spread over the sphere (`energy / 4π`) with
/// `normalize` on, so emitter size does not change brightness.
pub fn export_light(light: &HostLight) -> LightExport {
    let mut attributes = AttributeCache::new()
        .with(tokens::COLOR, light.color)
        .with(tokens::EXPOSURE, 0.0_f32)
        .with(tokens::SHADOW_ENABLE, light.cast_shadows);

    let prim_type = match light.light_type {
        LightType::Point => {
            attributes.set(tokens::RADIUS, light.radius);
            PrimType::SphereLight
        }
        LightType::Spot => {
            attributes.set(tokens::RADIUS, light.radius);
            attributes.set(tokens::SHAPING_CONE_ANGLE, rad_to_deg(light.spot_size * 0.5));
            attributes.set(tokens::SHAPING_CONE_SOFTNESS, light.spot_blend);
            attributes.set(tokens::TREAT_AS_POINT, true);
            PrimType::SphereLight
        }
        LightType::Sun => {
            attributes.set(tokens::ANGLE, rad_to_deg(light.sun_angle));
            PrimType::DistantLight
        }
        LightType::Area => match light.area_shape {
            AreaShape::Square => {
                attributes.set(tokens::WIDTH, light.size);
                attributes.set(tokens::HEIGHT, light.size);
                PrimType::RectLight
            }
            AreaShape::Rectangle => {
                attributes.set(tokens::WIDTH, light.size);
                attributes.set(tokens::HEIGHT, light.size_y);
                PrimType::RectLight
            }
            AreaShape::Disk => {
                attributes.set(tokens::RADIUS, light.size * 0.5);
                PrimType::DiskLight
            }
            AreaShape::Ellipse => {
                attributes.set(tokens::RADIUS, (light.size + light.size_y) * 0.25);
                PrimType::DiskLight
            }
            AreaShape::Other(code) => {
                log::debug!("Unknown area light shape {}, exporting without size", code);
                PrimType::RectLight
            }
        },
    };

    if prim_type == PrimType::DistantLight {
        attributes.set(tokens::INTENSITY, light.energy);
        attributes.set(tokens::NORMALIZE, false);
    } else {
        attributes.set(tokens::INTENSITY, light.energy / (4.0 * PI));
        attributes.set(tokens::NORMALIZE, true);
    }

    LightExport {
        prim_type,
        attributes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Value;
    use approx::assert_relative_eq;

    fn float(export: &LightExport, token: &str) -> Option<f32> {
        export.attributes.get(token).and_then(Value::as_float)
    }

    #[test]
    fn test_sun_angle_in_degrees() {
        let export = export_light(&HostLight::sun(3.0, 0.2));
        assert_eq!(export.prim_type, PrimType::DistantLight);
        assert_relative_eq!(float(&export, tokens::ANGLE).unwrap(), 0.2 * 180.0 / PI, epsilon = 1e-5);
        assert_relative_eq!(float(&export, tokens::INTENSITY).unwrap(), 3.0);
        assert_eq!(float(&export, tokens::RADIUS), None);
    }

    #[test]
    fn test_spot_is_sphere_with_shaping() {
        let export = export_light(&HostLight::spot(100.0, PI / 2.0, 0.3));
        assert_eq!(export.prim_type, PrimType::SphereLight);
        assert_relative_eq!(float(&export, tokens::SHAPING_CONE_ANGLE).unwrap(), 45.0, epsilon = 1e-4);
        assert_relative_eq!(float(&export, tokens::SHAPING_CONE_SOFTNESS).unwrap(), 0.3);
        assert_eq!(
            export.attributes.get(tokens::TREAT_AS_POINT),
            Some(&Value::Bool(true))
        );
    }

    #[test]
    fn test_point_light_is_not_treated_as_point() {
        let export = export_light(&HostLight::point(100.0, 0.25));
        assert_eq!(export.prim_type, PrimType::SphereLight);
        assert_relative_eq!(float(&export, tokens::RADIUS).unwrap(), 0.25);
        assert!(!export.attributes.contains(tokens::TREAT_AS_POINT));
        assert!(!export.attributes.contains(tokens::SHAPING_CONE_ANGLE));
    }

    #[test]
    fn test_area_shapes() {
        let square = export_light(&HostLight::area(10.0, AreaShape::Square, 2.0, 5.0));
        assert_eq!(square.prim_type, PrimType::RectLight);
        assert_relative_eq!(float(&square, tokens::HEIGHT).unwrap(), 2.0);

        let rect = export_light(&HostLight::area(10.0, AreaShape::Rectangle, 2.0, 5.0));
        assert_relative_eq!(float(&rect, tokens::WIDTH).unwrap(), 2.0);
        assert_relative_eq!(float(&rect, tokens::HEIGHT).unwrap(), 5.0);

        let disk = export_light(&HostLight::area(10.0, AreaShape::Disk, 2.0, 5.0));
        assert_eq!(disk.prim_type, PrimType::DiskLight);
        assert_relative_eq!(float(&disk, tokens::RADIUS).unwrap(), 1.0);

        let ellipse = export_light(&HostLight::area(10.0, AreaShape::Ellipse, 2.0, 4.0));
        assert_relative_eq!(float(&ellipse, tokens::RADIUS).unwrap(), 1.5);
    }

    #[test]
    fn test_unknown_area_shape_has_no_size() {
        let export = export_light(&HostLight::area(10.0, AreaShape::Other(7), 2.0, 5.0));
        assert_eq!(export.prim_type, PrimType::RectLight);
        assert!(!export.attributes.contains(tokens::WIDTH));
        assert!(!export.attributes.contains(tokens::HEIGHT));
        assert!(!export.attributes.contains(tokens::RADIUS));
        assert!(export.attributes.contains(tokens::INTENSITY));
    }
}

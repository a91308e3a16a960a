//! Software rasterizer standing in for a render delegate
//!
//! Draws every synced mesh as flat-shaded triangles lit by the first distant
//! light. Surface colour comes from the mesh's exported material document.

use std::collections::HashMap;
use std::path::PathBuf;

use hydra_bridge::engine::{EngineError, FrameContext, RenderBuffer, RenderExecutor};
use hydra_bridge::foundation::math::{Mat4, Vec3};
use hydra_bridge::scene::{tokens, MemoryRenderIndex, PrimType, SyncedMesh};

use crate::exporter::read_base_color;

const DEFAULT_SURFACE: [f32; 3] = [0.6, 0.6, 0.6];
const AMBIENT: f32 = 0.15;

/// Key light pulled from the index
struct KeyLight {
    /// Unit vector pointing towards the light
    direction: Vec3,
    color: Vec3,
}

impl Default for KeyLight {
    fn default() -> Self {
        Self {
            direction: Vec3::new(0.3, 0.5, 0.8).normalize(),
            color: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

/// Depth-buffered triangle rasterizer
#[derive(Default)]
pub struct Rasterizer {
    depth: Vec<f32>,
    surfaces: HashMap<PathBuf, [f32; 3]>,
}

impl Rasterizer {
    pub fn new() -> Self {
        Self::default()
    }

    fn surface_color(&mut self, index: &MemoryRenderIndex, mesh: &SyncedMesh) -> [f32; 3] {
        let Some(resource) = mesh
            .material
            .as_ref()
            .and_then(|id| index.synced(id))
            .and_then(|prim| prim.as_material())
            .and_then(|material| material.resource.clone())
        else {
            return DEFAULT_SURFACE;
        };

        *self.surfaces.entry(resource).or_insert_with_key(|path| {
            read_base_color(path).unwrap_or_else(|| {
                log::warn!("Unreadable material document {}", path.display());
                DEFAULT_SURFACE
            })
        })
    }
}

fn key_light(index: &MemoryRenderIndex) -> KeyLight {
    index
        .synced_prims()
        .filter(|(id, _)| index.prim_type(id) == Some(PrimType::DistantLight))
        .find_map(|(_, prim)| prim.as_light())
        .map_or_else(KeyLight::default, |light| {
            // Distant lights shine down their local -Z axis
            let direction = light.transform.transform_vector(&Vec3::z()).normalize();
            let color = light
                .params
                .get(tokens::COLOR)
                .and_then(|value| value.as_vec3())
                .copied()
                .unwrap_or_else(|| Vec3::new(1.0, 1.0, 1.0));
            KeyLight { direction, color }
        })
}

/// Project `point` to (pixel x, pixel y, ndc depth), `None` behind the eye
fn project(mvp: &Mat4, point: &Vec3, width: f32, height: f32, jitter: (f32, f32)) -> Option<Vec3> {
    let clip = mvp * point.push(1.0);
    if clip.w <= f32::EPSILON {
        return None;
    }
    let ndc = clip.xyz() / clip.w;
    Some(Vec3::new(
        (ndc.x * 0.5 + 0.5) * width + jitter.0,
        (0.5 - ndc.y * 0.5) * height + jitter.1,
        ndc.z,
    ))
}

fn edge(a: &Vec3, b: &Vec3, x: f32, y: f32) -> f32 {
    (b.x - a.x) * (y - a.y) - (b.y - a.y) * (x - a.x)
}

/// Sub-pixel offset for `sample`, from the base-2/base-3 Halton sequence
fn jitter(sample: u32) -> (f32, f32) {
    fn radical_inverse(mut n: u32, base: u32) -> f32 {
        let mut result = 0.0;
        let mut fraction = 1.0 / base as f32;
        while n > 0 {
            result += (n % base) as f32 * fraction;
            n /= base;
            fraction /= base as f32;
        }
        result
    }
    if sample == 0 {
        return (0.0, 0.0);
    }
    (radical_inverse(sample, 2) - 0.5, radical_inverse(sample, 3) - 0.5)
}

impl RenderExecutor for Rasterizer {
    fn execute(&mut self, frame: &FrameContext<'_>, target: &mut RenderBuffer) -> Result<(), EngineError> {
        let (width, height) = (target.width(), target.height());
        self.depth.clear();
        self.depth.resize((width * height) as usize, f32::INFINITY);
        // Documents are rewritten in place on re-export
        self.surfaces.clear();

        let view_projection = frame.camera.projection_matrix() * frame.camera.view_matrix();
        let light = key_light(frame.index);
        let offset = jitter(frame.sample);

        for (id, prim) in frame.index.synced_prims() {
            let Some(mesh) = prim.as_mesh() else {
                continue;
            };
            if !mesh.visible {
                continue;
            }

            let surface = Vec3::from(self.surface_color(frame.index, mesh));
            let mvp = view_projection * mesh.transform;
            let world: Vec<Vec3> = mesh
                .points
                .iter()
                .map(|p| mesh.transform.transform_point(&(*p).into()).coords)
                .collect();
            let screen: Vec<Option<Vec3>> = mesh
                .points
                .iter()
                .map(|p| project(&mvp, p, width as f32, height as f32, offset))
                .collect();

            let mut drawn = 0usize;
            for triangle in mesh.topology.face_vertex_indices.chunks_exact(3) {
                let Some(corners) = triangle
                    .iter()
                    .map(|&i| usize::try_from(i).ok())
                    .collect::<Option<Vec<usize>>>()
                else {
                    continue;
                };
                let (Some(Some(a)), Some(Some(b)), Some(Some(c))) = (
                    screen.get(corners[0]),
                    screen.get(corners[1]),
                    screen.get(corners[2]),
                ) else {
                    continue;
                };

                let normal = (world[corners[1]] - world[corners[0]])
                    .cross(&(world[corners[2]] - world[corners[0]]))
                    .normalize();
                let lambert = normal.dot(&light.direction).abs();
                let shade = surface.component_mul(&light.color) * lambert + surface * AMBIENT;
                let color = [shade.x.min(1.0), shade.y.min(1.0), shade.z.min(1.0), 1.0];

                let area = edge(a, b, c.x, c.y);
                if area.abs() <= f32::EPSILON {
                    continue;
                }

                let min_x = a.x.min(b.x).min(c.x).floor().max(0.0) as u32;
                let min_y = a.y.min(b.y).min(c.y).floor().max(0.0) as u32;
                let max_x = (a.x.max(b.x).max(c.x).ceil().max(0.0) as u32).min(width);
                let max_y = (a.y.max(b.y).max(c.y).ceil().max(0.0) as u32).min(height);

                for y in min_y..max_y {
                    for x in min_x..max_x {
                        let (px, py) = (x as f32 + 0.5, y as f32 + 0.5);
                        let w0 = edge(b, c, px, py) / area;
                        let w1 = edge(c, a, px, py) / area;
                        let w2 = edge(a, b, px, py) / area;
                        if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                            continue;
                        }

                        let z = w0 * a.z + w1 * b.z + w2 * c.z;
                        if !(-1.0..=1.0).contains(&z) {
                            continue;
                        }
                        let slot = (y * width + x) as usize;
                        if z < self.depth[slot] {
                            self.depth[slot] = z;
                            target.set_pixel(x, y, color);
                        }
                    }
                }
                drawn += 1;
            }
            log::trace!("{} drew {} triangles", id, drawn);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_sample_is_centred() {
        assert_eq!(jitter(0), (0.0, 0.0));
        let (x, y) = jitter(3);
        assert!((-0.5..0.5).contains(&x) && (-0.5..0.5).contains(&y));
    }

    #[test]
    fn test_project_behind_camera() {
        let identity = Mat4::identity();
        let centre = project(&identity, &Vec3::zeros(), 10.0, 10.0, (0.0, 0.0)).unwrap();
        assert_eq!((centre.x, centre.y), (5.0, 5.0));

        let mut flip = Mat4::identity();
        flip[(3, 3)] = -1.0;
        assert!(project(&flip, &Vec3::zeros(), 10.0, 10.0, (0.0, 0.0)).is_none());
    }
}

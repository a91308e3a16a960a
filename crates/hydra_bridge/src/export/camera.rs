//! Camera export
//!
//! Two entry points: the scene camera used by final renders, and the live
//! viewport used by interactive renders. Both produce the same
//! [`CameraParams`], which the render loop forwards untouched.

use crate::foundation::math::{Mat4, Vec2, Vec3};
use crate::host::{CameraProjection, HostCamera, HostObject, SensorFit, ViewPerspective, ViewportState};

/// Sensor width the viewport uses for its free-navigation lens (mm)
pub const VIEWPORT_SENSOR_SIZE: f32 = 72.0;

/// Upper bound on orthographic clip depth; larger values produce
/// degenerate projection matrices.
pub const MAX_ORTHO_DEPTH: f32 = 1000.0;

/// Projection mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionMode {
    /// Pinhole perspective
    Perspective,
    /// Parallel projection
    Orthographic,
}

/// Everything the render side needs to set up a camera
#[derive(Debug, Clone, PartialEq)]
pub struct CameraParams {
    /// Projection mode
    pub mode: ProjectionMode,
    /// Camera-to-world matrix
    pub transform: Mat4,
    /// Near and far clip distances
    pub clip_range: (f32, f32),
    /// Focal length (mm)
    pub focal_length: f32,
    /// Sensor size after fitting to the aspect ratio (mm)
    pub sensor_size: Vec2,
    /// Lens shift in units of the sensor
    pub lens_shift: Vec2,
    /// Orthographic view extent
    pub ortho_size: Vec2,
}

impl CameraParams {
    /// Horizontal field of view in radians (perspective only)
    pub fn horizontal_fov(&self) -> f32 {
        2.0 * (self.sensor_size.x / (2.0 * self.focal_length)).atan()
    }

    /// World-to-camera matrix
    pub fn view_matrix(&self) -> Mat4 {
        self.transform.try_inverse().unwrap_or_else(Mat4::identity)
    }

    /// Camera-to-clip matrix (OpenGL conventions, camera looks down -Z).
    ///
    /// Lens shift is applied in clip space, in units of the larger sensor
    /// dimension.
    pub fn projection_matrix(&self) -> Mat4 {
        let (near, far) = self.clip_range;
        let projection = match self.mode {
            ProjectionMode::Perspective => {
                let fov_y = 2.0 * (self.sensor_size.y / (2.0 * self.focal_length)).atan();
                Mat4::new_perspective(self.sensor_size.x / self.sensor_size.y, fov_y, near, far)
            }
            ProjectionMode::Orthographic => {
                let half = self.ortho_size * 0.5;
                Mat4::new_orthographic(-half.x, half.x, -half.y, half.y, near, far)
            }
        };

        let larger = self.sensor_size.x.max(self.sensor_size.y);
        let shift = Vec3::new(
            2.0 * self.lens_shift.x * larger / self.sensor_size.x,
            2.0 * self.lens_shift.y * larger / self.sensor_size.y,
            0.0,
        );
        Mat4::new_translation(&shift) * projection
    }
}

/// Fit a `width` x `height` frame to `ratio` (width / height).
fn fit_to_ratio(fit: SensorFit, width: f32, height: f32, ratio: f32) -> Vec2 {
    match fit {
        SensorFit::Vertical => Vec2::new(height * ratio, height),
        SensorFit::Horizontal => Vec2::new(width, width / ratio),
        SensorFit::Auto => {
            if ratio > 1.0 {
                Vec2::new(width, width / ratio)
            } else {
                Vec2::new(width * ratio, width)
            }
        }
    }
}

/// Parameters of the scene camera `object` for an image of aspect `ratio`.
pub fn export_scene_camera(object: &HostObject, camera: &HostCamera, ratio: f32) -> CameraParams {
    let mode = match camera.projection {
        CameraProjection::Orthographic => ProjectionMode::Orthographic,
        CameraProjection::Perspective => ProjectionMode::Perspective,
        CameraProjection::Panoramic => {
            log::warn!(
                "Camera {:?} is panoramic; rendering with perspective projection",
                object.name
            );
            ProjectionMode::Perspective
        }
    };

    CameraParams {
        mode,
        transform: object.matrix_world,
        clip_range: (camera.clip_start, camera.clip_end),
        focal_length: camera.lens,
        sensor_size: fit_to_ratio(
            camera.sensor_fit,
            camera.sensor_width,
            camera.sensor_height,
            ratio,
        ),
        lens_shift: Vec2::new(camera.shift_x, camera.shift_y),
        ortho_size: fit_to_ratio(camera.sensor_fit, camera.ortho_scale, camera.ortho_scale, ratio),
    }
}

fn free_perspective(viewport: &ViewportState, ratio: f32) -> CameraParams {
    CameraParams {
        mode: ProjectionMode::Perspective,
        transform: viewport.view_inverse,
        clip_range: (viewport.clip_start, viewport.clip_end),
        focal_length: viewport.lens,
        sensor_size: fit_to_ratio(SensorFit::Auto, VIEWPORT_SENSOR_SIZE, VIEWPORT_SENSOR_SIZE, ratio),
        lens_shift: Vec2::zeros(),
        ortho_size: Vec2::zeros(),
    }
}

/// Parameters of the interactive viewport.
///
/// `scene_camera` is only consulted when the viewport looks through the
/// camera; without one the free perspective view is used.
pub fn export_viewport_camera(
    viewport: &ViewportState,
    scene_camera: Option<(&HostObject, &HostCamera)>,
) -> CameraParams {
    let ratio = viewport.aspect_ratio();

    match viewport.perspective {
        ViewPerspective::Perspective => free_perspective(viewport, ratio),
        ViewPerspective::Orthographic => {
            let size = viewport.view_distance * VIEWPORT_SENSOR_SIZE / viewport.lens;
            let depth = viewport.clip_end.min(MAX_ORTHO_DEPTH);
            CameraParams {
                mode: ProjectionMode::Orthographic,
                clip_range: (-depth * 0.5, depth * 0.5),
                ortho_size: fit_to_ratio(SensorFit::Auto, size, size, ratio),
                ..free_perspective(viewport, ratio)
            }
        }
        ViewPerspective::Camera => {
            let Some((object, camera)) = scene_camera else {
                log::debug!("Viewport is locked to a camera but the scene has none");
                return free_perspective(viewport, ratio);
            };

            // Same frame scaling the host applies around the camera border
            let zoom = 4.0 / (std::f32::consts::SQRT_2 + viewport.camera_zoom / 50.0).powi(2);

            let mut params = export_scene_camera(object, camera, ratio);
            params.sensor_size *= zoom;
            params.ortho_size *= zoom;
            params.lens_shift = Vec2::new(
                (camera.shift_x + viewport.camera_offset.x * 2.0) / zoom,
                (camera.shift_y + viewport.camera_offset.y * 2.0) / zoom,
            );
            params
        }
    }
}

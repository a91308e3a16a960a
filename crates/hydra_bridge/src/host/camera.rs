//! Host camera data-block and live viewport navigation state

use crate::foundation::math::{Mat4, Vec2};

/// Camera projection type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraProjection {
    /// Pinhole perspective
    Perspective,
    /// Parallel projection
    Orthographic,
    /// Panoramic projections; rendered as perspective by this bridge
    Panoramic,
}

/// Which sensor dimension is held fixed when the aspect ratio changes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorFit {
    /// Fit the larger image dimension to `sensor_width`
    Auto,
    /// Fit the image width to `sensor_width`
    Horizontal,
    /// Fit the image height to `sensor_height`
    Vertical,
}

/// Camera data as stored by the host
#[derive(Debug, Clone, PartialEq)]
pub struct HostCamera {
    /// Projection type
    pub projection: CameraProjection,
    /// Focal length in millimetres
    pub lens: f32,
    /// Sensor width in millimetres
    pub sensor_width: f32,
    /// Sensor height in millimetres
    pub sensor_height: f32,
    /// Sensor fit mode
    pub sensor_fit: SensorFit,
    /// Horizontal lens shift, in units of the larger sensor dimension
    pub shift_x: f32,
    /// Vertical lens shift
    pub shift_y: f32,
    /// Near clip distance
    pub clip_start: f32,
    /// Far clip distance
    pub clip_end: f32,
    /// Orthographic view width
    pub ortho_scale: f32,
}

impl Default for HostCamera {
    fn default() -> Self {
        Self {
            projection: CameraProjection::Perspective,
            lens: 50.0,
            sensor_width: 36.0,
            sensor_height: 24.0,
            sensor_fit: SensorFit::Auto,
            shift_x: 0.0,
            shift_y: 0.0,
            clip_start: 0.1,
            clip_end: 100.0,
            ortho_scale: 6.0,
        }
    }
}

/// How the 3D viewport is currently looking at the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewPerspective {
    /// Free perspective navigation
    Perspective,
    /// Free orthographic navigation
    Orthographic,
    /// Looking through the scene camera
    Camera,
}

/// Live viewport navigation state
#[derive(Debug, Clone, PartialEq)]
pub struct ViewportState {
    /// Navigation mode
    pub perspective: ViewPerspective,
    /// Camera-to-world matrix of the viewport eye
    pub view_inverse: Mat4,
    /// Distance from the eye to the orbit pivot
    pub view_distance: f32,
    /// Viewport focal length in millimetres
    pub lens: f32,
    /// Near clip distance
    pub clip_start: f32,
    /// Far clip distance
    pub clip_end: f32,
    /// Zoom of the camera frame when looking through the scene camera
    pub camera_zoom: f32,
    /// Pan of the camera frame when looking through the scene camera
    pub camera_offset: Vec2,
    /// Region width in pixels
    pub width: u32,
    /// Region height in pixels
    pub height: u32,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self {
            perspective: ViewPerspective::Perspective,
            view_inverse: Mat4::identity(),
            view_distance: 10.0,
            lens: 50.0,
            clip_start: 0.01,
            clip_end: 1000.0,
            camera_zoom: 0.0,
            camera_offset: Vec2::zeros(),
            width: 1280,
            height: 720,
        }
    }
}

impl ViewportState {
    /// Region width divided by height
    pub fn aspect_ratio(&self) -> f32 {
        self.width.max(1) as f32 / self.height.max(1) as f32
    }
}

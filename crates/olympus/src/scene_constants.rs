use crate::camera::Camera;
use bevy_math::Mat4;

/// Per-frame constant buffer, register b0.
///
/// Matrices are stored column major, which is what HLSL expects by default.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneConstants {
    pub view: [f32; 16],
    pub projection: [f32; 16],
    pub eye_position: [f32; 4],
}

impl SceneConstants {
    pub fn from_camera(camera: &Camera) -> Self {
        Self {
            view: camera.view().to_cols_array(),
            projection: camera.projection().to_cols_array(),
            eye_position: camera.position().extend(1.0).to_array(),
        }
    }
}

/// Per-object constant buffer, register b1.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ObjectConstants {
    pub world: [f32; 16],
}

impl ObjectConstants {
    pub fn from_world(world: Mat4) -> Self {
        Self {
            world: world.to_cols_array(),
        }
    }
}

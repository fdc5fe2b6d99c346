pub mod camera;
pub mod camera_controller;
pub mod engine_config;
pub mod engine_error;
pub mod frame_clock;
pub mod particles;
pub mod scene_constants;
pub mod skybox_mesh;
pub mod vertex;
pub mod window_event;

#[cfg(windows)]
pub mod d3d11;
#[cfg(windows)]
pub mod system;
#[cfg(windows)]
pub mod win32;

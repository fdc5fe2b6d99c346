use crate::camera::Camera;
use crate::engine_error::EngineResult;
use windows::Win32::Graphics::Direct3D11::*;

/// Something the render manager draws every frame.
///
/// Implementors own their per-object constant buffers; the per-scene buffer is
/// already bound at register b0 when `render` is called.
pub trait Renderable {
    fn render(
        &mut self,
        context: &ID3D11DeviceContext,
        scene_buffer: &ID3D11Buffer,
        camera: &Camera,
        pass: u32,
    ) -> EngineResult<()>;
}

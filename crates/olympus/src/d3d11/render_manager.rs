use crate::camera::Camera;
use crate::d3d11::constant_buffer::ConstantBuffer;
use crate::d3d11::renderable::Renderable;
use crate::engine_error::EngineResult;
use crate::scene_constants::SceneConstants;
use eyre::WrapErr;
use eyre::eyre;
use tracing::debug;
use windows::Win32::Graphics::Direct3D11::*;
use windows::Win32::Graphics::Dxgi::*;

/// Owns the back-buffer target and draws every registered [`Renderable`] once per frame.
pub struct RenderManager {
    context: ID3D11DeviceContext,
    render_target_view: ID3D11RenderTargetView,
    scene_constants: ConstantBuffer<SceneConstants>,
    renderables: Vec<Box<dyn Renderable>>,
    clear_color: [f32; 4],
}

impl RenderManager {
    pub fn new(
        device: &ID3D11Device,
        context: &ID3D11DeviceContext,
        swap_chain: &IDXGISwapChain,
        clear_color: [f32; 4],
    ) -> EngineResult<Self> {
        let back_buffer: ID3D11Texture2D =
            unsafe { swap_chain.GetBuffer(0) }.wrap_err("fetching the back buffer")?;
        let mut render_target_view: Option<ID3D11RenderTargetView> = None;
        unsafe { device.CreateRenderTargetView(&back_buffer, None, Some(&mut render_target_view)) }
            .wrap_err("CreateRenderTargetView failed")?;
        let render_target_view =
            render_target_view.ok_or_else(|| eyre!("CreateRenderTargetView returned nothing"))?;

        Ok(Self {
            context: context.clone(),
            render_target_view,
            scene_constants: ConstantBuffer::new(device)?,
            renderables: Vec::new(),
            clear_color,
        })
    }

    pub fn add(&mut self, renderable: Box<dyn Renderable>) {
        self.renderables.push(renderable);
        debug!("{} renderables registered", self.renderables.len());
    }

    pub fn render(&mut self, camera: &Camera) -> EngineResult<()> {
        let context = &self.context;
        unsafe {
            context.OMSetRenderTargets(Some(&[Some(self.render_target_view.clone())]), None);
            context.ClearRenderTargetView(&self.render_target_view, &self.clear_color);
        }

        self.scene_constants
            .update(context, &SceneConstants::from_camera(camera));
        let scene_buffer = self.scene_constants.buffer();
        unsafe {
            context.VSSetConstantBuffers(0, Some(&[Some(scene_buffer.clone())]));
            context.PSSetConstantBuffers(0, Some(&[Some(scene_buffer.clone())]));
        }

        for renderable in &mut self.renderables {
            renderable.render(context, scene_buffer, camera, 0)?;
        }
        Ok(())
    }
}

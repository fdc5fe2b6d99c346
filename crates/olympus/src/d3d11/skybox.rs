use crate::camera::Camera;
use crate::d3d11::constant_buffer::ConstantBuffer;
use crate::d3d11::renderable::Renderable;
use crate::engine_error::EngineResult;
use crate::scene_constants::ObjectConstants;
use crate::skybox_mesh::skybox_cube;
use crate::vertex::Vertex;
use bevy_math::Mat4;
use eyre::WrapErr;
use eyre::eyre;
use windows::Win32::Graphics::Direct3D::*;
use windows::Win32::Graphics::Direct3D11::*;
use windows::Win32::Graphics::Dxgi::Common::*;

/// An inside-out cube that follows the camera.
pub struct Skybox {
    vertex_buffer: ID3D11Buffer,
    index_buffer: ID3D11Buffer,
    index_count: u32,
    object_constants: ConstantBuffer<ObjectConstants>,
    rasterizer_state: ID3D11RasterizerState,
}

impl Skybox {
    pub const HALF_EXTENT: f32 = 500.0;

    pub fn new(device: &ID3D11Device) -> EngineResult<Self> {
        let mesh = skybox_cube(Self::HALF_EXTENT);
        let vertex_buffer = create_immutable_buffer(device, &mesh.vertices, D3D11_BIND_VERTEX_BUFFER)
            .wrap_err("creating skybox vertex buffer")?;
        let index_buffer = create_immutable_buffer(device, &mesh.indices, D3D11_BIND_INDEX_BUFFER)
            .wrap_err("creating skybox index buffer")?;

        // The camera sits inside the cube, so draw both windings.
        let rasterizer_desc = D3D11_RASTERIZER_DESC {
            FillMode: D3D11_FILL_SOLID,
            CullMode: D3D11_CULL_NONE,
            DepthClipEnable: true.into(),
            MultisampleEnable: true.into(),
            ..Default::default()
        };
        let mut rasterizer_state: Option<ID3D11RasterizerState> = None;
        unsafe { device.CreateRasterizerState(&rasterizer_desc, Some(&mut rasterizer_state))? };

        Ok(Self {
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as u32,
            object_constants: ConstantBuffer::new(device)?,
            rasterizer_state: rasterizer_state
                .ok_or_else(|| eyre!("CreateRasterizerState returned nothing"))?,
        })
    }
}

impl Renderable for Skybox {
    fn render(
        &mut self,
        context: &ID3D11DeviceContext,
        _scene_buffer: &ID3D11Buffer,
        camera: &Camera,
        _pass: u32,
    ) -> EngineResult<()> {
        let world = Mat4::from_translation(camera.position());
        self.object_constants
            .update(context, &ObjectConstants::from_world(world));

        let stride = std::mem::size_of::<Vertex>() as u32;
        let offset = 0u32;
        unsafe {
            context.VSSetConstantBuffers(1, Some(&[Some(self.object_constants.buffer().clone())]));
            context.IASetVertexBuffers(
                0,
                1,
                Some(&Some(self.vertex_buffer.clone())),
                Some(&stride),
                Some(&offset),
            );
            context.IASetIndexBuffer(&self.index_buffer, DXGI_FORMAT_R16_UINT, 0);
            context.IASetPrimitiveTopology(D3D11_PRIMITIVE_TOPOLOGY_TRIANGLELIST);
            context.RSSetState(&self.rasterizer_state);
            context.DrawIndexed(self.index_count, 0, 0);
        }
        Ok(())
    }
}

fn create_immutable_buffer<T: Copy>(
    device: &ID3D11Device,
    contents: &[T],
    bind: D3D11_BIND_FLAG,
) -> eyre::Result<ID3D11Buffer> {
    let desc = D3D11_BUFFER_DESC {
        ByteWidth: std::mem::size_of_val(contents) as u32,
        Usage: D3D11_USAGE_IMMUTABLE,
        BindFlags: bind.0 as u32,
        ..Default::default()
    };
    let initial_data = D3D11_SUBRESOURCE_DATA {
        pSysMem: contents.as_ptr() as *const _,
        ..Default::default()
    };
    let mut buffer: Option<ID3D11Buffer> = None;
    unsafe { device.CreateBuffer(&desc, Some(&initial_data), Some(&mut buffer))? };
    buffer.ok_or_else(|| eyre!("CreateBuffer returned no buffer"))
}

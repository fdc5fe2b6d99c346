use crate::d3d11::compile_shader::blob_bytes;
use crate::d3d11::compile_shader::compile_shader;
use crate::engine_config::EngineConfig;
use crate::engine_error::EngineResult;
use crate::vertex::VERTEX_LAYOUT;
use eyre::WrapErr;
use eyre::eyre;
use tracing::info;
use windows::Win32::Graphics::Direct3D11::*;
use windows::core::PCSTR;

/// The vertex/pixel shader pair and the input layout matching [`crate::vertex::Vertex`].
pub struct ShaderPipeline {
    pub vertex_shader: ID3D11VertexShader,
    pub pixel_shader: ID3D11PixelShader,
    pub input_layout: ID3D11InputLayout,
}

impl ShaderPipeline {
    pub fn new(device: &ID3D11Device, config: &EngineConfig) -> EngineResult<Self> {
        let shader_path = config.resolve_shader_path()?;
        info!("Compiling shaders from {}", shader_path.display());

        let vs_blob = compile_shader(&shader_path, &config.vertex_entry, &config.vertex_target)?;
        let ps_blob = compile_shader(&shader_path, &config.pixel_entry, &config.pixel_target)?;
        let vs_bytecode = blob_bytes(&vs_blob);
        let ps_bytecode = blob_bytes(&ps_blob);

        let mut vertex_shader: Option<ID3D11VertexShader> = None;
        unsafe { device.CreateVertexShader(vs_bytecode, None, Some(&mut vertex_shader)) }
            .wrap_err("CreateVertexShader failed")?;
        let mut pixel_shader: Option<ID3D11PixelShader> = None;
        unsafe { device.CreatePixelShader(ps_bytecode, None, Some(&mut pixel_shader)) }
            .wrap_err("CreatePixelShader failed")?;

        let input_element_descs = VERTEX_LAYOUT.map(|element| D3D11_INPUT_ELEMENT_DESC {
            SemanticName: PCSTR(element.semantic.as_ptr() as *const u8),
            SemanticIndex: 0,
            Format: element.format,
            InputSlot: 0,
            AlignedByteOffset: element.offset,
            InputSlotClass: D3D11_INPUT_PER_VERTEX_DATA,
            InstanceDataStepRate: 0,
        });
        let mut input_layout: Option<ID3D11InputLayout> = None;
        unsafe { device.CreateInputLayout(&input_element_descs, vs_bytecode, Some(&mut input_layout)) }
            .wrap_err("CreateInputLayout failed")?;

        match (vertex_shader, pixel_shader, input_layout) {
            (Some(vertex_shader), Some(pixel_shader), Some(input_layout)) => Ok(Self {
                vertex_shader,
                pixel_shader,
                input_layout,
            }),
            _ => Err(eyre!("shader object creation returned nothing").into()),
        }
    }

    pub fn bind(&self, context: &ID3D11DeviceContext) {
        unsafe {
            context.VSSetShader(&self.vertex_shader, None);
            context.PSSetShader(&self.pixel_shader, None);
            context.IASetInputLayout(&self.input_layout);
        }
    }
}

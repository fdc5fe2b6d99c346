use crate::engine_error::EngineResult;
use eyre::eyre;
use std::marker::PhantomData;
use windows::Win32::Graphics::Direct3D11::*;

/// A GPU constant buffer holding exactly one `T`.
pub struct ConstantBuffer<T> {
    buffer: ID3D11Buffer,
    _contents: PhantomData<T>,
}

impl<T: Copy> ConstantBuffer<T> {
    pub fn new(device: &ID3D11Device) -> EngineResult<Self> {
        let size = std::mem::size_of::<T>();
        if size % 16 != 0 {
            return Err(eyre!("constant buffer size {size} is not a multiple of 16").into());
        }
        let desc = D3D11_BUFFER_DESC {
            ByteWidth: size as u32,
            Usage: D3D11_USAGE_DEFAULT,
            BindFlags: D3D11_BIND_CONSTANT_BUFFER.0 as u32,
            ..Default::default()
        };
        let mut buffer: Option<ID3D11Buffer> = None;
        unsafe { device.CreateBuffer(&desc, None, Some(&mut buffer))? };
        let buffer = buffer.ok_or_else(|| eyre!("CreateBuffer returned no buffer"))?;
        Ok(Self {
            buffer,
            _contents: PhantomData,
        })
    }

    pub fn update(&self, context: &ID3D11DeviceContext, contents: &T) {
        unsafe {
            context.UpdateSubresource(
                &self.buffer,
                0,
                None,
                contents as *const T as *const _,
                0,
                0,
            )
        };
    }

    pub fn buffer(&self) -> &ID3D11Buffer {
        &self.buffer
    }
}

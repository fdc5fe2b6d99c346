use std::ffi::CStr;
use windows::Win32::Graphics::Dxgi::Common::*;

/// Vertex format shared by every mesh the engine draws.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tangent: [f32; 3],
    pub tex_coord: [f32; 2],
}

/// One input-assembler element of [`Vertex`].
#[derive(Clone, Copy, Debug)]
pub struct VertexElement {
    pub semantic: &'static CStr,
    pub format: DXGI_FORMAT,
    pub offset: u32,
}

pub const VERTEX_LAYOUT: [VertexElement; 4] = [
    VertexElement {
        semantic: c"POSITION",
        format: DXGI_FORMAT_R32G32B32_FLOAT,
        offset: 0,
    },
    VertexElement {
        semantic: c"NORMAL",
        format: DXGI_FORMAT_R32G32B32_FLOAT,
        offset: 12,
    },
    VertexElement {
        semantic: c"TANGENT",
        format: DXGI_FORMAT_R32G32B32_FLOAT,
        offset: 24,
    },
    VertexElement {
        semantic: c"TEXCOORD",
        format: DXGI_FORMAT_R32G32_FLOAT,
        offset: 36,
    },
];

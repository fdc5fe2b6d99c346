use crate::engine_error::EngineResult;
use eyre::WrapErr;
use eyre::eyre;
use std::ffi::CString;
use std::path::Path;
use tracing::error;
use tracing::warn;
use windows::Win32::Graphics::Direct3D::Fxc::*;
use windows::Win32::Graphics::Direct3D::*;
use windows::core::*;

pub fn compile_flags() -> u32 {
    if cfg!(debug_assertions) {
        D3DCOMPILE_DEBUG | D3DCOMPILE_SKIP_OPTIMIZATION
    } else {
        0
    }
}

/// Compiles one entry point of an HLSL file.
pub fn compile_shader(hlsl_path: &Path, entry_point: &str, target: &str) -> EngineResult<ID3DBlob> {
    let hlsl: HSTRING = hlsl_path.as_os_str().into();
    let entry_point_c = CString::new(entry_point).wrap_err("entry point contains a nul")?;
    let target_c = CString::new(target).wrap_err("shader target contains a nul")?;

    let mut shader_blob: Option<ID3DBlob> = None;
    let mut error_blob: Option<ID3DBlob> = None;
    let result = unsafe {
        D3DCompileFromFile(
            &hlsl,
            None, // Defines
            None, // Include handler
            PCSTR(entry_point_c.as_ptr() as *const u8),
            PCSTR(target_c.as_ptr() as *const u8),
            compile_flags(),
            0, // Effect flags
            &mut shader_blob,
            Some(&mut error_blob),
        )
    };

    // Warnings come back in the error blob even when compilation succeeds.
    let diagnostics = error_blob.map(|blob| blob_to_string(&blob));

    match result {
        Err(e) => {
            if let Some(diagnostics) = &diagnostics {
                error!("Shader Compile Error ({entry_point} {target}): {diagnostics}");
            }
            Err(eyre::Report::new(e)
                .wrap_err(format!(
                    "compiling {} ({entry_point} {target})",
                    hlsl_path.display()
                ))
                .into())
        }
        Ok(()) => {
            if let Some(diagnostics) = diagnostics.filter(|text| !text.trim().is_empty()) {
                warn!("Shader Compile Warnings ({entry_point} {target}): {diagnostics}");
            }
            Ok(shader_blob.ok_or_else(|| eyre!("D3DCompileFromFile returned no bytecode"))?)
        }
    }
}

pub fn blob_bytes(blob: &ID3DBlob) -> &[u8] {
    unsafe { std::slice::from_raw_parts(blob.GetBufferPointer() as *const u8, blob.GetBufferSize()) }
}

fn blob_to_string(blob: &ID3DBlob) -> String {
    String::from_utf8_lossy(blob_bytes(blob))
        .trim_end_matches('\0')
        .to_string()
}

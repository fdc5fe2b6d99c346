use crate::engine_config::EngineConfig;
use crate::engine_error::EngineResult;
use eyre::WrapErr;
use eyre::eyre;
use tracing::info;
use tracing::warn;
use windows::Win32::Foundation::*;
use windows::Win32::Graphics::Direct3D::*;
use windows::Win32::Graphics::Direct3D11::*;
use windows::Win32::Graphics::Dxgi::Common::*;
use windows::Win32::Graphics::Dxgi::*;

/// Device, immediate context and swap chain, created together.
pub struct Graphics {
    pub device: ID3D11Device,
    pub context: ID3D11DeviceContext,
    pub swap_chain: IDXGISwapChain,
}

pub fn create_device_and_swap_chain(hwnd: HWND, config: &EngineConfig) -> EngineResult<Graphics> {
    let (width, height) = config.client_size;
    let swap_chain_desc = DXGI_SWAP_CHAIN_DESC {
        BufferDesc: DXGI_MODE_DESC {
            Width: width,
            Height: height,
            Format: DXGI_FORMAT_R8G8B8A8_UNORM,
            ..Default::default()
        },
        SampleDesc: DXGI_SAMPLE_DESC {
            Count: config.sample_count,
            Quality: 0,
        },
        BufferUsage: DXGI_USAGE_RENDER_TARGET_OUTPUT,
        BufferCount: 1,
        OutputWindow: hwnd,
        Windowed: TRUE,
        SwapEffect: DXGI_SWAP_EFFECT_DISCARD,
        Flags: DXGI_SWAP_CHAIN_FLAG_ALLOW_MODE_SWITCH.0 as u32,
    };

    let driver_type = match config.use_warp_device {
        true => {
            info!("Using WARP adapter.");
            D3D_DRIVER_TYPE_WARP
        }
        false => D3D_DRIVER_TYPE_HARDWARE,
    };

    if cfg!(debug_assertions) {
        match try_create(driver_type, D3D11_CREATE_DEVICE_DEBUG, &swap_chain_desc) {
            Ok(graphics) => {
                info!("D3D11 Debug Layer Enabled");
                return Ok(graphics);
            }
            // The debug layer needs the Graphics Tools optional feature.
            Err(e) => warn!("Warning: D3D11 Debug Layer unavailable ({e})."),
        }
    }
    try_create(driver_type, D3D11_CREATE_DEVICE_FLAG(0), &swap_chain_desc)
        .wrap_err("D3D11CreateDeviceAndSwapChain failed")
        .map_err(Into::into)
}

fn try_create(
    driver_type: D3D_DRIVER_TYPE,
    flags: D3D11_CREATE_DEVICE_FLAG,
    swap_chain_desc: &DXGI_SWAP_CHAIN_DESC,
) -> eyre::Result<Graphics> {
    let mut swap_chain: Option<IDXGISwapChain> = None;
    let mut device: Option<ID3D11Device> = None;
    let mut context: Option<ID3D11DeviceContext> = None;
    let mut feature_level = D3D_FEATURE_LEVEL::default();
    unsafe {
        D3D11CreateDeviceAndSwapChain(
            None,
            driver_type,
            HMODULE::default(),
            flags,
            None, // default feature levels
            D3D11_SDK_VERSION,
            Some(swap_chain_desc),
            Some(&mut swap_chain),
            Some(&mut device),
            Some(&mut feature_level),
            Some(&mut context),
        )?
    };

    let (Some(device), Some(context), Some(swap_chain)) = (device, context, swap_chain) else {
        return Err(eyre!("D3D11CreateDeviceAndSwapChain succeeded without returning objects"));
    };
    info!("Created D3D11 device with feature level {:#x}", feature_level.0);
    Ok(Graphics {
        device,
        context,
        swap_chain,
    })
}

pub fn full_window_viewport(client_size: (u32, u32)) -> D3D11_VIEWPORT {
    D3D11_VIEWPORT {
        TopLeftX: 0.0,
        TopLeftY: 0.0,
        Width: client_size.0 as f32,
        Height: client_size.1 as f32,
        MinDepth: 0.0,
        MaxDepth: 1.0,
    }
}

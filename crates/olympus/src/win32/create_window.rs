use crate::engine_config::EngineConfig;
use crate::engine_error::EngineResult;
use crate::win32::window_class::WindowClass;
use eyre::WrapErr;
use widestring::U16CString;
use windows::Win32::Foundation::*;
use windows::Win32::UI::WindowsAndMessaging::*;
use windows::core::*;

/// Creates an overlapped window whose client area matches `config.client_size`.
///
/// `behaviour` is handed to the window procedure and must outlive the window.
pub fn create_window<W: WindowClass>(
    our_module: HMODULE,
    config: &EngineConfig,
    behaviour: *mut W,
) -> EngineResult<HWND> {
    let (width, height) = config.client_size;
    let mut window_rect = RECT {
        left: 0,
        top: 0,
        right: width as i32,
        bottom: height as i32,
    };
    // Calculates the required size of the window rectangle, based on the desired size of the client rectangle.
    unsafe { AdjustWindowRect(&mut window_rect, WS_OVERLAPPEDWINDOW, false)? };

    let title = U16CString::from_str(&config.title)
        .wrap_err_with(|| format!("window title {:?} contains a nul", config.title))?;

    let hwnd = unsafe {
        CreateWindowExW(
            WINDOW_EX_STYLE::default(),
            W::ID,
            PCWSTR(title.as_ptr()),
            WS_OVERLAPPEDWINDOW,
            config.window_position.0,
            config.window_position.1,
            window_rect.right - window_rect.left,
            window_rect.bottom - window_rect.top,
            None,
            None,
            Some(our_module.into()),
            Some(behaviour as _),
        )
    }?;
    Ok(hwnd)
}

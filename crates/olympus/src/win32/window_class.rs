use crate::engine_error::EngineResult;
use tracing::error;
use tracing::warn;
use windows::Win32::Foundation::*;
use windows::Win32::UI::WindowsAndMessaging::*;
use windows::core::*;

/// Window procedure behaviour for a registered class.
///
/// The instance lives behind `GWLP_USERDATA`, set from `lpCreateParams` on `WM_CREATE`.
pub trait WindowClass {
    const ID: PCWSTR;

    /// Work that may send messages back to the window, run by [`WindowClass::respond`].
    type Response;

    /// Returns `None` when `DefWindowProcW` should handle the message.
    ///
    /// Must not call anything that sends messages to `window`, the instance is
    /// borrowed for the duration of the call.
    fn handle(
        &mut self,
        window: HWND,
        message: u32,
        wparam: WPARAM,
        lparam: LPARAM,
    ) -> Option<Self::Response>;

    /// Runs after the borrow taken for [`WindowClass::handle`] has ended.
    fn respond(window: HWND, response: Self::Response);
}

pub fn create_window_class_struct<W: WindowClass>(instance: HMODULE) -> EngineResult<WNDCLASSEXW> {
    let icon = match unsafe { LoadIconW(Some(instance.into()), w!("ZeusIcon")) } {
        Ok(icon) => icon,
        Err(_) => unsafe { LoadIconW(None, IDI_APPLICATION)? },
    };
    // WNDCLASSEXW - https://learn.microsoft.com/en-us/windows/win32/api/winuser/ns-winuser-wndclassexw
    let wc = WNDCLASSEXW {
        cbSize: std::mem::size_of::<WNDCLASSEXW>() as u32,
        style: CS_HREDRAW | CS_VREDRAW,
        lpfnWndProc: Some(wndproc::<W>),
        hInstance: instance.into(),
        hIcon: icon,
        hCursor: unsafe { LoadCursorW(None, IDC_ARROW)? },
        lpszClassName: W::ID,
        ..Default::default()
    };
    Ok(wc)
}

pub fn register_window_class(class: &WNDCLASSEXW) -> EngineResult<()> {
    let atom = unsafe { RegisterClassExW(class) };
    if atom == 0 {
        return Err(Error::from_win32().into());
    }
    Ok(())
}

// Unwinding out of an extern "system" fn aborts the process.
fn handle_without_unwinding<W: WindowClass>(
    behaviour: &mut W,
    window: HWND,
    message: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> Option<W::Response> {
    std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        behaviour.handle(window, message, wparam, lparam)
    }))
    .unwrap_or_else(|_| {
        error!("Window procedure panicked handling message {message:#06x}");
        None
    })
}

extern "system" fn wndproc<W: WindowClass>(
    window: HWND,
    message: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    if message == WM_CREATE {
        unsafe {
            let create_struct: &CREATESTRUCTW = &*(lparam.0 as *const CREATESTRUCTW);
            SetWindowLongPtrW(window, GWLP_USERDATA, create_struct.lpCreateParams as _);
        }
        return LRESULT(0);
    }

    let user_data = unsafe { GetWindowLongPtrW(window, GWLP_USERDATA) };
    if user_data == 0 {
        // We can get messages before WM_CREATE or after WM_NCDESTROY.
        return unsafe { DefWindowProcW(window, message, wparam, lparam) };
    }

    let Some(mut behaviour) = std::ptr::NonNull::<W>::new(user_data as *mut W) else {
        warn!("GWLP_USERDATA did not hold a window behaviour");
        return unsafe { DefWindowProcW(window, message, wparam, lparam) };
    };

    if message == WM_NCDESTROY {
        unsafe { SetWindowLongPtrW(window, GWLP_USERDATA, 0) };
    }

    let response = handle_without_unwinding(
        unsafe { behaviour.as_mut() },
        window,
        message,
        wparam,
        lparam,
    );

    match response {
        Some(response) => {
            // SetCapture and friends re-enter this procedure synchronously.
            W::respond(window, response);
            LRESULT(0)
        }
        None => unsafe { DefWindowProcW(window, message, wparam, lparam) },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use windows::Win32::System::LibraryLoader::GetModuleHandleW;

    const ASK_FOR_NESTED: u32 = WM_APP;
    const NESTED: u32 = WM_APP + 1;

    thread_local! {
        static LOG: RefCell<Vec<&'static str>> = const { RefCell::new(Vec::new()) };
    }

    fn log(entry: &'static str) {
        LOG.with(|log| log.borrow_mut().push(entry));
    }

    #[derive(Default)]
    struct Recorder {
        in_handle: bool,
        nested_while_borrowed: bool,
    }

    impl WindowClass for Recorder {
        const ID: PCWSTR = w!("OlympusRecorderWindowClass");
        type Response = u32;

        fn handle(&mut self, _: HWND, message: u32, _: WPARAM, _: LPARAM) -> Option<u32> {
            if self.in_handle {
                self.nested_while_borrowed = true;
            }
            self.in_handle = true;
            let response = match message {
                ASK_FOR_NESTED => {
                    log("handle");
                    Some(NESTED)
                }
                NESTED => {
                    log("nested");
                    Some(0)
                }
                _ => None,
            };
            self.in_handle = false;
            response
        }

        fn respond(window: HWND, response: u32) {
            if response != 0 {
                log("respond");
                unsafe { SendMessageW(window, response, None, None) };
            }
        }
    }

    #[test]
    fn responses_run_after_the_behaviour_is_released() {
        let module = unsafe { GetModuleHandleW(None) }.unwrap();
        let class = create_window_class_struct::<Recorder>(module).unwrap();
        register_window_class(&class).unwrap();

        let mut recorder = Box::new(Recorder::default());
        let window = unsafe {
            CreateWindowExW(
                WINDOW_EX_STYLE::default(),
                Recorder::ID,
                w!("recorder"),
                WS_OVERLAPPEDWINDOW,
                0,
                0,
                64,
                64,
                None,
                None,
                Some(module.into()),
                Some(&mut *recorder as *mut Recorder as _),
            )
        }
        .unwrap();

        unsafe { SendMessageW(window, ASK_FOR_NESTED, None, None) };
        unsafe { DestroyWindow(window) }.unwrap();

        assert_eq!(LOG.with(|log| log.borrow().clone()), ["handle", "respond", "nested"]);
        assert!(!recorder.nested_while_borrowed);
    }
}

use windows::Win32::Foundation::LPARAM;
use windows::Win32::Foundation::WPARAM;
use windows::Win32::System::SystemServices::MK_LBUTTON;
use windows::Win32::System::SystemServices::MK_MBUTTON;
use windows::Win32::System::SystemServices::MK_RBUTTON;
use windows::Win32::UI::Input::KeyboardAndMouse::VIRTUAL_KEY;
use windows::Win32::UI::WindowsAndMessaging::*;

/// Client-area cursor position in pixels. Can be negative while the mouse is captured.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CursorPosition {
    pub x: i32,
    pub y: i32,
}

impl CursorPosition {
    /// `GET_X_LPARAM` / `GET_Y_LPARAM`: both halves are signed 16 bit values.
    pub fn from_lparam(lparam: LPARAM) -> Self {
        let bits = lparam.0 as usize;
        Self {
            x: (bits & 0xFFFF) as u16 as i16 as i32,
            y: ((bits >> 16) & 0xFFFF) as u16 as i16 as i32,
        }
    }
}

/// Mouse buttons held while a mouse message was generated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MouseButtons {
    pub left: bool,
    pub right: bool,
    pub middle: bool,
}

impl MouseButtons {
    pub fn from_wparam(wparam: WPARAM) -> Self {
        let flags = wparam.0 as u32;
        Self {
            left: flags & MK_LBUTTON.0 != 0,
            right: flags & MK_RBUTTON.0 != 0,
            middle: flags & MK_MBUTTON.0 != 0,
        }
    }
}

/// The window messages the engine reacts to.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum WindowEvent {
    Destroy,
    RightButtonDown {
        buttons: MouseButtons,
        position: CursorPosition,
    },
    RightButtonUp {
        buttons: MouseButtons,
        position: CursorPosition,
    },
    MouseMove {
        buttons: MouseButtons,
        position: CursorPosition,
    },
    KeyUp(VIRTUAL_KEY),
}

impl WindowEvent {
    pub fn from_message(message: u32, wparam: WPARAM, lparam: LPARAM) -> Option<Self> {
        let event = match message {
            WM_DESTROY => Self::Destroy,
            WM_RBUTTONDOWN => Self::RightButtonDown {
                buttons: MouseButtons::from_wparam(wparam),
                position: CursorPosition::from_lparam(lparam),
            },
            WM_RBUTTONUP => Self::RightButtonUp {
                buttons: MouseButtons::from_wparam(wparam),
                position: CursorPosition::from_lparam(lparam),
            },
            WM_MOUSEMOVE => Self::MouseMove {
                buttons: MouseButtons::from_wparam(wparam),
                position: CursorPosition::from_lparam(lparam),
            },
            WM_KEYUP => Self::KeyUp(VIRTUAL_KEY(wparam.0 as u16)),
            _ => return None,
        };
        Some(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use windows::Win32::UI::Input::KeyboardAndMouse::VK_ESCAPE;

    fn make_lparam(x: i16, y: i16) -> LPARAM {
        LPARAM((((y as u16 as u32) << 16) | x as u16 as u32) as isize)
    }

    #[test]
    fn decodes_signed_coordinates() {
        assert_eq!(
            CursorPosition::from_lparam(make_lparam(640, 360)),
            CursorPosition { x: 640, y: 360 }
        );
        assert_eq!(
            CursorPosition::from_lparam(make_lparam(-12, -1)),
            CursorPosition { x: -12, y: -1 }
        );
    }

    #[test]
    fn decodes_button_flags() {
        let buttons = MouseButtons::from_wparam(WPARAM((MK_LBUTTON.0 | MK_MBUTTON.0) as usize));
        assert_eq!(
            buttons,
            MouseButtons {
                left: true,
                right: false,
                middle: true
            }
        );
    }

    #[test]
    fn translates_mouse_messages() {
        let event = WindowEvent::from_message(
            WM_MOUSEMOVE,
            WPARAM(MK_LBUTTON.0 as usize),
            make_lparam(10, 20),
        );
        assert_eq!(
            event,
            Some(WindowEvent::MouseMove {
                buttons: MouseButtons {
                    left: true,
                    ..Default::default()
                },
                position: CursorPosition { x: 10, y: 20 },
            })
        );
        assert!(matches!(
            WindowEvent::from_message(WM_RBUTTONDOWN, WPARAM(0), make_lparam(1, 2)),
            Some(WindowEvent::RightButtonDown { .. })
        ));
    }

    #[test]
    fn translates_key_up_and_destroy() {
        assert_eq!(
            WindowEvent::from_message(WM_KEYUP, WPARAM(VK_ESCAPE.0 as usize), LPARAM(0)),
            Some(WindowEvent::KeyUp(VK_ESCAPE))
        );
        assert_eq!(
            WindowEvent::from_message(WM_DESTROY, WPARAM(0), LPARAM(0)),
            Some(WindowEvent::Destroy)
        );
    }

    #[test]
    fn leaves_other_messages_to_the_default_procedure() {
        assert_eq!(WindowEvent::from_message(WM_PAINT, WPARAM(0), LPARAM(0)), None);
        assert_eq!(WindowEvent::from_message(WM_KEYDOWN, WPARAM(0x41), LPARAM(0)), None);
    }
}

use crate::camera_controller::KeyboardState;
use windows::Win32::UI::Input::KeyboardAndMouse::GetAsyncKeyState;
use windows::Win32::UI::Input::KeyboardAndMouse::VIRTUAL_KEY;

/// Polls the physical key state, independent of the message queue.
#[derive(Clone, Copy, Debug, Default)]
pub struct AsyncKeyboard;

impl KeyboardState for AsyncKeyboard {
    fn is_key_down(&self, key: VIRTUAL_KEY) -> bool {
        // High bit set means the key is down right now.
        (unsafe { GetAsyncKeyState(key.0 as i32) } as u16 & 0x8000) != 0
    }
}

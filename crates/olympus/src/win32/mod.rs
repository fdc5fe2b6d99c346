pub mod async_keyboard;
pub mod create_window;
pub mod window_class;

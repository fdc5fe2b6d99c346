pub mod compile_shader;
pub mod constant_buffer;
pub mod create_device;
pub mod render_manager;
pub mod renderable;
pub mod shader_pipeline;
pub mod skybox;

use crate::camera::Camera;
use crate::camera_controller::CameraController;
use crate::camera_controller::InputResponse;
use crate::d3d11::create_device::Graphics;
use crate::d3d11::create_device::create_device_and_swap_chain;
use crate::d3d11::create_device::full_window_viewport;
use crate::d3d11::render_manager::RenderManager;
use crate::d3d11::shader_pipeline::ShaderPipeline;
use crate::d3d11::skybox::Skybox;
use crate::engine_config::EngineConfig;
use crate::engine_error::EngineResult;
use crate::frame_clock::FrameClock;
use crate::particles::FountainSimulation;
use crate::particles::ParticleSimulation;
use crate::win32::async_keyboard::AsyncKeyboard;
use crate::win32::create_window::create_window;
use crate::win32::window_class::WindowClass;
use crate::win32::window_class::create_window_class_struct;
use crate::win32::window_class::register_window_class;
use crate::window_event::WindowEvent;
use tracing::debug;
use tracing::error;
use tracing::info;
use tracing::warn;
use windows::Win32::Foundation::*;
use windows::Win32::Graphics::Dxgi::*;
use windows::Win32::System::LibraryLoader::*;
use windows::Win32::UI::Input::KeyboardAndMouse::*;
use windows::Win32::UI::WindowsAndMessaging::*;
use windows::core::*;

/// Window-side state: everything the window procedure touches.
pub struct Viewer {
    pub camera: Camera,
    pub controller: CameraController,
}

impl WindowClass for Viewer {
    const ID: PCWSTR = w!("OlympusWindowClass");
    type Response = InputResponse;

    fn handle(
        &mut self,
        _window: HWND,
        message: u32,
        wparam: WPARAM,
        lparam: LPARAM,
    ) -> Option<InputResponse> {
        let event = WindowEvent::from_message(message, wparam, lparam)?;
        if event == WindowEvent::Destroy {
            return Some(InputResponse::Quit);
        }
        match self.controller.on_event(&event, &mut self.camera) {
            InputResponse::Unhandled => None,
            response => Some(response),
        }
    }

    fn respond(window: HWND, response: InputResponse) {
        match response {
            InputResponse::Unhandled | InputResponse::Handled => {}
            InputResponse::CaptureMouse => {
                unsafe { SetCapture(window) };
            }
            InputResponse::ReleaseMouse => {
                if let Err(e) = unsafe { ReleaseCapture() } {
                    warn!("ReleaseCapture failed: {e}");
                }
            }
            InputResponse::Quit => {
                info!("Quitting");
                unsafe { PostQuitMessage(0) };
            }
        }
    }
}

/// GPU objects created by [`System::init_d3d`].
struct GpuState {
    graphics: Graphics,
    render_manager: RenderManager,
    pipeline: ShaderPipeline,
    particles: Box<dyn ParticleSimulation>,
}

/// Owns the window, the device and the frame loop.
pub struct System {
    hwnd: HWND,
    // Referenced by the window procedure through GWLP_USERDATA, so it must stay boxed.
    viewer: Box<Viewer>,
    gpu: GpuState,
    clock: FrameClock,
    keyboard: AsyncKeyboard,
}

impl System {
    pub fn new(config: EngineConfig) -> EngineResult<Self> {
        let our_module = unsafe { GetModuleHandleW(None)? };

        let window_class = create_window_class_struct::<Viewer>(our_module)?;
        register_window_class(&window_class)?;

        let mut viewer = Box::new(Viewer {
            camera: Camera::new(config.aspect_ratio()),
            controller: CameraController::from_config(&config),
        });
        let hwnd = create_window::<Viewer>(our_module, &config, &mut *viewer)?;
        unsafe { _ = ShowWindow(hwnd, SW_SHOW) };
        info!(
            "Created {}x{} window {:?}",
            config.client_size.0, config.client_size.1, config.title
        );

        let gpu = match Self::init_d3d(hwnd, &config, &mut viewer) {
            Ok(gpu) => gpu,
            Err(e) => {
                // The window procedure still points at `viewer`.
                if let Err(destroy_error) = unsafe { DestroyWindow(hwnd) } {
                    warn!("DestroyWindow failed: {destroy_error}");
                }
                return Err(e);
            }
        };

        Ok(Self {
            hwnd,
            viewer,
            gpu,
            clock: FrameClock::new(config.timing),
            keyboard: AsyncKeyboard,
        })
    }

    fn init_d3d(hwnd: HWND, config: &EngineConfig, viewer: &mut Viewer) -> EngineResult<GpuState> {
        let graphics = create_device_and_swap_chain(hwnd, config)?;

        let viewport = full_window_viewport(config.client_size);
        unsafe { graphics.context.RSSetViewports(Some(&[viewport])) };

        viewer.camera = Camera::new(config.aspect_ratio());
        viewer.controller = CameraController::from_config(config);

        let mut render_manager = RenderManager::new(
            &graphics.device,
            &graphics.context,
            &graphics.swap_chain,
            config.clear_color,
        )?;
        render_manager.add(Box::new(Skybox::new(&graphics.device)?));

        let mut particles: Box<dyn ParticleSimulation> =
            Box::new(FountainSimulation::new(config.particle_count));
        particles.init_particles();

        let pipeline = ShaderPipeline::new(&graphics.device, config)?;

        Ok(GpuState {
            graphics,
            render_manager,
            pipeline,
            particles,
        })
    }

    /// Runs until `WM_QUIT` and returns its exit code.
    pub fn run(mut self) -> EngineResult<i32> {
        let exit_code = 'frames: loop {
            let mut message = MSG::default();
            while unsafe { PeekMessageW(&mut message, None, 0, 0, PM_REMOVE) }.as_bool() {
                if message.message == WM_QUIT {
                    break 'frames message.wParam.0 as i32;
                }
                unsafe {
                    _ = TranslateMessage(&message);
                    DispatchMessageW(&message);
                }
            }

            let dt = self.clock.tick();
            self.update_camera(dt);
            if let Err(e) = self.render_frame(dt) {
                error!("Render error: {:?}", e);
            }
        };
        info!(
            "Quit after {} frames ({:.3}s simulated)",
            self.clock.frame_count(),
            self.clock.elapsed()
        );
        Ok(exit_code)
    }

    fn update_camera(&mut self, dt: f32) {
        keep_cursor_visible();
        let viewer = &mut *self.viewer;
        viewer
            .controller
            .update_camera(&mut viewer.camera, &self.keyboard, dt);
    }

    fn render_frame(&mut self, dt: f32) -> EngineResult<()> {
        let gpu = &mut self.gpu;
        let fetch = gpu.particles.advance(dt);

        gpu.pipeline.bind(&gpu.graphics.context);
        gpu.render_manager.render(&self.viewer.camera)?;

        if fetch {
            gpu.particles.fetch();
        }

        unsafe { gpu.graphics.swap_chain.Present(0, DXGI_PRESENT::default()) }.ok()?;
        Ok(())
    }

    fn clean_d3d(&mut self) {
        // A swap chain must not be released while fullscreen.
        if let Err(e) = unsafe { self.gpu.graphics.swap_chain.SetFullscreenState(false, None) } {
            warn!("Leaving fullscreen failed: {e}");
        }
        unsafe { self.gpu.graphics.context.ClearState() };
        // Already gone when the user closed the window.
        if let Err(e) = unsafe { DestroyWindow(self.hwnd) } {
            debug!("DestroyWindow: {e}");
        }
    }
}

impl Drop for System {
    fn drop(&mut self) {
        self.clean_d3d();
    }
}

fn keep_cursor_visible() {
    // ShowCursor keeps a display counter; hold it at zero instead of growing it every frame.
    if unsafe { ShowCursor(true) } > 0 {
        unsafe { ShowCursor(false) };
    }
}

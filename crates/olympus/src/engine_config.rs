use crate::engine_error::EngineResult;
use crate::frame_clock::FrameTiming;
use crate::frame_clock::MAX_FRAME_STEP;
use eyre::WrapErr;
use eyre::eyre;
use std::path::Path;
use std::path::PathBuf;
use tracing::warn;

/// Every constant the engine needs at startup, overridable from the command line.
#[derive(Clone, Debug, PartialEq)]
pub struct EngineConfig {
    pub title: String,
    pub client_size: (u32, u32),
    pub window_position: (i32, i32),
    pub use_warp_device: bool,
    pub sample_count: u32,
    pub shader_path: PathBuf,
    pub vertex_entry: String,
    pub vertex_target: String,
    pub pixel_entry: String,
    pub pixel_target: String,
    pub timing: FrameTiming,
    pub walk_speed: f32,
    pub sprint_speed: f32,
    /// Camera rotation per pixel of mouse motion.
    pub degrees_per_pixel: f32,
    pub particle_count: usize,
    pub clear_color: [f32; 4],
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            title: "Olympus Engine".into(),
            client_size: (800, 600),
            window_position: (200, 100),
            use_warp_device: false,
            sample_count: 4,
            shader_path: PathBuf::from("Skybox.hlsl"),
            vertex_entry: "VShader".into(),
            vertex_target: "vs_5_0".into(),
            pixel_entry: "PShader".into(),
            pixel_target: "ps_5_0".into(),
            timing: FrameTiming::Fixed { dt: 0.001 },
            walk_speed: 10.0,
            sprint_speed: 100.0,
            degrees_per_pixel: 0.25,
            particle_count: 256,
            clear_color: [0.0, 0.2, 0.4, 1.0],
        }
    }
}

impl EngineConfig {
    /// Builds a config from the process arguments.
    pub fn from_env() -> EngineResult<Self> {
        Self::from_args(std::env::args().skip(1))
    }

    pub fn from_args<I, S>(args: I) -> EngineResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut config = Self::default();
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            let arg = arg.as_ref();
            let Some(flag) = arg.strip_prefix('-').or_else(|| arg.strip_prefix('/')) else {
                warn!("Ignoring unexpected argument {arg:?}");
                continue;
            };
            match flag.to_ascii_lowercase().as_str() {
                "warp" => config.use_warp_device = true,
                "measured-time" => config.timing = FrameTiming::default_measured(),
                "shader" => {
                    let Some(path) = args.next() else {
                        return Err(eyre!("-shader expects a path").into());
                    };
                    config.shader_path = PathBuf::from(path.as_ref());
                }
                "fixed-dt" => {
                    let Some(value) = args.next() else {
                        return Err(eyre!("-fixed-dt expects a number of seconds").into());
                    };
                    let value = value.as_ref();
                    let dt: f32 = value
                        .parse()
                        .wrap_err_with(|| format!("-fixed-dt {value:?} is not a number"))?;
                    if !dt.is_finite() || dt <= 0.0 || dt > MAX_FRAME_STEP {
                        return Err(eyre!(
                            "-fixed-dt must be in (0, {MAX_FRAME_STEP}] seconds, got {value:?}"
                        )
                        .into());
                    }
                    config.timing = FrameTiming::Fixed { dt };
                }
                _ => warn!("Ignoring unknown flag {arg:?}"),
            }
        }
        Ok(config)
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.client_size.0 as f32 / self.client_size.1 as f32
    }

    /// Locates the shader source, trying the working directory, the executable's
    /// directory and finally the crate's bundled assets.
    pub fn resolve_shader_path(&self) -> EngineResult<PathBuf> {
        let exe_dir = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf));
        let assets_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("assets");
        let search = [exe_dir, Some(assets_dir)];
        match find_asset(&self.shader_path, search.iter().flatten()) {
            Some(path) => Ok(path),
            None => Err(eyre!(
                "{} not found in the working directory, next to the executable or in the assets directory",
                self.shader_path.display()
            )
            .into()),
        }
    }
}

pub fn find_asset<'a>(
    relative: &Path,
    search_dirs: impl IntoIterator<Item = &'a PathBuf>,
) -> Option<PathBuf> {
    if relative.is_file() {
        return Some(relative.to_path_buf());
    }
    if relative.is_absolute() {
        return None;
    }
    search_dirs
        .into_iter()
        .map(|dir| dir.join(relative))
        .find(|candidate| candidate.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_describe_an_800_by_600_window() {
        let config = EngineConfig::default();
        assert_eq!(config.title, "Olympus Engine");
        assert_eq!(config.client_size, (800, 600));
        assert_eq!(config.window_position, (200, 100));
        assert_eq!(config.sample_count, 4);
        assert_eq!(config.shader_path, PathBuf::from("Skybox.hlsl"));
        assert_eq!(config.timing, FrameTiming::Fixed { dt: 0.001 });
    }

    #[test]
    fn parses_warp_in_either_style() {
        assert!(EngineConfig::from_args(["-warp"]).unwrap().use_warp_device);
        assert!(EngineConfig::from_args(["/WARP"]).unwrap().use_warp_device);
        assert!(!EngineConfig::from_args(Vec::<String>::new()).unwrap().use_warp_device);
    }

    #[test]
    fn parses_shader_and_timing() {
        let config =
            EngineConfig::from_args(["-shader", "C:/shaders/Sky.hlsl", "-fixed-dt", "0.016"])
                .unwrap();
        assert_eq!(config.shader_path, PathBuf::from("C:/shaders/Sky.hlsl"));
        assert_eq!(config.timing, FrameTiming::Fixed { dt: 0.016 });

        let config = EngineConfig::from_args(["-measured-time"]).unwrap();
        assert!(matches!(config.timing, FrameTiming::Measured { .. }));
    }

    #[test]
    fn rejects_malformed_values() {
        assert!(EngineConfig::from_args(["-shader"]).is_err());
        assert!(EngineConfig::from_args(["-fixed-dt", "soon"]).is_err());
        assert!(EngineConfig::from_args(["-fixed-dt", "-1"]).is_err());
        assert!(EngineConfig::from_args(["-fixed-dt", "0"]).is_err());
        assert!(EngineConfig::from_args(["-fixed-dt", "inf"]).is_err());
        assert!(EngineConfig::from_args(["-fixed-dt", "NaN"]).is_err());
        assert!(EngineConfig::from_args(["-fixed-dt", "1e10"]).is_err());
        assert!(EngineConfig::from_args(["-fixed-dt", "0.25"]).is_ok());
    }

    #[test]
    fn ignores_unknown_arguments() {
        let config = EngineConfig::from_args(["stray", "-fullscreen"]).unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn finds_assets_in_search_dirs() {
        let dir = std::env::temp_dir().join(format!("olympus-assets-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("Probe.hlsl"), "// probe").unwrap();

        let missing = PathBuf::from("definitely-not-here");
        let found = find_asset(Path::new("Probe.hlsl"), [&missing, &dir]);
        assert_eq!(found, Some(dir.join("Probe.hlsl")));
        assert_eq!(find_asset(Path::new("Absent.hlsl"), [&dir]), None);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn bundled_shader_resolves() {
        let path = EngineConfig::default().resolve_shader_path().unwrap();
        assert!(path.ends_with("Skybox.hlsl"));
    }
}

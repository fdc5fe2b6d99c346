use olympus::engine_config::EngineConfig;
use olympus::engine_error::EngineResult;
use tracing::info;

pub fn main() -> EngineResult<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt::SubscriberBuilder::default()
        .with_file(true)
        .with_line_number(true)
        .with_level(true)
        .with_target(false)
        .init();
    info!("Olympus starting");

    let config = EngineConfig::from_env()?;
    let exit_code = run(config)?;
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
    Ok(())
}

#[cfg(windows)]
fn run(config: EngineConfig) -> EngineResult<i32> {
    let system = olympus::system::System::new(config)?;
    system.run()
}

#[cfg(not(windows))]
fn run(_config: EngineConfig) -> EngineResult<i32> {
    Err(eyre::eyre!("Olympus renders through Direct3D 11 and only runs on Windows").into())
}

//! The `vista` terrain generator binary.

use clap::Parser;
use vista_app::{PipelineError, PlatformDirs};
use vista_config::{CONFIG_FILE_NAME, CliArgs, Config};

fn main() {
    let args = CliArgs::parse();

    // Logging is configured from the config file, so failures before it is
    // loaded can only go to stderr.
    let (dirs, config) = match PlatformDirs::resolve()
        .map_err(PipelineError::from)
        .and_then(|dirs| startup(&args, dirs))
    {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("vista: {e}");
            std::process::exit(1);
        }
    };

    vista_log::init_logging(Some(&dirs.log_dir), cfg!(debug_assertions), Some(&config));
    tracing::info!(
        config_file = %dirs.config_dir.join(CONFIG_FILE_NAME).display(),
        log_dir = %dirs.log_dir.display(),
        "vista starting"
    );

    match vista_app::run(&config) {
        Ok(terrain) => println!(
            "{}x{} terrain: {} triangles, {} biome colors",
            terrain.color_map.width(),
            terrain.color_map.height(),
            terrain.mesh.triangle_count(),
            terrain.color_map.unique_color_count()
        ),
        Err(e) => {
            tracing::error!("{e}");
            eprintln!("vista: {e}");
            std::process::exit(1);
        }
    }
}

/// Create directories and load the config with CLI overrides applied.
fn startup(
    args: &CliArgs,
    mut dirs: PlatformDirs,
) -> Result<(PlatformDirs, Config), PipelineError> {
    if let Some(config_dir) = &args.config {
        dirs = dirs.with_config_dir(config_dir);
    }
    dirs.create_dirs()?;

    let mut config = Config::load_or_create(&dirs.config_dir)?;
    config.apply_cli_overrides(args);
    Ok((dirs, config))
}

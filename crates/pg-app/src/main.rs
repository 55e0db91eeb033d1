use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use pg_core::config::Config;
use pg_glyph::Mode;

pub mod cli;
pub mod convert;

fn main() -> Result<ExitCode> {
    // 1. Parser CLI
    let cli = cli::Cli::parse();

    // 2. Initialiser le logging
    env_logger::Builder::new()
        .filter_level(cli.log_level.parse().unwrap_or(log::LevelFilter::Warn))
        .init();

    // 3. Outil de calibration (hors-ligne)
    if let Some(cli::Command::Calibrate { font, size, out }) = &cli.command {
        let table = pg_export::calibrate::calibrate_font(font, *size, out)?;
        println!(
            "{} brightness groups written to {}",
            table.len(),
            out.display()
        );
        return Ok(ExitCode::SUCCESS);
    }

    let Some(src) = cli.source.as_deref() else {
        anyhow::bail!("no source image given. Usage: pixglyph <SRC> [OPTIONS]");
    };

    // 4. Charger la config, puis appliquer les overrides CLI
    let mut config = resolve_config(&cli)?;
    cli.apply_overrides(&mut config);

    let Ok(mode) = config.mode.parse::<Mode>() else {
        println!("{}", convert::mode_help(&config.mode));
        return Ok(ExitCode::FAILURE);
    };
    log::info!("{} -> mode {mode}", src.display());

    // 5. Conversion
    if pg_source::is_gif(src) {
        log::warn!("GIF conversion is experimental");
        let out = convert::convert_gif(src, &config, mode)?;
        println!("saved {}", out.display());
    } else {
        convert::convert_image(src, &config, mode)?;
    }
    Ok(ExitCode::SUCCESS)
}

/// Load the config file when present, defaults otherwise.
fn resolve_config(cli: &cli::Cli) -> Result<Config> {
    if cli.config.exists() {
        pg_core::config::load_config(&cli.config)
    } else {
        log::info!(
            "Config introuvable : {}. Utilisation des défauts.",
            cli.config.display()
        );
        Ok(Config::default())
    }
}

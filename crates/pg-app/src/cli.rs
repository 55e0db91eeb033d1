use std::path::PathBuf;

use clap::{Parser, Subcommand};
use pg_core::config::Config;

/// pixglyph: turns images and animated GIFs into colored text art.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None, args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Image à convertir (PNG, JPEG, BMP, GIF).
    pub source: Option<PathBuf>,

    /// Largeur du rendu terminal, en caractères.
    #[arg(short, long)]
    pub width: Option<u32>,

    /// Mode de génération : blocks, rand_blocks, hsv, rand_text.
    #[arg(short, long)]
    pub mode: Option<String>,

    /// Largeur de l'image sauvegardée (caractères, ou pixels si >= 1000).
    /// 0 = pas de sauvegarde.
    #[arg(long)]
    pub png_width: Option<u32>,

    /// Jeu de caractères personnalisé.
    #[arg(short, long)]
    pub symbols: Option<String>,

    /// Fichier de configuration TOML. Défaut : config/default.toml.
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Police monospace pour le rendu image.
    #[arg(long)]
    pub font: Option<PathBuf>,

    /// Graine pour des glyphes aléatoires reproductibles.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Niveau de log : error, warn, info, debug, trace.
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Measure a font's glyphs and write a brightness table for `hsv`.
    Calibrate {
        /// Font to measure.
        #[arg(long)]
        font: PathBuf,

        /// Pixel size to rasterize at.
        #[arg(long, default_value_t = 10.0)]
        size: f32,

        /// Where to write the TOML table.
        #[arg(long, default_value = "table.toml")]
        out: PathBuf,
    },
}

impl Cli {
    /// Apply command-line overrides on top of the file configuration.
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(width) = self.width {
            config.terminal_width = width;
        }
        if let Some(ref mode) = self.mode {
            config.mode.clone_from(mode);
        }
        if let Some(png_width) = self.png_width {
            config.raster_width = png_width;
        }
        if let Some(ref symbols) = self.symbols {
            config.symbols = Some(symbols.clone());
        }
        if let Some(ref font) = self.font {
            config.font_path.clone_from(font);
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        config.clamp_all();
    }
}

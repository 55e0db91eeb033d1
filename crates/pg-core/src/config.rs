use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::color::{DEFAULT_BRIGHTEN, Rgb};
use crate::layout::CellSize;

/// Configuration complète d'un rendu.
///
/// Sérialisable en TOML. Chaque champ a une valeur par défaut saine; the CLI
/// overrides whatever the file sets.
///
/// # Example
/// ```
/// use pg_core::config::Config;
/// let config = Config::default();
/// assert_eq!(config.terminal_width, 80);
/// assert_eq!(config.mode, "rand_text");
/// ```
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct Config {
    // === Sortie ===
    /// Width of the terminal rendering, in cells.
    pub terminal_width: u32,
    /// Width of the saved raster rendering. 0 = don't save a still image.
    pub raster_width: u32,

    // === Glyphes ===
    /// Glyph strategy mode identifier.
    pub mode: String,
    /// Custom charset for the `blocks` and `rand_text` modes.
    pub symbols: Option<String>,
    /// Brightness table written by `pixglyph calibrate`, used by `hsv`.
    pub bucket_table: Option<PathBuf>,
    /// Seed for reproducible random glyphs. None = OS entropy.
    pub seed: Option<u64>,

    // === Raster ===
    /// Canvas / terminal background.
    pub background: Rgb,
    /// Pixel footprint of one glyph.
    pub cell: CellSize,
    /// Band cropped off the top of the canvas to absorb font ascent.
    pub top_padding: u32,
    /// Monospace TrueType/OpenType font for raster output.
    pub font_path: PathBuf,
    /// Font size in pixels.
    pub font_size: f32,
    /// Lift added to glyph colors on the raster canvas.
    pub brighten_delta: u8,

    // === Performance ===
    /// Render animation frames on the rayon pool.
    pub parallel_frames: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            terminal_width: 80,
            raster_width: 0,
            mode: "rand_text".to_string(),
            symbols: None,
            bucket_table: None,
            seed: None,
            background: Rgb(5, 5, 5),
            cell: CellSize::default(),
            top_padding: 3,
            font_path: PathBuf::from("DejaVuSansMono.ttf"),
            font_size: 10.0,
            brighten_delta: DEFAULT_BRIGHTEN,
            parallel_frames: true,
        }
    }
}

impl Config {
    /// Clamp all numeric fields to their valid ranges.
    /// Called after TOML deserialization to prevent out-of-range values.
    ///
    /// Chaque valeur ajustée est signalée par un warning ; retourne les noms
    /// des champs modifiés.
    pub fn clamp_all(&mut self) -> Vec<&'static str> {
        let mut adjusted = Vec::new();
        self.terminal_width = clamp_field(
            "terminal_width",
            self.terminal_width,
            1,
            2000,
            &mut adjusted,
        );
        self.cell.width = clamp_field("cell_width", self.cell.width, 1, 256, &mut adjusted);
        self.cell.height = clamp_field("cell_height", self.cell.height, 1, 256, &mut adjusted);
        self.top_padding = clamp_field(
            "top_padding",
            self.top_padding,
            0,
            self.cell.height,
            &mut adjusted,
        );
        self.font_size = clamp_field("font_size", self.font_size, 1.0, 512.0, &mut adjusted);
        adjusted
    }
}

fn clamp_field<T>(
    name: &'static str,
    value: T,
    min: T,
    max: T,
    adjusted: &mut Vec<&'static str>,
) -> T
where
    T: PartialOrd + Copy + std::fmt::Display,
{
    let clamped = if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    };
    if clamped != value {
        log::warn!("{name} = {value} out of [{min}, {max}], using {clamped}");
        adjusted.push(name);
    }
    clamped
}

/// Structure TOML intermédiaire pour désérialisation avec valeurs optionnelles.
#[derive(Deserialize)]
struct ConfigFile {
    output: Option<OutputSection>,
    glyphs: Option<GlyphSection>,
    raster: Option<RasterSection>,
}

#[derive(Deserialize)]
struct OutputSection {
    terminal_width: Option<u32>,
    raster_width: Option<u32>,
    parallel_frames: Option<bool>,
}

#[derive(Deserialize)]
struct GlyphSection {
    mode: Option<String>,
    symbols: Option<String>,
    bucket_table: Option<PathBuf>,
    seed: Option<u64>,
}

#[derive(Deserialize)]
struct RasterSection {
    background: Option<Rgb>,
    cell_width: Option<u32>,
    cell_height: Option<u32>,
    top_padding: Option<u32>,
    font_path: Option<PathBuf>,
    font_size: Option<f32>,
    brighten_delta: Option<u8>,
}

/// Charge un fichier TOML et fusionne avec les valeurs par défaut.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
///
/// # Example
/// ```no_run
/// use pg_core::config::load_config;
/// use std::path::Path;
/// let config = load_config(Path::new("config/default.toml")).unwrap();
/// ```
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    parse_config(&content).with_context(|| format!("TOML parse error in {}", path.display()))
}

/// Parse TOML text over the defaults.
///
/// # Errors
/// Returns an error if the text is not a valid config.
pub fn parse_config(content: &str) -> Result<Config> {
    let file: ConfigFile = toml::from_str(content)?;
    let mut config = Config::default();

    if let Some(o) = file.output {
        if let Some(v) = o.terminal_width {
            config.terminal_width = v;
        }
        if let Some(v) = o.raster_width {
            config.raster_width = v;
        }
        if let Some(v) = o.parallel_frames {
            config.parallel_frames = v;
        }
    }

    if let Some(g) = file.glyphs {
        if let Some(v) = g.mode {
            config.mode = v;
        }
        if g.symbols.is_some() {
            config.symbols = g.symbols;
        }
        if g.bucket_table.is_some() {
            config.bucket_table = g.bucket_table;
        }
        if g.seed.is_some() {
            config.seed = g.seed;
        }
    }

    if let Some(r) = file.raster {
        if let Some(v) = r.background {
            config.background = v;
        }
        if let Some(v) = r.cell_width {
            config.cell.width = v;
        }
        if let Some(v) = r.cell_height {
            config.cell.height = v;
        }
        if let Some(v) = r.top_padding {
            config.top_padding = v;
        }
        if let Some(v) = r.font_path {
            config.font_path = v;
        }
        if let Some(v) = r.font_size {
            config.font_size = v;
        }
        if let Some(v) = r.brighten_delta {
            config.brighten_delta = v;
        }
    }

    config.clamp_all();
    Ok(config)
}

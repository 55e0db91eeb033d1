use std::fmt;

use crossterm::Command;
use crossterm::style::{Color, SetBackgroundColor, SetForegroundColor};
use pg_core::color::Rgb;
use pg_core::error::CoreError;
use pg_core::frame::{GlyphSequence, PixelGrid};

/// Default terminal/canvas background.
pub const DEFAULT_BACKGROUND: Rgb = Rgb(5, 5, 5);

#[inline(always)]
fn term_color(c: Rgb) -> Color {
    Color::Rgb {
        r: c.0,
        g: c.1,
        b: c.2,
    }
}

/// A grid plus its glyphs, formatted as truecolor escape sequences.
///
/// Each cell is `fg-set, glyph, fg-reset`; every row ends with a newline and
/// the whole frame sits inside a background set/reset pair. Source colors
/// pass through unmodified.
pub struct TerminalFrame<'a> {
    grid: &'a PixelGrid,
    glyphs: &'a GlyphSequence,
    background: Rgb,
}

impl<'a> TerminalFrame<'a> {
    /// Pair a grid with its glyphs.
    ///
    /// # Errors
    /// Returns [`CoreError::LengthMismatch`] if the glyph count is not the
    /// cell count.
    pub fn new(
        grid: &'a PixelGrid,
        glyphs: &'a GlyphSequence,
        background: Rgb,
    ) -> Result<Self, CoreError> {
        glyphs.check_covers(grid)?;
        Ok(Self {
            grid,
            glyphs,
            background,
        })
    }
}

impl fmt::Display for TerminalFrame<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.grid.width as usize;
        SetBackgroundColor(term_color(self.background)).write_ansi(f)?;
        for (i, (ch, color)) in self
            .glyphs
            .as_slice()
            .iter()
            .zip(self.grid.colors())
            .enumerate()
        {
            SetForegroundColor(term_color(color)).write_ansi(f)?;
            fmt::Write::write_char(f, *ch)?;
            SetForegroundColor(Color::Reset).write_ansi(f)?;
            if (i + 1) % width == 0 {
                f.write_str("\n")?;
            }
        }
        SetBackgroundColor(Color::Reset).write_ansi(f)
    }
}

/// Render a grid to an escape-coded string for a truecolor terminal.
///
/// # Errors
/// Returns [`CoreError::LengthMismatch`] if the glyph count is not the cell
/// count.
///
/// # Example
/// ```
/// use pg_core::color::Rgb;
/// use pg_core::frame::{GlyphSequence, PixelGrid};
/// use pg_glyph::terminal::render_terminal;
///
/// let grid = PixelGrid::from_rgb(2, 1, vec![Rgb(255, 0, 0), Rgb(0, 0, 255)]).unwrap();
/// let glyphs: GlyphSequence = "ab".chars().collect();
/// let out = render_terminal(&grid, &glyphs, Rgb(5, 5, 5)).unwrap();
/// assert!(out.contains("\x1b[38;2;255;0;0ma\x1b[39m"));
/// assert_eq!(out.matches('\n').count(), 1);
/// ```
pub fn render_terminal(
    grid: &PixelGrid,
    glyphs: &GlyphSequence,
    background: Rgb,
) -> Result<String, CoreError> {
    Ok(TerminalFrame::new(grid, glyphs, background)?.to_string())
}

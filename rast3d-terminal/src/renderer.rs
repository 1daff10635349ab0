//! Blits a rendered framebuffer into colored terminal characters.

use crossterm::{
    style::{Color as TermColor, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use rast3d_core::{Color, Framebuffer};
use std::io::Write;

/// Character luminosity ramp (darkest to lightest).
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Pick the ramp character for a pixel's luminance.
pub fn glyph(luminance: f32) -> char {
    let index = (luminance.clamp(0.0, 1.0) * (LUMINOSITY_RAMP.len() - 1) as f32) as usize;
    LUMINOSITY_RAMP[index.min(LUMINOSITY_RAMP.len() - 1)]
}

fn term_color(color: Color) -> TermColor {
    let [r, g, b] = color.to_u8();
    TermColor::Rgb { r, g, b }
}

/// Write the framebuffer to the terminal, one character per pixel.
///
/// Character shape carries the luminance, foreground color the hue. The
/// caller positions the cursor first.
pub fn blit<W: Write>(framebuffer: &Framebuffer, writer: &mut W) -> std::io::Result<()> {
    for y in 0..framebuffer.height() {
        for &color in framebuffer.color_row(y) {
            writer.queue(SetForegroundColor(term_color(color)))?;
            writer.queue(Print(glyph(color.luminance())))?;
        }
        writer.queue(Print('\n'))?;
    }
    writer.queue(ResetColor)?;
    Ok(())
}

//! Text font and line wrapping
//!
//! Text is laid out on an 8x8 character cell: 16 characters per line on a
//! 128 pixel wide panel. The glyphs themselves come from the 5x8 ASCII font
//! shipped with `embedded-graphics`, drawn on an 8 pixel pitch. Every
//! character takes exactly one cell, control characters included.

use embedded_graphics::mono_font::{ascii::FONT_5X8, MonoFont};

/// Horizontal advance of one character in pixels
pub const GLYPH_WIDTH: usize = 8;

/// Glyph drawn for characters the font cannot show as-is
pub const REPLACEMENT_CHAR: char = '?';

/// 5x8 glyphs with 3 columns of spacing (8 pixel pitch)
pub const TEXT_FONT: MonoFont<'static> = MonoFont {
    character_spacing: 3,
    ..FONT_5X8
};

/// Character actually rendered in the cell for `c`
///
/// Control characters (`'\n'`, `'\t'`, ...) get the replacement glyph so
/// they occupy their cell instead of moving the pen.
pub fn cell_char(c: char) -> char {
    if c.is_control() {
        REPLACEMENT_CHAR
    } else {
        c
    }
}

/// Split `text` into lines of at most `chars_per_line` characters
///
/// Splits on character boundaries, never inside a UTF-8 sequence. Yields
/// nothing when `chars_per_line` is zero.
pub fn line_chunks(text: &str, chars_per_line: usize) -> impl Iterator<Item = &str> + '_ {
    let mut rest = if chars_per_line == 0 { "" } else { text };

    core::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }

        let split = rest
            .char_indices()
            .nth(chars_per_line)
            .map_or(rest.len(), |(idx, _)| idx);
        let (line, tail) = rest.split_at(split);
        rest = tail;
        Some(line)
    })
}

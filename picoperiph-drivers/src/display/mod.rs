//! Display driver implementations

mod command;
mod font;
pub mod ssd1306;

use core::fmt;

pub use embedded_graphics::pixelcolor::BinaryColor;
pub use font::{cell_char, line_chunks, GLYPH_WIDTH, REPLACEMENT_CHAR, TEXT_FONT};
pub use ssd1306::{bit_offset, byte_index, DisplayConfig, Ssd1306, DEFAULT_ADDRESS};

/// Errors that can occur with display operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError<E> {
    /// Underlying I2C bus error
    Bus(E),
    /// Width/height not supported by the controller (zero, height not a
    /// multiple of 8, or larger than 128x64)
    InvalidDimensions,
}

// Allow ergonomic `?` propagation from raw bus errors.
impl<E> From<E> for DisplayError<E> {
    fn from(error: E) -> Self {
        DisplayError::Bus(error)
    }
}

impl<E: fmt::Debug> fmt::Display for DisplayError<E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DisplayError::Bus(e) => write!(f, "I2C error: {:?}", e),
            DisplayError::InvalidDimensions => write!(f, "Unsupported display dimensions"),
        }
    }
}

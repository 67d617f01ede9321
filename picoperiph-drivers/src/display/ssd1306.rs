//! SSD1306 OLED Display Driver
//!
//! Driver for SSD1306-based monochrome OLED panels via I2C (128x64,
//! 128x32 and the smaller 64x48 / 96x16 variants).
//!
//! All drawing goes into a local frame buffer. Nothing reaches the panel
//! until [`Ssd1306::flush`] is called, with one exception: the text helpers
//! flush on their own once every line is drawn.
//!
//! # Frame buffer layout
//!
//! Display RAM is split into pages of 8 rows. Each byte holds one column of
//! one page, least significant bit at the top. Pages are stored one after
//! another, left to right within a page:
//!
//! ```text
//!            x=0     x=1           x=W-1
//! page 0   [  0  ] [  1  ]  ...  [ W-1  ]    rows 0..8
//! page 1   [  W  ] [ W+1 ]  ...  [ 2W-1 ]    rows 8..16
//! ...
//! ```
//!
//! Pixel `(x, y)` lives in byte [`byte_index`]`(x, y, W)`, bit
//! [`bit_offset`]`(y)`. This is the order the controller consumes in
//! horizontal addressing mode, so a flush is a straight copy.

use core::convert::Infallible;

use embedded_graphics::{
    mono_font::MonoTextStyle,
    pixelcolor::BinaryColor,
    prelude::*,
    text::{Baseline, Text},
};
use heapless::Vec;
use picoperiph_hal::I2cBus;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::command::{addr_mode, cmd, CONTROL_COMMAND, CONTROL_DATA};
use super::font::{cell_char, line_chunks, GLYPH_WIDTH, TEXT_FONT};
use super::DisplayError;

/// Default SSD1306 I2C address (0x3D with SA0 pulled high)
pub const DEFAULT_ADDRESS: u8 = 0x3C;

/// Controller limits: 128 segments, 64 commons
const MAX_WIDTH: usize = 128;
const MAX_HEIGHT: usize = 64;

/// Largest frame plus the leading data control byte
const FRAME_CAPACITY: usize = MAX_WIDTH * MAX_HEIGHT / 8 + 1;

/// Line height used by [`Ssd1306::draw_text`]
const DEFAULT_LINE_HEIGHT: i32 = 8;

/// Buffer byte holding pixel `(x, y)` on a panel `width` pixels wide
#[inline]
pub const fn byte_index(x: usize, y: usize, width: usize) -> usize {
    x + (y / 8) * width
}

/// Bit within the buffer byte holding row `y`
#[inline]
pub const fn bit_offset(y: usize) -> u8 {
    (y % 8) as u8
}

/// Panel configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DisplayConfig {
    /// Width in pixels (1-128)
    pub width: u8,
    /// Height in pixels (8-64, multiple of 8)
    pub height: u8,
    /// 7-bit I2C address
    pub address: u8,
    /// Panel powered from an external VCC rather than the internal charge pump
    pub external_vcc: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: 128,
            height: 64,
            address: DEFAULT_ADDRESS,
            external_vcc: false,
        }
    }
}

impl DisplayConfig {
    /// 128x32 panel at the default address
    pub const fn new_128x32() -> Self {
        Self {
            width: 128,
            height: 32,
            address: DEFAULT_ADDRESS,
            external_vcc: false,
        }
    }

    /// Number of 8-row pages
    pub const fn pages(&self) -> u8 {
        self.height / 8
    }

    /// Frame buffer size in bytes, or `None` if the controller cannot
    /// drive a panel of this size
    pub fn buffer_len(&self) -> Option<usize> {
        let width = self.width as usize;
        let height = self.height as usize;

        if width == 0 || height == 0 || height % 8 != 0 {
            return None;
        }
        if width > MAX_WIDTH || height > MAX_HEIGHT {
            return None;
        }

        Some(width * height / 8)
    }

    /// COM pins hardware configuration for this panel height
    fn com_pins(&self) -> u8 {
        if self.height == 32 {
            0x02 // Sequential, no left/right remap
        } else {
            0x12 // Alternative COM pin config
        }
    }

    /// Pre-charge period (phase 1 / phase 2, in DCLKs)
    fn precharge(&self) -> u8 {
        if self.external_vcc {
            0x22
        } else {
            0xF1
        }
    }

    /// Charge pump setting
    fn charge_pump(&self) -> u8 {
        if self.external_vcc {
            0x10 // Disabled
        } else {
            0x14 // Enabled
        }
    }
}

/// SSD1306 OLED driver
pub struct Ssd1306<I2C> {
    i2c: I2C,
    config: DisplayConfig,
    /// `[CONTROL_DATA, pixels...]`. The control byte stays in front of the
    /// pixels so a flush is a single bus write with no copy.
    frame: Vec<u8, FRAME_CAPACITY>,
}

impl<I2C> Ssd1306<I2C>
where
    I2C: I2cBus,
{
    /// Create a driver and initialise the panel
    ///
    /// Allocates a zeroed frame buffer, then sends the power-up command
    /// sequence. The panel is on (and showing whatever its RAM held) when
    /// this returns; call [`clear`](Self::clear) and [`flush`](Self::flush)
    /// for a blank screen.
    ///
    /// # Errors
    /// * [`DisplayError::InvalidDimensions`] before any bus traffic if the
    ///   panel size is unsupported
    /// * [`DisplayError::Bus`] if any command transfer fails
    pub fn new(i2c: I2C, config: DisplayConfig) -> Result<Self, DisplayError<I2C::Error>> {
        let buffer_len = config
            .buffer_len()
            .ok_or(DisplayError::InvalidDimensions)?;

        let mut frame = Vec::new();
        frame
            .resize(buffer_len + 1, 0)
            .map_err(|_| DisplayError::InvalidDimensions)?;
        frame[0] = CONTROL_DATA;

        let mut display = Self { i2c, config, frame };
        display.init()?;

        Ok(display)
    }

    /// 128x64 panel at the default address, internal charge pump
    pub fn new_128x64(i2c: I2C) -> Result<Self, DisplayError<I2C::Error>> {
        Self::new(i2c, DisplayConfig::default())
    }

    /// 128x32 panel at the default address, internal charge pump
    pub fn new_128x32(i2c: I2C) -> Result<Self, DisplayError<I2C::Error>> {
        Self::new(i2c, DisplayConfig::new_128x32())
    }

    /// Send the power-up command sequence
    fn init(&mut self) -> Result<(), DisplayError<I2C::Error>> {
        let config = self.config;

        let init_cmds: [u8; 21] = [
            cmd::DISPLAY_OFF,
            cmd::SET_MEM_ADDR_MODE,
            addr_mode::HORIZONTAL,
            cmd::SET_START_LINE | 0x00,
            cmd::SET_SEG_REMAP | 0x01, // Column 127 mapped to SEG0
            cmd::SET_MUX_RATIO,
            config.height - 1,
            cmd::SET_COM_SCAN_DIR | 0x08, // Scan from COM[N-1] to COM0
            cmd::SET_DISPLAY_OFFSET,
            0x00,
            cmd::SET_COM_PINS,
            config.com_pins(),
            cmd::SET_CONTRAST,
            0x7F,
            cmd::SET_PRECHARGE,
            config.precharge(),
            cmd::SET_VCOMH_DESELECT,
            0x30, // ~0.83 x VCC
            cmd::SET_CHARGE_PUMP,
            config.charge_pump(),
            cmd::DISPLAY_ON,
        ];

        for &c in &init_cmds {
            self.command(c)?;
        }

        #[cfg(feature = "defmt")]
        defmt::info!(
            "SSD1306 initialised: {}x{} at {=u8:#x}",
            config.width,
            config.height,
            config.address
        );

        Ok(())
    }

    /// Send a single command byte
    fn command(&mut self, byte: u8) -> Result<(), DisplayError<I2C::Error>> {
        self.i2c.write(self.config.address, &[CONTROL_COMMAND, byte])?;
        Ok(())
    }

    /// Turn the panel off (sleep mode, RAM retained)
    pub fn power_off(&mut self) -> Result<(), DisplayError<I2C::Error>> {
        self.command(cmd::DISPLAY_OFF)
    }

    /// Turn the panel on
    pub fn power_on(&mut self) -> Result<(), DisplayError<I2C::Error>> {
        self.command(cmd::DISPLAY_ON)
    }

    /// Set display contrast (0-255)
    pub fn set_contrast(&mut self, level: u8) -> Result<(), DisplayError<I2C::Error>> {
        self.command(cmd::SET_CONTRAST)?;
        self.command(level)
    }

    /// Invert display colors
    ///
    /// Done by the controller; the frame buffer is untouched.
    pub fn set_invert(&mut self, invert: bool) -> Result<(), DisplayError<I2C::Error>> {
        self.command(cmd::SET_NORMAL_INVERSE | invert as u8)
    }

    /// Flush the frame buffer to the display
    ///
    /// Programs the column window `[0, width-1]` and the page window
    /// `[0, pages-1]`, then writes the whole buffer in one data transfer.
    /// At 400 kHz a 128x64 frame takes roughly 23 ms.
    pub fn flush(&mut self) -> Result<(), DisplayError<I2C::Error>> {
        let window = [
            cmd::SET_COLUMN_ADDR,
            0,
            self.config.width - 1,
            cmd::SET_PAGE_ADDR,
            0,
            self.config.pages() - 1,
        ];

        for &c in &window {
            self.command(c)?;
        }

        #[cfg(feature = "defmt")]
        defmt::debug!("SSD1306 flush: {} bytes", self.frame.len() - 1);

        self.i2c.write(self.config.address, &self.frame)?;

        Ok(())
    }

    /// Draw text starting at `(x, y)` and flush
    ///
    /// Uses the default line height of 8 pixels. See
    /// [`draw_text_with_line_height`](Self::draw_text_with_line_height).
    pub fn draw_text(
        &mut self,
        text: &str,
        x: i32,
        y: i32,
        color: BinaryColor,
    ) -> Result<usize, DisplayError<I2C::Error>> {
        self.draw_text_with_line_height(text, x, y, color, DEFAULT_LINE_HEIGHT)
    }

    /// Draw wrapped text starting at `(x, y)`, then flush
    ///
    /// The text is cut into lines of `width / 8` characters. Line `i` is
    /// drawn with its top edge at `y + i * line_height`; the first line
    /// whose bottom edge would pass the bottom of the panel, and every line
    /// after it, is dropped. Each character fills one 8 pixel cell, and
    /// control characters (`'\n'` included) are drawn as
    /// [`REPLACEMENT_CHAR`](super::REPLACEMENT_CHAR) rather than breaking
    /// the line. Only glyph pixels are written, so the text is drawn over
    /// whatever is already in the buffer.
    ///
    /// Unlike the other drawing operations this pushes the frame to the
    /// panel when done.
    ///
    /// Returns the number of lines drawn.
    pub fn draw_text_with_line_height(
        &mut self,
        text: &str,
        x: i32,
        y: i32,
        color: BinaryColor,
        line_height: i32,
    ) -> Result<usize, DisplayError<I2C::Error>> {
        let chars_per_line = self.config.width as usize / GLYPH_WIDTH;
        let width = i32::from(self.config.width);
        let height = i32::from(self.config.height);
        let cell = GLYPH_WIDTH as i32;
        let style = MonoTextStyle::new(&TEXT_FONT, color);

        let mut drawn = 0;
        for (i, line) in line_chunks(text, chars_per_line).enumerate() {
            // Overflow puts the line far outside the panel
            let Some(line_y) = cell_offset(y, i, line_height) else {
                break;
            };
            match line_y.checked_add(line_height) {
                Some(bottom) if bottom <= height => {}
                _ => break,
            }

            for (k, c) in line.chars().enumerate() {
                let Some(cell_x) = cell_offset(x, k, cell) else {
                    break;
                };
                if cell_x >= width {
                    break;
                }
                // Cells wholly off the panel draw nothing
                if cell_x <= -cell || line_y <= -cell || line_y >= height {
                    continue;
                }

                let mut utf8 = [0u8; 4];
                let glyph = cell_char(c).encode_utf8(&mut utf8);
                let origin = Point::new(cell_x, line_y);
                let Ok(_) = Text::with_baseline(glyph, origin, style, Baseline::Top).draw(self);
            }
            drawn += 1;
        }

        self.flush()?;

        Ok(drawn)
    }
}

/// `origin + index * step`, or `None` on overflow
fn cell_offset(origin: i32, index: usize, step: i32) -> Option<i32> {
    i32::try_from(index)
        .ok()
        .and_then(|i| i.checked_mul(step))
        .and_then(|offset| origin.checked_add(offset))
}

impl<I2C> Ssd1306<I2C> {
    /// Panel width in pixels
    pub fn width(&self) -> u8 {
        self.config.width
    }

    /// Panel height in pixels
    pub fn height(&self) -> u8 {
        self.config.height
    }

    /// 7-bit I2C address the driver talks to
    pub fn address(&self) -> u8 {
        self.config.address
    }

    /// Panel configuration
    pub fn config(&self) -> &DisplayConfig {
        &self.config
    }

    /// Packed frame buffer (`width * height / 8` bytes)
    pub fn buffer(&self) -> &[u8] {
        &self.frame[1..]
    }

    fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.frame[1..]
    }

    /// Locate pixel `(x, y)` as (buffer index, bit mask)
    fn locate(&self, x: i32, y: i32) -> Option<(usize, u8)> {
        if x < 0 || y < 0 {
            return None;
        }

        let (x, y) = (x as usize, y as usize);
        let width = self.config.width as usize;
        if x >= width || y >= self.config.height as usize {
            return None;
        }

        Some((byte_index(x, y, width), 1 << bit_offset(y)))
    }

    /// Fill the whole frame buffer with one color
    pub fn clear(&mut self, color: BinaryColor) {
        let fill = match color {
            BinaryColor::On => 0xFF,
            BinaryColor::Off => 0x00,
        };
        self.pixels_mut().fill(fill);
    }

    /// Set a single pixel
    ///
    /// Coordinates outside the panel are ignored.
    pub fn set_pixel(&mut self, x: i32, y: i32, color: BinaryColor) {
        if let Some((idx, mask)) = self.locate(x, y) {
            let byte = &mut self.pixels_mut()[idx];
            match color {
                BinaryColor::On => *byte |= mask,
                BinaryColor::Off => *byte &= !mask,
            }
        }
    }

    /// Read back a single pixel, `None` outside the panel
    pub fn get_pixel(&self, x: i32, y: i32) -> Option<BinaryColor> {
        self.locate(x, y).map(|(idx, mask)| {
            if self.buffer()[idx] & mask != 0 {
                BinaryColor::On
            } else {
                BinaryColor::Off
            }
        })
    }

    /// Shift the buffer contents by `(dx, dy)` pixels
    ///
    /// Positive `dx` moves the image right, positive `dy` moves it down.
    /// Pixels shifted past an edge are lost; the band uncovered on the
    /// opposite side keeps its previous contents. Shifting by the full
    /// width or height (or more) does nothing.
    pub fn scroll(&mut self, dx: i32, dy: i32) {
        let width = i32::from(self.config.width);
        let height = i32::from(self.config.height);

        if dx.unsigned_abs() >= width as u32 || dy.unsigned_abs() >= height as u32 {
            return;
        }

        // Walk away from the direction of travel so every source pixel is
        // read before it is overwritten.
        let (x_start, x_end, x_step) = if dx < 0 {
            (0, width + dx, 1)
        } else {
            (width - 1, dx - 1, -1)
        };
        let (y_start, y_end, y_step) = if dy < 0 {
            (0, height + dy, 1)
        } else {
            (height - 1, dy - 1, -1)
        };

        let mut y = y_start;
        while y != y_end {
            let mut x = x_start;
            while x != x_end {
                if let Some(color) = self.get_pixel(x - dx, y - dy) {
                    self.set_pixel(x, y, color);
                }
                x += x_step;
            }
            y += y_step;
        }
    }

    /// Release the I2C bus
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C> OriginDimensions for Ssd1306<I2C> {
    fn size(&self) -> Size {
        Size::new(self.config.width.into(), self.config.height.into())
    }
}

impl<I2C> DrawTarget for Ssd1306<I2C> {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(Point { x, y }, color) in pixels {
            self.set_pixel(x, y, color);
        }

        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        Ssd1306::clear(self, color);
        Ok(())
    }
}

//! Hardware driver implementations
//!
//! This crate provides concrete drivers on top of the traits defined
//! in `picoperiph-hal`:
//!
//! - Displays: SSD1306 monochrome OLED over I2C
//! - Sensors: HC-SR04 ultrasonic range finder (trigger/echo GPIO)
//!
//! The two drivers are independent. Each owns its bus or pins for its
//! whole lifetime; construct one instance per physical device and pass it
//! to whoever needs it.
//!
//! ```ignore
//! use picoperiph_drivers::display::{DisplayConfig, Ssd1306};
//! use picoperiph_drivers::sensor::Hcsr04;
//! use embedded_graphics::pixelcolor::BinaryColor;
//!
//! let mut oled = Ssd1306::new(i2c, DisplayConfig::default())?;
//! let mut ranger = Hcsr04::new(trig, echo, clock)?;
//!
//! loop {
//!     let cm = ranger.safe_measure_cm();
//!     oled.clear(BinaryColor::Off);
//!     oled.draw_text(if cm > 0.0 { "in range" } else { "no echo" }, 0, 0, BinaryColor::On)?;
//! }
//! ```

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod display;
pub mod sensor;

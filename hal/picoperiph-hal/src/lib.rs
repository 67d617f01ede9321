//! picoperiph Hardware Abstraction Layer
//!
//! This crate defines the small set of hardware traits the picoperiph
//! drivers are written against. Chip HALs (or board glue code) implement
//! them; the drivers never touch a register directly.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (board support, main loop) │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  picoperiph-drivers (Ssd1306, Hcsr04)   │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  picoperiph-hal (this crate - traits)   │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ embedded-hal  │       │ embassy-time  │
//! │ 1.0 (compat)  │       │ (feature)     │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`], [`gpio::InputPin`] - Digital I/O
//! - [`i2c::I2cBus`] - I2C bus operations
//! - [`clock::MonotonicClock`] - Free-running microsecond counter
//!
//! Microsecond delays use [`embedded_hal::delay::DelayNs`] directly.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod clock;
pub mod compat;
#[cfg(feature = "embassy-time")]
pub mod embassy;
pub mod gpio;
pub mod i2c;

// Re-export key traits at crate root for convenience
pub use clock::{MonotonicClock, Timebase};
pub use compat::Compat;
#[cfg(feature = "embassy-time")]
pub use embassy::EmbassyClock;
pub use embedded_hal::delay::DelayNs;
pub use gpio::{InputPin, OutputPin};
pub use i2c::{I2cBus, I2cConfig};

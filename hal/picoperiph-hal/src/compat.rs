//! embedded-hal 1.0 adapters
//!
//! Most chip HALs already implement the `embedded-hal` 1.0 traits. Wrapping
//! one of their types in [`Compat`] makes it usable wherever this crate's
//! traits are expected:
//!
//! ```ignore
//! let i2c = Compat::new(rp_i2c);          // embedded_hal::i2c::I2c -> I2cBus
//! let trig = Compat::new(gpio_out);       // digital::OutputPin -> OutputPin
//! let echo = Compat::new(gpio_in);        // digital::InputPin  -> InputPin
//! ```
//!
//! Delay providers need no wrapping: the drivers take
//! `embedded_hal::delay::DelayNs` directly.

use embedded_hal::digital;
use embedded_hal::i2c::I2c;

use crate::gpio::{InputPin, OutputPin};
use crate::i2c::I2cBus;

/// Adapter from an `embedded-hal` 1.0 type to the picoperiph traits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Compat<T>(T);

impl<T> Compat<T> {
    /// Wrap an `embedded-hal` peripheral
    pub fn new(inner: T) -> Self {
        Self(inner)
    }

    /// Borrow the wrapped peripheral
    pub fn inner(&self) -> &T {
        &self.0
    }

    /// Mutably borrow the wrapped peripheral
    pub fn inner_mut(&mut self) -> &mut T {
        &mut self.0
    }

    /// Unwrap the peripheral
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T: I2c> I2cBus for Compat<T> {
    type Error = T::Error;

    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error> {
        self.0.write(address, data)
    }

    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), Self::Error> {
        self.0.read(address, buf)
    }

    fn write_read(
        &mut self,
        address: u8,
        write_data: &[u8],
        read_buf: &mut [u8],
    ) -> Result<(), Self::Error> {
        self.0.write_read(address, write_data, read_buf)
    }
}

impl<T: digital::OutputPin> OutputPin for Compat<T> {
    type Error = T::Error;

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.0.set_high()
    }

    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.0.set_low()
    }
}

impl<T: digital::InputPin> InputPin for Compat<T> {
    type Error = T::Error;

    fn is_high(&mut self) -> Result<bool, Self::Error> {
        self.0.is_high()
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.0.is_low()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_hal::i2c::{ErrorType, Operation};

    /// Records every write transaction as (address, bytes)
    #[derive(Default)]
    struct EhBus {
        writes: Vec<(u8, Vec<u8>)>,
    }

    impl ErrorType for EhBus {
        type Error = Infallible;
    }

    impl I2c for EhBus {
        fn transaction(
            &mut self,
            address: u8,
            operations: &mut [Operation<'_>],
        ) -> Result<(), Self::Error> {
            for op in operations {
                match op {
                    Operation::Write(bytes) => self.writes.push((address, bytes.to_vec())),
                    Operation::Read(buf) => buf.fill(0xA5),
                }
            }
            Ok(())
        }
    }

    struct EhPin {
        high: bool,
    }

    impl digital::ErrorType for EhPin {
        type Error = Infallible;
    }

    impl digital::OutputPin for EhPin {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            self.high = false;
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Self::Error> {
            self.high = true;
            Ok(())
        }
    }

    impl digital::InputPin for EhPin {
        fn is_high(&mut self) -> Result<bool, Self::Error> {
            Ok(self.high)
        }

        fn is_low(&mut self) -> Result<bool, Self::Error> {
            Ok(!self.high)
        }
    }

    #[test]
    fn test_i2c_adapter() {
        let mut bus = Compat::new(EhBus::default());

        I2cBus::write(&mut bus, 0x3C, &[0x00, 0xAF]).unwrap();

        let mut buf = [0u8; 2];
        I2cBus::write_read(&mut bus, 0x3C, &[0x01], &mut buf).unwrap();
        assert_eq!(buf, [0xA5, 0xA5]);

        let inner = bus.into_inner();
        assert_eq!(inner.writes[0], (0x3C, vec![0x00, 0xAF]));
        assert_eq!(inner.writes[1], (0x3C, vec![0x01]));
    }

    #[test]
    fn test_pin_adapter() {
        let mut pin = Compat::new(EhPin { high: false });

        OutputPin::set_high(&mut pin).unwrap();
        assert!(pin.inner().high);
        assert_eq!(InputPin::is_high(&mut pin), Ok(true));

        OutputPin::set_state(&mut pin, false).unwrap();
        assert_eq!(InputPin::is_low(&mut pin), Ok(true));
    }
}

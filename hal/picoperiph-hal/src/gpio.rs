//! GPIO pin abstractions
//!
//! Provides traits for digital input and output pins that can be implemented
//! by chip-specific HALs. Pin direction is carried by the type: a driver that
//! drives a line takes an [`OutputPin`], one that samples a line takes an
//! [`InputPin`]. Configuring the direction is the job of whoever constructs
//! the pin.

/// Digital output pin
///
/// Implementations should handle the actual hardware register manipulation
/// for the specific chip.
pub trait OutputPin {
    /// Error type for pin operations
    type Error;

    /// Set the pin high (logic 1)
    fn set_high(&mut self) -> Result<(), Self::Error>;

    /// Set the pin low (logic 0)
    fn set_low(&mut self) -> Result<(), Self::Error>;

    /// Set the pin to a specific state
    fn set_state(&mut self, high: bool) -> Result<(), Self::Error> {
        if high {
            self.set_high()
        } else {
            self.set_low()
        }
    }
}

/// Digital input pin
///
/// Implementations should handle the actual hardware register reading
/// for the specific chip.
pub trait InputPin {
    /// Error type for pin operations
    type Error;

    /// Check if the pin reads high (logic 1)
    ///
    /// Takes `&mut self` because sampling may go through a shared port
    /// register or an I/O expander.
    fn is_high(&mut self) -> Result<bool, Self::Error>;

    /// Check if the pin reads low (logic 0)
    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.is_high().map(|high| !high)
    }
}

impl<T: OutputPin + ?Sized> OutputPin for &mut T {
    type Error = T::Error;

    fn set_high(&mut self) -> Result<(), Self::Error> {
        T::set_high(self)
    }

    fn set_low(&mut self) -> Result<(), Self::Error> {
        T::set_low(self)
    }
}

impl<T: InputPin + ?Sized> InputPin for &mut T {
    type Error = T::Error;

    fn is_high(&mut self) -> Result<bool, Self::Error> {
        T::is_high(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Mock GPIO pin for testing
    struct MockPin {
        high: bool,
    }

    impl OutputPin for MockPin {
        type Error = ();

        fn set_high(&mut self) -> Result<(), ()> {
            self.high = true;
            Ok(())
        }

        fn set_low(&mut self) -> Result<(), ()> {
            self.high = false;
            Ok(())
        }
    }

    impl InputPin for MockPin {
        type Error = ();

        fn is_high(&mut self) -> Result<bool, ()> {
            Ok(self.high)
        }
    }

    #[test]
    fn test_set_state() {
        let mut pin = MockPin { high: false };

        pin.set_state(true).unwrap();
        assert!(pin.high);

        pin.set_state(false).unwrap();
        assert!(!pin.high);
    }

    #[test]
    fn test_is_low_default() {
        let mut pin = MockPin { high: true };
        assert_eq!(pin.is_low(), Ok(false));

        pin.high = false;
        assert_eq!(pin.is_low(), Ok(true));
    }

    #[test]
    fn test_mut_ref_pin() {
        let mut pin = MockPin { high: false };
        {
            let mut borrowed = &mut pin;
            OutputPin::set_high(&mut borrowed).unwrap();
            assert_eq!(InputPin::is_high(&mut borrowed), Ok(true));
        }
        assert!(pin.high);
    }
}

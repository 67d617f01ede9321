//! Distance sensor implementations

pub mod hcsr04;

use core::fmt;

pub use hcsr04::{Hcsr04, Hcsr04Config};

/// Value reported by the fail-soft readers when there is no valid distance
pub const INVALID_DISTANCE: f32 = -1.0;

/// Errors that can occur while taking a range measurement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RangeError {
    /// Driving the trigger line failed
    Trigger,
    /// Sampling the echo line failed
    Echo,
    /// Echo line did not change level within the configured timeout
    Timeout,
}

impl fmt::Display for RangeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RangeError::Trigger => write!(f, "Trigger pin error"),
            RangeError::Echo => write!(f, "Echo pin error"),
            RangeError::Timeout => write!(f, "Echo timeout"),
        }
    }
}

/// Outcome of a fail-soft measurement
///
/// Keeps "no echo" apart from "echo outside the usable range" for callers
/// that care; [`or_sentinel`](Self::or_sentinel) collapses both to
/// [`INVALID_DISTANCE`] for those that don't.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Reading {
    /// Distance in cm, inside the sensor's valid range
    Distance(f32),
    /// A measurement completed but fell outside the valid range
    OutOfRange(f32),
    /// The measurement itself failed
    Fault(RangeError),
}

impl Reading {
    /// Classify a raw measurement against the open interval
    /// `(min_cm, max_cm)`
    pub fn from_measurement(result: Result<f32, RangeError>, min_cm: f32, max_cm: f32) -> Self {
        match result {
            Ok(cm) if cm > min_cm && cm < max_cm => Reading::Distance(cm),
            Ok(cm) => Reading::OutOfRange(cm),
            Err(e) => Reading::Fault(e),
        }
    }

    /// The distance, if valid
    pub fn value(&self) -> Option<f32> {
        match *self {
            Reading::Distance(cm) => Some(cm),
            _ => None,
        }
    }

    /// Check if this is a usable distance
    pub fn is_valid(&self) -> bool {
        matches!(self, Reading::Distance(_))
    }

    /// The distance, or [`INVALID_DISTANCE`]
    pub fn or_sentinel(&self) -> f32 {
        self.value().unwrap_or(INVALID_DISTANCE)
    }
}

/// Trait for distance sensors
///
/// Implementations should handle the specific ranging technique
/// (ultrasonic time-of-flight, IR triangulation, ...).
pub trait DistanceSensor {
    /// Take one measurement, in centimeters
    fn measure_cm(&mut self) -> Result<f32, RangeError>;

    /// Usable range as an open interval in centimeters
    fn valid_range_cm(&self) -> (f32, f32);

    /// Take one measurement and classify it
    fn read(&mut self) -> Reading {
        let (min, max) = self.valid_range_cm();
        Reading::from_measurement(self.measure_cm(), min, max)
    }

    /// Take one measurement; [`INVALID_DISTANCE`] on any failure
    fn read_or_sentinel(&mut self) -> f32 {
        self.read().or_sentinel()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_in_range() {
        let r = Reading::from_measurement(Ok(19.9), 0.0, 400.0);
        assert_eq!(r, Reading::Distance(19.9));
        assert_eq!(r.value(), Some(19.9));
        assert_eq!(r.or_sentinel(), 19.9);
        assert!(r.is_valid());
    }

    #[test]
    fn test_classify_bounds_are_exclusive() {
        for cm in [0.0, -3.0, 400.0, 512.5] {
            let r = Reading::from_measurement(Ok(cm), 0.0, 400.0);
            assert_eq!(r, Reading::OutOfRange(cm));
            assert_eq!(r.or_sentinel(), INVALID_DISTANCE);
        }

        assert!(Reading::from_measurement(Ok(f32::NAN), 0.0, 400.0).value().is_none());
    }

    #[test]
    fn test_classify_fault() {
        let r = Reading::from_measurement(Err(RangeError::Timeout), 0.0, 400.0);
        assert_eq!(r, Reading::Fault(RangeError::Timeout));
        assert!(!r.is_valid());
        assert_eq!(r.or_sentinel(), INVALID_DISTANCE);
    }

    struct FixedSensor(Result<f32, RangeError>);

    impl DistanceSensor for FixedSensor {
        fn measure_cm(&mut self) -> Result<f32, RangeError> {
            self.0
        }

        fn valid_range_cm(&self) -> (f32, f32) {
            (2.0, 400.0)
        }
    }

    #[test]
    fn test_sensor_trait_defaults() {
        assert_eq!(FixedSensor(Ok(50.0)).read_or_sentinel(), 50.0);
        assert_eq!(FixedSensor(Ok(1.5)).read(), Reading::OutOfRange(1.5));
        assert_eq!(
            FixedSensor(Err(RangeError::Echo)).read_or_sentinel(),
            INVALID_DISTANCE
        );
    }
}

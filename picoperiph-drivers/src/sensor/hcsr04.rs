//! HC-SR04 ultrasonic range sensor
//!
//! The sensor is driven with a >=10 us pulse on TRIG. It then bursts
//! 40 kHz ultrasound and raises ECHO for as long as the sound takes to
//! travel to the target and back:
//!
//! ```text
//! TRIG  __|‾‾‾‾‾‾|_____________________________________
//!          10 us
//! ECHO  ___________________|‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾|__________
//!                          <- round trip time ->
//! ```
//!
//! Distance is `round_trip_us * speed_of_sound / 2`.
//!
//! # Timing policy
//!
//! Both edges are found by polling. The start timestamp is the last clock
//! sample taken while ECHO still read low, the end timestamp the last one
//! taken while it still read high. Resolution is therefore one poll
//! iteration, typically a few microseconds (well under 1 mm).
//!
//! # Blocking
//!
//! With the default configuration the polling loops have no bound: a
//! disconnected sensor or a shorted ECHO line blocks [`Hcsr04::measure`]
//! forever. Set [`Hcsr04Config::echo_timeout_us`] to get
//! [`RangeError::Timeout`] instead. The sensor itself drops ECHO after
//! ~38 ms when nothing comes back, so 40_000 is a sensible bound.

use embedded_hal::delay::DelayNs;
use picoperiph_hal::{InputPin, MonotonicClock, OutputPin};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{DistanceSensor, RangeError, Reading, INVALID_DISTANCE};

/// Low time before the trigger pulse, in us
const TRIGGER_SETTLE_US: u32 = 2;

/// Trigger pulse width from the datasheet, in us
const TRIGGER_PULSE_US: u32 = 10;

/// HC-SR04 configuration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Hcsr04Config {
    /// Speed of sound in cm/us (0.0343 at ~20°C)
    pub speed_of_sound_cm_per_us: f32,
    /// Lower bound of the valid range (exclusive), cm
    pub min_distance_cm: f32,
    /// Upper bound of the valid range (exclusive), cm
    pub max_distance_cm: f32,
    /// Give up waiting on an ECHO edge after this many us (`None` = wait forever)
    pub echo_timeout_us: Option<u32>,
}

impl Default for Hcsr04Config {
    fn default() -> Self {
        Self {
            speed_of_sound_cm_per_us: 0.0343,
            min_distance_cm: 0.0,
            max_distance_cm: 400.0,
            echo_timeout_us: None,
        }
    }
}

/// HC-SR04 ultrasonic range sensor
///
/// Owns the trigger output, the echo input and a time source providing
/// both a microsecond counter and busy-wait delays.
pub struct Hcsr04<TRIG, ECHO, CLK> {
    trigger: TRIG,
    echo: ECHO,
    clock: CLK,
    config: Hcsr04Config,
}

impl<TRIG, ECHO, CLK> Hcsr04<TRIG, ECHO, CLK>
where
    TRIG: OutputPin,
    ECHO: InputPin,
    CLK: MonotonicClock + DelayNs,
{
    /// Create a sensor with the default configuration
    ///
    /// Drives the trigger low immediately.
    pub fn new(trigger: TRIG, echo: ECHO, clock: CLK) -> Result<Self, RangeError> {
        Self::with_config(trigger, echo, clock, Hcsr04Config::default())
    }

    /// Create a sensor with an explicit configuration
    pub fn with_config(
        trigger: TRIG,
        echo: ECHO,
        clock: CLK,
        config: Hcsr04Config,
    ) -> Result<Self, RangeError> {
        let mut sensor = Self {
            trigger,
            echo,
            clock,
            config,
        };
        sensor
            .trigger
            .set_low()
            .map_err(|_| RangeError::Trigger)?;
        Ok(sensor)
    }

    /// Get the configuration
    pub fn config(&self) -> &Hcsr04Config {
        &self.config
    }

    /// Take one measurement, in centimeters
    ///
    /// Blocks for the length of the echo (up to ~38 ms) or, without a
    /// configured timeout, indefinitely if the echo line is stuck.
    pub fn measure(&mut self) -> Result<f32, RangeError> {
        self.send_trigger()?;

        let start = self.wait_while_echo(false)?;
        let end = self.wait_while_echo(true)?;
        let elapsed_us = self.clock.elapsed_us(start, end);

        #[cfg(feature = "defmt")]
        defmt::debug!("HC-SR04 echo: {} us", elapsed_us);

        Ok(self.echo_to_cm(elapsed_us))
    }

    /// Take one measurement and classify it against the valid range
    ///
    /// Never fails; hardware errors and timeouts come back as
    /// [`Reading::Fault`].
    pub fn safe_measure(&mut self) -> Reading {
        Reading::from_measurement(
            self.measure(),
            self.config.min_distance_cm,
            self.config.max_distance_cm,
        )
    }

    /// Take one measurement; [`INVALID_DISTANCE`] unless it is valid
    pub fn safe_measure_cm(&mut self) -> f32 {
        match self.safe_measure() {
            Reading::Distance(cm) => cm,
            _ => INVALID_DISTANCE,
        }
    }

    /// Send the trigger pulse: low 2 us, high 10 us, low
    fn send_trigger(&mut self) -> Result<(), RangeError> {
        self.trigger.set_low().map_err(|_| RangeError::Trigger)?;
        self.clock.delay_us(TRIGGER_SETTLE_US);
        self.trigger.set_high().map_err(|_| RangeError::Trigger)?;
        self.clock.delay_us(TRIGGER_PULSE_US);
        self.trigger.set_low().map_err(|_| RangeError::Trigger)?;
        Ok(())
    }

    /// Poll ECHO for as long as it reads `high`
    ///
    /// Returns the clock sample taken after the last read that still
    /// matched, or 0 if the very first read already differed.
    fn wait_while_echo(&mut self, high: bool) -> Result<u32, RangeError> {
        let timeout = self.config.echo_timeout_us;
        let entered = match timeout {
            Some(_) => self.clock.now_us(),
            None => 0,
        };

        let mut last = 0;
        while self.echo.is_high().map_err(|_| RangeError::Echo)? == high {
            last = self.clock.now_us();

            if let Some(limit) = timeout {
                if self.clock.elapsed_us(entered, last) > limit {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("HC-SR04 echo stuck (high={}) for {} us", high, limit);
                    return Err(RangeError::Timeout);
                }
            }
        }

        Ok(last)
    }

    /// Convert a round-trip time to a one-way distance
    fn echo_to_cm(&self, elapsed_us: u32) -> f32 {
        elapsed_us as f32 * self.config.speed_of_sound_cm_per_us / 2.0
    }

    /// Release the pins and the time source
    pub fn release(self) -> (TRIG, ECHO, CLK) {
        (self.trigger, self.echo, self.clock)
    }
}

impl<TRIG, ECHO, CLK> DistanceSensor for Hcsr04<TRIG, ECHO, CLK>
where
    TRIG: OutputPin,
    ECHO: InputPin,
    CLK: MonotonicClock + DelayNs,
{
    fn measure_cm(&mut self) -> Result<f32, RangeError> {
        self.measure()
    }

    fn valid_range_cm(&self) -> (f32, f32) {
        (self.config.min_distance_cm, self.config.max_distance_cm)
    }
}

// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # DC Motor Drivers
//!
//! This module contains the drivers that sit above the raw `hw/` handles and below the motor
//! controller. Each driver accepts a signed voltage and turns it into a duty cycle plus whatever
//! direction signalling its wiring needs.
//!
//! ## Existing drivers
//!
//! - [`dc1pwm`] – one PWM line, direction encoded by a duty-cycle threshold (RC ESCs, servo-style
//!   drivers)
//! - [`dc1pwm1dir`] – one PWM line and one direction pin (PH/EN bridges such as the DRV8873)
//! - [`dc1pwm2dir`] – one PWM line and two complementary direction pins (L298N-style bridges)

pub mod dc1pwm;
pub mod dc1pwm1dir;
pub mod dc1pwm2dir;

pub use dc1pwm::{DcDriver1Pwm, PwmRange};
pub use dc1pwm1dir::DcDriver1Pwm1Dir;
pub use dc1pwm2dir::DcDriver1Pwm2Dir;

use core::fmt;

use crate::hw::PwmError;
use crate::math::constrain;

/// Supply voltage assumed when none is configured.
pub const DEFAULT_POWER_SUPPLY: f32 = 12.0;

/// Error type for driver initialization.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum DriverError {
    /// PWM channel setup failed.
    Pwm(PwmError),
    /// A direction or enable pin could not be written.
    Pin,
    /// `voltage_power_supply` is not a positive, finite voltage.
    InvalidSupply,
}

impl From<PwmError> for DriverError {
    fn from(e: PwmError) -> Self {
        DriverError::Pwm(e)
    }
}

impl fmt::Display for DriverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriverError::Pwm(e) => write!(f, "PWM configuration failed: {e}"),
            DriverError::Pin => write!(f, "pin configuration failed"),
            DriverError::InvalidSupply => write!(f, "power supply voltage must be positive"),
        }
    }
}

/// Electrical configuration shared by all DC drivers.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DriverConfig {
    /// Bridge supply voltage (V). Duty cycle is voltage divided by this.
    pub voltage_power_supply: f32,
    /// Largest voltage the driver will output (V). `None` means the full supply.
    pub voltage_limit: Option<f32>,
    /// PWM frequency (Hz). `None` keeps the channel default.
    pub pwm_frequency: Option<u32>,
    /// Polarity of the optional enable pin.
    pub enable_active_high: bool,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            voltage_power_supply: DEFAULT_POWER_SUPPLY,
            voltage_limit: None,
            pwm_frequency: None,
            enable_active_high: true,
        }
    }
}

impl DriverConfig {
    pub fn with_power_supply(mut self, volts: f32) -> Self {
        self.voltage_power_supply = volts;
        self
    }

    pub fn with_voltage_limit(mut self, volts: f32) -> Self {
        self.voltage_limit = Some(volts);
        self
    }

    pub fn with_pwm_frequency(mut self, hz: u32) -> Self {
        self.pwm_frequency = Some(hz);
        self
    }

    pub fn with_enable_active_high(mut self, active_high: bool) -> Self {
        self.enable_active_high = active_high;
        self
    }

    /// Effective output limit: unset, negative or above-supply limits resolve to the supply.
    pub fn resolved_voltage_limit(&self) -> f32 {
        match self.voltage_limit {
            Some(limit) if limit >= 0.0 && limit <= self.voltage_power_supply => limit,
            _ => self.voltage_power_supply,
        }
    }

    /// Check the supply and pin down the limit. Called from every driver's `init`.
    pub(crate) fn validate(&mut self) -> Result<(), DriverError> {
        let supply = self.voltage_power_supply;
        if !(supply > 0.0 && supply.is_finite()) {
            return Err(DriverError::InvalidSupply);
        }
        let limit = self.resolved_voltage_limit();
        if self.voltage_limit != Some(limit) {
            log::debug!("DRV: voltage limit resolved to {} V", limit);
        }
        self.voltage_limit = Some(limit);
        Ok(())
    }
}

/// A DC motor driver: accepts a signed voltage and produces duty cycle and direction signals.
///
/// Positive voltages drive "forward", negative voltages "reverse". Every implementation clamps its
/// input to `[-voltage_limit, voltage_limit]` and never writes a NaN duty cycle.
pub trait DcDriver {
    /// Configure pins and the PWM channel. On failure the driver stays uninitialized.
    fn init(&mut self) -> Result<(), DriverError>;

    /// Activate the output stage (enable pin, if wired).
    fn enable(&mut self);

    /// Deactivate the output stage (enable pin, if wired).
    fn disable(&mut self);

    /// Output `voltage` (V) to the motor.
    fn set_pwm(&mut self, voltage: f32);

    /// Largest voltage magnitude this driver will output (V).
    fn voltage_limit(&self) -> f32;

    /// Bridge supply voltage (V).
    fn voltage_power_supply(&self) -> f32;

    /// Whether [`init`](Self::init) has succeeded.
    fn is_initialized(&self) -> bool;
}

/// Duty cycle for a voltage magnitude on the unipolar (PWM + direction pin) drivers.
#[inline]
pub(crate) fn magnitude_duty(
    magnitude: f32,
    voltage_limit: f32,
    voltage_power_supply: f32,
) -> f32 {
    let magnitude = constrain(magnitude, 0.0, voltage_limit);
    constrain(magnitude / voltage_power_supply, 0.0, 1.0)
}

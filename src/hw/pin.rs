// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Digital output helpers for driver enable lines.

use core::convert::Infallible;

use embedded_hal::digital::{ErrorType, OutputPin};

/// Whether a line is driven active-high or active-low on the board wiring.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ActiveLevel {
    High,
    Low,
}

impl ActiveLevel {
    #[inline]
    pub fn from_active_high(active_high: bool) -> Self {
        if active_high {
            ActiveLevel::High
        } else {
            ActiveLevel::Low
        }
    }
}

/// Stand-in for an output line that is not wired. Every write succeeds and does nothing.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct NoPin;

impl ErrorType for NoPin {
    type Error = Infallible;
}

impl OutputPin for NoPin {
    #[inline]
    fn set_low(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    #[inline]
    fn set_high(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Driver enable line that remembers its active level and last commanded state.
pub struct EnableLine<PIN: OutputPin> {
    pin: PIN,
    active: ActiveLevel,
    is_active: bool,
}

impl<PIN: OutputPin> EnableLine<PIN> {
    /// Wrap a pin. Nothing is written until the driver initializes the line.
    pub fn new(pin: PIN, active: ActiveLevel) -> Self {
        Self {
            pin,
            active,
            is_active: false,
        }
    }

    /// Change the polarity used by later writes.
    #[inline]
    pub fn set_active_level(&mut self, active: ActiveLevel) {
        self.active = active;
    }

    /// Drive the line logically active (true) or inactive (false).
    pub fn set(&mut self, active: bool) -> Result<(), PIN::Error> {
        match (self.active, active) {
            (ActiveLevel::High, true) | (ActiveLevel::Low, false) => self.pin.set_high()?,
            (ActiveLevel::High, false) | (ActiveLevel::Low, true) => self.pin.set_low()?,
        }
        self.is_active = active;
        Ok(())
    }

    #[inline]
    pub fn activate(&mut self) -> Result<(), PIN::Error> {
        self.set(true)
    }

    #[inline]
    pub fn deactivate(&mut self) -> Result<(), PIN::Error> {
        self.set(false)
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn free(self) -> PIN {
        self.pin
    }
}

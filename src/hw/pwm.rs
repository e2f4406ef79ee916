// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Duty-cycle outputs.
//!
//! [`PwmOutput`] is the only timer primitive the drivers use: configure once, then write duty
//! cycles as fractions in `[0, 1]`. [`HalPwm`] adapts any `embedded-hal` 1.0 PWM channel.

use core::fmt;

use embedded_hal::pwm::SetDutyCycle;
#[allow(unused_imports)]
use micromath::F32Ext;

use crate::math::constrain;

/// Error type for PWM channel configuration.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PwmError {
    /// The channel reports a maximum duty cycle of zero.
    NoResolution,
    /// The timer cannot produce the requested frequency (Hz).
    UnsupportedFrequency(u32),
    /// The underlying HAL rejected a write during configuration.
    Hal,
}

impl fmt::Display for PwmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PwmError::NoResolution => write!(f, "PWM channel has no duty-cycle resolution"),
            PwmError::UnsupportedFrequency(hz) => write!(f, "PWM frequency {hz} Hz not reachable"),
            PwmError::Hal => write!(f, "PWM channel rejected configuration"),
        }
    }
}

/// A single PWM channel driven by duty-cycle fraction.
pub trait PwmOutput {
    /// Prepare the channel for output at `frequency_hz`, or the channel default when `None`.
    ///
    /// The channel must be left at zero duty cycle on success.
    fn configure(&mut self, frequency_hz: Option<u32>) -> Result<(), PwmError>;

    /// Write a duty cycle in `[0, 1]`. Implementations clamp out-of-range values and map NaN to 0.
    fn write_duty_cycle(&mut self, duty: f32);
}

/// Bring an arbitrary float into a duty cycle the hardware can take.
#[inline]
pub fn sanitize_duty(duty: f32) -> f32 {
    if duty.is_nan() {
        0.0
    } else {
        constrain(duty, 0.0, 1.0)
    }
}

/// Prescaler and auto-reload values giving `frequency_hz` from a 16-bit timer at `timer_clock_hz`.
///
/// Returns `(psc, arr)` for a period of `(psc + 1) * (arr + 1)` timer ticks, or `None` when the
/// frequency is zero or faster than two ticks per period.
pub fn timer_divider(timer_clock_hz: u32, frequency_hz: u32) -> Option<(u16, u16)> {
    if frequency_hz == 0 {
        return None;
    }
    let ticks = timer_clock_hz / frequency_hz;
    if ticks < 2 {
        return None;
    }
    let psc = (ticks - 1) / 0x1_0000;
    let arr = ticks / (psc + 1) - 1;
    Some((u16::try_from(psc).ok()?, u16::try_from(arr).ok()?))
}

/// [`PwmOutput`] over an `embedded-hal` PWM channel.
///
/// The frequency of an `embedded-hal` channel is fixed when the HAL creates it, so
/// [`configure`](PwmOutput::configure) only checks the channel and parks it at zero.
pub struct HalPwm<P> {
    pwm: P,
    last_duty: f32,
}

impl<P: SetDutyCycle> HalPwm<P> {
    pub fn new(pwm: P) -> Self {
        Self {
            pwm,
            last_duty: 0.0,
        }
    }

    /// Last duty cycle fraction written to the channel, after sanitizing.
    #[inline]
    pub fn last_duty(&self) -> f32 {
        self.last_duty
    }

    pub fn free(self) -> P {
        self.pwm
    }
}

impl<P: SetDutyCycle> PwmOutput for HalPwm<P> {
    fn configure(&mut self, frequency_hz: Option<u32>) -> Result<(), PwmError> {
        if let Some(hz) = frequency_hz {
            log::debug!("PWM: frequency fixed by HAL channel, ignoring {} Hz", hz);
        }
        if self.pwm.max_duty_cycle() == 0 {
            return Err(PwmError::NoResolution);
        }
        self.pwm
            .set_duty_cycle_fully_off()
            .map_err(|_| PwmError::Hal)?;
        self.last_duty = 0.0;
        Ok(())
    }

    fn write_duty_cycle(&mut self, duty: f32) {
        let duty = sanitize_duty(duty);
        let max = self.pwm.max_duty_cycle();
        let counts = (duty * max as f32).round() as u16;
        self.pwm.set_duty_cycle(counts.min(max)).ok();
        self.last_duty = duty;
    }
}

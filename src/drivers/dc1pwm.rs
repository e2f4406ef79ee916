// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Single-PWM DC driver with direction encoded in the duty cycle.
//!
//! Intended for motor drivers with a single PWM control signal carrying both speed and direction,
//! such as RC-style ESCs. Duty cycles above `threshold` are "forward", below it "reverse", and
//! exactly `threshold` is electrical zero.

use embedded_hal::digital::OutputPin;

use crate::drivers::{DcDriver, DriverConfig, DriverError};
use crate::hw::{ActiveLevel, EnableLine, NoPin, PwmOutput};
use crate::math::constrain;

/// Duty-cycle geometry of a threshold-encoded PWM signal, as fractions of the period.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PwmRange {
    pub min: f32,
    pub threshold: f32,
    pub max: f32,
}

impl PwmRange {
    /// Derive the range from servo-style pulse widths and the PWM period, all in microseconds.
    pub fn from_microseconds(period_us: f32, min_us: u32, zero_us: u32, max_us: u32) -> Self {
        Self {
            min: min_us as f32 / period_us,
            threshold: zero_us as f32 / period_us,
            max: max_us as f32 / period_us,
        }
    }

    /// The same range seen through an inverted (active-low) output stage.
    ///
    /// `min` and `max` swap places and every fraction is complemented against 1.
    pub fn inverted(self) -> Self {
        Self {
            min: 1.0 - self.max,
            threshold: 1.0 - self.threshold,
            max: 1.0 - self.min,
        }
    }

    /// Each fraction clamped into `[0, 1]`.
    pub fn clamped(self) -> Self {
        Self {
            min: constrain(self.min, 0.0, 1.0),
            threshold: constrain(self.threshold, 0.0, 1.0),
            max: constrain(self.max, 0.0, 1.0),
        }
    }
}

/// DC driver with one PWM line whose duty cycle encodes both speed and direction.
///
/// `EN` is an optional enable pin; use [`NoPin`] when the driver has none.
pub struct DcDriver1Pwm<PWM, EN: OutputPin = NoPin> {
    pwm: PWM,
    enable: EnableLine<EN>,
    config: DriverConfig,
    initialized: bool,
    pwm_period_us: Option<f32>,

    // The geometry fields are fractions of the period and must stay within [0, 1]. The builder and
    // `set_range` clamp; direct field writes are the caller's responsibility.
    /// Duty cycle output for zero voltage.
    pub threshold: f32,
    /// Lowest duty cycle the reverse path may output.
    pub pwm_min: f32,
    /// Highest duty cycle the forward path is scaled to.
    pub pwm_max: f32,
    /// Voltages with magnitude up to this are output as `threshold` (V).
    pub dead_zone: f32,
    /// If true, reverse spans the full `[pwm_min, threshold]` range; if false, reverse uses the
    /// forward slope mirrored around `threshold`.
    pub scale_reverse: bool,
    /// Polarity of the PWM signal, used by the microsecond entry points.
    pub active_high: bool,
}

impl<PWM, EN> DcDriver1Pwm<PWM, EN>
where
    PWM: PwmOutput,
    EN: OutputPin,
{
    /// Construct a new driver with `threshold = 0.5` and the full `[0, 1]` duty range.
    pub fn new(pwm: PWM, enable: EN, config: DriverConfig) -> Self {
        Self {
            pwm,
            enable: EnableLine::new(
                enable,
                ActiveLevel::from_active_high(config.enable_active_high),
            ),
            config,
            initialized: false,
            pwm_period_us: None,
            threshold: 0.5,
            pwm_min: 0.0,
            pwm_max: 1.0,
            dead_zone: 0.0,
            scale_reverse: true,
            active_high: true,
        }
    }

    /// Zero-voltage duty cycle, clamped into `[0, 1]`.
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = constrain(threshold, 0.0, 1.0);
        self
    }

    pub fn with_dead_zone(mut self, volts: f32) -> Self {
        self.dead_zone = volts;
        self
    }

    pub fn with_scale_reverse(mut self, scale_reverse: bool) -> Self {
        self.scale_reverse = scale_reverse;
        self
    }

    /// Current `(pwm_min, threshold, pwm_max)` geometry.
    pub fn range(&self) -> PwmRange {
        PwmRange {
            min: self.pwm_min,
            threshold: self.threshold,
            max: self.pwm_max,
        }
    }

    /// Replace the geometry. Each fraction is clamped into `[0, 1]`.
    pub fn set_range(&mut self, range: PwmRange) {
        let range = range.clamped();
        self.pwm_min = range.min;
        self.threshold = range.threshold;
        self.pwm_max = range.max;
    }

    /// Configure the signal from servo-style pulse widths.
    ///
    /// `hz` is the PWM frequency; `min_us`, `zero_us` and `max_us` are the pulse widths for full
    /// reverse, stop and full forward. With `active_high == false` the range is inverted. The
    /// frequency takes effect on the next [`init`](DcDriver::init).
    pub fn configure_microseconds(
        &mut self,
        hz: u32,
        min_us: u32,
        zero_us: u32,
        max_us: u32,
        active_high: bool,
    ) {
        if hz == 0 {
            log::warn!("DRV: 0 Hz PWM frequency, microsecond configuration ignored");
            return;
        }
        let period_us = 1_000_000.0 / hz as f32;
        self.config.pwm_frequency = Some(hz);
        self.active_high = active_high;
        self.pwm_period_us = Some(period_us);

        let mut range = PwmRange::from_microseconds(period_us, min_us, zero_us, max_us);
        if !active_high {
            range = range.inverted();
        }
        self.set_range(range.clamped());
    }

    /// Write a raw pulse width, bypassing the voltage model.
    ///
    /// Used for pass-through and ESC calibration. Requires a prior
    /// [`configure_microseconds`](Self::configure_microseconds); without it nothing is written.
    pub fn set_pwm_microseconds(&mut self, us: u32) {
        let Some(period_us) = self.pwm_period_us else {
            log::warn!("DRV: PWM period not configured, pulse width ignored");
            return;
        };
        let mut duty = us as f32 / period_us;
        if !self.active_high {
            duty = 1.0 - duty;
        }
        let duty = constrain(duty, self.pwm_min, self.pwm_max);
        self.pwm.write_duty_cycle(duty);
    }

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// Release the PWM channel and enable pin.
    pub fn free(self) -> (PWM, EN) {
        (self.pwm, self.enable.free())
    }
}

impl<PWM, EN> DcDriver for DcDriver1Pwm<PWM, EN>
where
    PWM: PwmOutput,
    EN: OutputPin,
{
    fn init(&mut self) -> Result<(), DriverError> {
        self.initialized = false;
        self.config.validate()?;

        self.enable
            .set_active_level(ActiveLevel::from_active_high(self.config.enable_active_high));
        self.enable.deactivate().map_err(|_| DriverError::Pin)?;

        self.pwm.configure(self.config.pwm_frequency)?;
        self.initialized = true;
        log::info!("DRV: 1PWM driver initialized");
        Ok(())
    }

    fn enable(&mut self) {
        self.enable.activate().ok();
    }

    fn disable(&mut self) {
        self.enable.deactivate().ok();
    }

    fn set_pwm(&mut self, voltage: f32) {
        let limit = self.voltage_limit();
        let supply = self.config.voltage_power_supply;
        let u = constrain(voltage, -limit, limit);

        if u > self.dead_zone {
            // Forward duty is written as computed; only the reverse path clamps to the range.
            let duty = self.threshold + (u / supply) * (self.pwm_max - self.threshold);
            self.pwm.write_duty_cycle(duty);
        } else if u < -self.dead_zone {
            let span = if self.scale_reverse {
                self.threshold - self.pwm_min
            } else {
                self.pwm_max - self.threshold
            };
            let duty = constrain(self.threshold + (u / supply) * span, self.pwm_min, self.pwm_max);
            self.pwm.write_duty_cycle(duty);
        } else {
            // Dead zone, zero, or NaN.
            self.pwm.write_duty_cycle(self.threshold);
        }
    }

    fn voltage_limit(&self) -> f32 {
        self.config.resolved_voltage_limit()
    }

    fn voltage_power_supply(&self) -> f32 {
        self.config.voltage_power_supply
    }

    fn is_initialized(&self) -> bool {
        self.initialized
    }
}

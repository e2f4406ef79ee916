// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! DC driver with one PWM speed signal and one direction pin.
//!
//! Matches PH/EN style bridges (e.g. DRV8873 in PH/EN mode): the PWM line sets the magnitude and
//! the direction pin selects the bridge polarity.

use embedded_hal::digital::OutputPin;

use crate::drivers::{magnitude_duty, DcDriver, DriverConfig, DriverError};
use crate::hw::{ActiveLevel, EnableLine, NoPin, PwmOutput};

/// DC driver with a PWM line and a direction pin (high = forward, low = reverse).
pub struct DcDriver1Pwm1Dir<PWM, DIR, EN: OutputPin = NoPin> {
    pwm: PWM,
    dir: DIR,
    enable: EnableLine<EN>,
    config: DriverConfig,
    initialized: bool,
}

impl<PWM, DIR, EN> DcDriver1Pwm1Dir<PWM, DIR, EN>
where
    PWM: PwmOutput,
    DIR: OutputPin,
    EN: OutputPin,
{
    pub fn new(pwm: PWM, dir: DIR, enable: EN, config: DriverConfig) -> Self {
        Self {
            pwm,
            dir,
            enable: EnableLine::new(
                enable,
                ActiveLevel::from_active_high(config.enable_active_high),
            ),
            config,
            initialized: false,
        }
    }

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// Release the PWM channel and pins.
    pub fn free(self) -> (PWM, DIR, EN) {
        (self.pwm, self.dir, self.enable.free())
    }
}

impl<PWM, DIR, EN> DcDriver for DcDriver1Pwm1Dir<PWM, DIR, EN>
where
    PWM: PwmOutput,
    DIR: OutputPin,
    EN: OutputPin,
{
    fn init(&mut self) -> Result<(), DriverError> {
        self.initialized = false;
        self.config.validate()?;

        self.enable
            .set_active_level(ActiveLevel::from_active_high(self.config.enable_active_high));
        self.enable.deactivate().map_err(|_| DriverError::Pin)?;
        self.dir.set_high().map_err(|_| DriverError::Pin)?;

        self.pwm.configure(self.config.pwm_frequency)?;
        self.initialized = true;
        log::info!("DRV: 1PWM+DIR driver initialized");
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

        if voltage > 0.0 {
            self.pwm
                .write_duty_cycle(magnitude_duty(voltage, limit, supply));
            self.dir.set_high().ok();
        } else if voltage < 0.0 {
            self.pwm
                .write_duty_cycle(magnitude_duty(-voltage, limit, supply));
            self.dir.set_low().ok();
        } else {
            // Zero or NaN: stop driving, leave direction as is.
            self.pwm.write_duty_cycle(0.0);
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

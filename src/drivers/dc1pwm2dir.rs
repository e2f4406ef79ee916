// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! DC driver with one PWM speed signal and two direction pins.
//!
//! Typically used with H-bridges where the direction pins drive the two bridge legs and the PWM
//! line goes to the enable/speed input:
//!
//! | dir1 | dir2 | Function |
//! | ---- | ---- | -------- |
//! | H    | L    | Forward  |
//! | L    | H    | Reverse  |

use embedded_hal::digital::OutputPin;

use crate::drivers::{magnitude_duty, DcDriver, DriverConfig, DriverError};
use crate::hw::{ActiveLevel, EnableLine, NoPin, PwmOutput};

/// DC driver with a PWM line and a complementary pair of direction pins.
pub struct DcDriver1Pwm2Dir<PWM, DIR1, DIR2, EN: OutputPin = NoPin> {
    pwm: PWM,
    dir1: DIR1,
    dir2: DIR2,
    enable: EnableLine<EN>,
    config: DriverConfig,
    initialized: bool,
}

impl<PWM, DIR1, DIR2, EN> DcDriver1Pwm2Dir<PWM, DIR1, DIR2, EN>
where
    PWM: PwmOutput,
    DIR1: OutputPin,
    DIR2: OutputPin,
    EN: OutputPin,
{
    pub fn new(pwm: PWM, dir1: DIR1, dir2: DIR2, enable: EN, config: DriverConfig) -> Self {
        Self {
            pwm,
            dir1,
            dir2,
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
    pub fn free(self) -> (PWM, DIR1, DIR2, EN) {
        (self.pwm, self.dir1, self.dir2, self.enable.free())
    }
}

impl<PWM, DIR1, DIR2, EN> DcDriver for DcDriver1Pwm2Dir<PWM, DIR1, DIR2, EN>
where
    PWM: PwmOutput,
    DIR1: OutputPin,
    DIR2: OutputPin,
    EN: OutputPin,
{
    fn init(&mut self) -> Result<(), DriverError> {
        self.initialized = false;
        self.config.validate()?;

        self.enable
            .set_active_level(ActiveLevel::from_active_high(self.config.enable_active_high));
        self.enable.deactivate().map_err(|_| DriverError::Pin)?;
        self.dir1.set_high().map_err(|_| DriverError::Pin)?;
        self.dir2.set_low().map_err(|_| DriverError::Pin)?;

        self.pwm.configure(self.config.pwm_frequency)?;
        self.initialized = true;
        log::info!("DRV: 1PWM+2DIR driver initialized");
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

        // The leg being released is always written before the leg being driven.
        if voltage > 0.0 {
            self.pwm
                .write_duty_cycle(magnitude_duty(voltage, limit, supply));
            self.dir2.set_low().ok();
            self.dir1.set_high().ok();
        } else if voltage < 0.0 {
            self.pwm
                .write_duty_cycle(magnitude_duty(-voltage, limit, supply));
            self.dir1.set_low().ok();
            self.dir2.set_high().ok();
        } else {
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

// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Recording test doubles for the hardware handles.
//!
//! Pins and PWM channels created from the same [`EventLog`] append to one shared timeline, so
//! tests can assert on the exact order of hardware writes.

use std::cell::RefCell;
use std::convert::Infallible;
use std::rc::Rc;
use std::vec::Vec;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{self, OutputPin};
use embedded_hal::pwm::{self, SetDutyCycle};

use crate::hw::{PwmError, PwmOutput};
use crate::sensors::Sensor;

/// One hardware write.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    Configure(Option<u32>),
    Duty(f32),
    Pin(&'static str, bool),
}

#[derive(Clone, Default)]
pub struct EventLog(Rc<RefCell<Vec<Event>>>);

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, event: Event) {
        self.0.borrow_mut().push(event);
    }

    pub fn events(&self) -> Vec<Event> {
        self.0.borrow().clone()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }

    /// Duty cycles written so far, in order.
    pub fn duties(&self) -> Vec<f32> {
        self.0
            .borrow()
            .iter()
            .filter_map(|e| match e {
                Event::Duty(d) => Some(*d),
                _ => None,
            })
            .collect()
    }

    pub fn last_duty(&self) -> Option<f32> {
        self.duties().last().copied()
    }

    /// Whether any PWM channel was configured.
    pub fn configured(&self) -> bool {
        self.0
            .borrow()
            .iter()
            .any(|e| matches!(e, Event::Configure(_)))
    }

    /// Last level written to the named pin.
    pub fn pin_level(&self, name: &str) -> Option<bool> {
        self.0.borrow().iter().rev().find_map(|e| match e {
            Event::Pin(n, level) if *n == name => Some(*level),
            _ => None,
        })
    }
}

/// Write error reported by a failing [`MockPin`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct MockPinError;

impl digital::Error for MockPinError {
    fn kind(&self) -> digital::ErrorKind {
        digital::ErrorKind::Other
    }
}

/// [`OutputPin`] double. A failing pin rejects every write and logs nothing.
pub struct MockPin {
    name: &'static str,
    log: EventLog,
    pub fail: bool,
}

impl MockPin {
    pub fn new(name: &'static str, log: &EventLog) -> Self {
        Self {
            name,
            log: log.clone(),
            fail: false,
        }
    }

    pub fn failing(name: &'static str, log: &EventLog) -> Self {
        Self {
            name,
            log: log.clone(),
            fail: true,
        }
    }

    fn write(&mut self, level: bool) -> Result<(), MockPinError> {
        if self.fail {
            return Err(MockPinError);
        }
        self.log.push(Event::Pin(self.name, level));
        Ok(())
    }
}

impl digital::ErrorType for MockPin {
    type Error = MockPinError;
}

impl OutputPin for MockPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.write(false)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.write(true)
    }
}

/// [`PwmOutput`] double. `fail` makes `configure` report the failure sentinel.
pub struct MockPwm {
    log: EventLog,
    pub fail: bool,
}

impl MockPwm {
    pub fn new(log: &EventLog) -> Self {
        Self {
            log: log.clone(),
            fail: false,
        }
    }

    pub fn failing(log: &EventLog) -> Self {
        Self {
            log: log.clone(),
            fail: true,
        }
    }
}

impl PwmOutput for MockPwm {
    fn configure(&mut self, frequency_hz: Option<u32>) -> Result<(), PwmError> {
        self.log.push(Event::Configure(frequency_hz));
        if self.fail {
            Err(PwmError::UnsupportedFrequency(frequency_hz.unwrap_or(0)))
        } else {
            Ok(())
        }
    }

    fn write_duty_cycle(&mut self, duty: f32) {
        self.log.push(Event::Duty(duty));
    }
}

/// `embedded-hal` PWM channel double holding raw counts.
pub struct MockHalPwm {
    pub max: u16,
    pub duty: u16,
}

impl MockHalPwm {
    pub fn new(max: u16) -> Self {
        Self { max, duty: 0 }
    }
}

impl pwm::ErrorType for MockHalPwm {
    type Error = Infallible;
}

impl SetDutyCycle for MockHalPwm {
    fn max_duty_cycle(&self) -> u16 {
        self.max
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
        self.duty = duty;
        Ok(())
    }
}

/// Accumulates requested delay instead of sleeping.
#[derive(Default)]
pub struct MockDelay {
    pub total_ns: u64,
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += u64::from(ns);
    }
}

/// Sensor double with directly settable readings.
#[derive(Default)]
pub struct MockSensor {
    pub angle: f32,
    pub velocity: f32,
    pub updates: u32,
}

impl Sensor for MockSensor {
    fn update(&mut self, _dt: f32) {
        self.updates += 1;
    }

    fn angle(&self) -> f32 {
        self.angle
    }

    fn velocity(&self) -> f32 {
        self.velocity
    }
}

/// Install a test logger so `log` output shows up with `--nocapture`.
pub fn init_logs() {
    let _ = env_logger::builder()
        .is_test(true)
        .filter_level(log::LevelFilter::Debug)
        .try_init();
}

/// Float comparison with an absolute tolerance.
#[track_caller]
pub fn assert_close(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() < 1e-5,
        "expected {expected}, got {actual}"
    );
}

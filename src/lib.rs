// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # OmniTiles DC Motor Actuation
//!
//! This crate turns a closed-loop controller's voltage command into PWM duty cycles and direction
//! signals for brushed DC motors, written in Rust and usable on any `embedded-hal` target. Board
//! support for the STM32F777 OmniTiles controller sits behind the `stm32f7` feature.
//!
//! ## Crate Structure
//!
//! | Module | Purpose |
//! | ------ | -------- |
//! | [`hw`] | Hardware handles: PWM outputs, enable lines, STM32F7 timers |
//! | [`drivers`] | DC motor drivers for 1-PWM, 1-PWM + DIR and 1-PWM + 2 DIR wiring |
//! | [`sensors`] | Position sensor interface |
//! | [`control`] | Control algorithms (PID) |
//! | [`motors`] | Closed-loop DC motor controller |
//!
//! ## Getting Started
//!
//! ```no_run
//! use omnitiles_dc::drivers::{DcDriver, DcDriver1Pwm1Dir, DriverConfig};
//! use omnitiles_dc::motors::{ControlMode, DcMotor, Motor, MotorConfig};
//! # fn demo<P, D, S, DL>(pwm: P, dir: D, sensor: S, delay: &mut DL)
//! # where
//! #     P: omnitiles_dc::hw::PwmOutput,
//! #     D: embedded_hal::digital::OutputPin,
//! #     S: omnitiles_dc::sensors::Sensor,
//! #     DL: embedded_hal::delay::DelayNs,
//! # {
//! let mut driver = DcDriver1Pwm1Dir::new(
//!     pwm,
//!     dir,
//!     omnitiles_dc::hw::NoPin,
//!     DriverConfig::default().with_power_supply(12.0),
//! );
//! driver.init().ok();
//!
//! let mut motor = DcMotor::new(MotorConfig::default());
//! motor.link_driver(driver);
//! motor.link_sensor(sensor);
//! motor.set_control_mode(ControlMode::Velocity);
//! motor.init(delay);
//!
//! loop {
//!     motor.step(Some(10.0), 0.001);
//! }
//! # }
//! ```
//!
//! Build docs:
//!
//! ```bash
//! cargo doc --no-deps --open
//! ```
//!
//! Flash the board:
//!
//! ```bash
//! cargo run --release --features stm32f7
//! ```
//!
//! ## License
//!
//! Licensed under the **MIT License**.
//! See the `LICENSE` file in the repository root for full terms.
//!
//! © 2025–2026 Christopher Liu

#![cfg_attr(not(test), no_std)]

pub mod control;
pub mod drivers;
pub mod hw;
pub mod math;
pub mod motors;
pub mod sensors;

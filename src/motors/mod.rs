// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Motor Controllers
//!
//! This module contains motor-level controllers that sit above the drivers in `drivers`.
//!
//! ## Modules
//!
//! - [`dc_motor`] - Closed-loop brushed DC motor built on any
//!   [`DcDriver`](crate::drivers::DcDriver).
//!
//! [`Motor`] is the contract shared with multi-phase motors. Parts of it (FOC alignment and the
//! FOC inner loop) have no meaning for a DC motor and are implemented as no-ops there.

pub mod dc_motor;

pub use dc_motor::{DcMotor, MotorConfig};

use embedded_hal::delay::DelayNs;

/// Motion control law.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum ControlMode {
    /// Target is a torque command (interpreted per [`TorqueMode`]).
    #[default]
    Torque,
    /// Target is a shaft velocity (rad/s).
    Velocity,
    /// Target is a shaft angle (rad), via a cascaded angle → velocity loop.
    Angle,
    /// Angle PID straight to torque, without the velocity loop.
    AngleNoCascade,
    /// Open-loop velocity.
    VelocityOpenLoop,
    /// Open-loop angle.
    AngleOpenLoop,
}

impl ControlMode {
    #[inline]
    pub fn is_open_loop(self) -> bool {
        matches!(
            self,
            ControlMode::VelocityOpenLoop | ControlMode::AngleOpenLoop
        )
    }
}

/// How a torque command is realized.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum TorqueMode {
    /// Torque command is a voltage.
    #[default]
    Voltage,
    /// Current loop on the measured DC current.
    DcCurrent,
    /// Current loop on the d/q currents.
    FocCurrent,
}

/// Lifecycle state of a motor controller.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum MotorStatus {
    #[default]
    Uninitialized,
    Initializing,
    Ready,
    InitFailed,
    /// Stopped after an unrecoverable condition. Cleared only by re-running `init`.
    Error,
}

/// Voltage command on the quadrature (q) and direct (d) axes.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct DqVoltage {
    pub q: f32,
    pub d: f32,
}

/// Controller contract shared across motor types.
pub trait Motor {
    /// Check links, apply limits and enable the motor. Blocks on `delay` for settling.
    fn init<DL: DelayNs>(&mut self, delay: &mut DL);

    /// Enable the driver and command zero output.
    fn enable(&mut self);

    /// Command zero output and disable the driver.
    fn disable(&mut self);

    /// Run one step of the motion control loop.
    ///
    /// `new_target` replaces the stored target when `Some`. `dt` is the time in seconds since the
    /// previous step.
    fn step(&mut self, new_target: Option<f32>, dt: f32);

    /// Output a voltage vector at electrical angle `angle_el`.
    fn set_phase_voltage(&mut self, uq: f32, ud: f32, angle_el: f32);

    /// Sensor/electrical alignment. Returns true on success.
    fn init_foc(&mut self) -> bool;

    /// Inner FOC loop.
    fn loop_foc(&mut self);

    fn status(&self) -> MotorStatus;
}

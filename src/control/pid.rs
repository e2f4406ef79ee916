// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Generic PID controller for closed-loop control.
//!
//! Works in `no_std` and does not allocate memory. With `ki = kd = 0` it doubles as the plain
//! proportional controller used for the outer angle loop.

use crate::math::constrain;

/// PID controller with tunable gains and output clamping.
#[derive(Clone, Debug)]
pub struct Pid {
    /// Proportional gain
    kp: f32,
    /// Integral gain
    ki: f32,
    /// Derivative gain
    kd: f32,

    /// Integrator state
    integral: f32,
    /// Last process variable (for derivative term)
    prev_measurement: f32,

    /// Output clamp
    out_min: f32,
    out_max: f32,

    /// Integral anti-windup clamp
    int_min: f32,
    int_max: f32,

    first_update: bool,
}

impl Pid {
    /// Create a new PID controller.
    ///
    /// `kp`, `ki`, `kd` are the gain constants.
    pub fn new(kp: f32, ki: f32, kd: f32) -> Self {
        Self {
            kp,
            ki,
            kd,

            integral: 0.0,
            prev_measurement: 0.0,

            out_min: -1.0,
            out_max: 1.0,

            int_min: -1.0,
            int_max: 1.0,

            first_update: true,
        }
    }

    /// Proportional-only controller.
    pub fn proportional(kp: f32) -> Self {
        Self::new(kp, 0.0, 0.0)
    }

    /// Set output limits.
    pub fn with_output_limits(mut self, min: f32, max: f32) -> Self {
        self.out_min = min;
        self.out_max = max;
        self
    }

    /// Clamp both the output and the integrator to `[-limit, limit]`.
    ///
    /// This is the single limit the motor controller rewrites during init.
    pub fn set_limit(&mut self, limit: f32) {
        let limit = if limit >= 0.0 { limit } else { 0.0 };
        self.out_min = -limit;
        self.out_max = limit;
        self.int_min = -limit;
        self.int_max = limit;
        self.integral = constrain(self.integral, self.int_min, self.int_max);
    }

    /// Upper output limit.
    #[inline]
    pub fn limit(&self) -> f32 {
        self.out_max
    }

    /// Replace the gains, keeping integrator state.
    pub fn set_gains(&mut self, kp: f32, ki: f32, kd: f32) {
        self.kp = kp;
        self.ki = ki;
        self.kd = kd;
    }

    /// Reset integrator + derivative history.
    pub fn reset(&mut self) {
        self.integral = 0.0;
        self.prev_measurement = 0.0;
        self.first_update = true;
    }

    /// Update the controller.
    ///
    /// `setpoint` — desired value
    /// `measurement` — current value
    /// `dt` — timestep in seconds (e.g. 0.001 for a 1 kHz control loop)
    ///
    /// Returns a command in [`out_min`, `out_max`]. A non-positive `dt` skips the I and D terms.
    pub fn update(&mut self, setpoint: f32, measurement: f32, dt: f32) -> f32 {
        let error = setpoint - measurement;
        let dt_valid = dt > 0.0;

        // ----- P term -----
        let p = self.kp * error;

        // ----- I term -----
        if dt_valid {
            self.integral += error * dt * self.ki;
        }

        // Anti-windup clamp
        self.integral = constrain(self.integral, self.int_min, self.int_max);

        let i = self.integral;

        // ----- D term (on measurement to reduce noise sensitivity) -----
        let d = if self.first_update || !dt_valid {
            self.first_update = false;
            0.0
        } else {
            let dv = self.prev_measurement - measurement;
            self.kd * (dv / dt)
        };
        self.prev_measurement = measurement;

        // ----- Output clamp -----
        constrain(p + i + d, self.out_min, self.out_max)
    }
}

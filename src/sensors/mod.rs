// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Position Sensors
//!
//! The motor controller only needs a shaft angle and velocity, refreshed once per control step.
//! Concrete sensors live next to their hardware (see `hw::Encoder` with the `stm32f7` feature).

use core::f32::consts::TAU;

/// Shaft position sensor.
pub trait Sensor {
    /// Refresh the reading. `dt` is the time in seconds since the previous update.
    ///
    /// May block briefly on hardware access.
    fn update(&mut self, dt: f32);

    /// Accumulated shaft angle in radians, full turns included.
    fn angle(&self) -> f32;

    /// Shaft velocity in rad/s.
    fn velocity(&self) -> f32;
}

/// Counting direction of the sensor relative to positive motor voltage.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum Direction {
    #[default]
    Unknown,
    Clockwise,
    CounterClockwise,
}

impl Direction {
    /// Multiplier applied to sensor readings. `Unknown` zeroes them out.
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Direction::Clockwise => 1.0,
            Direction::CounterClockwise => -1.0,
            Direction::Unknown => 0.0,
        }
    }
}

/// Angle and velocity tracking from a raw quadrature count.
///
/// Hardware counters feed their signed position into [`feed`](Self::feed) once per update.
#[derive(Copy, Clone, Debug)]
pub struct CountTracker {
    counts_per_rev: u32,
    angle: f32,
    velocity: f32,
}

impl CountTracker {
    /// `counts_per_rev` is counted in quadrature edges (4 × lines). Zero is treated as one.
    pub fn new(counts_per_rev: u32) -> Self {
        Self {
            counts_per_rev: counts_per_rev.max(1),
            angle: 0.0,
            velocity: 0.0,
        }
    }

    #[inline]
    pub fn counts_per_rev(&self) -> u32 {
        self.counts_per_rev
    }

    /// Convert a counter position to an angle and differentiate against the previous one.
    ///
    /// Velocity is held when `dt` is not positive.
    pub fn feed(&mut self, position: i32, dt: f32) {
        let cpr = self.counts_per_rev as i64;
        let position = position as i64;
        // Whole turns kept apart from the fraction to hold precision at large counts
        let turns = position.div_euclid(cpr);
        let rem = position.rem_euclid(cpr);
        let angle = turns as f32 * TAU + rem as f32 / cpr as f32 * TAU;

        if dt > 0.0 {
            self.velocity = (angle - self.angle) / dt;
        }
        self.angle = angle;
    }

    /// Forget the stored angle and velocity (after the hardware counter is zeroed).
    pub fn reset(&mut self) {
        self.angle = 0.0;
        self.velocity = 0.0;
    }

    #[inline]
    pub fn angle(&self) -> f32 {
        self.angle
    }

    #[inline]
    pub fn velocity(&self) -> f32 {
        self.velocity
    }
}

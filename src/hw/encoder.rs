// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Quadrature encoder on STM32F7 TIM2 as a shaft [`Sensor`].
//!
//! TIM2 is 32-bit, so the counter is read as a signed position without overflow tracking.

use stm32f7xx_hal::pac;

use crate::sensors::{CountTracker, Sensor};

pub struct Encoder<TIM> {
    tim: TIM,
    tracker: CountTracker,
}

impl<TIM> Encoder<TIM> {
    /// Consume the wrapper and return the underlying timer peripheral.
    #[inline]
    pub fn free(self) -> TIM {
        self.tim
    }

    #[inline]
    pub fn counts_per_rev(&self) -> u32 {
        self.tracker.counts_per_rev()
    }
}

impl Encoder<pac::TIM2> {
    /// Configure TIM2 as a quadrature encoder with full 32-bit range.
    ///
    /// `counts_per_rev` counts every edge on both channels (4 × encoder lines).
    pub fn tim2(tim2: pac::TIM2, counts_per_rev: u32) -> Self {
        let rcc = unsafe { &*pac::RCC::ptr() };
        rcc.apb1enr.modify(|_, w| w.tim2en().set_bit());

        let tim = tim2;

        // Disable counter while configuring
        tim.cr1.modify(|_, w| w.cen().clear_bit());

        // Auto-reload: max 32-bit
        tim.arr.write(|w| w.bits(0xFFFF_FFFF));

        // Slave mode: encoder mode 3 (count on both TI1 and TI2)
        tim.smcr.modify(|_, w| w.sms().bits(0b011));

        // CH1/CH2 as inputs from TI1/TI2
        tim.ccmr1_input().modify(|_, w| w.cc1s().ti1().cc2s().ti2());

        tim.ccer.modify(|_, w| {
            w.cc1p()
                .clear_bit()
                .cc2p()
                .clear_bit()
                .cc1e()
                .set_bit()
                .cc2e()
                .set_bit()
        });

        tim.cnt.write(|w| w.bits(0));
        tim.cr1.modify(|_, w| w.cen().set_bit());

        log::info!("ENC: TIM2 quadrature, {} counts/rev", counts_per_rev);
        Self {
            tim,
            tracker: CountTracker::new(counts_per_rev),
        }
    }

    /// Counter as a signed 32-bit position.
    #[inline]
    pub fn position(&self) -> i32 {
        self.tim.cnt.read().cnt().bits() as i32
    }

    /// Zero the counter and the tracked angle.
    pub fn reset(&mut self) {
        self.tim.cnt.write(|w| w.bits(0));
        self.tracker.reset();
    }
}

impl Sensor for Encoder<pac::TIM2> {
    fn update(&mut self, dt: f32) {
        let position = self.position();
        self.tracker.feed(position, dt);
    }

    fn angle(&self) -> f32 {
        self.tracker.angle()
    }

    fn velocity(&self) -> f32 {
        self.tracker.velocity()
    }
}

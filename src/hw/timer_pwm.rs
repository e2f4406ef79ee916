// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Register-level PWM on STM32F7 TIM4 channel 1 (PD12, the DRV8873 IN1/PH input on motor 1).
//!
//! The timer runs in edge-aligned PWM mode 1 with preloaded compare and auto-reload registers.

use stm32f7xx_hal::pac;

#[allow(unused_imports)]
use micromath::F32Ext;

use crate::hw::{sanitize_duty, timer_divider, PwmError, PwmOutput};

/// Frequency used when the driver does not ask for one. Above the audible range.
pub const DEFAULT_FREQUENCY_HZ: u32 = 25_000;

pub struct TimPwm {
    tim: pac::TIM4,
    timer_clock_hz: u32,
    arr: u16,
}

impl TimPwm {
    /// Take TIM4 and set channel 1 up for PWM output. The output stays idle until `configure`.
    ///
    /// `timer_clock_hz` is the APB1 timer clock (`clocks.timclk1()`).
    pub fn tim4_ch1(tim4: pac::TIM4, timer_clock_hz: u32) -> Self {
        let rcc = unsafe { &*pac::RCC::ptr() };
        rcc.apb1enr.modify(|_, w| w.tim4en().set_bit());

        let tim = tim4;

        // Disable counter while configuring
        tim.cr1.modify(|_, w| w.cen().clear_bit());

        // CH1 as output, PWM mode 1, compare preload
        tim.ccmr1_output().modify(|_, w| unsafe {
            w.cc1s().bits(0b00).oc1m().bits(0b110).oc1pe().set_bit()
        });

        // Active high, output enabled
        tim.ccer.modify(|_, w| w.cc1p().clear_bit().cc1e().set_bit());

        // Auto-reload preload
        tim.cr1.modify(|_, w| w.arpe().set_bit());

        Self {
            tim,
            timer_clock_hz,
            arr: 0,
        }
    }

    /// Consume the wrapper and return the underlying timer peripheral.
    pub fn free(self) -> pac::TIM4 {
        self.tim.cr1.modify(|_, w| w.cen().clear_bit());
        self.tim
    }

    #[inline]
    fn write_compare(&mut self, ticks: u32) {
        self.tim.ccr1.write(|w| unsafe { w.bits(ticks) });
    }
}

impl PwmOutput for TimPwm {
    fn configure(&mut self, frequency_hz: Option<u32>) -> Result<(), PwmError> {
        let hz = frequency_hz.unwrap_or(DEFAULT_FREQUENCY_HZ);
        let (psc, arr) =
            timer_divider(self.timer_clock_hz, hz).ok_or(PwmError::UnsupportedFrequency(hz))?;

        self.tim.cr1.modify(|_, w| w.cen().clear_bit());
        self.tim.psc.write(|w| w.psc().bits(psc));
        self.tim.arr.write(|w| unsafe { w.bits(arr as u32) });
        self.arr = arr;
        self.write_compare(0);

        // Load the preloaded registers, then start counting
        self.tim.egr.write(|w| w.ug().set_bit());
        self.tim.cr1.modify(|_, w| w.cen().set_bit());

        log::info!("PWM: TIM4 CH1 at {} Hz (psc {}, arr {})", hz, psc, arr);
        Ok(())
    }

    fn write_duty_cycle(&mut self, duty: f32) {
        // CCR > ARR holds the output high for the whole period
        let ticks = (sanitize_duty(duty) * (self.arr as f32 + 1.0)).round() as u32;
        self.write_compare(ticks);
    }
}

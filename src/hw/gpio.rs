// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! STM32F7 push-pull outputs as `embedded-hal` 1.0 [`OutputPin`]s, for direction and enable lines.

use core::convert::Infallible;

use embedded_hal::digital::{ErrorType, OutputPin};
use stm32f7xx_hal::gpio::{self, Output, PinState, PushPull};

/// Push-pull GPIO output, generic over any pin.
pub struct OutputLine<const P: char, const N: u8> {
    pin: gpio::Pin<P, N, Output<PushPull>>,
}

impl<const P: char, const N: u8> OutputLine<P, N> {
    /// Convert `pin` to a push-pull output driven to `initial`.
    pub fn new<MODE>(pin: gpio::Pin<P, N, MODE>, initial: PinState) -> Self {
        let mut pin = pin.into_push_pull_output();
        pin.set_state(initial);
        Self { pin }
    }

    pub fn free(self) -> gpio::Pin<P, N, Output<PushPull>> {
        self.pin
    }
}

impl<const P: char, const N: u8> ErrorType for OutputLine<P, N> {
    type Error = Infallible;
}

impl<const P: char, const N: u8> OutputPin for OutputLine<P, N> {
    #[inline]
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.pin.set_low();
        Ok(())
    }

    #[inline]
    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.pin.set_high();
        Ok(())
    }
}

// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Hardware Handles
//!
//! Everything a driver touches on the MCU is owned by that driver as an explicit handle, so the
//! drivers above this layer can run against real peripherals or test doubles alike.
//!
//! - [`pwm`] – duty-cycle outputs ([`PwmOutput`]) and an adapter for `embedded-hal` PWM channels
//! - [`pin`] – driver enable lines and the [`NoPin`] placeholder
//! - `encoder`, `timer_pwm`, `gpio`, `usart` – STM32F7 timer, GPIO and debug console adapters
//!   (feature `stm32f7`)

pub mod pin;
pub mod pwm;

#[cfg(feature = "stm32f7")]
pub mod encoder;
#[cfg(feature = "stm32f7")]
pub mod gpio;
#[cfg(feature = "stm32f7")]
pub mod timer_pwm;
#[cfg(feature = "stm32f7")]
pub mod usart;

#[cfg(test)]
pub(crate) mod mock;

pub use pin::{ActiveLevel, EnableLine, NoPin};
pub use pwm::{sanitize_duty, timer_divider, HalPwm, PwmError, PwmOutput};

#[cfg(feature = "stm32f7")]
pub use encoder::Encoder;
#[cfg(feature = "stm32f7")]
pub use gpio::OutputLine;
#[cfg(feature = "stm32f7")]
pub use timer_pwm::TimPwm;
#[cfg(feature = "stm32f7")]
pub use usart::{init_logger, Usart};

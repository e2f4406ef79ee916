// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! USART debug console and `log` backend.
//!
//! After [`init_logger`], every `log` record from the motor stack is written to USART1 as one
//! CRLF-terminated line.
//!
//! To access the terminal on the host machine, connect to the debug USB port and use
//! ```text
//! $ screen /dev/tty.usbmodem* <baud_rate>
//! ```
//!
//! To close the debug terminal, press `Ctrl+A` then `Ctrl+\` then `y`.

use core::cell::RefCell;
use core::fmt::{self, Write};

use cortex_m::interrupt::Mutex;
use nb::block;
use stm32f7xx_hal::{
    pac,
    prelude::*,
    serial::{Instance, Pins, Serial, Tx},
};

pub struct Usart<U: Instance> {
    tx: Tx<U>,
}

impl<U: Instance> Usart<U> {
    pub fn new<PINS: Pins<U>>(serial: Serial<U, PINS>) -> Self {
        let (tx, _rx) = serial.split();
        Self { tx }
    }

    #[inline]
    pub fn write_byte(&mut self, b: u8) {
        let _ = block!(self.tx.write(b));
    }

    pub fn write_str(&mut self, s: &str) {
        for &b in s.as_bytes() {
            self.write_byte(b);
        }
    }

    /// Write string and CRLF terminator.
    #[inline]
    pub fn println(&mut self, s: &str) {
        self.write_str(s);
        self.write_str("\r\n");
    }

    /// Block until the hardware TX FIFO/drain is flushed.
    #[inline]
    pub fn flush(&mut self) {
        let _ = block!(self.tx.flush());
    }
}

impl<U: Instance> fmt::Write for Usart<U> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        Usart::write_str(self, s);
        Ok(())
    }
}

static CONSOLE: Mutex<RefCell<Option<Usart<pac::USART1>>>> = Mutex::new(RefCell::new(None));

struct UsartLogger;

static LOGGER: UsartLogger = UsartLogger;

impl log::Log for UsartLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        cortex_m::interrupt::free(|cs| {
            if let Some(usart) = CONSOLE.borrow(cs).borrow_mut().as_mut() {
                let _ = write!(usart, "[{}] {}\r\n", record.level(), record.args());
            }
        });
    }

    fn flush(&self) {
        cortex_m::interrupt::free(|cs| {
            if let Some(usart) = CONSOLE.borrow(cs).borrow_mut().as_mut() {
                usart.flush();
            }
        });
    }
}

/// Hand USART1 to the global logger and install it at `level`.
pub fn init_logger(
    usart: Usart<pac::USART1>,
    level: log::LevelFilter,
) -> Result<(), log::SetLoggerError> {
    cortex_m::interrupt::free(|cs| *CONSOLE.borrow(cs).borrow_mut() = Some(usart));
    log::set_logger(&LOGGER)?;
    log::set_max_level(level);
    Ok(())
}

// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! OmniTiles motor 1 velocity loop.
//!
//! Drives the DRV8873 on motor 1 in PH/EN mode from TIM4 CH1 and closes a velocity loop on the
//! TIM2 quadrature encoder at 1 kHz. Status is logged on USART1 at 115200 baud.

#![no_main]
#![no_std]

use cortex_m_rt::entry;
use panic_halt as _;

use embedded_hal::delay::DelayNs;
use hal::{
    gpio::PinState,
    pac,
    prelude::*,
    serial::{Config, Serial},
};
use stm32f7xx_hal as hal;

use omnitiles_dc::drivers::{DcDriver, DcDriver1Pwm1Dir, DriverConfig};
use omnitiles_dc::hw::{init_logger, Encoder, OutputLine, TimPwm, Usart};
use omnitiles_dc::motors::{ControlMode, DcMotor, Motor, MotorConfig, MotorStatus};

const LOOP_PERIOD_US: u32 = 1_000;
const LOG_EVERY_STEPS: u32 = 500;

const SUPPLY_VOLTS: f32 = 12.0;
const VOLTAGE_LIMIT: f32 = 6.0;
const PWM_HZ: u32 = 25_000;

/// Quadrature counts per output shaft revolution.
const ENCODER_CPR: u32 = 4 * 1024;

const TARGET_RAD_PER_S: f32 = 10.0;

/// SysTick busy-wait delay as an `embedded-hal` 1.0 [`DelayNs`].
struct SysDelay(cortex_m::delay::Delay);

impl DelayNs for SysDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.0.delay_us(ns.div_ceil(1_000));
    }
}

fn halt() -> ! {
    loop {
        cortex_m::asm::wfi();
    }
}

#[entry]
fn main() -> ! {
    // Peripherals
    let dp = pac::Peripherals::take().unwrap();
    let cp = cortex_m::Peripherals::take().unwrap();

    // Clocks
    let rcc = dp.RCC.constrain();
    let clocks = rcc.cfgr.freeze();

    // GPIO
    let gpioa = dp.GPIOA.split();
    let gpiod = dp.GPIOD.split();

    // USART1 (DBG)
    let tx = gpioa.pa9.into_alternate::<7>();
    let rx = gpioa.pa10.into_alternate::<7>();
    let usart_cfg = Config {
        baud_rate: 115_200.bps(),
        ..Default::default()
    };
    let serial = Serial::new(dp.USART1, (tx, rx), &clocks, usart_cfg);
    init_logger(Usart::new(serial), log::LevelFilter::Info).ok();

    let mut delay = SysDelay(cortex_m::delay::Delay::new(
        cp.SYST,
        clocks.sysclk().raw(),
    ));

    // Motor 1, DRV8873 PH/EN mode: IN1 = EN (PWM), IN2 = PH (direction)
    let _in1 = gpiod.pd12.into_alternate::<2>();
    let ph = OutputLine::new(gpiod.pd13, PinState::High);
    let nsleep = OutputLine::new(gpioa.pa4, PinState::Low);
    // DISABLE high forces Hi-Z; held low, the bridge is gated by nSLEEP
    let _disable = OutputLine::new(gpioa.pa3, PinState::Low);

    // TIM2 CH1/CH2 encoder inputs
    let _enc_a = gpioa.pa0.into_alternate::<1>();
    let _enc_b = gpioa.pa1.into_alternate::<1>();

    let pwm = TimPwm::tim4_ch1(dp.TIM4, clocks.timclk1().raw());
    let mut driver = DcDriver1Pwm1Dir::new(
        pwm,
        ph,
        nsleep,
        DriverConfig::default()
            .with_power_supply(SUPPLY_VOLTS)
            .with_voltage_limit(VOLTAGE_LIMIT)
            .with_pwm_frequency(PWM_HZ),
    );
    if let Err(e) = driver.init() {
        log::error!("DRV: init failed: {}", e);
    }

    let mut motor = DcMotor::new(MotorConfig::default().with_voltage_limit(VOLTAGE_LIMIT));
    motor.link_driver(driver);
    let encoder = Encoder::tim2(dp.TIM2, ENCODER_CPR);
    log::info!(
        "MOT: velocity loop, {} counts/rev, {} V limit",
        encoder.counts_per_rev(),
        VOLTAGE_LIMIT
    );
    motor.link_sensor(encoder);
    motor.set_control_mode(ControlMode::Velocity);
    motor.init(&mut delay);

    if motor.status() != MotorStatus::Ready {
        log::error!("MOT: not ready ({:?}), halting", motor.status());
        halt();
    }

    let dt = LOOP_PERIOD_US as f32 * 1e-6;
    let mut steps: u32 = 0;

    loop {
        motor.step(Some(TARGET_RAD_PER_S), dt);

        if motor.status() == MotorStatus::Error {
            halt();
        }

        steps = steps.wrapping_add(1);
        if steps % LOG_EVERY_STEPS == 0 {
            log::info!(
                "MOT: vel {} rad/s, uq {} V",
                motor.shaft_velocity(),
                motor.voltage().q
            );
        }

        delay.delay_us(LOOP_PERIOD_US);
    }
}

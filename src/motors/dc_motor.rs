// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Closed-loop control of brushed DC motors.
//!
//! [`DcMotor`] reads a shaft position sensor, runs the selected control law and hands a single
//! voltage to its [`DcDriver`]. DC motors are treated as having one pole pair, and there is no
//! second electrical axis, so the d-axis voltage is always zero.
//!
//! Open-loop control is not supported: the open-loop modes are accepted but `step` does nothing in
//! them. For open-loop voltage control use the driver directly.
//!
//! Typical usage pattern:
//!
//! ```ignore
//! motor.link_driver(driver);
//! motor.link_sensor(encoder);
//! motor.set_control_mode(ControlMode::Velocity);
//! motor.init(&mut delay);
//!
//! loop {
//!     motor.step(Some(10.0), dt_seconds);
//!     delay.delay_ms(1);
//! }
//! ```

use embedded_hal::delay::DelayNs;

use crate::control::Pid;
use crate::drivers::DcDriver;
use crate::motors::{ControlMode, DqVoltage, Motor, MotorStatus, TorqueMode};
use crate::sensors::{Direction, Sensor};

/// Settling time before and after enabling the driver during init (ms).
const SETTLE_MS: u32 = 50;

/// Limits and sensor setup of a [`DcMotor`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MotorConfig {
    /// Largest voltage command (V). Lowered to the driver's limit at init.
    pub voltage_limit: f32,
    /// Current limit (A), used as the velocity-loop limit in current torque modes.
    pub current_limit: f32,
    /// Velocity limit (rad/s), used as the angle-loop limit.
    pub velocity_limit: f32,
    /// Voltage used for sensor alignment (V). Never above `voltage_limit` after init.
    pub voltage_sensor_align: f32,
    /// Winding resistance (Ω), if known.
    pub phase_resistance: Option<f32>,
    /// Sensor counting direction. `Unknown` resolves to `Clockwise` at init.
    pub sensor_direction: Direction,
    /// Angle subtracted from the sensor reading (rad).
    pub sensor_offset: f32,
    /// Whether a current sense is attached.
    pub current_sense: bool,
}

impl Default for MotorConfig {
    fn default() -> Self {
        Self {
            voltage_limit: 12.0,
            current_limit: 2.0,
            velocity_limit: 20.0,
            voltage_sensor_align: 3.0,
            phase_resistance: None,
            sensor_direction: Direction::Unknown,
            sensor_offset: 0.0,
            current_sense: false,
        }
    }
}

impl MotorConfig {
    pub fn with_voltage_limit(mut self, volts: f32) -> Self {
        self.voltage_limit = volts;
        self
    }

    pub fn with_current_limit(mut self, amps: f32) -> Self {
        self.current_limit = amps;
        self
    }

    pub fn with_velocity_limit(mut self, rad_per_s: f32) -> Self {
        self.velocity_limit = rad_per_s;
        self
    }

    pub fn with_sensor_direction(mut self, direction: Direction) -> Self {
        self.sensor_direction = direction;
        self
    }

    pub fn with_sensor_offset(mut self, rad: f32) -> Self {
        self.sensor_offset = rad;
        self
    }

    pub fn with_phase_resistance(mut self, ohms: f32) -> Self {
        self.phase_resistance = Some(ohms);
        self
    }

    pub fn with_current_sense(mut self, present: bool) -> Self {
        self.current_sense = present;
        self
    }
}

/// Closed-loop brushed DC motor.
///
/// The driver and sensor are attached after construction with [`link_driver`](Self::link_driver)
/// and [`link_sensor`](Self::link_sensor), then [`init`](Motor::init) brings the motor up.
pub struct DcMotor<D, S> {
    driver: Option<D>,
    sensor: Option<S>,
    config: MotorConfig,

    control_mode: ControlMode,
    torque_mode: TorqueMode,
    status: MotorStatus,
    enabled: bool,

    /// Current target: voltage, velocity or angle depending on `control_mode`.
    target: f32,
    shaft_angle: f32,
    shaft_velocity: f32,
    shaft_angle_setpoint: f32,
    shaft_velocity_setpoint: f32,
    voltage: DqVoltage,

    pid_velocity: Pid,
    p_angle: Pid,
    pid_current_q: Pid,
    pid_current_d: Pid,
}

impl<D, S> DcMotor<D, S>
where
    D: DcDriver,
    S: Sensor,
{
    pub fn new(config: MotorConfig) -> Self {
        Self {
            driver: None,
            sensor: None,
            config,
            control_mode: ControlMode::Torque,
            torque_mode: TorqueMode::Voltage,
            status: MotorStatus::Uninitialized,
            enabled: false,
            target: 0.0,
            shaft_angle: 0.0,
            shaft_velocity: 0.0,
            shaft_angle_setpoint: 0.0,
            shaft_velocity_setpoint: 0.0,
            voltage: DqVoltage::default(),
            pid_velocity: Pid::new(0.5, 10.0, 0.0),
            p_angle: Pid::proportional(20.0),
            pid_current_q: Pid::new(3.0, 300.0, 0.0),
            pid_current_d: Pid::new(3.0, 300.0, 0.0),
        }
    }

    /// Attach the driver, returning the previously linked one.
    ///
    /// The motor drops back to `Uninitialized` and must be re-initialized.
    pub fn link_driver(&mut self, driver: D) -> Option<D> {
        self.unlink();
        self.driver.replace(driver)
    }

    /// Attach the position sensor, returning the previously linked one.
    ///
    /// The motor drops back to `Uninitialized` and must be re-initialized.
    pub fn link_sensor(&mut self, sensor: S) -> Option<S> {
        self.unlink();
        self.sensor.replace(sensor)
    }

    fn unlink(&mut self) {
        if self.enabled {
            self.disable();
        }
        self.status = MotorStatus::Uninitialized;
    }

    pub fn set_control_mode(&mut self, mode: ControlMode) {
        self.control_mode = mode;
    }

    pub fn set_torque_mode(&mut self, mode: TorqueMode) {
        self.torque_mode = mode;
    }

    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    #[inline]
    pub fn control_mode(&self) -> ControlMode {
        self.control_mode
    }

    #[inline]
    pub fn torque_mode(&self) -> TorqueMode {
        self.torque_mode
    }

    #[inline]
    pub fn target(&self) -> f32 {
        self.target
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Shaft angle (rad) from the last step, with sensor direction and offset applied.
    #[inline]
    pub fn shaft_angle(&self) -> f32 {
        self.shaft_angle
    }

    /// Shaft velocity (rad/s) from the last step.
    #[inline]
    pub fn shaft_velocity(&self) -> f32 {
        self.shaft_velocity
    }

    #[inline]
    pub fn shaft_angle_setpoint(&self) -> f32 {
        self.shaft_angle_setpoint
    }

    #[inline]
    pub fn shaft_velocity_setpoint(&self) -> f32 {
        self.shaft_velocity_setpoint
    }

    /// Last commanded voltage.
    #[inline]
    pub fn voltage(&self) -> DqVoltage {
        self.voltage
    }

    pub fn config(&self) -> &MotorConfig {
        &self.config
    }

    /// Mutable configuration. Limit changes take effect on the next `init`.
    pub fn config_mut(&mut self) -> &mut MotorConfig {
        &mut self.config
    }

    pub fn pid_velocity(&self) -> &Pid {
        &self.pid_velocity
    }

    pub fn pid_velocity_mut(&mut self) -> &mut Pid {
        &mut self.pid_velocity
    }

    pub fn p_angle(&self) -> &Pid {
        &self.p_angle
    }

    pub fn p_angle_mut(&mut self) -> &mut Pid {
        &mut self.p_angle
    }

    pub fn pid_current_q(&self) -> &Pid {
        &self.pid_current_q
    }

    pub fn pid_current_d(&self) -> &Pid {
        &self.pid_current_d
    }

    pub fn driver(&self) -> Option<&D> {
        self.driver.as_ref()
    }

    pub fn driver_mut(&mut self) -> Option<&mut D> {
        self.driver.as_mut()
    }

    pub fn sensor(&self) -> Option<&S> {
        self.sensor.as_ref()
    }

    pub fn sensor_mut(&mut self) -> Option<&mut S> {
        self.sensor.as_mut()
    }

    /// Tear down this motor and return its driver and sensor.
    pub fn free(mut self) -> (Option<D>, Option<S>) {
        if self.enabled {
            self.disable();
        }
        (self.driver.take(), self.sensor.take())
    }
}

impl<D, S> Motor for DcMotor<D, S>
where
    D: DcDriver,
    S: Sensor,
{
    fn init<DL: DelayNs>(&mut self, delay: &mut DL) {
        let driver_limit = match &self.driver {
            Some(driver) if driver.is_initialized() => driver.voltage_limit(),
            _ => {
                self.status = MotorStatus::InitFailed;
                log::warn!("MOT: Init not possible, driver not initialized");
                return;
            }
        };
        if self.sensor.is_none() {
            self.status = MotorStatus::InitFailed;
            log::warn!("MOT: Init not possible, sensor not initialized");
            return;
        }

        self.status = MotorStatus::Initializing;
        log::info!("MOT: Init");

        let cfg = &mut self.config;
        if cfg.voltage_limit > driver_limit {
            log::debug!("MOT: voltage limit lowered to driver limit {} V", driver_limit);
            cfg.voltage_limit = driver_limit;
        }
        if cfg.voltage_sensor_align > cfg.voltage_limit {
            cfg.voltage_sensor_align = cfg.voltage_limit;
        }

        if cfg.current_sense {
            // current loop outputs voltage
            self.pid_current_q.set_limit(cfg.voltage_limit);
            self.pid_current_d.set_limit(cfg.voltage_limit);
        }
        if cfg.phase_resistance.is_some() || self.torque_mode != TorqueMode::Voltage {
            // velocity loop outputs current
            self.pid_velocity.set_limit(cfg.current_limit);
        } else {
            // velocity loop outputs voltage
            self.pid_velocity.set_limit(cfg.voltage_limit);
        }
        self.p_angle.set_limit(cfg.velocity_limit);

        delay.delay_ms(SETTLE_MS);
        log::info!("MOT: Enable driver.");
        self.enable();
        delay.delay_ms(SETTLE_MS);

        if self.config.sensor_direction == Direction::Unknown {
            self.config.sensor_direction = Direction::Clockwise;
            log::info!("MOT: Sensor Dir: CW");
        }

        self.status = MotorStatus::Ready;
    }

    fn enable(&mut self) {
        if self.status == MotorStatus::Error {
            log::warn!("MOT: Enable refused in error state, re-run init");
            return;
        }
        let Some(driver) = self.driver.as_mut() else {
            log::warn!("MOT: Enable not possible, no driver linked");
            return;
        };
        driver.enable();
        driver.set_pwm(0.0);
        self.enabled = true;
    }

    fn disable(&mut self) {
        if let Some(driver) = self.driver.as_mut() {
            driver.set_pwm(0.0);
            driver.disable();
        }
        self.enabled = false;
    }

    fn step(&mut self, new_target: Option<f32>, dt: f32) {
        if let Some(sensor) = self.sensor.as_mut() {
            sensor.update(dt);
            let dir = self.config.sensor_direction.sign();
            self.shaft_angle = dir * sensor.angle() - self.config.sensor_offset;
            self.shaft_velocity = dir * sensor.velocity();
        }

        if let Some(target) = new_target {
            self.target = target;
        }

        if self.control_mode.is_open_loop() {
            return;
        }
        if !self.enabled {
            return;
        }

        self.voltage.d = 0.0;
        let uq = match self.control_mode {
            ControlMode::Torque => match self.torque_mode {
                TorqueMode::Voltage => self.target,
                // current torque modes are not implemented for DC motors
                TorqueMode::DcCurrent | TorqueMode::FocCurrent => 0.0,
            },
            ControlMode::Angle => {
                self.shaft_angle_setpoint = self.target;
                self.shaft_velocity_setpoint =
                    self.p_angle
                        .update(self.shaft_angle_setpoint, self.shaft_angle, dt);
                self.pid_velocity
                    .update(self.shaft_velocity_setpoint, self.shaft_velocity, dt)
            }
            ControlMode::Velocity => {
                self.shaft_velocity_setpoint = self.target;
                self.pid_velocity
                    .update(self.shaft_velocity_setpoint, self.shaft_velocity, dt)
            }
            unsupported => {
                self.voltage.q = 0.0;
                self.disable();
                self.status = MotorStatus::Error;
                log::error!("MOT: {:?} not supported for DC motors, disabled", unsupported);
                return;
            }
        };
        self.voltage.q = uq;

        self.set_phase_voltage(uq, 0.0, 0.0);
    }

    fn set_phase_voltage(&mut self, uq: f32, _ud: f32, _angle_el: f32) {
        if !self.enabled {
            return;
        }
        if let Some(driver) = self.driver.as_mut() {
            driver.set_pwm(uq);
        }
    }

    fn init_foc(&mut self) -> bool {
        // no alignment for DC motors
        false
    }

    fn loop_foc(&mut self) {}

    fn status(&self) -> MotorStatus {
        self.status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::{DcDriver1Pwm1Dir, DriverConfig};
    use crate::hw::mock::{
        assert_close, init_logs, Event, EventLog, MockDelay, MockPin, MockPwm, MockSensor,
    };

    type Driver = DcDriver1Pwm1Dir<MockPwm, MockPin, MockPin>;
    type TestMotor = DcMotor<Driver, MockSensor>;

    fn driver(log: &EventLog) -> Driver {
        DcDriver1Pwm1Dir::new(
            MockPwm::new(log),
            MockPin::new("dir", log),
            MockPin::new("en", log),
            DriverConfig::default().with_power_supply(12.0),
        )
    }

    /// Motor with an initialized driver and a sensor, not yet initialized itself.
    fn linked_motor(log: &EventLog, config: MotorConfig) -> TestMotor {
        let mut drv = driver(log);
        drv.init().unwrap();
        let mut motor = DcMotor::new(config);
        motor.link_driver(drv);
        motor.link_sensor(MockSensor::default());
        motor
    }

    fn ready_motor(log: &EventLog) -> TestMotor {
        let mut motor = linked_motor(log, MotorConfig::default());
        motor.init(&mut MockDelay::default());
        assert_eq!(motor.status(), MotorStatus::Ready);
        log.clear();
        motor
    }

    #[test]
    fn init_without_driver_fails() {
        init_logs();
        let mut motor: TestMotor = DcMotor::new(MotorConfig::default());
        motor.link_sensor(MockSensor::default());
        motor.init(&mut MockDelay::default());
        assert_eq!(motor.status(), MotorStatus::InitFailed);
        assert!(!motor.is_enabled());

        // nothing to enable without a driver
        motor.enable();
        assert!(!motor.is_enabled());
    }

    #[test]
    fn driver_with_failed_pin_setup_fails_motor_init() {
        let log = EventLog::new();
        let mut drv = DcDriver1Pwm1Dir::new(
            MockPwm::new(&log),
            MockPin::failing("dir", &log),
            MockPin::new("en", &log),
            DriverConfig::default(),
        );
        assert!(drv.init().is_err());

        let mut motor: TestMotor = DcMotor::new(MotorConfig::default());
        motor.link_driver(drv);
        motor.link_sensor(MockSensor::default());
        log.clear();

        motor.init(&mut MockDelay::default());
        assert_eq!(motor.status(), MotorStatus::InitFailed);
        assert!(!motor.is_enabled());
        assert!(log.events().is_empty());
    }

    #[test]
    fn init_with_uninitialized_driver_touches_no_hardware() {
        let log = EventLog::new();
        let mut motor: TestMotor = DcMotor::new(MotorConfig::default());
        motor.link_driver(driver(&log));
        motor.link_sensor(MockSensor::default());

        let mut delay = MockDelay::default();
        motor.init(&mut delay);

        assert_eq!(motor.status(), MotorStatus::InitFailed);
        assert!(log.events().is_empty());
        assert_eq!(delay.total_ns, 0);
    }

    #[test]
    fn init_without_sensor_fails() {
        let log = EventLog::new();
        let mut drv = driver(&log);
        drv.init().unwrap();
        let mut motor: TestMotor = DcMotor::new(MotorConfig::default());
        motor.link_driver(drv);
        log.clear();

        motor.init(&mut MockDelay::default());
        assert_eq!(motor.status(), MotorStatus::InitFailed);
        assert!(log.events().is_empty());
    }

    #[test]
    fn init_clamps_limits_enables_and_resolves_direction() {
        init_logs();
        let log = EventLog::new();
        let mut motor = linked_motor(
            &log,
            MotorConfig {
                voltage_limit: 24.0,
                voltage_sensor_align: 20.0,
                ..MotorConfig::default()
            },
        );
        log.clear();

        let mut delay = MockDelay::default();
        motor.init(&mut delay);

        assert_eq!(motor.status(), MotorStatus::Ready);
        assert!(motor.is_enabled());
        assert_eq!(motor.config().voltage_limit, 12.0);
        assert_eq!(motor.config().voltage_sensor_align, 12.0);
        assert_eq!(motor.config().sensor_direction, Direction::Clockwise);
        assert_eq!(motor.pid_velocity().limit(), 12.0);
        assert_eq!(motor.p_angle().limit(), 20.0);
        assert_eq!(delay.total_ns, 100_000_000);
        assert_eq!(log.events(), vec![Event::Pin("en", true), Event::Duty(0.0)]);
    }

    #[test]
    fn init_keeps_known_sensor_direction() {
        let log = EventLog::new();
        let mut motor = linked_motor(
            &log,
            MotorConfig::default().with_sensor_direction(Direction::CounterClockwise),
        );
        motor.init(&mut MockDelay::default());
        assert_eq!(
            motor.config().sensor_direction,
            Direction::CounterClockwise
        );
    }

    #[test]
    fn current_torque_mode_limits_velocity_loop_by_current() {
        let log = EventLog::new();
        let mut motor = linked_motor(&log, MotorConfig::default().with_current_limit(1.5));
        motor.set_torque_mode(TorqueMode::DcCurrent);
        motor.init(&mut MockDelay::default());
        assert_eq!(motor.pid_velocity().limit(), 1.5);

        let mut motor = linked_motor(&log, MotorConfig::default().with_phase_resistance(2.0));
        motor.init(&mut MockDelay::default());
        assert_eq!(motor.pid_velocity().limit(), 2.0);
    }

    #[test]
    fn current_sense_limits_current_loops_by_voltage() {
        let log = EventLog::new();
        let mut motor = linked_motor(
            &log,
            MotorConfig::default()
                .with_voltage_limit(6.0)
                .with_current_sense(true),
        );
        motor.init(&mut MockDelay::default());
        assert_eq!(motor.pid_current_q().limit(), 6.0);
        assert_eq!(motor.pid_current_d().limit(), 6.0);
    }

    #[test]
    fn disable_zeroes_output_before_driver_off() {
        let log = EventLog::new();
        let mut motor = ready_motor(&log);

        motor.disable();
        assert!(!motor.is_enabled());
        assert_eq!(log.events(), vec![Event::Duty(0.0), Event::Pin("en", false)]);

        log.clear();
        motor.enable();
        assert!(motor.is_enabled());
        assert_eq!(log.events(), vec![Event::Pin("en", true), Event::Duty(0.0)]);
    }

    #[test]
    fn torque_voltage_mode_passes_target_through() {
        let log = EventLog::new();
        let mut motor = ready_motor(&log);

        motor.step(Some(-6.0), 0.001);
        assert_eq!(motor.voltage(), DqVoltage { q: -6.0, d: 0.0 });
        assert_eq!(log.events(), vec![Event::Duty(0.5), Event::Pin("dir", false)]);

        // no new target keeps the old one
        motor.step(None, 0.001);
        assert_eq!(motor.target(), -6.0);

        // zero is a real target, not "unset"
        motor.step(Some(0.0), 0.001);
        assert_eq!(motor.target(), 0.0);
        assert_eq!(log.last_duty(), Some(0.0));
    }

    #[test]
    fn current_torque_modes_output_zero() {
        let log = EventLog::new();
        let mut motor = ready_motor(&log);
        motor.set_torque_mode(TorqueMode::FocCurrent);

        motor.step(Some(6.0), 0.001);
        assert_eq!(motor.voltage().q, 0.0);
        assert_eq!(log.last_duty(), Some(0.0));
        assert_eq!(motor.status(), MotorStatus::Ready);
    }

    #[test]
    fn velocity_mode_runs_velocity_pid() {
        let log = EventLog::new();
        let mut motor = ready_motor(&log);
        motor.set_control_mode(ControlMode::Velocity);
        motor.pid_velocity_mut().set_gains(1.0, 0.0, 0.0);
        motor.sensor_mut().unwrap().velocity = 0.5;

        motor.step(Some(2.5), 0.001);

        assert_close(motor.shaft_velocity(), 0.5);
        assert_close(motor.shaft_velocity_setpoint(), 2.5);
        assert_close(motor.voltage().q, 2.0);
        assert_close(log.last_duty().unwrap(), 2.0 / 12.0);
    }

    #[test]
    fn angle_mode_cascades_angle_into_velocity() {
        let log = EventLog::new();
        let mut motor = ready_motor(&log);
        motor.set_control_mode(ControlMode::Angle);
        motor.p_angle_mut().set_gains(2.0, 0.0, 0.0);
        motor.pid_velocity_mut().set_gains(1.0, 0.0, 0.0);
        {
            let sensor = motor.sensor_mut().unwrap();
            sensor.angle = 0.25;
            sensor.velocity = 0.5;
        }

        motor.step(Some(1.25), 0.001);

        assert_close(motor.shaft_angle_setpoint(), 1.25);
        assert_close(motor.shaft_velocity_setpoint(), 2.0);
        assert_close(motor.voltage().q, 1.5);
        assert_close(log.last_duty().unwrap(), 1.5 / 12.0);
    }

    #[test]
    fn angle_loop_output_bounded_by_velocity_limit() {
        let log = EventLog::new();
        let mut motor = ready_motor(&log);
        motor.set_control_mode(ControlMode::Angle);

        motor.step(Some(100.0), 0.001);
        assert_close(motor.shaft_velocity_setpoint(), 20.0);
        assert!(motor.voltage().q <= 12.0);
    }

    #[test]
    fn open_loop_modes_issue_no_commands() {
        let log = EventLog::new();
        let mut motor = ready_motor(&log);

        for mode in [ControlMode::VelocityOpenLoop, ControlMode::AngleOpenLoop] {
            motor.set_control_mode(mode);
            motor.step(Some(3.0), 0.001);
            assert!(log.events().is_empty());
            assert_eq!(motor.status(), MotorStatus::Ready);
        }
        // the sensor is still read and the target still stored
        assert_eq!(motor.sensor().unwrap().updates, 2);
        assert_eq!(motor.target(), 3.0);
    }

    #[test]
    fn disabled_motor_issues_no_commands() {
        let log = EventLog::new();
        let mut motor = ready_motor(&log);
        motor.disable();
        log.clear();

        motor.step(Some(6.0), 0.001);
        motor.set_phase_voltage(6.0, 0.0, 0.0);
        assert!(log.events().is_empty());
    }

    #[test]
    fn unsupported_mode_is_terminal_until_reinit() {
        init_logs();
        let log = EventLog::new();
        let mut motor = ready_motor(&log);
        motor.set_control_mode(ControlMode::AngleNoCascade);

        motor.step(Some(1.0), 0.001);
        assert_eq!(motor.status(), MotorStatus::Error);
        assert!(!motor.is_enabled());
        assert_eq!(motor.voltage().q, 0.0);
        assert_eq!(log.events(), vec![Event::Duty(0.0), Event::Pin("en", false)]);

        log.clear();
        motor.step(Some(1.0), 0.001);
        motor.set_control_mode(ControlMode::Velocity);
        motor.step(Some(1.0), 0.001);
        assert_eq!(motor.status(), MotorStatus::Error);
        assert!(log.events().is_empty());

        // enable is refused while in error
        motor.enable();
        assert!(!motor.is_enabled());
        assert!(log.events().is_empty());

        motor.init(&mut MockDelay::default());
        assert_eq!(motor.status(), MotorStatus::Ready);
        assert!(motor.is_enabled());
    }

    #[test]
    fn sensor_direction_and_offset_apply_to_shaft() {
        let log = EventLog::new();
        let mut motor = linked_motor(
            &log,
            MotorConfig::default()
                .with_sensor_direction(Direction::CounterClockwise)
                .with_sensor_offset(0.5),
        );
        motor.init(&mut MockDelay::default());
        {
            let sensor = motor.sensor_mut().unwrap();
            sensor.angle = 2.0;
            sensor.velocity = 3.0;
        }

        motor.step(None, 0.001);
        assert_close(motor.shaft_angle(), -2.5);
        assert_close(motor.shaft_velocity(), -3.0);
    }

    #[test]
    fn relinking_requires_reinit() {
        let log = EventLog::new();
        let mut motor = ready_motor(&log);

        let old = motor.link_sensor(MockSensor::default());
        assert!(old.is_some());
        assert_eq!(motor.status(), MotorStatus::Uninitialized);
        assert!(!motor.is_enabled());
        assert_eq!(log.events(), vec![Event::Duty(0.0), Event::Pin("en", false)]);
    }

    #[test]
    fn foc_hooks_are_not_applicable() {
        let log = EventLog::new();
        let mut motor = ready_motor(&log);
        assert!(!motor.init_foc());
        motor.loop_foc();
        assert!(log.events().is_empty());
    }
}

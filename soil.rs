//! Chirp I2C capacitive soil moisture sensor.
//!
//! Capacitance rises with moisture (roughly 290 - 310 in free air at 5 V).
//! Light reads lower the brighter it is, 65535 in a dark room. Temperature
//! comes from the thermistor on the sensor tip in tenths of a degree Celsius.

use embedded_hal::delay::DelayNs;
use log::{debug, warn};

use crate::bus::Bus;

pub const DEFAULT_ADDRESS: u8 = 0x20;

/// Boot time after a reset.
pub const RESET_DELAY_MS: u32 = 1000;
/// Conversion time of a light measurement. Reading earlier returns the
/// previous value.
pub const LIGHT_MEASURE_DELAY_MS: u32 = 3000;
/// Device processing time between an 8-bit register select and its read.
pub const REGISTER_READ_DELAY_MS: u32 = 100;

// Register and command codes.
const GET_CAPACITANCE: u8 = 0x00;
const SET_ADDRESS: u8 = 0x01;
const GET_ADDRESS: u8 = 0x02;
const MEASURE_LIGHT: u8 = 0x03;
const GET_LIGHT: u8 = 0x04;
const GET_TEMPERATURE: u8 = 0x05;
const RESET: u8 = 0x06;
const GET_VERSION: u8 = 0x07;
const SLEEP: u8 = 0x08;
const GET_BUSY: u8 = 0x09;

pub struct SoilSensor<B, D> {
    bus: B,
    delay: D,
    address: u8,
}

impl<B: Bus, D: DelayNs> SoilSensor<B, D> {
    pub fn new(bus: B, delay: D, address: u8) -> Self {
        SoilSensor {
            bus,
            delay,
            address,
        }
    }

    pub fn new_default(bus: B, delay: D) -> Self {
        Self::new(bus, delay, DEFAULT_ADDRESS)
    }

    /// Resets the sensor. Without `wait` the caller must give it
    /// [`RESET_DELAY_MS`] to boot before the next command.
    pub fn begin(&mut self, wait: bool) -> Result<(), B::Error> {
        self.reset_sensor()?;
        if wait {
            self.delay.delay_ms(RESET_DELAY_MS);
        }
        Ok(())
    }

    pub fn get_capacitance(&mut self) -> Result<u16, B::Error> {
        self.read_register16_unsigned(GET_CAPACITANCE)
    }

    /// Writes a new address (1..=127) to the sensor and reads it back from
    /// there. The address only becomes effective after a reset.
    ///
    /// Returns whether the sensor answered with the new address.
    pub fn set_address(&mut self, addr: u8, reset: bool) -> Result<bool, B::Error> {
        debug!("soil@{:#04x}: moving to {:#04x}", self.address, addr);
        self.write_register8(SET_ADDRESS, addr)?;
        if reset {
            self.reset_sensor()?;
            self.delay.delay_ms(RESET_DELAY_MS);
        }
        self.address = addr;

        let readback = self.read_register8(GET_ADDRESS)?;
        if readback != addr {
            warn!("soil@{:#04x}: address readback {:#04x}", addr, readback);
        }
        Ok(readback == addr)
    }

    /// Points this driver at another, already configured sensor and resets it.
    pub fn change_sensor(&mut self, addr: u8, wait: bool) -> Result<(), B::Error> {
        self.address = addr;
        self.begin(wait)
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    /// Starts a light measurement. Read it with `get_light(false)` no sooner
    /// than [`LIGHT_MEASURE_DELAY_MS`] later.
    pub fn start_measure_light(&mut self) -> Result<(), B::Error> {
        self.write_command(MEASURE_LIGHT)
    }

    /// With `wait` a measurement is started and awaited first; otherwise the
    /// result of the last measurement is returned.
    pub fn get_light(&mut self, wait: bool) -> Result<u16, B::Error> {
        if wait {
            self.start_measure_light()?;
            self.delay.delay_ms(LIGHT_MEASURE_DELAY_MS);
        }
        self.read_register16_unsigned(GET_LIGHT)
    }

    pub fn get_temperature(&mut self) -> Result<i16, B::Error> {
        self.read_register16_signed(GET_TEMPERATURE)
    }

    pub fn reset_sensor(&mut self) -> Result<(), B::Error> {
        self.write_command(RESET)
    }

    /// Firmware version, 0x22 means 2.2.
    pub fn get_version(&mut self) -> Result<u8, B::Error> {
        self.read_register8(GET_VERSION)
    }

    /// Puts the sensor MCU into power-down sleep.
    pub fn sleep(&mut self) -> Result<(), B::Error> {
        self.write_command(SLEEP)
    }

    /// True while a measurement is running.
    pub fn is_busy(&mut self) -> Result<bool, B::Error> {
        Ok(self.read_register8(GET_BUSY)? == 1)
    }

    pub fn release(self) -> (B, D) {
        (self.bus, self.delay)
    }

    pub fn write_command(&mut self, reg: u8) -> Result<(), B::Error> {
        self.bus.write(self.address, &[reg], false)
    }

    pub fn write_register8(&mut self, reg: u8, value: u8) -> Result<(), B::Error> {
        self.bus.write(self.address, &[reg, value], false)
    }

    pub fn read_register8(&mut self, reg: u8) -> Result<u8, B::Error> {
        let mut data = [0u8; 1];
        self.bus.write(self.address, &[reg], true)?;
        self.delay.delay_ms(REGISTER_READ_DELAY_MS);
        self.bus.read(self.address, &mut data)?;
        Ok(data[0])
    }

    pub fn read_register16_unsigned(&mut self, reg: u8) -> Result<u16, B::Error> {
        let mut data = [0u8; 2];
        self.bus.write_read(self.address, &[reg], &mut data)?;
        Ok(u16::from_be_bytes(data))
    }

    pub fn read_register16_signed(&mut self, reg: u8) -> Result<i16, B::Error> {
        let mut data = [0u8; 2];
        self.bus.write_read(self.address, &[reg], &mut data)?;
        Ok(i16::from_be_bytes(data))
    }
}

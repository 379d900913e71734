//! I2C drivers for a BME280 and a Chirp soil moisture sensor.
//!
//! Both drivers take their transport by value through the [`Bus`] trait,
//! which every `embedded_hal::i2c::I2c` implements. On a Raspberry Pi that is
//! `rppal::i2c::I2c`; pass `&mut I2c` to let several drivers share one bus.
//!
//! ```no_run
//! use rppal::{hal::Delay, i2c::I2c};
//! use rpsensors::{bme280::Bme280, soil::SoilSensor};
//!
//! let mut i2c = I2c::new()?;
//!
//! let mut bme = Bme280::new_primary(&mut i2c)?;
//! let env = bme.measure()?;
//! println!("{} C/10, {} hPa, {} %", env.temperature, env.pressure, env.humidity);
//!
//! let mut soil = SoilSensor::new_default(&mut i2c, Delay::new());
//! soil.begin(true)?;
//! println!("capacitance {}", soil.get_capacitance()?);
//! # Ok::<(), rppal::i2c::Error>(())
//! ```

pub mod bme280;
pub mod bus;
pub mod compensation;
pub mod settings;
pub mod soil;
pub mod structs;

pub use bus::Bus;

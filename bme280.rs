use log::{debug, trace, warn};

use crate::bus::Bus;
use crate::compensation::{compute_humidity, compute_pressure, compute_temperature};
use crate::settings::Settings;
use crate::structs::{CalibParams, CalibRegisters, EnvData, FineTemperature, RawData};

// BME280 I2C slave addresses (SDO low / high).
pub const ADDR_PRIMARY: u8 = 0x76;
pub const ADDR_SECONDARY: u8 = 0x77;

// BME280 register addresses.
// cf. https://trac.switch-science.com/wiki/BME280
const REG_CTRL_HUM: u8 = 0xF2;
const REG_CTRL_MEAS: u8 = 0xF4;
const REG_CONFIG: u8 = 0xF5;
const REG_CALIB_T: u8 = 0x88;
const REG_CALIB_P: u8 = 0x8E;
const REG_CALIB_H1: u8 = 0xA1;
const REG_CALIB_H: u8 = 0xE1;
const REG_PRESS: u8 = 0xF7;
const REG_TEMP: u8 = 0xFA;
const REG_HUM: u8 = 0xFD;
const REG_ADC_VALUE_LEN: usize = 8;

/// BME280 on an I2C bus.
///
/// The device is configured and its calibration read when the driver is
/// constructed. Pressure and humidity depend on the fine temperature of the
/// last temperature read; [`Bme280::measure`] takes all three from a single
/// burst and has no such ordering requirement.
pub struct Bme280<B> {
    bus: B,
    address: u8,
    calib: CalibParams,
    t_fine: FineTemperature,
}

impl<B: Bus> Bme280<B> {
    pub fn new(bus: B, address: u8) -> Result<Self, B::Error> {
        Self::with_settings(bus, address, Settings::default())
    }

    pub fn new_primary(bus: B) -> Result<Self, B::Error> {
        Self::new(bus, ADDR_PRIMARY)
    }

    pub fn new_secondary(bus: B) -> Result<Self, B::Error> {
        Self::new(bus, ADDR_SECONDARY)
    }

    pub fn with_settings(bus: B, address: u8, settings: Settings) -> Result<Self, B::Error> {
        let mut bme = Bme280 {
            bus,
            address,
            calib: CalibParams::default(),
            t_fine: FineTemperature::default(),
        };
        bme.initialize(&settings)?;
        Ok(bme)
    }

    fn initialize(&mut self, settings: &Settings) -> Result<(), B::Error> {
        debug!(
            "bme280@{:#04x}: ctrl_hum={:#04x} ctrl_meas={:#04x} config={:#04x}",
            self.address,
            settings.ctrl_hum(),
            settings.ctrl_meas(),
            settings.config()
        );
        self.write_register(REG_CTRL_HUM, settings.ctrl_hum())?;
        self.write_register(REG_CTRL_MEAS, settings.ctrl_meas())?;
        self.write_register(REG_CONFIG, settings.config())?;

        self.calib = self.read_calib()?;
        debug!("bme280@{:#04x}: calibration {:?}", self.address, self.calib);
        if self.calib.dig_p1 == 0 {
            warn!("bme280@{:#04x}: dig_P1 is zero, pressure reads as 0", self.address);
        }
        Ok(())
    }

    fn read_calib(&mut self) -> Result<CalibParams, B::Error> {
        let mut regs = CalibRegisters::default();
        self.read_block(REG_CALIB_T, &mut regs.temperature)?;
        self.read_block(REG_CALIB_P, &mut regs.pressure)?;
        let mut h1 = [0u8; 1];
        self.read_block(REG_CALIB_H1, &mut h1)?;
        regs.h1 = h1[0];
        self.read_block(REG_CALIB_H, &mut regs.humidity)?;

        Ok(CalibParams::decode(&regs))
    }

    fn write_register(&mut self, reg: u8, value: u8) -> Result<(), B::Error> {
        self.bus.write(self.address, &[reg, value], false)
    }

    // One register-select write, then one read.
    fn read_block(&mut self, reg: u8, buffer: &mut [u8]) -> Result<(), B::Error> {
        self.bus.write(self.address, &[reg], false)?;
        self.bus.read(self.address, buffer)
    }

    /// Temperature in tenths of a degree Celsius. Updates the fine temperature.
    pub fn get_temperature(&mut self) -> Result<i32, B::Error> {
        let mut data = [0u8; 3];
        self.read_block(REG_TEMP, &mut data)?;
        let raw = RawData::adc20(data);
        trace!("bme280@{:#04x}: raw temperature {}", self.address, raw);

        let (tenths, t_fine) = compute_temperature(&self.calib, raw);
        self.t_fine = t_fine;
        Ok(tenths)
    }

    /// Pressure in hectopascal.
    ///
    /// Uses the fine temperature of the last [`Bme280::get_temperature`] call
    /// (0 if there was none).
    pub fn get_pressure(&mut self) -> Result<u32, B::Error> {
        let mut data = [0u8; 3];
        self.read_block(REG_PRESS, &mut data)?;
        let raw = RawData::adc20(data);
        trace!("bme280@{:#04x}: raw pressure {}", self.address, raw);

        Ok(compute_pressure(&self.calib, raw, self.t_fine))
    }

    /// Relative humidity in percent.
    ///
    /// Uses the fine temperature of the last [`Bme280::get_temperature`] call
    /// (0 if there was none).
    pub fn get_humidity(&mut self) -> Result<u8, B::Error> {
        let mut data = [0u8; 2];
        self.read_block(REG_HUM, &mut data)?;
        let raw = RawData::adc16(data);
        trace!("bme280@{:#04x}: raw humidity {}", self.address, raw);

        Ok(compute_humidity(&self.calib, raw, self.t_fine))
    }

    /// Reads all data registers in one burst and compensates them together.
    pub fn measure(&mut self) -> Result<EnvData, B::Error> {
        let mut data = [0u8; REG_ADC_VALUE_LEN];
        self.read_block(REG_PRESS, &mut data)?;
        let raw = RawData::from_burst(&data);
        trace!("bme280@{:#04x}: raw {:?}", self.address, raw);

        let (temperature, t_fine) = compute_temperature(&self.calib, raw.temperature);
        self.t_fine = t_fine;
        Ok(EnvData {
            temperature,
            pressure: compute_pressure(&self.calib, raw.pressure, t_fine),
            humidity: compute_humidity(&self.calib, raw.humidity, t_fine),
        })
    }

    pub fn calibration(&self) -> &CalibParams {
        &self.calib
    }

    pub fn fine_temperature(&self) -> FineTemperature {
        self.t_fine
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    pub fn release(self) -> B {
        self.bus
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Standby;
    use embedded_hal::i2c::ErrorKind;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};

    const ADDR: u8 = ADDR_PRIMARY;

    fn init_transactions(addr: u8, config: u8) -> Vec<I2cTransaction> {
        vec![
            I2cTransaction::write(addr, vec![0xF2, 0x01]),
            I2cTransaction::write(addr, vec![0xF4, 0x27]),
            I2cTransaction::write(addr, vec![0xF5, config]),
            I2cTransaction::write(addr, vec![0x88]),
            I2cTransaction::read(addr, vec![0x70, 0x6B, 0x43, 0x67, 0x18, 0xFC]),
            I2cTransaction::write(addr, vec![0x8E]),
            I2cTransaction::read(
                addr,
                vec![
                    0x7D, 0x8E, 0x43, 0xD6, 0xD0, 0x0B, 0x27, 0x0B, 0x8C, 0x00, 0xF9, 0xFF, 0x8C,
                    0x3C, 0xF8, 0xC6, 0x70, 0x17,
                ],
            ),
            I2cTransaction::write(addr, vec![0xA1]),
            I2cTransaction::read(addr, vec![0x4B]),
            I2cTransaction::write(addr, vec![0xE1]),
            I2cTransaction::read(addr, vec![0x6A, 0x01, 0x00, 0x13, 0x29, 0x03, 0x1E]),
        ]
    }

    fn with_init(extra: Vec<I2cTransaction>) -> I2cMock {
        let mut expectations = init_transactions(ADDR, 0xA0);
        expectations.extend(extra);
        I2cMock::new(&expectations)
    }

    #[test]
    fn initialize_configures_and_reads_calibration() {
        let i2c = with_init(vec![]);
        let bme = Bme280::new_primary(i2c).unwrap();
        let calib = bme.calibration();
        assert_eq!(calib.dig_t1, 27504);
        assert_eq!(calib.dig_p9, 6000);
        assert_eq!(calib.dig_h4, 313);
        assert_eq!(calib.dig_h5, 50);
        assert_eq!(bme.fine_temperature(), FineTemperature(0));

        let mut i2c = bme.release();
        i2c.done();
    }

    #[test]
    fn getters_in_order() {
        let i2c = with_init(vec![
            I2cTransaction::write(ADDR, vec![0xFA]),
            I2cTransaction::read(ADDR, vec![0x7E, 0xED, 0x00]),
            I2cTransaction::write(ADDR, vec![0xF7]),
            I2cTransaction::read(ADDR, vec![0x65, 0x5A, 0xC0]),
            I2cTransaction::write(ADDR, vec![0xFD]),
            I2cTransaction::read(ADDR, vec![0x71, 0x48]),
        ]);
        let mut bme = Bme280::new_primary(i2c).unwrap();

        assert_eq!(bme.get_temperature().unwrap(), 250);
        assert_eq!(bme.fine_temperature(), FineTemperature(128422));
        assert_eq!(bme.get_pressure().unwrap(), 1006);
        assert_eq!(bme.get_humidity().unwrap(), 49);

        let mut i2c = bme.release();
        i2c.done();
    }

    #[test]
    fn pressure_and_humidity_before_temperature() {
        let i2c = with_init(vec![
            I2cTransaction::write(ADDR, vec![0xF7]),
            I2cTransaction::read(ADDR, vec![0x65, 0x5A, 0xC0]),
            I2cTransaction::write(ADDR, vec![0xFD]),
            I2cTransaction::read(ADDR, vec![0x71, 0x48]),
        ]);
        let mut bme = Bme280::new_primary(i2c).unwrap();

        assert_eq!(bme.get_pressure().unwrap(), 968);
        assert_eq!(bme.get_humidity().unwrap(), 48);

        let mut i2c = bme.release();
        i2c.done();
    }

    #[test]
    fn measure_uses_one_burst() {
        let i2c = with_init(vec![
            I2cTransaction::write(ADDR, vec![0xF7]),
            I2cTransaction::read(ADDR, vec![0x65, 0x5A, 0xC0, 0x7E, 0xED, 0x00, 0x71, 0x48]),
        ]);
        let mut bme = Bme280::new_primary(i2c).unwrap();

        let data = bme.measure().unwrap();
        assert_eq!(
            data,
            EnvData {
                temperature: 250,
                pressure: 1006,
                humidity: 49,
            }
        );
        assert_eq!(bme.fine_temperature(), FineTemperature(128422));

        let mut i2c = bme.release();
        i2c.done();
    }

    #[test]
    fn zero_p1_calibration_reads_zero_pressure() {
        let mut expectations = init_transactions(ADDR, 0xA0);
        // dig_P1 = 0, the rest as in the datasheet
        expectations[6] = I2cTransaction::read(
            ADDR,
            vec![
                0x00, 0x00, 0x43, 0xD6, 0xD0, 0x0B, 0x27, 0x0B, 0x8C, 0x00, 0xF9, 0xFF, 0x8C, 0x3C,
                0xF8, 0xC6, 0x70, 0x17,
            ],
        );
        expectations.extend([
            I2cTransaction::write(ADDR, vec![0xFA]),
            I2cTransaction::read(ADDR, vec![0x7E, 0xED, 0x00]),
            I2cTransaction::write(ADDR, vec![0xF7]),
            I2cTransaction::read(ADDR, vec![0x65, 0x5A, 0xC0]),
            I2cTransaction::write(ADDR, vec![0xF7]),
            I2cTransaction::read(ADDR, vec![0x00, 0x00, 0x00]),
        ]);
        let mut bme = Bme280::new_primary(I2cMock::new(&expectations)).unwrap();
        assert_eq!(bme.calibration().dig_p1, 0);

        assert_eq!(bme.get_temperature().unwrap(), 250);
        assert_eq!(bme.get_pressure().unwrap(), 0);
        assert_eq!(bme.get_pressure().unwrap(), 0);

        let mut i2c = bme.release();
        i2c.done();
    }

    #[test]
    fn custom_settings_and_address() {
        let settings = Settings {
            standby: Standby::Ms125,
            ..Settings::default()
        };
        let i2c = I2cMock::new(&init_transactions(ADDR_SECONDARY, 0x40));
        let bme = Bme280::with_settings(i2c, ADDR_SECONDARY, settings).unwrap();
        assert_eq!(bme.address(), ADDR_SECONDARY);

        let mut i2c = bme.release();
        i2c.done();
    }

    #[test]
    fn bus_error_aborts_construction() {
        let i2c = I2cMock::new(&[
            I2cTransaction::write(ADDR, vec![0xF2, 0x01]).with_error(ErrorKind::Other)
        ]);
        let mut probe = i2c.clone();
        assert!(Bme280::new_primary(i2c).is_err());
        probe.done();
    }
}

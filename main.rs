use std::env::VarError;

use anyhow::{bail, Context};
use log::info;
use rppal::hal::Delay;
use rppal::i2c::I2c;

use rpsensors::bme280::Bme280;
use rpsensors::soil::SoilSensor;

const DEFAULT_I2C_BUS: u8 = 1;
const ENV_I2C_BUS: &str = "RPSENSORS_I2C_BUS";

fn i2c_bus(var: Result<String, VarError>) -> anyhow::Result<u8> {
    match var {
        Ok(value) => value
            .parse()
            .with_context(|| format!("{ENV_I2C_BUS}={value:?} is not a bus number")),
        Err(VarError::NotPresent) => Ok(DEFAULT_I2C_BUS),
        Err(e) => Err(e).with_context(|| format!("reading {ENV_I2C_BUS}")),
    }
}

fn read_bme280(i2c: &mut I2c) -> anyhow::Result<()> {
    let mut bme = Bme280::new_primary(i2c).context("initializing BME280")?;
    let data = bme.measure().context("reading BME280")?;

    println!("Temperature: {:.1} C", data.temperature as f32 / 10.0);
    println!("Humidity: {} %", data.humidity);
    println!("Pressure: {} hPa", data.pressure);
    Ok(())
}

fn read_soil(i2c: &mut I2c) -> anyhow::Result<()> {
    let mut soil = SoilSensor::new_default(i2c, Delay::new());
    soil.begin(true).context("resetting soil sensor")?;
    info!("soil sensor firmware {:#04x}", soil.get_version()?);

    println!("Capacitance: {}", soil.get_capacitance()?);
    println!("Soil temperature: {:.1} C", soil.get_temperature()? as f32 / 10.0);
    println!("Light: {}", soil.get_light(true)?);
    soil.sleep()?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let target = std::env::args().nth(1).unwrap_or_else(|| "all".to_string());
    let bus = i2c_bus(std::env::var(ENV_I2C_BUS))?;
    let mut i2c = I2c::with_bus(bus).with_context(|| format!("opening /dev/i2c-{bus}"))?;
    info!("using /dev/i2c-{bus}");

    match target.as_str() {
        "bme280" => read_bme280(&mut i2c),
        "soil" => read_soil(&mut i2c),
        "all" => {
            read_bme280(&mut i2c)?;
            read_soil(&mut i2c)
        }
        other => bail!("unknown sensor {other:?}, expected bme280, soil or all"),
    }
}

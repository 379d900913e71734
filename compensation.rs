//! Bosch 32-bit fixed-point compensation formulas.
//!
//! All intermediates are `i32`/`u32` with two's complement wrap-around and
//! arithmetic right shifts, as in the datasheet reference code.

use crate::structs::{CalibParams, FineTemperature};

/// Upper clamp of the humidity accumulator, 100 %RH before the final `>> 22`.
pub const HUMIDITY_ACC_MAX: i32 = 419_430_400;

/// Returns the temperature in tenths of a degree Celsius along with the
/// fine temperature needed by the other two formulas.
pub fn compute_temperature(calib: &CalibParams, raw_value: u32) -> (i32, FineTemperature) {
    let adc = raw_value as i32;
    let t1 = calib.dig_t1 as i32;
    let t2 = calib.dig_t2 as i32;
    let t3 = calib.dig_t3 as i32;

    let var1 = ((adc >> 3).wrapping_sub(t1 << 1)).wrapping_mul(t2) >> 11;
    let d = (adc >> 4).wrapping_sub(t1);
    let var2 = ((d.wrapping_mul(d) >> 12).wrapping_mul(t3)) >> 14;
    let t_fine = var1.wrapping_add(var2);

    // hundredths, then truncated to tenths
    let centi = t_fine.wrapping_mul(5).wrapping_add(128) >> 8;
    (centi / 10, FineTemperature(t_fine))
}

/// Returns the pressure in hectopascal, or 0 for a degenerate calibration.
pub fn compute_pressure(calib: &CalibParams, raw_value: u32, t_fine: FineTemperature) -> u32 {
    let p1 = calib.dig_p1 as i32;
    let p2 = calib.dig_p2 as i32;
    let p3 = calib.dig_p3 as i32;
    let p4 = calib.dig_p4 as i32;
    let p5 = calib.dig_p5 as i32;
    let p6 = calib.dig_p6 as i32;
    let p7 = calib.dig_p7 as i32;
    let p8 = calib.dig_p8 as i32;
    let p9 = calib.dig_p9 as i32;

    let mut var1 = (t_fine.0 >> 1).wrapping_sub(64000);
    let sq = (var1 >> 2).wrapping_mul(var1 >> 2);
    let mut var2 = (sq >> 11).wrapping_mul(p6);
    var2 = var2.wrapping_add(var1.wrapping_mul(p5) << 1);
    var2 = (var2 >> 2).wrapping_add(p4 << 16);
    var1 = ((p3.wrapping_mul(sq >> 13) >> 3).wrapping_add(p2.wrapping_mul(var1) >> 1)) >> 18;
    var1 = (32768i32.wrapping_add(var1)).wrapping_mul(p1) >> 15;
    if var1 == 0 {
        return 0;
    }

    let divisor = var1 as u32;
    let mut press = 1_048_576u32
        .wrapping_sub(raw_value)
        .wrapping_sub((var2 >> 12) as u32)
        .wrapping_mul(3125);
    press = if press < 0x8000_0000 {
        (press << 1) / divisor
    } else {
        (press / divisor).wrapping_mul(2)
    };

    let var1 = p9.wrapping_mul(((press >> 3).wrapping_mul(press >> 3) >> 13) as i32) >> 12;
    let var2 = ((press >> 2) as i32).wrapping_mul(p8) >> 13;
    let correction = var1.wrapping_add(var2).wrapping_add(p7) >> 4;
    let pascal = (press as i32).wrapping_add(correction) as u32;

    pascal / 100
}

/// Returns the relative humidity in percent, always within 0..=100.
pub fn compute_humidity(calib: &CalibParams, raw_value: u16, t_fine: FineTemperature) -> u8 {
    let adc = raw_value as i32;
    let h1 = calib.dig_h1 as i32;
    let h2 = calib.dig_h2 as i32;
    let h3 = calib.dig_h3 as i32;
    let h4 = calib.dig_h4 as i32;
    let h5 = calib.dig_h5 as i32;
    let h6 = calib.dig_h6 as i32;

    let v = t_fine.0.wrapping_sub(76800);
    let scaled = (adc << 14)
        .wrapping_sub(h4 << 20)
        .wrapping_sub(h5.wrapping_mul(v))
        .wrapping_add(16384)
        >> 15;
    let mix = (v.wrapping_mul(h6) >> 10)
        .wrapping_mul((v.wrapping_mul(h3) >> 11).wrapping_add(32768));
    let gain = ((mix >> 10).wrapping_add(2_097_152).wrapping_mul(h2).wrapping_add(8192)) >> 14;
    let mut acc = scaled.wrapping_mul(gain);
    let sq = (acc >> 15).wrapping_mul(acc >> 15) >> 7;
    acc = acc.wrapping_sub(sq.wrapping_mul(h1) >> 4);
    acc = acc.clamp(0, HUMIDITY_ACC_MAX);

    (acc >> 22) as u8
}

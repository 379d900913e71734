/// BME280 trimming coefficients.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CalibParams {
    pub dig_t1: u16,
    pub dig_t2: i16,
    pub dig_t3: i16,

    pub dig_p1: u16,
    pub dig_p2: i16,
    pub dig_p3: i16,
    pub dig_p4: i16,
    pub dig_p5: i16,
    pub dig_p6: i16,
    pub dig_p7: i16,
    pub dig_p8: i16,
    pub dig_p9: i16,

    pub dig_h1: u8,
    pub dig_h2: i16,
    pub dig_h3: u8,
    /// Signed 12-bit.
    pub dig_h4: i16,
    /// Signed 12-bit.
    pub dig_h5: i16,
    pub dig_h6: u8,
}

/// Calibration bytes exactly as they sit in the device NVM.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CalibRegisters {
    /// 0x88 - 0x8D
    pub temperature: [u8; 6],
    /// 0x8E - 0x9F
    pub pressure: [u8; 18],
    /// 0xA1
    pub h1: u8,
    /// 0xE1 - 0xE7
    pub humidity: [u8; 7],
}

fn le_u16(b: &[u8], n: usize) -> u16 {
    u16::from_le_bytes([b[n], b[n + 1]])
}

fn le_i16(b: &[u8], n: usize) -> i16 {
    i16::from_le_bytes([b[n], b[n + 1]])
}

// Two's complement sign extension of a 12-bit field.
fn sign_extend_12(v: u16) -> i16 {
    ((v << 4) as i16) >> 4
}

impl CalibParams {
    pub fn decode(regs: &CalibRegisters) -> Self {
        let t = &regs.temperature;
        let p = &regs.pressure;
        let h = &regs.humidity;

        CalibParams {
            dig_t1: le_u16(t, 0),
            dig_t2: le_i16(t, 2),
            dig_t3: le_i16(t, 4),

            dig_p1: le_u16(p, 0),
            dig_p2: le_i16(p, 2),
            dig_p3: le_i16(p, 4),
            dig_p4: le_i16(p, 6),
            dig_p5: le_i16(p, 8),
            dig_p6: le_i16(p, 10),
            dig_p7: le_i16(p, 12),
            dig_p8: le_i16(p, 14),
            dig_p9: le_i16(p, 16),

            dig_h1: regs.h1,
            dig_h2: le_i16(h, 0),
            dig_h3: h[2],
            // 0xE5 carries the low nibble of H4 and the low nibble of H5
            dig_h4: sign_extend_12(((h[3] as u16) << 4) | (h[4] as u16 & 0x0F)),
            dig_h5: sign_extend_12(((h[5] as u16) << 4) | (h[4] as u16 >> 4)),
            dig_h6: h[6],
        }
    }

    /// Inverse of [`CalibParams::decode`]. H4 and H5 keep their low 12 bits.
    pub fn encode(&self) -> CalibRegisters {
        let mut regs = CalibRegisters::default();

        let t = [
            self.dig_t1.to_le_bytes(),
            self.dig_t2.to_le_bytes(),
            self.dig_t3.to_le_bytes(),
        ];
        for (n, pair) in t.iter().enumerate() {
            regs.temperature[n * 2..n * 2 + 2].copy_from_slice(pair);
        }

        let p = [
            self.dig_p1.to_le_bytes(),
            self.dig_p2.to_le_bytes(),
            self.dig_p3.to_le_bytes(),
            self.dig_p4.to_le_bytes(),
            self.dig_p5.to_le_bytes(),
            self.dig_p6.to_le_bytes(),
            self.dig_p7.to_le_bytes(),
            self.dig_p8.to_le_bytes(),
            self.dig_p9.to_le_bytes(),
        ];
        for (n, pair) in p.iter().enumerate() {
            regs.pressure[n * 2..n * 2 + 2].copy_from_slice(pair);
        }

        let h4 = self.dig_h4 as u16 & 0x0FFF;
        let h5 = self.dig_h5 as u16 & 0x0FFF;
        regs.h1 = self.dig_h1;
        regs.humidity[..2].copy_from_slice(&self.dig_h2.to_le_bytes());
        regs.humidity[2] = self.dig_h3;
        regs.humidity[3] = (h4 >> 4) as u8;
        regs.humidity[4] = ((h4 & 0x0F) | ((h5 & 0x0F) << 4)) as u8;
        regs.humidity[5] = (h5 >> 4) as u8;
        regs.humidity[6] = self.dig_h6;

        regs
    }
}

/// Intermediate temperature shared by the pressure and humidity formulas.
///
/// Holds `0` until the first temperature compensation; pressure and humidity
/// computed against that default are meaningless but well defined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FineTemperature(pub i32);

/// Raw ADC samples.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RawData {
    pub temperature: u32,
    pub pressure: u32,
    pub humidity: u16,
}

impl RawData {
    /// 20-bit temperature/pressure sample from msb, lsb and xlsb registers.
    pub fn adc20(bytes: [u8; 3]) -> u32 {
        ((bytes[0] as u32) << 12) | ((bytes[1] as u32) << 4) | ((bytes[2] as u32) >> 4)
    }

    pub fn adc16(bytes: [u8; 2]) -> u16 {
        u16::from_be_bytes(bytes)
    }

    /// Burst layout starting at 0xF7: pressure, temperature, humidity.
    pub fn from_burst(data: &[u8; 8]) -> Self {
        RawData {
            pressure: Self::adc20([data[0], data[1], data[2]]),
            temperature: Self::adc20([data[3], data[4], data[5]]),
            humidity: Self::adc16([data[6], data[7]]),
        }
    }
}

/// One compensated reading.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnvData {
    /// Tenths of a degree Celsius.
    pub temperature: i32,
    /// Hectopascal.
    pub pressure: u32,
    /// Percent relative humidity.
    pub humidity: u8,
}

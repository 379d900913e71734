//! Control register values written when a BME280 is brought up.

/// Oversampling factor (osrs_t, osrs_p, osrs_h fields).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Oversampling {
    Skipped = 0,
    X1 = 1,
    X2 = 2,
    X4 = 3,
    X8 = 4,
    X16 = 5,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Sleep = 0b00,
    Forced = 0b01,
    Normal = 0b11,
}

/// Inactive duration between two normal-mode conversions (t_sb field).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Standby {
    Ms0_5 = 0,
    Ms62_5 = 1,
    Ms125 = 2,
    Ms250 = 3,
    Ms500 = 4,
    Ms1000 = 5,
    Ms10 = 6,
    Ms20 = 7,
}

/// IIR filter coefficient.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter {
    Off = 0,
    X2 = 1,
    X4 = 2,
    X8 = 3,
    X16 = 4,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub humidity: Oversampling,
    pub temperature: Oversampling,
    pub pressure: Oversampling,
    pub mode: Mode,
    pub standby: Standby,
    pub filter: Filter,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            humidity: Oversampling::X1,
            temperature: Oversampling::X1,
            pressure: Oversampling::X1,
            mode: Mode::Normal,
            standby: Standby::Ms1000,
            filter: Filter::Off,
        }
    }
}

impl Settings {
    /// ctrl_hum (0xF2)
    pub fn ctrl_hum(&self) -> u8 {
        self.humidity as u8
    }

    /// ctrl_meas (0xF4)
    pub fn ctrl_meas(&self) -> u8 {
        ((self.temperature as u8) << 5) | ((self.pressure as u8) << 2) | self.mode as u8
    }

    /// config (0xF5), 3-wire SPI left disabled.
    pub fn config(&self) -> u8 {
        let spi3w_en: u8 = 0;
        ((self.standby as u8) << 5) | ((self.filter as u8) << 2) | spi3w_en
    }
}

use embedded_hal::i2c::{ErrorType, I2c};

/// Blocking register transport shared by both drivers.
///
/// `write` with `hold_bus` set marks a register-select that is immediately
/// followed by a read of the same device. Transports that can keep the bus
/// between the two (repeated start) should do so in [`Bus::write_read`].
pub trait Bus {
    type Error;

    fn write(&mut self, address: u8, bytes: &[u8], hold_bus: bool) -> Result<(), Self::Error>;

    fn read(&mut self, address: u8, buffer: &mut [u8]) -> Result<(), Self::Error>;

    /// Register-select write and read without releasing the bus in between.
    fn write_read(
        &mut self,
        address: u8,
        bytes: &[u8],
        buffer: &mut [u8],
    ) -> Result<(), Self::Error> {
        self.write(address, bytes, true)?;
        self.read(address, buffer)
    }
}

// Covers rppal::i2c::I2c (with the `hal` feature), `&mut` references to it
// and the embedded-hal-mock transports.
impl<T: I2c> Bus for T {
    type Error = <T as ErrorType>::Error;

    fn write(&mut self, address: u8, bytes: &[u8], _hold_bus: bool) -> Result<(), Self::Error> {
        // embedded-hal always ends a plain write with a stop condition.
        I2c::write(self, address, bytes)
    }

    fn read(&mut self, address: u8, buffer: &mut [u8]) -> Result<(), Self::Error> {
        I2c::read(self, address, buffer)
    }

    fn write_read(
        &mut self,
        address: u8,
        bytes: &[u8],
        buffer: &mut [u8],
    ) -> Result<(), Self::Error> {
        I2c::write_read(self, address, bytes, buffer)
    }
}

//! Transport capability for sensor peripherals
//!
//! Sensor drivers talk to their chip through one transactional primitive,
//! [`Transfer::transfer`]: write some bytes, then read some bytes. Register
//! reads write an address and read the response, writes leave `read` empty.
//!
//! [`I2cTransfer`] and [`SpiTransfer`] adapt `embedded-hal` 1.0 buses. A host
//! that owns another transport (1-wire, a shared bus manager) implements
//! [`Transfer`] directly.

use embedded_hal::i2c::{I2c, SevenBitAddress};
use embedded_hal::spi::{Operation, SpiDevice};

/// A duplex byte-oriented bus connection to one device
pub trait Transfer {
    /// Transport error
    type Error: core::fmt::Debug;

    /// Write `write`, then fill `read`
    ///
    /// Either slice may be empty. When both are non-empty the exchange is one
    /// transaction where the bus allows it.
    fn transfer(&mut self, write: &[u8], read: &mut [u8]) -> Result<(), Self::Error>;
}

impl<T: Transfer + ?Sized> Transfer for &mut T {
    type Error = T::Error;

    fn transfer(&mut self, write: &[u8], read: &mut [u8]) -> Result<(), Self::Error> {
        (**self).transfer(write, read)
    }
}

/// I2C device at a fixed 7-bit address
#[derive(Debug)]
pub struct I2cTransfer<I2C> {
    i2c: I2C,
    address: SevenBitAddress,
}

impl<I2C> I2cTransfer<I2C>
where
    I2C: I2c,
{
    /// Bind `i2c` to the device at `address`
    pub fn new(i2c: I2C, address: SevenBitAddress) -> Self {
        Self { i2c, address }
    }

    /// Device address
    pub fn address(&self) -> SevenBitAddress {
        self.address
    }

    /// Give the bus back
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C> Transfer for I2cTransfer<I2C>
where
    I2C: I2c,
{
    type Error = I2C::Error;

    fn transfer(&mut self, write: &[u8], read: &mut [u8]) -> Result<(), Self::Error> {
        match (write.is_empty(), read.is_empty()) {
            (true, true) => Ok(()),
            (false, true) => self.i2c.write(self.address, write),
            (true, false) => self.i2c.read(self.address, read),
            (false, false) => self.i2c.write_read(self.address, write, read),
        }
    }
}

/// SPI device with its own chip select
#[derive(Debug)]
pub struct SpiTransfer<SPI> {
    spi: SPI,
}

impl<SPI> SpiTransfer<SPI>
where
    SPI: SpiDevice,
{
    /// Wrap an SPI device
    pub fn new(spi: SPI) -> Self {
        Self { spi }
    }

    /// Give the device back
    pub fn release(self) -> SPI {
        self.spi
    }
}

impl<SPI> Transfer for SpiTransfer<SPI>
where
    SPI: SpiDevice,
{
    type Error = SPI::Error;

    fn transfer(&mut self, write: &[u8], read: &mut [u8]) -> Result<(), Self::Error> {
        match (write.is_empty(), read.is_empty()) {
            (true, true) => Ok(()),
            (false, true) => self.spi.transaction(&mut [Operation::Write(write)]),
            (true, false) => self.spi.transaction(&mut [Operation::Read(read)]),
            (false, false) => self
                .spi
                .transaction(&mut [Operation::Write(write), Operation::Read(read)]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use alloc::vec::Vec;
    use embedded_hal::i2c::{ErrorKind, ErrorType, NoAcknowledgeSource, Operation as I2cOperation};

    #[derive(Debug, PartialEq)]
    enum Call {
        Write(u8, Vec<u8>),
        Read(u8, usize),
        WriteRead(u8, Vec<u8>, usize),
    }

    #[derive(Default)]
    struct MockI2c {
        calls: Vec<Call>,
        response: Vec<u8>,
        nack: bool,
    }

    impl ErrorType for MockI2c {
        type Error = ErrorKind;
    }

    impl I2c for MockI2c {
        fn transaction(
            &mut self,
            address: u8,
            operations: &mut [I2cOperation<'_>],
        ) -> Result<(), Self::Error> {
            if self.nack {
                return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
            }
            match operations {
                [I2cOperation::Write(w)] => self.calls.push(Call::Write(address, w.to_vec())),
                [I2cOperation::Read(r)] => {
                    r.copy_from_slice(&self.response[..r.len()]);
                    self.calls.push(Call::Read(address, r.len()));
                }
                [I2cOperation::Write(w), I2cOperation::Read(r)] => {
                    r.copy_from_slice(&self.response[..r.len()]);
                    self.calls
                        .push(Call::WriteRead(address, w.to_vec(), r.len()));
                }
                _ => {}
            }
            Ok(())
        }
    }

    #[test]
    fn test_i2c_dispatch() {
        let mut bus = I2cTransfer::new(
            MockI2c {
                response: vec![0xAA, 0xBB],
                ..MockI2c::default()
            },
            0x38,
        );

        bus.transfer(&[0x71], &mut []).unwrap();
        let mut two = [0u8; 2];
        bus.transfer(&[], &mut two).unwrap();
        assert_eq!(two, [0xAA, 0xBB]);
        let mut one = [0u8; 1];
        bus.transfer(&[0x71], &mut one).unwrap();
        bus.transfer(&[], &mut []).unwrap();

        assert_eq!(
            bus.release().calls,
            vec![
                Call::Write(0x38, vec![0x71]),
                Call::Read(0x38, 2),
                Call::WriteRead(0x38, vec![0x71], 1),
            ]
        );
    }

    #[test]
    fn test_i2c_error_is_returned() {
        let mut bus = I2cTransfer::new(
            MockI2c {
                nack: true,
                ..MockI2c::default()
            },
            0x5C,
        );
        assert_eq!(
            bus.transfer(&[0x00], &mut []),
            Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address))
        );
    }

    struct MockSpi {
        written: Vec<u8>,
        operations: usize,
    }

    impl embedded_hal::spi::ErrorType for MockSpi {
        type Error = core::convert::Infallible;
    }

    impl SpiDevice for MockSpi {
        fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), Self::Error> {
            for op in operations.iter_mut() {
                self.operations += 1;
                match op {
                    Operation::Write(w) => self.written.extend_from_slice(w),
                    Operation::Read(r) => r.fill(0x5A),
                    _ => {}
                }
            }
            Ok(())
        }
    }

    #[test]
    fn test_spi_single_transaction() {
        let mut bus = SpiTransfer::new(MockSpi {
            written: Vec::new(),
            operations: 0,
        });
        let mut read = [0u8; 3];
        bus.transfer(&[0x80 | 0x0F], &mut read).unwrap();
        assert_eq!(read, [0x5A; 3]);

        let spi = bus.release();
        assert_eq!(spi.written, vec![0x8F]);
        assert_eq!(spi.operations, 2);
    }
}

// src/common/hal_traits.rs

use super::address::I2cAddr;
use core::fmt::Debug;
use core::time::Duration;

/// Port of a multi-port serial-to-I2C bridge the sensor is connected to.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum BridgePort {
    #[default]
    One,
    Two,
}

impl BridgePort {
    /// Zero-based port index as used on the bridge's wire protocol.
    #[inline]
    pub const fn index(&self) -> u8 {
        match self {
            BridgePort::One => 0,
            BridgePort::Two => 1,
        }
    }
}

/// Abstraction for a blocking I2C write-then-read through a bridge.
///
/// One call is one transaction: the bridge writes `tx` (skipped if empty), then
/// reads `rx.len()` bytes (skipped if empty). Bridges without a native read delay
/// keep retrying the read until `timeout` has elapsed.
pub trait BridgeTransport {
    /// Associated error type for communication errors (timeout, I/O, disconnect).
    type Error: Debug;

    /// Performs one transaction and returns the number of bytes placed into `rx`.
    fn transceive(
        &mut self,
        port: BridgePort,
        address: I2cAddr,
        tx: &[u8],
        rx: &mut [u8],
        timeout: Duration,
    ) -> Result<usize, Self::Error>;
}

/// Runs the word protocol directly on an `embedded-hal` 1.0 I2C bus, without a bridge.
///
/// The bridge port is ignored. After the write phase the adapter waits `timeout`
/// before reading, which covers the command's processing time.
#[cfg(feature = "impl-native")]
#[derive(Debug)]
pub struct I2cTransport<I2C, D> {
    i2c: I2C,
    delay: D,
}

#[cfg(feature = "impl-native")]
impl<I2C, D> I2cTransport<I2C, D>
where
    I2C: embedded_hal::i2c::I2c,
    D: embedded_hal::delay::DelayNs,
{
    pub fn new(i2c: I2C, delay: D) -> Self {
        I2cTransport { i2c, delay }
    }

    /// Returns the bus and delay provider.
    pub fn release(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }
}

#[cfg(feature = "impl-native")]
impl<I2C, D> BridgeTransport for I2cTransport<I2C, D>
where
    I2C: embedded_hal::i2c::I2c,
    D: embedded_hal::delay::DelayNs,
{
    type Error = I2C::Error;

    fn transceive(
        &mut self,
        _port: BridgePort,
        address: I2cAddr,
        tx: &[u8],
        rx: &mut [u8],
        timeout: Duration,
    ) -> Result<usize, Self::Error> {
        if !tx.is_empty() {
            self.i2c.write(address.as_u8(), tx)?;
            let wait_us = u32::try_from(timeout.as_micros()).unwrap_or(u32::MAX);
            if wait_us > 0 {
                self.delay.delay_us(wait_us);
            }
        }
        if !rx.is_empty() {
            self.i2c.read(address.as_u8(), rx)?;
        }
        Ok(rx.len())
    }
}

#[cfg(all(test, feature = "impl-native"))]
mod tests {
    use super::*;
    use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, Operation, SevenBitAddress};

    #[derive(Default)]
    struct MockBus {
        writes: Vec<(u8, Vec<u8>)>,
        reads: Vec<u8>,
        response: Vec<u8>,
    }

    impl ErrorType for MockBus {
        type Error = ErrorKind;
    }

    impl I2c<SevenBitAddress> for MockBus {
        fn transaction(&mut self, address: u8, operations: &mut [Operation<'_>]) -> Result<(), Self::Error> {
            for op in operations {
                match op {
                    Operation::Write(bytes) => self.writes.push((address, bytes.to_vec())),
                    Operation::Read(buf) => {
                        self.reads.push(address);
                        let n = buf.len().min(self.response.len());
                        buf[..n].copy_from_slice(&self.response[..n]);
                    }
                }
            }
            Ok(())
        }
    }

    #[derive(Default)]
    struct MockDelay {
        total_ns: u64,
    }

    impl embedded_hal::delay::DelayNs for MockDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.total_ns += u64::from(ns);
        }
    }

    #[test]
    fn test_write_wait_read() {
        let bus = MockBus { response: vec![0x00, 0x78, 0xC0], ..Default::default() };
        let mut transport = I2cTransport::new(bus, MockDelay::default());
        let mut rx = [0u8; 3];
        let n = transport
            .transceive(
                BridgePort::One,
                I2cAddr::DEFAULT_ADDRESS,
                &[0x36, 0x61, 0x36, 0x08, 0xD0],
                &mut rx,
                Duration::from_micros(500),
            )
            .unwrap();
        assert_eq!(n, 3);
        assert_eq!(rx, [0x00, 0x78, 0xC0]);

        let (bus, delay) = transport.release();
        assert_eq!(bus.writes, vec![(0x2E, vec![0x36, 0x61, 0x36, 0x08, 0xD0])]);
        assert_eq!(bus.reads, vec![0x2E]);
        assert!(delay.total_ns >= 500_000);
    }

    #[test]
    fn test_pure_read_skips_write_and_delay() {
        let bus = MockBus { response: vec![0x5E, 0x38, 0x77, 0x01, 0x90, 0x4C], ..Default::default() };
        let mut transport = I2cTransport::new(bus, MockDelay::default());
        let mut rx = [0u8; 6];
        transport
            .transceive(BridgePort::Two, I2cAddr::DEFAULT_ADDRESS, &[], &mut rx, Duration::ZERO)
            .unwrap();
        let (bus, delay) = transport.release();
        assert!(bus.writes.is_empty());
        assert_eq!(delay.total_ns, 0);
    }
}

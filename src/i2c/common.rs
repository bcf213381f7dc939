// Licensed under the Apache-2.0 license

//! Common types for the two-wire slave driver.
//!
//! This module provides shared definitions for configuration, error
//! handling and diagnostics used across the driver implementation.

use crate::i2c::status::SlaveEvent;
use embedded_hal::i2c::SevenBitAddress;

/// Highest valid 7-bit address.
pub const MAX_SEVEN_BIT_ADDRESS: SevenBitAddress = 0x7F;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// Own address does not fit in seven bits.
    InvalidAddress(u8),
    /// A received byte was dropped because the receive buffer was full.
    RxOverflow,
    /// A byte queued for transmission was dropped because the transmit buffer was full.
    TxOverflow,
    /// The interrupt handler forced a stop after a bus error or protocol fault.
    Bus,
    /// `enable()` called before `init()`.
    NotInitialized,
}

impl embedded_hal::i2c::Error for Error {
    fn kind(&self) -> embedded_hal::i2c::ErrorKind {
        use embedded_hal::i2c::ErrorKind;

        match self {
            Error::RxOverflow | Error::TxOverflow => ErrorKind::Overrun,
            Error::Bus => ErrorKind::Bus,
            Error::InvalidAddress(_) | Error::NotInitialized => ErrorKind::Other,
        }
    }
}

impl embedded_io::Error for Error {
    fn kind(&self) -> embedded_io::ErrorKind {
        match self {
            Error::InvalidAddress(_) => embedded_io::ErrorKind::InvalidInput,
            Error::RxOverflow | Error::TxOverflow => embedded_io::ErrorKind::OutOfMemory,
            Error::Bus => embedded_io::ErrorKind::Interrupted,
            Error::NotInitialized => embedded_io::ErrorKind::NotConnected,
        }
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::InvalidAddress(addr) => write!(f, "invalid 7-bit address {addr:#04x}"),
            Error::RxOverflow => f.write_str("receive buffer overflow"),
            Error::TxOverflow => f.write_str("transmit buffer overflow"),
            Error::Bus => f.write_str("bus error, stop forced"),
            Error::NotInitialized => f.write_str("slave interface not initialized"),
        }
    }
}

/// Check that `address` fits the own-address register.
pub fn validate_address(address: u8) -> Result<SevenBitAddress, Error> {
    if address > MAX_SEVEN_BIT_ADDRESS {
        Err(Error::InvalidAddress(address))
    } else {
        Ok(address)
    }
}

/// Slave configuration programmed by `init`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SlaveConfig {
    pub address: SevenBitAddress,
    /// Also respond to the general call address 0x00.
    pub general_call: bool,
}

impl Default for SlaveConfig {
    fn default() -> Self {
        SlaveConfigBuilder::new().build()
    }
}

pub struct SlaveConfigBuilder {
    address: SevenBitAddress,
    general_call: bool,
}

impl Default for SlaveConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SlaveConfigBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            address: 0,
            general_call: false,
        }
    }

    #[must_use]
    pub fn address(mut self, address: SevenBitAddress) -> Self {
        self.address = address;
        self
    }

    #[must_use]
    pub fn general_call(mut self, enabled: bool) -> Self {
        self.general_call = enabled;
        self
    }

    #[must_use]
    pub fn build(self) -> SlaveConfig {
        SlaveConfig {
            address: self.address,
            general_call: self.general_call,
        }
    }

    /// Like [`build`](Self::build) but rejects addresses wider than seven bits.
    pub fn try_build(self) -> Result<SlaveConfig, Error> {
        validate_address(self.address)?;
        Ok(self.build())
    }
}

/// Conditions the data path drops silently, counted for the application.
///
/// Counters saturate instead of wrapping.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Diagnostics {
    /// Received bytes lost to a full receive buffer.
    pub rx_overflows: u16,
    /// Bytes lost by `transmit_byte` on a full transmit buffer.
    pub tx_overflows: u16,
    /// Times the master read past the queued data and got the sentinel.
    pub tx_underruns: u16,
    /// General call addresses accepted.
    pub general_calls: u16,
    /// Recoveries forced by the error status group.
    pub bus_errors: u16,
    /// Status codes outside the slave table.
    pub unknown_status: u16,
    /// Most recent event seen by the interrupt handler.
    pub last_event: Option<SlaveEvent>,
}

impl Diagnostics {
    pub(crate) fn bump(counter: &mut u16) {
        *counter = counter.saturating_add(1);
    }

    /// `true` when nothing has been dropped or forced.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.rx_overflows == 0
            && self.tx_overflows == 0
            && self.tx_underruns == 0
            && self.bus_errors == 0
            && self.unknown_status == 0
    }
}

/// Status information for slave operations
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SlaveStatus {
    /// Whether `enable()` has armed the interface
    pub enabled: bool,
    /// Whether the last interrupt left the interface armed
    pub armed: bool,
    /// Current slave address (if initialized)
    pub address: Option<SevenBitAddress>,
    /// Whether there's data available to read
    pub data_available: bool,
    /// Number of bytes in receive buffer
    pub rx_buffer_count: usize,
    /// Number of bytes in transmit buffer
    pub tx_buffer_count: usize,
    /// Last slave event that occurred
    pub last_event: Option<SlaveEvent>,
    /// Whether an unreported error exists
    pub error: bool,
}

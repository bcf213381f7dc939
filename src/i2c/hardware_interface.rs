// Licensed under the Apache-2.0 license

//! Register-level contract of a byte-oriented two-wire slave peripheral.
//!
//! The peripheral exposes four 8-bit registers:
//!
//! | Register | Contents                                                     |
//! |----------|--------------------------------------------------------------|
//! | address  | own 7-bit address in bits 7..1, general-call respond in bit 0 |
//! | control  | see [`Control`]                                              |
//! | status   | bus event code in bits 7..3, prescaler in bits 1..0          |
//! | data     | one byte moved per interrupt                                 |
//!
//! The driver never touches memory-mapped I/O directly. A target board
//! implements [`TwiRegisters`] over its peripheral access crate, tests use
//! [`crate::i2c::simulation::SimulatedTwi`].

use core::ops::{BitOr, BitOrAssign};
use embedded_hal::i2c::SevenBitAddress;

/// Mask applied to the raw status register to drop the prescaler bits.
pub const STATUS_MASK: u8 = 0xF8;

/// Register access to the slave peripheral.
///
/// Every method must complete in bounded time; they are called from the
/// interrupt handler.
pub trait TwiRegisters {
    /// Program the own-address register.
    fn write_address(&mut self, value: u8);

    fn read_address(&self) -> u8;

    /// Write the control register. Writing [`Control::TWINT`] clears the
    /// interrupt flag and releases the bus clock.
    fn write_control(&mut self, value: Control);

    fn read_control(&self) -> Control;

    /// Raw status register, prescaler bits included.
    fn read_status(&self) -> u8;

    fn read_data(&self) -> u8;

    fn write_data(&mut self, value: u8);
}

impl<T: TwiRegisters + ?Sized> TwiRegisters for &mut T {
    fn write_address(&mut self, value: u8) {
        (**self).write_address(value);
    }

    fn read_address(&self) -> u8 {
        (**self).read_address()
    }

    fn write_control(&mut self, value: Control) {
        (**self).write_control(value);
    }

    fn read_control(&self) -> Control {
        (**self).read_control()
    }

    fn read_status(&self) -> u8 {
        (**self).read_status()
    }

    fn read_data(&self) -> u8 {
        (**self).read_data()
    }

    fn write_data(&mut self, value: u8) {
        (**self).write_data(value);
    }
}

/// Control register value.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Control(u8);

impl Control {
    /// Interrupt flag, cleared by writing one.
    pub const TWINT: Self = Self(1 << 7);
    /// Auto-acknowledge enable.
    pub const TWEA: Self = Self(1 << 6);
    /// Start condition request.
    pub const TWSTA: Self = Self(1 << 5);
    /// Stop condition request.
    pub const TWSTO: Self = Self(1 << 4);
    /// Write collision flag.
    pub const TWWC: Self = Self(1 << 3);
    /// Peripheral enable.
    pub const TWEN: Self = Self(1 << 2);
    /// Interrupt enable.
    pub const TWIE: Self = Self(1 << 0);

    pub const NONE: Self = Self(0);

    /// Peripheral on, interrupts and acknowledge masked.
    pub const INIT: Self = Self::TWEN;

    /// Ready for the next bus event: enabled, interrupt armed, ack on, flag cleared.
    pub const REARM: Self = Self(Self::TWEN.0 | Self::TWIE.0 | Self::TWINT.0 | Self::TWEA.0);

    /// Force a stop condition and clear the flag. Leaves the interface disarmed.
    pub const RECOVER: Self = Self(Self::TWSTO.0 | Self::TWINT.0);

    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Interrupt and acknowledge both enabled.
    #[must_use]
    pub const fn is_armed(self) -> bool {
        self.contains(Self::TWIE) && self.contains(Self::TWEA)
    }

    #[must_use]
    pub const fn requests_stop(self) -> bool {
        self.contains(Self::TWSTO)
    }
}

impl BitOr for Control {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for Control {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// Encode the own-address register value.
#[must_use]
pub const fn encode_address(address: SevenBitAddress, general_call: bool) -> u8 {
    (address << 1) | general_call as u8
}

/// Split an own-address register value into address and general-call bit.
#[must_use]
pub const fn decode_address(value: u8) -> (SevenBitAddress, bool) {
    (value >> 1, value & 1 != 0)
}

// Licensed under the Apache-2.0 license

//! # Two-Wire Slave Traits
//!
//! Composable traits splitting the slave driver by execution context:
//!
//! ```text
//! TwiSlaveCore (address setup, enable/disable)
//!     ├── TwiSlaveBuffer      application context: FIFO access
//!     ├── TwiSlaveInterrupts  interrupt context: event handling, diagnostics
//!     └── TwiSlaveDevice      buffer + interrupts (blanket impl)
//! ```
//!
//! Nothing in these traits blocks. Calls that cannot proceed either drop
//! the byte silently (the sentinel-style calls) or return
//! `nb::Error::WouldBlock`, so callers may wrap them in `nb::block!` from
//! the main loop but never from the interrupt handler.

use crate::i2c::common::{Diagnostics, SlaveStatus};
use crate::i2c::status::{SlaveEvent, NO_DATA_SENTINEL};
use core::convert::Infallible;
use embedded_hal::i2c::SevenBitAddress;

/// Core slave functionality - address configuration and mode control
pub trait TwiSlaveCore {
    /// Hardware-specific error type that implements embedded-hal error traits
    type Error: embedded_hal::i2c::Error + core::fmt::Debug;

    /// Program the own address and power the peripheral with interrupts and
    /// acknowledge masked. Both FIFOs are emptied. Calling it again simply
    /// reprograms the same state.
    ///
    /// # Errors
    ///
    /// Returns an error if `address` does not fit in seven bits.
    fn init(&mut self, address: SevenBitAddress) -> Result<(), Self::Error>;

    /// Arm interrupts and auto-acknowledge. Must follow `init` before any
    /// bus activity. Calling it in the middle of a transaction can disturb
    /// the phase in flight.
    ///
    /// # Errors
    ///
    /// Returns an error if `init` has not been called.
    fn enable(&mut self) -> Result<(), Self::Error>;

    /// Switch the peripheral off.
    fn disable(&mut self);

    fn is_enabled(&self) -> bool;

    /// Configured own address, `None` before `init`.
    fn slave_address(&self) -> Option<SevenBitAddress>;
}

/// Application-side FIFO operations.
pub trait TwiSlaveBuffer: TwiSlaveCore {
    /// Queue a byte for the master's next read. Dropped silently if the
    /// transmit buffer is full.
    fn transmit_byte(&mut self, data: u8);

    /// Queue a byte, or `WouldBlock` if the transmit buffer is full.
    fn write_byte(&mut self, data: u8) -> nb::Result<(), Infallible>;

    /// Oldest received byte, or `WouldBlock` if nothing is waiting.
    fn read_byte(&mut self) -> nb::Result<u8, Infallible>;

    /// Put a byte into the receive buffer as if the master had sent it.
    /// Dropped silently if the receive buffer is full.
    fn stuff_receive_buffer(&mut self, data: u8);

    fn data_in_receive_buffer(&self) -> bool;

    /// `true` while bytes queued earlier have not all been read by the master.
    fn data_in_transmit_buffer(&self) -> bool;

    /// Discard everything queued for transmission. The receive buffer is
    /// left alone.
    fn clear_output(&mut self);

    /// Number of bytes waiting in the receive buffer.
    fn rx_buffer_count(&self) -> usize;

    /// Number of bytes that can still be queued for transmission.
    fn tx_buffer_space(&self) -> usize;

    /// Oldest received byte, or [`NO_DATA_SENTINEL`] if nothing is waiting.
    ///
    /// A received 0x88 looks the same as an empty buffer; check
    /// [`data_in_receive_buffer`](Self::data_in_receive_buffer) first or use
    /// [`read_byte`](Self::read_byte).
    fn receive_byte(&mut self) -> u8 {
        self.read_byte().unwrap_or(NO_DATA_SENTINEL)
    }

    /// Queue as much of `data` as fits. Returns the number of bytes queued.
    fn transmit(&mut self, data: &[u8]) -> usize {
        let mut queued = 0;
        for &byte in data {
            if self.write_byte(byte).is_err() {
                break;
            }
            queued += 1;
        }
        queued
    }

    /// Take up to `N` received bytes in arrival order.
    fn drain_received<const N: usize>(&mut self) -> heapless::Vec<u8, N>
    where
        Self: Sized,
    {
        let mut out = heapless::Vec::new();
        while !out.is_full() {
            match self.read_byte() {
                Ok(byte) => {
                    let _ = out.push(byte);
                }
                Err(_) => break,
            }
        }
        out
    }
}

/// Interrupt-side entry point plus status reporting.
pub trait TwiSlaveInterrupts: TwiSlaveCore {
    /// Service one bus interrupt. Call from the peripheral's ISR.
    ///
    /// Samples the status register, moves at most one byte between the data
    /// register and a FIFO, and writes the control register. Every outcome
    /// except the error group leaves the interface rearmed.
    fn handle_interrupt(&mut self) -> SlaveEvent;

    /// Snapshot of enable state, buffers and last event.
    fn slave_status(&self) -> SlaveStatus;

    fn diagnostics(&self) -> Diagnostics;

    /// Return the counters and reset them.
    fn take_diagnostics(&mut self) -> Diagnostics;

    /// Most significant unreported error, cleared by the call. After
    /// `Some(Error::Bus)` the driver resumes on the next address match;
    /// `enable` rearms it right away if the application wants a manual
    /// restart.
    fn take_error(&mut self) -> Option<Self::Error>;
}

/// Complete slave driver usable from both contexts.
pub trait TwiSlaveDevice: TwiSlaveBuffer + TwiSlaveInterrupts {}

/// Blanket implementation: any type implementing buffer + interrupts gets the full device
impl<T> TwiSlaveDevice for T where T: TwiSlaveBuffer + TwiSlaveInterrupts {}

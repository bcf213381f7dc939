// Licensed under the Apache-2.0 license

//! Slave trait implementations for [`TwiSlave`].
//!
//! This module contains the driver behaviour proper:
//! - Core slave functionality (address configuration, mode control)
//! - Application-side FIFO operations
//! - The interrupt handler and status reporting
//! - `embedded-io` readiness queries

use crate::common::Logger;
use crate::i2c::common::{Diagnostics, Error, SlaveConfig, SlaveStatus};
use crate::i2c::hardware_interface::{Control, TwiRegisters};
use crate::i2c::status::{self, Action, SlaveEvent};
use crate::i2c::traits::{TwiSlaveBuffer, TwiSlaveCore, TwiSlaveInterrupts};
use crate::i2c::twi_slave::TwiSlave;
use core::convert::Infallible;
use embedded_hal::i2c::SevenBitAddress;

// ================================================================================================
// TwiSlaveCore implementation - core slave functionality
// ================================================================================================

impl<R: TwiRegisters, L: Logger, const RX: usize, const TX: usize> TwiSlaveCore
    for TwiSlave<R, L, RX, TX>
{
    type Error = Error;

    fn init(&mut self, address: SevenBitAddress) -> Result<(), Self::Error> {
        let general_call = self.config.is_some_and(|c| c.general_call);
        self.init_with_config(SlaveConfig {
            address,
            general_call,
        })
    }

    fn enable(&mut self) -> Result<(), Self::Error> {
        if self.config.is_none() {
            return Err(Error::NotInitialized);
        }
        self.regs.write_control(Control::REARM);
        self.enabled = true;
        self.logger.debug("twi slave enabled");
        Ok(())
    }

    fn disable(&mut self) {
        self.regs.write_control(Control::NONE);
        self.enabled = false;
        self.logger.debug("twi slave disabled");
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn slave_address(&self) -> Option<SevenBitAddress> {
        self.config.map(|c| c.address)
    }
}

// ================================================================================================
// TwiSlaveBuffer implementation - application context
// ================================================================================================

impl<R: TwiRegisters, L: Logger, const RX: usize, const TX: usize> TwiSlaveBuffer
    for TwiSlave<R, L, RX, TX>
{
    fn transmit_byte(&mut self, data: u8) {
        if !self.tx.push(data) {
            Diagnostics::bump(&mut self.diagnostics.tx_overflows);
            self.record_error(Error::TxOverflow);
        }
    }

    fn write_byte(&mut self, data: u8) -> nb::Result<(), Infallible> {
        if self.tx.push(data) {
            Ok(())
        } else {
            Err(nb::Error::WouldBlock)
        }
    }

    fn read_byte(&mut self) -> nb::Result<u8, Infallible> {
        self.rx.pop().ok_or(nb::Error::WouldBlock)
    }

    fn stuff_receive_buffer(&mut self, data: u8) {
        if !self.rx.push(data) {
            Diagnostics::bump(&mut self.diagnostics.rx_overflows);
            self.record_error(Error::RxOverflow);
        }
    }

    fn data_in_receive_buffer(&self) -> bool {
        !self.rx.is_empty()
    }

    fn data_in_transmit_buffer(&self) -> bool {
        !self.tx.is_empty()
    }

    fn clear_output(&mut self) {
        self.tx.clear();
    }

    fn rx_buffer_count(&self) -> usize {
        self.rx.len()
    }

    fn tx_buffer_space(&self) -> usize {
        self.tx.capacity() - self.tx.len()
    }
}

// ================================================================================================
// TwiSlaveInterrupts implementation - interrupt context
// ================================================================================================

impl<R: TwiRegisters, L: Logger, const RX: usize, const TX: usize> TwiSlaveInterrupts
    for TwiSlave<R, L, RX, TX>
{
    fn handle_interrupt(&mut self) -> SlaveEvent {
        let event = status::decode(self.regs.read_status());
        let action = event.action();

        let mut underrun = false;
        let mut overflow = false;
        match action {
            Action::StoreReceived => {
                let byte = self.regs.read_data();
                overflow = !self.rx.push(byte);
            }
            Action::LoadTransmit => {
                let next = self.tx.pop();
                underrun = next.is_none();
                self.regs.write_data(status::outgoing_byte(next));
            }
            Action::Rearm | Action::Recover => {}
        }

        // Releases the bus clock; everything below is bookkeeping.
        self.regs.write_control(action.control());

        self.diagnostics.last_event = Some(event);
        if underrun {
            Diagnostics::bump(&mut self.diagnostics.tx_underruns);
        }
        if overflow {
            Diagnostics::bump(&mut self.diagnostics.rx_overflows);
            self.record_error(Error::RxOverflow);
            self.logger.error("twi receive buffer full, byte dropped");
        }
        if event.is_general_call() {
            Diagnostics::bump(&mut self.diagnostics.general_calls);
        }
        match (event, action) {
            (_, Action::Recover) => {
                Diagnostics::bump(&mut self.diagnostics.bus_errors);
                self.record_error(Error::Bus);
                self.logger.error("twi bus error, stop forced");
            }
            (SlaveEvent::Unknown(_), _) => {
                Diagnostics::bump(&mut self.diagnostics.unknown_status);
                self.logger.debug("twi unknown status, rearmed");
            }
            _ => {}
        }

        event
    }

    fn slave_status(&self) -> SlaveStatus {
        SlaveStatus {
            enabled: self.enabled,
            armed: self.is_armed(),
            address: self.slave_address(),
            data_available: self.data_in_receive_buffer(),
            rx_buffer_count: self.rx.len(),
            tx_buffer_count: self.tx.len(),
            last_event: self.diagnostics.last_event,
            error: self.pending_error.is_some(),
        }
    }

    fn diagnostics(&self) -> Diagnostics {
        self.diagnostics
    }

    fn take_diagnostics(&mut self) -> Diagnostics {
        core::mem::take(&mut self.diagnostics)
    }

    fn take_error(&mut self) -> Option<Self::Error> {
        self.pending_error.take()
    }
}

// ================================================================================================
// embedded-io readiness
// ================================================================================================

impl<R: TwiRegisters, L: Logger, const RX: usize, const TX: usize> embedded_io::ErrorType
    for TwiSlave<R, L, RX, TX>
{
    type Error = Error;
}

impl<R: TwiRegisters, L: Logger, const RX: usize, const TX: usize> embedded_io::ReadReady
    for TwiSlave<R, L, RX, TX>
{
    fn read_ready(&mut self) -> Result<bool, Self::Error> {
        Ok(self.data_in_receive_buffer())
    }
}

impl<R: TwiRegisters, L: Logger, const RX: usize, const TX: usize> embedded_io::WriteReady
    for TwiSlave<R, L, RX, TX>
{
    fn write_ready(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.tx.is_full())
    }
}

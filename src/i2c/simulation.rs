// Licensed under the Apache-2.0 license

//! Register-level stand-in for the slave peripheral plus a scripted bus master.
//!
//! [`SimulatedTwi`] lets the driver run without hardware: tests and the
//! host harness set the status and data registers with
//! [`raise`](SimulatedTwi::raise), call the interrupt handler, then inspect
//! what the driver wrote back. The `master_*` helpers replay the status
//! sequences a real bus master produces for whole transactions.
//!
//! The simulation does not gate events on the interrupt-enable bit: a
//! disarmed interface still sees the next raised event, which is how the
//! driver resumes after a forced stop.

use crate::common::Logger;
use crate::i2c::hardware_interface::{Control, TwiRegisters};
use crate::i2c::status::SlaveStatusCode;
use crate::i2c::traits::TwiSlaveInterrupts;
use crate::i2c::twi_slave::TwiSlave;
use heapless::Deque;

/// Number of control register writes kept in the history.
pub const CONTROL_HISTORY: usize = 32;

#[derive(Default)]
pub struct SimulatedTwi {
    address: u8,
    control: Control,
    status: u8,
    data: u8,
    interrupt_pending: bool,
    last_data_written: Option<u8>,
    control_history: Deque<Control, CONTROL_HISTORY>,
}

impl SimulatedTwi {
    #[must_use]
    pub fn new() -> Self {
        Self {
            status: SlaveStatusCode::NoState.code(),
            ..Self::default()
        }
    }

    /// Latch a bus event: status code and the byte on the data register.
    pub fn raise(&mut self, status: u8, data: u8) {
        self.status = status;
        self.data = data;
        self.interrupt_pending = true;
    }

    /// Set until the driver writes the control register with TWINT.
    #[must_use]
    pub fn interrupt_pending(&self) -> bool {
        self.interrupt_pending
    }

    /// Last byte the driver loaded for transmission.
    #[must_use]
    pub fn last_data_written(&self) -> Option<u8> {
        self.last_data_written
    }

    /// Control register writes, oldest first.
    pub fn control_history(&self) -> impl Iterator<Item = &Control> {
        self.control_history.iter()
    }

    pub fn clear_history(&mut self) {
        self.control_history.clear();
    }
}

impl TwiRegisters for SimulatedTwi {
    fn write_address(&mut self, value: u8) {
        self.address = value;
    }

    fn read_address(&self) -> u8 {
        self.address
    }

    fn write_control(&mut self, value: Control) {
        if value.contains(Control::TWINT) {
            self.interrupt_pending = false;
            self.status = SlaveStatusCode::NoState.code();
        }
        if self.control_history.is_full() {
            self.control_history.pop_front();
        }
        let _ = self.control_history.push_back(value);
        self.control = value;
    }

    fn read_control(&self) -> Control {
        self.control
    }

    fn read_status(&self) -> u8 {
        self.status
    }

    fn read_data(&self) -> u8 {
        self.data
    }

    fn write_data(&mut self, value: u8) {
        self.data = value;
        self.last_data_written = Some(value);
    }
}

fn step<L: Logger, const RX: usize, const TX: usize>(
    slave: &mut TwiSlave<SimulatedTwi, L, RX, TX>,
    code: SlaveStatusCode,
    data: u8,
) {
    slave.registers_mut().raise(code.code(), data);
    slave.handle_interrupt();
}

/// Replay a master write of `bytes` to our address, ending with STOP.
pub fn master_write<L: Logger, const RX: usize, const TX: usize>(
    slave: &mut TwiSlave<SimulatedTwi, L, RX, TX>,
    bytes: &[u8],
) {
    step(slave, SlaveStatusCode::SrxAdrAck, 0);
    for &byte in bytes {
        step(slave, SlaveStatusCode::SrxAdrDataAck, byte);
    }
    step(slave, SlaveStatusCode::SrxStopRestart, 0);
}

/// Replay a general call write of `bytes`, ending with STOP.
pub fn master_general_call<L: Logger, const RX: usize, const TX: usize>(
    slave: &mut TwiSlave<SimulatedTwi, L, RX, TX>,
    bytes: &[u8],
) {
    step(slave, SlaveStatusCode::SrxGenAck, 0);
    for &byte in bytes {
        step(slave, SlaveStatusCode::SrxGenDataAck, byte);
    }
    step(slave, SlaveStatusCode::SrxStopRestart, 0);
}

/// Replay a master read of `count` bytes (capped at `N`). The master ACKs
/// every byte but the last and NACKs the last.
pub fn master_read<L: Logger, const RX: usize, const TX: usize, const N: usize>(
    slave: &mut TwiSlave<SimulatedTwi, L, RX, TX>,
    count: usize,
) -> heapless::Vec<u8, N> {
    let mut out = heapless::Vec::new();
    let count = count.min(N);
    if count == 0 {
        return out;
    }

    step(slave, SlaveStatusCode::StxAdrAck, 0);
    let _ = out.push(slave.registers().read_data());
    while out.len() < count {
        step(slave, SlaveStatusCode::StxDataAck, 0);
        let _ = out.push(slave.registers().read_data());
    }
    step(slave, SlaveStatusCode::StxDataNack, 0);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i2c::status::NO_DATA_SENTINEL;
    use crate::i2c::traits::{TwiSlaveBuffer, TwiSlaveCore};
    use hex_literal::hex;

    fn enabled_slave() -> TwiSlave<SimulatedTwi> {
        let mut slave = TwiSlave::new(SimulatedTwi::new());
        slave.init(0x30).unwrap();
        slave.enable().unwrap();
        slave.registers_mut().clear_history();
        slave
    }

    #[test]
    fn test_twint_write_clears_pending_interrupt() {
        let mut sim = SimulatedTwi::new();
        sim.raise(0x60, 0);
        assert!(sim.interrupt_pending());
        sim.write_control(Control::INIT);
        assert!(sim.interrupt_pending());
        sim.write_control(Control::REARM);
        assert!(!sim.interrupt_pending());
    }

    #[test]
    fn test_history_is_bounded() {
        let mut sim = SimulatedTwi::new();
        for _ in 0..CONTROL_HISTORY + 5 {
            sim.write_control(Control::REARM);
        }
        sim.write_control(Control::RECOVER);
        assert_eq!(sim.control_history().count(), CONTROL_HISTORY);
        assert_eq!(sim.control_history().last(), Some(&Control::RECOVER));
    }

    #[test]
    fn test_master_write_then_read() {
        let mut slave = enabled_slave();
        master_write(&mut slave, &hex!("10 20 30"));

        let received: heapless::Vec<u8, 8> = slave.drain_received();
        assert_eq!(received.as_slice(), &hex!("10 20 30"));
        assert!(slave
            .registers()
            .control_history()
            .all(|c| *c == Control::REARM));

        slave.transmit(&hex!("aa bb"));
        let read: heapless::Vec<u8, 8> = master_read(&mut slave, 2);
        assert_eq!(read.as_slice(), &hex!("aa bb"));
        assert!(!slave.data_in_transmit_buffer());
        assert!(slave.is_armed());
    }

    #[test]
    fn test_master_reads_past_queued_data() {
        let mut slave = enabled_slave();
        slave.transmit_byte(0x01);
        let read: heapless::Vec<u8, 4> = master_read(&mut slave, 3);
        assert_eq!(read.as_slice(), &[0x01, NO_DATA_SENTINEL, NO_DATA_SENTINEL]);
    }

    #[test]
    fn test_master_read_zero_bytes_touches_nothing() {
        let mut slave = enabled_slave();
        let read: heapless::Vec<u8, 4> = master_read(&mut slave, 0);
        assert!(read.is_empty());
        assert_eq!(slave.registers().control_history().count(), 0);
    }
}

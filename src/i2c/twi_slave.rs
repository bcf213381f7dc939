// Licensed under the Apache-2.0 license

//! Interrupt-driven two-wire slave driver.
//!
//! [`TwiSlave`] is the single aggregate shared by both execution contexts:
//! the bus interrupt calls
//! [`handle_interrupt`](crate::i2c::traits::TwiSlaveInterrupts::handle_interrupt),
//! the application uses the buffer operations of
//! [`TwiSlaveBuffer`](crate::i2c::traits::TwiSlaveBuffer). Bytes move between
//! the two only through the receive and transmit FIFOs.
//!
//! ```text
//!            bus master
//!                |
//!      status + data registers
//!                |
//!      handle_interrupt (ISR)
//!        |               ^
//!   rx FIFO push     tx FIFO pop
//!        v               |
//!   receive_byte    transmit_byte
//!            application
//! ```
//!
//! The aggregate is borrowed exclusively by whichever context runs, so on a
//! target it is typically kept in a
//! [`SharedTwiSlave`](crate::i2c::shared::SharedTwiSlave).

use crate::common::{Logger, NoOpLogger};
use crate::i2c::common::{validate_address, Diagnostics, Error, SlaveConfig};
use crate::i2c::hardware_interface::{encode_address, Control, TwiRegisters};
use crate::i2c::ring_buffer::RingBuffer;

/// Default receive FIFO size in slots.
pub const TWI_RX_BUFFER_SIZE: usize = 16;
/// Default transmit FIFO size in slots.
pub const TWI_TX_BUFFER_SIZE: usize = 16;

pub struct TwiSlave<
    R: TwiRegisters,
    L: Logger = NoOpLogger,
    const RX: usize = { TWI_RX_BUFFER_SIZE },
    const TX: usize = { TWI_TX_BUFFER_SIZE },
> {
    pub(crate) regs: R,
    pub(crate) logger: L,
    pub(crate) config: Option<SlaveConfig>,
    pub(crate) enabled: bool,
    pub(crate) rx: RingBuffer<RX>,
    pub(crate) tx: RingBuffer<TX>,
    pub(crate) diagnostics: Diagnostics,
    pub(crate) pending_error: Option<Error>,
}

impl<R: TwiRegisters> TwiSlave<R> {
    /// Driver with default buffer sizes and no logging.
    pub fn new(regs: R) -> Self {
        Self::with_logger(regs, NoOpLogger)
    }
}

impl<R: TwiRegisters, L: Logger, const RX: usize, const TX: usize> TwiSlave<R, L, RX, TX> {
    pub fn with_logger(regs: R, logger: L) -> Self {
        Self {
            regs,
            logger,
            config: None,
            enabled: false,
            rx: RingBuffer::new(),
            tx: RingBuffer::new(),
            diagnostics: Diagnostics::default(),
            pending_error: None,
        }
    }

    /// Program address and general-call bit from `config` and power the
    /// peripheral with interrupts and acknowledge masked. Buffered bytes
    /// are kept; call [`flush`](Self::flush) to drop them.
    pub fn init_with_config(&mut self, config: SlaveConfig) -> Result<(), Error> {
        let address = validate_address(config.address)?;
        self.regs
            .write_address(encode_address(address, config.general_call));
        self.regs.write_control(Control::INIT);
        self.config = Some(config);
        self.enabled = false;
        self.logger.debug("twi slave initialized");
        Ok(())
    }

    #[must_use]
    pub fn config(&self) -> Option<&SlaveConfig> {
        self.config.as_ref()
    }

    /// Empty both FIFOs.
    pub fn flush(&mut self) {
        self.rx.clear();
        self.tx.clear();
    }

    /// Whether the control register currently has interrupt and acknowledge enabled.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.regs.read_control().is_armed()
    }

    /// Usable receive FIFO capacity.
    #[must_use]
    pub fn rx_capacity(&self) -> usize {
        self.rx.capacity()
    }

    /// Usable transmit FIFO capacity.
    #[must_use]
    pub fn tx_capacity(&self) -> usize {
        self.tx.capacity()
    }

    pub fn registers(&self) -> &R {
        &self.regs
    }

    pub fn registers_mut(&mut self) -> &mut R {
        &mut self.regs
    }

    pub fn logger_mut(&mut self) -> &mut L {
        &mut self.logger
    }

    /// Give the register block back, dropping buffered data.
    pub fn release(self) -> R {
        self.regs
    }

    /// Remember an error for `take_error`. A bus error replaces anything
    /// pending; overflows only fill an empty slot.
    pub(crate) fn record_error(&mut self, error: Error) {
        if error == Error::Bus || self.pending_error.is_none() {
            self.pending_error = Some(error);
        }
    }
}

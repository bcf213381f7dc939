// Licensed under the Apache-2.0 license

//! Two-wire (I2C) slave driver module.
//!
//! An interrupt-driven slave-mode engine for byte-oriented TWI peripherals,
//! designed for bare-metal and `no_std` environments. The interrupt handler
//! decodes the peripheral status register and moves bytes between the data
//! register and two FIFOs; the application polls and fills those FIFOs.

pub mod common;
pub mod hardware_interface;
pub mod ring_buffer;
pub mod shared;
pub mod simulation;
pub mod slave_impl;
pub mod status;
pub mod traits;
pub mod twi_slave;

// Re-export common types for convenience
pub use common::{Diagnostics, Error, SlaveConfig, SlaveConfigBuilder, SlaveStatus};
pub use hardware_interface::{Control, TwiRegisters};
pub use ring_buffer::RingBuffer;
pub use shared::SharedTwiSlave;
pub use status::{Action, SlaveEvent, SlaveStatusCode, NO_DATA_SENTINEL};
pub use traits::{TwiSlaveBuffer, TwiSlaveCore, TwiSlaveDevice, TwiSlaveInterrupts};
pub use twi_slave::TwiSlave;

// Licensed under the Apache-2.0 license

//! Slave-mode status decoding.
//!
//! The peripheral keeps the protocol phase in its status register; the
//! driver holds no session state of its own. Each interrupt is therefore
//! handled by a pure mapping:
//!
//! ```text
//! raw status --decode--> SlaveEvent --action--> Action --control--> Control
//! ```
//!
//! The driver applies the [`Action`] against its buffers and writes the
//! resulting [`Control`] value. Keeping the mapping free of side effects
//! lets the whole status table be checked without hardware.

use crate::i2c::hardware_interface::{Control, STATUS_MASK};

/// Byte loaded for the master when the transmit buffer is empty, and
/// returned by the sentinel-style receive call when nothing was received.
///
/// It is indistinguishable from a payload byte of the same value.
pub const NO_DATA_SENTINEL: u8 = 0x88;

/// Status codes reported while operating as a slave.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum SlaveStatusCode {
    /// Own SLA+W received, ACK returned.
    SrxAdrAck = 0x60,
    /// Arbitration lost as master, own SLA+W received, ACK returned.
    SrxAdrAckArbLost = 0x68,
    /// General call address received, ACK returned.
    SrxGenAck = 0x70,
    /// Arbitration lost as master, general call received, ACK returned.
    SrxGenAckArbLost = 0x78,
    /// Addressed with own SLA+W, data received, ACK returned.
    SrxAdrDataAck = 0x80,
    /// Addressed with own SLA+W, data received, NOT ACK returned.
    SrxAdrDataNack = 0x88,
    /// Addressed with general call, data received, ACK returned.
    SrxGenDataAck = 0x90,
    /// Addressed with general call, data received, NOT ACK returned.
    SrxGenDataNack = 0x98,
    /// STOP or repeated START received while still addressed.
    SrxStopRestart = 0xA0,
    /// Own SLA+R received, ACK returned.
    StxAdrAck = 0xA8,
    /// Arbitration lost as master, own SLA+R received, ACK returned.
    StxAdrAckArbLost = 0xB0,
    /// Data byte transmitted, ACK received.
    StxDataAck = 0xB8,
    /// Data byte transmitted, NOT ACK received.
    StxDataNack = 0xC0,
    /// Last byte transmitted with TWEA cleared, ACK received.
    StxDataAckLastByte = 0xC8,
    /// No relevant state information, TWINT not set.
    NoState = 0xF8,
    /// Illegal START or STOP on the bus.
    BusError = 0x00,
}

impl SlaveStatusCode {
    /// Every code in the closed set, in register value order.
    pub const ALL: [Self; 16] = [
        Self::BusError,
        Self::SrxAdrAck,
        Self::SrxAdrAckArbLost,
        Self::SrxGenAck,
        Self::SrxGenAckArbLost,
        Self::SrxAdrDataAck,
        Self::SrxAdrDataNack,
        Self::SrxGenDataAck,
        Self::SrxGenDataNack,
        Self::SrxStopRestart,
        Self::StxAdrAck,
        Self::StxAdrAckArbLost,
        Self::StxDataAck,
        Self::StxDataNack,
        Self::StxDataAckLastByte,
        Self::NoState,
    ];

    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for SlaveStatusCode {
    type Error = u8;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        let code = match raw {
            0x60 => Self::SrxAdrAck,
            0x68 => Self::SrxAdrAckArbLost,
            0x70 => Self::SrxGenAck,
            0x78 => Self::SrxGenAckArbLost,
            0x80 => Self::SrxAdrDataAck,
            0x88 => Self::SrxAdrDataNack,
            0x90 => Self::SrxGenDataAck,
            0x98 => Self::SrxGenDataNack,
            0xA0 => Self::SrxStopRestart,
            0xA8 => Self::StxAdrAck,
            0xB0 => Self::StxAdrAckArbLost,
            0xB8 => Self::StxDataAck,
            0xC0 => Self::StxDataNack,
            0xC8 => Self::StxDataAckLastByte,
            0xF8 => Self::NoState,
            0x00 => Self::BusError,
            other => return Err(other),
        };
        Ok(code)
    }
}

/// One decoded interrupt.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SlaveEvent {
    Known(SlaveStatusCode),
    /// Code outside the slave table, masked status value kept for diagnostics.
    Unknown(u8),
}

/// What the driver does with its buffers before writing the control register.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Action {
    /// Nothing to move; rearm for the next event.
    Rearm,
    /// Push the data register into the receive buffer, then rearm.
    StoreReceived,
    /// Load the next transmit byte (or the sentinel) into the data register, then rearm.
    LoadTransmit,
    /// Force a stop condition and leave the interface disarmed.
    Recover,
}

/// Decode a raw status register sample.
#[must_use]
pub fn decode(raw_status: u8) -> SlaveEvent {
    let masked = raw_status & STATUS_MASK;
    match SlaveStatusCode::try_from(masked) {
        Ok(code) => SlaveEvent::Known(code),
        Err(other) => SlaveEvent::Unknown(other),
    }
}

impl SlaveEvent {
    #[must_use]
    pub fn action(self) -> Action {
        use SlaveStatusCode as S;

        match self {
            SlaveEvent::Known(S::SrxAdrAck | S::SrxAdrAckArbLost) => Action::Rearm,
            SlaveEvent::Known(S::SrxAdrDataAck | S::SrxGenDataAck) => Action::StoreReceived,
            SlaveEvent::Known(S::SrxGenAck | S::SrxGenAckArbLost) => Action::Rearm,
            SlaveEvent::Known(S::StxAdrAck | S::StxAdrAckArbLost | S::StxDataAck) => {
                Action::LoadTransmit
            }
            SlaveEvent::Known(S::StxDataNack) => Action::Rearm,
            SlaveEvent::Known(S::SrxStopRestart) => Action::Rearm,
            SlaveEvent::Known(
                S::SrxAdrDataNack
                | S::SrxGenDataNack
                | S::StxDataAckLastByte
                | S::NoState
                | S::BusError,
            ) => Action::Recover,
            // Rearm rather than wedge the bus on a code we do not know.
            SlaveEvent::Unknown(_) => Action::Rearm,
        }
    }

    #[must_use]
    pub fn is_general_call(self) -> bool {
        matches!(
            self,
            SlaveEvent::Known(SlaveStatusCode::SrxGenAck | SlaveStatusCode::SrxGenAckArbLost)
        )
    }

    /// Start of a new transaction addressed to us.
    #[must_use]
    pub fn is_address_match(self) -> bool {
        matches!(
            self,
            SlaveEvent::Known(
                SlaveStatusCode::SrxAdrAck
                    | SlaveStatusCode::SrxAdrAckArbLost
                    | SlaveStatusCode::SrxGenAck
                    | SlaveStatusCode::SrxGenAckArbLost
                    | SlaveStatusCode::StxAdrAck
                    | SlaveStatusCode::StxAdrAckArbLost
            )
        )
    }
}

impl Action {
    /// Control register value written at the end of the interrupt.
    #[must_use]
    pub const fn control(self) -> Control {
        match self {
            Action::Rearm | Action::StoreReceived | Action::LoadTransmit => Control::REARM,
            Action::Recover => Control::RECOVER,
        }
    }
}

/// Byte to put on the bus given the head of the transmit buffer.
#[must_use]
pub fn outgoing_byte(next: Option<u8>) -> u8 {
    next.unwrap_or(NO_DATA_SENTINEL)
}

// Licensed under the Apache-2.0 license

//! Access to one driver instance from both the bus ISR and the main loop.
//!
//! The driver is an ordinary owned value; this wrapper only provides the
//! `static` home and the exclusive borrow each context needs:
//!
//! ```rust,ignore
//! static TWI: SharedTwiSlave<TwiSlave<Board>> = SharedTwiSlave::new();
//!
//! fn main() -> ! {
//!     let mut slave = TwiSlave::new(Board::take());
//!     slave.init(0x42).unwrap();
//!     slave.enable().unwrap();
//!     TWI.install(slave);
//!     loop {
//!         TWI.with(|twi| {
//!             while let Ok(byte) = twi.read_byte() {
//!                 handle(byte);
//!             }
//!         });
//!     }
//! }
//!
//! #[interrupt]
//! fn TWI() {
//!     TWI.on_interrupt();
//! }
//! ```

use crate::i2c::status::SlaveEvent;
use crate::i2c::traits::TwiSlaveInterrupts;
use core::cell::RefCell;
use critical_section::Mutex;

pub struct SharedTwiSlave<T> {
    inner: Mutex<RefCell<Option<T>>>,
}

impl<T> Default for SharedTwiSlave<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SharedTwiSlave<T> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(None)),
        }
    }

    /// Hand the driver over. Returns the previously installed one, if any.
    pub fn install(&self, driver: T) -> Option<T> {
        critical_section::with(|cs| self.inner.borrow_ref_mut(cs).replace(driver))
    }

    /// Take the driver back out.
    pub fn take(&self) -> Option<T> {
        critical_section::with(|cs| self.inner.borrow_ref_mut(cs).take())
    }

    /// Run `f` on the driver inside a critical section. `None` if nothing
    /// is installed.
    pub fn with<F, U>(&self, f: F) -> Option<U>
    where
        F: FnOnce(&mut T) -> U,
    {
        critical_section::with(|cs| self.inner.borrow_ref_mut(cs).as_mut().map(f))
    }
}

impl<T: TwiSlaveInterrupts> SharedTwiSlave<T> {
    /// Interrupt entry point. An interrupt arriving before `install` is ignored.
    pub fn on_interrupt(&self) -> Option<SlaveEvent> {
        self.with(|driver| driver.handle_interrupt())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i2c::simulation::SimulatedTwi;
    use crate::i2c::status::SlaveStatusCode;
    use crate::i2c::traits::{TwiSlaveBuffer, TwiSlaveCore};
    use crate::i2c::twi_slave::TwiSlave;

    #[test]
    fn test_interrupt_before_install_is_ignored() {
        let shared: SharedTwiSlave<TwiSlave<SimulatedTwi>> = SharedTwiSlave::new();
        assert_eq!(shared.on_interrupt(), None);
        assert_eq!(shared.with(|s| s.receive_byte()), None);
    }

    #[test]
    fn test_both_contexts_reach_the_same_driver() {
        static SHARED: SharedTwiSlave<TwiSlave<SimulatedTwi>> = SharedTwiSlave::new();

        let mut slave = TwiSlave::new(SimulatedTwi::new());
        slave.init(0x42).unwrap();
        slave.enable().unwrap();
        assert!(SHARED.install(slave).is_none());

        SHARED.with(|s| s.registers_mut().raise(SlaveStatusCode::SrxAdrAck.code(), 0));
        assert_eq!(
            SHARED.on_interrupt(),
            Some(SlaveEvent::Known(SlaveStatusCode::SrxAdrAck))
        );
        SHARED.with(|s| {
            s.registers_mut()
                .raise(SlaveStatusCode::SrxAdrDataAck.code(), 0x42)
        });
        SHARED.on_interrupt();

        assert_eq!(SHARED.with(|s| s.read_byte()), Some(Ok(0x42)));
        assert!(SHARED.take().is_some());
        assert_eq!(SHARED.on_interrupt(), None);
    }
}

// Licensed under the Apache-2.0 license

use crate::command_table::{FunctionEntry, ModuleEntry, ModuleTable, StaticModuleTable};
use crate::i2c::simulation::{master_general_call, master_read, master_write, SimulatedTwi};
use crate::i2c::{
    Error, SlaveConfigBuilder, SlaveStatusCode, TwiRegisters, TwiSlave, TwiSlaveBuffer,
    TwiSlaveCore, TwiSlaveInterrupts, NO_DATA_SENTINEL,
};
use embedded_io::Write;

const SLAVE_ADDR: u8 = 0x42;

const DEMO_FUNCS: [FunctionEntry; 2] = [
    FunctionEntry {
        command: 0x01,
        function: 1,
    },
    FunctionEntry {
        command: 0x02,
        function: 2,
    },
];

static DEMO_MODULES: [ModuleEntry<'static>; 1] = [ModuleEntry {
    access_id: 0x10,
    functions: &DEMO_FUNCS,
}];

fn enabled_slave() -> TwiSlave<SimulatedTwi> {
    let mut slave = TwiSlave::new(SimulatedTwi::new());
    assert!(slave.init(SLAVE_ADDR).is_ok());
    assert!(slave.enable().is_ok());
    slave
}

fn feed(slave: &mut TwiSlave<SimulatedTwi>, code: SlaveStatusCode, data: u8) {
    slave.registers_mut().raise(code.code(), data);
    slave.handle_interrupt();
}

pub fn run_twi_slave_tests<W: Write>(out: &mut W) {
    let _ = writeln!(out, "\r\n=== TWI Slave Tests ===\r");

    test_receive(out);
    test_transmit_empty(out);
    test_transmit_data(out);
    test_bus_error_recovery(out);
    test_restart_after_error(out);
    test_output_resync(out);
    test_general_call(out);
    test_command_dispatch(out);

    let _ = writeln!(out, "\r\n=== All TWI Slave Tests Passed ===\r");
}

fn test_receive<W: Write>(out: &mut W) {
    let _ = write!(out, "Testing receive path... ");

    let mut slave = enabled_slave();
    assert!(!slave.data_in_receive_buffer());
    feed(&mut slave, SlaveStatusCode::SrxAdrAck, 0);
    feed(&mut slave, SlaveStatusCode::SrxAdrDataAck, 0x42);
    assert!(slave.data_in_receive_buffer());
    assert_eq!(slave.receive_byte(), 0x42);
    assert!(!slave.data_in_receive_buffer());

    let _ = writeln!(out, "PASSED\r");
}

fn test_transmit_empty<W: Write>(out: &mut W) {
    let _ = write!(out, "Testing transmit with nothing queued... ");

    let mut slave = enabled_slave();
    feed(&mut slave, SlaveStatusCode::StxAdrAck, 0);
    assert_eq!(slave.registers().read_data(), NO_DATA_SENTINEL);
    assert!(slave.is_armed());

    let _ = writeln!(out, "PASSED\r");
}

fn test_transmit_data<W: Write>(out: &mut W) {
    let _ = write!(out, "Testing transmit of queued byte... ");

    let mut slave = enabled_slave();
    slave.transmit_byte(0x07);
    feed(&mut slave, SlaveStatusCode::StxAdrAck, 0);
    assert_eq!(slave.registers().read_data(), 0x07);
    assert!(!slave.data_in_transmit_buffer());

    let _ = writeln!(out, "PASSED\r");
}

fn test_bus_error_recovery<W: Write>(out: &mut W) {
    let _ = write!(out, "Testing bus error recovery... ");

    let mut slave = enabled_slave();
    feed(&mut slave, SlaveStatusCode::BusError, 0);
    let control = slave.registers().read_control();
    assert!(control.requests_stop());
    assert!(!control.is_armed());

    feed(&mut slave, SlaveStatusCode::SrxAdrAck, 0);
    assert!(slave.is_armed());

    let _ = writeln!(out, "PASSED\r");
}

fn test_restart_after_error<W: Write>(out: &mut W) {
    let _ = write!(out, "Testing application restart after error... ");

    let mut slave = enabled_slave();
    feed(&mut slave, SlaveStatusCode::NoState, 0);
    assert!(slave.slave_status().error);

    if slave.take_error() == Some(Error::Bus) {
        assert!(slave.enable().is_ok());
    }
    assert!(slave.is_armed());
    assert!(!slave.slave_status().error);

    let _ = writeln!(out, "PASSED\r");
}

fn test_output_resync<W: Write>(out: &mut W) {
    let _ = write!(out, "Testing transmit buffer resync... ");

    let mut slave = enabled_slave();
    slave.transmit(&[0x01, 0x02, 0x03]);
    // Master only takes one byte of the reply.
    let first: heapless::Vec<u8, 1> = master_read(&mut slave, 1);
    assert_eq!(first.as_slice(), &[0x01]);

    // New request arrives with stale data still queued.
    master_write(&mut slave, &[0x10, 0x02]);
    assert!(slave.data_in_transmit_buffer());
    slave.clear_output();
    assert!(!slave.data_in_transmit_buffer());
    assert_eq!(slave.rx_buffer_count(), 2);

    let _ = writeln!(out, "PASSED\r");
}

fn test_general_call<W: Write>(out: &mut W) {
    let _ = write!(out, "Testing general call receive... ");

    let mut slave = TwiSlave::new(SimulatedTwi::new());
    let config = SlaveConfigBuilder::new()
        .address(SLAVE_ADDR)
        .general_call(true)
        .build();
    assert!(slave.init_with_config(config).is_ok());
    assert!(slave.enable().is_ok());
    assert_eq!(slave.registers().read_address() & 1, 1);

    master_general_call(&mut slave, &[0x06]);
    assert_eq!(slave.receive_byte(), 0x06);
    assert_eq!(slave.diagnostics().general_calls, 1);

    let _ = writeln!(out, "PASSED\r");
}

fn test_command_dispatch<W: Write>(out: &mut W) {
    let _ = write!(out, "Testing command lookup from received bytes... ");

    let table = StaticModuleTable::new(&DEMO_MODULES);
    let mut slave = enabled_slave();
    master_write(&mut slave, &[0x10, 0x02]);

    let request: heapless::Vec<u8, 2> = slave.drain_received();
    let (access_id, command) = match request.as_slice() {
        [id, cmd] => (*id, u16::from(*cmd)),
        _ => panic!("short request"),
    };
    let function = table.resolve(access_id, command);
    assert_eq!(function, Some(2));

    if let Some(function) = function {
        slave.transmit(&function.to_le_bytes());
    }
    let reply: heapless::Vec<u8, 2> = master_read(&mut slave, 2);
    assert_eq!(reply.as_slice(), &[0x02, 0x00]);

    let _ = writeln!(out, "PASSED\r");
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Sink(Vec<u8>);

    impl embedded_io::ErrorType for Sink {
        type Error = core::convert::Infallible;
    }

    impl Write for Sink {
        fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
            self.0.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> Result<(), Self::Error> {
            Ok(())
        }
    }

    #[test]
    fn test_functional_suite_passes() {
        let mut sink = Sink(Vec::new());
        run_twi_slave_tests(&mut sink);

        let text = String::from_utf8(sink.0).unwrap();
        assert_eq!(text.matches("PASSED").count(), 8);
        assert!(text.contains("All TWI Slave Tests Passed"));
    }
}

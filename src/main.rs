// Licensed under the Apache-2.0 license

//! Host harness: runs the functional suite against the simulated peripheral
//! and prints the report on stdout.

use std::io::Write as _;

use twi_slave_ddk::common::{Logger, WriterLogger};
use twi_slave_ddk::i2c::simulation::{master_read, master_write, SimulatedTwi};
use twi_slave_ddk::i2c::{TwiSlave, TwiSlaveBuffer, TwiSlaveCore, TwiSlaveInterrupts};
use twi_slave_ddk::tests::functional::twi_slave_test::run_twi_slave_tests;

struct Stdout(std::io::Stdout);

impl embedded_io::ErrorType for Stdout {
    type Error = embedded_io::ErrorKind;
}

impl embedded_io::Write for Stdout {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.0.write(buf).map_err(|_| embedded_io::ErrorKind::Other)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.0.flush().map_err(|_| embedded_io::ErrorKind::Other)
    }
}

fn echo_demo() {
    let logger = WriterLogger::new(Stdout(std::io::stdout()));
    let mut slave: TwiSlave<SimulatedTwi, _> = TwiSlave::with_logger(SimulatedTwi::new(), logger);

    if let Err(e) = slave.init(0x42).and_then(|()| slave.enable()) {
        slave.logger_mut().error("init failed");
        eprintln!("{e}");
        return;
    }

    master_write(&mut slave, b"ping");
    while let Ok(byte) = slave.read_byte() {
        slave.transmit_byte(byte.to_ascii_uppercase());
    }
    let reply: heapless::Vec<u8, 8> = master_read(&mut slave, 5);
    println!("echo reply: {:02x?}", reply.as_slice());
    println!("diagnostics: {:?}", slave.take_diagnostics());
}

fn main() {
    let mut stdout = Stdout(std::io::stdout());
    run_twi_slave_tests(&mut stdout);
    echo_demo();
}

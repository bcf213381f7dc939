// Licensed under the Apache-2.0 license

//! Crate-wide plumbing shared by the driver modules.

/// Minimal logging sink used by drivers.
///
/// Drivers take a logger as a generic parameter defaulting to [`NoOpLogger`]
/// so that production builds pay nothing for it. Implementations must not
/// block: `debug` and `error` can be reached from interrupt context.
pub trait Logger {
    fn debug(&mut self, msg: &str);
    fn error(&mut self, msg: &str);
}

/// Logger that discards everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOpLogger;

impl Logger for NoOpLogger {
    fn debug(&mut self, _msg: &str) {}
    fn error(&mut self, _msg: &str) {}
}

/// Logger that forwards every line to an `embedded_io::Write` sink.
///
/// Write failures are ignored; a logger has nowhere to report them.
pub struct WriterLogger<W: embedded_io::Write> {
    writer: W,
}

impl<W: embedded_io::Write> WriterLogger<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn line(&mut self, level: &str, msg: &str) {
        let _ = self.writer.write_all(level.as_bytes());
        let _ = self.writer.write_all(msg.as_bytes());
        let _ = self.writer.write_all(b"\r\n");
    }
}

impl<W: embedded_io::Write> Logger for WriterLogger<W> {
    fn debug(&mut self, msg: &str) {
        self.line("[debug] ", msg);
    }

    fn error(&mut self, msg: &str) {
        self.line("[error] ", msg);
    }
}

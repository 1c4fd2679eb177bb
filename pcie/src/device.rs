//! Device handle for one packet core instance

use crate::config::Config;
use crate::debug::{DiagnosticSink, Logger};
use crate::io::{RegisterIo, TxRegister};
use crate::timer::{RecordTime, TimestampSource};
use error::Errno;

/// Generic device trait
pub trait Device {
    /// Returns device type/driver name
    fn name(&self) -> &'static str;

    /// Performs device initialization logic.
    ///
    /// # Safety
    ///
    /// Marked unsafe as it may cause direct hardware-specific side-effects.
    unsafe fn enable(&mut self) -> Result<(), Errno>;
}

/// Handle to a packet receiver/transmitter pair.
///
/// Holds every collaborator the transport needs: register access `IO`, the
/// hardware counter `C`, the diagnostic sink `S` and the post-transmit hook
/// `H`. Register sequences are not atomic, so a handle shared between
/// contexts needs external locking.
pub struct PcieCore<IO, C, S = (), H = ()> {
    pub(crate) io: IO,
    pub(crate) counter: C,
    pub(crate) log: Logger<S>,
    pub(crate) hook: H,
    pub(crate) config: Config,
}

impl<IO: RegisterIo, C: TimestampSource> PcieCore<IO, C> {
    /// Constructs a handle with no diagnostic output and no transmit hook
    pub fn new(io: IO, counter: C, config: Config) -> Self {
        Self {
            io,
            counter,
            log: Logger::new((), config.log_level()),
            hook: (),
            config,
        }
    }
}

impl<IO, C, S, H> PcieCore<IO, C, S, H>
where
    IO: RegisterIo,
    C: TimestampSource,
    S: DiagnosticSink,
    H: RecordTime,
{
    /// Routes diagnostics to `sink`
    pub fn with_sink<T: DiagnosticSink>(self, sink: T) -> PcieCore<IO, C, T, H> {
        PcieCore {
            io: self.io,
            counter: self.counter,
            log: self.log.with_sink(sink),
            hook: self.hook,
            config: self.config,
        }
    }

    /// Installs the hook run after each unaligned transmit burst
    pub fn with_hook<T: RecordTime>(self, hook: T) -> PcieCore<IO, C, S, T> {
        PcieCore {
            io: self.io,
            counter: self.counter,
            log: self.log,
            hook,
            config: self.config,
        }
    }

    /// Returns the register capability
    pub fn io(&self) -> &IO {
        &self.io
    }

    /// Returns the register capability for direct access
    pub fn io_mut(&mut self) -> &mut IO {
        &mut self.io
    }

    /// Returns the hardware counter
    pub fn counter(&self) -> &C {
        &self.counter
    }

    /// Returns the diagnostic sink
    pub fn sink(&self) -> &S {
        self.log.sink()
    }

    /// Returns the post-transmit hook
    pub fn hook(&self) -> &H {
        &self.hook
    }

    /// Returns the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Releases the handle, returning the register capability
    pub fn into_io(self) -> IO {
        self.io
    }

    /// Teardown entry point. The core holds no resources beyond the register
    /// windows, which outlive the handle.
    pub fn close_connections(&mut self) {}
}

impl<IO, C, S, H> Device for PcieCore<IO, C, S, H>
where
    IO: RegisterIo,
    C: TimestampSource,
    S: DiagnosticSink,
    H: RecordTime,
{
    fn name(&self) -> &'static str {
        "PCIe packet receiver/transmitter"
    }

    unsafe fn enable(&mut self) -> Result<(), Errno> {
        let name = self.name();
        infoln!(self.log, "{}: draining stale packets", name);
        self.drain_pcie_core();
        self.io.write(TxRegister::QueueEnable, 1);
        Ok(())
    }
}

//! TLP transport for the FPGA PCIe packet receiver/transmitter core.
//!
//! The core exposes two polled FIFOs through 32-bit registers. This crate
//! moves whole Transaction Layer Packets between caller-owned buffers and
//! those FIFOs:
//!
//! * [PcieCore::wait_for_tlp] and [PcieCore::drain_pcie_core] on the receive side
//! * [PcieCore::send_tlp] and [PcieCore::send_tlp_unaligned] on the transmit side
//!
//! Register access, the hardware counter, the diagnostic console and the
//! post-transmit timestamp hook are injected through [RegisterIo],
//! [TimestampSource], [DiagnosticSink] and [RecordTime].
#![warn(missing_docs)]
#![no_std]

#[cfg(test)]
#[macro_use]
extern crate std;

#[macro_use]
extern crate cfg_if;

#[macro_use]
pub mod debug;

pub mod arch;
pub mod config;
mod device;
pub mod io;
pub mod region;
mod rx;
#[cfg(test)]
mod sim;
pub mod status;
pub mod timer;
mod tx;

pub use device::{Device, PcieCore};
pub use config::{Config, ConfigKey};
pub use debug::{DiagnosticSink, Level, Logger};
pub use error::Errno;
pub use io::{RegisterIo, RxRegister, TxRegister};
pub use status::StatusWord;
pub use timer::{Deadline, RecordTime, TimestampSource};
pub use tx::TlpDataAlignment;

//! Receive path: TLP reassembly from the receiver FIFO

use crate::arch;
use crate::config::ConfigKey;
use crate::debug::DiagnosticSink;
use crate::device::PcieCore;
use crate::io::{RegisterIo, RxRegister};
use crate::status::StatusWord;
use crate::timer::{Deadline, TimestampSource};
use error::Errno;

impl<IO, C, S, H> PcieCore<IO, C, S, H>
where
    IO: RegisterIo,
    C: TimestampSource,
    S: DiagnosticSink,
{
    /// Returns `true` if the receive FIFO holds at least one quadword
    #[inline]
    pub fn poll_ready(&mut self) -> bool {
        self.io.read(RxRegister::Ready) != 0
    }

    /// Polls `READY` until it is set. The deadline is checked after every
    /// poll, so a deadline already reached times out even if data is queued.
    pub fn wait_ready(&mut self, deadline: Deadline) -> Result<(), Errno> {
        loop {
            let ready = self.poll_ready();
            if deadline.has_passed(&self.counter) {
                return Err(Errno::TimedOut);
            }
            if ready {
                return Ok(());
            }
        }
    }

    /// Busy-polls for one whole TLP and reassembles it into `tlp`.
    ///
    /// Each quadword is stored as its lower double word followed by its upper
    /// double word. A start-of-packet quadword restarts reassembly at the
    /// beginning of the buffer, so the returned packet always begins at the
    /// most recent start-of-packet. Returns the packet length in bytes.
    ///
    /// The byte capacity is `tlp.len() * 4`; pass a sub-slice to receive
    /// into less.
    ///
    /// # Errors
    ///
    /// * [Errno::TimedOut] if `deadline` is reached before `READY` is set or
    ///   before the end-of-packet quadword arrives. The buffer may hold a
    ///   partial packet.
    /// * [Errno::Overflow] if the packet does not fit in `tlp`. The rest of the
    ///   packet stays queued; [PcieCore::drain_pcie_core] discards it.
    pub fn wait_for_tlp(&mut self, tlp: &mut [u32], deadline: Deadline) -> Result<usize, Errno> {
        self.wait_ready(deadline)?;

        let capacity = tlp.len() * 4;
        // Double words received so far
        let mut i = 0;
        loop {
            let status = StatusWord::new(self.io.read(RxRegister::Status));
            if status.start_of_packet() {
                i = 0;
            }
            let upper = self.io.read(RxRegister::Upper32);
            let lower = self.io.read(RxRegister::Lower32Deq);

            // A quadword is only accepted whole
            if (i + 2) * 4 > capacity {
                errorln!(self.log, "TLP RECV OVERFLOW");
                return Err(Errno::Overflow);
            }
            tlp[i] = lower;
            tlp[i + 1] = upper;
            i += 2;

            if deadline.has_passed(&self.counter) {
                debugln!(self.log, "TLP receive timed out after {} bytes", i * 4);
                return Err(Errno::TimedOut);
            }
            if status.end_of_packet() {
                return Ok(i * 4);
            }
        }
    }

    /// Discards everything queued in the receive FIFO, pacing reads with a
    /// fixed busy-wait. Returns once `READY` reads clear; never returns if the
    /// hardware keeps reporting data.
    pub fn drain_pcie_core(&mut self) {
        let spin = self.config.get_usize(ConfigKey::DrainSpin);
        let mut count = 0usize;

        while self.poll_ready() {
            self.io.read(RxRegister::Status);
            self.io.read(RxRegister::Upper32);
            self.io.read(RxRegister::Lower32Deq);
            count += 1;
            arch::spin(spin);
        }

        if count != 0 {
            debugln!(self.log, "Drained {} quadwords", count);
        }
    }
}

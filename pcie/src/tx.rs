//! Transmit path: TLP serialization into the transmitter FIFO
//!
//! Every quadword is written as `STATUS`, `UPPER32`, `LOWER32SEND`; the write
//! to `LOWER32SEND` enqueues it. `QUEUEENABLE` is held at 0 while a burst is
//! being written so the core does not start sending a partial packet.

use crate::config::ConfigKey;
use crate::device::PcieCore;
use crate::io::{RegisterIo, TxRegister};
use crate::status::StatusWord;
use crate::timer::{RecordTime, TimestampSource};
use error::Errno;
use mask::u64_mask;

/// Placement of TLP payload relative to the quadword stream
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TlpDataAlignment {
    /// Payload starts on a quadword boundary
    Aligned,
    /// Payload follows a 3DW header and shares its last quadword
    Unaligned,
}

/// Double word `index` of `data` in little-endian memory order. Indices past
/// the end of `data` read as zero.
#[inline]
fn data_dword(data: &[u64], index: usize) -> u32 {
    data.get(index / 2).map_or(0, |&qword| {
        if index % 2 == 0 {
            (qword & u64_mask(32)) as u32
        } else {
            (qword >> 32) as u32
        }
    })
}

impl<IO, C, S, H> PcieCore<IO, C, S, H>
where
    IO: RegisterIo,
    C: TimestampSource,
    H: RecordTime,
{
    #[inline]
    fn write_quad_word(&mut self, status: StatusWord, upper: u32, lower: u32) {
        self.io.write(TxRegister::Status, status.word());
        self.io.write(TxRegister::Upper32, upper);
        self.io.write(TxRegister::Lower32Send, lower);
    }

    #[inline]
    fn send_quad_word(&mut self, status: StatusWord, qword: u64) {
        self.write_quad_word(status, (qword >> 32) as u32, (qword & u64_mask(32)) as u32);
    }

    #[inline]
    fn hold_queue(&mut self) {
        self.io.write(TxRegister::QueueEnable, 0);
    }

    #[inline]
    fn release_queue(&mut self) {
        self.io.write(TxRegister::QueueEnable, 1);
    }

    /// Sends a TLP given as a two-quadword header plus `data_len` bytes of
    /// payload.
    ///
    /// `header_len` is the header size in bytes; with a 12-byte (3DW) header
    /// and [TlpDataAlignment::Unaligned] payload, the third header double word
    /// and the first payload double word share one quadword and the rest of
    /// the payload is repacked from consecutive double words. Otherwise the
    /// payload is sent quadword by quadword as laid out in `data`.
    ///
    /// The first header quadword goes out before the queue is held.
    ///
    /// # Panics
    ///
    /// Panics if `data_len` is not a multiple of 4, or if quadword-aligned
    /// payload is shorter than `data_len`.
    pub fn send_tlp(
        &mut self,
        header: &[u64; 2],
        header_len: usize,
        data: &[u64],
        data_len: usize,
        alignment: TlpDataAlignment,
    ) -> Result<(), Errno> {
        assert!(data_len % 4 == 0, "TLP payload must be whole double words");

        self.send_quad_word(StatusWord::framing(true, false), header[0]);
        self.hold_queue();

        if header_len == 12 && alignment == TlpDataAlignment::Unaligned {
            let mut qword = header[1] << 32;
            if data_len > 0 {
                qword |= data_dword(data, 0) as u64;
            }
            self.send_quad_word(StatusWord::framing(false, data_len <= 4), qword);

            for byte_index in (4..data_len).step_by(8) {
                let dword = byte_index / 4;
                let qword =
                    ((data_dword(data, dword) as u64) << 32) | data_dword(data, dword + 1) as u64;
                self.send_quad_word(StatusWord::framing(false, byte_index + 8 >= data_len), qword);
            }
        } else {
            assert!(data_len <= data.len() * 8, "TLP payload shorter than data_len");

            self.send_quad_word(StatusWord::framing(false, data_len == 0), header[1]);
            for byte_index in (0..data_len).step_by(8) {
                self.send_quad_word(
                    StatusWord::framing(false, byte_index + 8 >= data_len),
                    data[byte_index / 8],
                );
            }
        }

        self.release_queue();
        Ok(())
    }

    /// Sends `tlp_len` bytes of `tlp` as a single packet, one quadword per
    /// `tlp` entry, then reports the counter to the [RecordTime] hook.
    ///
    /// # Panics
    ///
    /// Panics if the packet reaches the configured quadword limit or `tlp`
    /// holds fewer quadwords than `tlp_len` covers.
    pub fn send_tlp_unaligned(&mut self, tlp: &[u64], tlp_len: usize) -> Result<(), Errno> {
        assert!(tlp_len / 8 < self.config.get_usize(ConfigKey::MaxUnalignedQuadWords));

        let ceil_tlp_len = tlp_len + 7;
        let count = ceil_tlp_len / 8;
        assert!(tlp.len() >= count, "TLP buffer shorter than tlp_len");

        self.hold_queue();

        for (quad_word_index, &qword) in tlp[..count].iter().enumerate() {
            let status = StatusWord::framing(quad_word_index == 0, quad_word_index + 1 >= count);
            // Compares a quadword index with a byte length
            let upper = if quad_word_index + 1 >= tlp_len {
                0
            } else {
                (qword >> 32) as u32
            };
            let lower = (qword & u64_mask(32)) as u32;

            self.write_quad_word(status, upper, lower);
        }

        self.release_queue();

        let now = self.counter.read_hw_counter();
        self.hook.record_time(now);
        Ok(())
    }
}

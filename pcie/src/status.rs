//! Per-quadword status word of the packet FIFOs
//!
//! Both FIFOs carry one status word alongside every 64-bit data word. The
//! receiver exposes it through its `STATUS` register, the transmitter latches
//! the last value written to its own `STATUS` register.

use core::fmt;
use tock_registers::{fields::FieldValue, register_bitfields, LocalRegisterCopy};

register_bitfields! {
    u32,
    /// FIFO status word
    pub STATUS [
        PAD1 OFFSET(0) NUMBITS(8) [],
        /// Byte lanes valid in the data word
        BYTEENABLE OFFSET(8) NUMBITS(8) [],
        /// First quadword of a TLP
        STARTOFPACKET OFFSET(16) NUMBITS(1) [],
        /// Last quadword of a TLP
        ENDOFPACKET OFFSET(17) NUMBITS(1) [],
        PAD2 OFFSET(18) NUMBITS(14) []
    ]
}

/// Bit-packed status word. The packed register value is the only storage,
/// field accessors are views into it.
#[derive(Clone, Copy, PartialEq, Eq)]
#[repr(transparent)]
pub struct StatusWord(u32);

impl StatusWord {
    /// Wraps a raw register value
    pub const fn new(word: u32) -> Self {
        Self(word)
    }

    /// Builds a transmit status word with only the framing bits set
    pub fn framing(start_of_packet: bool, end_of_packet: bool) -> Self {
        let mut st = Self(0);
        st.update(
            STATUS::STARTOFPACKET.val(start_of_packet as u32)
                + STATUS::ENDOFPACKET.val(end_of_packet as u32),
        );
        st
    }

    #[inline(always)]
    fn reg(&self) -> LocalRegisterCopy<u32, STATUS::Register> {
        LocalRegisterCopy::new(self.0)
    }

    #[inline(always)]
    fn update(&mut self, field: FieldValue<u32, STATUS::Register>) {
        let mut reg = self.reg();
        reg.modify(field);
        self.0 = reg.get();
    }

    /// Returns the packed register value
    #[inline(always)]
    pub const fn word(&self) -> u32 {
        self.0
    }

    #[inline(always)]
    pub fn start_of_packet(&self) -> bool {
        self.reg().is_set(STATUS::STARTOFPACKET)
    }

    #[inline(always)]
    pub fn end_of_packet(&self) -> bool {
        self.reg().is_set(STATUS::ENDOFPACKET)
    }

    /// Byte-lane enable mask of the accompanying data word
    #[inline(always)]
    pub fn byte_enable(&self) -> u8 {
        self.reg().read(STATUS::BYTEENABLE) as u8
    }

    pub fn set_start_of_packet(&mut self, value: bool) {
        self.update(STATUS::STARTOFPACKET.val(value as u32));
    }

    pub fn set_end_of_packet(&mut self, value: bool) {
        self.update(STATUS::ENDOFPACKET.val(value as u32));
    }
}

impl fmt::Debug for StatusWord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("StatusWord")
            .field("word", &format_args!("{:#010x}", self.word()))
            .field("sop", &self.start_of_packet())
            .field("eop", &self.end_of_packet())
            .field("byteenable", &format_args!("{:#04x}", self.byte_enable()))
            .finish()
    }
}

impl From<u32> for StatusWord {
    fn from(word: u32) -> Self {
        Self::new(word)
    }
}

impl From<StatusWord> for u32 {
    fn from(status: StatusWord) -> u32 {
        status.word()
    }
}

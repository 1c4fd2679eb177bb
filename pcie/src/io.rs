//! Register access for the packet receiver/transmitter IP

use crate::config::{Config, ConfigKey};
use crate::status::STATUS;
use core::marker::PhantomData;
use core::ops::Deref;
use tock_registers::{
    interfaces::{Readable, Writeable},
    register_structs,
    registers::{ReadOnly, WriteOnly},
};

/// Receiver IP registers, by word index
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RxRegister {
    /// Upper 32 bits of the quadword at the FIFO head
    Upper32 = 0,
    /// Lower 32 bits of the quadword at the FIFO head; reading dequeues it
    Lower32Deq = 1,
    /// [crate::StatusWord] of the quadword at the FIFO head
    Status = 2,
    /// Non-zero while the FIFO holds data
    Ready = 3,
}

/// Transmitter IP registers, by word index
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TxRegister {
    /// Upper 32 bits of the next quadword
    Upper32 = 0,
    /// Lower 32 bits of the next quadword; writing enqueues the quadword
    Lower32Send = 1,
    /// [crate::StatusWord] of the next quadword
    Status = 2,
    /// 0 holds the queue, 1 lets the core drain it onto the link
    QueueEnable = 3,
}

/// Single-register access to the packet core.
///
/// Reads take `&mut self` since reading [RxRegister::Lower32Deq] has a side
/// effect on the receive FIFO.
pub trait RegisterIo {
    /// Reads a receiver register
    fn read(&mut self, reg: RxRegister) -> u32;
    /// Writes a transmitter register
    fn write(&mut self, reg: TxRegister, value: u32);
}

impl<T: RegisterIo + ?Sized> RegisterIo for &mut T {
    fn read(&mut self, reg: RxRegister) -> u32 {
        (**self).read(reg)
    }

    fn write(&mut self, reg: TxRegister, value: u32) {
        (**self).write(reg, value)
    }
}

/// Wrapper for setting up memory-mapped registers and IO
pub struct MemoryIo<T> {
    base: usize,
    _pd: PhantomData<fn() -> T>,
}

impl<T> MemoryIo<T> {
    /// Constructs a new instance of MMIO region.
    ///
    /// # Safety
    ///
    /// Does not perform `base` validation.
    pub const unsafe fn new(base: usize) -> Self {
        Self {
            base,
            _pd: PhantomData,
        }
    }

    /// Returns the virtual base address of the region
    #[inline(always)]
    pub const fn base(&self) -> usize {
        self.base
    }
}

impl<T> Deref for MemoryIo<T> {
    type Target = T;

    #[inline(always)]
    fn deref(&self) -> &Self::Target {
        unsafe { &*(self.base as *const _) }
    }
}

register_structs! {
    #[allow(non_snake_case)]
    ReceiverRegs {
        (0x00 => UPPER32: ReadOnly<u32>),
        (0x04 => LOWER32DEQ: ReadOnly<u32>),
        (0x08 => STATUS: ReadOnly<u32, STATUS::Register>),
        (0x0C => READY: ReadOnly<u32>),
        (0x10 => @END),
    }
}

register_structs! {
    #[allow(non_snake_case)]
    TransmitterRegs {
        (0x00 => UPPER32: WriteOnly<u32>),
        (0x04 => LOWER32SEND: WriteOnly<u32>),
        (0x08 => STATUS: WriteOnly<u32, STATUS::Register>),
        (0x0C => QUEUEENABLE: WriteOnly<u32>),
        (0x10 => @END),
    }
}

/// [RegisterIo] over the memory-mapped receiver and transmitter windows
pub struct PcieMmio {
    rx: MemoryIo<ReceiverRegs>,
    tx: MemoryIo<TransmitterRegs>,
}

impl PcieMmio {
    /// Constructs the register set for a packet region mapped at `base`,
    /// using the IP offsets from `config`.
    ///
    /// # Safety
    ///
    /// `base` must be the virtual address of the mapped packet region, which
    /// must stay mapped for the lifetime of the returned value.
    pub unsafe fn new(base: usize, config: &Config) -> Self {
        Self {
            rx: MemoryIo::new(base + config.get_usize(ConfigKey::ReceiverOffset)),
            tx: MemoryIo::new(base + config.get_usize(ConfigKey::TransmitterOffset)),
        }
    }

    /// Returns the receiver window base
    pub const fn receiver_base(&self) -> usize {
        self.rx.base()
    }

    /// Returns the transmitter window base
    pub const fn transmitter_base(&self) -> usize {
        self.tx.base()
    }
}

impl RegisterIo for PcieMmio {
    #[inline]
    fn read(&mut self, reg: RxRegister) -> u32 {
        let regs = &self.rx;
        match reg {
            RxRegister::Upper32 => regs.UPPER32.get(),
            RxRegister::Lower32Deq => regs.LOWER32DEQ.get(),
            RxRegister::Status => regs.STATUS.get(),
            RxRegister::Ready => regs.READY.get(),
        }
    }

    #[inline]
    fn write(&mut self, reg: TxRegister, value: u32) {
        let regs = &self.tx;
        match reg {
            TxRegister::Upper32 => regs.UPPER32.set(value),
            TxRegister::Lower32Send => regs.LOWER32SEND.set(value),
            TxRegister::Status => regs.STATUS.set(value),
            TxRegister::QueueEnable => regs.QUEUEENABLE.set(value),
        }
    }
}

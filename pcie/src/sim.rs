//! Register-level simulation of the packet core for unit tests

use crate::io::{RegisterIo, RxRegister, TxRegister};
use crate::status::StatusWord;
use crate::timer::TimestampSource;
use core::cell::Cell;
use std::collections::VecDeque;
use std::vec::Vec;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    Read(RxRegister),
    Write(TxRegister, u32),
}

/// Scripted receive FIFO plus a log of every register access.
///
/// In loopback mode, each quadword enqueued on the transmit side is appended
/// to the receive FIFO.
#[derive(Default)]
pub struct SimIo {
    fifo: VecDeque<(u32, u64)>,
    not_ready_polls: usize,
    loopback: bool,
    tx_status: u32,
    tx_upper: u32,
    pub accesses: Vec<Access>,
}

impl SimIo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn loopback() -> Self {
        Self {
            loopback: true,
            ..Self::default()
        }
    }

    pub fn push(&mut self, sop: bool, eop: bool, data: u64) {
        self.fifo
            .push_back((StatusWord::framing(sop, eop).word(), data));
    }

    /// `READY` reads as 0 for the next `polls` reads regardless of FIFO state
    pub fn delay_ready(&mut self, polls: usize) {
        self.not_ready_polls = polls;
    }

    pub fn pending(&self) -> usize {
        self.fifo.len()
    }

    pub fn reads(&self) -> Vec<RxRegister> {
        self.accesses
            .iter()
            .filter_map(|a| match a {
                Access::Read(reg) => Some(*reg),
                _ => None,
            })
            .collect()
    }

    pub fn writes(&self) -> Vec<(TxRegister, u32)> {
        self.accesses
            .iter()
            .filter_map(|a| match a {
                Access::Write(reg, value) => Some((*reg, *value)),
                _ => None,
            })
            .collect()
    }

    /// Quadwords enqueued on the transmit side, decoded from the write log
    pub fn sent(&self) -> Vec<(StatusWord, u64)> {
        let mut status = 0;
        let mut upper = 0;
        let mut out = Vec::new();
        for (reg, value) in self.writes() {
            match reg {
                TxRegister::Status => status = value,
                TxRegister::Upper32 => upper = value,
                TxRegister::Lower32Send => {
                    out.push((StatusWord::new(status), ((upper as u64) << 32) | value as u64))
                }
                TxRegister::QueueEnable => {}
            }
        }
        out
    }
}

impl RegisterIo for SimIo {
    fn read(&mut self, reg: RxRegister) -> u32 {
        self.accesses.push(Access::Read(reg));
        let head = self.fifo.front().copied().unwrap_or((0, 0));
        match reg {
            RxRegister::Ready => {
                if self.not_ready_polls > 0 {
                    self.not_ready_polls -= 1;
                    0
                } else {
                    !self.fifo.is_empty() as u32
                }
            }
            RxRegister::Status => head.0,
            RxRegister::Upper32 => (head.1 >> 32) as u32,
            RxRegister::Lower32Deq => {
                self.fifo.pop_front();
                head.1 as u32
            }
        }
    }

    fn write(&mut self, reg: TxRegister, value: u32) {
        self.accesses.push(Access::Write(reg, value));
        match reg {
            TxRegister::Status => self.tx_status = value,
            TxRegister::Upper32 => self.tx_upper = value,
            TxRegister::Lower32Send if self.loopback => {
                let data = ((self.tx_upper as u64) << 32) | value as u64;
                self.fifo.push_back((self.tx_status, data));
            }
            _ => {}
        }
    }
}

/// Counter advancing by `step` on every read
pub struct SimCounter {
    now: Cell<u64>,
    step: u64,
}

impl SimCounter {
    pub fn new(start: u64, step: u64) -> Self {
        Self {
            now: Cell::new(start),
            step,
        }
    }

    pub fn now(&self) -> u64 {
        self.now.get()
    }
}

impl TimestampSource for SimCounter {
    fn read_hw_counter(&self) -> u64 {
        let t = self.now.get();
        self.now.set(t + self.step);
        t
    }
}

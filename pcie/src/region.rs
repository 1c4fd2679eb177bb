//! Physical window mapping and board bring-up

use crate::config::{Config, ConfigKey};
use crate::io::{MemoryIo, PcieMmio};
use error::Errno;
use tock_registers::{interfaces::Writeable, register_structs, registers::WriteOnly};

/// Maps a physical register window into the current address space
pub trait IoRegionMapper {
    /// Returns the virtual base address for `len` bytes at `phys`.
    ///
    /// # Safety
    ///
    /// The caller must ensure the physical range belongs to a device which
    /// tolerates the accesses the returned window will be used for.
    unsafe fn open_io_region(&mut self, phys: usize, len: usize) -> Result<usize, Errno>;
}

/// Bare-metal mapper: physical addresses are used as-is
#[derive(Clone, Copy, Debug, Default)]
pub struct IdentityMapper;

impl IoRegionMapper for IdentityMapper {
    unsafe fn open_io_region(&mut self, phys: usize, len: usize) -> Result<usize, Errno> {
        if len == 0 {
            return Err(Errno::InvalidArgument);
        }
        phys.checked_add(len).ok_or(Errno::InvalidArgument)?;
        Ok(phys)
    }
}

register_structs! {
    #[allow(non_snake_case)]
    LedRegs {
        (0x00 => VALUE: WriteOnly<u8>),
        (0x01 => @END),
    }
}

/// Board LED bank, one bit per LED
pub struct Leds {
    regs: MemoryIo<LedRegs>,
}

impl Leds {
    /// # Safety
    ///
    /// Does not perform `base` validation.
    pub const unsafe fn new(base: usize) -> Self {
        Self {
            regs: MemoryIo::new(base),
        }
    }

    /// Sets the LED pattern
    pub fn set(&self, value: u8) {
        self.regs.VALUE.set(value);
    }
}

/// Maps the packet region and the LED region described by `config`.
///
/// # Safety
///
/// `config` must describe the board's actual register windows.
pub unsafe fn pcie_hardware_init<M: IoRegionMapper>(
    mapper: &mut M,
    config: &Config,
) -> Result<(PcieMmio, Leds), Errno> {
    let base = mapper.open_io_region(
        config.get_usize(ConfigKey::RegionBase),
        config.get_usize(ConfigKey::RegionLength),
    )?;
    let leds = initialise_leds(mapper, config)?;
    Ok((PcieMmio::new(base, config), leds))
}

unsafe fn initialise_leds<M: IoRegionMapper>(mapper: &mut M, config: &Config) -> Result<Leds, Errno> {
    let base = mapper.open_io_region(
        config.get_usize(ConfigKey::LedBase),
        config.get_usize(ConfigKey::LedLength),
    )?;
    Ok(Leds::new(base))
}

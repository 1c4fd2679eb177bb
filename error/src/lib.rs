//! Error codes shared by the PCIe packet core crates
#![no_std]

use enum_repr::EnumRepr;

/// Failure kinds surfaced by the packet core.
///
/// Receive is the only path with real failures ([Errno::TimedOut] and
/// [Errno::Overflow]); the rest exist for setup and configuration.
#[EnumRepr(type = "u32")]
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum Errno {
    InvalidArgument = 1,
    TimedOut = 2,
    Overflow = 3,
    DeviceError = 4,
    NotImplemented = 5,
}

impl Errno {
    /// Negative sentinel in the style of `int`-returning C entry points
    pub const fn to_negative_isize(self) -> isize {
        -(self as isize)
    }

    pub fn from_code(code: u32) -> Option<Self> {
        Self::from_repr(code)
    }

    pub fn from_result(value: isize) -> Result<usize, Self> {
        if value < 0 {
            Err(u32::try_from(value.unsigned_abs())
                .ok()
                .and_then(Self::from_code)
                .unwrap_or(Errno::DeviceError))
        } else {
            Ok(value as usize)
        }
    }
}

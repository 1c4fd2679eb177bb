//! Bit-mask helpers for register field manipulation
#![no_std]

/// Returns a mask with the low `width` bits set.
///
/// # Panics
///
/// Panics if `width` exceeds 32.
#[inline]
pub const fn u32_mask(width: u32) -> u32 {
    assert!(width <= 32);
    match 1u32.checked_shl(width) {
        Some(bit) => bit - 1,
        None => u32::MAX,
    }
}

/// Returns a mask with bits `[low, high]` (inclusive) set.
///
/// # Panics
///
/// Panics if `high < low` or `high > 31`.
#[inline]
pub const fn u32_mask_enable_bits(high: u32, low: u32) -> u32 {
    assert!(high >= low);
    assert!(high <= 31);
    u32_mask(high - low + 1) << low
}

/// Returns a mask with the low `width` bits set.
///
/// # Panics
///
/// Panics if `width` exceeds 64.
#[inline]
pub const fn u64_mask(width: u64) -> u64 {
    assert!(width <= 64);
    // Shift amount fits in u32 after the check above
    match 1u64.checked_shl(width as u32) {
        Some(bit) => bit - 1,
        None => u64::MAX,
    }
}

/// 64-bit variant of [u32_mask_enable_bits].
///
/// # Panics
///
/// Panics if `high < low` or `high > 63`.
#[inline]
pub const fn u64_mask_enable_bits(high: u64, low: u64) -> u64 {
    assert!(high >= low);
    assert!(high <= 63);
    u64_mask(high - low + 1) << low
}

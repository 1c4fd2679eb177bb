//! Architecture-specific busy-wait primitives

cfg_if! {
    if #[cfg(any(
        target_arch = "aarch64",
        target_arch = "arm",
        target_arch = "riscv32",
        target_arch = "riscv64"
    ))] {
        /// Executes a single `nop` instruction
        #[inline(always)]
        pub fn nop() {
            unsafe { core::arch::asm!("nop", options(nomem, nostack, preserves_flags)) }
        }
    } else {
        /// Executes a single spin-loop hint
        #[inline(always)]
        pub fn nop() {
            core::hint::spin_loop();
        }
    }
}

/// Busy-waits for a fixed number of iterations, independent of wall time
#[inline]
pub fn spin(iterations: usize) {
    for _ in 0..iterations {
        nop();
    }
}

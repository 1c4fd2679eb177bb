//! Hardware counter, deadlines and the post-transmit timestamp hook

/// Monotonic free-running hardware counter
pub trait TimestampSource {
    /// Returns the current counter value
    fn read_hw_counter(&self) -> u64;
}

impl<T: TimestampSource + ?Sized> TimestampSource for &T {
    fn read_hw_counter(&self) -> u64 {
        (**self).read_hw_counter()
    }
}

/// Absolute counter value after which receive polling gives up
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Deadline(u64);

impl Deadline {
    /// A deadline the counter never reaches in practice
    pub const NEVER: Self = Self(u64::MAX);

    /// Deadline at an absolute counter value
    pub const fn at(ticks: u64) -> Self {
        Self(ticks)
    }

    /// Deadline `ticks` counter increments from now
    pub fn after<T: TimestampSource + ?Sized>(source: &T, ticks: u64) -> Self {
        Self(source.read_hw_counter().saturating_add(ticks))
    }

    /// Returns the absolute counter value
    pub const fn ticks(self) -> u64 {
        self.0
    }

    /// Samples `source` once and checks it against the deadline
    #[inline]
    pub fn has_passed<T: TimestampSource + ?Sized>(self, source: &T) -> bool {
        source.read_hw_counter() >= self.0
    }
}

/// Diagnostic hook run after every [crate::PcieCore::send_tlp_unaligned] burst
pub trait RecordTime {
    /// Called with the counter value sampled once the burst is released
    fn record_time(&mut self, now: u64);
}

impl RecordTime for () {
    fn record_time(&mut self, _now: u64) {}
}

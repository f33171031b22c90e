//! Machine-cycle counter.

/// A count of machine cycles.
///
/// One machine cycle is one memory access slot: four ticks of the 4.19 MHz
/// crystal on the DMG. Nothing schedules against this yet; it only counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Cycles(pub u64);

impl Cycles {
    pub const ZERO: Self = Self(0);

    /// Crystal ticks per machine cycle.
    pub const CLOCKS_PER_CYCLE: u64 = 4;

    #[must_use]
    pub const fn new(count: u64) -> Self {
        Self(count)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// The same duration in crystal ticks (T-states).
    #[must_use]
    pub const fn clocks(self) -> u64 {
        self.0 * Self::CLOCKS_PER_CYCLE
    }
}

impl core::ops::Add for Cycles {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl core::ops::AddAssign for Cycles {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl core::ops::Sub for Cycles {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0.saturating_sub(rhs.0))
    }
}

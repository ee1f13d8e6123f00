//! Tick time primitives for geosync
//!
//! The tick loop accounts time in seconds: cooldowns, localization budgets
//! and display delays are all second-resolution. `Seconds` is a thin f64
//! newtype so timers cannot be confused with accuracy values.

use std::ops::{Add, AddAssign, Sub};

/// A span of tick time, in seconds.
#[derive(Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Seconds(pub f64);

impl Seconds {
    pub const ZERO: Seconds = Seconds(0.0);

    #[inline]
    pub fn new(secs: f64) -> Self {
        Seconds(secs)
    }

    #[inline]
    pub fn as_f64(self) -> f64 {
        self.0
    }

    /// Subtraction clamped at zero; timers never go negative.
    #[inline]
    pub fn saturating_sub(self, rhs: Seconds) -> Seconds {
        Seconds((self.0 - rhs.0).max(0.0))
    }

    #[inline]
    pub fn is_zero(self) -> bool {
        self.0 <= 0.0
    }
}

impl Add for Seconds {
    type Output = Seconds;

    #[inline]
    fn add(self, rhs: Seconds) -> Seconds {
        Seconds(self.0 + rhs.0)
    }
}

impl AddAssign for Seconds {
    #[inline]
    fn add_assign(&mut self, rhs: Seconds) {
        self.0 += rhs.0;
    }
}

impl Sub for Seconds {
    type Output = Seconds;

    #[inline]
    fn sub(self, rhs: Seconds) -> Seconds {
        Seconds(self.0 - rhs.0)
    }
}

impl std::fmt::Debug for Seconds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.3}s", self.0)
    }
}

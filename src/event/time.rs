//! Position within one cycle, kept as an exact fraction.
//!
//! Slot boundaries are always `slot / slots_per_cycle`, so storing the
//! numerator and denominator avoids drift when events are compared or laid
//! out on the integer voxel axis. Conversion to `f64` happens only at the
//! output boundary.

use std::cmp::Ordering;
use std::fmt;

use serde::{Serialize, Serializer};

/// A reduced fraction of one cycle.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct CycleTime {
    num: u64,
    den: u64,
}

impl CycleTime {
    /// The start of a cycle.
    pub const ZERO: CycleTime = CycleTime { num: 0, den: 1 };

    /// One whole cycle.
    pub const ONE: CycleTime = CycleTime { num: 1, den: 1 };

    /// Create a reduced fraction. A zero denominator is treated as 1.
    pub fn new(num: u64, den: u64) -> Self {
        let den = den.max(1);
        let g = gcd(num, den);
        Self {
            num: num / g,
            den: den / g,
        }
    }

    /// The start of `slot` on a grid of `slots` equal-width slots.
    pub fn from_slot(slot: usize, slots: usize) -> Self {
        Self::new(slot as u64, slots as u64)
    }

    /// The width of one slot on a grid of `slots` equal-width slots.
    pub fn slot_width(slots: usize) -> Self {
        Self::new(1, slots as u64)
    }

    pub fn numerator(self) -> u64 {
        self.num
    }

    pub fn denominator(self) -> u64 {
        self.den
    }

    pub fn as_f64(self) -> f64 {
        self.num as f64 / self.den as f64
    }

    /// `floor(self * blocks)`, computed without floating point.
    pub fn floor_scaled(self, blocks: u64) -> u64 {
        (self.num * blocks) / self.den
    }
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let t = b;
        b = a % b;
        a = t;
    }
    a.max(1)
}

impl Ord for CycleTime {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.num as u128 * other.den as u128).cmp(&(other.num as u128 * self.den as u128))
    }
}

impl PartialOrd for CycleTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for CycleTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.den == 1 {
            write!(f, "{}", self.num)
        } else {
            write!(f, "{}/{}", self.num, self.den)
        }
    }
}

impl Serialize for CycleTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_f64())
    }
}

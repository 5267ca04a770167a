use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Parse-time coercion switches.
    ///
    /// Out-of-range numbers are rejected unless one of the `APPLY_*`
    /// flags says how to bring them back into range.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct Coercion: u16 {
        /// Replace an out-of-range number with the nearest bound.
        const APPLY_CLAMP         = 1 << 0;
        /// Wrap an out-of-range integer into the range and drop fractions toward zero.
        const APPLY_TRUNCATE      = 1 << 1;
        /// Round fractions toward zero.
        const APPLY_ROUND_ZERO    = 1 << 2;
        /// Round fractions toward negative infinity.
        const APPLY_ROUND_FLOOR   = 1 << 3;
        /// Round fractions toward positive infinity.
        const APPLY_ROUND_CEILING = 1 << 4;
        /// Round fractions to the nearest integer, halves away from zero.
        const APPLY_ROUND_NEAREST = 1 << 5;
        /// Accept `true`/`false` as `1`/`0` in numeric slots.
        const BOOLEAN_TO_NUMBER   = 1 << 6;
        /// Parse numeric text in numeric slots.
        const STRING_TO_NUMBER    = 1 << 7;
        /// Accept numbers in string slots, using their shortest text form.
        const NUMBER_TO_STRING    = 1 << 8;
        /// Accept `"true"`/`"false"` in boolean slots.
        const STRING_TO_BOOLEAN   = 1 << 9;
    }
}

impl Coercion {
    /// Returns the rounding mode, if any rounding flag is set.
    ///
    /// When several are set the first in declaration order wins.
    pub fn rounding(self) -> Option<Rounding> {
        if self.contains(Coercion::APPLY_ROUND_ZERO) {
            Some(Rounding::Zero)
        } else if self.contains(Coercion::APPLY_ROUND_FLOOR) {
            Some(Rounding::Floor)
        } else if self.contains(Coercion::APPLY_ROUND_CEILING) {
            Some(Rounding::Ceiling)
        } else if self.contains(Coercion::APPLY_ROUND_NEAREST) {
            Some(Rounding::Nearest)
        } else {
            None
        }
    }
}

/// How a fractional number becomes integral.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Rounding {
    Zero,
    Floor,
    Ceiling,
    Nearest,
}

impl Rounding {
    #[inline]
    pub fn apply(self, value: f64) -> f64 {
        match self {
            Rounding::Zero => value.trunc(),
            Rounding::Floor => value.floor(),
            Rounding::Ceiling => value.ceil(),
            Rounding::Nearest => value.round(),
        }
    }
}

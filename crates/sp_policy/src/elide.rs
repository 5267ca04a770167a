use bitflags::bitflags;
use serde::{Deserialize, Serialize};

// -----------------------------------------------------------------------------
// Conditions

bitflags! {
    /// Conditions a value can be in when it is serialized or parsed.
    ///
    /// An [`ElisionMask`] attaches one of two rules to each condition:
    /// omit the key, or write `null` instead of the value.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct Elide: u16 {
        /// The value is null.
        const NULL            = 1 << 0;
        /// A string with no characters.
        const EMPTY_STRING    = 1 << 1;
        /// A string made of whitespace only.
        const BLANK_STRING    = 1 << 2;
        /// An integer equal to zero.
        const ZERO_INTEGRAL   = 1 << 3;
        /// A float equal to zero (either sign).
        const ZERO_DECIMAL    = 1 << 4;
        /// A float equal to positive or negative infinity.
        const INFINITE        = 1 << 5;
        /// A float that is NaN.
        const NAN             = 1 << 6;
        /// An array or ordered collection without elements.
        const EMPTY_ARRAY     = 1 << 7;
        /// A map without entries, or an object whose properties are all omitted.
        const EMPTY_OBJECT    = 1 << 8;
        /// A container already on the serializer's descent path.
        const CYCLIC_OBJECT   = 1 << 9;
        /// An enum constant equal to the descriptor's default constant.
        const DEFAULT_ENUM    = 1 << 10;
        /// An enum constant missing from the descriptor's name table.
        const OUT_ENUM        = 1 << 11;
        /// A value equal to the descriptor's sentinel.
        const SPECIFIC        = 1 << 12;
        /// The boolean `false`.
        const FALSE           = 1 << 13;
    }
}

/// Distance between the omit sub-mask and the null sub-mask of an [`ElisionMask`].
pub const NULL_SHIFT: u32 = 16;

/// Order in which held conditions are tested; the first configured one wins.
///
/// Conditions of different value kinds never hold together, so one list
/// yields every per-kind order: zero, infinite, NaN for floats; empty,
/// blank for strings; default, out-of-table for enums.
const PRIORITY: [Elide; 14] = [
    Elide::NULL,
    Elide::SPECIFIC,
    Elide::CYCLIC_OBJECT,
    Elide::ZERO_INTEGRAL,
    Elide::ZERO_DECIMAL,
    Elide::INFINITE,
    Elide::NAN,
    Elide::EMPTY_STRING,
    Elide::BLANK_STRING,
    Elide::FALSE,
    Elide::EMPTY_ARRAY,
    Elide::EMPTY_OBJECT,
    Elide::DEFAULT_ENUM,
    Elide::OUT_ENUM,
];

// -----------------------------------------------------------------------------
// Elision

/// The decision for a single value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Elision {
    /// Write the value as is.
    Emit,
    /// Drop the value together with its key.
    Omit,
    /// Write `null` in place of the value.
    Null,
}

impl Elision {
    #[inline]
    pub const fn is_emit(self) -> bool {
        matches!(self, Elision::Emit)
    }
}

// -----------------------------------------------------------------------------
// ElisionMask

/// Two sub-masks of [`Elide`] flags packed in one `u32`.
///
/// The low half selects "omit", the half above [`NULL_SHIFT`] selects
/// "emit null". When a condition is present in both halves, omit wins.
///
/// # Examples
///
/// ```
/// use sp_policy::{Elide, Elision, ElisionMask};
///
/// let mask = ElisionMask::new()
///     .omit(Elide::ZERO_DECIMAL | Elide::INFINITE)
///     .null(Elide::NAN);
///
/// assert_eq!(mask.evaluate(Elide::INFINITE), Elision::Omit);
/// assert_eq!(mask.evaluate(Elide::NAN), Elision::Null);
/// assert_eq!(mask.evaluate(Elide::EMPTY_STRING), Elision::Emit);
///
/// // `0.0` only holds ZERO_DECIMAL.
/// assert_eq!(mask.decide(Elide::ZERO_DECIMAL), Elision::Omit);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "MaskRepr", into = "MaskRepr")]
pub struct ElisionMask(u32);

impl ElisionMask {
    /// A mask without rules: every value is emitted.
    pub const EMIT_ALL: Self = Self(0);

    #[inline]
    pub const fn new() -> Self {
        Self::EMIT_ALL
    }

    /// Rebuilds a mask from [`bits`](Self::bits).
    #[inline]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    #[inline]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Adds "omit" rules for `flags`.
    #[inline]
    pub const fn omit(self, flags: Elide) -> Self {
        Self(self.0 | flags.bits() as u32)
    }

    /// Adds "emit null" rules for `flags`.
    #[inline]
    pub const fn null(self, flags: Elide) -> Self {
        Self(self.0 | (flags.bits() as u32) << NULL_SHIFT)
    }

    /// Removes both rules for `flags`.
    #[inline]
    pub const fn clear(self, flags: Elide) -> Self {
        let bits = flags.bits() as u32;
        Self(self.0 & !(bits | bits << NULL_SHIFT))
    }

    /// Combines the rules of both masks.
    #[inline]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    #[inline]
    pub const fn omit_flags(self) -> Elide {
        Elide::from_bits_truncate(self.0 as u16)
    }

    #[inline]
    pub const fn null_flags(self) -> Elide {
        Elide::from_bits_truncate((self.0 >> NULL_SHIFT) as u16)
    }

    /// Returns the rule configured for a single condition.
    #[inline]
    pub const fn evaluate(self, condition: Elide) -> Elision {
        let bits = condition.bits() as u32;
        if self.0 & bits != 0 {
            Elision::Omit
        } else if self.0 & (bits << NULL_SHIFT) != 0 {
            Elision::Null
        } else {
            Elision::Emit
        }
    }

    /// Decides a value from the set of conditions it holds.
    ///
    /// Conditions are tested in a fixed priority order and the first one
    /// with a rule decides. A held [`Elide::NULL`] without a rule stops the
    /// search: the null is written as is.
    pub fn decide(self, held: Elide) -> Elision {
        if held.is_empty() {
            return Elision::Emit;
        }
        for condition in PRIORITY {
            if !held.contains(condition) {
                continue;
            }
            match self.evaluate(condition) {
                Elision::Emit if condition == Elide::NULL => return Elision::Emit,
                Elision::Emit => {}
                decided => return decided,
            }
        }
        Elision::Emit
    }
}

// -----------------------------------------------------------------------------
// Serde representation

#[derive(Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
struct MaskRepr {
    omit: Elide,
    null: Elide,
}

impl From<MaskRepr> for ElisionMask {
    #[inline]
    fn from(repr: MaskRepr) -> Self {
        ElisionMask::new().omit(repr.omit).null(repr.null)
    }
}

impl From<ElisionMask> for MaskRepr {
    #[inline]
    fn from(mask: ElisionMask) -> Self {
        MaskRepr {
            omit: mask.omit_flags(),
            null: mask.null_flags(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Elide, Elision, ElisionMask, NULL_SHIFT};

    #[test]
    fn sub_masks_are_shifted() {
        let mask = ElisionMask::new().omit(Elide::NULL).null(Elide::NAN);
        assert_eq!(mask.bits(), 1 | (1 << 6) << NULL_SHIFT);
        assert_eq!(mask.omit_flags(), Elide::NULL);
        assert_eq!(mask.null_flags(), Elide::NAN);
    }

    #[test]
    fn omit_wins_over_null() {
        let mask = ElisionMask::new()
            .omit(Elide::EMPTY_STRING)
            .null(Elide::EMPTY_STRING);
        assert_eq!(mask.evaluate(Elide::EMPTY_STRING), Elision::Omit);
    }

    #[test]
    fn clear_removes_both_rules() {
        let mask = ElisionMask::new()
            .omit(Elide::FALSE)
            .null(Elide::FALSE | Elide::NAN)
            .clear(Elide::FALSE);
        assert_eq!(mask.evaluate(Elide::FALSE), Elision::Emit);
        assert_eq!(mask.evaluate(Elide::NAN), Elision::Null);
    }

    #[test]
    fn first_configured_condition_decides() {
        // "" is both empty and blank; only the blank rule is configured.
        let mask = ElisionMask::new().omit(Elide::BLANK_STRING);
        let held = Elide::EMPTY_STRING | Elide::BLANK_STRING;
        assert_eq!(mask.decide(held), Elision::Omit);

        // Both configured: empty comes first.
        let mask = mask.null(Elide::EMPTY_STRING);
        assert_eq!(mask.decide(held), Elision::Null);
    }

    #[test]
    fn unconfigured_null_is_written() {
        let mask = ElisionMask::new().omit(Elide::SPECIFIC);
        assert_eq!(mask.decide(Elide::NULL), Elision::Emit);
        assert_eq!(mask.decide(Elide::NULL | Elide::SPECIFIC), Elision::Emit);
    }

    #[test]
    fn specific_precedes_degenerate() {
        let mask = ElisionMask::new()
            .null(Elide::SPECIFIC)
            .omit(Elide::ZERO_INTEGRAL);
        assert_eq!(
            mask.decide(Elide::SPECIFIC | Elide::ZERO_INTEGRAL),
            Elision::Null
        );
    }

    #[test]
    fn serde_uses_named_sub_masks() {
        let mask = ElisionMask::new()
            .omit(Elide::EMPTY_STRING | Elide::ZERO_INTEGRAL)
            .null(Elide::NAN);
        let text = serde_json::to_string(&mask).unwrap();
        let back: ElisionMask = serde_json::from_str(&text).unwrap();
        assert_eq!(back, mask);

        let parsed: ElisionMask =
            serde_json::from_str(r#"{ "omit": "NULL | FALSE" }"#).unwrap();
        assert_eq!(parsed, ElisionMask::new().omit(Elide::NULL | Elide::FALSE));
    }
}

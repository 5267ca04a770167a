use serde::{Deserialize, Serialize};

/// An inclusive numeric range `[min, max]`.
///
/// Integer descriptors always carry the natural range of their type, so a
/// declared range is intersected with it rather than replacing it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bounds<T> {
    pub min: T,
    pub max: T,
}

impl<T> Bounds<T> {
    #[inline]
    pub const fn new(min: T, max: T) -> Self {
        Self { min, max }
    }
}

impl<T: PartialOrd + Copy> Bounds<T> {
    #[inline]
    pub fn contains(&self, value: T) -> bool {
        self.min <= value && value <= self.max
    }

    /// Moves `value` onto the nearest bound when it lies outside.
    ///
    /// Unordered values (NaN) are returned unchanged.
    #[inline]
    pub fn clamp(&self, value: T) -> T {
        if value < self.min {
            self.min
        } else if value > self.max {
            self.max
        } else {
            value
        }
    }

    /// Returns the overlap of both ranges.
    ///
    /// Disjoint ranges produce an empty range (`min > max`) that contains nothing.
    pub fn intersect(&self, other: &Self) -> Self {
        let min = if other.min > self.min { other.min } else { self.min };
        let max = if other.max < self.max { other.max } else { self.max };
        Self { min, max }
    }
}

impl Bounds<i64> {
    /// Every `i64`.
    pub const I64: Self = Self::new(i64::MIN, i64::MAX);

    /// Wraps `value` into the range by modular reduction.
    ///
    /// For the natural range of an integer type this is the usual
    /// two's-complement truncation (`300` wraps to `44` for `u8`).
    pub fn wrap(&self, value: i64) -> i64 {
        if self.min > self.max {
            return value;
        }
        let min = self.min as i128;
        let span = self.max as i128 - min + 1;
        (min + (value as i128 - min).rem_euclid(span)) as i64
    }
}

impl Bounds<f64> {
    /// Every `f64`, infinities included.
    pub const F64: Self = Self::new(f64::NEG_INFINITY, f64::INFINITY);
}

#[cfg(test)]
mod tests {
    use super::Bounds;

    #[test]
    fn clamp_and_contains() {
        let bounds = Bounds::new(0_i64, 100);
        assert!(bounds.contains(100));
        assert!(!bounds.contains(150));
        assert_eq!(bounds.clamp(150), 100);
        assert_eq!(bounds.clamp(-3), 0);
    }

    #[test]
    fn wrap_matches_integer_truncation() {
        let u8_range = Bounds::new(u8::MIN as i64, u8::MAX as i64);
        assert_eq!(u8_range.wrap(300), 300_i64 as u8 as i64);
        let i8_range = Bounds::new(i8::MIN as i64, i8::MAX as i64);
        assert_eq!(i8_range.wrap(200), 200_i64 as i8 as i64);
        assert_eq!(i8_range.wrap(-129), -129_i64 as i8 as i64);
        assert_eq!(Bounds::I64.wrap(i64::MIN), i64::MIN);
    }

    #[test]
    fn intersect_narrows() {
        let natural = Bounds::new(i8::MIN as i64, i8::MAX as i64);
        let declared = Bounds::new(0, 1000);
        assert_eq!(natural.intersect(&declared), Bounds::new(0, 127));
    }
}

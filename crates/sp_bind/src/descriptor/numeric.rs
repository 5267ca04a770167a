use core::any::Any;

use sp_policy::Bounds;

// -----------------------------------------------------------------------------
// Integers

/// An integral type of at most 64 bits.
///
/// Values travel as `i64`. The natural range of the type always applies;
/// declared bounds can only narrow it.
#[derive(Clone, Copy)]
pub struct IntegerKind {
    natural: Bounds<i64>,
    bounds: Bounds<i64>,
    read: fn(&dyn Any) -> Option<i64>,
    make: fn(i64) -> Option<Box<dyn Any>>,
}

impl IntegerKind {
    /// The kind of `T`, whose values all lie in `natural`.
    pub fn of<T>(natural: Bounds<i64>) -> Self
    where
        T: Copy + Into<i64> + TryFrom<i64> + Any,
    {
        Self {
            natural,
            bounds: natural,
            read: read_integer::<T>,
            make: make_integer::<T>,
        }
    }

    /// The effective range.
    #[inline]
    pub const fn bounds(&self) -> Bounds<i64> {
        self.bounds
    }

    /// The full range of the type.
    #[inline]
    pub const fn natural(&self) -> Bounds<i64> {
        self.natural
    }

    /// Narrows the effective range to `bounds`.
    #[inline]
    pub fn restrict(&mut self, bounds: Bounds<i64>) {
        self.bounds = self.natural.intersect(&bounds);
    }

    #[inline]
    pub fn read(&self, value: &dyn Any) -> Option<i64> {
        (self.read)(value)
    }

    /// Boxes `value` as the described type; `None` outside the natural range.
    #[inline]
    pub fn make(&self, value: i64) -> Option<Box<dyn Any>> {
        (self.make)(value)
    }
}

fn read_integer<T: Copy + Into<i64> + Any>(value: &dyn Any) -> Option<i64> {
    value.downcast_ref::<T>().map(|v| (*v).into())
}

fn make_integer<T: TryFrom<i64> + Any>(value: i64) -> Option<Box<dyn Any>> {
    T::try_from(value).ok().map(|v| Box::new(v) as Box<dyn Any>)
}

// -----------------------------------------------------------------------------
// Decimals

/// Floats convertible to and from `f64`.
pub trait Decimal: Copy + Into<f64> + Any {
    /// The finite values the type can hold.
    const NATURAL: Bounds<f64>;

    fn from_f64(value: f64) -> Self;
}

impl Decimal for f32 {
    const NATURAL: Bounds<f64> = Bounds::new(-(f32::MAX as f64), f32::MAX as f64);

    #[inline]
    fn from_f64(value: f64) -> Self {
        value as f32
    }
}

impl Decimal for f64 {
    const NATURAL: Bounds<f64> = Bounds::F64;

    #[inline]
    fn from_f64(value: f64) -> Self {
        value
    }
}

/// A floating point type.
///
/// Finite values must fit the natural range of the type, so a large `f64`
/// never silently becomes an `f32` infinity. Infinities themselves are
/// only checked against the declared bounds.
#[derive(Clone, Copy)]
pub struct DecimalKind {
    natural: Bounds<f64>,
    declared: Bounds<f64>,
    read: fn(&dyn Any) -> Option<f64>,
    make: fn(f64) -> Box<dyn Any>,
}

impl DecimalKind {
    pub fn of<T: Decimal>() -> Self {
        Self {
            natural: T::NATURAL,
            declared: Bounds::F64,
            read: read_decimal::<T>,
            make: make_decimal::<T>,
        }
    }

    /// The effective range for finite values.
    #[inline]
    pub fn bounds(&self) -> Bounds<f64> {
        self.natural.intersect(&self.declared)
    }

    #[inline]
    pub const fn natural(&self) -> Bounds<f64> {
        self.natural
    }

    /// The range `value` is checked against.
    #[inline]
    pub fn range_for(&self, value: f64) -> Bounds<f64> {
        if value.is_infinite() { self.declared } else { self.bounds() }
    }

    #[inline]
    pub fn restrict(&mut self, bounds: Bounds<f64>) {
        self.declared = Bounds::F64.intersect(&bounds);
    }

    #[inline]
    pub fn read(&self, value: &dyn Any) -> Option<f64> {
        (self.read)(value)
    }

    #[inline]
    pub fn make(&self, value: f64) -> Box<dyn Any> {
        (self.make)(value)
    }
}

fn read_decimal<T: Decimal>(value: &dyn Any) -> Option<f64> {
    value.downcast_ref::<T>().map(|v| (*v).into())
}

fn make_decimal<T: Decimal>(value: f64) -> Box<dyn Any> {
    Box::new(T::from_f64(value))
}

#[cfg(test)]
mod tests {
    use sp_policy::Bounds;

    use super::{DecimalKind, IntegerKind};

    #[test]
    fn declared_bounds_narrow_natural_ones() {
        let mut kind = IntegerKind::of::<u8>(Bounds::new(0, 255));
        kind.restrict(Bounds::new(-10, 100));
        assert_eq!(kind.bounds(), Bounds::new(0, 100));
        assert_eq!(kind.natural(), Bounds::new(0, 255));
    }

    #[test]
    fn values_round_trip_through_any() {
        let kind = IntegerKind::of::<i16>(Bounds::new(i16::MIN as i64, i16::MAX as i64));
        let boxed = kind.make(-300).unwrap();
        assert_eq!(kind.read(&*boxed), Some(-300));
        assert!(kind.make(40_000).is_none());
        assert_eq!(kind.read(&1_u8), None);

        let kind = DecimalKind::of::<f32>();
        let boxed = kind.make(0.5);
        assert_eq!(boxed.downcast_ref::<f32>(), Some(&0.5));
    }

    #[test]
    fn single_precision_range() {
        let mut kind = DecimalKind::of::<f32>();
        assert!(!kind.bounds().contains(1e39));
        assert!(kind.bounds().contains(f32::MAX as f64));
        assert!(kind.range_for(f64::INFINITY).contains(f64::INFINITY));

        kind.restrict(Bounds::new(0.0, 1e40));
        assert_eq!(kind.bounds(), Bounds::new(0.0, f32::MAX as f64));
        assert!(!kind.range_for(f64::INFINITY).contains(f64::INFINITY));
        assert!(DecimalKind::of::<f64>().bounds().contains(1e39));
    }
}

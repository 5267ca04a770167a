/// The three-way result of parsing one value.
///
/// `Null` is a legitimate JSON null; `Undefined` means "do not assign",
/// the slot keeps whatever it held before.
///
/// ```
/// use sp_bind::Outcome;
///
/// let parsed: Outcome<i32> = Some(3).into();
/// assert_eq!(parsed.map(|v| v * 2), Outcome::Value(6));
/// assert_eq!(Outcome::<i32>::from(None), Outcome::Null);
/// assert_eq!(Outcome::<i32>::Undefined.value(), None);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Outcome<T> {
    Value(T),
    Null,
    Undefined,
}

impl<T> Outcome<T> {
    #[inline]
    pub const fn is_value(&self) -> bool {
        matches!(self, Outcome::Value(_))
    }

    #[inline]
    pub const fn is_null(&self) -> bool {
        matches!(self, Outcome::Null)
    }

    #[inline]
    pub const fn is_undefined(&self) -> bool {
        matches!(self, Outcome::Undefined)
    }

    /// Returns the value, dropping the difference between null and undefined.
    #[inline]
    pub fn value(self) -> Option<T> {
        match self {
            Outcome::Value(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub const fn as_ref(&self) -> Outcome<&T> {
        match self {
            Outcome::Value(v) => Outcome::Value(v),
            Outcome::Null => Outcome::Null,
            Outcome::Undefined => Outcome::Undefined,
        }
    }

    #[inline]
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Value(v) => Outcome::Value(f(v)),
            Outcome::Null => Outcome::Null,
            Outcome::Undefined => Outcome::Undefined,
        }
    }

    #[inline]
    pub fn and_then<U>(self, f: impl FnOnce(T) -> Outcome<U>) -> Outcome<U> {
        match self {
            Outcome::Value(v) => f(v),
            Outcome::Null => Outcome::Null,
            Outcome::Undefined => Outcome::Undefined,
        }
    }
}

impl<T> From<Option<T>> for Outcome<T> {
    #[inline]
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Outcome::Value(v),
            None => Outcome::Null,
        }
    }
}

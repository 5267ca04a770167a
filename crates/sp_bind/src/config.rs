use sp_policy::{Bounds, Coercion, ElisionMask};
use sp_stream::Scalar;

use crate::{BuildStrategy, NameFormat, UsePolicy};

/// Declaration-site settings for one property.
///
/// The registry applies them to a clone of the property type's cached
/// descriptor; the cache itself never sees them. Settings that do not fit
/// the descriptor's kind are ignored, and wrappers (`Option<T>`, `Box<T>`,
/// ...) pass the whole configuration on to the wrapped type.
///
/// ```
/// use sp_bind::{FieldConfig, NameFormat};
/// use sp_policy::{Coercion, Elide, ElisionMask};
///
/// let config = FieldConfig::new()
///     .int_bounds(0, 100)
///     .coercion(Coercion::APPLY_CLAMP)
///     .serialize(ElisionMask::new().omit(Elide::ZERO_INTEGRAL))
///     .name_format(NameFormat::Snake);
///
/// assert_eq!(config.int_bounds.map(|b| b.max), Some(100));
/// ```
#[derive(Clone, Debug, Default)]
pub struct FieldConfig {
    pub int_bounds: Option<Bounds<i64>>,
    pub float_bounds: Option<Bounds<f64>>,
    pub name_format: Option<NameFormat>,
    pub serialize: Option<ElisionMask>,
    pub parse: Option<ElisionMask>,
    pub coercion: Option<Coercion>,
    pub specific: Option<Scalar>,
    pub build: Option<BuildStrategy>,
    pub use_policy: Option<UsePolicy>,
}

impl FieldConfig {
    #[inline]
    pub const fn new() -> Self {
        Self {
            int_bounds: None,
            float_bounds: None,
            name_format: None,
            serialize: None,
            parse: None,
            coercion: None,
            specific: None,
            build: None,
            use_policy: None,
        }
    }

    /// Restricts integer values to `[min, max]`.
    #[inline]
    pub fn int_bounds(mut self, min: i64, max: i64) -> Self {
        self.int_bounds = Some(Bounds::new(min, max));
        self
    }

    /// Restricts decimal values to `[min, max]`.
    #[inline]
    pub fn float_bounds(mut self, min: f64, max: f64) -> Self {
        self.float_bounds = Some(Bounds::new(min, max));
        self
    }

    #[inline]
    pub fn name_format(mut self, format: NameFormat) -> Self {
        self.name_format = Some(format);
        self
    }

    /// Replaces the call policy's serialize mask for this property.
    #[inline]
    pub fn serialize(mut self, mask: ElisionMask) -> Self {
        self.serialize = Some(mask);
        self
    }

    /// Replaces the call policy's parse mask for this property.
    #[inline]
    pub fn parse(mut self, mask: ElisionMask) -> Self {
        self.parse = Some(mask);
        self
    }

    /// Replaces the call policy's coercion flags for this property.
    #[inline]
    pub fn coercion(mut self, coercion: Coercion) -> Self {
        self.coercion = Some(coercion);
        self
    }

    /// Sets the sentinel matched by [`Elide::SPECIFIC`](sp_policy::Elide::SPECIFIC).
    #[inline]
    pub fn specific(mut self, value: impl Into<Scalar>) -> Self {
        self.specific = Some(value.into());
        self
    }

    #[inline]
    pub fn build(mut self, strategy: BuildStrategy) -> Self {
        self.build = Some(strategy);
        self
    }

    #[inline]
    pub fn use_policy(mut self, policy: UsePolicy) -> Self {
        self.use_policy = Some(policy);
        self
    }
}

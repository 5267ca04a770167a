use serde::{Deserialize, Serialize};

use crate::{Coercion, Elide, ElisionMask};

/// The complete set of conversion rules for one serialize or parse call.
///
/// `serialize` and `parse` are independent masks; `coercion` only applies
/// while parsing. Descriptors may carry their own masks, which replace the
/// call-level ones for the values they describe.
///
/// Policies are plain data and can be loaded from configuration:
///
/// ```
/// use sp_policy::{Coercion, ConversionPolicy, Elide, Elision};
///
/// let policy: ConversionPolicy = serde_json::from_str(r#"{
///     "serialize": { "omit": "EMPTY_STRING | ZERO_INTEGRAL" },
///     "coercion": "APPLY_CLAMP"
/// }"#).unwrap();
///
/// assert_eq!(policy.serialize.evaluate(Elide::EMPTY_STRING), Elision::Omit);
/// assert_eq!(policy.parse.evaluate(Elide::EMPTY_STRING), Elision::Emit);
/// assert!(policy.coercion.contains(Coercion::APPLY_CLAMP));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionPolicy {
    pub serialize: ElisionMask,
    pub parse: ElisionMask,
    pub coercion: Coercion,
}

impl ConversionPolicy {
    /// A policy that emits everything and coerces nothing.
    #[inline]
    pub const fn new() -> Self {
        Self {
            serialize: ElisionMask::EMIT_ALL,
            parse: ElisionMask::EMIT_ALL,
            coercion: Coercion::empty(),
        }
    }

    #[inline]
    pub const fn omit_on_serialize(mut self, flags: Elide) -> Self {
        self.serialize = self.serialize.omit(flags);
        self
    }

    #[inline]
    pub const fn null_on_serialize(mut self, flags: Elide) -> Self {
        self.serialize = self.serialize.null(flags);
        self
    }

    #[inline]
    pub const fn omit_on_parse(mut self, flags: Elide) -> Self {
        self.parse = self.parse.omit(flags);
        self
    }

    #[inline]
    pub const fn null_on_parse(mut self, flags: Elide) -> Self {
        self.parse = self.parse.null(flags);
        self
    }

    #[inline]
    pub const fn coerce(mut self, flags: Coercion) -> Self {
        self.coercion = self.coercion.union(flags);
        self
    }
}

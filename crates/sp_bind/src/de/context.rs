use core::fmt::Write;

use sp_policy::ConversionPolicy;

use crate::Registry;
use crate::de::frame::{Frame, Segment};

/// The parser state visible to [`BuildStrategy::with_parser`](crate::BuildStrategy::with_parser).
///
/// ```
/// use sp_bind::{Bind, BuildStrategy, Descriptor, ObjectKind, Parser, Registry};
/// use sp_stream::json::emit_value;
///
/// #[derive(Default)]
/// struct Leaf {
///     origin: String,
/// }
///
/// impl Bind for Leaf {
///     fn descriptor() -> Descriptor {
///         ObjectKind::builder::<Leaf>()
///             .build_strategy(BuildStrategy::with_parser(|ctx| {
///                 Ok(Leaf { origin: ctx.path() })
///             }))
///             .finish()
///     }
/// }
///
/// let registry = Registry::new();
/// let mut parser = Parser::<Vec<Leaf>>::new(&registry);
/// emit_value(&serde_json::json!([{}, {}]), &mut parser).unwrap();
///
/// let leaves = parser.finish().unwrap().value().unwrap();
/// assert_eq!(leaves[1].origin, "$[1]");
/// ```
pub struct BuildContext<'a> {
    registry: &'a Registry,
    policy: &'a ConversionPolicy,
    frames: &'a [Frame],
    slot: Option<Segment>,
}

impl<'a> BuildContext<'a> {
    #[inline]
    pub(crate) const fn new(
        registry: &'a Registry,
        policy: &'a ConversionPolicy,
        frames: &'a [Frame],
        slot: Option<Segment>,
    ) -> Self {
        Self {
            registry,
            policy,
            frames,
            slot,
        }
    }

    #[inline]
    pub const fn registry(&self) -> &'a Registry {
        self.registry
    }

    #[inline]
    pub const fn policy(&self) -> &'a ConversionPolicy {
        self.policy
    }

    /// Number of containers enclosing the value being built.
    #[inline]
    pub fn depth(&self) -> usize {
        self.frames.len() + usize::from(self.slot.is_some())
    }

    /// Keys and indices leading to the value being built, as `$.key[0]`.
    pub fn path(&self) -> String {
        let mut out = String::from("$");
        let lower = self.frames.iter().filter_map(Frame::segment);
        for segment in lower.chain(self.slot.clone()) {
            let _ = match segment {
                Segment::Key(key) => write!(out, ".{key}"),
                Segment::Index(index) => write!(out, "[{index}]"),
            };
        }
        out
    }
}

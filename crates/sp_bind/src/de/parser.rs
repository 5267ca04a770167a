use core::any::Any;
use core::marker::PhantomData;

use sp_policy::{ConversionPolicy, Elide, Elision};
use sp_stream::{Container, Nesting, Number, ScalarRef, StreamConsumer, StreamError};

use crate::de::context::BuildContext;
use crate::de::frame::{Building, Frame, Pending, State};
use crate::de::scalar;
use crate::descriptor::{Descriptor, Kind, ObjectKind, Used, WrapperKind, matches_specific, use_value};
use crate::error::AccessError;
use crate::{Bind, Outcome, Registry};

// -----------------------------------------------------------------------------
// Root

struct Root {
    target: Descriptor,
    /// The instance being merged into, until a container takes it.
    existing: Option<Box<dyn Any>>,
    merging: bool,
    outcome: Outcome<Box<dyn Any>>,
}

// -----------------------------------------------------------------------------
// Parser

/// Builds a `T` from the events it consumes.
///
/// Feed one complete document, then call [`finish`](Self::finish).
/// Malformed event sequences fail immediately; values that do not fit
/// their slot are skipped and logged.
///
/// # Examples
///
/// ```
/// use sp_bind::{Bind, Descriptor, FieldConfig, ObjectKind, Outcome, Parser, Registry};
/// use sp_policy::{Coercion, ConversionPolicy};
/// use sp_stream::json::emit_value;
///
/// #[derive(Default)]
/// struct Volume {
///     level: u8,
/// }
///
/// impl Bind for Volume {
///     fn descriptor() -> Descriptor {
///         ObjectKind::builder::<Volume>()
///             .field_with("level", |v| &v.level, |v| &mut v.level, FieldConfig::new().int_bounds(0, 100))
///             .constructed()
///             .finish()
///     }
/// }
///
/// let registry = Registry::new();
/// let policy = ConversionPolicy::new().coerce(Coercion::APPLY_CLAMP);
///
/// let mut parser = Parser::<Volume>::new(&registry).with_policy(policy);
/// emit_value(&serde_json::json!({ "level": 150 }), &mut parser).unwrap();
///
/// let Outcome::Value(volume) = parser.finish().unwrap() else { panic!() };
/// assert_eq!(volume.level, 100);
/// ```
pub struct Parser<'r, T> {
    registry: &'r Registry,
    policy: ConversionPolicy,
    nesting: Nesting,
    root: Root,
    frames: Vec<Frame>,
    marker: PhantomData<fn() -> T>,
}

impl<'r, T: Bind> Parser<'r, T> {
    /// A parser producing a fresh `T`.
    pub fn new(registry: &'r Registry) -> Self {
        Self::with_root(registry, None)
    }

    /// A parser updating `existing` in place.
    ///
    /// Nested objects are reused or rebuilt according to their
    /// [`UsePolicy`](crate::UsePolicy). When the document yields no value,
    /// `finish` returns `existing` unchanged.
    pub fn merge(registry: &'r Registry, existing: T) -> Self {
        Self::with_root(registry, Some(Box::new(existing)))
    }

    fn with_root(registry: &'r Registry, existing: Option<Box<dyn Any>>) -> Self {
        Self {
            registry,
            policy: ConversionPolicy::new(),
            nesting: Nesting::new(),
            root: Root {
                target: registry.resolve::<T>(None),
                merging: existing.is_some(),
                existing,
                outcome: Outcome::Undefined,
            },
            frames: Vec::new(),
            marker: PhantomData,
        }
    }

    #[inline]
    pub fn with_policy(mut self, policy: ConversionPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[inline]
    pub const fn policy(&self) -> &ConversionPolicy {
        &self.policy
    }

    /// Nesting depth of the input so far.
    #[inline]
    pub fn depth(&self) -> usize {
        self.nesting.depth()
    }

    /// Returns the parsed root value.
    ///
    /// Fails when the document is incomplete or empty.
    pub fn finish(self) -> Result<Outcome<T>, StreamError> {
        self.nesting.finish()?;
        let outcome = match self.root.outcome {
            Outcome::Value(value) => match value.downcast::<T>() {
                Ok(value) => Outcome::Value(*value),
                Err(_) => {
                    log::warn!("the root value is not a `{}`", self.root.target.type_name());
                    Outcome::Undefined
                }
            },
            Outcome::Null => Outcome::Null,
            Outcome::Undefined => Outcome::Undefined,
        };

        if !self.root.merging || outcome.is_value() {
            return Ok(outcome);
        }
        match self.root.existing.map(|existing| existing.downcast::<T>()) {
            Some(Ok(existing)) => Ok(Outcome::Value(*existing)),
            _ => Ok(outcome),
        }
    }
}

// -----------------------------------------------------------------------------
// Slots

impl<T> Parser<'_, T> {
    /// The descriptor of the slot the next value goes to; `None` drops it.
    fn slot(&self) -> Option<Descriptor> {
        match self.frames.last() {
            None => Some(self.root.target.clone()),
            Some(Frame::Skip(_)) => None,
            Some(Frame::Build(building)) => match &building.state {
                State::Sequence { element, .. } => Some(element.clone()),
                State::Bytes(_) => Some(self.registry.resolve::<u8>(None)),
                State::Map { value, .. } => Some(value.clone()),
                State::Object {
                    pending: Some(Pending::Property(_, descriptor)),
                    ..
                } => Some(descriptor.clone()),
                State::Object { .. } => None,
            },
        }
    }

    /// Splits the wrappers off a slot descriptor, outermost first.
    fn peel(&self, slot: &Descriptor) -> (Descriptor, Vec<WrapperKind>) {
        let mut wraps = Vec::new();
        let mut current = slot.clone();
        while let Kind::Wrapper(wrapper) = current.kind() {
            let wrapper = wrapper.clone();
            current = self.registry.resolve_handle(wrapper.inner(), wrapper.config());
            wraps.push(wrapper);
        }
        (current, wraps)
    }

    /// Hands a finished value to the top frame, or to the root.
    fn deliver(&mut self, outcome: Outcome<Box<dyn Any>>) {
        if self.frames.is_empty() {
            self.root.outcome = outcome;
            return;
        }
        let Some(Frame::Build(building)) = self.frames.last_mut() else {
            return;
        };

        match &mut building.state {
            State::Sequence {
                kind, items, count, ..
            } => {
                *count += 1;
                if let Outcome::Value(item) = outcome
                    && let Err(err) = kind.push(&mut **items, item)
                {
                    log::warn!("dropping an element: {err}");
                }
            }
            State::Bytes(bytes) => {
                if let Outcome::Value(byte) = outcome
                    && let Some(byte) = byte.downcast_ref::<u8>()
                {
                    bytes.push(*byte);
                }
            }
            State::Map {
                kind,
                entries,
                key,
                count,
                ..
            } => {
                *count += 1;
                if let (Some(key), Outcome::Value(value)) = (key.take(), outcome)
                    && let Err(err) = kind.insert(&mut **entries, key, value)
                {
                    log::warn!("dropping an entry: {err}");
                }
            }
            State::Object {
                kind,
                instance,
                pending,
                assigned,
                ..
            } => {
                let Some(Pending::Property(index, _)) = pending.take() else {
                    return;
                };
                let (Outcome::Value(value), Some(property)) = (outcome, kind.property(index)) else {
                    return;
                };
                match property.access().write(&mut **instance, value) {
                    Ok(()) => *assigned += 1,
                    Err(err) => log::warn!("cannot assign `{}`: {err}", property.name()),
                }
            }
        }
    }
}

/// Wraps a value back into its slot type, innermost wrapper first.
///
/// A nullable wrapper turns null into its empty value.
fn finish_through(wraps: &[WrapperKind], mut outcome: Outcome<Box<dyn Any>>) -> Outcome<Box<dyn Any>> {
    for wrapper in wraps.iter().rev() {
        outcome = match outcome {
            Outcome::Value(inner) => match wrapper.wrap(inner) {
                Ok(wrapped) => Outcome::Value(wrapped),
                Err(err) => {
                    log::warn!("cannot wrap `{}`: {err}", wrapper.inner().name());
                    Outcome::Undefined
                }
            },
            Outcome::Null => wrapper.none().map_or(Outcome::Null, Outcome::Value),
            Outcome::Undefined => Outcome::Undefined,
        };
    }
    outcome
}

/// Moves the core value out of its wrappers.
///
/// `Ok(None)` is a null found on the way. A shared wrapper fails, handing
/// back the rewrapped original so it can be put back.
fn unwrap_core(
    wraps: &[WrapperKind],
    value: Box<dyn Any>,
) -> Result<Option<Box<dyn Any>>, (Option<Box<dyn Any>>, AccessError)> {
    let mut current = value;
    for (depth, wrapper) in wraps.iter().enumerate() {
        match wrapper.unwrap(current) {
            Ok(Some(inner)) => current = inner,
            Ok(None) => return Ok(None),
            Err(back) => {
                let err = AccessError::Shared(wrapper.inner().name());
                let mut restored = back;
                for outer in wraps[..depth].iter().rev() {
                    restored = match outer.wrap(restored) {
                        Ok(wrapped) => wrapped,
                        Err(_) => return Err((None, err)),
                    };
                }
                return Err((Some(restored), err));
            }
        }
    }
    Ok(Some(current))
}

/// A temporary value of `descriptor`'s type, left in a property while
/// its current value is being merged into.
fn placeholder(
    registry: &Registry,
    descriptor: &Descriptor,
    ctx: &BuildContext<'_>,
) -> Result<Box<dyn Any>, AccessError> {
    match descriptor.kind() {
        Kind::Wrapper(wrapper) => match wrapper.none() {
            Some(none) => Ok(none),
            None => {
                let inner = registry.resolve_handle(wrapper.inner(), wrapper.config());
                wrapper.wrap(placeholder(registry, &inner, ctx)?)
            }
        },
        Kind::Sequence(kind) => Ok(kind.create()),
        Kind::Map(kind) => Ok(kind.create()),
        Kind::Object(kind) => kind.instantiate(ctx),
        _ => Err(AccessError::NotTakeable(descriptor.type_name())),
    }
}

// -----------------------------------------------------------------------------
// Containers

impl<T> Parser<'_, T> {
    fn open(&mut self, container: Container) -> Result<(), StreamError> {
        self.nesting.open(container)?;
        if let Some(Frame::Skip(depth)) = self.frames.last_mut() {
            *depth += 1;
            return Ok(());
        }

        let Some(slot) = self.slot() else {
            self.frames.push(Frame::Skip(0));
            return Ok(());
        };
        let (descriptor, wraps) = self.peel(&slot);

        let opened = match (container, descriptor.kind()) {
            (Container::Array, Kind::Sequence(kind)) => Some((
                State::Sequence {
                    kind: *kind,
                    items: kind.create(),
                    element: self.registry.resolve_handle(kind.element(), None),
                    count: 0,
                },
                false,
            )),
            (Container::Array, Kind::Bytes) => Some((State::Bytes(Vec::new()), false)),
            (Container::Object, Kind::Map(kind)) => Some((
                State::Map {
                    kind: *kind,
                    entries: kind.create(),
                    value: self.registry.resolve_handle(kind.value(), None),
                    key: None,
                    count: 0,
                },
                false,
            )),
            (Container::Object, Kind::Object(kind)) => self.enter_object(kind, &slot, &wraps),
            (_, kind) => {
                log::debug!(
                    "skipping an {} where `{}` ({}) was expected",
                    container.name(),
                    descriptor.type_name(),
                    kind.name(),
                );
                None
            }
        };

        match opened {
            Some((state, restore)) => {
                log::trace!("open `{}` at depth {}", descriptor.type_name(), self.frames.len());
                self.frames.push(Frame::Build(Building {
                    descriptor,
                    wraps,
                    restore,
                    state,
                }));
            }
            None => self.frames.push(Frame::Skip(0)),
        }
        Ok(())
    }

    /// Picks the instance an object is parsed into; the flag is set for
    /// an instance taken out of an existing value.
    fn enter_object(
        &mut self,
        kind: &ObjectKind,
        slot: &Descriptor,
        wraps: &[WrapperKind],
    ) -> Option<(State, bool)> {
        let registry = self.registry;
        let policy = &self.policy;

        let used = match self.frames.split_last_mut() {
            None => {
                let ctx = BuildContext::new(registry, policy, &[], None);
                let mut build = || kind.instantiate(&ctx);
                let existing = &mut self.root.existing;
                if existing.is_some() {
                    let mut read = || match existing.take() {
                        Some(value) => unwrap_core(wraps, value).or_else(|(back, err)| {
                            *existing = back;
                            Err(err)
                        }),
                        None => Ok(None),
                    };
                    use_value(kind.use_policy(), Some(&mut read), &mut build)
                } else {
                    use_value(kind.use_policy(), None, &mut build)
                }
            }
            Some((top, lower)) => {
                let ctx = BuildContext::new(registry, policy, lower, top.segment());
                let mut build = || kind.instantiate(&ctx);
                match top {
                    Frame::Build(Building {
                        state:
                            State::Object {
                                kind: parent,
                                instance,
                                existing: true,
                                pending: Some(Pending::Property(index, _)),
                                ..
                            },
                        ..
                    }) => match parent.property(*index) {
                        Some(property) => {
                            let access = property.access();
                            let mut read = || {
                                let taken = access.take(&mut **instance, &mut || {
                                    placeholder(registry, slot, &ctx)
                                })?;
                                unwrap_core(wraps, taken).or_else(|(back, err)| {
                                    if let Some(back) = back
                                        && let Err(lost) = access.write(&mut **instance, back)
                                    {
                                        log::warn!("cannot restore `{}`: {lost}", property.name());
                                    }
                                    Err(err)
                                })
                            };
                            use_value(kind.use_policy(), Some(&mut read), &mut build)
                        }
                        None => use_value(kind.use_policy(), None, &mut build),
                    },
                    _ => use_value(kind.use_policy(), None, &mut build),
                }
            }
        };

        let (instance, existing) = match used {
            Ok(Used::Existing(instance)) => (instance, true),
            Ok(Used::Built(instance)) => (instance, false),
            Ok(Used::Nothing) => return None,
            Err(err) => {
                log::warn!("cannot build `{}`: {err}", slot.type_name());
                return None;
            }
        };
        let state = State::Object {
            kind: kind.clone(),
            instance,
            existing,
            pending: None,
            assigned: 0,
        };
        Some((state, existing))
    }

    fn close(&mut self, container: Container) -> Result<(), StreamError> {
        self.nesting.close(container)?;
        if let Some(Frame::Skip(depth)) = self.frames.last_mut()
            && *depth > 0
        {
            *depth -= 1;
            return Ok(());
        }

        let outcome = match self.frames.pop() {
            Some(Frame::Build(building)) => self.complete(building),
            Some(Frame::Skip(_)) | None => Outcome::Undefined,
        };
        self.deliver(outcome);
        Ok(())
    }

    /// Applies the empty-container rules and rewraps the value.
    fn complete(&self, building: Building) -> Outcome<Box<dyn Any>> {
        let Building {
            descriptor,
            wraps,
            restore,
            state,
        } = building;

        let (value, held): (Box<dyn Any>, Elide) = match state {
            State::Sequence { kind, items, .. } => {
                let empty = kind.len(&*items) == 0;
                (items, empty_if(Elide::EMPTY_ARRAY, empty))
            }
            State::Bytes(bytes) => {
                let empty = bytes.is_empty();
                (Box::new(bytes::Bytes::from(bytes)), empty_if(Elide::EMPTY_ARRAY, empty))
            }
            State::Map { kind, entries, .. } => {
                let empty = kind.len(&*entries) == 0;
                (entries, empty_if(Elide::EMPTY_OBJECT, empty))
            }
            State::Object {
                instance, assigned, ..
            } => (instance, empty_if(Elide::EMPTY_OBJECT, assigned == 0)),
        };

        let outcome = if restore {
            Outcome::Value(value)
        } else {
            let mask = descriptor.parse_mask().unwrap_or(self.policy.parse);
            decided(mask.decide(held), value)
        };
        finish_through(&wraps, outcome)
    }
}

#[inline]
fn empty_if(condition: Elide, holds: bool) -> Elide {
    if holds { condition } else { Elide::empty() }
}

#[inline]
fn decided(elision: Elision, value: Box<dyn Any>) -> Outcome<Box<dyn Any>> {
    match elision {
        Elision::Emit => Outcome::Value(value),
        Elision::Null => Outcome::Null,
        Elision::Omit => Outcome::Undefined,
    }
}

// -----------------------------------------------------------------------------
// Scalars

impl<T> Parser<'_, T> {
    fn scalar(&mut self, event: &'static str, scalar: ScalarRef<'_>) -> Result<(), StreamError> {
        self.nesting.value(event)?;
        if let Some(Frame::Skip(_)) = self.frames.last() {
            return Ok(());
        }
        let outcome = match self.slot() {
            Some(slot) => self.convert(&slot, scalar),
            None => Outcome::Undefined,
        };
        self.deliver(outcome);
        Ok(())
    }

    /// Null and the sentinel are decided on the input; every other
    /// condition on the converted value.
    fn convert(&self, slot: &Descriptor, scalar: ScalarRef<'_>) -> Outcome<Box<dyn Any>> {
        let (descriptor, wraps) = self.peel(slot);
        let mask = descriptor.parse_mask().unwrap_or(self.policy.parse);

        let mut held = Elide::empty();
        held.set(Elide::NULL, scalar.is_null());
        if let Some(specific) = descriptor.specific()
            && matches_specific(specific, scalar)
        {
            held.insert(Elide::SPECIFIC);
        }

        let outcome = match mask.decide(held) {
            Elision::Null => Outcome::Null,
            Elision::Omit => Outcome::Undefined,
            Elision::Emit if scalar.is_null() => Outcome::Null,
            Elision::Emit => {
                let coercion = descriptor.coercion().unwrap_or(self.policy.coercion);
                match scalar::convert(&descriptor, scalar, coercion) {
                    Ok((value, held)) => decided(mask.decide(held), value),
                    Err(failure) => {
                        log::debug!(
                            "cannot convert a {} into `{}`: {failure}",
                            scalar.kind_name(),
                            descriptor.type_name(),
                        );
                        Outcome::Undefined
                    }
                }
            }
        };
        finish_through(&wraps, outcome)
    }
}

// -----------------------------------------------------------------------------
// StreamConsumer

impl<T> StreamConsumer for Parser<'_, T> {
    fn open_object(&mut self) -> Result<(), StreamError> {
        self.open(Container::Object)
    }

    fn close_object(&mut self) -> Result<(), StreamError> {
        self.close(Container::Object)
    }

    fn open_array(&mut self) -> Result<(), StreamError> {
        self.open(Container::Array)
    }

    fn close_array(&mut self) -> Result<(), StreamError> {
        self.close(Container::Array)
    }

    fn key(&mut self, name: &str) -> Result<(), StreamError> {
        self.nesting.key(name)?;
        let registry = self.registry;
        let Some(Frame::Build(building)) = self.frames.last_mut() else {
            return Ok(());
        };
        let type_name = building.descriptor.type_name();
        match &mut building.state {
            State::Map { key, .. } => *key = Some(name.to_owned()),
            State::Object { kind, pending, .. } => {
                let found = kind.position(name).and_then(|index| {
                    let property = kind.property(index)?;
                    let descriptor = registry.resolve_handle(property.handle(), property.config());
                    Some(Pending::Property(index, descriptor))
                });
                *pending = Some(found.unwrap_or_else(|| {
                    log::debug!("skipping unknown key `{name}` of `{type_name}`");
                    Pending::Unknown
                }));
            }
            State::Sequence { .. } | State::Bytes(_) => {}
        }
        Ok(())
    }

    fn null_value(&mut self) -> Result<(), StreamError> {
        self.scalar("null_value", ScalarRef::Null)
    }

    fn bool_value(&mut self, value: bool) -> Result<(), StreamError> {
        self.scalar("bool_value", ScalarRef::Bool(value))
    }

    fn number_value(&mut self, value: Number) -> Result<(), StreamError> {
        self.scalar("number_value", ScalarRef::Number(value))
    }

    fn string_value(&mut self, value: &str) -> Result<(), StreamError> {
        self.scalar("string_value", ScalarRef::Str(value))
    }
}

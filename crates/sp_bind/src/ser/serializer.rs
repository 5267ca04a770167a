use core::any::Any;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use bytes::Bytes;
use sp_policy::{ConversionPolicy, Elide, Elision, ElisionMask};
use sp_stream::{Number, ScalarRef, StreamConsumer, StreamError};

use crate::descriptor::{Adapter, Descriptor, Kind, MapKind, ObjectKind, Peeled, SequenceKind};
use crate::descriptor::{WrapperKind, matches_specific};
use crate::ser::trace::{Identity, Trace, identity};
use crate::{Bind, Registry};

// -----------------------------------------------------------------------------
// Reading

/// A value as seen by the elision rules.
enum Reading<'a> {
    Scalar(ScalarRef<'a>),
    Bytes(&'a [u8]),
    /// The wire name, `None` outside the table.
    Enum(Option<&'a str>),
    Container(Identity),
    Adapter(&'a dyn Adapter),
    Unreadable,
}

// -----------------------------------------------------------------------------
// Serializer

/// Writes values as stream events, guided by their descriptors.
///
/// Containers on the current descent path are remembered by identity; a
/// container met again before its own descent finished is cyclic and
/// handled by [`Elide::CYCLIC_OBJECT`]. Without a rule for it, the
/// serializer fails with [`StreamError::CyclicReference`].
///
/// # Examples
///
/// ```
/// use sp_bind::{Bind, Descriptor, ObjectKind, Registry, Serializer};
/// use sp_policy::{ConversionPolicy, Elide};
/// use sp_stream::json::ValueBuilder;
///
/// #[derive(Default)]
/// struct Counter {
///     name: String,
///     count: i32,
/// }
///
/// impl Bind for Counter {
///     fn descriptor() -> Descriptor {
///         ObjectKind::builder::<Counter>()
///             .field("name", |c| &c.name, |c| &mut c.name)
///             .field("count", |c| &c.count, |c| &mut c.count)
///             .finish()
///     }
/// }
///
/// let registry = Registry::new();
/// let policy = ConversionPolicy::new().omit_on_serialize(Elide::EMPTY_STRING | Elide::ZERO_INTEGRAL);
///
/// let mut out = ValueBuilder::default();
/// Serializer::new(&registry)
///     .with_policy(policy)
///     .serialize(&Counter::default(), &mut out)
///     .unwrap();
///
/// assert_eq!(out.finish().unwrap(), serde_json::json!({}));
/// ```
pub struct Serializer<'r> {
    registry: &'r Registry,
    policy: ConversionPolicy,
    trace: Trace,
}

impl<'r> Serializer<'r> {
    #[inline]
    pub const fn new(registry: &'r Registry) -> Self {
        Self {
            registry,
            policy: ConversionPolicy::new(),
            trace: Trace::new(),
        }
    }

    #[inline]
    pub const fn with_policy(mut self, policy: ConversionPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[inline]
    pub const fn policy(&self) -> &ConversionPolicy {
        &self.policy
    }

    /// Writes `value` as one document.
    ///
    /// An omitted root value writes nothing.
    pub fn serialize<T: Bind>(
        &mut self,
        value: &T,
        out: &mut dyn StreamConsumer,
    ) -> Result<(), StreamError> {
        let descriptor = self.registry.resolve::<T>(None);
        self.serialize_dyn(None, value, &descriptor, out)
    }

    /// Writes `key` and `value` into an object the consumer already opened.
    ///
    /// The key is only written when the value is not omitted.
    pub fn serialize_keyed<T: Bind>(
        &mut self,
        key: &str,
        value: &T,
        out: &mut dyn StreamConsumer,
    ) -> Result<(), StreamError> {
        let descriptor = self.registry.resolve::<T>(None);
        self.serialize_dyn(Some(key), value, &descriptor, out)
    }

    /// Writes a type-erased value with an explicit descriptor.
    pub fn serialize_dyn(
        &mut self,
        key: Option<&str>,
        value: &dyn Any,
        descriptor: &Descriptor,
        out: &mut dyn StreamConsumer,
    ) -> Result<(), StreamError> {
        self.trace.clear();
        let result = self.write(key, value, descriptor, out);
        self.trace.clear();
        result
    }

    #[inline]
    fn mask(&self, descriptor: &Descriptor) -> ElisionMask {
        descriptor.serialize_mask().unwrap_or(self.policy.serialize)
    }
}

// -----------------------------------------------------------------------------
// Writing

impl Serializer<'_> {
    fn write(
        &mut self,
        key: Option<&str>,
        value: &dyn Any,
        descriptor: &Descriptor,
        out: &mut dyn StreamConsumer,
    ) -> Result<(), StreamError> {
        if let Kind::Wrapper(wrapper) = descriptor.kind() {
            return self.write_wrapped(key, value, wrapper, out);
        }
        if value.type_id() != descriptor.type_id() {
            log::warn!("skipping a value that is not a `{}`", descriptor.type_name());
            return Ok(());
        }

        let mask = self.mask(descriptor);
        let (reading, held) = self.inspect(value, descriptor, mask, true);
        match mask.decide(held) {
            Elision::Omit => Ok(()),
            Elision::Null => {
                write_key(key, out)?;
                out.null_value()
            }
            Elision::Emit if held.contains(Elide::CYCLIC_OBJECT) => {
                Err(StreamError::CyclicReference {
                    type_name: descriptor.type_name(),
                    path: self.trace.render(),
                })
            }
            Elision::Emit => match reading {
                Reading::Unreadable => {
                    log::warn!("cannot read a `{}` value, skipping it", descriptor.type_name());
                    Ok(())
                }
                reading => {
                    write_key(key, out)?;
                    self.emit(value, reading, descriptor, out)
                }
            },
        }
    }

    fn write_wrapped(
        &mut self,
        key: Option<&str>,
        value: &dyn Any,
        wrapper: &WrapperKind,
        out: &mut dyn StreamConsumer,
    ) -> Result<(), StreamError> {
        let inner = self.registry.resolve_handle(wrapper.inner(), wrapper.config());
        wrapper.visit(value, &mut |peeled: Peeled<'_>| match peeled {
            Peeled::Inner(value) => self.write(key, value, &inner, &mut *out),
            Peeled::Null => self.write_null(key, &inner, &mut *out),
            Peeled::Failed(err) => {
                log::warn!("skipping `{}`: {err}", inner.type_name());
                Ok(())
            }
        })
    }

    fn write_null(
        &mut self,
        key: Option<&str>,
        descriptor: &Descriptor,
        out: &mut dyn StreamConsumer,
    ) -> Result<(), StreamError> {
        match self.mask(descriptor).decide(Elide::NULL) {
            Elision::Omit => Ok(()),
            Elision::Null | Elision::Emit => {
                write_key(key, out)?;
                out.null_value()
            }
        }
    }

    fn emit(
        &mut self,
        value: &dyn Any,
        reading: Reading<'_>,
        descriptor: &Descriptor,
        out: &mut dyn StreamConsumer,
    ) -> Result<(), StreamError> {
        match reading {
            Reading::Scalar(scalar) => out.scalar_value(scalar),
            Reading::Bytes(bytes) => out.string_value(&STANDARD.encode(bytes)),
            Reading::Enum(Some(name)) => out.string_value(name),
            Reading::Enum(None) => out.null_value(),
            Reading::Adapter(adapter) => adapter.serialize(value, out),
            Reading::Container(id) => {
                self.trace.enter(id);
                let result = match descriptor.kind() {
                    Kind::Sequence(kind) => self.write_items(value, kind, out),
                    Kind::Map(kind) => self.write_entries(value, kind, out),
                    Kind::Object(kind) => self.write_properties(value, kind, out),
                    _ => Ok(()),
                };
                self.trace.leave(&id);
                result
            }
            Reading::Unreadable => Ok(()),
        }
    }

    fn write_items(
        &mut self,
        value: &dyn Any,
        kind: &SequenceKind,
        out: &mut dyn StreamConsumer,
    ) -> Result<(), StreamError> {
        let element = self.registry.resolve_handle(kind.element(), None);
        out.open_array()?;
        for (index, item) in kind.items(value).enumerate() {
            self.trace.push_index(index);
            self.write(None, item, &element, out)?;
            self.trace.pop();
        }
        out.close_array()
    }

    fn write_entries(
        &mut self,
        value: &dyn Any,
        kind: &MapKind,
        out: &mut dyn StreamConsumer,
    ) -> Result<(), StreamError> {
        let entry = self.registry.resolve_handle(kind.value(), None);
        out.open_object()?;
        for (key, item) in kind.entries(value) {
            self.trace.push_key(key);
            self.write(Some(key), item, &entry, out)?;
            self.trace.pop();
        }
        out.close_object()
    }

    fn write_properties(
        &mut self,
        value: &dyn Any,
        kind: &ObjectKind,
        out: &mut dyn StreamConsumer,
    ) -> Result<(), StreamError> {
        out.open_object()?;
        for property in kind.properties() {
            let current = match property.access().read(value) {
                Ok(current) => current,
                Err(err) => {
                    log::warn!("skipping property `{}`: {err}", property.name());
                    continue;
                }
            };
            let descriptor = self.registry.resolve_handle(property.handle(), property.config());
            self.trace.push_key(property.name());
            self.write(Some(property.name()), current.get(), &descriptor, out)?;
            self.trace.pop();
        }
        out.close_object()
    }
}

#[inline]
fn write_key(key: Option<&str>, out: &mut dyn StreamConsumer) -> Result<(), StreamError> {
    match key {
        Some(key) => out.key(key),
        None => Ok(()),
    }
}

// -----------------------------------------------------------------------------
// Conditions

impl Serializer<'_> {
    /// Reads `value` and collects the conditions it holds.
    ///
    /// With `traced` unset the check is shallow: cycles are ignored and
    /// nested objects never count as empty.
    fn inspect<'a>(
        &self,
        value: &'a dyn Any,
        descriptor: &'a Descriptor,
        mask: ElisionMask,
        traced: bool,
    ) -> (Reading<'a>, Elide) {
        let mut held = Elide::empty();
        let reading = match descriptor.kind() {
            Kind::Bool => match value.downcast_ref::<bool>() {
                Some(&flag) => {
                    held.set(Elide::FALSE, !flag);
                    Reading::Scalar(ScalarRef::Bool(flag))
                }
                None => Reading::Unreadable,
            },
            Kind::Integer(kind) => match kind.read(value) {
                Some(number) => {
                    let number = kind.bounds().clamp(number);
                    held.set(Elide::ZERO_INTEGRAL, number == 0);
                    Reading::Scalar(ScalarRef::Number(Number::Int(number)))
                }
                None => Reading::Unreadable,
            },
            Kind::Decimal(kind) => match kind.read(value) {
                Some(number) => {
                    let number = kind.range_for(number).clamp(number);
                    held.set(Elide::ZERO_DECIMAL, number == 0.0);
                    held.set(Elide::INFINITE, number.is_infinite());
                    held.set(Elide::NAN, number.is_nan());
                    Reading::Scalar(ScalarRef::Number(Number::Float(number)))
                }
                None => Reading::Unreadable,
            },
            Kind::String => match value.downcast_ref::<String>() {
                Some(text) => {
                    held.set(Elide::EMPTY_STRING, text.is_empty());
                    held.set(Elide::BLANK_STRING, text.trim().is_empty());
                    Reading::Scalar(ScalarRef::Str(text))
                }
                None => Reading::Unreadable,
            },
            Kind::Bytes => match value.downcast_ref::<Bytes>() {
                Some(bytes) => {
                    held.set(Elide::EMPTY_ARRAY, bytes.is_empty());
                    Reading::Bytes(bytes)
                }
                None => Reading::Unreadable,
            },
            Kind::Enum(kind) => {
                let index = kind.index_of(value);
                match index {
                    None => held.insert(Elide::OUT_ENUM),
                    Some(index) => held.set(Elide::DEFAULT_ENUM, kind.default_index() == Some(index)),
                }
                Reading::Enum(index.and_then(|index| kind.name(index)))
            }
            Kind::Sequence(kind) => {
                let id = identity(value);
                if traced && self.trace.contains(&id) {
                    held.insert(Elide::CYCLIC_OBJECT);
                } else {
                    held.set(Elide::EMPTY_ARRAY, kind.len(value) == 0);
                }
                Reading::Container(id)
            }
            Kind::Map(kind) => {
                let id = identity(value);
                if traced && self.trace.contains(&id) {
                    held.insert(Elide::CYCLIC_OBJECT);
                } else {
                    held.set(Elide::EMPTY_OBJECT, kind.len(value) == 0);
                }
                Reading::Container(id)
            }
            Kind::Object(kind) => {
                let id = identity(value);
                if traced && self.trace.contains(&id) {
                    held.insert(Elide::CYCLIC_OBJECT);
                } else if traced && !mask.evaluate(Elide::EMPTY_OBJECT).is_emit() {
                    held.set(Elide::EMPTY_OBJECT, self.is_empty_object(value, kind));
                }
                Reading::Container(id)
            }
            Kind::Adapter(adapter) => {
                held = adapter.conditions(value);
                Reading::Adapter(&**adapter)
            }
            Kind::Wrapper(_) => Reading::Unreadable,
        };

        if let Some(specific) = descriptor.specific() {
            let compared = match reading {
                Reading::Scalar(scalar) => Some(scalar),
                Reading::Enum(Some(name)) => Some(ScalarRef::Str(name)),
                _ => None,
            };
            if compared.is_some_and(|scalar| matches_specific(specific, scalar)) {
                held.insert(Elide::SPECIFIC);
            }
        }

        (reading, held)
    }

    /// Whether every property of an object would be omitted.
    fn is_empty_object(&self, value: &dyn Any, kind: &ObjectKind) -> bool {
        kind.properties().iter().all(|property| match property.access().read(value) {
            Ok(current) => {
                let descriptor = self.registry.resolve_handle(property.handle(), property.config());
                self.would_omit(current.get(), &descriptor)
            }
            Err(_) => true,
        })
    }

    fn would_omit(&self, value: &dyn Any, descriptor: &Descriptor) -> bool {
        if let Kind::Wrapper(wrapper) = descriptor.kind() {
            let inner = self.registry.resolve_handle(wrapper.inner(), wrapper.config());
            let mut omit = true;
            let _ = wrapper.visit(value, &mut |peeled: Peeled<'_>| {
                omit = match peeled {
                    Peeled::Inner(value) => self.would_omit(value, &inner),
                    Peeled::Null => self.mask(&inner).decide(Elide::NULL) == Elision::Omit,
                    Peeled::Failed(_) => true,
                };
                Ok(())
            });
            return omit;
        }
        if value.type_id() != descriptor.type_id() {
            return true;
        }
        let mask = self.mask(descriptor);
        let (_, held) = self.inspect(value, descriptor, mask, false);
        mask.decide(held) == Elision::Omit
    }
}

#[cfg(test)]
mod tests {
    use core::any::Any;
    use core::net::Ipv4Addr;

    use serde_json::json;
    use sp_policy::{Coercion, CoercionFailure, ConversionPolicy, Elide};
    use sp_stream::json::{ValueBuilder, emit_value};
    use sp_stream::{Event, Number, ScalarRef, StreamConsumer, StreamError};

    use crate::testing::{Gauge, Inner, Mode, Node, Settings, node, to_events, to_json};
    use crate::{Adapter, Bind, Descriptor, FieldConfig, ObjectKind, Outcome, Parser, Registry, Serializer};

    fn linked_pair() -> (alloc::rc::Rc<core::cell::RefCell<Node>>, alloc::rc::Rc<core::cell::RefCell<Node>>) {
        let a = node("a");
        let b = node("b");
        a.borrow_mut().next = Some(b.clone());
        b.borrow_mut().next = Some(a.clone());
        (a, b)
    }

    #[test]
    fn cycles_fail_without_a_rule() {
        let (a, b) = linked_pair();
        let err = to_json(&a, ConversionPolicy::new()).unwrap_err();
        b.borrow_mut().next = None;

        let StreamError::CyclicReference { type_name, path } = err else {
            panic!("expected a cyclic reference, got {err:?}");
        };
        assert_eq!(type_name, core::any::type_name::<Node>());
        let expected = crate::cfg::debug!().then(|| String::from("$.next.next"));
        assert_eq!(path, expected);
    }

    #[test]
    fn cycle_rules() {
        let (a, b) = linked_pair();

        let omit = ConversionPolicy::new().omit_on_serialize(Elide::CYCLIC_OBJECT);
        assert_eq!(
            to_json(&a, omit).unwrap(),
            json!({ "name": "a", "next": { "name": "b" } })
        );

        let null = ConversionPolicy::new().null_on_serialize(Elide::CYCLIC_OBJECT);
        assert_eq!(
            to_json(&a, null).unwrap(),
            json!({ "name": "a", "next": { "name": "b", "next": null } })
        );

        b.borrow_mut().next = None;
    }

    #[test]
    fn shared_siblings_are_not_cycles() {
        let shared = node("s");
        let list = vec![shared.clone(), shared];
        assert_eq!(
            to_json(&list, ConversionPolicy::new()).unwrap(),
            json!([{ "name": "s", "next": null }, { "name": "s", "next": null }])
        );
    }

    #[test]
    fn degenerate_values_are_elided() {
        let policy = ConversionPolicy::new().omit_on_serialize(
            Elide::NULL
                | Elide::EMPTY_STRING
                | Elide::ZERO_INTEGRAL
                | Elide::ZERO_DECIMAL
                | Elide::FALSE
                | Elide::EMPTY_ARRAY
                | Elide::EMPTY_OBJECT
                | Elide::DEFAULT_ENUM,
        );
        let named = Settings {
            name: "desk".into(),
            ..Settings::default()
        };
        assert_eq!(to_json(&named, policy).unwrap(), json!({ "name": "desk" }));

        // Every property of `inner` is omitted, so `inner` is empty too.
        let nested = Settings {
            inner: Some(Inner::default()),
            ..named
        };
        assert_eq!(to_json(&nested, policy).unwrap(), json!({ "name": "desk" }));
    }

    #[test]
    fn first_configured_condition_decides() {
        let policy = ConversionPolicy::new()
            .null_on_serialize(Elide::EMPTY_STRING)
            .omit_on_serialize(Elide::BLANK_STRING | Elide::ZERO_INTEGRAL);

        let empty = Inner::default();
        assert_eq!(to_json(&empty, policy).unwrap(), json!({ "label": null }));

        let blank = Inner {
            level: 1,
            label: "  ".into(),
        };
        assert_eq!(to_json(&blank, policy).unwrap(), json!({ "level": 1 }));
    }

    #[test]
    fn decimal_conditions_fire_independently() {
        let gauge = Gauge {
            level: 0.0,
            peak: f64::INFINITY,
            drift: f64::NAN,
        };
        let key = |name: &str| Event::Key(name.into());

        // `0.0` holds only ZERO_DECIMAL, so the INFINITE rule leaves it alone.
        let policy = ConversionPolicy::new()
            .omit_on_serialize(Elide::INFINITE)
            .null_on_serialize(Elide::NAN);
        assert_eq!(
            to_events(&gauge, policy).unwrap(),
            [
                Event::OpenObject,
                key("level"),
                Event::Number(Number::Float(0.0)),
                key("drift"),
                Event::Null,
                Event::CloseObject,
            ]
        );

        let policy = ConversionPolicy::new()
            .omit_on_serialize(Elide::ZERO_DECIMAL)
            .null_on_serialize(Elide::INFINITE);
        let events = to_events(&gauge, policy).unwrap();
        assert!(matches!(
            events.as_slice(),
            [
                Event::OpenObject,
                Event::Key(peak),
                Event::Null,
                Event::Key(drift),
                Event::Number(Number::Float(nan)),
                Event::CloseObject,
            ] if peak == "peak" && drift == "drift" && nan.is_nan()
        ));

        let policy = ConversionPolicy::new()
            .omit_on_serialize(Elide::INFINITE | Elide::NAN)
            .null_on_serialize(Elide::ZERO_DECIMAL);
        assert_eq!(
            to_events(&gauge, policy).unwrap(),
            [Event::OpenObject, key("level"), Event::Null, Event::CloseObject]
        );
    }

    #[test]
    fn omitted_root_writes_nothing() {
        let registry = Registry::new();
        let policy = ConversionPolicy::new()
            .omit_on_serialize(Elide::EMPTY_OBJECT | Elide::ZERO_INTEGRAL | Elide::EMPTY_STRING);

        let mut out = ValueBuilder::new();
        let mut serializer = Serializer::new(&registry).with_policy(policy);
        serializer.serialize(&0_i32, &mut out).unwrap();
        serializer.serialize(&Inner::default(), &mut out).unwrap();
        assert!(out.finish().is_err());
    }

    #[derive(Default)]
    struct Dial {
        step: i32,
        code: i64,
    }

    impl Bind for Dial {
        fn descriptor() -> Descriptor {
            ObjectKind::builder::<Dial>()
                .field_with("step", |d| &d.step, |d| &mut d.step, FieldConfig::new().int_bounds(1, 10))
                .field_with(
                    "code",
                    |d| &d.code,
                    |d| &mut d.code,
                    FieldConfig::new().specific(-1_i64),
                )
                .constructed()
                .finish()
        }
    }

    #[test]
    fn bounds_apply_before_conditions() {
        let policy = ConversionPolicy::new().omit_on_serialize(Elide::ZERO_INTEGRAL);
        let dial = Dial { step: 0, code: 3 };
        assert_eq!(to_json(&dial, policy).unwrap(), json!({ "step": 1, "code": 3 }));

        let loud = Settings {
            volume: 200,
            ..Settings::default()
        };
        assert_eq!(to_json(&loud, ConversionPolicy::new()).unwrap()["volume"], json!(100));
    }

    #[test]
    fn sentinel_values() {
        let dial = Dial { step: 2, code: -1 };
        let omit = ConversionPolicy::new().omit_on_serialize(Elide::SPECIFIC);
        assert_eq!(to_json(&dial, omit).unwrap(), json!({ "step": 2 }));

        let null = ConversionPolicy::new().null_on_serialize(Elide::SPECIFIC);
        assert_eq!(to_json(&dial, null).unwrap(), json!({ "step": 2, "code": null }));
    }

    #[test]
    fn enums_outside_the_table() {
        let settings = Settings {
            mode: Mode::Off,
            ..Settings::default()
        };
        assert_eq!(to_json(&settings, ConversionPolicy::new()).unwrap()["mode"], json!(null));

        let omit = ConversionPolicy::new().omit_on_serialize(Elide::OUT_ENUM);
        assert!(to_json(&settings, omit).unwrap().get("mode").is_none());
    }

    struct Ipv4Text;

    impl Adapter for Ipv4Text {
        fn serialize(&self, value: &dyn Any, out: &mut dyn StreamConsumer) -> Result<(), StreamError> {
            match value.downcast_ref::<Ipv4Addr>() {
                Some(addr) => out.string_value(&addr.to_string()),
                None => out.null_value(),
            }
        }

        fn parse(&self, scalar: ScalarRef<'_>, _: Coercion) -> Result<Box<dyn Any>, CoercionFailure> {
            match scalar {
                ScalarRef::Str(text) => text
                    .parse::<Ipv4Addr>()
                    .map(|addr| Box::new(addr) as Box<dyn Any>)
                    .map_err(|_| CoercionFailure::mismatch("IPv4 address", "string")),
                other => Err(CoercionFailure::mismatch("IPv4 address", other.kind_name())),
            }
        }

        fn conditions(&self, value: &dyn Any) -> Elide {
            match value.downcast_ref::<Ipv4Addr>() {
                Some(addr) if addr.is_unspecified() => Elide::ZERO_INTEGRAL,
                _ => Elide::empty(),
            }
        }
    }

    #[derive(Debug, PartialEq)]
    struct Host {
        addr: Ipv4Addr,
    }

    impl Bind for Host {
        fn descriptor() -> Descriptor {
            ObjectKind::builder::<Host>()
                .opaque_field("addr", |h| &h.addr, |h| &mut h.addr)
                .build_strategy(crate::BuildStrategy::construct(|| Host {
                    addr: Ipv4Addr::UNSPECIFIED,
                }))
                .finish()
        }
    }

    #[test]
    fn adapters_convert_both_ways() {
        let registry = Registry::new();
        registry.insert(Descriptor::adapter::<Ipv4Addr>(Ipv4Text));

        let host = Host {
            addr: Ipv4Addr::new(10, 0, 0, 1),
        };
        let mut out = ValueBuilder::new();
        Serializer::new(&registry).serialize(&host, &mut out).unwrap();
        let doc = out.finish().unwrap();
        assert_eq!(doc, json!({ "addr": "10.0.0.1" }));

        let mut parser = Parser::<Host>::new(&registry);
        emit_value(&doc, &mut parser).unwrap();
        assert_eq!(parser.finish().unwrap(), Outcome::Value(host));

        let unset = Host {
            addr: Ipv4Addr::UNSPECIFIED,
        };
        let policy = ConversionPolicy::new().omit_on_serialize(Elide::ZERO_INTEGRAL);
        let mut out = ValueBuilder::new();
        Serializer::new(&registry)
            .with_policy(policy)
            .serialize(&unset, &mut out)
            .unwrap();
        assert_eq!(out.finish().unwrap(), json!({}));
    }

    #[test]
    fn keyed_values_share_an_open_object() {
        let registry = Registry::new();
        let policy = ConversionPolicy::new().omit_on_serialize(Elide::EMPTY_STRING);
        let mut serializer = Serializer::new(&registry).with_policy(policy);

        let mut out = ValueBuilder::new();
        out.open_object().unwrap();
        serializer.serialize_keyed("a", &1_i32, &mut out).unwrap();
        serializer.serialize_keyed("b", &String::new(), &mut out).unwrap();
        out.close_object().unwrap();
        assert_eq!(out.finish().unwrap(), json!({ "a": 1 }));
    }
}

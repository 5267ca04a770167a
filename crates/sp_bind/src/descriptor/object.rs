use alloc::borrow::Cow;
use alloc::sync::Arc;
use core::any::{Any, TypeId, type_name};
use core::fmt;
use core::marker::PhantomData;
use core::mem;

use sp_utils::hash::{HashMap, new_map};

use crate::de::BuildContext;
use crate::descriptor::{Bind, Descriptor, Kind, TypeHandle};
use crate::error::{AccessError, downcast_box, downcast_mut, downcast_ref};
use crate::FieldConfig;

// -----------------------------------------------------------------------------
// Property access

/// A borrowed or computed property value.
pub enum PropertyRef<'a> {
    Borrowed(&'a dyn Any),
    Owned(Box<dyn Any>),
}

impl PropertyRef<'_> {
    #[inline]
    pub fn get(&self) -> &dyn Any {
        match self {
            PropertyRef::Borrowed(value) => *value,
            PropertyRef::Owned(value) => &**value,
        }
    }
}

/// Type-erased accessor and mutator of one property.
///
/// `owner` is always a value of the object type the property was declared
/// on; any other type yields [`AccessError::TypeMismatch`].
pub trait PropertyAccess: Send + Sync + 'static {
    /// Reads the current value.
    fn read<'a>(&self, owner: &'a dyn Any) -> Result<PropertyRef<'a>, AccessError>;

    /// Moves the current value out, leaving `placeholder()` in its place.
    fn take(
        &self,
        owner: &mut dyn Any,
        placeholder: &mut dyn FnMut() -> Result<Box<dyn Any>, AccessError>,
    ) -> Result<Box<dyn Any>, AccessError>;

    /// Assigns a new value.
    fn write(&self, owner: &mut dyn Any, value: Box<dyn Any>) -> Result<(), AccessError>;
}

struct Field<T, V, G, M> {
    get: G,
    get_mut: M,
    marker: PhantomData<fn(&T) -> &V>,
}

impl<T, V, G, M> PropertyAccess for Field<T, V, G, M>
where
    T: Any,
    V: Any,
    G: Fn(&T) -> &V + Send + Sync + 'static,
    M: Fn(&mut T) -> &mut V + Send + Sync + 'static,
{
    fn read<'a>(&self, owner: &'a dyn Any) -> Result<PropertyRef<'a>, AccessError> {
        let owner = downcast_ref::<T>(owner)?;
        Ok(PropertyRef::Borrowed((self.get)(owner)))
    }

    fn take(
        &self,
        owner: &mut dyn Any,
        placeholder: &mut dyn FnMut() -> Result<Box<dyn Any>, AccessError>,
    ) -> Result<Box<dyn Any>, AccessError> {
        let placeholder = downcast_box::<V>(placeholder()?)?;
        let slot = (self.get_mut)(downcast_mut::<T>(owner)?);
        Ok(Box::new(mem::replace(slot, *placeholder)))
    }

    fn write(&self, owner: &mut dyn Any, value: Box<dyn Any>) -> Result<(), AccessError> {
        let value = downcast_box::<V>(value)?;
        *(self.get_mut)(downcast_mut::<T>(owner)?) = *value;
        Ok(())
    }
}

struct Computed<T, V, G, S> {
    get: G,
    set: S,
    marker: PhantomData<fn(&T) -> V>,
}

impl<T, V, G, S> PropertyAccess for Computed<T, V, G, S>
where
    T: Any,
    V: Any,
    G: Fn(&T) -> Result<V, AccessError> + Send + Sync + 'static,
    S: Fn(&mut T, V) -> Result<(), AccessError> + Send + Sync + 'static,
{
    fn read<'a>(&self, owner: &'a dyn Any) -> Result<PropertyRef<'a>, AccessError> {
        let value = (self.get)(downcast_ref::<T>(owner)?)?;
        Ok(PropertyRef::Owned(Box::new(value)))
    }

    fn take(
        &self,
        owner: &mut dyn Any,
        _: &mut dyn FnMut() -> Result<Box<dyn Any>, AccessError>,
    ) -> Result<Box<dyn Any>, AccessError> {
        let value = (self.get)(downcast_ref::<T>(owner)?)?;
        Ok(Box::new(value))
    }

    fn write(&self, owner: &mut dyn Any, value: Box<dyn Any>) -> Result<(), AccessError> {
        let value = downcast_box::<V>(value)?;
        (self.set)(downcast_mut::<T>(owner)?, *value)
    }
}

/// One named property of an object type.
#[derive(Clone)]
pub struct Property {
    name: Cow<'static, str>,
    handle: TypeHandle,
    config: Option<Arc<FieldConfig>>,
    access: Arc<dyn PropertyAccess>,
}

impl Property {
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared type of the property.
    #[inline]
    pub const fn handle(&self) -> &TypeHandle {
        &self.handle
    }

    /// Declaration-site settings applied when the property type is resolved.
    #[inline]
    pub fn config(&self) -> Option<&FieldConfig> {
        self.config.as_deref()
    }

    #[inline]
    pub fn access(&self) -> &dyn PropertyAccess {
        &*self.access
    }
}

impl fmt::Debug for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("name", &self.name)
            .field("type", &self.handle.name())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Build strategy

/// How an object type produces a fresh instance while parsing.
#[derive(Clone)]
pub enum BuildKind {
    /// Calls a constructor.
    Construct(Arc<dyn Fn() -> Box<dyn Any> + Send + Sync>),
    /// Calls a named factory that may fail.
    Accessor {
        name: Cow<'static, str>,
        call: Arc<dyn Fn() -> Result<Box<dyn Any>, AccessError> + Send + Sync>,
    },
    /// Calls a factory that inspects the parser state.
    WithParser(Arc<dyn Fn(&BuildContext<'_>) -> Result<Box<dyn Any>, AccessError> + Send + Sync>),
}

/// A [`BuildKind`] bound to the type it produces.
///
/// ```
/// use sp_bind::{BuildKind, BuildStrategy};
///
/// #[derive(Default)]
/// struct Session {
///     id: u32,
/// }
///
/// let strategy = BuildStrategy::accessor("Session::fresh", || Ok(Session { id: 7 }));
/// assert!(matches!(strategy.kind(), BuildKind::Accessor { .. }));
/// assert_eq!(strategy.target(), core::any::TypeId::of::<Session>());
/// ```
#[derive(Clone)]
pub struct BuildStrategy {
    target: TypeId,
    target_name: &'static str,
    kind: BuildKind,
}

impl BuildStrategy {
    /// Builds with `T::default()`.
    #[inline]
    pub fn default_of<T: Default + Any>() -> Self {
        Self::construct(T::default)
    }

    pub fn construct<T: Any>(f: impl Fn() -> T + Send + Sync + 'static) -> Self {
        let call: Arc<dyn Fn() -> Box<dyn Any> + Send + Sync> =
            Arc::new(move || Box::new(f()) as Box<dyn Any>);
        Self::of::<T>(BuildKind::Construct(call))
    }

    pub fn accessor<T: Any>(
        name: impl Into<Cow<'static, str>>,
        f: impl Fn() -> Result<T, AccessError> + Send + Sync + 'static,
    ) -> Self {
        let call: Arc<dyn Fn() -> Result<Box<dyn Any>, AccessError> + Send + Sync> =
            Arc::new(move || f().map(|v| Box::new(v) as Box<dyn Any>));
        Self::of::<T>(BuildKind::Accessor {
            name: name.into(),
            call,
        })
    }

    pub fn with_parser<T: Any>(
        f: impl Fn(&BuildContext<'_>) -> Result<T, AccessError> + Send + Sync + 'static,
    ) -> Self {
        let call: Arc<dyn Fn(&BuildContext<'_>) -> Result<Box<dyn Any>, AccessError> + Send + Sync> =
            Arc::new(move |ctx| f(ctx).map(|v| Box::new(v) as Box<dyn Any>));
        Self::of::<T>(BuildKind::WithParser(call))
    }

    #[inline]
    fn of<T: Any>(kind: BuildKind) -> Self {
        Self {
            target: TypeId::of::<T>(),
            target_name: type_name::<T>(),
            kind,
        }
    }

    /// Produces an instance of [`target`](Self::target).
    pub fn build(&self, ctx: &BuildContext<'_>) -> Result<Box<dyn Any>, AccessError> {
        match &self.kind {
            BuildKind::Construct(call) => Ok(call()),
            BuildKind::Accessor { call, .. } => call(),
            BuildKind::WithParser(call) => call(ctx),
        }
    }

    #[inline]
    pub const fn target(&self) -> TypeId {
        self.target
    }

    #[inline]
    pub const fn target_name(&self) -> &'static str {
        self.target_name
    }

    #[inline]
    pub const fn kind(&self) -> &BuildKind {
        &self.kind
    }
}

impl fmt::Debug for BuildStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match &self.kind {
            BuildKind::Construct(_) => "construct",
            BuildKind::Accessor { name, .. } => &**name,
            BuildKind::WithParser(_) => "with parser",
        };
        f.debug_struct("BuildStrategy")
            .field("target", &self.target_name)
            .field("kind", &kind)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Use policy

/// Whether parsing into an existing instance reuses the current value of
/// an object-typed property or builds a new one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum UsePolicy {
    /// Only ever reuse.
    Never,
    /// Build when the current value is null.
    #[default]
    IfNull,
    /// Build when the current value is null or cannot be read.
    IfNullOrError,
    /// Reuse a readable value; without an existing parent, do nothing.
    IfError,
    /// Always build, never read.
    Always,
}

/// The instance chosen by [`use_value`].
pub(crate) enum Used {
    Existing(Box<dyn Any>),
    Built(Box<dyn Any>),
    Nothing,
}

/// Picks the instance a nested object is parsed into.
///
/// `existing` reads the current property value of the parent instance and
/// is `None` when there is no parent instance. A read returning `Ok(None)`
/// found null.
pub(crate) fn use_value(
    policy: UsePolicy,
    existing: Option<&mut dyn FnMut() -> Result<Option<Box<dyn Any>>, AccessError>>,
    build: &mut dyn FnMut() -> Result<Box<dyn Any>, AccessError>,
) -> Result<Used, AccessError> {
    let Some(read) = existing else {
        return match policy {
            UsePolicy::Always | UsePolicy::IfNull | UsePolicy::IfNullOrError => {
                build().map(Used::Built)
            }
            UsePolicy::Never | UsePolicy::IfError => Ok(Used::Nothing),
        };
    };

    if policy == UsePolicy::Always {
        return build().map(Used::Built);
    }

    match (policy, read()) {
        (_, Ok(Some(value))) => Ok(Used::Existing(value)),
        (UsePolicy::Never, Ok(None)) => Ok(Used::Nothing),
        (UsePolicy::IfNull, Ok(None)) => build().map(Used::Built),
        (UsePolicy::Never | UsePolicy::IfNull, Err(err)) => {
            log::warn!("cannot read the current value: {err}");
            Ok(Used::Nothing)
        }
        _ => build().map(Used::Built),
    }
}

// -----------------------------------------------------------------------------
// ObjectKind

struct Shape {
    type_name: &'static str,
    properties: Vec<Property>,
    index: HashMap<String, usize>,
}

/// A type written as a JSON object of named properties.
#[derive(Clone)]
pub struct ObjectKind {
    shape: Arc<Shape>,
    build: Option<BuildStrategy>,
    use_policy: UsePolicy,
}

impl ObjectKind {
    /// Starts the property table of `T`.
    #[inline]
    pub fn builder<T: Any>() -> ObjectBuilder<T> {
        ObjectBuilder {
            properties: Vec::new(),
            index: new_map(),
            build: None,
            use_policy: UsePolicy::default(),
            marker: PhantomData,
        }
    }

    /// An object without properties or build strategy.
    pub(crate) fn empty(type_name: &'static str) -> Self {
        Self {
            shape: Arc::new(Shape {
                type_name,
                properties: Vec::new(),
                index: new_map(),
            }),
            build: None,
            use_policy: UsePolicy::default(),
        }
    }

    #[inline]
    pub fn properties(&self) -> &[Property] {
        &self.shape.properties
    }

    /// Position of the property called `name`.
    #[inline]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.shape.index.get(name).copied()
    }

    #[inline]
    pub fn property(&self, index: usize) -> Option<&Property> {
        self.shape.properties.get(index)
    }

    #[inline]
    pub const fn build_strategy(&self) -> Option<&BuildStrategy> {
        self.build.as_ref()
    }

    #[inline]
    pub const fn use_policy(&self) -> UsePolicy {
        self.use_policy
    }

    #[inline]
    pub(crate) fn set_build(&mut self, strategy: BuildStrategy) {
        self.build = Some(strategy);
    }

    #[inline]
    pub(crate) fn set_use_policy(&mut self, policy: UsePolicy) {
        self.use_policy = policy;
    }

    /// A fresh instance from the build strategy.
    pub fn instantiate(&self, ctx: &BuildContext<'_>) -> Result<Box<dyn Any>, AccessError> {
        match &self.build {
            Some(strategy) => strategy.build(ctx),
            None => Err(AccessError::NoBuildStrategy(self.shape.type_name)),
        }
    }
}

// -----------------------------------------------------------------------------
// Builder

/// Builds the descriptor of an object type from typed accessors.
///
/// ```
/// use sp_bind::{AccessError, Bind, Descriptor, FieldConfig, ObjectKind, UsePolicy};
/// use sp_policy::{Elide, ElisionMask};
///
/// #[derive(Default)]
/// struct Account {
///     owner: String,
///     balance: i64,
///     cents: i64,
/// }
///
/// impl Bind for Account {
///     fn descriptor() -> Descriptor {
///         ObjectKind::builder::<Account>()
///             .field("owner", |a| &a.owner, |a| &mut a.owner)
///             .field_with(
///                 "balance",
///                 |a| &a.balance,
///                 |a| &mut a.balance,
///                 FieldConfig::new().serialize(ElisionMask::new().omit(Elide::ZERO_INTEGRAL)),
///             )
///             .property(
///                 "euros",
///                 |a: &Account| Ok(a.cents as f64 / 100.0),
///                 |a: &mut Account, v: f64| {
///                     if v.is_finite() {
///                         a.cents = (v * 100.0).round() as i64;
///                         Ok(())
///                     } else {
///                         Err(AccessError::custom("not an amount"))
///                     }
///                 },
///             )
///             .use_policy(UsePolicy::IfNullOrError)
///             .constructed()
///             .finish()
///     }
/// }
/// ```
pub struct ObjectBuilder<T> {
    properties: Vec<Property>,
    index: HashMap<String, usize>,
    build: Option<BuildStrategy>,
    use_policy: UsePolicy,
    marker: PhantomData<fn() -> T>,
}

impl<T: Any> ObjectBuilder<T> {
    /// Adds a stored field.
    pub fn field<V, G, M>(self, name: impl Into<Cow<'static, str>>, get: G, get_mut: M) -> Self
    where
        V: Bind,
        G: Fn(&T) -> &V + Send + Sync + 'static,
        M: Fn(&mut T) -> &mut V + Send + Sync + 'static,
    {
        self.push(name.into(), TypeHandle::of::<V>(), None, field::<T, V, G, M>(get, get_mut))
    }

    /// Adds a stored field with declaration-site settings.
    pub fn field_with<V, G, M>(
        self,
        name: impl Into<Cow<'static, str>>,
        get: G,
        get_mut: M,
        config: FieldConfig,
    ) -> Self
    where
        V: Bind,
        G: Fn(&T) -> &V + Send + Sync + 'static,
        M: Fn(&mut T) -> &mut V + Send + Sync + 'static,
    {
        let config = Some(Arc::new(config));
        self.push(name.into(), TypeHandle::of::<V>(), config, field::<T, V, G, M>(get, get_mut))
    }

    /// Adds a stored field whose type has no [`Bind`] implementation.
    ///
    /// The descriptor must be registered with
    /// [`Registry::insert`](crate::Registry::insert), typically as an
    /// [`Adapter`](crate::Adapter).
    pub fn opaque_field<V, G, M>(self, name: impl Into<Cow<'static, str>>, get: G, get_mut: M) -> Self
    where
        V: Any,
        G: Fn(&T) -> &V + Send + Sync + 'static,
        M: Fn(&mut T) -> &mut V + Send + Sync + 'static,
    {
        self.push(name.into(), TypeHandle::registered::<V>(), None, field::<T, V, G, M>(get, get_mut))
    }

    /// Adds a computed property backed by a getter and a setter.
    pub fn property<V, G, S>(self, name: impl Into<Cow<'static, str>>, get: G, set: S) -> Self
    where
        V: Bind,
        G: Fn(&T) -> Result<V, AccessError> + Send + Sync + 'static,
        S: Fn(&mut T, V) -> Result<(), AccessError> + Send + Sync + 'static,
    {
        let access = Arc::new(Computed {
            get,
            set,
            marker: PhantomData::<fn(&T) -> V>,
        });
        self.push(name.into(), TypeHandle::of::<V>(), None, access)
    }

    pub fn build_strategy(mut self, strategy: BuildStrategy) -> Self {
        if strategy.target() == TypeId::of::<T>() {
            self.build = Some(strategy);
        } else {
            log::warn!(
                "ignoring a build strategy for `{}` declared on `{}`",
                strategy.target_name(),
                type_name::<T>(),
            );
        }
        self
    }

    pub fn use_policy(mut self, policy: UsePolicy) -> Self {
        self.use_policy = policy;
        self
    }

    pub fn finish(self) -> Descriptor {
        let shape = Shape {
            type_name: type_name::<T>(),
            properties: self.properties,
            index: self.index,
        };
        Descriptor::new::<T>(Kind::Object(ObjectKind {
            shape: Arc::new(shape),
            build: self.build,
            use_policy: self.use_policy,
        }))
    }

    fn push(
        mut self,
        name: Cow<'static, str>,
        handle: TypeHandle,
        config: Option<Arc<FieldConfig>>,
        access: Arc<dyn PropertyAccess>,
    ) -> Self {
        let property = Property {
            name,
            handle,
            config,
            access,
        };
        match self.index.get(property.name()) {
            Some(&at) => {
                log::warn!(
                    "`{}` declares property `{}` twice, keeping the last one",
                    type_name::<T>(),
                    property.name(),
                );
                self.properties[at] = property;
            }
            None => {
                self.index.insert(property.name().to_owned(), self.properties.len());
                self.properties.push(property);
            }
        }
        self
    }
}

impl<T: Default + Any> ObjectBuilder<T> {
    /// Builds instances with `T::default()`.
    #[inline]
    pub fn constructed(self) -> Self {
        self.build_strategy(BuildStrategy::default_of::<T>())
    }
}

fn field<T, V, G, M>(get: G, get_mut: M) -> Arc<dyn PropertyAccess>
where
    T: Any,
    V: Any,
    G: Fn(&T) -> &V + Send + Sync + 'static,
    M: Fn(&mut T) -> &mut V + Send + Sync + 'static,
{
    Arc::new(Field {
        get,
        get_mut,
        marker: PhantomData::<fn(&T) -> &V>,
    })
}

#[cfg(test)]
mod tests {
    use core::any::Any;
    use core::cell::Cell;

    use super::{AccessError, ObjectKind, UsePolicy, Used, use_value};
    use crate::descriptor::Kind;

    #[derive(Default, Debug, PartialEq)]
    struct Pair {
        left: i32,
        right: String,
    }

    fn pair_kind() -> ObjectKind {
        let descriptor = ObjectKind::builder::<Pair>()
            .field("left", |p| &p.left, |p| &mut p.left)
            .field("right", |p| &p.right, |p| &mut p.right)
            .field("left", |p| &p.left, |p| &mut p.left)
            .constructed()
            .finish();
        match descriptor.kind() {
            Kind::Object(kind) => kind.clone(),
            _ => unreachable!(),
        }
    }

    #[test]
    fn duplicate_names_keep_one_slot() {
        let kind = pair_kind();
        assert_eq!(kind.properties().len(), 2);
        assert_eq!(kind.position("right"), Some(1));
        assert_eq!(kind.position("missing"), None);
    }

    #[test]
    fn fields_read_take_and_write() {
        let kind = pair_kind();
        let mut pair = Pair {
            left: 3,
            right: "r".into(),
        };
        let right = kind.property(1).unwrap().access();

        let read = right.read(&pair).unwrap();
        assert_eq!(read.get().downcast_ref::<String>().unwrap(), "r");

        let taken = right
            .take(&mut pair, &mut || Ok(Box::new(String::from("tmp")) as Box<dyn Any>))
            .unwrap();
        assert_eq!(*taken.downcast::<String>().unwrap(), "r");
        assert_eq!(pair.right, "tmp");

        right.write(&mut pair, Box::new(String::from("new"))).unwrap();
        assert_eq!(pair.right, "new");
        assert!(right.write(&mut pair, Box::new(1_u8)).is_err());
        assert!(right.read(&1_u8).is_err());
    }

    fn run(policy: UsePolicy, current: Option<Result<Option<i32>, ()>>) -> (&'static str, bool) {
        let read_called = Cell::new(false);
        let mut read = || -> Result<Option<Box<dyn Any>>, AccessError> {
            read_called.set(true);
            match current {
                Some(Ok(Some(v))) => Ok(Some(Box::new(v))),
                Some(Ok(None)) => Ok(None),
                _ => Err(AccessError::custom("unreadable")),
            }
        };
        let mut build = || -> Result<Box<dyn Any>, AccessError> { Ok(Box::new(0_i32)) };
        let existing = match current {
            Some(_) => Some(&mut read as &mut dyn FnMut() -> Result<Option<Box<dyn Any>>, AccessError>),
            None => None,
        };
        let used = match use_value(policy, existing, &mut build).unwrap() {
            Used::Existing(_) => "existing",
            Used::Built(_) => "built",
            Used::Nothing => "nothing",
        };
        (used, read_called.get())
    }

    #[test]
    fn without_parent_instance() {
        assert_eq!(run(UsePolicy::Always, None).0, "built");
        assert_eq!(run(UsePolicy::IfNull, None).0, "built");
        assert_eq!(run(UsePolicy::IfNullOrError, None).0, "built");
        assert_eq!(run(UsePolicy::Never, None).0, "nothing");
        assert_eq!(run(UsePolicy::IfError, None).0, "nothing");
    }

    #[test]
    fn with_parent_instance() {
        let value = Some(Ok(Some(1)));
        let null = Some(Ok(None));
        let error = Some(Err(()));

        assert_eq!(run(UsePolicy::Always, value), ("built", false));

        assert_eq!(run(UsePolicy::Never, value), ("existing", true));
        assert_eq!(run(UsePolicy::Never, null), ("nothing", true));
        assert_eq!(run(UsePolicy::Never, error), ("nothing", true));

        assert_eq!(run(UsePolicy::IfNull, value), ("existing", true));
        assert_eq!(run(UsePolicy::IfNull, null), ("built", true));
        assert_eq!(run(UsePolicy::IfNull, error), ("nothing", true));

        for policy in [UsePolicy::IfNullOrError, UsePolicy::IfError] {
            assert_eq!(run(policy, value), ("existing", true));
            assert_eq!(run(policy, null), ("built", true));
            assert_eq!(run(policy, error), ("built", true));
        }
    }
}

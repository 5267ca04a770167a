use alloc::collections::BTreeMap;
use core::any::Any;
use core::hash::BuildHasher;
use std::collections::HashMap;

use crate::descriptor::{Bind, TypeHandle};
use crate::error::{AccessError, downcast_box, downcast_mut};

/// String-keyed maps written as JSON objects.
pub trait MapLike: Any {
    type Value: Bind;

    fn map_len(&self) -> usize;

    fn map_entries(&self) -> Box<dyn Iterator<Item = (&str, &dyn Any)> + '_>;

    fn map_new() -> Self;

    fn map_insert(&mut self, key: String, value: Self::Value);
}

impl<V: Bind, S: BuildHasher + Default + 'static> MapLike for HashMap<String, V, S> {
    type Value = V;

    #[inline]
    fn map_len(&self) -> usize {
        self.len()
    }

    fn map_entries(&self) -> Box<dyn Iterator<Item = (&str, &dyn Any)> + '_> {
        Box::new(self.iter().map(|(k, v)| (k.as_str(), v as &dyn Any)))
    }

    #[inline]
    fn map_new() -> Self {
        HashMap::default()
    }

    #[inline]
    fn map_insert(&mut self, key: String, value: V) {
        self.insert(key, value);
    }
}

impl<V: Bind> MapLike for BTreeMap<String, V> {
    type Value = V;

    #[inline]
    fn map_len(&self) -> usize {
        self.len()
    }

    fn map_entries(&self) -> Box<dyn Iterator<Item = (&str, &dyn Any)> + '_> {
        Box::new(self.iter().map(|(k, v)| (k.as_str(), v as &dyn Any)))
    }

    #[inline]
    fn map_new() -> Self {
        BTreeMap::new()
    }

    #[inline]
    fn map_insert(&mut self, key: String, value: V) {
        self.insert(key, value);
    }
}

/// A map from strings to values of one type.
#[derive(Clone, Copy)]
pub struct MapKind {
    value: TypeHandle,
    len: fn(&dyn Any) -> usize,
    entries: for<'a> fn(&'a dyn Any) -> Box<dyn Iterator<Item = (&'a str, &'a dyn Any)> + 'a>,
    create: fn() -> Box<dyn Any>,
    insert: fn(&mut dyn Any, String, Box<dyn Any>) -> Result<(), AccessError>,
}

impl MapKind {
    pub fn of<M: MapLike>() -> Self {
        Self {
            value: TypeHandle::of::<M::Value>(),
            len: map_len::<M>,
            entries: map_entries::<M>,
            create: map_create::<M>,
            insert: map_insert::<M>,
        }
    }

    #[inline]
    pub const fn value(&self) -> &TypeHandle {
        &self.value
    }

    #[inline]
    pub fn len(&self, map: &dyn Any) -> usize {
        (self.len)(map)
    }

    #[inline]
    pub fn entries<'a>(
        &self,
        map: &'a dyn Any,
    ) -> Box<dyn Iterator<Item = (&'a str, &'a dyn Any)> + 'a> {
        (self.entries)(map)
    }

    #[inline]
    pub fn create(&self) -> Box<dyn Any> {
        (self.create)()
    }

    #[inline]
    pub fn insert(&self, map: &mut dyn Any, key: String, value: Box<dyn Any>) -> Result<(), AccessError> {
        (self.insert)(map, key, value)
    }
}

fn map_len<M: MapLike>(map: &dyn Any) -> usize {
    map.downcast_ref::<M>().map_or(0, M::map_len)
}

fn map_entries<M: MapLike>(map: &dyn Any) -> Box<dyn Iterator<Item = (&str, &dyn Any)> + '_> {
    match map.downcast_ref::<M>() {
        Some(map) => map.map_entries(),
        None => Box::new(core::iter::empty()),
    }
}

fn map_create<M: MapLike>() -> Box<dyn Any> {
    Box::new(M::map_new())
}

fn map_insert<M: MapLike>(map: &mut dyn Any, key: String, value: Box<dyn Any>) -> Result<(), AccessError> {
    let value = downcast_box::<M::Value>(value)?;
    downcast_mut::<M>(map)?.map_insert(key, *value);
    Ok(())
}

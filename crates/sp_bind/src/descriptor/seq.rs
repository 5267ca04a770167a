use alloc::collections::{BTreeSet, VecDeque};
use core::any::Any;

use crate::descriptor::{Bind, TypeHandle};
use crate::error::{AccessError, downcast_box, downcast_mut};

// -----------------------------------------------------------------------------
// SeqLike

/// Collections written as JSON arrays.
pub trait SeqLike: Any {
    type Item: Bind;

    fn seq_len(&self) -> usize;

    fn seq_items(&self) -> Box<dyn Iterator<Item = &dyn Any> + '_>;

    fn seq_new() -> Self;

    fn seq_push(&mut self, item: Self::Item);
}

impl<T: Bind> SeqLike for Vec<T> {
    type Item = T;

    #[inline]
    fn seq_len(&self) -> usize {
        self.len()
    }

    fn seq_items(&self) -> Box<dyn Iterator<Item = &dyn Any> + '_> {
        Box::new(self.iter().map(|item| item as &dyn Any))
    }

    #[inline]
    fn seq_new() -> Self {
        Vec::new()
    }

    #[inline]
    fn seq_push(&mut self, item: T) {
        self.push(item);
    }
}

impl<T: Bind> SeqLike for VecDeque<T> {
    type Item = T;

    #[inline]
    fn seq_len(&self) -> usize {
        self.len()
    }

    fn seq_items(&self) -> Box<dyn Iterator<Item = &dyn Any> + '_> {
        Box::new(self.iter().map(|item| item as &dyn Any))
    }

    #[inline]
    fn seq_new() -> Self {
        VecDeque::new()
    }

    #[inline]
    fn seq_push(&mut self, item: T) {
        self.push_back(item);
    }
}

impl<T: Bind + Ord> SeqLike for BTreeSet<T> {
    type Item = T;

    #[inline]
    fn seq_len(&self) -> usize {
        self.len()
    }

    fn seq_items(&self) -> Box<dyn Iterator<Item = &dyn Any> + '_> {
        Box::new(self.iter().map(|item| item as &dyn Any))
    }

    #[inline]
    fn seq_new() -> Self {
        BTreeSet::new()
    }

    #[inline]
    fn seq_push(&mut self, item: T) {
        self.insert(item);
    }
}

// -----------------------------------------------------------------------------
// SequenceKind

/// Whether element order is positional (`Vec`) or owned by the collection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SequenceFlavor {
    Array,
    Collection,
}

/// A collection of elements of one type.
#[derive(Clone, Copy)]
pub struct SequenceKind {
    element: TypeHandle,
    flavor: SequenceFlavor,
    len: fn(&dyn Any) -> usize,
    items: for<'a> fn(&'a dyn Any) -> Box<dyn Iterator<Item = &'a dyn Any> + 'a>,
    create: fn() -> Box<dyn Any>,
    push: fn(&mut dyn Any, Box<dyn Any>) -> Result<(), AccessError>,
}

impl SequenceKind {
    pub fn of<S: SeqLike>(flavor: SequenceFlavor) -> Self {
        Self {
            element: TypeHandle::of::<S::Item>(),
            flavor,
            len: seq_len::<S>,
            items: seq_items::<S>,
            create: seq_create::<S>,
            push: seq_push::<S>,
        }
    }

    #[inline]
    pub const fn element(&self) -> &TypeHandle {
        &self.element
    }

    #[inline]
    pub const fn flavor(&self) -> SequenceFlavor {
        self.flavor
    }

    #[inline]
    pub fn len(&self, value: &dyn Any) -> usize {
        (self.len)(value)
    }

    #[inline]
    pub fn items<'a>(&self, value: &'a dyn Any) -> Box<dyn Iterator<Item = &'a dyn Any> + 'a> {
        (self.items)(value)
    }

    /// An empty collection.
    #[inline]
    pub fn create(&self) -> Box<dyn Any> {
        (self.create)()
    }

    /// Appends a boxed element to a collection created by [`create`](Self::create).
    #[inline]
    pub fn push(&self, collection: &mut dyn Any, item: Box<dyn Any>) -> Result<(), AccessError> {
        (self.push)(collection, item)
    }
}

fn seq_len<S: SeqLike>(value: &dyn Any) -> usize {
    value.downcast_ref::<S>().map_or(0, S::seq_len)
}

fn seq_items<S: SeqLike>(value: &dyn Any) -> Box<dyn Iterator<Item = &dyn Any> + '_> {
    match value.downcast_ref::<S>() {
        Some(seq) => seq.seq_items(),
        None => Box::new(core::iter::empty()),
    }
}

fn seq_create<S: SeqLike>() -> Box<dyn Any> {
    Box::new(S::seq_new())
}

fn seq_push<S: SeqLike>(collection: &mut dyn Any, item: Box<dyn Any>) -> Result<(), AccessError> {
    let item = downcast_box::<S::Item>(item)?;
    downcast_mut::<S>(collection)?.seq_push(*item);
    Ok(())
}

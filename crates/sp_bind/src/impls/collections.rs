use alloc::collections::{BTreeMap, BTreeSet, VecDeque};
use core::hash::BuildHasher;
use std::collections::HashMap;

use crate::descriptor::{Bind, Descriptor, Kind, MapKind, SequenceFlavor, SequenceKind};

impl<T: Bind> Bind for Vec<T> {
    fn descriptor() -> Descriptor {
        let kind = SequenceKind::of::<Self>(SequenceFlavor::Array);
        Descriptor::new::<Self>(Kind::Sequence(kind))
    }
}

impl<T: Bind> Bind for VecDeque<T> {
    fn descriptor() -> Descriptor {
        let kind = SequenceKind::of::<Self>(SequenceFlavor::Collection);
        Descriptor::new::<Self>(Kind::Sequence(kind))
    }
}

impl<T: Bind + Ord> Bind for BTreeSet<T> {
    fn descriptor() -> Descriptor {
        let kind = SequenceKind::of::<Self>(SequenceFlavor::Collection);
        Descriptor::new::<Self>(Kind::Sequence(kind))
    }
}

impl<V, S> Bind for HashMap<String, V, S>
where
    V: Bind,
    S: BuildHasher + Default + 'static,
{
    fn descriptor() -> Descriptor {
        Descriptor::new::<Self>(Kind::Map(MapKind::of::<Self>()))
    }
}

impl<V: Bind> Bind for BTreeMap<String, V> {
    fn descriptor() -> Descriptor {
        Descriptor::new::<Self>(Kind::Map(MapKind::of::<Self>()))
    }
}

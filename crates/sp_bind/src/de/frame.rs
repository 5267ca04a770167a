use core::any::Any;

use crate::descriptor::{Descriptor, MapKind, ObjectKind, SequenceKind, WrapperKind};

/// One step of the path to a value under construction.
#[derive(Clone, Debug)]
pub(crate) enum Segment {
    Key(String),
    Index(usize),
}

/// One open container of the input.
pub(crate) enum Frame {
    /// Drops a subtree; counts the containers opened inside it.
    Skip(usize),
    Build(Building),
}

/// A container value being filled.
pub(crate) struct Building {
    /// The unwrapped descriptor of the container.
    pub descriptor: Descriptor,
    /// Wrappers around it in the target slot, outermost first.
    pub wraps: Vec<WrapperKind>,
    /// Deliver the value even when the parse mask would drop it: it was
    /// moved out of an existing instance and has to go back.
    pub restore: bool,
    pub state: State,
}

pub(crate) enum State {
    Sequence {
        kind: SequenceKind,
        items: Box<dyn Any>,
        element: Descriptor,
        count: usize,
    },
    /// Bytes given as an array of integers.
    Bytes(Vec<u8>),
    Map {
        kind: MapKind,
        entries: Box<dyn Any>,
        value: Descriptor,
        key: Option<String>,
        count: usize,
    },
    Object {
        kind: ObjectKind,
        instance: Box<dyn Any>,
        /// The instance existed before parsing.
        existing: bool,
        pending: Option<Pending>,
        assigned: usize,
    },
}

/// The property named by the last key.
pub(crate) enum Pending {
    Property(usize, Descriptor),
    Unknown,
}

impl Frame {
    /// Where the next value of this frame goes.
    pub fn segment(&self) -> Option<Segment> {
        let Frame::Build(building) = self else {
            return None;
        };
        match &building.state {
            State::Sequence { count, .. } => Some(Segment::Index(*count)),
            State::Bytes(bytes) => Some(Segment::Index(bytes.len())),
            State::Map { key, .. } => key.clone().map(Segment::Key),
            State::Object {
                kind,
                pending: Some(Pending::Property(index, _)),
                ..
            } => kind
                .property(*index)
                .map(|property| Segment::Key(property.name().to_owned())),
            State::Object { .. } => None,
        }
    }
}

//! Writing values as stream events.

mod serializer;
mod trace;

pub use serializer::Serializer;

//! Building values from stream events.
//!
//! The [`Parser`] is a push-driven state machine: every container opened
//! by the stream pushes a frame holding the partial value, and closing it
//! delivers the finished value to the frame beneath. Values that cannot
//! be converted are dropped locally; only malformed streams fail.

mod context;
mod frame;
mod parser;
mod scalar;

pub use context::BuildContext;
pub use parser::Parser;

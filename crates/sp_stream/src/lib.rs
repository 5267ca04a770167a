//! The push-event protocol shared by serializers, parsers and matchers.
//!
//! A JSON document travels as a sequence of calls on a [`StreamConsumer`]:
//! `open_object`/`close_object`, `open_array`/`close_array`, `key`, and
//! one scalar call per value. Producers never buffer; every call drives
//! the consumer's state machine immediately.
//!
//! ## Menu
//!
//! - [`StreamConsumer`]: the event contract.
//! - [`Number`], [`Scalar`], [`ScalarRef`]: scalar payloads.
//! - [`StreamError`], [`StructuralError`]: the errors that abort a stream.
//! - [`Nesting`]: well-formedness bookkeeping reused by every consumer.
//! - [`Validator`]: wraps a consumer and rejects malformed sequences.
//! - [`EventBuffer`]: records events for later replay.
//! - `json` (feature): [`json::ValueBuilder`] and [`json::emit_value`]
//!   bridge to `serde_json::Value`.
#![no_std]

// -----------------------------------------------------------------------------
// Compilation config

/// Some macros used for compilation control.
pub mod cfg {
    sp_cfg::define_alias! {
        #[cfg(feature = "json")] => json,
    }
}

// -----------------------------------------------------------------------------
// no_std support

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod buffer;
mod consumer;
mod error;
mod nesting;
mod number;
mod validator;

crate::cfg::json! {
    pub mod json;
}

// -----------------------------------------------------------------------------
// Exports

pub use buffer::{Event, EventBuffer};
pub use consumer::StreamConsumer;
pub use error::{StreamError, StructuralError};
pub use nesting::{Container, Nesting};
pub use number::{Number, Scalar, ScalarRef};
pub use validator::Validator;

//! Selective projection of an event stream.
//!
//! A [`PathTree`] maps path expressions to destination keys. A
//! [`PathMatcher`] consumes a document and forwards only the subtrees
//! those paths select, renamed under their destinations. Everything else
//! is dropped as it streams by; nothing is buffered.
//!
//! # Syntax
//!
//! - Member: `.name`, or `name` at the start of the path.
//! - Quoted member: `['key with.dots']` or `["..."]`, with `\` escapes.
//! - Any member: `.*`
//! - Element: `[2]`
//! - Any element: `[*]`
//!
//! A leading `$` is optional; the empty path selects the whole document.
//!
//! # Examples
//!
//! ```
//! use serde_json::json;
//! use sp_path::{PathMatcher, PathTree};
//! use sp_stream::json::{ValueBuilder, emit_value};
//!
//! let tree = PathTree::builder()
//!     .path("a.b[*]", "values")?
//!     .path("c", "count")?
//!     .build();
//!
//! let doc = json!({ "a": { "b": [1, 2, 3], "x": true }, "c": 4 });
//!
//! let mut matcher = PathMatcher::new(&tree, ValueBuilder::new());
//! emit_value(&doc, &mut matcher)?;
//! let projected = matcher.finish()?.finish()?;
//!
//! assert_eq!(projected, json!({ "values": [1, 2, 3], "count": 4 }));
//! # Ok::<(), Box<dyn core::error::Error>>(())
//! ```
#![no_std]

// -----------------------------------------------------------------------------
// no_std support

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod expr;
mod matcher;
mod tree;

// -----------------------------------------------------------------------------
// Exports

pub use expr::{ParseError, Segment, parse};
pub use matcher::PathMatcher;
pub use tree::{Collect, Destination, PathTree, PathTreeBuilder};

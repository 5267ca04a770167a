use alloc::string::String;
use alloc::vec::Vec;

use sp_stream::{Container, Nesting, Number, ScalarRef, StreamConsumer, StreamError};

use crate::tree::{Collect, DestId, NodeId, PathTree};

// -----------------------------------------------------------------------------
// Level

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Framing {
    Wrapped,
    Embedded,
}

/// An open container outside of every matched subtree.
struct Level {
    container: Container,
    /// Tree node of this container, `None` once no path can match below it.
    node: Option<NodeId>,
    next_index: usize,
    /// Child node resolved by the last key.
    pending: Option<NodeId>,
    key: String,
}

// -----------------------------------------------------------------------------
// PathMatcher

/// A [`StreamConsumer`] that forwards the subtrees selected by a
/// [`PathTree`] to another consumer.
///
/// Unselected values are dropped as they arrive. Once a value matches, its
/// events pass through verbatim until it closes; paths below a matched
/// value are not looked at.
///
/// [`new`](Self::new) wraps the output in an object of its own, opened at
/// the first event and closed with the document. [`embedded`](Self::embedded)
/// writes only key/value pairs, for a sink that already has an object open.
///
/// Matches of a path ending in `.*` are collected into an object under
/// their original keys, and matches of any other path through an index or
/// wildcard (`list[1]`, `items[*].id`) into an array. Consecutive
/// matches of one destination share its collection; a match of another
/// destination in between closes it, and a later match opens a new one
/// under the same key.
pub struct PathMatcher<'t, C> {
    tree: &'t PathTree,
    out: C,
    framing: Framing,
    nesting: Nesting,
    levels: Vec<Level>,
    /// Depth inside the matched subtree, zero when nothing is forwarded.
    passing: usize,
    collecting: Option<DestId>,
    started: bool,
}

impl<'t, C: StreamConsumer> PathMatcher<'t, C> {
    #[inline]
    pub fn new(tree: &'t PathTree, out: C) -> Self {
        Self::with_framing(tree, out, Framing::Wrapped)
    }

    /// Writes matches straight into an object the sink already has open.
    ///
    /// ```
    /// use serde_json::json;
    /// use sp_path::{PathMatcher, PathTree};
    /// use sp_stream::StreamConsumer;
    /// use sp_stream::json::{ValueBuilder, emit_value};
    ///
    /// let tree = PathTree::builder().path("id", "id")?.build();
    ///
    /// let mut out = ValueBuilder::new();
    /// out.open_object()?;
    /// out.key("source")?;
    /// out.string_value("import")?;
    ///
    /// let mut matcher = PathMatcher::embedded(&tree, &mut out);
    /// emit_value(&json!({ "id": 7, "extra": [] }), &mut matcher)?;
    /// matcher.finish()?;
    ///
    /// out.close_object()?;
    /// assert_eq!(out.finish()?, json!({ "source": "import", "id": 7 }));
    /// # Ok::<(), Box<dyn core::error::Error>>(())
    /// ```
    #[inline]
    pub fn embedded(tree: &'t PathTree, out: C) -> Self {
        Self::with_framing(tree, out, Framing::Embedded)
    }

    fn with_framing(tree: &'t PathTree, out: C, framing: Framing) -> Self {
        Self {
            tree,
            out,
            framing,
            nesting: Nesting::new(),
            levels: Vec::new(),
            passing: 0,
            collecting: None,
            started: false,
        }
    }

    #[inline]
    pub fn get_ref(&self) -> &C {
        &self.out
    }

    /// Returns the sink without checking that the document was complete.
    #[inline]
    pub fn into_inner(self) -> C {
        self.out
    }

    /// Checks that one complete document went through and returns the sink.
    pub fn finish(self) -> Result<C, StreamError> {
        self.nesting.finish()?;
        Ok(self.out)
    }

    // -------------------------------------------------------------------------
    // Events

    fn open(&mut self, container: Container) -> Result<(), StreamError> {
        self.nesting.open(container)?;
        self.start()?;

        if self.passing > 0 {
            self.passing += 1;
            return forward_open(&mut self.out, container);
        }

        let slot = self.slot();
        if let Some(dest) = slot.and_then(|node| self.tree.destination_of(node)) {
            self.emit_start(dest)?;
            self.passing = 1;
            return forward_open(&mut self.out, container);
        }

        self.levels.push(Level {
            container,
            node: slot,
            next_index: 0,
            pending: None,
            key: String::new(),
        });
        Ok(())
    }

    fn close(&mut self, container: Container) -> Result<(), StreamError> {
        self.nesting.close(container)?;

        if self.passing > 0 {
            self.passing -= 1;
            forward_close(&mut self.out, container)?;
        } else {
            self.levels.pop();
        }
        self.end_if_complete()
    }

    fn scalar(&mut self, event: &'static str, value: ScalarRef<'_>) -> Result<(), StreamError> {
        self.nesting.value(event)?;
        self.start()?;

        if self.passing > 0 {
            return self.out.scalar_value(value);
        }

        if let Some(dest) = self.slot().and_then(|node| self.tree.destination_of(node)) {
            self.emit_start(dest)?;
            self.out.scalar_value(value)?;
        }
        self.end_if_complete()
    }

    // -------------------------------------------------------------------------
    // Matching

    /// Resolves the tree node of the value that starts now.
    fn slot(&mut self) -> Option<NodeId> {
        let tree = self.tree;
        let Some(level) = self.levels.last_mut() else {
            return Some(PathTree::ROOT);
        };
        match level.container {
            Container::Array => {
                let index = level.next_index;
                level.next_index += 1;
                level.node.and_then(|node| tree.index_child(node, index))
            }
            Container::Object => level.pending.take(),
        }
    }

    fn emit_start(&mut self, dest: DestId) -> Result<(), StreamError> {
        let destination = self.tree.destination(dest);
        log::trace!("value matched, writing to `{}`", destination.key());

        if self.collecting != Some(dest) {
            self.end_collection()?;
            self.out.key(destination.key())?;
            match destination.collect() {
                Collect::Single => return Ok(()),
                Collect::Array => self.out.open_array()?,
                Collect::Object => self.out.open_object()?,
            }
            self.collecting = Some(dest);
        }

        if destination.collect() == Collect::Object {
            let key = self.levels.last().map_or("", |level| level.key.as_str());
            self.out.key(key)?;
        }
        Ok(())
    }

    fn end_collection(&mut self) -> Result<(), StreamError> {
        let Some(dest) = self.collecting.take() else {
            return Ok(());
        };
        match self.tree.destination(dest).collect() {
            Collect::Single => Ok(()),
            Collect::Array => self.out.close_array(),
            Collect::Object => self.out.close_object(),
        }
    }

    fn start(&mut self) -> Result<(), StreamError> {
        if self.started {
            return Ok(());
        }
        self.started = true;
        match self.framing {
            Framing::Wrapped => self.out.open_object(),
            Framing::Embedded => Ok(()),
        }
    }

    fn end_if_complete(&mut self) -> Result<(), StreamError> {
        if !self.nesting.is_complete() {
            return Ok(());
        }
        self.end_collection()?;
        match self.framing {
            Framing::Wrapped => self.out.close_object(),
            Framing::Embedded => Ok(()),
        }
    }
}

#[inline]
fn forward_open<C: StreamConsumer>(out: &mut C, container: Container) -> Result<(), StreamError> {
    match container {
        Container::Object => out.open_object(),
        Container::Array => out.open_array(),
    }
}

#[inline]
fn forward_close<C: StreamConsumer>(out: &mut C, container: Container) -> Result<(), StreamError> {
    match container {
        Container::Object => out.close_object(),
        Container::Array => out.close_array(),
    }
}

// -----------------------------------------------------------------------------
// StreamConsumer

impl<C: StreamConsumer> StreamConsumer for PathMatcher<'_, C> {
    #[inline]
    fn open_object(&mut self) -> Result<(), StreamError> {
        self.open(Container::Object)
    }

    #[inline]
    fn close_object(&mut self) -> Result<(), StreamError> {
        self.close(Container::Object)
    }

    #[inline]
    fn open_array(&mut self) -> Result<(), StreamError> {
        self.open(Container::Array)
    }

    #[inline]
    fn close_array(&mut self) -> Result<(), StreamError> {
        self.close(Container::Array)
    }

    fn key(&mut self, name: &str) -> Result<(), StreamError> {
        self.nesting.key(name)?;

        if self.passing > 0 {
            return self.out.key(name);
        }

        let tree = self.tree;
        if let Some(level) = self.levels.last_mut() {
            level.pending = level.node.and_then(|node| tree.key_child(node, name));
            level.key.clear();
            level.key.push_str(name);
        }
        Ok(())
    }

    #[inline]
    fn null_value(&mut self) -> Result<(), StreamError> {
        self.scalar("null_value", ScalarRef::Null)
    }

    #[inline]
    fn bool_value(&mut self, value: bool) -> Result<(), StreamError> {
        self.scalar("bool_value", ScalarRef::Bool(value))
    }

    #[inline]
    fn number_value(&mut self, value: Number) -> Result<(), StreamError> {
        self.scalar("number_value", ScalarRef::Number(value))
    }

    #[inline]
    fn string_value(&mut self, value: &str) -> Result<(), StreamError> {
        self.scalar("string_value", ScalarRef::Str(value))
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;
    use alloc::vec;

    use serde_json::{Value, json};
    use sp_stream::json::{ValueBuilder, emit_value};
    use sp_stream::{Event, EventBuffer, Number, StreamConsumer, StreamError, StructuralError};

    use super::PathMatcher;
    use crate::PathTree;

    fn project(paths: &[(&'static str, &str)], doc: &Value) -> Value {
        let mut builder = PathTree::builder();
        for (expr, dest) in paths {
            builder = builder.path(expr, dest).unwrap();
        }
        let tree = builder.build();

        let mut matcher = PathMatcher::new(&tree, ValueBuilder::new());
        emit_value(doc, &mut matcher).unwrap();
        matcher.finish().unwrap().finish().unwrap()
    }

    #[test]
    fn selects_array_elements() {
        let doc = json!({ "a": { "b": [1, 2, 3] }, "c": 4 });
        assert_eq!(project(&[("a.b[*]", "dest")], &doc), json!({ "dest": [1, 2, 3] }));
    }

    #[test]
    fn several_paths() {
        let doc = json!({
            "user": { "name": "ann", "roles": ["admin", "dev"] },
            "meta": { "version": 3 },
        });
        let out = project(
            &[("user.name", "name"), ("meta.version", "v"), ("user.roles[1]", "second")],
            &doc,
        );
        assert_eq!(out, json!({ "name": "ann", "second": ["dev"], "v": 3 }));
    }

    #[test]
    fn any_member_collects_an_object() {
        let doc = json!({ "a": { "x": 1, "y": [true], "z": null } });
        assert_eq!(
            project(&[("a.*", "all")], &doc),
            json!({ "all": { "x": 1, "y": [true], "z": null } })
        );
    }

    #[test]
    fn exact_members_win_over_wildcards() {
        let doc = json!({ "a": { "x": 1, "y": 2, "z": 3 } });
        let out = project(&[("a.x", "x_only"), ("a.*", "rest")], &doc);
        assert_eq!(out, json!({ "x_only": 1, "rest": { "y": 2, "z": 3 } }));
    }

    #[test]
    fn single_index() {
        let doc = json!({ "list": [10, 20, 30] });
        assert_eq!(project(&[("list[1]", "picked")], &doc), json!({ "picked": [20] }));
    }

    #[test]
    fn paths_through_arrays() {
        let doc = json!({ "items": [{ "id": 1, "x": 0 }, { "id": 2 }, { "other": 3 }] });
        assert_eq!(project(&[("items[*].id", "ids")], &doc), json!({ "ids": [1, 2] }));
        assert_eq!(
            project(&[("items[1].id", "second")], &doc),
            json!({ "second": [2] })
        );
        assert_eq!(
            project(&[("items[*]['id']", "ids")], &doc),
            project(&[("items[*].id", "ids")], &doc)
        );
    }

    #[test]
    fn whole_document() {
        let doc = json!({ "a": [1, { "b": null }] });
        assert_eq!(project(&[("$", "doc")], &doc), json!({ "doc": doc }));
        assert_eq!(project(&[("", "doc")], &json!(5)), json!({ "doc": 5 }));
    }

    #[test]
    fn nothing_matches() {
        assert_eq!(project(&[("a.b", "dest")], &json!({ "a": 1 })), json!({}));
        assert_eq!(project(&[("a.b", "dest")], &json!([1, 2])), json!({}));
        assert_eq!(project(&[("a", "dest")], &json!("text")), json!({}));
    }

    #[test]
    fn interleaved_destinations_reopen_collections() {
        let tree = PathTree::builder()
            .path("[*].a", "a")
            .and_then(|b| b.path("[*].b[*]", "b"))
            .unwrap()
            .build();
        let doc = json!([{ "b": [1, 2] }, { "a": 0 }, { "b": [3] }, { "b": [4] }]);

        let mut matcher = PathMatcher::embedded(&tree, EventBuffer::new());
        emit_value(&doc, &mut matcher).unwrap();
        let events = matcher.finish().unwrap().into_events();

        let int = |v| Event::Number(Number::Int(v));
        assert_eq!(
            events,
            vec![
                Event::Key("b".to_string()),
                Event::OpenArray,
                int(1),
                int(2),
                Event::CloseArray,
                Event::Key("a".to_string()),
                Event::OpenArray,
                int(0),
                Event::CloseArray,
                Event::Key("b".to_string()),
                Event::OpenArray,
                int(3),
                int(4),
                Event::CloseArray,
            ]
        );
    }

    #[test]
    fn structural_errors_abort() {
        let tree = PathTree::builder().path("a", "a").unwrap().build();

        let mut matcher = PathMatcher::new(&tree, EventBuffer::new());
        matcher.open_object().unwrap();
        assert_eq!(
            matcher.close_array(),
            Err(StreamError::Structural(StructuralError::MismatchedClose {
                found: "close_array",
                open: "object",
            }))
        );

        let mut matcher = PathMatcher::new(&tree, EventBuffer::new());
        matcher.open_object().unwrap();
        matcher.key("a").unwrap();
        matcher.open_array().unwrap();
        assert_eq!(
            matcher.finish().err(),
            Some(StreamError::Structural(StructuralError::Unclosed(2)))
        );

        let matcher = PathMatcher::new(&tree, EventBuffer::new());
        assert_eq!(
            matcher.finish().err(),
            Some(StreamError::Structural(StructuralError::Empty))
        );
    }
}

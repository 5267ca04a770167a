use core::any::{Any, TypeId};
use core::fmt::Write;

use sp_utils::hash::{HashSet, new_set};

/// Where a value lives and what it is.
///
/// The type is part of the identity: a struct and its first field share
/// an address.
pub(crate) type Identity = (usize, TypeId);

#[inline]
pub(crate) fn identity(value: &dyn Any) -> Identity {
    ((value as *const dyn Any).cast::<()>().addr(), value.type_id())
}

#[cfg_attr(not(all(debug_assertions, feature = "debug")), allow(dead_code))]
enum Segment {
    Key(String),
    Index(usize),
}

/// Containers on the current descent path.
///
/// Keys and indices are only recorded with the `debug` feature in debug
/// builds; otherwise [`render`](Trace::render) returns `None`.
pub(crate) struct Trace {
    active: HashSet<Identity>,
    path: Vec<Segment>,
}

impl Trace {
    #[inline]
    pub const fn new() -> Self {
        Self {
            active: new_set(),
            path: Vec::new(),
        }
    }

    #[inline]
    pub fn contains(&self, identity: &Identity) -> bool {
        self.active.contains(identity)
    }

    #[inline]
    pub fn enter(&mut self, identity: Identity) {
        self.active.insert(identity);
    }

    #[inline]
    pub fn leave(&mut self, identity: &Identity) {
        self.active.remove(identity);
    }

    #[inline(always)]
    pub fn push_key(&mut self, key: &str) {
        crate::cfg::debug! {
            self.path.push(Segment::Key(key.to_owned()));
        }
        let _ = key;
    }

    #[inline(always)]
    pub fn push_index(&mut self, index: usize) {
        crate::cfg::debug! {
            self.path.push(Segment::Index(index));
        }
        let _ = index;
    }

    #[inline(always)]
    pub fn pop(&mut self) {
        crate::cfg::debug! {
            self.path.pop();
        }
    }

    /// The recorded path, as `$.key[0]`.
    pub fn render(&self) -> Option<String> {
        crate::cfg::debug! {
            if {
                let mut out = String::from("$");
                for segment in &self.path {
                    let _ = match segment {
                        Segment::Key(key) => write!(out, ".{key}"),
                        Segment::Index(index) => write!(out, "[{index}]"),
                    };
                }
                Some(out)
            } else {
                None
            }
        }
    }

    pub fn clear(&mut self) {
        self.active.clear();
        self.path.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::{Trace, identity};

    #[test]
    fn identity_includes_the_type() {
        struct Outer {
            inner: u64,
        }
        let outer = Outer { inner: 1 };
        assert_ne!(identity(&outer), identity(&outer.inner));
        assert_eq!(identity(&outer), identity(&outer));
    }

    #[test]
    fn membership_lasts_until_leave() {
        let value = vec![1_u8];
        let id = identity(&value);
        let mut trace = Trace::new();
        trace.enter(id);
        assert!(trace.contains(&id));
        trace.leave(&id);
        assert!(!trace.contains(&id));
    }

    #[test]
    fn path_follows_the_debug_feature() {
        let mut trace = Trace::new();
        trace.push_key("next");
        trace.push_index(0);
        let expected = crate::cfg::debug!().then(|| String::from("$.next[0]"));
        assert_eq!(trace.render(), expected);
    }
}

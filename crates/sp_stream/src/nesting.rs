use alloc::vec::Vec;

use crate::StructuralError;

/// The two JSON container kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Container {
    Object,
    Array,
}

impl Container {
    #[inline]
    pub const fn open_event(self) -> &'static str {
        match self {
            Container::Object => "open_object",
            Container::Array => "open_array",
        }
    }

    #[inline]
    pub const fn close_event(self) -> &'static str {
        match self {
            Container::Object => "close_object",
            Container::Array => "close_array",
        }
    }

    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            Container::Object => "object",
            Container::Array => "array",
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Level {
    container: Container,
    keyed: bool,
}

/// Well-formedness bookkeeping for one document.
///
/// Consumers call the matching method before acting on an event; an error
/// means the event must be rejected. The tracker only stores one flag per
/// open container, so it can sit in front of any state machine.
///
/// ```
/// use sp_stream::{Container, Nesting, StructuralError};
///
/// let mut nesting = Nesting::new();
/// nesting.open(Container::Object)?;
/// nesting.key("a")?;
/// assert_eq!(nesting.key("b"), Err(StructuralError::DanglingKey("b".into())));
/// nesting.value("number_value")?;
/// nesting.close(Container::Object)?;
/// assert!(nesting.finish().is_ok());
/// # Ok::<(), StructuralError>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct Nesting {
    levels: Vec<Level>,
    complete: bool,
}

impl Nesting {
    #[inline]
    pub const fn new() -> Self {
        Self {
            levels: Vec::new(),
            complete: false,
        }
    }

    /// Number of open containers.
    #[inline]
    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    /// Returns `true` once a top-level value has been completed.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Kind of the innermost open container.
    #[inline]
    pub fn current(&self) -> Option<Container> {
        self.levels.last().map(|level| level.container)
    }

    pub fn open(&mut self, container: Container) -> Result<(), StructuralError> {
        self.place(container.open_event())?;
        self.levels.push(Level {
            container,
            keyed: false,
        });
        Ok(())
    }

    pub fn close(&mut self, container: Container) -> Result<(), StructuralError> {
        let event = container.close_event();
        let Some(level) = self.levels.last() else {
            return Err(StructuralError::UnmatchedClose(event));
        };
        if level.container != container {
            return Err(StructuralError::MismatchedClose {
                found: event,
                open: level.container.name(),
            });
        }
        if level.keyed {
            return Err(StructuralError::KeyWithoutValue(event));
        }
        self.levels.pop();
        self.complete = self.levels.is_empty();
        Ok(())
    }

    pub fn key(&mut self, name: &str) -> Result<(), StructuralError> {
        match self.levels.last_mut() {
            Some(level) if level.container == Container::Object => {
                if level.keyed {
                    return Err(StructuralError::DanglingKey(name.into()));
                }
                level.keyed = true;
                Ok(())
            }
            _ => Err(StructuralError::KeyOutsideObject(name.into())),
        }
    }

    /// Records a scalar; `event` names the method that delivered it.
    pub fn value(&mut self, event: &'static str) -> Result<(), StructuralError> {
        self.place(event)?;
        if self.levels.is_empty() {
            self.complete = true;
        }
        Ok(())
    }

    /// Checks that exactly one complete value was seen.
    pub fn finish(&self) -> Result<(), StructuralError> {
        match self.levels.last() {
            Some(level) if level.keyed => Err(StructuralError::KeyWithoutValue("finish")),
            Some(_) => Err(StructuralError::Unclosed(self.levels.len())),
            None if self.complete => Ok(()),
            None => Err(StructuralError::Empty),
        }
    }

    /// Forgets everything, ready for another document.
    pub fn reset(&mut self) {
        self.levels.clear();
        self.complete = false;
    }

    fn place(&mut self, event: &'static str) -> Result<(), StructuralError> {
        match self.levels.last_mut() {
            None if self.complete => Err(StructuralError::TrailingValue(event)),
            None => Ok(()),
            Some(level) if level.container == Container::Array => Ok(()),
            Some(level) if level.keyed => {
                level.keyed = false;
                Ok(())
            }
            Some(_) => Err(StructuralError::MissingKey(event)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Container, Nesting};
    use crate::StructuralError;

    #[test]
    fn balanced_document() {
        let mut n = Nesting::new();
        n.open(Container::Array).unwrap();
        n.value("null_value").unwrap();
        n.open(Container::Object).unwrap();
        n.key("k").unwrap();
        n.open(Container::Array).unwrap();
        assert_eq!(n.depth(), 3);
        n.close(Container::Array).unwrap();
        n.close(Container::Object).unwrap();
        n.close(Container::Array).unwrap();
        assert!(n.is_complete());
        assert_eq!(n.finish(), Ok(()));
    }

    #[test]
    fn close_errors() {
        let mut n = Nesting::new();
        assert_eq!(
            n.close(Container::Object),
            Err(StructuralError::UnmatchedClose("close_object"))
        );
        n.open(Container::Array).unwrap();
        assert_eq!(
            n.close(Container::Object),
            Err(StructuralError::MismatchedClose {
                found: "close_object",
                open: "array"
            })
        );

        let mut n = Nesting::new();
        n.open(Container::Object).unwrap();
        n.key("a").unwrap();
        assert_eq!(
            n.close(Container::Object),
            Err(StructuralError::KeyWithoutValue("close_object"))
        );
    }

    #[test]
    fn key_errors() {
        let mut n = Nesting::new();
        assert_eq!(n.key("a"), Err(StructuralError::KeyOutsideObject("a".into())));
        n.open(Container::Array).unwrap();
        assert!(n.key("a").is_err());

        let mut n = Nesting::new();
        n.open(Container::Object).unwrap();
        assert_eq!(
            n.value("bool_value"),
            Err(StructuralError::MissingKey("bool_value"))
        );
    }

    #[test]
    fn document_boundaries() {
        let mut n = Nesting::new();
        assert_eq!(n.finish(), Err(StructuralError::Empty));
        n.value("number_value").unwrap();
        assert_eq!(
            n.value("number_value"),
            Err(StructuralError::TrailingValue("number_value"))
        );
        n.reset();
        n.open(Container::Object).unwrap();
        assert_eq!(n.finish(), Err(StructuralError::Unclosed(1)));
    }
}

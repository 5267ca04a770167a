use alloc::string::String;
use alloc::vec::Vec;

use crate::{Number, StreamConsumer, StreamError};

// -----------------------------------------------------------------------------
// Event

/// One recorded protocol call.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    OpenObject,
    CloseObject,
    OpenArray,
    CloseArray,
    Key(String),
    Null,
    Bool(bool),
    Number(Number),
    String(String),
}

impl Event {
    /// Sends this event to `consumer`.
    pub fn feed<C: StreamConsumer + ?Sized>(&self, consumer: &mut C) -> Result<(), StreamError> {
        match self {
            Event::OpenObject => consumer.open_object(),
            Event::CloseObject => consumer.close_object(),
            Event::OpenArray => consumer.open_array(),
            Event::CloseArray => consumer.close_array(),
            Event::Key(name) => consumer.key(name),
            Event::Null => consumer.null_value(),
            Event::Bool(v) => consumer.bool_value(*v),
            Event::Number(v) => consumer.number_value(*v),
            Event::String(v) => consumer.string_value(v),
        }
    }
}

// -----------------------------------------------------------------------------
// EventBuffer

/// A consumer that records every event it receives.
///
/// Recording does not check structure; wrap the buffer in a
/// [`Validator`](crate::Validator) for that.
///
/// ```
/// use sp_stream::{Event, EventBuffer, Number, StreamConsumer, StreamError};
///
/// let mut recorded = EventBuffer::new();
/// recorded.open_array()?;
/// recorded.number_value(Number::Int(1))?;
/// recorded.close_array()?;
///
/// let mut copy = EventBuffer::new();
/// recorded.replay(&mut copy)?;
/// assert_eq!(copy, recorded);
/// assert_eq!(copy.events()[1], Event::Number(Number::Int(1)));
/// # Ok::<(), StreamError>(())
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EventBuffer {
    events: Vec<Event>,
}

impl EventBuffer {
    #[inline]
    pub const fn new() -> Self {
        Self { events: Vec::new() }
    }

    #[inline]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    #[inline]
    pub fn into_events(self) -> Vec<Event> {
        self.events
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    #[inline]
    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Sends every recorded event to `consumer`, stopping at the first error.
    pub fn replay<C: StreamConsumer + ?Sized>(&self, consumer: &mut C) -> Result<(), StreamError> {
        self.events.iter().try_for_each(|event| event.feed(consumer))
    }
}

impl From<Vec<Event>> for EventBuffer {
    #[inline]
    fn from(events: Vec<Event>) -> Self {
        Self { events }
    }
}

impl StreamConsumer for EventBuffer {
    #[inline]
    fn open_object(&mut self) -> Result<(), StreamError> {
        self.events.push(Event::OpenObject);
        Ok(())
    }

    #[inline]
    fn close_object(&mut self) -> Result<(), StreamError> {
        self.events.push(Event::CloseObject);
        Ok(())
    }

    #[inline]
    fn open_array(&mut self) -> Result<(), StreamError> {
        self.events.push(Event::OpenArray);
        Ok(())
    }

    #[inline]
    fn close_array(&mut self) -> Result<(), StreamError> {
        self.events.push(Event::CloseArray);
        Ok(())
    }

    #[inline]
    fn key(&mut self, name: &str) -> Result<(), StreamError> {
        self.events.push(Event::Key(name.into()));
        Ok(())
    }

    #[inline]
    fn null_value(&mut self) -> Result<(), StreamError> {
        self.events.push(Event::Null);
        Ok(())
    }

    #[inline]
    fn bool_value(&mut self, value: bool) -> Result<(), StreamError> {
        self.events.push(Event::Bool(value));
        Ok(())
    }

    #[inline]
    fn number_value(&mut self, value: Number) -> Result<(), StreamError> {
        self.events.push(Event::Number(value));
        Ok(())
    }

    #[inline]
    fn string_value(&mut self, value: &str) -> Result<(), StreamError> {
        self.events.push(Event::String(value.into()));
        Ok(())
    }
}

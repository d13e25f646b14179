/*!
The push decoder's output interface.

A [`Listener`] receives exactly one callback per decoded head. Callbacks run
inline while the decoder is mutably borrowed, so a listener cannot re-enter
the decoder that is calling it: walking nested structures is done by the
caller, counting `on_array`/`on_map` items and running the decoder again.
*/

use super::*;
use alloc::string::String;
use alloc::vec::Vec;

/// Which integer major type an out-of-range magnitude came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sign {
    /// Major type 0: the value is the magnitude.
    Positive,
    /// Major type 1: the value is `-1 - magnitude`.
    Negative,
}

pub trait Listener {
    fn on_integer(&mut self, value: i64);

    /// An integer whose value does not fit the `on_integer` range.
    fn on_extra_integer(&mut self, magnitude: u64, sign: Sign);

    /// The buffer is handed over; the listener owns it from here on.
    fn on_bytes(&mut self, data: Vec<u8>);

    /// A text string, always valid UTF-8.
    ///
    /// A text string that is not valid UTF-8 is never delivered here:
    /// [`on_error`](Self::on_error) receives [`Error::InvalidUtf8`] instead
    /// and the decoder freezes, so nothing after it in the stream is decoded.
    fn on_string(&mut self, text: String);

    /// Start of an array; the next `count` items are its elements.
    fn on_array(&mut self, count: u64);

    /// Start of a map; the next `2 * pairs` items are its keys and values.
    fn on_map(&mut self, pairs: u64);

    fn on_tag(&mut self, tag: u64);

    /// A tag number that needed a full 64-bit argument.
    fn on_extra_tag(&mut self, tag: u64);

    fn on_bool(&mut self, value: bool);

    fn on_null(&mut self);

    fn on_undefined(&mut self);

    fn on_special(&mut self, value: u8);

    fn on_float(&mut self, value: f32);

    fn on_double(&mut self, value: f64);

    /// A half-precision float, widened losslessly.
    fn on_half(&mut self, value: f32) {
        self.on_float(value)
    }

    /// Called once, just before the decoder freezes.
    fn on_error(&mut self, error: &Error);
}

/// A decoded head as a value, for callers that prefer to queue events and
/// interpret them separately from decoding.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Integer(i64),
    ExtraInteger(u64, Sign),
    Bytes(Vec<u8>),
    String(String),
    Array(u64),
    Map(u64),
    Tag(u64),
    ExtraTag(u64),
    Bool(bool),
    Null,
    Undefined,
    Special(u8),
    Half(f32),
    Float(f32),
    Double(f64),
    Error(Error),
}

impl Event {
    /// How many following items belong to this one.
    ///
    /// Arrays and maps announce their elements, and a tag always wraps
    /// exactly one item.
    pub fn children(&self) -> u64 {
        match self {
            Self::Array(count) => *count,
            Self::Map(pairs) => pairs.saturating_mul(2),
            Self::Tag(_) | Self::ExtraTag(_) => 1,
            _ => 0,
        }
    }
}

impl Listener for Vec<Event> {
    fn on_integer(&mut self, value: i64) {
        self.push(Event::Integer(value))
    }

    fn on_extra_integer(&mut self, magnitude: u64, sign: Sign) {
        self.push(Event::ExtraInteger(magnitude, sign))
    }

    fn on_bytes(&mut self, data: Vec<u8>) {
        self.push(Event::Bytes(data))
    }

    fn on_string(&mut self, text: String) {
        self.push(Event::String(text))
    }

    fn on_array(&mut self, count: u64) {
        self.push(Event::Array(count))
    }

    fn on_map(&mut self, pairs: u64) {
        self.push(Event::Map(pairs))
    }

    fn on_tag(&mut self, tag: u64) {
        self.push(Event::Tag(tag))
    }

    fn on_extra_tag(&mut self, tag: u64) {
        self.push(Event::ExtraTag(tag))
    }

    fn on_bool(&mut self, value: bool) {
        self.push(Event::Bool(value))
    }

    fn on_null(&mut self) {
        self.push(Event::Null)
    }

    fn on_undefined(&mut self) {
        self.push(Event::Undefined)
    }

    fn on_special(&mut self, value: u8) {
        self.push(Event::Special(value))
    }

    fn on_float(&mut self, value: f32) {
        self.push(Event::Float(value))
    }

    fn on_double(&mut self, value: f64) {
        self.push(Event::Double(value))
    }

    fn on_half(&mut self, value: f32) {
        self.push(Event::Half(value))
    }

    fn on_error(&mut self, error: &Error) {
        self.push(Event::Error(error.clone()))
    }
}

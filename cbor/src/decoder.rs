/*!
The resumable push decoder.

[`Decoder::run`] consumes whatever the byte source can supply right now and
reports one [`Listener`] event per decoded head. Before every transition the
decoder asks the source whether the bytes the current state needs are
available; if not it returns without consuming anything, so a later call with
more data resumes exactly where it stopped.

Containers are never descended into: an array or map head yields a single
event carrying its count, and the caller decides how to consume the items
that follow.
*/

use super::*;
use alloc::string::String;
use tracing::{debug, trace};

/// Width of an argument field that really is present on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    One,
    Two,
    Four,
    Eight,
}

impl Field {
    fn from_width(width: Width) -> Option<Self> {
        match width {
            Width::Embedded => None,
            Width::One => Some(Self::One),
            Width::Two => Some(Self::Two),
            Width::Four => Some(Self::Four),
            Width::Eight => Some(Self::Eight),
        }
    }

    pub fn len(self) -> usize {
        match self {
            Self::One => 1,
            Self::Two => 2,
            Self::Four => 4,
            Self::Eight => 8,
        }
    }

    fn get<S: ByteSource>(self, source: &mut S) -> Result<u64, Error> {
        match self {
            Self::One => source.get_u8().map(u64::from),
            Self::Two => source.get_u16().map(u64::from),
            Self::Four => source.get_u32().map(u64::from),
            Self::Eight => source.get_u64(),
        }
    }
}

/// Where the decoder is within the current item. Each state carries exactly
/// the data it needs to make its next transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Between items, waiting for a head byte.
    Head,
    Unsigned(Field),
    Negative(Field),
    ByteLength(Field),
    ByteData(usize),
    TextLength(Field),
    TextData(usize),
    ArrayLength(Field),
    MapLength(Field),
    Tag(Field),
    Special(Field),
    /// A format error was reported; nothing further happens.
    Frozen,
}

impl State {
    /// Bytes that must be available before this state can advance.
    fn needs(&self) -> usize {
        match self {
            Self::Head => 1,
            Self::ByteData(len) | Self::TextData(len) => *len,
            Self::Unsigned(f)
            | Self::Negative(f)
            | Self::ByteLength(f)
            | Self::TextLength(f)
            | Self::ArrayLength(f)
            | Self::MapLength(f)
            | Self::Tag(f)
            | Self::Special(f) => f.len(),
            Self::Frozen => 0,
        }
    }
}

/// Outcome of a single [`Decoder::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Bytes were consumed and the state advanced.
    Progress,
    /// The current state cannot advance with the bytes available.
    Pending,
    /// The decoder is in its terminal error state.
    Frozen,
}

/// Outcome of [`Decoder::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    NeedMoreData,
    Failed,
}

#[derive(Debug)]
pub struct Decoder<S> {
    source: S,
    state: State,
    limits: Limits,
}

impl<S: ByteSource> Decoder<S> {
    pub fn new(source: S) -> Self {
        Self::with_limits(source, Limits::default())
    }

    pub fn with_limits(source: S, limits: Limits) -> Self {
        Self {
            source,
            state: State::Head,
            limits,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Access to the source, e.g. to feed it more bytes between runs.
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn into_source(self) -> S {
        self.source
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    pub fn is_frozen(&self) -> bool {
        self.state == State::Frozen
    }

    /// True when the last item was completely decoded.
    pub fn is_idle(&self) -> bool {
        self.state == State::Head
    }

    /// Decodes as much as the source currently allows.
    pub fn run<L: Listener + ?Sized>(&mut self, listener: &mut L) -> Status {
        loop {
            match self.step(listener) {
                Step::Progress => {}
                Step::Pending => return Status::NeedMoreData,
                Step::Frozen => return Status::Failed,
            }
        }
    }

    /// Performs at most one state transition.
    pub fn step<L: Listener + ?Sized>(&mut self, listener: &mut L) -> Step {
        if self.state == State::Frozen {
            return Step::Frozen;
        }
        if !self.source.has_bytes(self.state.needs()) {
            return Step::Pending;
        }

        match self.transition(listener) {
            Ok(next) => {
                self.state = next;
                Step::Progress
            }
            Err(e) => {
                debug!("CBOR decoder frozen in state {:?}: {e}", self.state);
                self.state = State::Frozen;
                listener.on_error(&e);
                Step::Frozen
            }
        }
    }

    fn transition<L: Listener + ?Sized>(&mut self, listener: &mut L) -> Result<State, Error> {
        let next = match self.state {
            State::Head => return self.head(listener),
            State::Unsigned(field) => {
                let v = field.get(&mut self.source)?;
                match field {
                    Field::One | Field::Two => listener.on_integer(v as i64),
                    Field::Four if v <= i32::MAX as u64 => listener.on_integer(v as i64),
                    Field::Four | Field::Eight => listener.on_extra_integer(v, Sign::Positive),
                }
                State::Head
            }
            State::Negative(field) => {
                let v = field.get(&mut self.source)?;
                match field {
                    Field::One | Field::Two => listener.on_integer(-1 - v as i64),
                    // n == i32::MAX yields i32::MIN exactly
                    Field::Four if v <= i32::MAX as u64 => listener.on_integer(-1 - v as i64),
                    Field::Four | Field::Eight => listener.on_extra_integer(v, Sign::Negative),
                }
                State::Head
            }
            State::ByteLength(field) => {
                State::ByteData(self.length(field, MajorType::ByteString)?)
            }
            State::TextLength(field) => {
                State::TextData(self.length(field, MajorType::Utf8String)?)
            }
            State::ByteData(len) => {
                listener.on_bytes(self.source.get_bytes(len)?);
                State::Head
            }
            State::TextData(len) => {
                let data = self.source.get_bytes(len)?;
                let text = String::from_utf8(data).map_err(|e| e.utf8_error())?;
                listener.on_string(text);
                State::Head
            }
            State::ArrayLength(field) => {
                listener.on_array(self.count(field, MajorType::Array)?);
                State::Head
            }
            State::MapLength(field) => {
                listener.on_map(self.count(field, MajorType::Map)?);
                State::Head
            }
            State::Tag(field) => {
                let v = field.get(&mut self.source)?;
                match field {
                    Field::Eight => listener.on_extra_tag(v),
                    _ => listener.on_tag(v),
                }
                State::Head
            }
            State::Special(field) => {
                match field {
                    Field::One => listener.on_special(self.source.get_u8()?),
                    Field::Two => listener.on_half(self.source.get_f16()?.to_f32()),
                    Field::Four => listener.on_float(self.source.get_f32()?),
                    Field::Eight => listener.on_double(self.source.get_f64()?),
                }
                State::Head
            }
            State::Frozen => State::Frozen,
        };
        Ok(next)
    }

    fn head<L: Listener + ?Sized>(&mut self, listener: &mut L) -> Result<State, Error> {
        let head = TypeHead::parse(self.source.get_u8()?)?;
        trace!(major = %head.major, minor = head.minor, "CBOR head");

        let minor = head.minor;
        let next = match (head.major, Field::from_width(head.width)) {
            (MajorType::UnsignedInteger, None) => {
                listener.on_integer(minor as i64);
                State::Head
            }
            (MajorType::UnsignedInteger, Some(f)) => State::Unsigned(f),
            (MajorType::SignedInteger, None) => {
                listener.on_integer(-1 - minor as i64);
                State::Head
            }
            (MajorType::SignedInteger, Some(f)) => State::Negative(f),
            (MajorType::ByteString, None) => {
                State::ByteData(self.limits.check_length(minor as u64)?)
            }
            (MajorType::ByteString, Some(f)) => State::ByteLength(f),
            (MajorType::Utf8String, None) => {
                State::TextData(self.limits.check_length(minor as u64)?)
            }
            (MajorType::Utf8String, Some(f)) => State::TextLength(f),
            (MajorType::Array, None) => {
                listener.on_array(minor as u64);
                State::Head
            }
            (MajorType::Array, Some(f)) => State::ArrayLength(f),
            (MajorType::Map, None) => {
                listener.on_map(minor as u64);
                State::Head
            }
            (MajorType::Map, Some(f)) => State::MapLength(f),
            (MajorType::Tag, None) => {
                listener.on_tag(minor as u64);
                State::Head
            }
            (MajorType::Tag, Some(f)) => State::Tag(f),
            (MajorType::SimpleValue | MajorType::FloatingPoint, None) => {
                match minor {
                    20 => listener.on_bool(false),
                    21 => listener.on_bool(true),
                    22 => listener.on_null(),
                    23 => listener.on_undefined(),
                    v => listener.on_special(v),
                }
                State::Head
            }
            (MajorType::SimpleValue | MajorType::FloatingPoint, Some(f)) => State::Special(f),
        };
        Ok(next)
    }

    /// Reads a string length field and checks it against the limits.
    fn length(&mut self, field: Field, major: MajorType) -> Result<usize, Error> {
        let len = self.count(field, major)?;
        self.limits.check_length(len)
    }

    /// Reads an array/map/string count; 8-byte counts are not supported.
    fn count(&mut self, field: Field, major: MajorType) -> Result<u64, Error> {
        match field {
            Field::Eight => Err(Error::LengthOverflow(major)),
            _ => field.get(&mut self.source),
        }
    }
}

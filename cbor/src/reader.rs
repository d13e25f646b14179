/*!
The cursor reader: typed, synchronous access to CBOR items.

Unlike [`Decoder`], the reader keeps no decoding state of its own. Every call
re-derives the head by peeking, validates the whole item against what the
caller asked for and against the bytes on hand, and only then advances. An
`Err` therefore always leaves the cursor where it was.
*/

use super::*;
use alloc::string::String;
use alloc::vec::Vec;
use num_traits::ToPrimitive;
use tracing::debug;

#[derive(Debug)]
pub struct Reader<S> {
    source: S,
    limits: Limits,
}

impl<S: ByteSource> Reader<S> {
    pub fn new(source: S) -> Self {
        Self::with_limits(source, Limits::default())
    }

    pub fn with_limits(source: S, limits: Limits) -> Self {
        Self { source, limits }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn into_source(self) -> S {
        self.source
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Is there at least one more head byte?
    pub fn has_more(&self) -> bool {
        self.source.has_bytes(1)
    }

    /// Classifies the next item without consuming anything.
    pub fn peek_type(&self) -> Result<TypeHead, Error> {
        TypeHead::parse(self.source.peek_byte().ok_or(Error::NotEnoughData)?)
    }

    pub fn read_array(&mut self) -> Result<usize, Error> {
        let head = self.expect(MajorType::Array)?;
        let count = self.count_at(1, &head)?;
        self.consume(&head, 0)?;
        Ok(count)
    }

    /// Returns the number of key/value pairs.
    pub fn read_map(&mut self) -> Result<usize, Error> {
        let head = self.expect(MajorType::Map)?;
        let count = self.count_at(1, &head)?;
        self.consume(&head, 0)?;
        Ok(count)
    }

    pub fn read_uint(&mut self) -> Result<u32, Error> {
        let head = self.expect(MajorType::UnsignedInteger)?;
        let v = self.argument_at(1, &head)?;
        let v = v.to_u32().ok_or(Error::OutOfRange)?;
        self.consume(&head, 0)?;
        Ok(v)
    }

    pub fn read_ulong(&mut self) -> Result<u64, Error> {
        let head = self.expect(MajorType::UnsignedInteger)?;
        let v = self.argument_at(1, &head)?;
        self.consume(&head, 0)?;
        Ok(v)
    }

    pub fn read_int(&mut self) -> Result<i32, Error> {
        let (head, v) = self.integer()?;
        let v = match head.major {
            MajorType::SignedInteger => v.to_i32().map(|n| -1 - n),
            _ => v.to_i32(),
        }
        .ok_or(Error::OutOfRange)?;
        self.consume(&head, 0)?;
        Ok(v)
    }

    pub fn read_long(&mut self) -> Result<i64, Error> {
        let (head, v) = self.integer()?;
        let v = match head.major {
            MajorType::SignedInteger => v.to_i64().map(|n| -1 - n),
            _ => v.to_i64(),
        }
        .ok_or(Error::OutOfRange)?;
        self.consume(&head, 0)?;
        Ok(v)
    }

    /// Reads a half or single precision float, or a double that fits.
    pub fn read_float(&mut self) -> Result<f32, Error> {
        let head = self.expect(MajorType::FloatingPoint)?;
        let bits = self.argument_at(1, &head)?;
        let v = match head.width {
            Width::Two => half::f16::from_bits(bits as u16).to_f32(),
            Width::Four => f32::from_bits(bits as u32),
            _ => {
                let d = f64::from_bits(bits);
                let f = d as f32;
                if d.is_finite() && f.is_infinite() {
                    debug!("Double {d} does not fit a single precision float");
                    return Err(Error::OutOfRange);
                }
                f
            }
        };
        self.consume(&head, 0)?;
        Ok(v)
    }

    /// Reads any float width, widening losslessly.
    pub fn read_double(&mut self) -> Result<f64, Error> {
        let head = self.expect(MajorType::FloatingPoint)?;
        self.require(&head, 0)?;
        self.source.advance(1)?;
        match head.width {
            Width::Two => Ok(self.source.get_f16()?.to_f64()),
            Width::Four => self.source.get_f32().map(f64::from),
            _ => self.source.get_f64(),
        }
    }

    /// Reads a text string, or a byte string holding valid UTF-8.
    pub fn read_string(&mut self) -> Result<String, Error> {
        let head = self.peek_type()?;
        if !matches!(head.major, MajorType::Utf8String | MajorType::ByteString) {
            return Err(self.mismatch(MajorType::Utf8String, head.major));
        }
        let data = self.payload(&head)?;
        let text = String::from_utf8(data).map_err(|e| e.utf8_error())?;
        self.consume(&head, text.len())?;
        Ok(text)
    }

    pub fn read_bytes(&mut self) -> Result<Vec<u8>, Error> {
        let head = self.expect(MajorType::ByteString)?;
        let data = self.payload(&head)?;
        self.consume(&head, data.len())?;
        Ok(data)
    }

    pub fn read_bool(&mut self) -> Result<bool, Error> {
        let head = self.expect(MajorType::SimpleValue)?;
        match head.embedded() {
            Some(20 | 21) => {}
            _ => return Err(self.unexpected_simple(&head)),
        }
        self.source.advance(1)?;
        Ok(head.minor == 21)
    }

    pub fn read_null(&mut self) -> Result<(), Error> {
        let head = self.expect(MajorType::SimpleValue)?;
        if head.embedded() != Some(22) {
            return Err(self.unexpected_simple(&head));
        }
        self.source.advance(1)
    }

    /// Reads a tag number; the tagged item follows.
    pub fn read_tag(&mut self) -> Result<u64, Error> {
        let head = self.expect(MajorType::Tag)?;
        let v = self.argument_at(1, &head)?;
        self.consume(&head, 0)?;
        Ok(v)
    }

    /// Consumes exactly one complete item, including everything nested in it.
    ///
    /// A tag is an item in its own right here: only its head and argument
    /// are consumed, and the tagged item is left for the next call.
    pub fn skip(&mut self) -> Result<(), Error> {
        let len = self.item_len()?;
        self.source.advance(len)
    }

    /// Like [`skip`](Self::skip), but a tag is consumed together with the
    /// item it tags, at every nesting level.
    pub fn skip_tagged(&mut self) -> Result<(), Error> {
        let len = self.tagged_len()?;
        self.source.advance(len)
    }

    /// Total encoded length of what [`skip`](Self::skip) would consume.
    pub fn item_len(&self) -> Result<usize, Error> {
        self.measure(false)
    }

    /// Total encoded length of what [`skip_tagged`](Self::skip_tagged) would
    /// consume.
    pub fn tagged_len(&self) -> Result<usize, Error> {
        self.measure(true)
    }

    /// Walks nested containers with an explicit stack of outstanding item
    /// counts, so depth is bounded by [`Limits::max_depth`] rather than the
    /// call stack.
    fn measure(&self, through_tags: bool) -> Result<usize, Error> {
        let mut outer: Vec<u64> = Vec::new();
        let mut pending = 1u64;
        let mut offset = 0usize;

        loop {
            while pending == 0 {
                match outer.pop() {
                    Some(p) => pending = p,
                    None => {
                        return if self.source.has_bytes(offset) {
                            Ok(offset)
                        } else {
                            Err(Error::NotEnoughData)
                        };
                    }
                }
            }
            pending -= 1;

            let head = TypeHead::parse(self.source.peek_at(offset).ok_or(Error::NotEnoughData)?)?;
            let arg = offset + 1;
            offset = arg + head.argument_len();

            let children = match head.major {
                MajorType::UnsignedInteger
                | MajorType::SignedInteger
                | MajorType::FloatingPoint
                | MajorType::SimpleValue => continue,
                MajorType::ByteString | MajorType::Utf8String => {
                    offset = offset
                        .checked_add(self.count_at(arg, &head)?)
                        .ok_or(Error::LengthOverflow(head.major))?;
                    continue;
                }
                MajorType::Array => self.count_at(arg, &head)? as u64,
                MajorType::Map => self.count_at(arg, &head)? as u64 * 2,
                MajorType::Tag if through_tags => 1,
                MajorType::Tag => continue,
            };

            if children > 0 {
                if outer.len() >= self.limits.max_depth {
                    debug!("Skipping {} exceeds maximum depth {}", head.major, self.limits.max_depth);
                    return Err(Error::MaxRecursion);
                }
                outer.push(pending);
                pending = children;
            }
        }
    }

    fn unexpected_simple(&self, head: &TypeHead) -> Error {
        match self.argument_at(1, head) {
            Ok(v) => {
                debug!("Unexpected simple value {v}");
                Error::UnexpectedSimpleValue(v as u8)
            }
            Err(e) => e,
        }
    }

    fn integer(&self) -> Result<(TypeHead, u64), Error> {
        let head = self.peek_type()?;
        match head.major {
            MajorType::UnsignedInteger | MajorType::SignedInteger => {
                Ok((head, self.argument_at(1, &head)?))
            }
            found => Err(self.mismatch(MajorType::SignedInteger, found)),
        }
    }

    fn expect(&self, expected: MajorType) -> Result<TypeHead, Error> {
        let head = self.peek_type()?;
        if head.major != expected {
            return Err(self.mismatch(expected, head.major));
        }
        Ok(head)
    }

    fn mismatch(&self, expected: MajorType, found: MajorType) -> Error {
        debug!("Expected {expected}, found {found}");
        Error::IncorrectType(expected, found)
    }

    /// The head's argument, read `offset` bytes ahead of the cursor.
    fn argument_at(&self, offset: usize, head: &TypeHead) -> Result<u64, Error> {
        match head.embedded() {
            Some(v) => Ok(v as u64),
            None => self
                .source
                .peek_uint(offset, head.argument_len())
                .ok_or(Error::NotEnoughData),
        }
    }

    /// A length or count argument; 8-byte fields are not supported.
    fn count_at(&self, offset: usize, head: &TypeHead) -> Result<usize, Error> {
        if head.width == Width::Eight {
            return Err(Error::LengthOverflow(head.major));
        }
        let v = self.argument_at(offset, head)?;
        usize::try_from(v).map_err(|_| Error::LengthOverflow(head.major))
    }

    /// Copies a string payload without consuming it.
    fn payload(&self, head: &TypeHead) -> Result<Vec<u8>, Error> {
        let len = self.count_at(1, head)?;
        let len = self.limits.check_length(len as u64)?;
        self.require(head, len)?;
        let start = 1 + head.argument_len();
        (start..start + len)
            .map(|i| self.source.peek_at(i))
            .collect::<Option<Vec<u8>>>()
            .ok_or(Error::NotEnoughData)
    }

    fn require(&self, head: &TypeHead, payload: usize) -> Result<(), Error> {
        if self.source.has_bytes(1 + head.argument_len() + payload) {
            Ok(())
        } else {
            Err(Error::NotEnoughData)
        }
    }

    /// Advances past the head, its argument and `payload` bytes.
    fn consume(&mut self, head: &TypeHead, payload: usize) -> Result<(), Error> {
        self.require(head, payload)?;
        self.source.advance(1 + head.argument_len() + payload)
    }
}

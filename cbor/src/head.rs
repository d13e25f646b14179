/*!
The CBOR initial byte grammar shared by the push decoder and the cursor reader.

Every encoded item starts with a single head byte: the top 3 bits carry the
major type and the low 5 bits the "additional information". Values below 24
are embedded directly; 24 to 27 announce a following big-endian argument of
1, 2, 4 or 8 bytes.
*/

use super::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MajorType {
    UnsignedInteger,
    SignedInteger,
    ByteString,
    Utf8String,
    Array,
    Map,
    Tag,
    FloatingPoint,
    SimpleValue,
}

impl core::fmt::Display for MajorType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            Self::UnsignedInteger => "unsignedInteger",
            Self::SignedInteger => "signedInteger",
            Self::ByteString => "byteString",
            Self::Utf8String => "utf8String",
            Self::Array => "array",
            Self::Map => "map",
            Self::Tag => "tag",
            Self::FloatingPoint => "floatingPoint",
            Self::SimpleValue => "simpleValue",
        })
    }
}

/// Width of the argument field that follows the head byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Width {
    Embedded,
    One,
    Two,
    Four,
    Eight,
}

impl Width {
    pub fn from_minor(minor: u8) -> Result<Self, Error> {
        match minor {
            0..=23 => Ok(Self::Embedded),
            24 => Ok(Self::One),
            25 => Ok(Self::Two),
            26 => Ok(Self::Four),
            27 => Ok(Self::Eight),
            _ => Err(Error::InvalidMinorValue(minor)),
        }
    }

    /// Number of argument bytes following the head byte.
    pub const fn len(self) -> usize {
        match self {
            Self::Embedded => 0,
            Self::One => 1,
            Self::Two => 2,
            Self::Four => 4,
            Self::Eight => 8,
        }
    }
}

/// A classified head byte.
///
/// This is never stored by the decoders; it is recomputed from the source
/// every time it is needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeHead {
    pub major: MajorType,
    pub width: Width,
    pub minor: u8,
}

impl TypeHead {
    pub fn parse(byte: u8) -> Result<Self, Error> {
        let minor = byte & 0x1F;
        let major = match byte >> 5 {
            0 => MajorType::UnsignedInteger,
            1 => MajorType::SignedInteger,
            2 => MajorType::ByteString,
            3 => MajorType::Utf8String,
            4 => MajorType::Array,
            5 => MajorType::Map,
            6 => MajorType::Tag,
            _ => match minor {
                25..=27 => MajorType::FloatingPoint,
                _ => MajorType::SimpleValue,
            },
        };

        if minor == 31 {
            return Err(Error::IndefiniteLength(major));
        }

        Ok(Self {
            major,
            width: Width::from_minor(minor)?,
            minor,
        })
    }

    /// Number of bytes following the head byte before the item's payload.
    pub fn argument_len(&self) -> usize {
        self.width.len()
    }

    /// The embedded value, if the argument lives in the head byte itself.
    pub fn embedded(&self) -> Option<u8> {
        match self.width {
            Width::Embedded => Some(self.minor),
            _ => None,
        }
    }
}

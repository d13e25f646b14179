/*!
A streaming CBOR (RFC 8949) decoder built around a single byte-level grammar,
with two front ends:

- [`Decoder`]: a resumable push decoder that reports one [`Listener`] event per
  decoded head and returns, without consuming anything, whenever the
  [`ByteSource`] cannot yet supply the bytes it needs.
- [`Reader`]: a cursor for typed peek, read and skip operations over input that
  is already fully available.

Indefinite-length items are not supported and are reported as format errors.
*/
#![no_std]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

mod decoder;
mod error;
mod head;
mod limits;
mod listener;
mod reader;
mod source;

pub use decoder::{Decoder, Field, State, Status, Step};
pub use error::Error;
pub use head::{MajorType, TypeHead, Width};
pub use limits::Limits;
pub use listener::{Event, Listener, Sign};
pub use reader::Reader;
pub use source::{ByteSource, SliceSource, StreamBuffer};


#[cfg(test)]
mod decoder_tests;

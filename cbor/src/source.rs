/*!
Byte sources consumed by both decoding engines.

The decoders never block: [`ByteSource::has_bytes`] is the only probe they
use before consuming, so any buffering or polling of slow inputs happens
entirely on the source side.
*/

use super::*;
use alloc::collections::VecDeque;
use alloc::vec;
use alloc::vec::Vec;

pub trait ByteSource {
    /// Would `n` more bytes be available immediately?
    fn has_bytes(&self, n: usize) -> bool;

    /// Returns the byte `offset` positions ahead of the cursor without consuming it.
    fn peek_at(&self, offset: usize) -> Option<u8>;

    /// Discards `n` bytes. Nothing is consumed if fewer than `n` are available.
    fn advance(&mut self, n: usize) -> Result<(), Error>;

    /// Fills `dst` completely. Nothing is consumed if `dst` cannot be filled.
    fn read_into(&mut self, dst: &mut [u8]) -> Result<(), Error>;

    fn peek_byte(&self) -> Option<u8> {
        self.peek_at(0)
    }

    /// Big-endian unsigned value of `len` bytes starting `offset` bytes ahead.
    fn peek_uint(&self, offset: usize, len: usize) -> Option<u64> {
        (offset..offset + len).try_fold(0u64, |acc, i| {
            self.peek_at(i).map(|b| (acc << 8) | b as u64)
        })
    }

    fn get_u8(&mut self) -> Result<u8, Error> {
        let mut b = [0u8; 1];
        self.read_into(&mut b)?;
        Ok(b[0])
    }

    fn get_u16(&mut self) -> Result<u16, Error> {
        let mut b = [0u8; 2];
        self.read_into(&mut b)?;
        Ok(u16::from_be_bytes(b))
    }

    fn get_u32(&mut self) -> Result<u32, Error> {
        let mut b = [0u8; 4];
        self.read_into(&mut b)?;
        Ok(u32::from_be_bytes(b))
    }

    fn get_u64(&mut self) -> Result<u64, Error> {
        let mut b = [0u8; 8];
        self.read_into(&mut b)?;
        Ok(u64::from_be_bytes(b))
    }

    fn get_f16(&mut self) -> Result<half::f16, Error> {
        let mut b = [0u8; 2];
        self.read_into(&mut b)?;
        Ok(half::f16::from_be_bytes(b))
    }

    fn get_f32(&mut self) -> Result<f32, Error> {
        let mut b = [0u8; 4];
        self.read_into(&mut b)?;
        Ok(f32::from_be_bytes(b))
    }

    fn get_f64(&mut self) -> Result<f64, Error> {
        let mut b = [0u8; 8];
        self.read_into(&mut b)?;
        Ok(f64::from_be_bytes(b))
    }

    /// Consumes `n` raw bytes into a freshly allocated buffer.
    fn get_bytes(&mut self, n: usize) -> Result<Vec<u8>, Error> {
        if !self.has_bytes(n) {
            return Err(Error::NotEnoughData);
        }
        let mut v = vec![0u8; n];
        self.read_into(&mut v)?;
        Ok(v)
    }
}

/// A cursor over a borrowed, fully available slice.
#[derive(Debug, Clone)]
pub struct SliceSource<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> SliceSource<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    pub fn position(&self) -> usize {
        self.offset
    }

    pub fn remaining(&self) -> &'a [u8] {
        &self.data[self.offset..]
    }

    pub fn is_empty(&self) -> bool {
        self.offset >= self.data.len()
    }
}

impl ByteSource for SliceSource<'_> {
    fn has_bytes(&self, n: usize) -> bool {
        self.data.len() - self.offset >= n
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.data.get(self.offset.checked_add(offset)?).copied()
    }

    fn advance(&mut self, n: usize) -> Result<(), Error> {
        if !self.has_bytes(n) {
            return Err(Error::NotEnoughData);
        }
        self.offset += n;
        Ok(())
    }

    fn read_into(&mut self, dst: &mut [u8]) -> Result<(), Error> {
        let end = self.offset + dst.len();
        let src = self
            .data
            .get(self.offset..end)
            .ok_or(Error::NotEnoughData)?;
        dst.copy_from_slice(src);
        self.offset = end;
        Ok(())
    }
}

/// An owned FIFO that is fed incrementally, e.g. from socket reads or file
/// chunks, while a [`Decoder`] drains it.
#[derive(Debug, Default, Clone)]
pub struct StreamBuffer {
    buf: VecDeque<u8>,
    consumed: usize,
}

impl StreamBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends newly arrived bytes.
    pub fn feed(&mut self, data: &[u8]) {
        self.buf.extend(data)
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Total number of bytes consumed since creation.
    pub fn consumed(&self) -> usize {
        self.consumed
    }
}

impl ByteSource for StreamBuffer {
    fn has_bytes(&self, n: usize) -> bool {
        self.buf.len() >= n
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.buf.get(offset).copied()
    }

    fn advance(&mut self, n: usize) -> Result<(), Error> {
        if !self.has_bytes(n) {
            return Err(Error::NotEnoughData);
        }
        self.buf.drain(..n);
        self.consumed += n;
        Ok(())
    }

    fn read_into(&mut self, dst: &mut [u8]) -> Result<(), Error> {
        let n = dst.len();
        if !self.has_bytes(n) {
            return Err(Error::NotEnoughData);
        }
        for (d, s) in dst.iter_mut().zip(self.buf.drain(..n)) {
            *d = s;
        }
        self.consumed += n;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn slice_reads_big_endian() {
        let data = hex!("01 0203 04050607 08090a0b0c0d0e0f");
        let mut s = SliceSource::new(&data);
        assert_eq!(s.get_u8().unwrap(), 0x01);
        assert_eq!(s.get_u16().unwrap(), 0x0203);
        assert_eq!(s.get_u32().unwrap(), 0x04050607);
        assert_eq!(s.get_u64().unwrap(), 0x08090a0b0c0d0e0f);
        assert!(s.is_empty());
        assert_eq!(s.get_u8(), Err(Error::NotEnoughData));
    }

    #[test]
    fn short_reads_consume_nothing() {
        let data = hex!("aabbcc");
        let mut s = SliceSource::new(&data);
        assert_eq!(s.get_u32(), Err(Error::NotEnoughData));
        assert_eq!(s.position(), 0);
        assert_eq!(s.advance(4), Err(Error::NotEnoughData));
        assert_eq!(s.peek_uint(1, 2), Some(0xbbcc));
        assert_eq!(s.peek_uint(2, 2), None);
    }

    #[test]
    fn stream_buffer_feeds_incrementally() {
        let mut b = StreamBuffer::new();
        b.feed(&hex!("1234"));
        assert!(!b.has_bytes(4));
        assert_eq!(b.get_u32(), Err(Error::NotEnoughData));
        assert_eq!(b.len(), 2);

        b.feed(&hex!("5678"));
        assert_eq!(b.peek_byte(), Some(0x12));
        assert_eq!(b.get_u32().unwrap(), 0x12345678);
        assert!(b.is_empty());
        assert_eq!(b.consumed(), 4);
    }

    #[test]
    fn stream_buffer_reads_into_slices() {
        let mut b = StreamBuffer::new();
        b.feed(&hex!("0102030405"));

        let mut dst = [0u8; 3];
        b.read_into(&mut dst).unwrap();
        assert_eq!(dst, [1, 2, 3]);
        assert_eq!(b.len(), 2);
        assert_eq!(b.consumed(), 3);

        let mut dst = [0u8; 3];
        assert_eq!(b.read_into(&mut dst), Err(Error::NotEnoughData));
        assert_eq!(b.len(), 2);

        b.feed(&hex!("06"));
        assert_eq!(b.get_bytes(3).unwrap(), vec![4, 5, 6]);
        assert!(b.is_empty());
    }

    #[test]
    fn floats() {
        let data = hex!("3c00 47c35000 3ff199999999999a");
        let mut s = SliceSource::new(&data);
        assert_eq!(s.get_f16().unwrap().to_f32(), 1.0);
        assert_eq!(s.get_f32().unwrap(), 100000.0);
        assert_eq!(s.get_f64().unwrap(), 1.1);
    }
}

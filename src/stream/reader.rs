// Copyright 2026 Logsieve Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Byte source contract for the protocol decoder
//!
//! Readers are stateful and forward-only; seeking is never required.
//! The deserializer never buffers past the unit it is currently
//! decoding, so a reader wrapping a live socket works as well as a
//! slice.

use std::io::Read;

use crate::core::{Error, Result};

/// A forward-only byte source
pub trait Reader {
    /// Fill the buffer completely or fail
    ///
    /// Fails with Truncated when the source ends before the buffer is
    /// full and Io for any other read failure. Partial reads are not
    /// reported; on error the source position is unspecified.
    fn try_read_exact(&mut self, buf: &mut [u8]) -> Result<()>;
}

/// A reader over an in-memory byte slice
#[derive(Debug)]
pub struct SliceReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> SliceReader<'a> {
    /// Create a reader positioned at the start of the slice
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Bytes consumed so far
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes remaining
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }
}

impl Reader for SliceReader<'_> {
    fn try_read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        if self.remaining() < buf.len() {
            return Err(Error::Truncated);
        }
        buf.copy_from_slice(&self.data[self.pos..self.pos + buf.len()]);
        self.pos += buf.len();
        Ok(())
    }
}

/// Adapter running the reader contract over any [`std::io::Read`]
#[derive(Debug)]
pub struct IoReader<R: Read> {
    inner: R,
}

impl<R: Read> IoReader<R> {
    /// Wrap a standard reader
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    /// Recover the wrapped reader
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> Reader for IoReader<R> {
    fn try_read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        self.inner.read_exact(buf).map_err(Error::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slice_reader_reads_in_order() {
        let mut reader = SliceReader::new(&[1, 2, 3, 4, 5]);
        let mut first = [0u8; 2];
        let mut second = [0u8; 3];
        reader.try_read_exact(&mut first).unwrap();
        assert_eq!(first, [1, 2]);
        assert_eq!(reader.position(), 2);
        reader.try_read_exact(&mut second).unwrap();
        assert_eq!(second, [3, 4, 5]);
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn test_slice_reader_truncation() {
        let mut reader = SliceReader::new(&[1, 2]);
        let mut buf = [0u8; 3];
        assert_eq!(reader.try_read_exact(&mut buf), Err(Error::Truncated));
    }

    #[test]
    fn test_io_reader_maps_eof_to_truncated() {
        let mut reader = IoReader::new(std::io::Cursor::new(vec![7u8]));
        let mut buf = [0u8; 4];
        assert_eq!(reader.try_read_exact(&mut buf), Err(Error::Truncated));

        let mut reader = IoReader::new(std::io::Cursor::new(vec![7u8, 8]));
        let mut buf = [0u8; 2];
        reader.try_read_exact(&mut buf).unwrap();
        assert_eq!(buf, [7, 8]);
    }
}

// Copyright (c) 2022-2023 The MobileCoin Foundation

use byteorder::{BigEndian, ByteOrder};
use encdec::DecodeOwned;
use ledger_proto::ApduError;

use crate::apdu::path::RawPath;

use super::Error;

/// Big-endian cursor over fragment payloads
///
/// Consumed spans can be fetched with [`Reader::span`] so fields are hashed
/// exactly as received.
pub struct Reader<'a> {
    buff: &'a [u8],
    index: usize,
}

impl<'a> Reader<'a> {
    pub fn new(buff: &'a [u8]) -> Self {
        Self { buff, index: 0 }
    }

    /// Current read position
    pub fn position(&self) -> usize {
        self.index
    }

    /// Bytes consumed from `from` to the current position
    pub fn span(&self, from: usize) -> &'a [u8] {
        &self.buff[from.min(self.index)..self.index]
    }

    /// Take `n` bytes
    pub fn take(&mut self, n: usize) -> Result<&'a [u8], Error> {
        if self.buff.len() - self.index < n {
            return Err(Error::InvalidLength);
        }

        let d = &self.buff[self.index..][..n];
        self.index += n;
        Ok(d)
    }

    /// Take all remaining bytes
    pub fn rest(&mut self) -> &'a [u8] {
        let d = &self.buff[self.index..];
        self.index = self.buff.len();
        d
    }

    pub fn array<const N: usize>(&mut self) -> Result<[u8; N], Error> {
        let mut a = [0u8; N];
        a.copy_from_slice(self.take(N)?);
        Ok(a)
    }

    pub fn u8(&mut self) -> Result<u8, Error> {
        Ok(self.take(1)?[0])
    }

    pub fn u16(&mut self) -> Result<u16, Error> {
        self.take(2).map(BigEndian::read_u16)
    }

    pub fn u32(&mut self) -> Result<u32, Error> {
        self.take(4).map(BigEndian::read_u32)
    }

    pub fn u64(&mut self) -> Result<u64, Error> {
        self.take(8).map(BigEndian::read_u64)
    }

    /// Decode an encoded object
    pub fn decode<T: DecodeOwned<Output = T, Error = ApduError>>(&mut self) -> Result<T, Error> {
        let (v, n) = T::decode_owned(&self.buff[self.index..])?;
        self.index += n;
        Ok(v)
    }

    /// Decode a derivation path, paths longer than supported are invalid
    pub fn path(&mut self) -> Result<RawPath, Error> {
        match RawPath::decode_owned(&self.buff[self.index..]) {
            Ok((p, n)) => {
                self.index += n;
                Ok(p)
            }
            Err(ApduError::InvalidLength) => Err(Error::InvalidLength),
            Err(_) => Err(Error::InvalidPath),
        }
    }

    /// Ensure the payload has been consumed entirely
    pub fn finish(&self) -> Result<(), Error> {
        match self.index == self.buff.len() {
            true => Ok(()),
            false => Err(Error::InvalidLength),
        }
    }
}

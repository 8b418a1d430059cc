// Copyright (c) 2022-2023 The MobileCoin Foundation

use byteorder::{BigEndian, ByteOrder};

use crate::ApduError;

/// Ensure `buff` holds at least `n` bytes
pub(crate) fn check_len(buff: &[u8], n: usize) -> Result<(), ApduError> {
    if buff.len() < n {
        return Err(ApduError::InvalidLength);
    }
    Ok(())
}

/// Big-endian integer helpers, the canonical transaction encoding
pub(crate) mod be {
    use super::*;

    pub fn enc_u16(v: u16, buff: &mut [u8]) -> Result<usize, ApduError> {
        check_len(buff, 2)?;
        BigEndian::write_u16(buff, v);
        Ok(2)
    }

    pub fn enc_u32(v: u32, buff: &mut [u8]) -> Result<usize, ApduError> {
        check_len(buff, 4)?;
        BigEndian::write_u32(buff, v);
        Ok(4)
    }

    pub fn enc_u64(v: u64, buff: &mut [u8]) -> Result<usize, ApduError> {
        check_len(buff, 8)?;
        BigEndian::write_u64(buff, v);
        Ok(8)
    }

    pub fn dec_u16(buff: &[u8]) -> Result<(u16, usize), ApduError> {
        check_len(buff, 2)?;
        Ok((BigEndian::read_u16(buff), 2))
    }

    pub fn dec_u32(buff: &[u8]) -> Result<(u32, usize), ApduError> {
        check_len(buff, 4)?;
        Ok((BigEndian::read_u32(buff), 4))
    }

    pub fn dec_u64(buff: &[u8]) -> Result<(u64, usize), ApduError> {
        check_len(buff, 8)?;
        Ok((BigEndian::read_u64(buff), 8))
    }
}

/// Fixed-size byte array encoding for signature and key fields
pub(crate) mod arr {
    use encdec::Error;

    pub fn enc<const N: usize>(d: &[u8; N], buff: &mut [u8]) -> Result<usize, Error> {
        if buff.len() < N {
            return Err(Error::Length);
        }

        buff[..N].copy_from_slice(&d[..]);

        Ok(N)
    }

    pub fn enc_len<const N: usize>(_d: &[u8; N]) -> Result<usize, Error> {
        Ok(N)
    }

    pub fn dec<const N: usize>(buff: &[u8]) -> Result<([u8; N], usize), Error> {
        if buff.len() < N {
            return Err(Error::Length);
        }

        let mut d = [0u8; N];
        d.copy_from_slice(&buff[..N]);

        Ok((d, N))
    }
}

// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Key derivation path encoding
//!
//! Paths are sent as a one byte length followed by that many big-endian `u32`
//! indices. The device validates and rewrites the indices before use, see the
//! engine `path` module.

use encdec::{DecodeOwned, Encode};

use crate::{helpers::be, ApduError};

/// Hardened derivation flag
pub const HARDENED: u32 = 0x8000_0000;

/// Derivation purpose
pub const PURPOSE: u32 = 583;

/// Concordium coin type
pub const COIN_TYPE: u32 = 691;

/// Account subtree index used under the identity paths
pub const ACCOUNT_SUBTREE: u32 = 0;

/// Normal accounts marker
pub const NORMAL_ACCOUNTS: u32 = 0;

/// Final index of the IdCredSec seed path
pub const ID_CRED_SEC: u32 = 0;

/// Final index of the PRF-key seed path
pub const PRF_KEY: u32 = 1;

/// Maximum number of indices in a path
pub const MAX_PATH_LEN: usize = 8;

/// Key derivation path as carried on the wire
///
/// ## Encoding:
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |   PATH_LEN    |                INDEX_0 (big endian)           |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |               |                INDEX_1 ...                    /
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Copy, Clone, PartialEq, Debug, Default)]
pub struct RawPath {
    len: u8,
    indices: [u32; MAX_PATH_LEN],
}

impl RawPath {
    /// Create a wire path from the provided indices
    pub fn new(indices: &[u32]) -> Result<Self, ApduError> {
        if indices.len() > MAX_PATH_LEN {
            return Err(ApduError::InvalidLength);
        }

        let mut p = Self {
            len: indices.len() as u8,
            indices: [0u32; MAX_PATH_LEN],
        };
        p.indices[..indices.len()].copy_from_slice(indices);

        Ok(p)
    }

    /// Fetch the indices carried by this path
    pub fn indices(&self) -> &[u32] {
        &self.indices[..self.len as usize]
    }
}

impl Encode for RawPath {
    type Error = ApduError;

    fn encode_len(&self) -> Result<usize, Self::Error> {
        Ok(1 + self.len as usize * 4)
    }

    fn encode(&self, buff: &mut [u8]) -> Result<usize, Self::Error> {
        let n = self.encode_len()?;
        if buff.len() < n {
            return Err(ApduError::InvalidLength);
        }

        let mut index = 0;
        buff[index] = self.len;
        index += 1;

        for i in self.indices() {
            index += be::enc_u32(*i, &mut buff[index..])?;
        }

        Ok(index)
    }
}

impl DecodeOwned for RawPath {
    type Output = Self;
    type Error = ApduError;

    fn decode_owned(buff: &[u8]) -> Result<(Self::Output, usize), Self::Error> {
        if buff.is_empty() {
            return Err(ApduError::InvalidLength);
        }

        let len = buff[0] as usize;
        if len > MAX_PATH_LEN {
            return Err(ApduError::InvalidEncoding);
        }

        let mut index = 1;
        let mut indices = [0u32; MAX_PATH_LEN];
        for i in indices.iter_mut().take(len) {
            let (v, n) = be::dec_u32(&buff[index..])?;
            *i = v;
            index += n;
        }

        Ok((
            Self {
                len: len as u8,
                indices,
            },
            index,
        ))
    }
}

#[cfg(test)]
mod test {
    use rand::random;

    use super::*;
    use crate::test::encode_decode_apdu;

    #[test]
    fn raw_path_apdu() {
        for len in 0..=MAX_PATH_LEN {
            let indices: [u32; MAX_PATH_LEN] = random();
            let apdu = RawPath::new(&indices[..len]).unwrap();

            let mut buff = [0u8; 64];
            let n = encode_decode_apdu(&mut buff, &apdu);
            assert_eq!(n, 1 + len * 4);
        }
    }

    #[test]
    fn raw_path_limits() {
        assert!(RawPath::new(&[0u32; MAX_PATH_LEN + 1]).is_err());

        // Declared length beyond the maximum
        let mut buff = [0u8; 64];
        buff[0] = MAX_PATH_LEN as u8 + 1;
        assert!(matches!(
            RawPath::decode_owned(&buff),
            Err(ApduError::InvalidEncoding)
        ));

        // Declared length beyond the provided data
        assert!(matches!(
            RawPath::decode_owned(&[3, 0, 0, 0, 1]),
            Err(ApduError::InvalidLength)
        ));
    }
}

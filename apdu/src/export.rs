// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Restricted key seed export APDUs
//!
//! Only the PRF-key and IdCredSec seeds of an identity may be exported, see
//! [`ExportP1`][crate::p1::ExportP1] for the available selectors.

use encdec::{DecodeOwned, Encode};
use zeroize::Zeroize;

use crate::{
    helpers::{be, check_len},
    ApduError, ApduStatic, Instruction, CCD_APDU_CLA,
};

/// Length of an exported seed
pub const SEED_LEN: usize = 32;

/// Key seed export request
///
/// ## Encoding:
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                    IDENTITY (u32, big endian)                 |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct ExportSeedReq {
    pub identity: u32,
}

impl ApduStatic for ExportSeedReq {
    const CLA: u8 = CCD_APDU_CLA;
    const INS: u8 = Instruction::ExportPrivateKeySeed as u8;
}

impl ExportSeedReq {
    pub fn new(identity: u32) -> Self {
        Self { identity }
    }
}

impl Encode for ExportSeedReq {
    type Error = ApduError;

    fn encode_len(&self) -> Result<usize, Self::Error> {
        Ok(4)
    }

    fn encode(&self, buff: &mut [u8]) -> Result<usize, Self::Error> {
        be::enc_u32(self.identity, buff)
    }
}

impl DecodeOwned for ExportSeedReq {
    type Output = Self;
    type Error = ApduError;

    fn decode_owned(buff: &[u8]) -> Result<(Self::Output, usize), Self::Error> {
        let (identity, n) = be::dec_u32(buff)?;
        Ok((Self { identity }, n))
    }
}

/// Exported key seeds, the PRF-key seed optionally followed by the IdCredSec seed
///
/// Seed bytes are zeroized on drop.
///
/// ## Encoding:
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                                                               |
/// /                   PRF_KEY_SEED (32-byte)                      /
/// |                                                               |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                                                               |
/// /             ID_CRED_SEC_SEED (32-byte, optional)              /
/// |                                                               |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Clone, PartialEq, Debug)]
pub struct KeySeedResp {
    pub prf_key: [u8; SEED_LEN],
    pub id_cred_sec: Option<[u8; SEED_LEN]>,
}

impl Encode for KeySeedResp {
    type Error = ApduError;

    fn encode_len(&self) -> Result<usize, Self::Error> {
        match self.id_cred_sec {
            Some(_) => Ok(2 * SEED_LEN),
            None => Ok(SEED_LEN),
        }
    }

    fn encode(&self, buff: &mut [u8]) -> Result<usize, Self::Error> {
        let n = self.encode_len()?;
        check_len(buff, n)?;

        buff[..SEED_LEN].copy_from_slice(&self.prf_key);
        if let Some(s) = &self.id_cred_sec {
            buff[SEED_LEN..][..SEED_LEN].copy_from_slice(s);
        }

        Ok(n)
    }
}

impl DecodeOwned for KeySeedResp {
    type Output = Self;
    type Error = ApduError;

    fn decode_owned(buff: &[u8]) -> Result<(Self::Output, usize), Self::Error> {
        let mut prf_key = [0u8; SEED_LEN];

        match buff.len() {
            SEED_LEN => {
                prf_key.copy_from_slice(buff);
                Ok((
                    Self {
                        prf_key,
                        id_cred_sec: None,
                    },
                    SEED_LEN,
                ))
            }
            n if n == 2 * SEED_LEN => {
                let mut id_cred_sec = [0u8; SEED_LEN];
                prf_key.copy_from_slice(&buff[..SEED_LEN]);
                id_cred_sec.copy_from_slice(&buff[SEED_LEN..]);
                Ok((
                    Self {
                        prf_key,
                        id_cred_sec: Some(id_cred_sec),
                    },
                    n,
                ))
            }
            _ => Err(ApduError::InvalidLength),
        }
    }
}

impl Drop for KeySeedResp {
    fn drop(&mut self) {
        self.prf_key.zeroize();
        if let Some(s) = &mut self.id_cred_sec {
            s.zeroize();
        }
    }
}

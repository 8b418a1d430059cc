// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Signature and public key responses

use encdec::{Decode, Encode};

use crate::{helpers::*, ApduError};

/// Transaction signature response, returned once a signing flow is approved
///
/// ## Encoding:
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                                                               |
/// /                 ED25519_SIGNATURE (64-byte)                   /
/// |                                                               |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Clone, Debug, PartialEq, Encode, Decode)]
#[encdec(error = "ApduError")]
pub struct SignatureResp {
    #[encdec(with = "arr")]
    pub signature: [u8; 64],
}

impl SignatureResp {
    pub fn new(signature: [u8; 64]) -> Self {
        Self { signature }
    }
}

/// Public key response
///
/// ## Encoding:
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                                                               |
/// /                 ED25519_PUBLIC_KEY (32-byte)                  /
/// |                                                               |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Clone, Debug, PartialEq, Encode, Decode)]
#[encdec(error = "ApduError")]
pub struct PublicKeyResp {
    #[encdec(with = "arr")]
    pub public_key: [u8; 32],
}

impl PublicKeyResp {
    pub fn new(public_key: [u8; 32]) -> Self {
        Self { public_key }
    }
}

// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Configure-baker payload layout
//!
//! The initial fragment of a configure-baker transaction carries a presence
//! bitmap naming the optional fields that follow. Fields are always sent in
//! bit order.

use encdec::{DecodeOwned, Encode};

use crate::{helpers::be, ApduError};

/// Maximum metadata URL length
pub const MAX_URL_LEN: u16 = 2048;

/// Verification key length (signature and election keys)
pub const VERIFY_KEY_LEN: usize = 32;

/// Aggregation key length
pub const AGGREGATION_KEY_LEN: usize = 96;

/// Key ownership proof length
pub const KEY_PROOF_LEN: usize = 64;

bitflags::bitflags! {
    /// Configure-baker field presence bitmap
    pub struct BakerFields: u16 {
        const CAPITAL = 1 << 0;
        const RESTAKE_EARNINGS = 1 << 1;
        const OPEN_FOR_DELEGATION = 1 << 2;
        const SIGNATURE_KEY = 1 << 3;
        const ELECTION_KEY = 1 << 4;
        const AGGREGATION_KEY = 1 << 5;
        const METADATA_URL = 1 << 6;
        const TRANSACTION_FEE_COMMISSION = 1 << 7;
        const BAKING_REWARD_COMMISSION = 1 << 8;
        const FINALIZATION_REWARD_COMMISSION = 1 << 9;

        /// Fields carried by the first batch fragment
        const FIRST_BATCH = Self::CAPITAL.bits
            | Self::RESTAKE_EARNINGS.bits
            | Self::OPEN_FOR_DELEGATION.bits
            | Self::SIGNATURE_KEY.bits
            | Self::ELECTION_KEY.bits;

        /// Fields carried by the commission rates fragment
        const COMMISSIONS = Self::TRANSACTION_FEE_COMMISSION.bits
            | Self::BAKING_REWARD_COMMISSION.bits
            | Self::FINALIZATION_REWARD_COMMISSION.bits;
    }
}

impl Encode for BakerFields {
    type Error = ApduError;

    fn encode_len(&self) -> Result<usize, Self::Error> {
        Ok(2)
    }

    fn encode(&self, buff: &mut [u8]) -> Result<usize, Self::Error> {
        be::enc_u16(self.bits(), buff)
    }
}

/// Decoding rejects unknown bits and the empty bitmap
impl DecodeOwned for BakerFields {
    type Output = Self;
    type Error = ApduError;

    fn decode_owned(buff: &[u8]) -> Result<(Self::Output, usize), Self::Error> {
        let (bits, n) = be::dec_u16(buff)?;

        match Self::from_bits(bits) {
            Some(v) if !v.is_empty() => Ok((v, n)),
            _ => Err(ApduError::InvalidEncoding),
        }
    }
}

/// Delegation pool status
#[derive(Copy, Clone, PartialEq, Debug, num_enum::TryFromPrimitive)]
#[repr(u8)]
pub enum OpenStatus {
    OpenForAll = 0,
    ClosedForNew = 1,
    ClosedForAll = 2,
}

impl OpenStatus {
    pub fn label(&self) -> &'static str {
        match self {
            OpenStatus::OpenForAll => "Open for all",
            OpenStatus::ClosedForNew => "Closed for new",
            OpenStatus::ClosedForAll => "Closed for all",
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test::encode_decode_apdu;

    #[test]
    fn baker_fields_apdu() {
        for f in [
            BakerFields::CAPITAL,
            BakerFields::FIRST_BATCH,
            BakerFields::METADATA_URL | BakerFields::COMMISSIONS,
            BakerFields::all(),
        ] {
            let mut buff = [0u8; 4];
            assert_eq!(encode_decode_apdu(&mut buff, &f), 2);
        }
    }

    #[test]
    fn baker_fields_invalid() {
        // Empty bitmap
        assert!(BakerFields::decode_owned(&[0x00, 0x00]).is_err());
        // Unknown bit
        assert!(BakerFields::decode_owned(&[0x04, 0x01]).is_err());
        // Short
        assert!(BakerFields::decode_owned(&[0x01]).is_err());
    }
}

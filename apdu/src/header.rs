// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Transaction headers
//!
//! Signed transactions start with either an [`AccountTransactionHeader`]
//! (account transactions) or an [`UpdateHeader`] (chain updates), followed by
//! a single kind / type byte. Both are hashed exactly as received.

use encdec::{DecodeOwned, Encode};
use num_enum::TryFromPrimitive;
use strum::{Display, EnumIter, EnumString, EnumVariantNames};

use crate::{
    helpers::{be, check_len},
    ApduError,
};

/// Account address length
pub const ADDRESS_LEN: usize = 32;

/// Encoded account transaction header length
pub const ACCOUNT_HEADER_LEN: usize = 60;

/// Encoded update header length
pub const UPDATE_HEADER_LEN: usize = 28;

/// Account transaction kinds accepted by the signing flows
#[derive(
    Copy,
    Clone,
    PartialEq,
    Debug,
    EnumString,
    Display,
    EnumVariantNames,
    EnumIter,
    TryFromPrimitive,
)]
#[repr(u8)]
pub enum TransactionKind {
    Transfer = 3,
    TransferWithSchedule = 19,
    EncryptedAmountTransfer = 16,
    TransferToEncrypted = 17,
    TransferWithMemo = 22,
    ConfigureBaker = 25,
}

/// Chain update types accepted by the update flows
#[derive(
    Copy,
    Clone,
    PartialEq,
    Debug,
    EnumString,
    Display,
    EnumVariantNames,
    EnumIter,
    TryFromPrimitive,
)]
#[repr(u8)]
pub enum UpdateType {
    EuroPerEnergy = 3,
    MicroGtuPerEuro = 4,
    Authorizations = 10,
}

/// Account transaction header
///
/// ## Encoding:
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                                                               |
/// /                     SENDER (32-byte address)                  /
/// |                                                               |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                       NONCE (u64, 8-byte)                     |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                      ENERGY (u64, 8-byte)                     |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                          PAYLOAD_SIZE                         |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                      EXPIRY (u64, 8-byte)                     |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Clone, PartialEq, Debug, Default)]
pub struct AccountTransactionHeader {
    pub sender: [u8; ADDRESS_LEN],
    pub nonce: u64,
    pub energy: u64,
    pub payload_size: u32,
    pub expiry: u64,
}

impl Encode for AccountTransactionHeader {
    type Error = ApduError;

    fn encode_len(&self) -> Result<usize, Self::Error> {
        Ok(ACCOUNT_HEADER_LEN)
    }

    fn encode(&self, buff: &mut [u8]) -> Result<usize, Self::Error> {
        check_len(buff, ACCOUNT_HEADER_LEN)?;

        buff[..ADDRESS_LEN].copy_from_slice(&self.sender);
        let mut index = ADDRESS_LEN;

        index += be::enc_u64(self.nonce, &mut buff[index..])?;
        index += be::enc_u64(self.energy, &mut buff[index..])?;
        index += be::enc_u32(self.payload_size, &mut buff[index..])?;
        index += be::enc_u64(self.expiry, &mut buff[index..])?;

        Ok(index)
    }
}

impl DecodeOwned for AccountTransactionHeader {
    type Output = Self;
    type Error = ApduError;

    fn decode_owned(buff: &[u8]) -> Result<(Self::Output, usize), Self::Error> {
        check_len(buff, ACCOUNT_HEADER_LEN)?;

        let mut sender = [0u8; ADDRESS_LEN];
        sender.copy_from_slice(&buff[..ADDRESS_LEN]);
        let mut index = ADDRESS_LEN;

        let (nonce, n) = be::dec_u64(&buff[index..])?;
        index += n;
        let (energy, n) = be::dec_u64(&buff[index..])?;
        index += n;
        let (payload_size, n) = be::dec_u32(&buff[index..])?;
        index += n;
        let (expiry, n) = be::dec_u64(&buff[index..])?;
        index += n;

        Ok((
            Self {
                sender,
                nonce,
                energy,
                payload_size,
                expiry,
            },
            index,
        ))
    }
}

/// Chain update header
///
/// ## Encoding:
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                 SEQUENCE_NUMBER (u64, 8-byte)                 |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                  EFFECTIVE_TIME (u64, 8-byte)                 |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                     TIMEOUT (u64, 8-byte)                     |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                          PAYLOAD_SIZE                         |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Clone, PartialEq, Debug, Default)]
pub struct UpdateHeader {
    pub seq: u64,
    pub effective_time: u64,
    pub timeout: u64,
    pub payload_size: u32,
}

impl Encode for UpdateHeader {
    type Error = ApduError;

    fn encode_len(&self) -> Result<usize, Self::Error> {
        Ok(UPDATE_HEADER_LEN)
    }

    fn encode(&self, buff: &mut [u8]) -> Result<usize, Self::Error> {
        check_len(buff, UPDATE_HEADER_LEN)?;

        let mut index = 0;
        index += be::enc_u64(self.seq, &mut buff[index..])?;
        index += be::enc_u64(self.effective_time, &mut buff[index..])?;
        index += be::enc_u64(self.timeout, &mut buff[index..])?;
        index += be::enc_u32(self.payload_size, &mut buff[index..])?;

        Ok(index)
    }
}

impl DecodeOwned for UpdateHeader {
    type Output = Self;
    type Error = ApduError;

    fn decode_owned(buff: &[u8]) -> Result<(Self::Output, usize), Self::Error> {
        check_len(buff, UPDATE_HEADER_LEN)?;

        let mut index = 0;
        let (seq, n) = be::dec_u64(&buff[index..])?;
        index += n;
        let (effective_time, n) = be::dec_u64(&buff[index..])?;
        index += n;
        let (timeout, n) = be::dec_u64(&buff[index..])?;
        index += n;
        let (payload_size, n) = be::dec_u32(&buff[index..])?;
        index += n;

        Ok((
            Self {
                seq,
                effective_time,
                timeout,
                payload_size,
            },
            index,
        ))
    }
}

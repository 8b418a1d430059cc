// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Fragment tags (`P1`) accepted by each instruction
//!
//! The tag names the field a fragment carries, and therefore the transition
//! the device attempts. A tag arriving out of order aborts the flow.

use num_enum::TryFromPrimitive;
use strum::{Display, EnumIter, EnumString, EnumVariantNames};

/// Required `P2` value for [`Instruction::ExportPrivateKeySeed`][crate::Instruction::ExportPrivateKeySeed]
pub const EXPORT_P2: u8 = 0x01;

/// Tags for [`Instruction::GetPublicKey`][crate::Instruction::GetPublicKey]
#[derive(
    Copy, Clone, PartialEq, Debug, EnumString, Display, EnumVariantNames, EnumIter, TryFromPrimitive,
)]
#[repr(u8)]
pub enum PublicKeyP1 {
    /// Show the path and wait for confirmation
    Confirm = 0x00,
    /// Return the key without confirmation
    Silent = 0x01,
}

/// Tags for [`Instruction::SignTransfer`][crate::Instruction::SignTransfer]
/// and [`Instruction::SignTransferToEncrypted`][crate::Instruction::SignTransferToEncrypted]
#[derive(
    Copy, Clone, PartialEq, Debug, EnumString, Display, EnumVariantNames, EnumIter, TryFromPrimitive,
)]
#[repr(u8)]
pub enum TransferP1 {
    Initial = 0x00,
}

/// Tags for [`Instruction::SignTransferWithSchedule`][crate::Instruction::SignTransferWithSchedule]
#[derive(
    Copy, Clone, PartialEq, Debug, EnumString, Display, EnumVariantNames, EnumIter, TryFromPrimitive,
)]
#[repr(u8)]
pub enum ScheduleP1 {
    Initial = 0x00,
    /// Batch of `(release time, amount)` pairs
    Releases = 0x01,
}

/// Tags for [`Instruction::SignTransferWithMemo`][crate::Instruction::SignTransferWithMemo]
#[derive(
    Copy, Clone, PartialEq, Debug, EnumString, Display, EnumVariantNames, EnumIter, TryFromPrimitive,
)]
#[repr(u8)]
pub enum MemoP1 {
    InitialWithMemo = 0x01,
    Memo = 0x02,
    Amount = 0x03,
}

/// Tags for [`Instruction::SignEncryptedAmountTransfer`][crate::Instruction::SignEncryptedAmountTransfer]
#[derive(
    Copy, Clone, PartialEq, Debug, EnumString, Display, EnumVariantNames, EnumIter, TryFromPrimitive,
)]
#[repr(u8)]
pub enum EncryptedP1 {
    Initial = 0x00,
    Proofs = 0x01,
}

/// Tags for [`Instruction::SignCredentialDeployment`][crate::Instruction::SignCredentialDeployment]
#[derive(
    Copy, Clone, PartialEq, Debug, EnumString, Display, EnumVariantNames, EnumIter, TryFromPrimitive,
)]
#[repr(u8)]
pub enum CredentialP1 {
    Initial = 0x00,
    VerificationKey = 0x01,
    SignatureThreshold = 0x02,
    ArIdentity = 0x03,
    CredentialDates = 0x04,
    AttributeTag = 0x05,
    AttributeValue = 0x06,
    LengthOfProofs = 0x07,
    Proofs = 0x08,
    NewOrExisting = 0x09,
}

/// Tags for [`Instruction::SignConfigureBaker`][crate::Instruction::SignConfigureBaker]
#[derive(
    Copy, Clone, PartialEq, Debug, EnumString, Display, EnumVariantNames, EnumIter, TryFromPrimitive,
)]
#[repr(u8)]
pub enum BakerP1 {
    Initial = 0x00,
    FirstBatch = 0x01,
    AggregationKey = 0x02,
    UrlLength = 0x03,
    Url = 0x04,
    CommissionRates = 0x05,
}

/// Tags for [`Instruction::SignUpdateAuthorizations`][crate::Instruction::SignUpdateAuthorizations]
#[derive(
    Copy, Clone, PartialEq, Debug, EnumString, Display, EnumVariantNames, EnumIter, TryFromPrimitive,
)]
#[repr(u8)]
pub enum AuthorizationsP1 {
    Initial = 0x00,
    PublicKey = 0x01,
    AccessStructureSize = 0x02,
    AccessStructureIndices = 0x03,
    AccessStructureThreshold = 0x04,
}

/// Tags for [`Instruction::SignUpdateExchangeRate`][crate::Instruction::SignUpdateExchangeRate]
#[derive(
    Copy, Clone, PartialEq, Debug, EnumString, Display, EnumVariantNames, EnumIter, TryFromPrimitive,
)]
#[repr(u8)]
pub enum ExchangeRateP1 {
    Initial = 0x00,
}

/// Tags for [`Instruction::SignPublicInfoForIp`][crate::Instruction::SignPublicInfoForIp]
#[derive(
    Copy, Clone, PartialEq, Debug, EnumString, Display, EnumVariantNames, EnumIter, TryFromPrimitive,
)]
#[repr(u8)]
pub enum IpInfoP1 {
    Initial = 0x00,
    VerificationKey = 0x01,
    Threshold = 0x02,
}

/// Export selectors for [`Instruction::ExportPrivateKeySeed`][crate::Instruction::ExportPrivateKeySeed]
#[derive(
    Copy, Clone, PartialEq, Debug, EnumString, Display, EnumVariantNames, EnumIter, TryFromPrimitive,
)]
#[repr(u8)]
pub enum ExportP1 {
    /// PRF-key seed, for decrypting amounts
    PrfKey = 0x00,
    /// PRF-key seed, for credential recovery
    PrfKeyRecovery = 0x01,
    /// PRF-key and IdCredSec seeds, for credential creation
    Both = 0x02,
}

impl ExportP1 {
    /// Review header for this selector
    pub fn header(&self) -> &'static str {
        match self {
            ExportP1::PrfKey => "Decrypt",
            ExportP1::PrfKeyRecovery => "Recover credentials",
            ExportP1::Both => "Create credential",
        }
    }

    /// Number of seeds released by this selector
    pub fn seeds(&self) -> usize {
        match self {
            ExportP1::Both => 2,
            _ => 1,
        }
    }
}

// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Protocol / APDU definitions for Concordium app communication
//!
//! This module provides the protocol specification and reference encodings for
//! communication with the Concordium transaction co-signing engine.
//!
//! Transactions are streamed to the device as a sequence of _fragments_, each
//! carrying an instruction code (`INS`), a fragment tag (`P1`), a sub-selector
//! (`P2`) and at most [`MAX_FRAGMENT_LEN`] bytes of payload. The tag selects the
//! state transition the device should attempt; see [p1] for the tags accepted
//! by each instruction.
//!
//! Unlike the engine-internal types, all multi-byte integers on the wire are
//! big-endian, matching the canonical transaction serialisation so that the
//! device can hash payload bytes exactly as they are received.

#![no_std]

use num_enum::TryFromPrimitive;
use strum::{Display, EnumIter, EnumString, EnumVariantNames};

pub use ledger_proto::{ApduError, ApduStatic};

pub mod baker;
pub mod export;
pub mod header;
pub mod p1;
pub mod path;
pub mod prelude;
pub mod sign;
pub mod state;
pub mod status;

mod helpers;

/// Concordium APDU Class
pub const CCD_APDU_CLA: u8 = 0xe0;

/// Maximum payload carried by a single fragment
pub const MAX_FRAGMENT_LEN: usize = 255;

/// Concordium APDU instruction codes
#[derive(
    Copy,
    Clone,
    Debug,
    PartialEq,
    EnumString,
    Display,
    EnumVariantNames,
    EnumIter,
    TryFromPrimitive,
)]
#[repr(u8)]
pub enum Instruction {
    /// Fetch the public key for a signing path
    GetPublicKey = 0x01,

    /// Sign a simple transfer
    SignTransfer = 0x02,

    /// Sign a transfer with a release schedule
    SignTransferWithSchedule = 0x03,

    /// Sign a credential deployment
    SignCredentialDeployment = 0x04,

    /// Export PRF-key / IdCredSec seeds for an identity
    ExportPrivateKeySeed = 0x05,

    /// Sign an exchange rate chain update
    SignUpdateExchangeRate = 0x06,

    /// Sign an encrypted amount transfer
    SignEncryptedAmountTransfer = 0x10,

    /// Sign a transfer from the public to the encrypted balance
    SignTransferToEncrypted = 0x11,

    /// Sign a baker configuration transaction
    SignConfigureBaker = 0x18,

    /// Sign public information for an identity provider
    SignPublicInfoForIp = 0x20,

    /// Sign an update of the level 2 authorizations
    SignUpdateAuthorizations = 0x2a,

    /// Sign a transfer carrying a memo
    SignTransferWithMemo = 0x32,
}

impl Instruction {
    /// Whether this instruction releases a signature over a transaction digest
    pub fn is_signing(&self) -> bool {
        !matches!(
            self,
            Instruction::GetPublicKey | Instruction::ExportPrivateKeySeed
        )
    }
}

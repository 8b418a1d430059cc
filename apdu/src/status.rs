// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Response status words
//!
//! Every engine error is reported to the host with its own status word so a
//! host can tell a malformed request from a refusal by the user.

use num_enum::TryFromPrimitive;
use strum::{Display, EnumIter, EnumString, EnumVariantNames};

/// Status word returned in the trailer of every response APDU
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
#[repr(u16)]
pub enum StatusWord {
    /// Request accepted (final or intermediate)
    Ok = 0x9000,

    /// Fragment does not match the expected flow state, or a running counter
    /// would underflow
    InvalidState = 0x6b01,

    /// Key derivation path rejected
    InvalidPath = 0x6b02,

    /// Unsupported selector (P1/P2) value
    InvalidParam = 0x6b03,

    /// Payload failed a structural check
    InvalidTransaction = 0x6b04,

    /// A field could not be rendered for review
    DisplayOverflow = 0x6b05,

    /// Payload length does not match the fields it must carry
    InvalidLength = 0x6700,

    /// The user declined the request
    Rejected = 0x6985,

    /// Instruction code not supported by this application
    UnknownInstruction = 0x6d00,
}

impl StatusWord {
    /// Encode the status word as the two-byte response trailer
    pub fn to_bytes(&self) -> [u8; 2] {
        (*self as u16).to_be_bytes()
    }
}

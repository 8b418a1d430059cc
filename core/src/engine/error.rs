// Copyright (c) 2022-2023 The MobileCoin Foundation

use ledger_proto::ApduError;

use crate::apdu::status::StatusWord;

/// [Engine][super::Engine] errors
///
/// Every error is terminal for the in-flight flow, the engine has already
/// cleared its context by the time an error is returned.
#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "thiserror", derive(thiserror::Error))]
#[repr(u8)]
pub enum Error {
    /// Invalid argument length
    #[cfg_attr(feature = "thiserror", error("Invalid argument length"))]
    InvalidLength = 0x00,

    /// Fragment not expected in the current state
    #[cfg_attr(feature = "thiserror", error("invalid engine state"))]
    InvalidState = 0x01,

    /// Derivation path rejected
    #[cfg_attr(feature = "thiserror", error("invalid derivation path"))]
    InvalidPath = 0x02,

    /// Unsupported selector
    #[cfg_attr(feature = "thiserror", error("invalid parameter"))]
    InvalidParam = 0x03,

    /// Payload failed a structural check
    #[cfg_attr(feature = "thiserror", error("invalid transaction"))]
    InvalidTransaction = 0x04,

    /// User rejected the request
    #[cfg_attr(feature = "thiserror", error("rejected by user"))]
    ApprovalRejected = 0x05,

    /// Hash accumulator started while running
    #[cfg_attr(feature = "thiserror", error("transaction hash already initialised"))]
    AlreadyInitialized = 0x06,

    /// Instruction not supported
    #[cfg_attr(feature = "thiserror", error("unknown instruction"))]
    UnknownInstruction = 0x07,

    /// Value could not be rendered for review
    #[cfg_attr(feature = "thiserror", error("display buffer overflow"))]
    DisplayOverflow = 0x08,
}

impl Error {
    /// Fetch the status word reported to the host for this error
    pub fn status(&self) -> StatusWord {
        match self {
            Error::InvalidLength => StatusWord::InvalidLength,
            Error::InvalidState | Error::AlreadyInitialized => StatusWord::InvalidState,
            Error::InvalidPath => StatusWord::InvalidPath,
            Error::InvalidParam => StatusWord::InvalidParam,
            Error::InvalidTransaction => StatusWord::InvalidTransaction,
            Error::ApprovalRejected => StatusWord::Rejected,
            Error::UnknownInstruction => StatusWord::UnknownInstruction,
            Error::DisplayOverflow => StatusWord::DisplayOverflow,
        }
    }
}

impl From<ApduError> for Error {
    fn from(e: ApduError) -> Self {
        match e {
            ApduError::InvalidLength => Error::InvalidLength,
            _ => Error::InvalidTransaction,
        }
    }
}

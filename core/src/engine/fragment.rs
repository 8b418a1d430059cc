// Copyright (c) 2022-2023 The MobileCoin Foundation

use crate::apdu::{Instruction, MAX_FRAGMENT_LEN};

use super::Error;

/// [`Engine`][super::Engine] input fragment, one request carrying part of a
/// larger logical payload
#[derive(Clone, Debug, PartialEq)]
pub struct Fragment<'a> {
    /// Instruction code
    pub ins: u8,
    /// Fragment tag, selects the transition to attempt
    pub p1: u8,
    /// Sub-selector
    pub p2: u8,
    data: &'a [u8],
}

impl<'a> Fragment<'a> {
    /// Create a new fragment, rejecting payloads that exceed [`MAX_FRAGMENT_LEN`]
    pub fn new(ins: u8, p1: u8, p2: u8, data: &'a [u8]) -> Result<Self, Error> {
        if data.len() > MAX_FRAGMENT_LEN {
            return Err(Error::InvalidLength);
        }

        Ok(Self { ins, p1, p2, data })
    }

    /// Fetch fragment payload
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Resolve the fragment instruction
    pub fn instruction(&self) -> Result<Instruction, Error> {
        Instruction::try_from(self.ins).map_err(|_| Error::UnknownInstruction)
    }
}

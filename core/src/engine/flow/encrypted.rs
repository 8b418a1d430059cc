// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Encrypted amount transfer
//!
//! Amounts are encrypted so only the recipient can be reviewed, proofs follow
//! the initial fragment in chunks.

use num_enum::IntoPrimitive;
use strum::{Display, EnumIter};

use byteorder::{BigEndian, ByteOrder};

use crate::apdu::{header::TransactionKind, p1::EncryptedP1};
use crate::engine::{
    table::{lookup, Transition},
    Error, Fragment, Reader,
};

use super::{
    account_header, consume, recipient, show_address, signing_path, Checkpoint, Session, Step,
    SIGN_HEADER,
};

/// Length of the encrypted amounts block, ending in the proof length
pub const AMOUNTS_BLOCK_LEN: usize = 26;

#[derive(Copy, Clone, PartialEq, Debug, Default, Display, EnumIter, IntoPrimitive)]
#[repr(u8)]
pub enum EncryptedState {
    #[default]
    Initial,
    Proofs,
    Complete,
}

#[derive(Copy, Clone, PartialEq, Debug)]
enum Action {
    Init,
    Proofs,
}

pub(crate) const HEADER: &str = "Encrypted amount transfer";

const TABLE: &[Transition<EncryptedState, Action>] = &[
    Transition::new(EncryptedState::Initial, EncryptedP1::Initial as u8, Action::Init),
    Transition::new(EncryptedState::Proofs, EncryptedP1::Proofs as u8, Action::Proofs),
];

/// Encrypted amount transfer context
#[derive(Clone, Debug, Default)]
pub struct Encrypted {
    state: EncryptedState,
    remaining: u16,
}

impl Encrypted {
    pub fn state(&self) -> EncryptedState {
        self.state
    }

    /// Proof bytes still expected
    pub fn remaining(&self) -> u32 {
        self.remaining as u32
    }

    #[cfg_attr(feature = "noinline", inline(never))]
    pub fn step(&mut self, f: &Fragment, s: &mut Session) -> Result<Step, Error> {
        match lookup(TABLE, self.state, f.p1)? {
            Action::Init => {
                let mut r = Reader::new(f.data());

                signing_path(&mut r, s)?;
                s.review.start(HEADER)?;
                account_header(&mut r, TransactionKind::EncryptedAmountTransfer, s)?;

                let to = recipient(&mut r, s)?;

                let amounts = r.take(AMOUNTS_BLOCK_LEN)?;
                s.hasher.feed(amounts)?;
                r.finish()?;

                show_address("Recipient", &to, s)?;

                self.remaining = BigEndian::read_u16(&amounts[AMOUNTS_BLOCK_LEN - 2..]);
                self.state = EncryptedState::Proofs;

                Ok(Step::Review(Checkpoint::Continue))
            }
            Action::Proofs => {
                let chunk = f.data();

                self.remaining = consume(self.remaining, chunk.len())?;
                s.hasher.feed(chunk)?;

                if self.remaining > 0 {
                    return Ok(Step::More);
                }

                s.review.start(SIGN_HEADER)?;

                self.state = EncryptedState::Complete;
                Ok(Step::Review(Checkpoint::Sign))
            }
        }
    }
}

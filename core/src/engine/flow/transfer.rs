// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Simple transfer
//!
//! A single fragment carries the path, header, recipient and amount.

use num_enum::IntoPrimitive;
use strum::{Display, EnumIter};

use crate::apdu::{header::TransactionKind, p1::TransferP1};
use crate::engine::{
    table::{lookup, Transition},
    Error, Fragment, Reader,
};

use super::{account_header, amount, recipient, show_address, signing_path, Checkpoint, Session, Step};

#[derive(Copy, Clone, PartialEq, Debug, Default, Display, EnumIter, IntoPrimitive)]
#[repr(u8)]
pub enum TransferState {
    #[default]
    Initial,
    Complete,
}

#[derive(Copy, Clone, PartialEq, Debug)]
enum Action {
    Transfer,
}

pub(crate) const HEADER: &str = "Transfer";

const TABLE: &[Transition<TransferState, Action>] = &[Transition::new(
    TransferState::Initial,
    TransferP1::Initial as u8,
    Action::Transfer,
)];

/// Simple transfer context
#[derive(Clone, Debug, Default)]
pub struct Transfer {
    state: TransferState,
}

impl Transfer {
    pub fn state(&self) -> TransferState {
        self.state
    }

    #[cfg_attr(feature = "noinline", inline(never))]
    pub fn step(&mut self, f: &Fragment, s: &mut Session) -> Result<Step, Error> {
        match lookup(TABLE, self.state, f.p1)? {
            Action::Transfer => {
                let mut r = Reader::new(f.data());

                signing_path(&mut r, s)?;
                s.review.start(HEADER)?;
                account_header(&mut r, TransactionKind::Transfer, s)?;

                let to = recipient(&mut r, s)?;
                amount(&mut r, s)?;
                r.finish()?;

                show_address("Recipient", &to, s)?;

                self.state = TransferState::Complete;
                Ok(Step::Review(Checkpoint::Sign))
            }
        }
    }
}

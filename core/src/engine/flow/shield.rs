// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Transfer from the public to the encrypted balance

use num_enum::IntoPrimitive;
use strum::{Display, EnumIter};

use crate::apdu::{header::TransactionKind, p1::TransferP1};
use crate::engine::{
    table::{lookup, Transition},
    Error, Fragment, Reader,
};

use super::{account_header, amount, signing_path, Checkpoint, Session, Step};

#[derive(Copy, Clone, PartialEq, Debug, Default, Display, EnumIter, IntoPrimitive)]
#[repr(u8)]
pub enum ShieldState {
    #[default]
    Initial,
    Complete,
}

#[derive(Copy, Clone, PartialEq, Debug)]
enum Action {
    Shield,
}

pub(crate) const HEADER: &str = "Shield amount";

const TABLE: &[Transition<ShieldState, Action>] = &[Transition::new(
    ShieldState::Initial,
    TransferP1::Initial as u8,
    Action::Shield,
)];

/// Transfer to encrypted context
#[derive(Clone, Debug, Default)]
pub struct Shield {
    state: ShieldState,
}

impl Shield {
    pub fn state(&self) -> ShieldState {
        self.state
    }

    pub fn step(&mut self, f: &Fragment, s: &mut Session) -> Result<Step, Error> {
        match lookup(TABLE, self.state, f.p1)? {
            Action::Shield => {
                let mut r = Reader::new(f.data());

                signing_path(&mut r, s)?;
                s.review.start(HEADER)?;
                account_header(&mut r, TransactionKind::TransferToEncrypted, s)?;
                amount(&mut r, s)?;
                r.finish()?;

                self.state = ShieldState::Complete;
                Ok(Step::Review(Checkpoint::Sign))
            }
        }
    }
}

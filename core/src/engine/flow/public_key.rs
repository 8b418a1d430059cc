// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Public key request

use num_enum::IntoPrimitive;
use strum::{Display, EnumIter};

use crate::apdu::p1::PublicKeyP1;
use crate::engine::{
    table::{lookup, Transition},
    Error, Fragment, Reader,
};
use crate::helpers::fmt_path;

use super::{signing_path, Checkpoint, Session, Step};

#[derive(Copy, Clone, PartialEq, Debug, Default, Display, EnumIter, IntoPrimitive)]
#[repr(u8)]
pub enum PublicKeyState {
    #[default]
    Initial,
    Complete,
}

#[derive(Copy, Clone, PartialEq, Debug)]
enum Action {
    Confirm,
    Silent,
}

pub(crate) const HEADER: &str = "Public key";

const TABLE: &[Transition<PublicKeyState, Action>] = &[
    Transition::new(PublicKeyState::Initial, PublicKeyP1::Confirm as u8, Action::Confirm),
    Transition::new(PublicKeyState::Initial, PublicKeyP1::Silent as u8, Action::Silent),
];

/// Public key request context
#[derive(Clone, Debug, Default)]
pub struct PublicKey {
    state: PublicKeyState,
}

impl PublicKey {
    pub fn state(&self) -> PublicKeyState {
        self.state
    }

    pub fn step(&mut self, f: &Fragment, s: &mut Session) -> Result<Step, Error> {
        let action = lookup(TABLE, self.state, f.p1)?;

        let mut r = Reader::new(f.data());
        signing_path(&mut r, s)?;
        r.finish()?;

        self.state = PublicKeyState::Complete;

        match action {
            Action::Confirm => {
                let path = s.path.clone().ok_or(Error::InvalidPath)?;

                s.review.start(HEADER)?;
                s.review.push_with("Path", |b| fmt_path(path.indices(), b))?;

                Ok(Step::Review(Checkpoint::PublicKey))
            }
            Action::Silent => Ok(Step::Release(Checkpoint::PublicKey)),
        }
    }
}

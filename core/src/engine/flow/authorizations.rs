// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Update authorizations
//!
//! A list of keys followed by six access structures, each a set of key
//! indices and a threshold.

use num_enum::IntoPrimitive;
use strum::{Display, EnumIter};

use crate::apdu::{header::UpdateType, p1::AuthorizationsP1};
use crate::engine::{
    table::{lookup, Transition},
    Error, Fragment, Reader,
};
use crate::helpers::{fmt_hex, fmt_u64};

use super::{consume, signing_path, update_header, Checkpoint, Session, Step};

/// Access structures, in transaction order
pub const ACCESS_STRUCTURES: [&str; 6] = [
    "Emergency",
    "Authorization",
    "Protocol",
    "Election difficulty",
    "Euro per energy",
    "Micro GTU per euro",
];

pub(crate) const HEADER: &str = "Update authorizations";

#[derive(Copy, Clone, PartialEq, Debug, Default, Display, EnumIter, IntoPrimitive)]
#[repr(u8)]
pub enum AuthorizationsState {
    #[default]
    Initial,
    PublicKey,
    AccessStructureSize,
    AccessStructureIndices,
    AccessStructureThreshold,
    Complete,
}

#[derive(Copy, Clone, PartialEq, Debug)]
enum Action {
    Init,
    Key,
    Size,
    Indices,
    Threshold,
}

const TABLE: &[Transition<AuthorizationsState, Action>] = &[
    Transition::new(AuthorizationsState::Initial, AuthorizationsP1::Initial as u8, Action::Init),
    Transition::new(
        AuthorizationsState::PublicKey,
        AuthorizationsP1::PublicKey as u8,
        Action::Key,
    ),
    Transition::new(
        AuthorizationsState::AccessStructureSize,
        AuthorizationsP1::AccessStructureSize as u8,
        Action::Size,
    ),
    Transition::new(
        AuthorizationsState::AccessStructureIndices,
        AuthorizationsP1::AccessStructureIndices as u8,
        Action::Indices,
    ),
    Transition::new(
        AuthorizationsState::AccessStructureThreshold,
        AuthorizationsP1::AccessStructureThreshold as u8,
        Action::Threshold,
    ),
];

/// Update authorizations context
#[derive(Clone, Debug, Default)]
pub struct Authorizations {
    state: AuthorizationsState,
    key_count: u16,
    keys: u16,
    structure: usize,
    size: u16,
    indices: u16,
}

impl Authorizations {
    pub fn state(&self) -> AuthorizationsState {
        self.state
    }

    /// Keys or key indices still expected
    pub fn remaining(&self) -> u32 {
        match self.state {
            AuthorizationsState::PublicKey => (self.key_count - self.keys) as u32,
            AuthorizationsState::AccessStructureIndices => self.indices as u32,
            _ => 0,
        }
    }

    #[cfg_attr(feature = "noinline", inline(never))]
    pub fn step(&mut self, f: &Fragment, s: &mut Session) -> Result<Step, Error> {
        let mut r = Reader::new(f.data());

        match lookup(TABLE, self.state, f.p1)? {
            Action::Init => {
                signing_path(&mut r, s)?;
                update_header(&mut r, &[UpdateType::Authorizations], s)?;

                let count = r.u16()?;
                r.finish()?;

                if count == 0 {
                    return Err(Error::InvalidTransaction);
                }
                s.hasher.feed(&count.to_be_bytes())?;

                self.key_count = count;
                self.keys = 0;
                self.structure = 0;
                self.state = AuthorizationsState::PublicKey;

                Ok(Step::More)
            }
            Action::Key => {
                let scheme = r.u8()?;
                let key = r.array::<32>()?;
                r.finish()?;

                if scheme != 0 {
                    return Err(Error::InvalidTransaction);
                }
                s.hasher.feed(f.data())?;

                let index = self.keys;

                s.review.start(HEADER)?;
                s.review.push_with("Key index", |b| fmt_u64(index as u64, b))?;
                s.review.push_with("Public key", |b| fmt_hex(&key, b))?;

                self.keys += 1;
                if self.keys == self.key_count {
                    self.state = AuthorizationsState::AccessStructureSize;
                }

                Ok(Step::Review(Checkpoint::Continue))
            }
            Action::Size => {
                let size = r.u16()?;
                r.finish()?;

                if size == 0 {
                    return Err(Error::InvalidTransaction);
                }
                s.hasher.feed(&size.to_be_bytes())?;

                self.size = size;
                self.indices = size;
                self.state = AuthorizationsState::AccessStructureIndices;

                Ok(Step::More)
            }
            Action::Indices => {
                let chunk = r.rest();
                if chunk.len() % 2 != 0 {
                    return Err(Error::InvalidLength);
                }

                self.indices = consume(self.indices, chunk.len() / 2)?;

                let mut r = Reader::new(chunk);
                while r.position() < chunk.len() {
                    if r.u16()? >= self.key_count {
                        return Err(Error::InvalidTransaction);
                    }
                }
                s.hasher.feed(chunk)?;

                if self.indices == 0 {
                    self.state = AuthorizationsState::AccessStructureThreshold;
                }

                Ok(Step::More)
            }
            Action::Threshold => {
                let threshold = r.u16()?;
                r.finish()?;

                if threshold == 0 || threshold > self.size {
                    return Err(Error::InvalidTransaction);
                }
                s.hasher.feed(&threshold.to_be_bytes())?;

                let name = ACCESS_STRUCTURES
                    .get(self.structure)
                    .ok_or(Error::InvalidState)?;
                let size = self.size;

                s.review.start(HEADER)?;
                s.review.push("Access structure", name)?;
                s.review.push_with("Keys", |b| fmt_u64(size as u64, b))?;
                s.review
                    .push_with("Threshold", |b| fmt_u64(threshold as u64, b))?;

                self.structure += 1;
                if self.structure < ACCESS_STRUCTURES.len() {
                    self.state = AuthorizationsState::AccessStructureSize;
                    return Ok(Step::Review(Checkpoint::Continue));
                }

                self.state = AuthorizationsState::Complete;
                Ok(Step::Review(Checkpoint::Sign))
            }
        }
    }
}

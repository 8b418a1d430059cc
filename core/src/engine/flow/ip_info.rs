// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Public information for an identity provider
//!
//! Like credential deployment there is no account header, the hash covers
//! the credential public key, registration id, keys and threshold.

use num_enum::IntoPrimitive;
use strum::{Display, EnumIter};

use crate::apdu::p1::IpInfoP1;
use crate::engine::{
    table::{lookup, Transition},
    Error, Fragment, Reader,
};
use crate::helpers::{fmt_hex, fmt_u64};

use super::{signing_path, Checkpoint, Session, Step};

/// IdCredPub / RegId length
pub const ID_CRED_PUB_LEN: usize = 48;

pub(crate) const HEADER: &str = "Public info for IP";

#[derive(Copy, Clone, PartialEq, Debug, Default, Display, EnumIter, IntoPrimitive)]
#[repr(u8)]
pub enum IpInfoState {
    #[default]
    Initial,
    VerificationKey,
    Threshold,
    Complete,
}

#[derive(Copy, Clone, PartialEq, Debug)]
enum Action {
    Init,
    Key,
    Threshold,
}

const TABLE: &[Transition<IpInfoState, Action>] = &[
    Transition::new(IpInfoState::Initial, IpInfoP1::Initial as u8, Action::Init),
    Transition::new(
        IpInfoState::VerificationKey,
        IpInfoP1::VerificationKey as u8,
        Action::Key,
    ),
    Transition::new(IpInfoState::Threshold, IpInfoP1::Threshold as u8, Action::Threshold),
];

/// Identity provider public info context
#[derive(Clone, Debug, Default)]
pub struct IpInfo {
    state: IpInfoState,
    key_count: u8,
    keys: u8,
}

impl IpInfo {
    pub fn state(&self) -> IpInfoState {
        self.state
    }

    /// Keys still expected
    pub fn remaining(&self) -> u32 {
        match self.state {
            IpInfoState::VerificationKey => self.keys as u32,
            _ => 0,
        }
    }

    #[cfg_attr(feature = "noinline", inline(never))]
    pub fn step(&mut self, f: &Fragment, s: &mut Session) -> Result<Step, Error> {
        let mut r = Reader::new(f.data());

        match lookup(TABLE, self.state, f.p1)? {
            Action::Init => {
                signing_path(&mut r, s)?;

                let start = r.position();
                let id_cred_pub = r.array::<ID_CRED_PUB_LEN>()?;
                let reg_id = r.array::<ID_CRED_PUB_LEN>()?;
                let count = r.u8()?;
                r.finish()?;

                if count == 0 {
                    return Err(Error::InvalidTransaction);
                }

                s.hasher.start()?;
                s.hasher.feed(r.span(start))?;

                s.review.start(HEADER)?;
                s.review.push_with("IdCredPub", |b| fmt_hex(&id_cred_pub, b))?;
                s.review.push_with("RegId", |b| fmt_hex(&reg_id, b))?;

                self.key_count = count;
                self.keys = count;
                self.state = IpInfoState::VerificationKey;

                Ok(Step::Review(Checkpoint::Continue))
            }
            Action::Key => {
                let index = r.u8()?;
                let scheme = r.u8()?;
                let key = r.array::<32>()?;
                r.finish()?;

                if scheme != 0 {
                    return Err(Error::InvalidTransaction);
                }
                s.hasher.feed(f.data())?;

                s.review.start(HEADER)?;
                s.review.push_with("Key index", |b| fmt_u64(index as u64, b))?;
                s.review.push_with("Public key", |b| fmt_hex(&key, b))?;

                self.keys -= 1;
                if self.keys == 0 {
                    self.state = IpInfoState::Threshold;
                }

                Ok(Step::Review(Checkpoint::Continue))
            }
            Action::Threshold => {
                let threshold = r.u8()?;
                r.finish()?;

                if threshold == 0 || threshold > self.key_count {
                    return Err(Error::InvalidTransaction);
                }
                s.hasher.feed(&[threshold])?;

                s.review.start(HEADER)?;
                s.review
                    .push_with("Threshold", |b| fmt_u64(threshold as u64, b))?;

                self.state = IpInfoState::Complete;
                Ok(Step::Review(Checkpoint::Sign))
            }
        }
    }
}

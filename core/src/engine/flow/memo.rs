// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Transfer with memo
//!
//! The initial fragment carries the path, header, recipient and memo length,
//! followed by memo chunks and a final amount fragment. The first memo chunk
//! (holding the CBOR header) is tracked apart from its continuations.

use heapless::Vec;
use num_enum::IntoPrimitive;
use strum::{Display, EnumIter};

use crate::apdu::{header::TransactionKind, p1::MemoP1};
use crate::engine::{
    table::{lookup, Transition},
    Error, Fragment, Reader,
};
use crate::helpers::fmt_memo;

use super::{
    account_header, amount, consume, recipient, show_address, signing_path, Checkpoint, Session,
    Step,
};

/// Maximum memo length
pub const MAX_MEMO_LEN: usize = 256;

pub(crate) const HEADER: &str = "Transfer with memo";

#[derive(Copy, Clone, PartialEq, Debug, Default, Display, EnumIter, IntoPrimitive)]
#[repr(u8)]
pub enum MemoState {
    #[default]
    Initial,
    MemoInitial,
    Memo,
    Amount,
    Complete,
}

#[derive(Copy, Clone, PartialEq, Debug)]
enum Action {
    Init,
    Memo,
    Amount,
}

const TABLE: &[Transition<MemoState, Action>] = &[
    Transition::new(MemoState::Initial, MemoP1::InitialWithMemo as u8, Action::Init),
    Transition::new(MemoState::MemoInitial, MemoP1::Memo as u8, Action::Memo),
    Transition::new(MemoState::Memo, MemoP1::Memo as u8, Action::Memo),
    Transition::new(MemoState::Amount, MemoP1::Amount as u8, Action::Amount),
];

/// Transfer with memo context
#[derive(Clone, Debug, Default)]
pub struct Memo {
    state: MemoState,
    remaining: u16,
    memo: Vec<u8, MAX_MEMO_LEN>,
}

impl Memo {
    pub fn state(&self) -> MemoState {
        self.state
    }

    /// Memo bytes still expected
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
                account_header(&mut r, TransactionKind::TransferWithMemo, s)?;

                let to = recipient(&mut r, s)?;
                let memo_len = r.u16()?;
                r.finish()?;

                if memo_len as usize > MAX_MEMO_LEN {
                    return Err(Error::InvalidTransaction);
                }
                s.hasher.feed(&memo_len.to_be_bytes())?;

                show_address("Recipient", &to, s)?;

                self.remaining = memo_len;
                self.memo.clear();
                self.state = MemoState::MemoInitial;

                Ok(Step::Review(Checkpoint::Continue))
            }
            Action::Memo => {
                let chunk = f.data();

                self.remaining = consume(self.remaining, chunk.len())?;
                self.memo
                    .extend_from_slice(chunk)
                    .map_err(|_| Error::InvalidState)?;
                s.hasher.feed(chunk)?;

                if self.remaining > 0 {
                    self.state = MemoState::Memo;
                    return Ok(Step::More);
                }

                s.review.start(HEADER)?;
                let memo = &self.memo;
                s.review.push_with("Memo", |b| fmt_memo(memo, b))?;

                self.state = MemoState::Amount;
                Ok(Step::Review(Checkpoint::Continue))
            }
            Action::Amount => {
                let mut r = Reader::new(f.data());

                s.review.start(HEADER)?;
                amount(&mut r, s)?;
                r.finish()?;

                self.state = MemoState::Complete;
                Ok(Step::Review(Checkpoint::Sign))
            }
        }
    }
}

// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Configure baker
//!
//! The initial fragment carries a presence bitmap, stages with no fields
//! present are skipped. Review fields accumulate across stages and are shown
//! once all stages are complete.

use core::str::from_utf8;

use heapless::Vec;
use num_enum::IntoPrimitive;
use strum::{Display, EnumIter};

use crate::apdu::{
    baker::{
        BakerFields, OpenStatus, AGGREGATION_KEY_LEN, KEY_PROOF_LEN, MAX_URL_LEN, VERIFY_KEY_LEN,
    },
    header::TransactionKind,
    p1::BakerP1,
};
use crate::engine::{
    review::VALUE_LEN,
    table::{lookup, Transition},
    Error, Fragment, Reader,
};
use crate::helpers::{fmt_amount, fmt_hex, fmt_percent, fmt_truncated};

use super::{account_header, consume, signing_path, Checkpoint, Session, Step};

/// Retained URL prefix, one past the display so truncation is detected
const URL_PREVIEW_LEN: usize = VALUE_LEN + 1;

#[derive(Copy, Clone, PartialEq, Debug, Default, Display, EnumIter, IntoPrimitive)]
#[repr(u8)]
pub enum BakerState {
    #[default]
    Initial,
    FirstBatch,
    AggregationKey,
    UrlLength,
    Url,
    CommissionRates,
    Complete,
}

#[derive(Copy, Clone, PartialEq, Debug)]
enum Action {
    Init,
    FirstBatch,
    AggregationKey,
    UrlLength,
    Url,
    Commissions,
}

pub(crate) const HEADER: &str = "Configure baker";

const TABLE: &[Transition<BakerState, Action>] = &[
    Transition::new(BakerState::Initial, BakerP1::Initial as u8, Action::Init),
    Transition::new(BakerState::FirstBatch, BakerP1::FirstBatch as u8, Action::FirstBatch),
    Transition::new(
        BakerState::AggregationKey,
        BakerP1::AggregationKey as u8,
        Action::AggregationKey,
    ),
    Transition::new(BakerState::UrlLength, BakerP1::UrlLength as u8, Action::UrlLength),
    Transition::new(BakerState::Url, BakerP1::Url as u8, Action::Url),
    Transition::new(
        BakerState::CommissionRates,
        BakerP1::CommissionRates as u8,
        Action::Commissions,
    ),
];

/// Stages following the initial fragment, in transaction order
const STAGES: &[BakerState] = &[
    BakerState::FirstBatch,
    BakerState::AggregationKey,
    BakerState::UrlLength,
    BakerState::CommissionRates,
];

/// Configure baker context
#[derive(Clone, Debug)]
pub struct Baker {
    state: BakerState,
    fields: BakerFields,
    remaining: u16,
    url: Vec<u8, URL_PREVIEW_LEN>,
}

impl Default for Baker {
    fn default() -> Self {
        Self {
            state: BakerState::Initial,
            fields: BakerFields::empty(),
            remaining: 0,
            url: Vec::new(),
        }
    }
}

impl Baker {
    pub fn state(&self) -> BakerState {
        self.state
    }

    /// URL bytes still expected
    pub fn remaining(&self) -> u32 {
        self.remaining as u32
    }

    #[cfg_attr(feature = "noinline", inline(never))]
    pub fn step(&mut self, f: &Fragment, s: &mut Session) -> Result<Step, Error> {
        let mut r = Reader::new(f.data());

        match lookup(TABLE, self.state, f.p1)? {
            Action::Init => {
                signing_path(&mut r, s)?;
                s.review.start(HEADER)?;
                account_header(&mut r, TransactionKind::ConfigureBaker, s)?;

                let start = r.position();
                let fields: BakerFields = r.decode()?;
                r.finish()?;

                s.hasher.feed(r.span(start))?;

                self.fields = fields;
                Ok(self.advance(BakerState::Initial))
            }
            Action::FirstBatch => {
                if self.fields.contains(BakerFields::CAPITAL) {
                    let capital = r.u64()?;
                    s.review
                        .push_with("Stake (GTU)", |b| fmt_amount(capital, b))?;
                }

                if self.fields.contains(BakerFields::RESTAKE_EARNINGS) {
                    let restake = match r.u8()? {
                        0 => "No",
                        1 => "Yes",
                        _ => return Err(Error::InvalidTransaction),
                    };
                    s.review.push("Restake earnings", restake)?;
                }

                if self.fields.contains(BakerFields::OPEN_FOR_DELEGATION) {
                    let status =
                        OpenStatus::try_from(r.u8()?).map_err(|_| Error::InvalidTransaction)?;
                    s.review.push("Pool status", status.label())?;
                }

                if self.fields.contains(BakerFields::SIGNATURE_KEY) {
                    let key = r.take(VERIFY_KEY_LEN)?;
                    let _proof = r.take(KEY_PROOF_LEN)?;
                    s.review.push_with("Signature key", |b| fmt_hex(key, b))?;
                }

                if self.fields.contains(BakerFields::ELECTION_KEY) {
                    let key = r.take(VERIFY_KEY_LEN)?;
                    let _proof = r.take(KEY_PROOF_LEN)?;
                    s.review.push_with("Election key", |b| fmt_hex(key, b))?;
                }

                r.finish()?;
                s.hasher.feed(f.data())?;

                Ok(self.advance(BakerState::FirstBatch))
            }
            Action::AggregationKey => {
                let key = r.take(AGGREGATION_KEY_LEN)?;
                let _proof = r.take(KEY_PROOF_LEN)?;
                r.finish()?;

                s.hasher.feed(f.data())?;
                s.review.push_with("Aggregation key", |b| fmt_hex(key, b))?;

                Ok(self.advance(BakerState::AggregationKey))
            }
            Action::UrlLength => {
                let len = r.u16()?;
                r.finish()?;

                if len > MAX_URL_LEN {
                    return Err(Error::InvalidTransaction);
                }
                s.hasher.feed(&len.to_be_bytes())?;

                self.remaining = len;
                self.url.clear();
                self.state = BakerState::Url;

                Ok(Step::More)
            }
            Action::Url => {
                let chunk = r.rest();

                self.remaining = consume(self.remaining, chunk.len())?;
                s.hasher.feed(chunk)?;

                let n = chunk.len().min(self.url.capacity() - self.url.len());
                self.url
                    .extend_from_slice(&chunk[..n])
                    .map_err(|_| Error::InvalidState)?;

                if self.remaining > 0 {
                    return Ok(Step::More);
                }

                // Invalid UTF-8 is only tolerated where the preview cut a character
                let url = match from_utf8(&self.url) {
                    Ok(u) => u,
                    Err(e) if e.error_len().is_none() => {
                        from_utf8(&self.url[..e.valid_up_to()]).map_err(|_| Error::InvalidTransaction)?
                    }
                    Err(_) => return Err(Error::InvalidTransaction),
                };
                s.review.push_with("URL", |b| fmt_truncated(url, b))?;

                Ok(self.advance(BakerState::Url))
            }
            Action::Commissions => {
                let rates = [
                    (BakerFields::TRANSACTION_FEE_COMMISSION, "Transaction fee"),
                    (BakerFields::BAKING_REWARD_COMMISSION, "Baking reward"),
                    (BakerFields::FINALIZATION_REWARD_COMMISSION, "Finalization reward"),
                ];

                for (flag, label) in rates {
                    if self.fields.contains(flag) {
                        let parts = r.u32()?;
                        s.review.push_with(label, |b| fmt_percent(parts, b))?;
                    }
                }

                r.finish()?;
                s.hasher.feed(f.data())?;

                Ok(self.advance(BakerState::CommissionRates))
            }
        }
    }

    /// Move to the next stage with fields present, or complete
    fn advance(&mut self, from: BakerState) -> Step {
        // The URL body belongs to the length stage
        let from = match from {
            BakerState::Url => BakerState::UrlLength,
            s => s,
        };

        let skip = match STAGES.iter().position(|s| *s == from) {
            Some(i) => i + 1,
            None => 0,
        };

        let next = STAGES
            .iter()
            .skip(skip)
            .find(|s| self.fields.intersects(stage_fields(**s)));

        match next {
            Some(s) => {
                self.state = *s;
                Step::More
            }
            None => {
                self.state = BakerState::Complete;
                Step::Review(Checkpoint::Sign)
            }
        }
    }
}

/// Bitmap fields carried by a stage
fn stage_fields(s: BakerState) -> BakerFields {
    match s {
        BakerState::FirstBatch => BakerFields::FIRST_BATCH,
        BakerState::AggregationKey => BakerFields::AGGREGATION_KEY,
        BakerState::UrlLength | BakerState::Url => BakerFields::METADATA_URL,
        BakerState::CommissionRates => BakerFields::COMMISSIONS,
        _ => BakerFields::empty(),
    }
}

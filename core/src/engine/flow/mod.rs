// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Per-instruction flows
//!
//! Each flow consumes fragments through its transition table, feeding the
//! session hash in canonical transaction order and building the review shown
//! at its checkpoints.

use crate::{
    apdu::header::{AccountTransactionHeader, TransactionKind, UpdateHeader, UpdateType},
    helpers::{fmt_address, fmt_amount},
};

use super::{Error, KeyPath, Reader, Review, TxHasher};

pub mod baker;
pub mod credential;
pub mod encrypted;
pub mod ip_info;
pub mod memo;
pub mod public_key;
pub mod schedule;
pub mod shield;
pub mod transfer;

#[cfg(feature = "export")]
pub mod export;

#[cfg(feature = "updates")]
pub mod authorizations;
#[cfg(feature = "updates")]
pub mod exchange_rate;

/// Amount review label
pub const AMOUNT_LABEL: &str = "Amount (GTU)";

/// Header for sign-only reviews
pub const SIGN_HEADER: &str = "Sign transaction";

/// Approval checkpoints, naming what an approval releases
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum Checkpoint {
    /// Resume fragment intake
    Continue,
    /// Sign the sealed transaction hash
    Sign,
    /// Release exported key seeds
    Export,
    /// Release the public key
    PublicKey,
}

/// Result of a flow step
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum Step {
    /// Fragment accepted, more expected
    More,
    /// Review ready, approval required
    Review(Checkpoint),
    /// Complete without approval
    Release(Checkpoint),
}

/// Per-sequence state shared by all flows
pub struct Session {
    pub hasher: TxHasher,
    pub review: Review,
    pub path: Option<KeyPath>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub const fn new() -> Self {
        Self {
            hasher: TxHasher::new(),
            review: Review::new(),
            path: None,
        }
    }

    /// Discard hash, review and path
    pub fn clear(&mut self) {
        self.hasher.clear();
        self.review.clear();
        self.path = None;
    }
}

/// Read and validate a signing path
pub(crate) fn signing_path(r: &mut Reader, s: &mut Session) -> Result<(), Error> {
    let raw = r.path()?;
    s.path = Some(KeyPath::signing(&raw)?);
    Ok(())
}

/// Read an account transaction header and kind, start the hash and show the sender
pub(crate) fn account_header(
    r: &mut Reader,
    kind: TransactionKind,
    s: &mut Session,
) -> Result<(), Error> {
    let start = r.position();

    let header: AccountTransactionHeader = r.decode()?;
    if r.u8()? != kind as u8 {
        return Err(Error::InvalidTransaction);
    }

    s.hasher.start()?;
    s.hasher.feed(r.span(start))?;

    show_address("Sender", &header.sender, s)
}

/// Read an update header and type, start the hash and return the update type
pub(crate) fn update_header(
    r: &mut Reader,
    accepted: &[UpdateType],
    s: &mut Session,
) -> Result<UpdateType, Error> {
    let start = r.position();

    let _header: UpdateHeader = r.decode()?;
    let kind = UpdateType::try_from(r.u8()?).map_err(|_| Error::InvalidTransaction)?;
    if !accepted.contains(&kind) {
        return Err(Error::InvalidTransaction);
    }

    s.hasher.start()?;
    s.hasher.feed(r.span(start))?;

    Ok(kind)
}

/// Read and hash a recipient address
pub(crate) fn recipient(r: &mut Reader, s: &mut Session) -> Result<[u8; 32], Error> {
    let to = r.array::<32>()?;
    s.hasher.feed(&to)?;
    Ok(to)
}

/// Show an account address
pub(crate) fn show_address(label: &str, address: &[u8; 32], s: &mut Session) -> Result<(), Error> {
    s.review.push_with(label, |b| fmt_address(address, b))
}

/// Read, hash and show a micro-GTU amount
pub(crate) fn amount(r: &mut Reader, s: &mut Session) -> Result<(), Error> {
    let v = r.u64()?;
    s.hasher.feed(&v.to_be_bytes())?;

    s.review.push_with(AMOUNT_LABEL, |b| fmt_amount(v, b))
}

/// Subtract a received chunk from a remaining-byte counter
pub(crate) fn consume<T>(remaining: T, n: usize) -> Result<T, Error>
where
    T: TryFrom<usize> + core::ops::Sub<Output = T> + PartialOrd + Copy,
{
    let n = T::try_from(n).map_err(|_| Error::InvalidState)?;
    if n > remaining {
        return Err(Error::InvalidState);
    }
    Ok(remaining - n)
}

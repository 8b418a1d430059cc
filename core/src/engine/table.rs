// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Per-instruction transition tables
//!
//! Each flow lists the `(state, tag)` pairs it accepts along with the action
//! to run. Lookup happens before a fragment is read, so an unlisted pair
//! fails without touching the hash or the review.

use super::Error;

/// A single accepted transition
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Transition<S, A> {
    pub state: S,
    pub tag: u8,
    pub action: A,
}

impl<S, A> Transition<S, A> {
    pub const fn new(state: S, tag: u8, action: A) -> Self {
        Self { state, tag, action }
    }
}

/// Resolve the action for a `(state, tag)` pair
pub fn lookup<S: Copy + PartialEq, A: Copy>(
    table: &[Transition<S, A>],
    state: S,
    tag: u8,
) -> Result<A, Error> {
    match table.iter().find(|t| t.state == state && t.tag == tag) {
        Some(t) => Ok(t.action),
        None => {
            #[cfg(feature = "log")]
            log::error!("unexpected fragment tag {:#04x}", tag);

            Err(Error::InvalidState)
        }
    }
}

/// Check a table lists each `(state, tag)` pair at most once
pub fn is_deterministic<S: Copy + PartialEq, A>(table: &[Transition<S, A>]) -> bool {
    table.iter().enumerate().all(|(i, a)| {
        table[i + 1..]
            .iter()
            .all(|b| a.state != b.state || a.tag != b.tag)
    })
}

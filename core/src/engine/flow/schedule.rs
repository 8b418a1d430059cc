// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Transfer with schedule
//!
//! The initial fragment carries the path, header, recipient and number of
//! scheduled releases. Releases follow as `(timestamp, amount)` pairs, each
//! fragment holding [`MAX_RELEASES_PER_FRAGMENT`] pairs or whatever remains.

use num_enum::IntoPrimitive;
use strum::{Display, EnumIter};

use crate::apdu::{header::TransactionKind, p1::ScheduleP1};
use crate::engine::{
    review::{LABEL_LEN, MAX_FIELDS},
    table::{lookup, Transition},
    Error, Fragment, Reader,
};
use crate::helpers::{fmt_numbered, fmt_release, fmt_u64};

use super::{
    account_header, consume, recipient, show_address, signing_path, Checkpoint, Session, Step,
};

/// Encoded release length, timestamp (u64 ms) and amount (u64 micro-GTU)
pub const RELEASE_LEN: usize = 16;

/// Releases carried by a full fragment
pub const MAX_RELEASES_PER_FRAGMENT: usize = 15;

static_assertions::const_assert!(
    RELEASE_LEN * MAX_RELEASES_PER_FRAGMENT <= crate::apdu::MAX_FRAGMENT_LEN
);
static_assertions::const_assert!(MAX_RELEASES_PER_FRAGMENT <= MAX_FIELDS);

pub(crate) const HEADER: &str = "Transfer with schedule";

#[derive(Copy, Clone, PartialEq, Debug, Default, Display, EnumIter, IntoPrimitive)]
#[repr(u8)]
pub enum ScheduleState {
    #[default]
    Initial,
    Releases,
    Complete,
}

#[derive(Copy, Clone, PartialEq, Debug)]
enum Action {
    Init,
    Releases,
}

const TABLE: &[Transition<ScheduleState, Action>] = &[
    Transition::new(ScheduleState::Initial, ScheduleP1::Initial as u8, Action::Init),
    Transition::new(
        ScheduleState::Releases,
        ScheduleP1::Releases as u8,
        Action::Releases,
    ),
];

/// Transfer with schedule context
#[derive(Clone, Debug, Default)]
pub struct Schedule {
    state: ScheduleState,
    remaining: u8,
    released: u8,
    last_release: u64,
}

impl Schedule {
    pub fn state(&self) -> ScheduleState {
        self.state
    }

    /// Releases still expected
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
                account_header(&mut r, TransactionKind::TransferWithSchedule, s)?;

                let to = recipient(&mut r, s)?;
                let count = r.u8()?;
                r.finish()?;

                if count == 0 {
                    return Err(Error::InvalidTransaction);
                }
                s.hasher.feed(&[count])?;

                show_address("Recipient", &to, s)?;
                s.review
                    .push_with("Releases", |b| fmt_u64(count as u64, b))?;

                self.remaining = count;
                self.released = 0;
                self.last_release = 0;
                self.state = ScheduleState::Releases;

                Ok(Step::Review(Checkpoint::Continue))
            }
            Action::Releases => {
                let data = f.data();
                if data.len() % RELEASE_LEN != 0 {
                    return Err(Error::InvalidLength);
                }

                let count = data.len() / RELEASE_LEN;
                let remaining = consume(self.remaining, count)?;

                // Only the final fragment may carry a partial batch
                let expected = (self.remaining as usize).min(MAX_RELEASES_PER_FRAGMENT);
                if count != expected {
                    return Err(Error::InvalidLength);
                }

                s.review.start(HEADER)?;

                for _ in 0..count {
                    let timestamp = r.u64()?;
                    let amount = r.u64()?;

                    // Release times must be strictly increasing
                    if self.released > 0 && timestamp <= self.last_release {
                        return Err(Error::InvalidTransaction);
                    }

                    self.released += 1;
                    self.last_release = timestamp;

                    let mut label = [0u8; LABEL_LEN];
                    let label = fmt_numbered("Release ", self.released as u32, &mut label)?;
                    s.review
                        .push_with(label, |b| fmt_release(amount, timestamp, b))?;
                }
                r.finish()?;

                s.hasher.feed(data)?;
                self.remaining = remaining;

                if self.remaining > 0 {
                    return Ok(Step::Review(Checkpoint::Continue));
                }

                self.state = ScheduleState::Complete;
                Ok(Step::Review(Checkpoint::Sign))
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{apdu::Instruction, engine::flow::test::*};

    const INS: u8 = Instruction::SignTransferWithSchedule as u8;

    /// First release, 2023-11-14 22:13:20 UTC
    const START: u64 = 1_700_000_000_000;

    #[test]
    fn illegal_transitions() {
        sweep_illegal(INS, TABLE, |state, f, s| {
            Schedule {
                state,
                remaining: 1,
                ..Default::default()
            }
            .step(f, s)
        });
    }

    fn frag(p1: ScheduleP1, data: &[u8]) -> Fragment {
        Fragment::new(INS, p1 as u8, 0x00, data).unwrap()
    }

    fn init(c: &mut Schedule, s: &mut Session, count: u8) -> Result<Step, Error> {
        let header = header_bytes(TransactionKind::TransferWithSchedule as u8);
        let data = payload(&[PATH, &header, &[0x22; 32], &[count]]);

        c.step(&frag(ScheduleP1::Initial, &data), s)
    }

    /// Encode `n` releases one hour apart, starting at release `first`
    fn releases(first: u64, n: usize) -> Payload {
        let mut p = Payload::new();
        for i in 0..n as u64 {
            let timestamp = START + (first + i) * 3_600_000;
            let amount = (first + i + 1) * 1_000_000;
            p.extend_from_slice(&timestamp.to_be_bytes()).unwrap();
            p.extend_from_slice(&amount.to_be_bytes()).unwrap();
        }
        p
    }

    #[test]
    fn transfer_with_schedule() {
        let mut s = Session::new();
        let mut c = Schedule::default();

        assert_eq!(init(&mut c, &mut s, 17), Ok(Step::Review(Checkpoint::Continue)));
        assert_eq!(s.review.header(), HEADER);
        assert_eq!(s.review.get("Releases"), Some("17"));
        assert!(s.review.get("Recipient").is_some());
        assert_eq!(c.remaining(), 17);

        let first = releases(0, MAX_RELEASES_PER_FRAGMENT);
        assert_eq!(
            c.step(&frag(ScheduleP1::Releases, &first), &mut s),
            Ok(Step::Review(Checkpoint::Continue))
        );
        assert_eq!(s.review.fields().len(), MAX_RELEASES_PER_FRAGMENT);
        assert_eq!(
            s.review.get("Release 1"),
            Some("1 GTU at 2023-11-14 22:13:20")
        );
        assert_eq!(
            s.review.get("Release 15"),
            Some("15 GTU at 2023-11-15 12:13:20")
        );
        assert_eq!(c.remaining(), 2);
        assert_eq!(c.state(), ScheduleState::Releases);

        let last = releases(15, 2);
        assert_eq!(
            c.step(&frag(ScheduleP1::Releases, &last), &mut s),
            Ok(Step::Review(Checkpoint::Sign))
        );
        assert_eq!(s.review.fields().len(), 2);
        assert_eq!(
            s.review.get("Release 17"),
            Some("17 GTU at 2023-11-15 14:13:20")
        );
        assert_eq!(c.state(), ScheduleState::Complete);

        let header = header_bytes(TransactionKind::TransferWithSchedule as u8);
        check_hash(&mut s, &[&header, &[0x22; 32], &[17], &first, &last]);
    }

    #[test]
    fn schedule_batches() {
        // Empty schedules are rejected
        let mut s = Session::new();
        assert_eq!(
            init(&mut Schedule::default(), &mut s, 0),
            Err(Error::InvalidTransaction)
        );

        // Partial batch while a full one is expected
        let mut s = Session::new();
        let mut c = Schedule::default();
        init(&mut c, &mut s, 20).unwrap();
        assert_eq!(
            c.step(&frag(ScheduleP1::Releases, &releases(0, 5)), &mut s),
            Err(Error::InvalidLength)
        );

        // More releases than declared
        let mut s = Session::new();
        let mut c = Schedule::default();
        init(&mut c, &mut s, 2).unwrap();
        assert_eq!(
            c.step(&frag(ScheduleP1::Releases, &releases(0, 3)), &mut s),
            Err(Error::InvalidState)
        );

        // Truncated release
        let mut s = Session::new();
        let mut c = Schedule::default();
        init(&mut c, &mut s, 1).unwrap();
        let data = releases(0, 1);
        assert_eq!(
            c.step(&frag(ScheduleP1::Releases, &data[..12]), &mut s),
            Err(Error::InvalidLength)
        );
    }

    #[test]
    fn schedule_ordering() {
        let mut s = Session::new();
        let mut c = Schedule::default();
        init(&mut c, &mut s, 2).unwrap();

        // Second release before the first
        let data = payload(&[
            &(START + 1_000).to_be_bytes(),
            &1u64.to_be_bytes(),
            &START.to_be_bytes(),
            &1u64.to_be_bytes(),
        ]);
        assert_eq!(
            c.step(&frag(ScheduleP1::Releases, &data), &mut s),
            Err(Error::InvalidTransaction)
        );

        // Ordering holds across fragments
        let mut s = Session::new();
        let mut c = Schedule::default();
        init(&mut c, &mut s, 16).unwrap();
        c.step(&frag(ScheduleP1::Releases, &releases(0, 15)), &mut s)
            .unwrap();

        let data = payload(&[&START.to_be_bytes(), &1u64.to_be_bytes()]);
        assert_eq!(
            c.step(&frag(ScheduleP1::Releases, &data), &mut s),
            Err(Error::InvalidTransaction)
        );
    }
}

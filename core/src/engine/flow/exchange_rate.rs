// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Exchange rate update

use num_enum::IntoPrimitive;
use strum::{Display, EnumIter};

use crate::apdu::{header::UpdateType, p1::ExchangeRateP1};
use crate::engine::{
    table::{lookup, Transition},
    Error, Fragment, Reader,
};
use crate::helpers::fmt_ratio;

use super::{signing_path, update_header, Checkpoint, Session, Step};

#[derive(Copy, Clone, PartialEq, Debug, Default, Display, EnumIter, IntoPrimitive)]
#[repr(u8)]
pub enum ExchangeRateState {
    #[default]
    Initial,
    Complete,
}

#[derive(Copy, Clone, PartialEq, Debug)]
enum Action {
    Rate,
}

pub(crate) const HEADER: &str = "Update exchange rate";

const TABLE: &[Transition<ExchangeRateState, Action>] = &[Transition::new(
    ExchangeRateState::Initial,
    ExchangeRateP1::Initial as u8,
    Action::Rate,
)];

/// Exchange rate update context
#[derive(Clone, Debug, Default)]
pub struct ExchangeRate {
    state: ExchangeRateState,
}

impl ExchangeRate {
    pub fn state(&self) -> ExchangeRateState {
        self.state
    }

    pub fn step(&mut self, f: &Fragment, s: &mut Session) -> Result<Step, Error> {
        match lookup(TABLE, self.state, f.p1)? {
            Action::Rate => {
                let mut r = Reader::new(f.data());

                signing_path(&mut r, s)?;
                let kind = update_header(
                    &mut r,
                    &[UpdateType::EuroPerEnergy, UpdateType::MicroGtuPerEuro],
                    s,
                )?;

                let start = r.position();
                let numerator = r.u64()?;
                let denominator = r.u64()?;
                r.finish()?;

                if denominator == 0 {
                    return Err(Error::InvalidTransaction);
                }
                s.hasher.feed(r.span(start))?;

                let label = match kind {
                    UpdateType::EuroPerEnergy => "Euro per energy",
                    _ => "Micro GTU per euro",
                };

                s.review.start(HEADER)?;
                s.review.push("Type", label)?;
                s.review
                    .push_with("Ratio", |b| fmt_ratio(numerator, denominator, b))?;

                self.state = ExchangeRateState::Complete;
                Ok(Step::Review(Checkpoint::Sign))
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{apdu::Instruction, engine::flow::test::*};

    const INS: u8 = Instruction::SignUpdateExchangeRate as u8;

    #[test]
    fn illegal_transitions() {
        sweep_illegal(INS, TABLE, |state, f, s| ExchangeRate { state }.step(f, s));
    }

    #[test]
    fn exchange_rates() {
        for kind in [UpdateType::EuroPerEnergy, UpdateType::MicroGtuPerEuro] {
            let mut s = Session::new();

            let header = update_header_bytes(kind as u8);
            let ratio = payload(&[&1u64.to_be_bytes(), &50_000u64.to_be_bytes()]);
            let data = payload(&[PATH, &header, &ratio]);

            let f = Fragment::new(INS, 0x00, 0x00, &data).unwrap();
            assert_eq!(
                ExchangeRate::default().step(&f, &mut s),
                Ok(Step::Review(Checkpoint::Sign))
            );
            assert_eq!(s.review.get("Ratio"), Some("1 / 50000"));

            check_hash(&mut s, &[&header, &ratio]);
        }
    }

    #[test]
    fn exchange_rate_invalid() {
        // Unsupported update type
        let mut s = Session::new();
        let header = update_header_bytes(UpdateType::Authorizations as u8);
        let data = payload(&[PATH, &header, &[0u8; 7], &[1]]);
        let f = Fragment::new(INS, 0x00, 0x00, &data).unwrap();
        assert_eq!(
            ExchangeRate::default().step(&f, &mut s),
            Err(Error::InvalidTransaction)
        );

        // Zero denominator
        let mut s = Session::new();
        let header = update_header_bytes(UpdateType::EuroPerEnergy as u8);
        let data = payload(&[PATH, &header, &1u64.to_be_bytes(), &[0u8; 8]]);
        let f = Fragment::new(INS, 0x00, 0x00, &data).unwrap();
        assert_eq!(
            ExchangeRate::default().step(&f, &mut s),
            Err(Error::InvalidTransaction)
        );
    }
}

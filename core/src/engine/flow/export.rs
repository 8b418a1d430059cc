// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Restricted key seed export
//!
//! Export paths are built on the device from the identity index alone and
//! always end in one of the allow-listed seed indices, so no signing key is
//! reachable through this flow.

use heapless::Vec;
use num_enum::IntoPrimitive;
use strum::{Display, EnumIter};

use crate::apdu::{
    export::ExportSeedReq,
    p1::{ExportP1, EXPORT_P2},
};
use crate::engine::{
    path::{KeyPath, SeedKind},
    table::{lookup, Transition},
    Error, Fragment, Reader,
};
use crate::helpers::fmt_identity;

use super::{Checkpoint, Session, Step};

#[derive(Copy, Clone, PartialEq, Debug, Default, Display, EnumIter, IntoPrimitive)]
#[repr(u8)]
pub enum ExportState {
    #[default]
    Initial,
    Complete,
}

#[derive(Copy, Clone, PartialEq, Debug)]
enum Action {
    Export,
}

const TABLE: &[Transition<ExportState, Action>] = &[
    Transition::new(ExportState::Initial, ExportP1::PrfKey as u8, Action::Export),
    Transition::new(ExportState::Initial, ExportP1::PrfKeyRecovery as u8, Action::Export),
    Transition::new(ExportState::Initial, ExportP1::Both as u8, Action::Export),
];

/// Key seed export context
#[derive(Clone, Debug, Default)]
pub struct Export {
    state: ExportState,
    selector: Option<ExportP1>,
    identity: u32,
}

impl Export {
    pub fn state(&self) -> ExportState {
        self.state
    }

    #[cfg_attr(feature = "noinline", inline(never))]
    pub fn step(&mut self, f: &Fragment, s: &mut Session) -> Result<Step, Error> {
        if self.state != ExportState::Initial {
            return Err(Error::InvalidState);
        }

        if f.p2 != EXPORT_P2 {
            return Err(Error::InvalidParam);
        }

        let selector = ExportP1::try_from(f.p1).map_err(|_| Error::InvalidParam)?;

        match lookup(TABLE, self.state, f.p1)? {
            Action::Export => {
                let mut r = Reader::new(f.data());
                let ExportSeedReq { identity } = r.decode()?;
                r.finish()?;

                s.review.start(selector.header())?;
                s.review
                    .push_with("Identity", |b| fmt_identity(identity, b))?;

                self.selector = Some(selector);
                self.identity = identity;
                self.state = ExportState::Complete;

                Ok(Step::Review(Checkpoint::Export))
            }
        }
    }

    /// Seed paths released on approval, PRF key first
    pub fn paths(&self) -> Result<Vec<KeyPath, 2>, Error> {
        let selector = match (self.state, self.selector) {
            (ExportState::Complete, Some(s)) => s,
            _ => return Err(Error::InvalidState),
        };

        let mut paths = Vec::new();
        for seed in [SeedKind::PrfKey, SeedKind::IdCredSec]
            .into_iter()
            .take(selector.seeds())
        {
            paths
                .push(KeyPath::seed_export(self.identity, seed))
                .map_err(|_| Error::InvalidState)?;
        }

        Ok(paths)
    }
}

#[cfg(test)]
mod test {
    use strum::IntoEnumIterator;

    use super::*;
    use crate::{
        apdu::{
            path::{HARDENED, ID_CRED_SEC, PRF_KEY},
            Instruction,
        },
        engine::path::PathClass,
    };

    const INS: u8 = Instruction::ExportPrivateKeySeed as u8;

    #[test]
    fn export_selectors() {
        for selector in ExportP1::iter() {
            let mut s = Session::new();
            let mut e = Export::default();

            let data = 7u32.to_be_bytes();
            let f = Fragment::new(INS, selector as u8, EXPORT_P2, &data).unwrap();
            assert_eq!(e.step(&f, &mut s), Ok(Step::Review(Checkpoint::Export)));

            assert_eq!(s.review.header(), selector.header());
            assert_eq!(s.review.get("Identity"), Some("ID #7"));
            assert!(!s.hasher.is_running());

            let paths = e.paths().unwrap();
            assert_eq!(paths.len(), selector.seeds());
            assert_eq!(paths[0].indices()[5], PRF_KEY | HARDENED);
            if let Some(p) = paths.get(1) {
                assert_eq!(p.indices()[5], ID_CRED_SEC | HARDENED);
            }
            for p in &paths {
                assert_eq!(p.class(), PathClass::SeedExport);
                assert_eq!(p.indices()[4], 7 | HARDENED);
            }
        }
    }

    #[test]
    fn export_invalid() {
        let data = 7u32.to_be_bytes();

        // Unknown selector
        let f = Fragment::new(INS, 0x03, EXPORT_P2, &data).unwrap();
        assert_eq!(
            Export::default().step(&f, &mut Session::new()),
            Err(Error::InvalidParam)
        );

        // Wrong P2
        let f = Fragment::new(INS, 0x00, 0x00, &data).unwrap();
        assert_eq!(
            Export::default().step(&f, &mut Session::new()),
            Err(Error::InvalidParam)
        );

        // Short identity
        let f = Fragment::new(INS, 0x00, EXPORT_P2, &data[..3]).unwrap();
        assert_eq!(
            Export::default().step(&f, &mut Session::new()),
            Err(Error::InvalidLength)
        );

        // Paths are unavailable before review
        assert_eq!(Export::default().paths(), Err(Error::InvalidState));
    }

    #[test]
    fn export_replay() {
        let mut s = Session::new();
        let mut e = Export::default();

        let data = 1u32.to_be_bytes();
        let f = Fragment::new(INS, 0x02, EXPORT_P2, &data).unwrap();
        e.step(&f, &mut s).unwrap();

        let review = s.review.clone();
        for p1 in 0..=u8::MAX {
            for p2 in [0x00, EXPORT_P2] {
                let f = Fragment::new(INS, p1, p2, &[0u8; 4]).unwrap();
                assert_eq!(e.step(&f, &mut s), Err(Error::InvalidState));
            }
        }
        assert_eq!(s.review, review);
    }
}

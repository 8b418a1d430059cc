// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Credential deployment
//!
//! There is no account header, the transaction hash starts at the key count.
//! Attributes are additionally hashed on their own so the review can show a
//! single attribute digest.

use num_enum::IntoPrimitive;
use sha2::{Digest, Sha256};
use strum::{Display, EnumIter};

use crate::apdu::p1::CredentialP1;
use crate::engine::{
    table::{lookup, Transition},
    Error, Fragment, Reader,
};
use crate::helpers::{fmt_date, fmt_hex, fmt_u64};

use super::{consume, show_address, signing_path, Checkpoint, Session, Step};

/// RegIdCred length
pub const REG_ID_LEN: usize = 48;

/// Encrypted IdCredPub share length
pub const ENC_SHARE_LEN: usize = 96;

/// Ed25519 verification key scheme
pub const ED25519_SCHEME: u8 = 0;

pub(crate) const HEADER: &str = "Credential deployment";
pub(crate) const KEY_HEADER: &str = "Verification key";
pub(crate) const REVOKER_HEADER: &str = "Anonymity revoker";

#[derive(Copy, Clone, PartialEq, Debug, Default, Display, EnumIter, IntoPrimitive)]
#[repr(u8)]
pub enum CredentialState {
    #[default]
    Initial,
    VerificationKey,
    SignatureThreshold,
    ArIdentity,
    CredentialDates,
    AttributeTag,
    AttributeValue,
    LengthOfProofs,
    Proofs,
    NewOrExisting,
    Complete,
}

#[derive(Copy, Clone, PartialEq, Debug)]
enum Action {
    Init,
    Key,
    Threshold,
    ArIdentity,
    Dates,
    AttributeTag,
    AttributeValue,
    ProofLength,
    Proofs,
    Account,
}

const TABLE: &[Transition<CredentialState, Action>] = &[
    Transition::new(CredentialState::Initial, CredentialP1::Initial as u8, Action::Init),
    Transition::new(
        CredentialState::VerificationKey,
        CredentialP1::VerificationKey as u8,
        Action::Key,
    ),
    Transition::new(
        CredentialState::SignatureThreshold,
        CredentialP1::SignatureThreshold as u8,
        Action::Threshold,
    ),
    Transition::new(
        CredentialState::ArIdentity,
        CredentialP1::ArIdentity as u8,
        Action::ArIdentity,
    ),
    Transition::new(
        CredentialState::CredentialDates,
        CredentialP1::CredentialDates as u8,
        Action::Dates,
    ),
    Transition::new(
        CredentialState::AttributeTag,
        CredentialP1::AttributeTag as u8,
        Action::AttributeTag,
    ),
    Transition::new(
        CredentialState::AttributeValue,
        CredentialP1::AttributeValue as u8,
        Action::AttributeValue,
    ),
    Transition::new(
        CredentialState::LengthOfProofs,
        CredentialP1::LengthOfProofs as u8,
        Action::ProofLength,
    ),
    Transition::new(CredentialState::Proofs, CredentialP1::Proofs as u8, Action::Proofs),
    Transition::new(
        CredentialState::NewOrExisting,
        CredentialP1::NewOrExisting as u8,
        Action::Account,
    ),
];

/// Credential deployment context
#[derive(Clone, Default)]
pub struct Credential {
    state: CredentialState,
    key_count: u8,
    keys: u8,
    revokers: u16,
    attributes: u16,
    value_len: u8,
    proofs: u32,
    attribute_hash: Sha256,
}

impl Credential {
    pub fn state(&self) -> CredentialState {
        self.state
    }

    /// Entries or bytes still expected in the current stage
    pub fn remaining(&self) -> u32 {
        use CredentialState::*;

        match self.state {
            VerificationKey => self.keys as u32,
            ArIdentity => self.revokers as u32,
            AttributeTag | AttributeValue => self.attributes as u32,
            Proofs => self.proofs,
            _ => 0,
        }
    }

    #[cfg_attr(feature = "noinline", inline(never))]
    pub fn step(&mut self, f: &Fragment, s: &mut Session) -> Result<Step, Error> {
        let mut r = Reader::new(f.data());

        match lookup(TABLE, self.state, f.p1)? {
            Action::Init => {
                signing_path(&mut r, s)?;
                let count = r.u8()?;
                r.finish()?;

                if count == 0 {
                    return Err(Error::InvalidTransaction);
                }

                s.hasher.start()?;
                s.hasher.feed(&[count])?;

                self.key_count = count;
                self.keys = count;
                self.state = CredentialState::VerificationKey;

                Ok(Step::More)
            }
            Action::Key => {
                let index = r.u8()?;
                let scheme = r.u8()?;
                let key = r.array::<32>()?;
                r.finish()?;

                if scheme != ED25519_SCHEME {
                    return Err(Error::InvalidTransaction);
                }
                s.hasher.feed(f.data())?;

                s.review.start(KEY_HEADER)?;
                s.review.push_with("Index", |b| fmt_u64(index as u64, b))?;
                s.review.push_with("Public key", |b| fmt_hex(&key, b))?;

                self.keys -= 1;
                if self.keys == 0 {
                    self.state = CredentialState::SignatureThreshold;
                }

                Ok(Step::Review(Checkpoint::Continue))
            }
            Action::Threshold => {
                let threshold = r.u8()?;
                let reg_id = r.array::<REG_ID_LEN>()?;
                let ip_identity = r.u32()?;
                let ar_threshold = r.u8()?;
                let ar_count = r.u16()?;
                r.finish()?;

                if threshold == 0 || threshold > self.key_count {
                    return Err(Error::InvalidTransaction);
                }
                if ar_count == 0 || ar_threshold == 0 || ar_threshold as u16 > ar_count {
                    return Err(Error::InvalidTransaction);
                }
                s.hasher.feed(f.data())?;

                s.review.start(HEADER)?;
                s.review
                    .push_with("Signature threshold", |b| fmt_u64(threshold as u64, b))?;
                s.review.push_with("RegIdCred", |b| fmt_hex(&reg_id, b))?;
                s.review
                    .push_with("Identity provider", |b| fmt_u64(ip_identity as u64, b))?;
                s.review
                    .push_with("AR threshold", |b| fmt_u64(ar_threshold as u64, b))?;

                self.revokers = ar_count;
                self.state = CredentialState::ArIdentity;

                Ok(Step::Review(Checkpoint::Continue))
            }
            Action::ArIdentity => {
                let ar_identity = r.u32()?;
                let _share = r.take(ENC_SHARE_LEN)?;
                r.finish()?;

                s.hasher.feed(f.data())?;

                s.review.start(REVOKER_HEADER)?;
                s.review
                    .push_with("AR identity", |b| fmt_u64(ar_identity as u64, b))?;

                self.revokers -= 1;
                if self.revokers == 0 {
                    self.state = CredentialState::CredentialDates;
                }

                Ok(Step::Review(Checkpoint::Continue))
            }
            Action::Dates => {
                let (valid_year, valid_month) = (r.u16()?, r.u8()?);
                let (created_year, created_month) = (r.u16()?, r.u8()?);
                let attributes = r.u16()?;
                r.finish()?;

                if !(1..=12).contains(&valid_month) || !(1..=12).contains(&created_month) {
                    return Err(Error::InvalidTransaction);
                }
                s.hasher.feed(f.data())?;

                s.review.start(HEADER)?;
                s.review
                    .push_with("Valid to", |b| fmt_date(valid_year, valid_month, b))?;
                s.review
                    .push_with("Created at", |b| fmt_date(created_year, created_month, b))?;

                self.attributes = attributes;
                self.attribute_hash = Sha256::new();
                self.state = match attributes {
                    0 => CredentialState::LengthOfProofs,
                    _ => CredentialState::AttributeTag,
                };

                Ok(Step::Review(Checkpoint::Continue))
            }
            Action::AttributeTag => {
                let _tag = r.u8()?;
                let value_len = r.u8()?;
                r.finish()?;

                s.hasher.feed(f.data())?;
                self.attribute_hash.update(f.data());

                self.value_len = value_len;
                self.state = CredentialState::AttributeValue;

                Ok(Step::More)
            }
            Action::AttributeValue => {
                let value = r.take(self.value_len as usize)?;
                r.finish()?;

                s.hasher.feed(value)?;
                self.attribute_hash.update(value);

                self.attributes -= 1;
                if self.attributes > 0 {
                    self.state = CredentialState::AttributeTag;
                    return Ok(Step::More);
                }

                let digest = core::mem::take(&mut self.attribute_hash).finalize();

                s.review.start(HEADER)?;
                s.review
                    .push_with("Attribute hash", |b| fmt_hex(&digest[..], b))?;

                self.state = CredentialState::LengthOfProofs;
                Ok(Step::Review(Checkpoint::Continue))
            }
            Action::ProofLength => {
                let proofs = r.u32()?;
                r.finish()?;

                s.hasher.feed(&proofs.to_be_bytes())?;

                self.proofs = proofs;
                self.state = CredentialState::Proofs;

                Ok(Step::More)
            }
            Action::Proofs => {
                let chunk = r.rest();

                self.proofs = consume(self.proofs, chunk.len())?;
                s.hasher.feed(chunk)?;

                if self.proofs == 0 {
                    self.state = CredentialState::NewOrExisting;
                }

                Ok(Step::More)
            }
            Action::Account => {
                s.review.start(HEADER)?;

                match r.u8()? {
                    0 => {
                        let expiry = r.u64()?;
                        r.finish()?;

                        s.review.push("Account", "New")?;
                        s.review.push_with("Expiry", |b| fmt_u64(expiry, b))?;
                    }
                    1 => {
                        let address = r.array::<32>()?;
                        r.finish()?;

                        show_address("Account", &address, s)?;
                    }
                    _ => return Err(Error::InvalidTransaction),
                }

                s.hasher.feed(f.data())?;

                self.state = CredentialState::Complete;
                Ok(Step::Review(Checkpoint::Sign))
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{apdu::Instruction, engine::flow::test::*};

    const INS: u8 = Instruction::SignCredentialDeployment as u8;

    #[test]
    fn illegal_transitions() {
        sweep_illegal(INS, TABLE, |state, f, s| {
            Credential {
                state,
                key_count: 1,
                keys: 1,
                revokers: 1,
                attributes: 1,
                ..Default::default()
            }
            .step(f, s)
        });
    }

    fn frag(p1: CredentialP1, data: &[u8]) -> Fragment {
        Fragment::new(INS, p1 as u8, 0x00, data).unwrap()
    }

    const CONTINUE: Result<Step, Error> = Ok(Step::Review(Checkpoint::Continue));

    #[test]
    fn credential_deployment() {
        let mut s = Session::new();
        let mut c = Credential::default();

        let init = payload(&[PATH, &[2]]);
        assert_eq!(c.step(&frag(CredentialP1::Initial, &init), &mut s), Ok(Step::More));
        assert_eq!(c.remaining(), 2);

        let k0 = payload(&[&[0, ED25519_SCHEME], &[0xa0; 32]]);
        let k1 = payload(&[&[1, ED25519_SCHEME], &[0xa1; 32]]);
        assert_eq!(c.step(&frag(CredentialP1::VerificationKey, &k0), &mut s), CONTINUE);
        assert_eq!(s.review.get("Index"), Some("0"));
        assert_eq!(c.step(&frag(CredentialP1::VerificationKey, &k1), &mut s), CONTINUE);
        assert_eq!(c.state(), CredentialState::SignatureThreshold);

        let threshold = payload(&[&[2], &[0xb0; REG_ID_LEN], &9u32.to_be_bytes(), &[1], &[0, 1]]);
        assert_eq!(c.step(&frag(CredentialP1::SignatureThreshold, &threshold), &mut s), CONTINUE);
        assert_eq!(s.review.get("Identity provider"), Some("9"));

        let revoker = payload(&[&5u32.to_be_bytes(), &[0xc0; ENC_SHARE_LEN]]);
        assert_eq!(c.step(&frag(CredentialP1::ArIdentity, &revoker), &mut s), CONTINUE);
        assert_eq!(s.review.get("AR identity"), Some("5"));

        let dates = payload(&[&[0x07, 0xe9, 12, 0x07, 0xe7, 1], &[0, 1]]);
        assert_eq!(c.step(&frag(CredentialP1::CredentialDates, &dates), &mut s), CONTINUE);
        assert_eq!(s.review.get("Valid to"), Some("202512"));
        assert_eq!(s.review.get("Created at"), Some("202301"));

        let tag = [3, 4];
        assert_eq!(c.step(&frag(CredentialP1::AttributeTag, &tag), &mut s), Ok(Step::More));
        let value = *b"1990";
        assert_eq!(c.step(&frag(CredentialP1::AttributeValue, &value), &mut s), CONTINUE);

        let mut expected = [0u8; 64];
        let digest = Sha256::new().chain_update(tag).chain_update(value).finalize();
        let expected = fmt_hex(&digest[..], &mut expected).unwrap();
        assert_eq!(s.review.get("Attribute hash"), Some(expected));

        let proof_len = 300u32.to_be_bytes();
        assert_eq!(c.step(&frag(CredentialP1::LengthOfProofs, &proof_len), &mut s), Ok(Step::More));

        let proofs = [0xd0; 300];
        assert_eq!(c.step(&frag(CredentialP1::Proofs, &proofs[..200]), &mut s), Ok(Step::More));
        assert_eq!(c.remaining(), 100);
        assert_eq!(c.step(&frag(CredentialP1::Proofs, &proofs[200..]), &mut s), Ok(Step::More));
        assert_eq!(c.state(), CredentialState::NewOrExisting);

        let account = payload(&[&[0], &1_800_000_000u64.to_be_bytes()]);
        assert_eq!(
            c.step(&frag(CredentialP1::NewOrExisting, &account), &mut s),
            Ok(Step::Review(Checkpoint::Sign))
        );
        assert_eq!(s.review.get("Account"), Some("New"));

        check_hash(
            &mut s,
            &[
                &[2], &k0, &k1, &threshold, &revoker, &dates, &tag, &value, &proof_len, &proofs,
                &account,
            ],
        );
    }

    #[test]
    fn credential_validation() {
        // No keys
        let mut s = Session::new();
        let init = payload(&[PATH, &[0]]);
        assert_eq!(
            Credential::default().step(&frag(CredentialP1::Initial, &init), &mut s),
            Err(Error::InvalidTransaction)
        );

        // Unsupported key scheme
        let mut c = Credential {
            state: CredentialState::VerificationKey,
            key_count: 1,
            keys: 1,
            ..Default::default()
        };
        let key = payload(&[&[0, 1], &[0xa0; 32]]);
        assert_eq!(
            c.step(&frag(CredentialP1::VerificationKey, &key), &mut s),
            Err(Error::InvalidTransaction)
        );

        // Threshold above key count
        let mut c = Credential {
            state: CredentialState::SignatureThreshold,
            key_count: 1,
            ..Default::default()
        };
        let threshold = payload(&[&[2], &[0xb0; REG_ID_LEN], &[0; 4], &[1], &[0, 1]]);
        assert_eq!(
            c.step(&frag(CredentialP1::SignatureThreshold, &threshold), &mut s),
            Err(Error::InvalidTransaction)
        );

        // Invalid month
        let mut c = Credential {
            state: CredentialState::CredentialDates,
            ..Default::default()
        };
        let dates = [0x07, 0xe9, 13, 0x07, 0xe7, 1, 0, 0];
        assert_eq!(
            c.step(&frag(CredentialP1::CredentialDates, &dates), &mut s),
            Err(Error::InvalidTransaction)
        );

        // Attribute value length mismatch
        let mut c = Credential {
            state: CredentialState::AttributeValue,
            attributes: 1,
            value_len: 4,
            ..Default::default()
        };
        assert_eq!(
            c.step(&frag(CredentialP1::AttributeValue, b"19900"), &mut s),
            Err(Error::InvalidLength)
        );
    }

    #[test]
    fn no_attributes() {
        let mut s = Session::new();
        s.hasher.start().unwrap();

        let mut c = Credential {
            state: CredentialState::CredentialDates,
            ..Default::default()
        };
        let dates = [0x07, 0xe9, 12, 0x07, 0xe7, 1, 0, 0];
        assert_eq!(c.step(&frag(CredentialP1::CredentialDates, &dates), &mut s), CONTINUE);
        assert_eq!(c.state(), CredentialState::LengthOfProofs);
    }
}

// Copyright (c) 2022-2023 The MobileCoin Foundation

//! The [Engine] provides transaction co-signing functionality required by hardware wallets.
//!
//! This handles [Fragment] inputs and returns [Output] responses to the caller,
//! see [apdu][crate::apdu] for APDU protocol / encoding specifications.

use ed25519_dalek::{Signer, SigningKey};
use strum::{Display, EnumVariantNames};
use zeroize::Zeroize;

#[cfg(feature = "export")]
use crate::apdu::export::KeySeedResp;
use crate::apdu::{state::FlowInfo, Instruction};

mod context;
pub use context::Context;

mod error;
pub use error::Error;

mod fragment;
pub use fragment::Fragment;

mod hasher;
pub use hasher::{TxHash, TxHasher};

mod output;
pub use output::Output;

mod reader;
pub use reader::Reader;

pub mod flow;
pub use flow::{Checkpoint, Session, Step};

pub mod path;
pub use path::{KeyPath, PathClass, SeedKind};

pub mod review;
pub use review::{Field, Review};

pub mod table;

/// Engine internal state enumeration
#[derive(Copy, Clone, PartialEq, Debug, Default, Display, EnumVariantNames)]
pub enum State {
    /// Idle state, no flow running
    #[default]
    Idle,
    /// Accepting fragments for an instruction
    Active(Instruction),
    /// Review pending user approval
    Pending(Instruction),
}

impl State {
    /// Fetch the instruction for the running flow
    pub fn instruction(&self) -> Option<Instruction> {
        match self {
            State::Idle => None,
            State::Active(i) | State::Pending(i) => Some(*i),
        }
    }
}

/// User decision at an approval checkpoint
#[derive(Copy, Clone, PartialEq, Debug, Display)]
pub enum Decision {
    Approve,
    Reject,
}

/// Handle for a pending review, accepted once by [`Engine::resume`]
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct ApprovalToken(u32);

/// SLIP-0010 derived ed25519 key seed, zeroized on drop
pub struct KeySeed([u8; 32]);

impl KeySeed {
    pub fn from_raw(seed: [u8; 32]) -> Self {
        Self(seed)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl Drop for KeySeed {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

/// [`Driver`] trait provides platform support for [`Engine`] instances
pub trait Driver {
    /// SLIP-0010 derivation for ed25519 keys
    fn slip10_derive_ed25519(&self, path: &[u32]) -> KeySeed;
}

impl<T: Driver> Driver for &mut T {
    fn slip10_derive_ed25519(&self, path: &[u32]) -> KeySeed {
        T::slip10_derive_ed25519(self, path)
    }
}

/// [Engine] provides hardware-independent support for Concordium transaction signing
///
/// Fragments are applied with [`Engine::update`]. Where a flow reaches a
/// review point the engine returns [`Output::Pending`], exposes the content to
/// display via [`Engine::review`] and accepts no further fragments until the
/// user decision is applied with [`Engine::resume`].
pub struct Engine<DRV: Driver> {
    state: State,
    context: Context,
    session: Session,
    pending: Option<(ApprovalToken, Checkpoint)>,
    seq: u32,
    drv: DRV,
}

impl<DRV: Driver> Engine<DRV> {
    /// Create a new engine instance with the provided driver
    pub const fn new(drv: DRV) -> Self {
        Self {
            state: State::Idle,
            context: Context::new(),
            session: Session::new(),
            pending: None,
            seq: 0,
            drv,
        }
    }

    /// Fetch the engine state
    pub fn state(&self) -> State {
        self.state
    }

    /// Fetch review content while an approval is pending
    pub fn review(&self) -> Option<&Review> {
        match self.state {
            State::Pending(_) => Some(&self.session.review),
            _ => None,
        }
    }

    /// Handle an incoming fragment
    ///
    /// Any error aborts the running flow.
    #[cfg_attr(feature = "noinline", inline(never))]
    pub fn update(&mut self, f: &Fragment) -> Result<Output, Error> {
        #[cfg(feature = "log")]
        log::debug!(
            "fragment ins: {:#04x} p1: {:#04x} len: {}",
            f.ins,
            f.p1,
            f.data().len()
        );

        let r = self.handle(f);
        if let Err(e) = &r {
            self.abort(*e);
        }
        r
    }

    /// Apply a user decision to the pending review
    ///
    /// Stale tokens and rejections abort the running flow.
    #[cfg_attr(feature = "noinline", inline(never))]
    pub fn resume(&mut self, token: ApprovalToken, decision: Decision) -> Result<Output, Error> {
        #[cfg(feature = "log")]
        log::debug!("approval: {}", decision);

        let r = self.approve(token, decision);
        if let Err(e) = &r {
            self.abort(*e);
        }
        r
    }

    /// Cancel any running flow, returning to idle
    pub fn reset(&mut self) {
        #[cfg(feature = "log")]
        log::debug!("reset");

        self.finish();
    }

    fn handle(&mut self, f: &Fragment) -> Result<Output, Error> {
        let ins = f.instruction()?;

        match self.state {
            State::Pending(_) => return Err(Error::InvalidState),
            State::Active(i) if i == ins => (),
            _ => self.begin(ins)?,
        }

        let step = self.context.step(f, &mut self.session)?;

        match step {
            Step::More => Ok(Output::MoreData {
                info: FlowInfo {
                    ins: ins as u8,
                    state: self.context.state(),
                    remaining: self.context.remaining(),
                },
            }),
            Step::Review(checkpoint) => {
                self.seq = self.seq.wrapping_add(1);
                let token = ApprovalToken(self.seq);

                self.pending = Some((token, checkpoint));
                self.state = State::Pending(ins);

                #[cfg(feature = "log")]
                log::debug!("{} pending {:?} review", ins, checkpoint);

                Ok(Output::Pending(token))
            }
            Step::Release(checkpoint) => {
                let o = self.release(checkpoint)?;
                self.finish();
                Ok(o)
            }
        }
    }

    /// Start a new flow, discarding any previous one
    fn begin(&mut self, ins: Instruction) -> Result<(), Error> {
        #[cfg(feature = "log")]
        if let Some(prev) = self.state.instruction() {
            log::debug!("discarding {} flow", prev);
        }

        self.finish();
        self.context.enter(ins)?;
        self.state = State::Active(ins);

        #[cfg(feature = "log")]
        log::debug!("begin {} flow", ins);

        Ok(())
    }

    fn approve(&mut self, token: ApprovalToken, decision: Decision) -> Result<Output, Error> {
        let (ins, checkpoint) = match (self.state, self.pending) {
            (State::Pending(ins), Some((t, c))) if t == token => (ins, c),
            _ => return Err(Error::InvalidState),
        };

        self.pending = None;

        if decision == Decision::Reject {
            return Err(Error::ApprovalRejected);
        }

        match checkpoint {
            Checkpoint::Continue => {
                self.session.review.clear();
                self.state = State::Active(ins);
                Ok(Output::Ack)
            }
            _ => {
                let o = self.release(checkpoint)?;
                self.finish();
                Ok(o)
            }
        }
    }

    /// Produce the output released by an approved (or unreviewed) checkpoint
    fn release(&mut self, checkpoint: Checkpoint) -> Result<Output, Error> {
        match checkpoint {
            Checkpoint::Sign => self.sign(),
            Checkpoint::PublicKey => self.public_key(),
            #[cfg(feature = "export")]
            Checkpoint::Export => self.export(),
            _ => Err(Error::InvalidState),
        }
    }

    /// Sign the sealed transaction hash
    fn sign(&mut self) -> Result<Output, Error> {
        let path = match &self.session.path {
            Some(p) if p.class() == PathClass::Signing => p,
            Some(_) => return Err(Error::InvalidPath),
            None => return Err(Error::InvalidState),
        };

        let hash = self.session.hasher.seal()?;

        let seed = self.drv.slip10_derive_ed25519(path.indices());
        let key = SigningKey::from_bytes(seed.as_bytes());

        let signature = key.sign(hash.as_bytes()).to_bytes();

        Ok(Output::Signature { signature })
    }

    /// Fetch the public key for the validated signing path
    fn public_key(&mut self) -> Result<Output, Error> {
        let path = match &self.session.path {
            Some(p) if p.class() == PathClass::Signing => p,
            Some(_) => return Err(Error::InvalidPath),
            None => return Err(Error::InvalidState),
        };

        let seed = self.drv.slip10_derive_ed25519(path.indices());
        let key = SigningKey::from_bytes(seed.as_bytes());

        Ok(Output::PublicKey {
            public_key: key.verifying_key().to_bytes(),
        })
    }

    /// Derive the seeds for an approved export
    #[cfg(feature = "export")]
    fn export(&mut self) -> Result<Output, Error> {
        let paths = self.context.export().ok_or(Error::InvalidState)?.paths()?;

        let mut seeds = KeySeedResp {
            prf_key: [0u8; 32],
            id_cred_sec: None,
        };

        for (i, p) in paths.iter().enumerate() {
            if p.class() != PathClass::SeedExport {
                return Err(Error::InvalidPath);
            }

            let seed = self.drv.slip10_derive_ed25519(p.indices());
            match i {
                0 => seeds.prf_key = *seed.as_bytes(),
                _ => seeds.id_cred_sec = Some(*seed.as_bytes()),
            }
        }

        Ok(Output::KeySeeds(seeds))
    }

    /// Clear context, hash and review, returning to idle
    fn finish(&mut self) {
        self.context.clear();
        self.session.clear();
        self.pending = None;
        self.state = State::Idle;
    }

    #[cfg_attr(not(feature = "log"), allow(unused_variables))]
    fn abort(&mut self, e: Error) {
        #[cfg(feature = "log")]
        log::warn!("{} flow aborted: {:?}", self.state, e);

        self.finish();
    }
}

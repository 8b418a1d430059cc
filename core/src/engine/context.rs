// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Per-instruction flow context
//!
//! Exactly one flow is active at a time, entering a new instruction discards
//! the previous context entirely.

use crate::apdu::Instruction;

#[cfg(feature = "updates")]
use super::flow::{authorizations::Authorizations, exchange_rate::ExchangeRate};
#[cfg(feature = "export")]
use super::flow::export::Export;
use super::{
    flow::{
        baker::Baker, credential::Credential, encrypted::Encrypted, ip_info::IpInfo, memo::Memo,
        public_key::PublicKey, schedule::Schedule, shield::Shield, transfer::Transfer, Session,
        Step,
    },
    Error, Fragment,
};

/// Active flow
#[derive(Clone, Default)]
enum ContextType {
    #[default]
    None,
    PublicKey(PublicKey),
    Transfer(Transfer),
    Memo(Memo),
    Schedule(Schedule),
    Encrypted(Encrypted),
    Shield(Shield),
    Credential(Credential),
    Baker(Baker),
    IpInfo(IpInfo),
    #[cfg(feature = "export")]
    Export(Export),
    #[cfg(feature = "updates")]
    Authorizations(Authorizations),
    #[cfg(feature = "updates")]
    ExchangeRate(ExchangeRate),
}

/// Instruction context, holding the state machine for the active flow
#[derive(Clone, Default)]
pub struct Context {
    inner: ContextType,
}

impl Context {
    pub const fn new() -> Self {
        Self {
            inner: ContextType::None,
        }
    }

    /// Discard any previous flow and enter the initial state for `ins`
    pub fn enter(&mut self, ins: Instruction) -> Result<(), Error> {
        use Instruction::*;

        self.clear();

        self.inner = match ins {
            GetPublicKey => ContextType::PublicKey(Default::default()),
            SignTransfer => ContextType::Transfer(Default::default()),
            SignTransferWithMemo => ContextType::Memo(Default::default()),
            SignTransferWithSchedule => ContextType::Schedule(Default::default()),
            SignEncryptedAmountTransfer => ContextType::Encrypted(Default::default()),
            SignTransferToEncrypted => ContextType::Shield(Default::default()),
            SignCredentialDeployment => ContextType::Credential(Default::default()),
            SignConfigureBaker => ContextType::Baker(Default::default()),
            SignPublicInfoForIp => ContextType::IpInfo(Default::default()),
            #[cfg(feature = "export")]
            ExportPrivateKeySeed => ContextType::Export(Default::default()),
            #[cfg(feature = "updates")]
            SignUpdateAuthorizations => ContextType::Authorizations(Default::default()),
            #[cfg(feature = "updates")]
            SignUpdateExchangeRate => ContextType::ExchangeRate(Default::default()),
            #[allow(unreachable_patterns)]
            _ => return Err(Error::UnknownInstruction),
        };

        Ok(())
    }

    /// Apply a fragment to the active flow
    pub fn step(&mut self, f: &Fragment, s: &mut Session) -> Result<Step, Error> {
        match &mut self.inner {
            ContextType::None => Err(Error::InvalidState),
            ContextType::PublicKey(c) => c.step(f, s),
            ContextType::Transfer(c) => c.step(f, s),
            ContextType::Memo(c) => c.step(f, s),
            ContextType::Schedule(c) => c.step(f, s),
            ContextType::Encrypted(c) => c.step(f, s),
            ContextType::Shield(c) => c.step(f, s),
            ContextType::Credential(c) => c.step(f, s),
            ContextType::Baker(c) => c.step(f, s),
            ContextType::IpInfo(c) => c.step(f, s),
            #[cfg(feature = "export")]
            ContextType::Export(c) => c.step(f, s),
            #[cfg(feature = "updates")]
            ContextType::Authorizations(c) => c.step(f, s),
            #[cfg(feature = "updates")]
            ContextType::ExchangeRate(c) => c.step(f, s),
        }
    }

    /// Per-instruction stage of the active flow
    pub fn state(&self) -> u8 {
        match &self.inner {
            ContextType::None => 0,
            ContextType::PublicKey(c) => c.state().into(),
            ContextType::Transfer(c) => c.state().into(),
            ContextType::Memo(c) => c.state().into(),
            ContextType::Schedule(c) => c.state().into(),
            ContextType::Encrypted(c) => c.state().into(),
            ContextType::Shield(c) => c.state().into(),
            ContextType::Credential(c) => c.state().into(),
            ContextType::Baker(c) => c.state().into(),
            ContextType::IpInfo(c) => c.state().into(),
            #[cfg(feature = "export")]
            ContextType::Export(c) => c.state().into(),
            #[cfg(feature = "updates")]
            ContextType::Authorizations(c) => c.state().into(),
            #[cfg(feature = "updates")]
            ContextType::ExchangeRate(c) => c.state().into(),
        }
    }

    /// Entries or bytes still expected by the active stage
    pub fn remaining(&self) -> u32 {
        match &self.inner {
            ContextType::Memo(c) => c.remaining(),
            ContextType::Schedule(c) => c.remaining(),
            ContextType::Encrypted(c) => c.remaining(),
            ContextType::Credential(c) => c.remaining(),
            ContextType::Baker(c) => c.remaining(),
            ContextType::IpInfo(c) => c.remaining(),
            #[cfg(feature = "updates")]
            ContextType::Authorizations(c) => c.remaining(),
            _ => 0,
        }
    }

    /// Fetch the export context where active
    #[cfg(feature = "export")]
    pub fn export(&self) -> Option<&Export> {
        match &self.inner {
            ContextType::Export(c) => Some(c),
            _ => None,
        }
    }

    pub fn is_active(&self) -> bool {
        !matches!(self.inner, ContextType::None)
    }

    /// Drop the active flow
    pub fn clear(&mut self) {
        self.inner = ContextType::None;
    }
}

// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Derivation path validation
//!
//! Signing paths are always rooted at `PURPOSE' / COIN_TYPE'` with every index
//! hardened, whatever the host sends. Seed export paths are only ever built on
//! the device and end in one of the two allow-listed seed indices.

use strum::{Display, EnumIter, IntoEnumIterator};

use crate::apdu::path::{
    RawPath, ACCOUNT_SUBTREE, COIN_TYPE, HARDENED, ID_CRED_SEC, MAX_PATH_LEN, NORMAL_ACCOUNTS,
    PRF_KEY, PURPOSE,
};

use super::Error;

/// Minimum signing path length
pub const MIN_SIGNING_PATH_LEN: usize = 3;

/// Seed export path length
pub const SEED_PATH_LEN: usize = 6;

/// Operation class a path was validated for
#[derive(Copy, Clone, PartialEq, Debug, Display)]
pub enum PathClass {
    Signing,
    SeedExport,
}

/// Exportable key seeds
#[derive(Copy, Clone, PartialEq, Debug, Display, EnumIter)]
pub enum SeedKind {
    PrfKey,
    IdCredSec,
}

impl SeedKind {
    /// Final (hardened) path index for this seed
    pub const fn index(&self) -> u32 {
        match self {
            SeedKind::PrfKey => PRF_KEY | HARDENED,
            SeedKind::IdCredSec => ID_CRED_SEC | HARDENED,
        }
    }
}

/// Validated key derivation path
#[derive(Clone, PartialEq, Debug)]
pub struct KeyPath {
    class: PathClass,
    len: usize,
    indices: [u32; MAX_PATH_LEN],
}

impl KeyPath {
    /// Validate a host-provided path for signing use
    #[cfg_attr(feature = "noinline", inline(never))]
    pub fn signing(raw: &RawPath) -> Result<Self, Error> {
        let p = raw.indices();
        if p.len() < MIN_SIGNING_PATH_LEN || p.len() > MAX_PATH_LEN {
            return Err(Error::InvalidPath);
        }

        let mut indices = [0u32; MAX_PATH_LEN];
        indices[0] = PURPOSE | HARDENED;
        indices[1] = COIN_TYPE | HARDENED;
        for (i, v) in p.iter().enumerate().skip(2) {
            indices[i] = v | HARDENED;
        }

        let path = Self {
            class: PathClass::Signing,
            len: p.len(),
            indices,
        };

        // Seed export keys are never reachable for signing
        if path.is_seed_path() {
            return Err(Error::InvalidPath);
        }

        Ok(path)
    }

    /// Build the export path for an identity seed
    pub fn seed_export(identity: u32, seed: SeedKind) -> Self {
        let mut indices = [0u32; MAX_PATH_LEN];
        indices[..SEED_PATH_LEN].copy_from_slice(&[
            PURPOSE | HARDENED,
            COIN_TYPE | HARDENED,
            ACCOUNT_SUBTREE | HARDENED,
            NORMAL_ACCOUNTS | HARDENED,
            identity | HARDENED,
            seed.index(),
        ]);

        Self {
            class: PathClass::SeedExport,
            len: SEED_PATH_LEN,
            indices,
        }
    }

    pub fn class(&self) -> PathClass {
        self.class
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices[..self.len]
    }

    fn is_seed_path(&self) -> bool {
        let p = self.indices();

        p.len() == SEED_PATH_LEN
            && p[2] == ACCOUNT_SUBTREE | HARDENED
            && p[3] == NORMAL_ACCOUNTS | HARDENED
            && SeedKind::iter().any(|s| p[5] == s.index())
    }
}

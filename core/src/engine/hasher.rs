// Copyright (c) 2022-2023 The MobileCoin Foundation

use core::sync::atomic::{compiler_fence, Ordering};

use sha2::{digest::generic_array::GenericArray, Digest, Sha256};
use zeroize::Zeroize;

use super::Error;

/// Sealed transaction hash, zeroized on drop
#[derive(Clone, PartialEq, Debug)]
pub struct TxHash([u8; 32]);

impl TxHash {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl Drop for TxHash {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

#[derive(Clone)]
enum HashState {
    Idle,
    Running(Sha256),
    Sealed,
}

/// Incremental transaction hash accumulator
///
/// Fed with the canonical transaction encoding across any number of fragments,
/// in the order the bytes appear in the transaction.
#[derive(Clone)]
pub struct TxHasher {
    state: HashState,
    fed: usize,
}

impl Default for TxHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl TxHasher {
    pub const fn new() -> Self {
        Self {
            state: HashState::Idle,
            fed: 0,
        }
    }

    /// Start a new transaction hash
    pub fn start(&mut self) -> Result<(), Error> {
        if self.is_running() {
            return Err(Error::AlreadyInitialized);
        }

        self.state = HashState::Running(Sha256::new());
        self.fed = 0;

        Ok(())
    }

    /// Append bytes to the running hash
    pub fn feed(&mut self, data: &[u8]) -> Result<(), Error> {
        match &mut self.state {
            HashState::Running(h) => {
                h.update(data);
                self.fed += data.len();
                Ok(())
            }
            _ => Err(Error::InvalidState),
        }
    }

    /// Finalise the running hash, wiping the hash state
    pub fn seal(&mut self) -> Result<TxHash, Error> {
        let h = match &mut self.state {
            HashState::Running(h) => h,
            _ => return Err(Error::InvalidState),
        };

        let mut hash = TxHash([0u8; 32]);
        h.finalize_into_reset(GenericArray::from_mut_slice(&mut hash.0));
        wipe(h);

        self.state = HashState::Sealed;

        Ok(hash)
    }

    /// Discard any running hash, wiping the hash state
    pub fn clear(&mut self) {
        if let HashState::Running(h) = &mut self.state {
            wipe(h);
        }

        self.state = HashState::Idle;
        self.fed = 0;
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, HashState::Running(_))
    }

    /// Number of bytes fed since [`TxHasher::start`]
    pub fn fed(&self) -> usize {
        self.fed
    }
}

/// Reset hash state with a volatile write so the store is not elided
fn wipe(h: &mut Sha256) {
    // SAFETY: `h` is a valid, aligned and exclusive reference
    unsafe { core::ptr::write_volatile(h, Sha256::new()) };
    compiler_fence(Ordering::SeqCst);
}

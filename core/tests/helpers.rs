#![allow(unused)]

use bip39::{Language, Mnemonic, Seed};
use ed25519_dalek::{Signature, SigningKey, Verifier};
use encdec::Encode;
use log::debug;
use sha2::{Digest, Sha256};

use ledger_ccd_core::{
    apdu::{
        path::{COIN_TYPE, HARDENED, PURPOSE},
        prelude::*,
    },
    engine::{Decision, Driver, Engine, Error, Fragment, KeySeed, Output, Review},
};

pub const MNEMONIC: &str = "duck deal pretty pen thunder economy wide common goose fit engine main aisle curtain choose cube claim snake enroll detect brief history float unit";

/// Account signing path used by the tests (prior to hardening)
pub const ACCOUNT_PATH: [u32; 8] = [PURPOSE, COIN_TYPE, 0, 0, 4, 2, 0, 0];

/// Test sender address
pub const SENDER: [u8; 32] = [0x5e; 32];

/// Driver implementation for test use
pub struct TestDriver {
    /// BIP39 Mnemonic derived seed
    pub seed: [u8; 64],
}

impl TestDriver {
    pub fn new(seed: Seed) -> Self {
        let mut b = [0u8; 64];
        b.copy_from_slice(seed.as_bytes());
        Self { seed: b }
    }

    /// Driver using the [`MNEMONIC`] derived seed
    pub fn from_mnemonic() -> Self {
        let mnemonic = Mnemonic::from_phrase(MNEMONIC, Language::English).unwrap();
        Self::new(Seed::new(&mnemonic, ""))
    }
}

impl Driver for TestDriver {
    fn slip10_derive_ed25519(&self, path: &[u32]) -> KeySeed {
        KeySeed::from_raw(slip10_ed25519::derive_ed25519_private_key(&self.seed, path))
    }
}

pub fn init() -> Engine<TestDriver> {
    let _ = simplelog::SimpleLogger::init(log::LevelFilter::Debug, Default::default());

    Engine::new(TestDriver::from_mnemonic())
}

/// Encode a host path
pub fn path_bytes(path: &[u32]) -> Vec<u8> {
    let p = RawPath::new(path).unwrap();

    let mut b = vec![0u8; p.encode_len().unwrap()];
    p.encode(&mut b).unwrap();
    b
}

/// Hardened form of a host path, as used for derivation
pub fn hardened(path: &[u32]) -> Vec<u32> {
    path.iter().map(|p| p | HARDENED).collect()
}

/// Encode an account transaction header and kind
pub fn account_header(kind: TransactionKind) -> Vec<u8> {
    let h = AccountTransactionHeader {
        sender: SENDER,
        nonce: 12,
        energy: 1_000,
        payload_size: 41,
        expiry: 1_700_000_000,
    };

    let mut b = vec![0u8; h.encode_len().unwrap()];
    h.encode(&mut b).unwrap();
    b.push(kind as u8);
    b
}

/// Encode an update header and type
pub fn update_header(kind: UpdateType) -> Vec<u8> {
    let h = UpdateHeader {
        seq: 4,
        effective_time: 0,
        timeout: 1_700_000_600,
        payload_size: 17,
    };

    let mut b = vec![0u8; h.encode_len().unwrap()];
    h.encode(&mut b).unwrap();
    b.push(kind as u8);
    b
}

/// Concatenate fragment parts
pub fn concat(parts: &[&[u8]]) -> Vec<u8> {
    parts.concat()
}

/// Issue a fragment, approving any review raised
///
/// Returns the output following approval, along with the approved review.
pub fn exchange(
    e: &mut Engine<TestDriver>,
    ins: Instruction,
    p1: u8,
    data: &[u8],
) -> Result<(Output, Option<Review>), Error> {
    exchange_p2(e, ins, p1, 0x00, data)
}

pub fn exchange_p2(
    e: &mut Engine<TestDriver>,
    ins: Instruction,
    p1: u8,
    p2: u8,
    data: &[u8],
) -> Result<(Output, Option<Review>), Error> {
    let f = Fragment::new(ins as u8, p1, p2, data)?;

    let token = match e.update(&f)? {
        Output::Pending(t) => t,
        o => return Ok((o, None)),
    };

    let review = e.review().cloned();
    if let Some(r) = &review {
        debug!("review: {}", r.header());
        for f in r.fields() {
            debug!("  {}: {}", f.label(), f.value());
        }
    }

    let o = e.resume(token, Decision::Approve)?;
    Ok((o, review))
}

/// Check a signature over the one-pass hash of `parts`
pub fn verify(path: &[u32], parts: &[&[u8]], signature: &[u8; 64]) {
    let hash = Sha256::digest(parts.concat());

    let seed = TestDriver::from_mnemonic().slip10_derive_ed25519(&hardened(path));
    let key = SigningKey::from_bytes(seed.as_bytes()).verifying_key();

    key.verify(&hash, &Signature::from_bytes(signature))
        .expect("signature verification failed");
}

/// Extract a signature output
pub fn signature(o: &Output) -> [u8; 64] {
    match o {
        Output::Signature { signature } => *signature,
        _ => panic!("expected signature, got {o:?}"),
    }
}

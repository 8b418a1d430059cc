// Copyright (c) 2022-2023 The MobileCoin Foundation

use ed25519_dalek::SigningKey;
use encdec::Encode;

use ledger_ccd_core::{
    apdu::{
        export::ExportSeedReq,
        p1::{ExportP1, PublicKeyP1, EXPORT_P2},
        path::{COIN_TYPE, HARDENED, ID_CRED_SEC, PRF_KEY, PURPOSE},
        Instruction,
    },
    engine::{Driver, Error, Output, State},
};

mod helpers;
use helpers::*;

fn expected_public_key(path: &[u32]) -> [u8; 32] {
    let seed = TestDriver::from_mnemonic().slip10_derive_ed25519(&hardened(path));
    SigningKey::from_bytes(seed.as_bytes())
        .verifying_key()
        .to_bytes()
}

fn expected_seed(identity: u32, index: u32) -> [u8; 32] {
    let path = [
        PURPOSE | HARDENED,
        COIN_TYPE | HARDENED,
        HARDENED,
        HARDENED,
        identity | HARDENED,
        index | HARDENED,
    ];
    *TestDriver::from_mnemonic()
        .slip10_derive_ed25519(&path)
        .as_bytes()
}

#[test]
fn public_key_confirmed() -> anyhow::Result<()> {
    let mut e = init();

    let (o, review) = exchange(
        &mut e,
        Instruction::GetPublicKey,
        PublicKeyP1::Confirm as u8,
        &path_bytes(&ACCOUNT_PATH),
    )?;

    let review = review.expect("path review");
    assert_eq!(review.get("Path"), Some("583'/691'/0'/0'/4'/2'/0'/0'"));

    assert_eq!(
        o,
        Output::PublicKey {
            public_key: expected_public_key(&ACCOUNT_PATH)
        }
    );

    Ok(())
}

#[test]
fn public_key_silent() -> anyhow::Result<()> {
    let mut e = init();

    let path = [PURPOSE, COIN_TYPE, 1, 0, 0];
    let (o, review) = exchange(
        &mut e,
        Instruction::GetPublicKey,
        PublicKeyP1::Silent as u8,
        &path_bytes(&path),
    )?;

    assert!(review.is_none());
    assert_eq!(
        o,
        Output::PublicKey {
            public_key: expected_public_key(&path)
        }
    );
    assert_eq!(e.state(), State::Idle);

    Ok(())
}

#[test]
fn public_key_seed_path_rejected() -> anyhow::Result<()> {
    let mut e = init();

    for last in [PRF_KEY, ID_CRED_SEC] {
        let path = [PURPOSE, COIN_TYPE, 0, 0, 3, last];
        let r = exchange(
            &mut e,
            Instruction::GetPublicKey,
            PublicKeyP1::Silent as u8,
            &path_bytes(&path),
        );
        assert_eq!(r.err(), Some(Error::InvalidPath));
    }

    Ok(())
}

#[cfg(feature = "export")]
#[test]
fn export_prf_key() -> anyhow::Result<()> {
    let mut e = init();

    let mut req = [0u8; 4];
    ExportSeedReq::new(9).encode(&mut req).unwrap();

    for selector in [ExportP1::PrfKey, ExportP1::PrfKeyRecovery] {
        let (o, review) = exchange_p2(
            &mut e,
            Instruction::ExportPrivateKeySeed,
            selector as u8,
            EXPORT_P2,
            &req,
        )?;

        let review = review.expect("export review");
        assert_eq!(review.header(), selector.header());
        assert_eq!(review.get("Identity"), Some("ID #9"));

        match o {
            Output::KeySeeds(s) => {
                assert_eq!(s.prf_key, expected_seed(9, PRF_KEY));
                assert_eq!(s.id_cred_sec, None);
            }
            o => panic!("unexpected output: {o:?}"),
        }
    }

    Ok(())
}

#[cfg(feature = "export")]
#[test]
fn export_both_seeds() -> anyhow::Result<()> {
    let mut e = init();

    let (o, _) = exchange_p2(
        &mut e,
        Instruction::ExportPrivateKeySeed,
        ExportP1::Both as u8,
        EXPORT_P2,
        &2u32.to_be_bytes(),
    )?;

    let mut buff = [0u8; 64];
    assert_eq!(o.encode(&mut buff).unwrap(), 64);
    assert_eq!(&buff[..32], &expected_seed(2, PRF_KEY));
    assert_eq!(&buff[32..], &expected_seed(2, ID_CRED_SEC));

    Ok(())
}

#[cfg(feature = "export")]
#[test]
fn export_invalid_params() -> anyhow::Result<()> {
    let mut e = init();

    let identity = 1u32.to_be_bytes();

    // Missing P2
    let r = exchange_p2(&mut e, Instruction::ExportPrivateKeySeed, 0x00, 0x00, &identity);
    assert_eq!(r.err(), Some(Error::InvalidParam));

    // Unknown selector
    let r = exchange_p2(&mut e, Instruction::ExportPrivateKeySeed, 0x03, EXPORT_P2, &identity);
    assert_eq!(r.err(), Some(Error::InvalidParam));

    assert_eq!(e.state(), State::Idle);

    Ok(())
}

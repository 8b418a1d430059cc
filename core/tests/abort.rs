// Copyright (c) 2022-2023 The MobileCoin Foundation

use ledger_ccd_core::{
    apdu::{header::TransactionKind, Instruction},
    engine::{Decision, Error, Fragment, Output, State},
};

mod helpers;
use helpers::*;

fn memo_init() -> Vec<u8> {
    concat(&[
        &path_bytes(&ACCOUNT_PATH),
        &account_header(TransactionKind::TransferWithMemo),
        &[0x7a; 32],
        &4u16.to_be_bytes(),
    ])
}

fn transfer() -> Vec<u8> {
    concat(&[
        &path_bytes(&ACCOUNT_PATH),
        &account_header(TransactionKind::Transfer),
        &[0x7a; 32],
        &100u64.to_be_bytes(),
    ])
}

#[test]
fn rejected_signature() -> anyhow::Result<()> {
    let mut e = init();

    let data = transfer();
    let f = Fragment::new(Instruction::SignTransfer as u8, 0x00, 0x00, &data)?;

    let token = match e.update(&f)? {
        Output::Pending(t) => t,
        o => panic!("unexpected output: {o:?}"),
    };
    assert_eq!(e.state(), State::Pending(Instruction::SignTransfer));

    assert_eq!(
        e.resume(token, Decision::Reject),
        Err(Error::ApprovalRejected)
    );
    assert_eq!(e.state(), State::Idle);
    assert!(e.review().is_none());

    // Stale token after rejection
    assert_eq!(e.resume(token, Decision::Approve), Err(Error::InvalidState));

    Ok(())
}

#[test]
fn rejected_intermediate_review() -> anyhow::Result<()> {
    let mut e = init();

    let data = memo_init();
    let f = Fragment::new(Instruction::SignTransferWithMemo as u8, 0x01, 0x00, &data)?;

    let token = match e.update(&f)? {
        Output::Pending(t) => t,
        o => panic!("unexpected output: {o:?}"),
    };
    assert_eq!(
        e.resume(token, Decision::Reject),
        Err(Error::ApprovalRejected)
    );

    // Continuing the aborted flow is not possible
    let f = Fragment::new(Instruction::SignTransferWithMemo as u8, 0x02, 0x00, &[0x63, 0x61, 0x62, 0x63])?;
    assert_eq!(e.update(&f), Err(Error::InvalidState));
    assert_eq!(e.state(), State::Idle);

    Ok(())
}

#[test]
fn pending_blocks_fragments() -> anyhow::Result<()> {
    let mut e = init();

    let data = memo_init();
    let f = Fragment::new(Instruction::SignTransferWithMemo as u8, 0x01, 0x00, &data)?;

    let token = match e.update(&f)? {
        Output::Pending(t) => t,
        o => panic!("unexpected output: {o:?}"),
    };

    // Fragments for any instruction abort a pending review
    let other = transfer();
    let f = Fragment::new(Instruction::SignTransfer as u8, 0x00, 0x00, &other)?;
    assert_eq!(e.update(&f), Err(Error::InvalidState));
    assert_eq!(e.state(), State::Idle);

    assert_eq!(e.resume(token, Decision::Approve), Err(Error::InvalidState));

    Ok(())
}

#[test]
fn instruction_switch_restarts() -> anyhow::Result<()> {
    let mut e = init();

    // Start a memo transfer and approve the recipient
    let (o, _) = exchange(&mut e, Instruction::SignTransferWithMemo, 0x01, &memo_init())?;
    assert_eq!(o, Output::Ack);
    assert_eq!(e.state(), State::Active(Instruction::SignTransferWithMemo));

    // A different instruction discards the memo flow and starts afresh
    let (o, review) = exchange(&mut e, Instruction::SignTransfer, 0x00, &transfer())?;
    assert_eq!(review.expect("transfer review").header(), "Transfer");
    assert!(matches!(o, Output::Signature { .. }));

    // The memo flow can not be resumed
    let r = exchange(&mut e, Instruction::SignTransferWithMemo, 0x02, &[0x63, 0x61, 0x62, 0x63]);
    assert_eq!(r.err(), Some(Error::InvalidState));

    Ok(())
}

#[test]
fn out_of_order_fragment() -> anyhow::Result<()> {
    let mut e = init();

    exchange(&mut e, Instruction::SignTransferWithMemo, 0x01, &memo_init())?;

    // Amount before the memo
    let r = exchange(&mut e, Instruction::SignTransferWithMemo, 0x03, &1u64.to_be_bytes());
    assert_eq!(r.err(), Some(Error::InvalidState));
    assert_eq!(e.state(), State::Idle);

    // A fresh flow succeeds afterwards
    let (o, _) = exchange(&mut e, Instruction::SignTransfer, 0x00, &transfer())?;
    assert!(matches!(o, Output::Signature { .. }));

    Ok(())
}

#[test]
fn reset_discards_flow() -> anyhow::Result<()> {
    let mut e = init();

    exchange(&mut e, Instruction::SignTransferWithMemo, 0x01, &memo_init())?;
    assert!(e.state().instruction().is_some());

    e.reset();
    assert_eq!(e.state(), State::Idle);

    let r = exchange(&mut e, Instruction::SignTransferWithMemo, 0x02, &[0x63, 0x61, 0x62, 0x63]);
    assert_eq!(r.err(), Some(Error::InvalidState));

    Ok(())
}

#[test]
fn invalid_path_aborts() -> anyhow::Result<()> {
    let mut e = init();

    // Path shorter than the minimum signing path
    let data = concat(&[
        &path_bytes(&ACCOUNT_PATH[..2]),
        &account_header(TransactionKind::Transfer),
        &[0x7a; 32],
        &100u64.to_be_bytes(),
    ]);

    let r = exchange(&mut e, Instruction::SignTransfer, 0x00, &data);
    assert_eq!(r.err(), Some(Error::InvalidPath));
    assert_eq!(e.state(), State::Idle);

    Ok(())
}

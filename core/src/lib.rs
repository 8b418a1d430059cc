// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Concordium hardware wallet core
//!
//! This provides a common [Engine][engine] supporting transaction co-signing
//! for execution on hardware wallets.
//!
//! Interactions with the [Engine][engine] are performed via [Fragment][engine::Fragment]s
//! and [Output][engine::Output]s, see [ledger_ccd_apdu] for APDU objects and wire encodings.
//!
//! ## Operations
//!
//! ### Requesting public keys
//!
//! Public keys are requested via [`Instruction::GetPublicKey`][apdu::Instruction::GetPublicKey]
//! with a signing path. With [`PublicKeyP1::Confirm`][apdu::p1::PublicKeyP1::Confirm] the
//! path is shown for approval prior to returning a
//! [`PublicKeyResp`][apdu::sign::PublicKeyResp], with
//! [`PublicKeyP1::Silent`][apdu::p1::PublicKeyP1::Silent] the key is returned immediately.
//!
//! ### Signing a transaction
//!
//! Transactions are streamed as a sequence of fragments, each tagged (`P1`)
//! with the field it carries. The engine feeds the canonical transaction
//! bytes into a running SHA-256 hash as fragments arrive, and builds the
//! review shown to the user.
//!
//! 1. Issue the initial fragment for the instruction, carrying the signing
//!    path and the transaction header.
//! 2. Issue each following fragment in the order given in [apdu::p1];
//!    intermediate fragments return a [`FlowInfo`][apdu::state::FlowInfo]
//!    naming the stage the device now expects.
//! 3. Where the engine returns [`Output::Pending`][engine::Output::Pending],
//!    render [`Engine::review`][engine::Engine::review] and apply the user
//!    decision with [`Engine::resume`][engine::Engine::resume].
//!    Intermediate approvals resume fragment intake, the final approval
//!    returns a [`SignatureResp`][apdu::sign::SignatureResp] over the
//!    transaction hash.
//!
//! Any error, rejection or out-of-order fragment aborts the flow, discarding
//! the hash and review; the host must restart from the initial fragment.
//!
//! ### Exporting key seeds
//!
//! The PRF-key and IdCredSec seeds of an identity may be exported via
//! [`ExportSeedReq`][apdu::export::ExportSeedReq], returning a
//! [`KeySeedResp`][apdu::export::KeySeedResp] following user approval.
//! No other key material is exportable.

#![cfg_attr(not(feature = "std"), no_std)]

pub use ledger_ccd_apdu::{self as apdu};

pub mod engine;

pub mod helpers;

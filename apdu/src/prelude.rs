//! Prelude to simplify downstream use of APDU objects
//!

pub use crate::{
    baker::{BakerFields, OpenStatus},
    export::{ExportSeedReq, KeySeedResp},
    header::{AccountTransactionHeader, TransactionKind, UpdateHeader, UpdateType},
    p1::*,
    path::RawPath,
    sign::{PublicKeyResp, SignatureResp},
    state::FlowInfo,
    status::StatusWord,
    Instruction,
};

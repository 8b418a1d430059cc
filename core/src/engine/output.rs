// Copyright (c) 2022-2023 The MobileCoin Foundation

use encdec::Encode;

use ledger_proto::ApduError;

use crate::apdu::{
    export::KeySeedResp,
    sign::{PublicKeyResp, SignatureResp},
    state::FlowInfo,
};

use super::ApprovalToken;

/// [`Engine`][super::Engine] outputs (in response to fragments and approvals),
/// typically encoded to response [APDUs][crate::apdu]
#[derive(Clone, PartialEq, Debug)]
pub enum Output {
    /// Fragment accepted, more expected
    MoreData { info: FlowInfo },

    /// Review pending user approval
    Pending(ApprovalToken),

    /// Approval accepted, fragment intake resumed
    Ack,

    /// Ed25519 signature over the transaction hash
    Signature { signature: [u8; 64] },

    /// Ed25519 public key for the requested path
    PublicKey { public_key: [u8; 32] },

    /// Exported key seeds, zeroized on drop
    KeySeeds(KeySeedResp),
}

impl Output {
    /// Encode an [`Output`] object to a response [APDU]
    #[cfg_attr(feature = "noinline", inline(never))]
    pub fn encode(&self, buff: &mut [u8]) -> Result<usize, ApduError> {
        match self {
            Output::MoreData { info } => info.encode(buff),
            Output::Pending(_) | Output::Ack => Ok(0),
            Output::Signature { signature } => SignatureResp {
                signature: *signature,
            }
            .encode(buff),
            Output::PublicKey { public_key } => PublicKeyResp {
                public_key: *public_key,
            }
            .encode(buff),
            Output::KeySeeds(seeds) => seeds.encode(buff),
        }
    }

    /// Fetch flow progress for outputs containing this
    pub fn info(&self) -> Option<&FlowInfo> {
        match self {
            Output::MoreData { info } => Some(info),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_encoding() {
        let mut buff = [0u8; 128];

        let o = Output::MoreData {
            info: FlowInfo {
                ins: 0x32,
                state: 2,
                remaining: 300,
            },
        };
        assert_eq!(o.encode(&mut buff).unwrap(), 6);
        assert_eq!(&buff[..6], &[0x32, 0x02, 0x00, 0x00, 0x01, 0x2c]);

        assert_eq!(Output::Ack.encode(&mut buff).unwrap(), 0);

        let o = Output::Signature {
            signature: [0xab; 64],
        };
        assert_eq!(o.encode(&mut buff).unwrap(), 64);
        assert_eq!(&buff[..64], &[0xab; 64]);

        let o = Output::KeySeeds(KeySeedResp {
            prf_key: [0x01; 32],
            id_cred_sec: Some([0x02; 32]),
        });
        assert_eq!(o.encode(&mut buff).unwrap(), 64);
        assert_eq!(&buff[32..64], &[0x02; 32]);
    }
}

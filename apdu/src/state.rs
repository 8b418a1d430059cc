// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Flow progress APDUs
//!
//! Intermediate fragments are acknowledged with a [`FlowInfo`] so the host can
//! check it is in step with the device before sending the next fragment.

use encdec::{DecodeOwned, Encode};

use crate::{
    helpers::{be, check_len},
    ApduError,
};

/// Flow progress response
///
/// `state` is the per-instruction stage the device now expects, `remaining`
/// the number of bytes still expected for a chunked field (or zero).
///
/// ## Encoding:
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |      INS      |     STATE     |       REMAINING (u32, BE)     /
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// /                               |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Copy, Clone, PartialEq, Debug, Default)]
pub struct FlowInfo {
    pub ins: u8,
    pub state: u8,
    pub remaining: u32,
}

impl FlowInfo {
    pub const LEN: usize = 6;
}

impl Encode for FlowInfo {
    type Error = ApduError;

    fn encode_len(&self) -> Result<usize, Self::Error> {
        Ok(Self::LEN)
    }

    fn encode(&self, buff: &mut [u8]) -> Result<usize, Self::Error> {
        check_len(buff, Self::LEN)?;

        buff[0] = self.ins;
        buff[1] = self.state;
        be::enc_u32(self.remaining, &mut buff[2..])?;

        Ok(Self::LEN)
    }
}

impl DecodeOwned for FlowInfo {
    type Output = Self;
    type Error = ApduError;

    fn decode_owned(buff: &[u8]) -> Result<(Self::Output, usize), Self::Error> {
        check_len(buff, Self::LEN)?;

        let (remaining, _) = be::dec_u32(&buff[2..])?;

        Ok((
            Self {
                ins: buff[0],
                state: buff[1],
                remaining,
            },
            Self::LEN,
        ))
    }
}

#[cfg(test)]
mod test {
    use rand::random;

    use super::*;
    use crate::test::encode_decode_apdu;

    #[test]
    fn flow_info_apdu() {
        let apdu = FlowInfo {
            ins: random(),
            state: random(),
            remaining: random(),
        };

        let mut buff = [0u8; 16];
        assert_eq!(encode_decode_apdu(&mut buff, &apdu), FlowInfo::LEN);
    }
}

// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Display formatting helpers
//!
//! Each helper renders into a caller-provided buffer and returns the written
//! `&str`, failing with [`Error::DisplayOverflow`] where the value does not fit.

use core::str::from_utf8;

use byteorder::{BigEndian, ByteOrder};
use chrono::{DateTime, Datelike, Timelike};
use emstr::EncodeStr;

use crate::{apdu::path::HARDENED, engine::Error};

/// micro-GTU per GTU
pub const GTU_SCALAR: u64 = 1_000_000;

/// Fraction digits of a GTU amount
const GTU_DECIMALS: usize = 6;

/// Fraction digits of a commission rate (parts per 100 000, shown in percent)
const COMMISSION_DECIMALS: usize = 3;

/// Base58check version byte for account addresses
const ADDRESS_VERSION: u8 = 1;

const HEX: &[u8; 16] = b"0123456789abcdef";

/// Format a micro-GTU amount as a GTU decimal with trailing zeros trimmed
pub fn fmt_amount(micro_gtu: u64, buff: &mut [u8]) -> Result<&str, Error> {
    let n = write_fractional(micro_gtu, GTU_DECIMALS, buff)?;
    to_str(&buff[..n])
}

/// Format a commission rate in parts per 100 000 as a percentage
pub fn fmt_percent(parts: u32, buff: &mut [u8]) -> Result<&str, Error> {
    let mut n = write_fractional(parts as u64, COMMISSION_DECIMALS, buff)?;
    n += write_bytes(b"%", &mut buff[n..])?;
    to_str(&buff[..n])
}

/// Format an account address (base58check, version 1)
pub fn fmt_address<'a>(address: &[u8; 32], buff: &'a mut [u8]) -> Result<&'a str, Error> {
    let n = bs58::encode(address)
        .with_check_version(ADDRESS_VERSION)
        .into(&mut buff[..])
        .map_err(|_| Error::InvalidTransaction)?;
    to_str(&buff[..n])
}

/// Format bytes as lower-case hex
pub fn fmt_hex<'a>(data: &[u8], buff: &'a mut [u8]) -> Result<&'a str, Error> {
    let n = write_hex(data, buff)?;
    to_str(&buff[..n])
}

/// Format an unsigned integer
pub fn fmt_u64(value: u64, buff: &mut [u8]) -> Result<&str, Error> {
    let n = emstr::write!(&mut buff[..], &value).map_err(|_| Error::DisplayOverflow)?;
    to_str(&buff[..n])
}

/// Format a `YYYYMM` year / month pair
pub fn fmt_date(year: u16, month: u8, buff: &mut [u8]) -> Result<&str, Error> {
    let mut n = emstr::write!(&mut buff[..], &year).map_err(|_| Error::DisplayOverflow)?;
    if month < 10 {
        n += write_bytes(b"0", &mut buff[n..])?;
    }
    n += emstr::write!(&mut buff[n..], &month).map_err(|_| Error::DisplayOverflow)?;
    to_str(&buff[..n])
}

/// Format an exchange rate as `numerator / denominator`
pub fn fmt_ratio(numerator: u64, denominator: u64, buff: &mut [u8]) -> Result<&str, Error> {
    let n = emstr::write!(&mut buff[..], &numerator, " / ", &denominator)
        .map_err(|_| Error::DisplayOverflow)?;
    to_str(&buff[..n])
}

/// Format an identity index as `ID #<n>`
pub fn fmt_identity(identity: u32, buff: &mut [u8]) -> Result<&str, Error> {
    let n = emstr::write!(&mut buff[..], "ID #", &identity).map_err(|_| Error::DisplayOverflow)?;
    to_str(&buff[..n])
}

/// Format a numbered label such as `Release 3`
pub fn fmt_numbered<'a>(prefix: &str, index: u32, buff: &'a mut [u8]) -> Result<&'a str, Error> {
    let mut n = write_bytes(prefix.as_bytes(), buff)?;
    n += emstr::write!(&mut buff[n..], &index).map_err(|_| Error::DisplayOverflow)?;
    to_str(&buff[..n])
}

/// Format a millisecond UNIX timestamp as `YYYY-MM-DD hh:mm:ss` (UTC)
pub fn fmt_timestamp(millis: u64, buff: &mut [u8]) -> Result<&str, Error> {
    let n = write_timestamp(millis, buff)?;
    to_str(&buff[..n])
}

/// Format a scheduled release as `<amount> GTU at <timestamp>`
pub fn fmt_release(micro_gtu: u64, millis: u64, buff: &mut [u8]) -> Result<&str, Error> {
    let mut n = write_fractional(micro_gtu, GTU_DECIMALS, buff)?;
    n += write_bytes(b" GTU at ", &mut buff[n..])?;
    n += write_timestamp(millis, &mut buff[n..])?;
    to_str(&buff[..n])
}

/// Format a derivation path, marking hardened indices with `'`
pub fn fmt_path<'a>(indices: &[u32], buff: &'a mut [u8]) -> Result<&'a str, Error> {
    let mut n = 0;
    for (i, v) in indices.iter().enumerate() {
        if i > 0 {
            n += write_bytes(b"/", &mut buff[n..])?;
        }

        let index = v & !HARDENED;
        n += emstr::write!(&mut buff[n..], &index).map_err(|_| Error::DisplayOverflow)?;

        if v & HARDENED != 0 {
            n += write_bytes(b"'", &mut buff[n..])?;
        }
    }
    to_str(&buff[..n])
}

/// Format text, truncating with `..` where it exceeds the buffer
pub fn fmt_truncated<'a>(text: &str, buff: &'a mut [u8]) -> Result<&'a str, Error> {
    if text.len() <= buff.len() {
        let n = write_bytes(text.as_bytes(), buff)?;
        return to_str(&buff[..n]);
    }

    if buff.len() < 2 {
        return Err(Error::DisplayOverflow);
    }

    let mut n = buff.len() - 2;
    while !text.is_char_boundary(n) {
        n -= 1;
    }

    buff[..n].copy_from_slice(&text.as_bytes()[..n]);
    buff[n..n + 2].copy_from_slice(b"..");
    to_str(&buff[..n + 2])
}

/// Format a CBOR encoded memo
///
/// Text strings and unsigned integers spanning the whole memo are rendered as
/// values, anything else as (truncated) hex so every signed byte is shown.
pub fn fmt_memo<'a>(memo: &[u8], buff: &'a mut [u8]) -> Result<&'a str, Error> {
    if let Some((major, value, n)) = cbor_header(memo) {
        match major {
            CBOR_UINT if n == memo.len() => return fmt_u64(value, buff),
            CBOR_TEXT if value as usize == memo.len() - n => {
                if let Ok(text) = from_utf8(&memo[n..]) {
                    return fmt_truncated(text, buff);
                }
            }
            _ => (),
        }
    }

    // Fall back to hex, keeping room for the truncation marker
    let max = buff.len().saturating_sub(2) / 2;
    if memo.len() <= buff.len() / 2 {
        return fmt_hex(memo, buff);
    }

    let mut n = write_hex(&memo[..max], buff)?;
    n += write_bytes(b"..", &mut buff[n..])?;
    to_str(&buff[..n])
}

const CBOR_UINT: u8 = 0;
const CBOR_TEXT: u8 = 3;

/// Parse a CBOR item header, returning the major type, argument and header length
fn cbor_header(data: &[u8]) -> Option<(u8, u64, usize)> {
    let b = *data.first()?;
    let major = b >> 5;
    let info = b & 0x1f;

    let (value, n) = match info {
        0..=23 => (info as u64, 1),
        24 => (*data.get(1)? as u64, 2),
        25 => (BigEndian::read_u16(data.get(1..3)?) as u64, 3),
        26 => (BigEndian::read_u32(data.get(1..5)?) as u64, 5),
        27 => (BigEndian::read_u64(data.get(1..9)?), 9),
        _ => return None,
    };

    Some((major, value, n))
}

/// Write `value / 10^decimals` as a decimal with trailing fraction zeros trimmed
fn write_fractional(value: u64, decimals: usize, buff: &mut [u8]) -> Result<usize, Error> {
    let scalar = 10u64.pow(decimals as u32);
    let whole = value / scalar;
    let mut frac = value % scalar;

    let mut n = emstr::write!(&mut buff[..], &whole).map_err(|_| Error::DisplayOverflow)?;
    if frac == 0 {
        return Ok(n);
    }

    let mut digits = decimals;
    while frac % 10 == 0 {
        frac /= 10;
        digits -= 1;
    }

    if buff.len() < n + 1 + digits {
        return Err(Error::DisplayOverflow);
    }

    buff[n] = b'.';
    for i in (0..digits).rev() {
        buff[n + 1 + i] = b'0' + (frac % 10) as u8;
        frac /= 10;
    }
    n += 1 + digits;

    Ok(n)
}

fn write_timestamp(millis: u64, buff: &mut [u8]) -> Result<usize, Error> {
    let t = i64::try_from(millis)
        .ok()
        .and_then(DateTime::from_timestamp_millis)
        .ok_or(Error::InvalidTransaction)?;
    let year = u32::try_from(t.year()).map_err(|_| Error::InvalidTransaction)?;

    let mut n = emstr::write!(&mut buff[..], &year).map_err(|_| Error::DisplayOverflow)?;

    let parts = [
        (b'-', t.month()),
        (b'-', t.day()),
        (b' ', t.hour()),
        (b':', t.minute()),
        (b':', t.second()),
    ];
    for (sep, v) in parts {
        if buff.len() < n + 3 {
            return Err(Error::DisplayOverflow);
        }

        buff[n] = sep;
        buff[n + 1] = b'0' + (v / 10) as u8;
        buff[n + 2] = b'0' + (v % 10) as u8;
        n += 3;
    }

    Ok(n)
}

fn write_hex(data: &[u8], buff: &mut [u8]) -> Result<usize, Error> {
    if buff.len() < data.len() * 2 {
        return Err(Error::DisplayOverflow);
    }

    for (i, b) in data.iter().enumerate() {
        buff[i * 2] = HEX[(b >> 4) as usize];
        buff[i * 2 + 1] = HEX[(b & 0x0f) as usize];
    }

    Ok(data.len() * 2)
}

fn write_bytes(data: &[u8], buff: &mut [u8]) -> Result<usize, Error> {
    if buff.len() < data.len() {
        return Err(Error::DisplayOverflow);
    }
    buff[..data.len()].copy_from_slice(data);
    Ok(data.len())
}

fn to_str(buff: &[u8]) -> Result<&str, Error> {
    from_utf8(buff).map_err(|_| Error::DisplayOverflow)
}

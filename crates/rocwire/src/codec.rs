//! Bounds-checked buffer reads and writes
//!
//! `bytes::Buf` panics on underflow, so every read goes through one of
//! these helpers and surfaces `WireError::Truncated` instead.

use crate::error::{Result, WireError};
use bytes::{Buf, BufMut};

fn ensure<B: Buf>(buf: &B, need: usize) -> Result<()> {
    if buf.remaining() < need {
        return Err(WireError::Truncated {
            need,
            have: buf.remaining(),
        });
    }
    Ok(())
}

pub fn get_u8<B: Buf>(buf: &mut B) -> Result<u8> {
    ensure(buf, 1)?;
    Ok(buf.get_u8())
}

pub fn get_i8<B: Buf>(buf: &mut B) -> Result<i8> {
    ensure(buf, 1)?;
    Ok(buf.get_i8())
}

pub fn get_u16_le<B: Buf>(buf: &mut B) -> Result<u16> {
    ensure(buf, 2)?;
    Ok(buf.get_u16_le())
}

pub fn get_i16_le<B: Buf>(buf: &mut B) -> Result<i16> {
    ensure(buf, 2)?;
    Ok(buf.get_i16_le())
}

pub fn get_u32_le<B: Buf>(buf: &mut B) -> Result<u32> {
    ensure(buf, 4)?;
    Ok(buf.get_u32_le())
}

pub fn get_i32_le<B: Buf>(buf: &mut B) -> Result<i32> {
    ensure(buf, 4)?;
    Ok(buf.get_i32_le())
}

pub fn get_f32_le<B: Buf>(buf: &mut B) -> Result<f32> {
    ensure(buf, 4)?;
    Ok(buf.get_f32_le())
}

pub fn get_f64_le<B: Buf>(buf: &mut B) -> Result<f64> {
    ensure(buf, 8)?;
    Ok(buf.get_f64_le())
}

/// Read exactly `n` raw bytes.
pub fn get_bytes<B: Buf>(buf: &mut B, n: usize) -> Result<Vec<u8>> {
    ensure(buf, n)?;
    let mut out = vec![0u8; n];
    buf.copy_to_slice(&mut out);
    Ok(out)
}

/// Read an `n`-byte fixed-width ASCII field.
///
/// Decoded as UTF-8 with a Latin-1 fallback; trailing whitespace and NULs
/// are trimmed (the device pads tags to the field width).
pub fn get_ascii<B: Buf>(buf: &mut B, n: usize) -> Result<String> {
    let raw = get_bytes(buf, n)?;
    let text = match std::str::from_utf8(&raw) {
        Ok(s) => s.to_owned(),
        Err(_) => raw.iter().map(|&b| b as char).collect(),
    };
    Ok(text
        .trim_end_matches(|c: char| c == '\0' || c.is_whitespace())
        .to_owned())
}

/// Write `s` into an `n`-byte ASCII field, space-padded on the right.
///
/// Fails if `s` does not fit the field.
pub fn put_ascii<B: BufMut>(buf: &mut B, s: &str, n: usize) -> Result<()> {
    let bytes = s.as_bytes();
    if bytes.len() > n {
        return Err(WireError::InvalidData(format!(
            "string of {} bytes does not fit {}-byte field",
            bytes.len(),
            n
        )));
    }
    buf.put_slice(bytes);
    buf.put_bytes(b' ', n - bytes.len());
    Ok(())
}

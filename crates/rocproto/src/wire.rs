//! Shared decode helpers for opcode bodies

use crate::error::{ProtoError, Result};
use bytes::Buf;
use chrono::{DateTime, Utc};
use rocwire::codec;
use roctlp::TlpInstance;

/// Read a u32 little-endian Unix timestamp.
pub(crate) fn get_epoch_time<B: Buf>(buf: &mut B) -> Result<DateTime<Utc>> {
    let secs = codec::get_u32_le(buf)?;
    DateTime::from_timestamp(i64::from(secs), 0)
        .ok_or_else(|| ProtoError::InvalidData(format!("unrepresentable timestamp {secs}")))
}

/// Read a raw 3-byte TLP reference.
///
/// Never consults the registry; unknown point types stay decodable and are
/// resolved lazily (synthesizing an unknown point type if need be).
pub(crate) fn get_tlp<B: Buf>(buf: &mut B) -> Result<TlpInstance> {
    let point_type = codec::get_u8(buf)?;
    let logical_number = codec::get_u8(buf)?;
    let parameter = codec::get_u8(buf)?;
    Ok(TlpInstance::new(point_type, logical_number, parameter))
}

//! Opcode 6 (system configuration) and opcode 7 (real-time clock)

use crate::enums::{
    LogicalCompatibilityStatus, OpcodeRevision, RocOperatingMode, RocSubType, RocType,
};
use crate::error::{ProtoError, Result};
use crate::request::RequestBody;
use crate::response::ResponseBody;
use bytes::Bytes;
use chrono::{NaiveDate, NaiveDateTime};
use rocwire::codec;
use serde::Serialize;
use std::collections::BTreeMap;

/// Lowest point type number reported in the opcode 6 count table.
const FIRST_COUNTED_POINT_TYPE: u8 = 60;
/// Reserved bytes between `roc_subtype` and `roc_type` in the body.
const RESERVED_SPAN: usize = 11;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SystemConfig {
    pub operating_mode: RocOperatingMode,
    /// Port the request arrived on.
    pub comm_port: i16,
    pub security_access_mode: u8,
    pub compatibility_status: LogicalCompatibilityStatus,
    pub opcode_revision: OpcodeRevision,
    pub roc_subtype: RocSubType,
    pub roc_type: RocType,
    /// Logical point count per point type, for point types 60 and up.
    pub point_type_counts: BTreeMap<u8, u8>,
}

impl SystemConfig {
    pub fn point_count(&self, point_type: u8) -> u8 {
        self.point_type_counts.get(&point_type).copied().unwrap_or(0)
    }
}

pub(crate) fn decode_system_config(body: &mut Bytes, _req: &RequestBody) -> Result<ResponseBody> {
    let operating_mode = RocOperatingMode::try_from(codec::get_u8(body)?)?;
    let comm_port = codec::get_i16_le(body)?;
    let security_access_mode = codec::get_u8(body)?;
    let compatibility_status = LogicalCompatibilityStatus::try_from(codec::get_u8(body)?)?;
    let opcode_revision = OpcodeRevision::try_from(codec::get_u8(body)?)?;
    let roc_subtype = RocSubType::try_from(codec::get_u8(body)?)?;
    codec::get_bytes(body, RESERVED_SPAN)?;
    let roc_type = RocType::try_from(codec::get_u8(body)?)?;

    let mut point_type_counts = BTreeMap::new();
    let mut point_type = FIRST_COUNTED_POINT_TYPE;
    while !body.is_empty() {
        point_type_counts.insert(point_type, codec::get_u8(body)?);
        if point_type == u8::MAX {
            break;
        }
        point_type += 1;
    }

    Ok(ResponseBody::SystemConfig(SystemConfig {
        operating_mode,
        comm_port,
        security_access_mode,
        compatibility_status,
        opcode_revision,
        roc_subtype,
        roc_type,
        point_type_counts,
    }))
}

/// Device wall-clock reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClockTime {
    pub second: u8,
    pub minute: u8,
    pub hour: u8,
    pub day: u8,
    pub month: u8,
    pub year: u16,
    /// 1 = Sunday .. 7 = Saturday.
    pub weekday: u8,
}

impl ClockTime {
    pub fn datetime(&self) -> Result<NaiveDateTime> {
        NaiveDate::from_ymd_opt(i32::from(self.year), u32::from(self.month), u32::from(self.day))
            .and_then(|d| {
                d.and_hms_opt(
                    u32::from(self.hour),
                    u32::from(self.minute),
                    u32::from(self.second),
                )
            })
            .ok_or_else(|| ProtoError::InvalidData(format!("invalid device clock reading {self:?}")))
    }
}

pub(crate) fn decode_clock(body: &mut Bytes, _req: &RequestBody) -> Result<ResponseBody> {
    let second = codec::get_u8(body)?;
    let minute = codec::get_u8(body)?;
    let hour = codec::get_u8(body)?;
    let day = codec::get_u8(body)?;
    let month = codec::get_u8(body)?;
    let year = codec::get_u16_le(body)?;
    let weekday = codec::get_u8(body)?;
    Ok(ResponseBody::ClockTime(ClockTime {
        second,
        minute,
        hour,
        day,
        month,
        year,
        weekday,
    }))
}

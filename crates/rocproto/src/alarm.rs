//! Alarm log records
//!
//! Fixed 23-byte records. Byte 0 packs three fields: bit 7 is the SRBX
//! flag, bit 6 the set/cleared condition, bits 5..0 the alarm type code.
//! Bytes 1..5 are the timestamp; the remaining 18 bytes are type-specific.

use crate::enums::{AlarmCondition, ParameterAlarmCode};
use crate::error::{ProtoError, Result};
use crate::wire;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use rocwire::codec;
use roctlp::TlpInstance;
use serde::Serialize;

pub const ALARM_RECORD_LEN: usize = 23;

const SRBX_BIT: u8 = 0x80;
const CONDITION_BIT: u8 = 0x40;
const TYPE_CODE_MASK: u8 = 0x3F;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlarmRecord {
    /// True when the device issued a Spontaneous Report-By-Exception.
    pub is_srbx: bool,
    pub condition: AlarmCondition,
    pub timestamp: DateTime<Utc>,
    pub detail: AlarmDetail,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum AlarmDetail {
    /// Code 0: slot not in use.
    None,
    /// Code 1: a parameter reached an alarm value.
    Parameter {
        alarm_code: ParameterAlarmCode,
        tlp: TlpInstance,
        description: String,
        value: f32,
    },
    /// Code 2: logged by an FST.
    Fst {
        fst: u8,
        description: String,
        value: f32,
    },
    /// Code 3: text alarm from a user C++ program.
    UserText { description: String },
    /// Code 4: value alarm from a user C++ program.
    UserValue { description: String, value: f32 },
}

impl AlarmRecord {
    /// Decode one record from exactly `ALARM_RECORD_LEN` bytes.
    pub fn decode(data: &[u8]) -> Result<Self> {
        if data.len() < ALARM_RECORD_LEN {
            return Err(ProtoError::Wire(rocwire::WireError::Truncated {
                need: ALARM_RECORD_LEN,
                have: data.len(),
            }));
        }
        let mut buf = Bytes::copy_from_slice(&data[..ALARM_RECORD_LEN]);

        let head = codec::get_u8(&mut buf)?;
        let is_srbx = head & SRBX_BIT != 0;
        let condition = if head & CONDITION_BIT != 0 {
            AlarmCondition::Set
        } else {
            AlarmCondition::Cleared
        };
        let type_code = head & TYPE_CODE_MASK;
        let timestamp = wire::get_epoch_time(&mut buf)?;

        let detail = match type_code {
            0 => AlarmDetail::None,
            1 => {
                let alarm_code = ParameterAlarmCode::try_from(codec::get_u8(&mut buf)?)?;
                let tlp = wire::get_tlp(&mut buf)?;
                let description = codec::get_ascii(&mut buf, 10)?;
                let value = codec::get_f32_le(&mut buf)?;
                AlarmDetail::Parameter {
                    alarm_code,
                    tlp,
                    description,
                    value,
                }
            }
            2 => {
                let fst = codec::get_u8(&mut buf)?;
                let description = codec::get_ascii(&mut buf, 13)?;
                let value = codec::get_f32_le(&mut buf)?;
                AlarmDetail::Fst {
                    fst,
                    description,
                    value,
                }
            }
            3 => AlarmDetail::UserText {
                description: codec::get_ascii(&mut buf, 18)?,
            },
            4 => {
                let description = codec::get_ascii(&mut buf, 14)?;
                let value = codec::get_f32_le(&mut buf)?;
                AlarmDetail::UserValue { description, value }
            }
            code => return Err(ProtoError::UnknownAlarmType(code)),
        };

        Ok(AlarmRecord {
            is_srbx,
            condition,
            timestamp,
            detail,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(head: u8, payload: &[u8]) -> Vec<u8> {
        let mut data = vec![head];
        data.extend_from_slice(&1_700_000_000u32.to_le_bytes());
        data.extend_from_slice(payload);
        data.resize(ALARM_RECORD_LEN, 0);
        data
    }

    #[test]
    fn parameter_alarm_with_flags() {
        // 0x41 = condition set, kind 1, no SRBX.
        let mut payload = vec![0x02, 0x67, 0x01, 0x15];
        payload.extend_from_slice(b"HI_ALRM   ");
        payload.extend_from_slice(&10.0f32.to_le_bytes());
        let alarm = AlarmRecord::decode(&record(0x41, &payload)).unwrap();

        assert!(!alarm.is_srbx);
        assert_eq!(alarm.condition, AlarmCondition::Set);
        assert_eq!(alarm.timestamp.timestamp(), 1_700_000_000);
        assert_eq!(
            alarm.detail,
            AlarmDetail::Parameter {
                alarm_code: ParameterAlarmCode::HighAlarm,
                tlp: TlpInstance::new(0x67, 0x01, 0x15),
                description: "HI_ALRM".into(),
                value: 10.0,
            }
        );
    }

    #[test]
    fn srbx_and_cleared_flags() {
        let alarm = AlarmRecord::decode(&record(0x80, &[])).unwrap();
        assert!(alarm.is_srbx);
        assert_eq!(alarm.condition, AlarmCondition::Cleared);
        assert_eq!(alarm.detail, AlarmDetail::None);
    }

    #[test]
    fn fst_alarm() {
        let mut payload = vec![0x02];
        payload.extend_from_slice(b"FST ALARM    ");
        payload.extend_from_slice(&2.5f32.to_le_bytes());
        let alarm = AlarmRecord::decode(&record(0x42, &payload)).unwrap();
        assert_eq!(
            alarm.detail,
            AlarmDetail::Fst {
                fst: 2,
                description: "FST ALARM".into(),
                value: 2.5,
            }
        );
    }

    #[test]
    fn user_text_alarm() {
        let alarm = AlarmRecord::decode(&record(0x03, b"PLUNGER FAULT     ")).unwrap();
        assert_eq!(
            alarm.detail,
            AlarmDetail::UserText {
                description: "PLUNGER FAULT".into()
            }
        );
    }

    #[test]
    fn user_value_alarm() {
        let mut payload = b"OVERSPEED     ".to_vec();
        payload.extend_from_slice(&99.5f32.to_le_bytes());
        let alarm = AlarmRecord::decode(&record(0x44, &payload)).unwrap();
        assert_eq!(
            alarm.detail,
            AlarmDetail::UserValue {
                description: "OVERSPEED".into(),
                value: 99.5,
            }
        );
    }

    #[test]
    fn unknown_type_code() {
        let err = AlarmRecord::decode(&record(0x05, &[])).unwrap_err();
        assert_eq!(err, ProtoError::UnknownAlarmType(5));
    }

    #[test]
    fn short_record_rejected() {
        let err = AlarmRecord::decode(&[0u8; 22]).unwrap_err();
        assert!(matches!(err, ProtoError::Wire(_)));
    }
}

//! Event log records
//!
//! Fixed 22-byte records. Byte 0 is the event type code, bytes 1..5 the
//! timestamp, the remaining 17 bytes type-specific.

use crate::enums::{SystemEventCode, UserEventCode};
use crate::error::{ProtoError, Result};
use crate::wire;
use bytes::Bytes;
use chrono::{DateTime, Duration, Utc};
use rocwire::{codec, DataType};
use roctlp::{TlpInstance, TlpValue};
use serde::Serialize;

pub const EVENT_RECORD_LEN: usize = 22;

/// Offset of the old-value slot within a parameter-change record.
const OLD_VALUE_OFFSET: usize = 16;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventRecord {
    pub timestamp: DateTime<Utc>,
    pub detail: EventDetail,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum EventDetail {
    /// Code 0: slot not in use.
    None,
    /// Code 1: a user changed a TLP.
    ParameterChange {
        operator_id: String,
        tlp: TlpInstance,
        data_type: DataType,
        new_value: TlpValue,
        /// Absent when the value is wider than the 4-byte old-value slot.
        old_value: Option<TlpValue>,
    },
    /// Code 2: internal system event.
    System {
        code: SystemEventCode,
        description: String,
    },
    /// Code 3: logged by an FST.
    Fst {
        fst: u8,
        value: f32,
        description: String,
    },
    /// Code 4: logged by the action of a logged-in user.
    User {
        operator_id: String,
        code: UserEventCode,
        description: String,
    },
    /// Code 5: device power was lost.
    PowerLost { power_lost_at: DateTime<Utc> },
    /// Code 6: device clock was set.
    ClockSet { clock_set_to: DateTime<Utc> },
    /// Code 7: calibration of an I/O point was verified.
    CalibrateVerify {
        operator_id: String,
        tlp: TlpInstance,
        raw_value: TlpValue,
        calibrated_value: TlpValue,
    },
}

impl EventRecord {
    /// Decode one record from exactly `EVENT_RECORD_LEN` bytes.
    pub fn decode(data: &[u8]) -> Result<Self> {
        if data.len() < EVENT_RECORD_LEN {
            return Err(ProtoError::Wire(rocwire::WireError::Truncated {
                need: EVENT_RECORD_LEN,
                have: data.len(),
            }));
        }
        let data = &data[..EVENT_RECORD_LEN];
        let mut buf = Bytes::copy_from_slice(data);

        let type_code = codec::get_u8(&mut buf)?;
        let timestamp = wire::get_epoch_time(&mut buf)?;

        let detail = match type_code {
            0 => EventDetail::None,
            1 => decode_parameter_change(data, timestamp)?,
            2 => {
                let code = SystemEventCode::try_from(codec::get_u8(&mut buf)?)?;
                let description = codec::get_ascii(&mut buf, 16)?;
                EventDetail::System { code, description }
            }
            3 => {
                let fst = codec::get_u8(&mut buf)?;
                let value = codec::get_f32_le(&mut buf)?;
                let description = codec::get_ascii(&mut buf, 10)?;
                EventDetail::Fst {
                    fst,
                    value,
                    description,
                }
            }
            4 => {
                let operator_id = codec::get_ascii(&mut buf, 3)?;
                let code = UserEventCode::try_from(codec::get_u8(&mut buf)?)?;
                let description = codec::get_ascii(&mut buf, 13)?;
                EventDetail::User {
                    operator_id,
                    code,
                    description,
                }
            }
            5 => EventDetail::PowerLost {
                power_lost_at: wire::get_epoch_time(&mut buf)?,
            },
            6 => EventDetail::ClockSet {
                clock_set_to: wire::get_epoch_time(&mut buf)?,
            },
            7 => {
                let operator_id = codec::get_ascii(&mut buf, 3)?;
                let tlp = wire::get_tlp(&mut buf)?;
                let raw = codec::get_f32_le(&mut buf)?;
                let calibrated = codec::get_f32_le(&mut buf)?;
                EventDetail::CalibrateVerify {
                    operator_id,
                    tlp: tlp.clone(),
                    raw_value: TlpValue::new(tlp.clone(), rocwire::Value::F32(raw), timestamp),
                    calibrated_value: TlpValue::new(tlp, rocwire::Value::F32(calibrated), timestamp),
                }
            }
            code => return Err(ProtoError::UnknownEventType(code)),
        };

        Ok(EventRecord { timestamp, detail })
    }
}

fn decode_parameter_change(data: &[u8], timestamp: DateTime<Utc>) -> Result<EventDetail> {
    let mut buf = Bytes::copy_from_slice(&data[5..]);
    let operator_id = codec::get_ascii(&mut buf, 3)?;
    let tlp = wire::get_tlp(&mut buf)?;
    let data_type_code = codec::get_u8(&mut buf)?;
    let data_type = DataType::from_log_code(data_type_code).ok_or(ProtoError::InvalidEnum {
        what: "event data type",
        value: data_type_code,
    })?;

    let new_value = data_type.decode(&mut buf)?;
    let new_value = TlpValue::new(tlp.clone(), new_value, timestamp);

    // The record has one 4-byte slot at a fixed offset for the previous
    // value; wider types simply do not carry it. The protocol carries no
    // old-value time, so it is reported as one second before the event.
    let old_value = if data_type.width() > 4 {
        None
    } else {
        let mut old_buf = Bytes::copy_from_slice(&data[OLD_VALUE_OFFSET..]);
        let value = data_type.decode(&mut old_buf)?;
        Some(TlpValue::new(
            tlp.clone(),
            value,
            timestamp - Duration::seconds(1),
        ))
    };

    Ok(EventDetail::ParameterChange {
        operator_id,
        tlp,
        data_type,
        new_value,
        old_value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rocwire::Value;

    const T0: u32 = 1_700_000_000;

    fn record(code: u8, payload: &[u8]) -> Vec<u8> {
        let mut data = vec![code];
        data.extend_from_slice(&T0.to_le_bytes());
        data.extend_from_slice(payload);
        data.resize(EVENT_RECORD_LEN, 0);
        data
    }

    #[test]
    fn parameter_change_with_old_value() {
        // Operator "OPR", TLP (103, 1, 21), FLOAT: new 2.0 at [12..16],
        // old 1.0 at [16..20].
        let mut payload = b"OPR".to_vec();
        payload.extend_from_slice(&[0x67, 0x01, 0x15, 0x07]);
        payload.extend_from_slice(&2.0f32.to_le_bytes());
        payload.extend_from_slice(&1.0f32.to_le_bytes());
        let event = EventRecord::decode(&record(0x01, &payload)).unwrap();

        let EventDetail::ParameterChange {
            operator_id,
            data_type,
            new_value,
            old_value,
            ..
        } = event.detail
        else {
            panic!("wrong event detail");
        };
        assert_eq!(operator_id, "OPR");
        assert_eq!(data_type, DataType::Float);
        assert_eq!(new_value.value, Value::F32(2.0));
        let old = old_value.unwrap();
        assert_eq!(old.value, Value::F32(1.0));
        assert_eq!(old.timestamp, event.timestamp - Duration::seconds(1));
    }

    #[test]
    fn parameter_change_wide_type_has_no_old_value() {
        // AC10 (code 11) occupies 10 bytes; no room for an old value.
        let mut payload = b"OPR".to_vec();
        payload.extend_from_slice(&[0x67, 0x01, 0x3E, 0x0B]);
        payload.extend_from_slice(b"WELLHEAD 2");
        let event = EventRecord::decode(&record(0x01, &payload)).unwrap();

        let EventDetail::ParameterChange {
            new_value,
            old_value,
            ..
        } = event.detail
        else {
            panic!("wrong event detail");
        };
        assert_eq!(new_value.value, Value::Str("WELLHEAD 2".into()));
        assert!(old_value.is_none());
    }

    #[test]
    fn system_event() {
        let mut payload = vec![200];
        payload.extend_from_slice(b"CLOCK CHANGE    ");
        let event = EventRecord::decode(&record(0x02, &payload)).unwrap();
        assert_eq!(
            event.detail,
            EventDetail::System {
                code: SystemEventCode::ClockSet,
                description: "CLOCK CHANGE".into(),
            }
        );
    }

    #[test]
    fn fst_event() {
        let mut payload = vec![3];
        payload.extend_from_slice(&7.25f32.to_le_bytes());
        payload.extend_from_slice(b"FST LOG   ");
        let event = EventRecord::decode(&record(0x03, &payload)).unwrap();
        assert_eq!(
            event.detail,
            EventDetail::Fst {
                fst: 3,
                value: 7.25,
                description: "FST LOG".into(),
            }
        );
    }

    #[test]
    fn user_event() {
        let mut payload = b"OPR".to_vec();
        payload.push(248);
        payload.extend_from_slice(b"SHIFT NOTE   ");
        let event = EventRecord::decode(&record(0x04, &payload)).unwrap();
        assert_eq!(
            event.detail,
            EventDetail::User {
                operator_id: "OPR".into(),
                code: UserEventCode::TextMessage,
                description: "SHIFT NOTE".into(),
            }
        );
    }

    #[test]
    fn power_lost_and_clock_set_carry_times() {
        let at: u32 = 1_699_999_000;
        let event = EventRecord::decode(&record(0x05, &at.to_le_bytes())).unwrap();
        assert_eq!(
            event.detail,
            EventDetail::PowerLost {
                power_lost_at: DateTime::from_timestamp(i64::from(at), 0).unwrap()
            }
        );

        let event = EventRecord::decode(&record(0x06, &at.to_le_bytes())).unwrap();
        assert!(matches!(event.detail, EventDetail::ClockSet { .. }));
    }

    #[test]
    fn calibrate_verify() {
        let mut payload = b"OPR".to_vec();
        payload.extend_from_slice(&[0x67, 0x00, 0x15]);
        payload.extend_from_slice(&0.5f32.to_le_bytes());
        payload.extend_from_slice(&0.75f32.to_le_bytes());
        let event = EventRecord::decode(&record(0x07, &payload)).unwrap();

        let EventDetail::CalibrateVerify {
            raw_value,
            calibrated_value,
            ..
        } = event.detail
        else {
            panic!("wrong event detail");
        };
        assert_eq!(raw_value.value, Value::F32(0.5));
        assert_eq!(calibrated_value.value, Value::F32(0.75));
    }

    #[test]
    fn unknown_type_code() {
        let err = EventRecord::decode(&record(0x08, &[])).unwrap_err();
        assert_eq!(err, ProtoError::UnknownEventType(8));
    }

    #[test]
    fn short_record_rejected() {
        assert!(EventRecord::decode(&[0u8; 21]).is_err());
    }
}

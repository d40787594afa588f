//! History opcodes: 105, 108, 135, 136, 137, 138, 139

use crate::enums::HistoryArchiveType;
use crate::error::{ProtoError, Result};
use crate::request::{HistoryInformationRequest, RequestBody};
use crate::response::ResponseBody;
use crate::wire;
use bytes::{Buf, Bytes};
use chrono::{DateTime, Datelike, TimeZone, Utc};
use rocwire::{codec, Value};
use roctlp::{TlpInstance, TlpValue};
use serde::Serialize;
use std::collections::BTreeMap;

/// Opcode 105: today's and yesterday's min/max for one history point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TodayYesterdayMinMax {
    pub segment: u8,
    pub point: u8,
    pub archive_method: HistoryArchiveType,
    /// The TLP this history point archives.
    pub tlp: TlpInstance,
    pub current_value: TlpValue,
    pub min_today: TlpValue,
    pub max_today: TlpValue,
    pub min_yesterday: TlpValue,
    pub max_yesterday: TlpValue,
    pub last_period_value: TlpValue,
}

/// The five-byte min/max time tuples carry no year; the current year is
/// assumed.
fn get_short_time<B: Buf>(buf: &mut B) -> Result<DateTime<Utc>> {
    let second = codec::get_u8(buf)?;
    let minute = codec::get_u8(buf)?;
    let hour = codec::get_u8(buf)?;
    let day = codec::get_u8(buf)?;
    let month = codec::get_u8(buf)?;
    Utc.with_ymd_and_hms(
        Utc::now().year(),
        u32::from(month),
        u32::from(day),
        u32::from(hour),
        u32::from(minute),
        u32::from(second),
    )
    .single()
    .ok_or_else(|| {
        ProtoError::InvalidData(format!(
            "invalid min/max time {month:02}-{day:02} {hour:02}:{minute:02}:{second:02}"
        ))
    })
}

pub(crate) fn decode_today_yesterday_min_max(
    body: &mut Bytes,
    _req: &RequestBody,
) -> Result<ResponseBody> {
    let now = Utc::now();
    let segment = codec::get_u8(body)?;
    let point = codec::get_u8(body)?;
    let archive_method = HistoryArchiveType::try_from(codec::get_u8(body)?)?;
    let tlp = wire::get_tlp(body)?;

    let current = codec::get_f32_le(body)?;
    let min_today = codec::get_f32_le(body)?;
    let max_today = codec::get_f32_le(body)?;
    let min_today_at = get_short_time(body)?;
    let max_today_at = get_short_time(body)?;
    let min_yesterday = codec::get_f32_le(body)?;
    let max_yesterday = codec::get_f32_le(body)?;
    let min_yesterday_at = get_short_time(body)?;
    let max_yesterday_at = get_short_time(body)?;
    let last_period = codec::get_f32_le(body)?;

    let value = |v: f32, at: DateTime<Utc>| TlpValue::new(tlp.clone(), Value::F32(v), at);
    Ok(ResponseBody::TodayYesterdayMinMax(TodayYesterdayMinMax {
        segment,
        point,
        archive_method,
        tlp: tlp.clone(),
        current_value: value(current, now),
        min_today: value(min_today, min_today_at),
        max_today: value(max_today, max_today_at),
        min_yesterday: value(min_yesterday, min_yesterday_at),
        max_yesterday: value(max_yesterday, max_yesterday_at),
        last_period_value: value(last_period, now),
    }))
}

/// Opcode 108: history point tags and the segment's periodic index.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryTagPeriodIndex {
    pub segment: u8,
    pub point_count: u8,
    pub periodic_index: i16,
    /// Tag per history point number.
    pub tags: BTreeMap<u8, String>,
}

pub(crate) fn decode_history_tag_period_index(
    body: &mut Bytes,
    _req: &RequestBody,
) -> Result<ResponseBody> {
    let segment = codec::get_u8(body)?;
    let point_count = codec::get_u8(body)?;
    let periodic_index = codec::get_i16_le(body)?;
    let mut tags = BTreeMap::new();
    for _ in 0..point_count {
        let point = codec::get_u8(body)?;
        let tag = codec::get_ascii(body, 10)?;
        tags.insert(point, tag);
    }
    Ok(ResponseBody::HistoryTagPeriodIndex(HistoryTagPeriodIndex {
        segment,
        point_count,
        periodic_index,
        tags,
    }))
}

/// Opcode 135 values: floats for value histories, timestamps when the
/// request asked for `*_TIME_STAMPS`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum HistoryValues {
    Values(Vec<f32>),
    TimeStamps(Vec<DateTime<Utc>>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SinglePointHistory {
    pub segment: u8,
    pub point: u8,
    pub current_index: i16,
    pub count: u8,
    pub values: HistoryValues,
}

pub(crate) fn decode_single_point_history(
    body: &mut Bytes,
    req: &RequestBody,
) -> Result<ResponseBody> {
    let RequestBody::SinglePointHistory { history_type, .. } = req else {
        return Err(ProtoError::InvalidData(
            "opcode 135 response requires a single-point history request".into(),
        ));
    };
    let segment = codec::get_u8(body)?;
    let point = codec::get_u8(body)?;
    let current_index = codec::get_i16_le(body)?;
    let count = codec::get_u8(body)?;

    let values = if history_type.yields_timestamps() {
        let mut stamps = Vec::with_capacity(usize::from(count));
        for _ in 0..count {
            stamps.push(wire::get_epoch_time(body)?);
        }
        HistoryValues::TimeStamps(stamps)
    } else {
        let mut values = Vec::with_capacity(usize::from(count));
        for _ in 0..count {
            values.push(codec::get_f32_le(body)?);
        }
        HistoryValues::Values(values)
    };

    Ok(ResponseBody::SinglePointHistory(SinglePointHistory {
        segment,
        point,
        current_index,
        count,
        values,
    }))
}

/// One period row of a multi-point history response: the period timestamp
/// and one value per requested point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryRow {
    pub timestamp: DateTime<Utc>,
    /// Values keyed by history point number.
    pub values: BTreeMap<u8, f32>,
}

/// Opcode 136.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MultiplePointHistory {
    pub segment: u8,
    pub segment_index: i16,
    pub current_index: i16,
    /// `(point_count + 1) * period_count` as reported by the device.
    pub element_count: u8,
    pub rows: Vec<HistoryRow>,
}

pub(crate) fn decode_multiple_point_history(
    body: &mut Bytes,
    req: &RequestBody,
) -> Result<ResponseBody> {
    let RequestBody::MultiplePointHistory {
        starting_point,
        point_count,
        period_count,
        ..
    } = req
    else {
        return Err(ProtoError::InvalidData(
            "opcode 136 response requires a multiple-point history request".into(),
        ));
    };
    let segment = codec::get_u8(body)?;
    let segment_index = codec::get_i16_le(body)?;
    let current_index = codec::get_i16_le(body)?;
    let element_count = codec::get_u8(body)?;

    let mut rows = Vec::with_capacity(usize::from(*period_count));
    for _ in 0..*period_count {
        let timestamp = wire::get_epoch_time(body)?;
        let mut values = BTreeMap::new();
        for j in 0..*point_count {
            values.insert(starting_point.wrapping_add(j), codec::get_f32_le(body)?);
        }
        rows.push(HistoryRow { timestamp, values });
    }

    Ok(ResponseBody::MultiplePointHistory(MultiplePointHistory {
        segment,
        segment_index,
        current_index,
        element_count,
        rows,
    }))
}

/// Opcode 137.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DailyHistoryIndex {
    pub segment: u8,
    pub starting_periodic_index: i16,
    pub periodic_entry_count: i16,
    pub daily_index: i16,
    pub daily_entry_count: i16,
}

pub(crate) fn decode_daily_history_index(
    body: &mut Bytes,
    _req: &RequestBody,
) -> Result<ResponseBody> {
    Ok(ResponseBody::DailyHistoryIndex(DailyHistoryIndex {
        segment: codec::get_u8(body)?,
        starting_periodic_index: codec::get_i16_le(body)?,
        periodic_entry_count: codec::get_i16_le(body)?,
        daily_index: codec::get_i16_le(body)?,
        daily_entry_count: codec::get_i16_le(body)?,
    }))
}

/// Opcode 138.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyPeriodicHistory {
    pub segment: u8,
    pub point: u8,
    pub day: u8,
    pub month: u8,
    pub periodic_entry_count: i16,
    pub daily_entry_count: i16,
    pub periodic_values: Vec<f32>,
    pub daily_values: Vec<f32>,
}

pub(crate) fn decode_daily_periodic_history(
    body: &mut Bytes,
    _req: &RequestBody,
) -> Result<ResponseBody> {
    let segment = codec::get_u8(body)?;
    let point = codec::get_u8(body)?;
    let day = codec::get_u8(body)?;
    let month = codec::get_u8(body)?;
    let periodic_entry_count = codec::get_i16_le(body)?;
    let daily_entry_count = codec::get_i16_le(body)?;

    let read_values = |body: &mut Bytes, count: i16| -> Result<Vec<f32>> {
        let count = usize::try_from(count)
            .map_err(|_| ProtoError::InvalidData(format!("negative entry count {count}")))?;
        let mut values = Vec::with_capacity(count);
        for _ in 0..count {
            values.push(codec::get_f32_le(body)?);
        }
        Ok(values)
    };
    let periodic_values = read_values(body, periodic_entry_count)?;
    let daily_values = read_values(body, daily_entry_count)?;

    Ok(ResponseBody::DailyPeriodicHistory(DailyPeriodicHistory {
        segment,
        point,
        day,
        month,
        periodic_entry_count,
        daily_entry_count,
        periodic_values,
        daily_values,
    }))
}

/// One period of an opcode 139 command-1 response. The timestamp is
/// present only when the request asked for timestamps.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryInformationRow {
    pub timestamp: Option<DateTime<Utc>>,
    /// Values keyed by history point number.
    pub values: BTreeMap<u8, f32>,
}

/// Opcode 139, shaped by the request command.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum HistoryInformation {
    /// Command 0.
    ConfiguredPoints {
        segment: u8,
        count: u8,
        points: Vec<u8>,
    },
    /// Command 1.
    PointData {
        segment: u8,
        current_index: i16,
        period_count: u8,
        timestamps_included: bool,
        point_count: u8,
        rows: Vec<HistoryInformationRow>,
    },
}

pub(crate) fn decode_history_information(
    body: &mut Bytes,
    req: &RequestBody,
) -> Result<ResponseBody> {
    let RequestBody::HistoryInformation(request) = req else {
        return Err(ProtoError::InvalidData(
            "opcode 139 response requires a history information request".into(),
        ));
    };

    let command = codec::get_u8(body)?;
    let info = match command {
        0 => {
            let segment = codec::get_u8(body)?;
            let count = codec::get_u8(body)?;
            let mut points = Vec::with_capacity(body.remaining());
            while body.has_remaining() {
                points.push(body.get_u8());
            }
            HistoryInformation::ConfiguredPoints {
                segment,
                count,
                points,
            }
        }
        1 => {
            let HistoryInformationRequest::PointData { points, .. } = request else {
                return Err(ProtoError::InvalidData(
                    "opcode 139 command 1 response to a command 0 request".into(),
                ));
            };
            let segment = codec::get_u8(body)?;
            let current_index = codec::get_i16_le(body)?;
            let period_count = codec::get_u8(body)?;
            let timestamps_included = codec::get_u8(body)? != 0;
            let point_count = codec::get_u8(body)?;
            if usize::from(point_count) != points.len() {
                return Err(ProtoError::InvalidData(format!(
                    "opcode 139 returned {point_count} points, request named {}",
                    points.len()
                )));
            }

            let mut rows = Vec::with_capacity(usize::from(period_count));
            for _ in 0..period_count {
                let timestamp = if timestamps_included {
                    Some(wire::get_epoch_time(body)?)
                } else {
                    None
                };
                let mut values = BTreeMap::new();
                for &point in points {
                    values.insert(point, codec::get_f32_le(body)?);
                }
                rows.push(HistoryInformationRow { timestamp, values });
            }
            HistoryInformation::PointData {
                segment,
                current_index,
                period_count,
                timestamps_included,
                point_count,
                rows,
            }
        }
        value => {
            return Err(ProtoError::InvalidEnum {
                what: "history information command",
                value,
            })
        }
    };
    Ok(ResponseBody::HistoryInformation(info))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::HistoryType;

    #[test]
    fn min_max_body_decodes() {
        let mut body = vec![0u8, 2, 128, 0x67, 0x01, 0x15];
        body.extend_from_slice(&5.0f32.to_le_bytes()); // current
        body.extend_from_slice(&1.0f32.to_le_bytes()); // min today
        body.extend_from_slice(&9.0f32.to_le_bytes()); // max today
        body.extend_from_slice(&[10, 30, 6, 15, 3]); // 03-15 06:30:10
        body.extend_from_slice(&[40, 45, 18, 15, 3]);
        body.extend_from_slice(&0.5f32.to_le_bytes()); // min yesterday
        body.extend_from_slice(&8.5f32.to_le_bytes()); // max yesterday
        body.extend_from_slice(&[0, 0, 1, 14, 3]);
        body.extend_from_slice(&[0, 15, 22, 14, 3]);
        body.extend_from_slice(&4.25f32.to_le_bytes()); // last period
        assert_eq!(body.len(), 50);

        let mut buf = Bytes::from(body);
        let req = RequestBody::TodayYesterdayMinMax { segment: 0, point: 2 };
        let ResponseBody::TodayYesterdayMinMax(data) =
            decode_today_yesterday_min_max(&mut buf, &req).unwrap()
        else {
            panic!("wrong response variant");
        };
        assert_eq!(data.archive_method, HistoryArchiveType::Average);
        assert_eq!(data.min_today.value, Value::F32(1.0));
        assert_eq!(data.max_today.value, Value::F32(9.0));
        assert_eq!(data.min_today.timestamp.month(), 3);
        assert_eq!(data.min_today.timestamp.day(), 15);
        assert_eq!(data.min_today.timestamp.year(), Utc::now().year());
        assert_eq!(data.last_period_value.value, Value::F32(4.25));
    }

    #[test]
    fn tag_index_body_decodes() {
        let mut body = vec![1u8, 2, 0x34, 0x12];
        body.push(0);
        body.extend_from_slice(b"FLOW RATE ");
        body.push(3);
        body.extend_from_slice(b"PRESSURE  ");
        let mut buf = Bytes::from(body);
        let req = RequestBody::HistoryTagPeriodIndex {
            segment: 1,
            points: vec![0, 3],
        };
        let ResponseBody::HistoryTagPeriodIndex(data) =
            decode_history_tag_period_index(&mut buf, &req).unwrap()
        else {
            panic!("wrong response variant");
        };
        assert_eq!(data.periodic_index, 0x1234);
        assert_eq!(data.tags[&0], "FLOW RATE");
        assert_eq!(data.tags[&3], "PRESSURE");
    }

    #[test]
    fn single_point_values_decode_as_floats() {
        let mut body = vec![0u8, 1, 0x0A, 0x00, 2];
        body.extend_from_slice(&1.5f32.to_le_bytes());
        body.extend_from_slice(&2.5f32.to_le_bytes());
        let mut buf = Bytes::from(body);
        let req = RequestBody::SinglePointHistory {
            segment: 0,
            point: 1,
            history_type: HistoryType::Periodic,
            start_index: 0,
            count: 2,
        };
        let ResponseBody::SinglePointHistory(data) =
            decode_single_point_history(&mut buf, &req).unwrap()
        else {
            panic!("wrong response variant");
        };
        assert_eq!(data.current_index, 10);
        assert_eq!(data.values, HistoryValues::Values(vec![1.5, 2.5]));
    }

    #[test]
    fn single_point_timestamps_follow_request_type() {
        let mut body = vec![0u8, 1, 0x00, 0x00, 1];
        body.extend_from_slice(&1_700_000_000u32.to_le_bytes());
        let mut buf = Bytes::from(body);
        let req = RequestBody::SinglePointHistory {
            segment: 0,
            point: 1,
            history_type: HistoryType::DailyTimeStamps,
            start_index: 0,
            count: 1,
        };
        let ResponseBody::SinglePointHistory(data) =
            decode_single_point_history(&mut buf, &req).unwrap()
        else {
            panic!("wrong response variant");
        };
        let HistoryValues::TimeStamps(stamps) = data.values else {
            panic!("expected timestamps");
        };
        assert_eq!(stamps[0].timestamp(), 1_700_000_000);
    }

    #[test]
    fn multiple_point_rows_assign_point_numbers() {
        let mut body = vec![2u8, 0x05, 0x00, 0x09, 0x00, 6];
        for period in 0..2u32 {
            body.extend_from_slice(&(1_700_000_000 + period * 3600).to_le_bytes());
            body.extend_from_slice(&(period as f32).to_le_bytes());
            body.extend_from_slice(&(period as f32 + 0.5).to_le_bytes());
        }
        let mut buf = Bytes::from(body);
        let req = RequestBody::MultiplePointHistory {
            segment: 2,
            segment_index: 5,
            history_type: HistoryType::Periodic,
            starting_point: 4,
            point_count: 2,
            period_count: 2,
        };
        let ResponseBody::MultiplePointHistory(data) =
            decode_multiple_point_history(&mut buf, &req).unwrap()
        else {
            panic!("wrong response variant");
        };
        assert_eq!(data.rows.len(), 2);
        assert_eq!(data.rows[0].values[&4], 0.0);
        assert_eq!(data.rows[0].values[&5], 0.5);
        assert_eq!(data.rows[1].values[&4], 1.0);
        assert_eq!(
            data.rows[1].timestamp.timestamp() - data.rows[0].timestamp.timestamp(),
            3600
        );
    }

    #[test]
    fn daily_history_index_fields() {
        let mut buf = Bytes::from_static(&[3, 0x10, 0x00, 0x60, 0x00, 0x05, 0x00, 0x23, 0x00]);
        let req = RequestBody::DailyHistoryIndex {
            segment: 3,
            day: 12,
            month: 6,
        };
        let ResponseBody::DailyHistoryIndex(data) =
            decode_daily_history_index(&mut buf, &req).unwrap()
        else {
            panic!("wrong response variant");
        };
        assert_eq!(data.starting_periodic_index, 16);
        assert_eq!(data.periodic_entry_count, 96);
        assert_eq!(data.daily_index, 5);
        assert_eq!(data.daily_entry_count, 35);
    }

    #[test]
    fn daily_periodic_history_splits_value_runs() {
        let mut body = vec![0u8, 1, 12, 6, 0x02, 0x00, 0x01, 0x00];
        body.extend_from_slice(&1.0f32.to_le_bytes());
        body.extend_from_slice(&2.0f32.to_le_bytes());
        body.extend_from_slice(&24.0f32.to_le_bytes());
        let mut buf = Bytes::from(body);
        let req = RequestBody::DailyPeriodicHistory {
            segment: 0,
            point: 1,
            day: 12,
            month: 6,
        };
        let ResponseBody::DailyPeriodicHistory(data) =
            decode_daily_periodic_history(&mut buf, &req).unwrap()
        else {
            panic!("wrong response variant");
        };
        assert_eq!(data.periodic_values, vec![1.0, 2.0]);
        assert_eq!(data.daily_values, vec![24.0]);
    }

    #[test]
    fn history_information_configured_points() {
        let mut buf = Bytes::from_static(&[0, 1, 3, 0, 2, 7]);
        let req = RequestBody::HistoryInformation(HistoryInformationRequest::ConfiguredPoints {
            segment: 1,
        });
        let ResponseBody::HistoryInformation(info) =
            decode_history_information(&mut buf, &req).unwrap()
        else {
            panic!("wrong response variant");
        };
        assert_eq!(
            info,
            HistoryInformation::ConfiguredPoints {
                segment: 1,
                count: 3,
                points: vec![0, 2, 7],
            }
        );
    }

    #[test]
    fn history_information_point_data_with_timestamps() {
        let mut body = vec![1u8, 1, 0x07, 0x00, 2, 1, 2];
        for period in 0..2u32 {
            body.extend_from_slice(&(1_700_000_000 + period * 60).to_le_bytes());
            body.extend_from_slice(&(period as f32).to_le_bytes());
            body.extend_from_slice(&(10.0 + period as f32).to_le_bytes());
        }
        let mut buf = Bytes::from(body);
        let req = RequestBody::HistoryInformation(HistoryInformationRequest::PointData {
            segment: 1,
            segment_index: 0,
            history_type: HistoryType::Minute,
            period_count: 2,
            request_timestamps: true,
            points: vec![4, 9],
        });
        let ResponseBody::HistoryInformation(info) =
            decode_history_information(&mut buf, &req).unwrap()
        else {
            panic!("wrong response variant");
        };
        let HistoryInformation::PointData {
            rows,
            timestamps_included,
            ..
        } = info
        else {
            panic!("expected point data");
        };
        assert!(timestamps_included);
        assert_eq!(rows.len(), 2);
        assert!(rows[0].timestamp.is_some());
        assert_eq!(rows[1].values[&4], 1.0);
        assert_eq!(rows[1].values[&9], 11.0);
    }

    #[test]
    fn history_information_point_count_mismatch() {
        let body = vec![1u8, 1, 0x00, 0x00, 1, 0, 3];
        let mut buf = Bytes::from(body);
        let req = RequestBody::HistoryInformation(HistoryInformationRequest::PointData {
            segment: 1,
            segment_index: 0,
            history_type: HistoryType::Minute,
            period_count: 1,
            request_timestamps: false,
            points: vec![4],
        });
        assert!(decode_history_information(&mut buf, &req).is_err());
    }
}

//! Opcode 118 (alarm data) and opcode 119 (event data)
//!
//! Both return `count ‖ start_index ‖ current_index ‖ count × record`,
//! with 23-byte alarm records and 22-byte event records.

use crate::alarm::{AlarmRecord, ALARM_RECORD_LEN};
use crate::error::Result;
use crate::event::{EventRecord, EVENT_RECORD_LEN};
use crate::request::RequestBody;
use crate::response::ResponseBody;
use bytes::Bytes;
use rocwire::codec;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlarmData {
    pub count: u8,
    pub start_index: i16,
    /// Index where the device will write its next alarm.
    pub current_index: i16,
    pub alarms: Vec<AlarmRecord>,
}

pub(crate) fn decode_alarm_data(body: &mut Bytes, _req: &RequestBody) -> Result<ResponseBody> {
    let count = codec::get_u8(body)?;
    let start_index = codec::get_i16_le(body)?;
    let current_index = codec::get_i16_le(body)?;
    let mut alarms = Vec::with_capacity(usize::from(count));
    for _ in 0..count {
        let record = codec::get_bytes(body, ALARM_RECORD_LEN)?;
        alarms.push(AlarmRecord::decode(&record)?);
    }
    Ok(ResponseBody::AlarmData(AlarmData {
        count,
        start_index,
        current_index,
        alarms,
    }))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventData {
    pub count: u8,
    pub start_index: i16,
    /// Index where the device will write its next event.
    pub current_index: i16,
    pub events: Vec<EventRecord>,
}

pub(crate) fn decode_event_data(body: &mut Bytes, _req: &RequestBody) -> Result<ResponseBody> {
    let count = codec::get_u8(body)?;
    let start_index = codec::get_i16_le(body)?;
    let current_index = codec::get_i16_le(body)?;
    let mut events = Vec::with_capacity(usize::from(count));
    for _ in 0..count {
        let record = codec::get_bytes(body, EVENT_RECORD_LEN)?;
        events.push(EventRecord::decode(&record)?);
    }
    Ok(ResponseBody::EventData(EventData {
        count,
        start_index,
        current_index,
        events,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alarm::AlarmDetail;
    use crate::event::EventDetail;

    #[test]
    fn two_alarm_records() {
        let mut body = vec![2u8, 0x05, 0x00, 0x07, 0x00];
        for _ in 0..2 {
            let mut record = vec![0x00];
            record.extend_from_slice(&1_700_000_000u32.to_le_bytes());
            record.resize(ALARM_RECORD_LEN, 0);
            body.extend_from_slice(&record);
        }
        let mut buf = Bytes::from(body);
        let req = RequestBody::AlarmData {
            count: 2,
            start_index: 5,
        };
        let ResponseBody::AlarmData(data) = decode_alarm_data(&mut buf, &req).unwrap() else {
            panic!("wrong response variant");
        };
        assert_eq!(data.count, 2);
        assert_eq!(data.start_index, 5);
        assert_eq!(data.current_index, 7);
        assert_eq!(data.alarms.len(), 2);
        assert!(matches!(data.alarms[0].detail, AlarmDetail::None));
    }

    #[test]
    fn event_records_consume_22_bytes_each() {
        let mut body = vec![1u8, 0x00, 0x00, 0x01, 0x00];
        let mut record = vec![0x00];
        record.extend_from_slice(&1_700_000_000u32.to_le_bytes());
        record.resize(EVENT_RECORD_LEN, 0);
        body.extend_from_slice(&record);

        let mut buf = Bytes::from(body);
        let req = RequestBody::EventData {
            count: 1,
            start_index: 0,
        };
        let ResponseBody::EventData(data) = decode_event_data(&mut buf, &req).unwrap() else {
            panic!("wrong response variant");
        };
        assert_eq!(data.events.len(), 1);
        assert!(matches!(data.events[0].detail, EventDetail::None));
        assert!(buf.is_empty());
    }

    #[test]
    fn truncated_record_errors() {
        // Claims one alarm but carries only half a record.
        let mut body = vec![1u8, 0x00, 0x00, 0x00, 0x00];
        body.extend_from_slice(&[0u8; 10]);
        let mut buf = Bytes::from(body);
        let req = RequestBody::AlarmData {
            count: 1,
            start_index: 0,
        };
        assert!(decode_alarm_data(&mut buf, &req).is_err());
    }
}

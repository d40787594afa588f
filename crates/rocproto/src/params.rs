//! Opcode 167 (contiguous single-point parameters) and opcode 180
//! (arbitrary TLP list)
//!
//! Both responses interleave raw values whose width is only known through
//! the schema registry, so an unknown point type or parameter here is
//! fatal to the response: without the width the rest of the buffer cannot
//! be sliced.

use crate::error::Result;
use crate::request::RequestBody;
use crate::response::ResponseBody;
use crate::wire;
use bytes::{Buf, Bytes};
use chrono::Utc;
use rocwire::codec;
use roctlp::{registry, TlpInstance, TlpValue};
use serde::Serialize;

/// Opcode 167 response: the four request bytes echoed back, then one
/// encoded value per parameter starting at `starting_parameter`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointParameters {
    pub point_type: u8,
    pub logical_number: u8,
    pub count: u8,
    pub starting_parameter: u8,
    pub values: Vec<TlpValue>,
}

pub(crate) fn decode_point_parameters(body: &mut Bytes, _req: &RequestBody) -> Result<ResponseBody> {
    let timestamp = Utc::now();
    let point_type = codec::get_u8(body)?;
    let logical_number = codec::get_u8(body)?;
    let count = codec::get_u8(body)?;
    let starting_parameter = codec::get_u8(body)?;

    let point_type_def = registry().point_type_by_number(point_type)?;
    let mut values = Vec::with_capacity(usize::from(count));
    for i in 0..count {
        let parameter_number = starting_parameter.wrapping_add(i);
        let parameter = point_type_def.parameter_by_number(parameter_number)?;
        let value = parameter.data_type.decode(body)?;
        values.push(TlpValue::new(
            TlpInstance::new(point_type, logical_number, parameter_number),
            value,
            timestamp,
        ));
    }

    Ok(ResponseBody::PointParameters(PointParameters {
        point_type,
        logical_number,
        count,
        starting_parameter,
        values,
    }))
}

/// Opcode 180 response: count, then `TLP(3) ‖ value` per entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterValues {
    pub count: u8,
    pub values: Vec<TlpValue>,
}

pub(crate) fn decode_parameters(body: &mut Bytes, _req: &RequestBody) -> Result<ResponseBody> {
    let timestamp = Utc::now();
    let count = codec::get_u8(body)?;
    let mut values = Vec::with_capacity(usize::from(count));
    for _ in 0..count {
        let tlp = wire::get_tlp(body)?;
        let parameter = tlp.resolve_strict(registry())?;
        let value = parameter.data_type.decode(body)?;
        values.push(TlpValue::new(tlp, value, timestamp));
    }
    if body.has_remaining() {
        tracing::warn!(leftover = body.remaining(), "opcode 180 body longer than declared count");
    }
    Ok(ResponseBody::Parameters(ParameterValues { count, values }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProtoError;
    use roctlp::TlpError;
    use rocwire::Value;

    #[test]
    fn multi_tlp_float_read() {
        // count=1, TLP (103, 1, 21) EU_VALUE, value 1.0f
        let mut body = Bytes::from_static(&[0x01, 0x67, 0x01, 0x15, 0x00, 0x00, 0x80, 0x3F]);
        let req = RequestBody::Parameters {
            tlps: vec![TlpInstance::new(103, 1, 21)],
        };
        let ResponseBody::Parameters(data) = decode_parameters(&mut body, &req).unwrap() else {
            panic!("wrong response variant");
        };
        assert_eq!(data.count, 1);
        assert_eq!(data.values[0].tlp, TlpInstance::new(103, 1, 21));
        assert_eq!(data.values[0].value, Value::F32(1.0));
        assert!(data.values[0].bit_values.is_empty());
    }

    #[test]
    fn contiguous_ascii_read() {
        // Echo of (103, 1, 1, 62) then a space-padded AC10 tag.
        let mut body = Bytes::from_iter(
            [0x67, 0x01, 0x01, 0x3E]
                .into_iter()
                .chain(*b"FT-101    "),
        );
        let req = RequestBody::SinglePointParameters {
            point_type: 103,
            logical_number: 1,
            count: 1,
            starting_parameter: 62,
        };
        let ResponseBody::PointParameters(data) = decode_point_parameters(&mut body, &req).unwrap()
        else {
            panic!("wrong response variant");
        };
        assert_eq!(data.starting_parameter, 62);
        assert_eq!(data.values.len(), 1);
        assert_eq!(data.values[0].value, Value::Str("FT-101".into()));
    }

    #[test]
    fn contiguous_read_walks_parameter_widths() {
        // Point type 124, parameters 0..=2: AC10 then two UINT16s.
        let mut body = Bytes::from_iter(
            [0x7C, 0x00, 0x03, 0x00]
                .into_iter()
                .chain(*b"GAS HOURLY")
                .chain([0x23, 0x00, 0x32, 0x00]),
        );
        let req = RequestBody::SinglePointParameters {
            point_type: 124,
            logical_number: 0,
            count: 3,
            starting_parameter: 0,
        };
        let ResponseBody::PointParameters(data) = decode_point_parameters(&mut body, &req).unwrap()
        else {
            panic!("wrong response variant");
        };
        assert_eq!(data.values[0].value, Value::Str("GAS HOURLY".into()));
        assert_eq!(data.values[1].value, Value::U16(35));
        assert_eq!(data.values[2].value, Value::U16(50));
    }

    #[test]
    fn unknown_point_type_is_fatal_here() {
        let mut body = Bytes::from_static(&[0x01, 0xFA, 0x00, 0x07, 0x00]);
        let req = RequestBody::Parameters {
            tlps: vec![TlpInstance::new(250, 0, 7)],
        };
        let err = decode_parameters(&mut body, &req).unwrap_err();
        assert_eq!(err, ProtoError::Registry(TlpError::PointTypeNotFound(250)));
    }

    #[test]
    fn unknown_parameter_is_fatal_here() {
        let mut body = Bytes::from_static(&[0x67, 0x01, 0x01, 0xF0, 0x00]);
        let req = RequestBody::SinglePointParameters {
            point_type: 103,
            logical_number: 1,
            count: 1,
            starting_parameter: 240,
        };
        let err = decode_point_parameters(&mut body, &req).unwrap_err();
        assert_eq!(
            err,
            ProtoError::Registry(TlpError::ParameterNotFound {
                point_type: 103,
                parameter: 240
            })
        );
    }

    #[test]
    fn bin_parameter_expands_bits() {
        // Discrete input STATUS (101, 0, 3), BIN value 0b0000_0001.
        let mut body = Bytes::from_static(&[0x01, 0x65, 0x00, 0x03, 0x01]);
        let req = RequestBody::Parameters {
            tlps: vec![TlpInstance::new(101, 0, 3)],
        };
        let ResponseBody::Parameters(data) = decode_parameters(&mut body, &req).unwrap() else {
            panic!("wrong response variant");
        };
        assert_eq!(data.values[0].bit_values.len(), 8);
        assert!(data.values[0].bit_values[0]);
        assert!(!data.values[0].bit_values[7]);
    }
}

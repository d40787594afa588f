//! ROC primitive data types
//!
//! Each parameter in the device schema has one of these types; the type
//! fixes the wire width and the little-endian unpack shape.

use crate::codec;
use crate::error::{Result, WireError};
use crate::value::{TlpTriple, Value};
use bytes::{Buf, BufMut};
use chrono::DateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub enum DataType {
    /// One byte whose bits carry independent flags.
    Bin,
    Int8,
    Int16,
    Int32,
    Uint8,
    Uint16,
    Uint32,
    Float,
    Double,
    /// Three bytes: point type, logical number, parameter number.
    Tlp,
    Ac3,
    Ac7,
    Ac10,
    Ac12,
    Ac20,
    Ac30,
    Ac40,
    /// u32 seconds since the Unix epoch.
    Time,
    /// Packed hour/minute as an unsigned 16-bit value.
    HourMinute,
    /// Placeholder for parameters absent from the schema registry.
    Unknown,
}

impl DataType {
    pub fn name(&self) -> &'static str {
        match self {
            DataType::Bin => "BIN",
            DataType::Int8 => "INT8",
            DataType::Int16 => "INT16",
            DataType::Int32 => "INT32",
            DataType::Uint8 => "UINT8",
            DataType::Uint16 => "UINT16",
            DataType::Uint32 => "UINT32",
            DataType::Float => "FLOAT",
            DataType::Double => "DOUBLE",
            DataType::Tlp => "TLP",
            DataType::Ac3 => "AC3",
            DataType::Ac7 => "AC7",
            DataType::Ac10 => "AC10",
            DataType::Ac12 => "AC12",
            DataType::Ac20 => "AC20",
            DataType::Ac30 => "AC30",
            DataType::Ac40 => "AC40",
            DataType::Time => "TIME",
            DataType::HourMinute => "HOURMINUTE",
            DataType::Unknown => "UNKNOWN",
        }
    }

    /// Exact wire size in bytes.
    pub fn width(&self) -> usize {
        match self {
            DataType::Bin | DataType::Int8 | DataType::Uint8 => 1,
            DataType::Int16 | DataType::Uint16 | DataType::HourMinute => 2,
            DataType::Int32 | DataType::Uint32 | DataType::Float | DataType::Time => 4,
            DataType::Double => 8,
            DataType::Tlp | DataType::Ac3 => 3,
            DataType::Ac7 => 7,
            DataType::Ac10 => 10,
            DataType::Ac12 => 12,
            DataType::Ac20 => 20,
            DataType::Ac30 => 30,
            DataType::Ac40 => 40,
            DataType::Unknown => 0,
        }
    }

    /// Decode one value of this type from the buffer.
    pub fn decode<B: Buf>(&self, buf: &mut B) -> Result<Value> {
        Ok(match self {
            DataType::Bin | DataType::Uint8 => Value::U8(codec::get_u8(buf)?),
            DataType::Int8 => Value::I8(codec::get_i8(buf)?),
            DataType::Uint16 => Value::U16(codec::get_u16_le(buf)?),
            DataType::Int16 => Value::I16(codec::get_i16_le(buf)?),
            DataType::Uint32 => Value::U32(codec::get_u32_le(buf)?),
            DataType::Int32 => Value::I32(codec::get_i32_le(buf)?),
            DataType::Float => Value::F32(codec::get_f32_le(buf)?),
            DataType::Double => Value::F64(codec::get_f64_le(buf)?),
            DataType::Tlp => {
                let point_type = codec::get_u8(buf)?;
                let logical_number = codec::get_u8(buf)?;
                let parameter = codec::get_u8(buf)?;
                Value::Tlp(TlpTriple::new(point_type, logical_number, parameter))
            }
            DataType::Ac3
            | DataType::Ac7
            | DataType::Ac10
            | DataType::Ac12
            | DataType::Ac20
            | DataType::Ac30
            | DataType::Ac40 => Value::Str(codec::get_ascii(buf, self.width())?),
            DataType::Time => {
                let secs = codec::get_u32_le(buf)?;
                let ts = DateTime::from_timestamp(i64::from(secs), 0).ok_or_else(|| {
                    WireError::InvalidData(format!("unrepresentable timestamp {secs}"))
                })?;
                Value::Time(ts)
            }
            DataType::HourMinute => Value::HourMinute(codec::get_u16_le(buf)?),
            DataType::Unknown => Value::Unknown(Vec::new()),
        })
    }

    /// Encode `value` in this type's wire shape.
    pub fn encode<B: BufMut>(&self, value: &Value, buf: &mut B) -> Result<()> {
        let mismatch = || WireError::TypeMismatch {
            expected: self.name(),
        };
        match self {
            DataType::Bin | DataType::Uint8 => buf.put_u8(value.as_u8().ok_or_else(mismatch)?),
            DataType::Int8 => match value {
                Value::I8(v) => buf.put_i8(*v),
                _ => return Err(mismatch()),
            },
            DataType::Uint16 => buf.put_u16_le(value.as_u16().ok_or_else(mismatch)?),
            DataType::Int16 => match value {
                Value::I16(v) => buf.put_i16_le(*v),
                _ => return Err(mismatch()),
            },
            DataType::Uint32 => buf.put_u32_le(value.as_u32().ok_or_else(mismatch)?),
            DataType::Int32 => match value {
                Value::I32(v) => buf.put_i32_le(*v),
                _ => return Err(mismatch()),
            },
            DataType::Float => buf.put_f32_le(value.as_f32().ok_or_else(mismatch)?),
            DataType::Double => match value {
                Value::F64(v) => buf.put_f64_le(*v),
                _ => return Err(mismatch()),
            },
            DataType::Tlp => {
                let t = value.as_tlp().ok_or_else(mismatch)?;
                buf.put_u8(t.point_type);
                buf.put_u8(t.logical_number);
                buf.put_u8(t.parameter);
            }
            DataType::Ac3
            | DataType::Ac7
            | DataType::Ac10
            | DataType::Ac12
            | DataType::Ac20
            | DataType::Ac30
            | DataType::Ac40 => {
                codec::put_ascii(buf, value.as_str().ok_or_else(mismatch)?, self.width())?
            }
            DataType::Time => {
                let t = value.as_time().ok_or_else(mismatch)?;
                buf.put_u32_le(t.timestamp() as u32);
            }
            DataType::HourMinute => buf.put_u16_le(value.as_u16().ok_or_else(mismatch)?),
            DataType::Unknown => {}
        }
        Ok(())
    }

    /// Data types as coded in event records and transaction payloads.
    pub fn from_log_code(code: u8) -> Option<DataType> {
        Some(match code {
            0 => DataType::Bin,
            1 => DataType::Int8,
            2 => DataType::Int16,
            3 => DataType::Int32,
            4 => DataType::Uint8,
            5 => DataType::Uint16,
            6 => DataType::Uint32,
            7 => DataType::Float,
            8 => DataType::Tlp,
            9 => DataType::Ac3,
            10 => DataType::Ac7,
            11 => DataType::Ac10,
            12 => DataType::Ac12,
            13 => DataType::Ac20,
            14 => DataType::Ac30,
            15 => DataType::Ac40,
            16 => DataType::Double,
            17 => DataType::Time,
            _ => return None,
        })
    }

    const ALL: [DataType; 20] = [
        DataType::Bin,
        DataType::Int8,
        DataType::Int16,
        DataType::Int32,
        DataType::Uint8,
        DataType::Uint16,
        DataType::Uint32,
        DataType::Float,
        DataType::Double,
        DataType::Tlp,
        DataType::Ac3,
        DataType::Ac7,
        DataType::Ac10,
        DataType::Ac12,
        DataType::Ac20,
        DataType::Ac30,
        DataType::Ac40,
        DataType::Time,
        DataType::HourMinute,
        DataType::Unknown,
    ];

    pub fn all() -> &'static [DataType] {
        &Self::ALL
    }
}

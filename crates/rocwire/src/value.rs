//! Dynamically typed parameter values
//!
//! A decoded parameter carries one of a closed set of shapes dictated by
//! its `DataType`. Conversions out of `Value` are explicit and checked.

use chrono::{DateTime, Utc};
use serde::ser::{Serialize, SerializeMap, Serializer};

/// A raw `(point type, logical number, parameter)` triple as it appears in
/// TLP-typed parameter slots on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub struct TlpTriple {
    pub point_type: u8,
    pub logical_number: u8,
    pub parameter: u8,
}

impl TlpTriple {
    pub fn new(point_type: u8, logical_number: u8, parameter: u8) -> Self {
        Self {
            point_type,
            logical_number,
            parameter,
        }
    }

    /// An all-zero triple marks an unconfigured slot in device tables.
    pub fn is_empty(&self) -> bool {
        self.point_type == 0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    U8(u8),
    I8(i8),
    U16(u16),
    I16(i16),
    U32(u32),
    I32(i32),
    F32(f32),
    F64(f64),
    Str(String),
    Tlp(TlpTriple),
    Time(DateTime<Utc>),
    HourMinute(u16),
    Unknown(Vec<u8>),
}

impl Value {
    pub fn as_u8(&self) -> Option<u8> {
        match *self {
            Value::U8(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_u16(&self) -> Option<u16> {
        match *self {
            Value::U16(v) | Value::HourMinute(v) => Some(v),
            Value::U8(v) => Some(u16::from(v)),
            _ => None,
        }
    }

    pub fn as_u32(&self) -> Option<u32> {
        match *self {
            Value::U32(v) => Some(v),
            Value::U16(v) => Some(u32::from(v)),
            Value::U8(v) => Some(u32::from(v)),
            _ => None,
        }
    }

    pub fn as_f32(&self) -> Option<f32> {
        match *self {
            Value::F32(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Value::F64(v) => Some(v),
            Value::F32(v) => Some(f64::from(v)),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_tlp(&self) -> Option<TlpTriple> {
        match *self {
            Value::Tlp(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_time(&self) -> Option<DateTime<Utc>> {
        match *self {
            Value::Time(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        self.as_u8().map(|v| v != 0)
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::U8(v) => write!(f, "{v}"),
            Value::I8(v) => write!(f, "{v}"),
            Value::U16(v) | Value::HourMinute(v) => write!(f, "{v}"),
            Value::I16(v) => write!(f, "{v}"),
            Value::U32(v) => write!(f, "{v}"),
            Value::I32(v) => write!(f, "{v}"),
            Value::F32(v) => write!(f, "{v}"),
            Value::F64(v) => write!(f, "{v}"),
            Value::Str(s) => write!(f, "{s}"),
            Value::Tlp(t) => write!(f, "({}, {}, {})", t.point_type, t.logical_number, t.parameter),
            Value::Time(t) => write!(f, "{}", t.to_rfc3339()),
            Value::Unknown(b) => write!(f, "{} opaque bytes", b.len()),
        }
    }
}

// Serializes to the plain JSON scalar where one exists; TLP triples and
// opaque bytes keep enough structure to be read back by a human.
impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Value::U8(v) => serializer.serialize_u8(*v),
            Value::I8(v) => serializer.serialize_i8(*v),
            Value::U16(v) | Value::HourMinute(v) => serializer.serialize_u16(*v),
            Value::I16(v) => serializer.serialize_i16(*v),
            Value::U32(v) => serializer.serialize_u32(*v),
            Value::I32(v) => serializer.serialize_i32(*v),
            Value::F32(v) => serializer.serialize_f32(*v),
            Value::F64(v) => serializer.serialize_f64(*v),
            Value::Str(s) => serializer.serialize_str(s),
            Value::Tlp(t) => t.serialize(serializer),
            Value::Time(t) => serializer.serialize_str(&t.to_rfc3339()),
            Value::Unknown(b) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("raw", &b.iter().map(|x| format!("{x:02x}")).collect::<String>())?;
                map.end()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_are_checked() {
        assert_eq!(Value::F32(1.5).as_f32(), Some(1.5));
        assert_eq!(Value::F32(1.5).as_str(), None);
        assert_eq!(Value::U8(3).as_u32(), Some(3));
        assert_eq!(Value::Str("abc".into()).as_u8(), None);
    }

    #[test]
    fn empty_triple() {
        assert!(TlpTriple::new(0, 4, 2).is_empty());
        assert!(!TlpTriple::new(103, 0, 21).is_empty());
    }
}

//! Opcode 255: error indicator
//!
//! The body is a run of `(error code, cause byte offset)` pairs. Codes
//! map through a fixed table from the protocol manual; codes the table
//! does not list still decode, with a placeholder description.

use crate::error::Result;
use crate::request::RequestBody;
use crate::response::ResponseBody;
use bytes::{Buf, Bytes};
use rocwire::codec;
use serde::Serialize;

/// Static definition row for one device error code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorCodeDef {
    pub code: u8,
    pub description: &'static str,
    pub cause_byte: &'static str,
}

const ERROR_CODES: &[ErrorCodeDef] = &[
    ErrorCodeDef { code: 1, description: "Invalid Opcode request.", cause_byte: "Opcode" },
    ErrorCodeDef { code: 2, description: "Invalid parameter number.", cause_byte: "Parameter number" },
    ErrorCodeDef { code: 3, description: "Invalid logical number.", cause_byte: "Logical number" },
    ErrorCodeDef { code: 4, description: "Invalid point type.", cause_byte: "Point type" },
    ErrorCodeDef { code: 5, description: "Received too many data bytes.", cause_byte: "Length" },
    ErrorCodeDef { code: 6, description: "Received too few data bytes.", cause_byte: "Length" },
    ErrorCodeDef { code: 12, description: "Obsolete (Reserved, but not used)", cause_byte: "None" },
    ErrorCodeDef { code: 13, description: "Outside valid address range.", cause_byte: "Address" },
    ErrorCodeDef { code: 14, description: "Invalid history request.", cause_byte: "History point number" },
    ErrorCodeDef { code: 15, description: "Invalid FST request", cause_byte: "FST command number" },
    ErrorCodeDef { code: 16, description: "Invalid event entry.", cause_byte: "Event code" },
    ErrorCodeDef { code: 17, description: "Requested too many alarms.", cause_byte: "Number of alarms requested" },
    ErrorCodeDef { code: 18, description: "Requested too many events.", cause_byte: "Number of events requested" },
    ErrorCodeDef { code: 19, description: "Write to read only parameter.", cause_byte: "Parameter number" },
    ErrorCodeDef { code: 20, description: "Security error.", cause_byte: "Opcode" },
    ErrorCodeDef { code: 21, description: "Invalid security logon.", cause_byte: "Login ID or Password" },
    ErrorCodeDef { code: 22, description: "Invalid store and forward path.", cause_byte: "Any address or group" },
    ErrorCodeDef { code: 24, description: "History configuration in progress.", cause_byte: "Opcode" },
    ErrorCodeDef { code: 25, description: "Invalid parameter range", cause_byte: "Parameter" },
    ErrorCodeDef { code: 29, description: "Invalid 1 day history index request.", cause_byte: "History Segment, point, day or month" },
    ErrorCodeDef { code: 30, description: "Invalid history point.", cause_byte: "History Point" },
    ErrorCodeDef { code: 31, description: "Invalid Min/Max request.", cause_byte: "History segment or point number" },
    ErrorCodeDef { code: 32, description: "Invalid TLP.", cause_byte: "Point type, parameter, or logical number" },
    ErrorCodeDef { code: 33, description: "Invalid time.", cause_byte: "Seconds, minutes, hours, days, months, or years" },
    ErrorCodeDef { code: 34, description: "Illegal Modbus range", cause_byte: "Point/Logical number" },
    ErrorCodeDef { code: 50, description: "General Error", cause_byte: "Any" },
    ErrorCodeDef { code: 51, description: "Invalid State for Write", cause_byte: "Point type" },
    ErrorCodeDef { code: 52, description: "Invalid Configurable Opcode Request", cause_byte: "Starting Table Location" },
    ErrorCodeDef { code: 61, description: "HART Passthrough Comm Scanner", cause_byte: "See Opcode 200 or passthrough disabled on this channel" },
    ErrorCodeDef { code: 62, description: "HART passthrough not licensed", cause_byte: "See Opcode 200" },
    ErrorCodeDef { code: 63, description: "Requested Access Level Too High", cause_byte: "Access Level" },
    ErrorCodeDef { code: 77, description: "Invalid logoff string", cause_byte: "Ignored" },
];

pub fn lookup(code: u8) -> Option<&'static ErrorCodeDef> {
    ERROR_CODES.iter().find(|def| def.code == code)
}

/// One reported error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceErrorEntry {
    pub code: u8,
    pub description: &'static str,
    pub cause_byte: &'static str,
    /// Offset into the offending request of the byte that caused it.
    pub cause_byte_offset: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceErrors {
    pub errors: Vec<DeviceErrorEntry>,
}

impl std::fmt::Display for DeviceErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, e) in self.errors.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(
                f,
                "code {} ({}) at byte {} ({})",
                e.code, e.description, e.cause_byte_offset, e.cause_byte
            )?;
        }
        Ok(())
    }
}

pub(crate) fn decode_device_errors(body: &mut Bytes, _req: &RequestBody) -> Result<ResponseBody> {
    let mut errors = Vec::new();
    while body.remaining() >= 2 {
        let code = codec::get_u8(body)?;
        let cause_byte_offset = codec::get_u8(body)?;
        let (description, cause_byte) = match lookup(code) {
            Some(def) => (def.description, def.cause_byte),
            None => ("Unlisted error code", "Unknown"),
        };
        errors.push(DeviceErrorEntry {
            code,
            description,
            cause_byte,
            cause_byte_offset,
        });
    }
    Ok(ResponseBody::Error(DeviceErrors { errors }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pairs_decode_with_descriptions() {
        let mut body = Bytes::from_static(&[0x04, 0x05, 0x05, 0x09]);
        let ResponseBody::Error(errors) =
            decode_device_errors(&mut body, &RequestBody::ReadClock).unwrap()
        else {
            panic!("wrong response variant");
        };
        assert_eq!(errors.errors.len(), 2);
        assert_eq!(errors.errors[0].code, 4);
        assert_eq!(errors.errors[0].description, "Invalid point type.");
        assert_eq!(errors.errors[0].cause_byte_offset, 5);
        assert_eq!(errors.errors[1].code, 5);
        assert_eq!(errors.errors[1].description, "Received too many data bytes.");
        assert_eq!(errors.errors[1].cause_byte_offset, 9);
    }

    #[test]
    fn unlisted_code_still_decodes() {
        let mut body = Bytes::from_static(&[0x2A, 0x01]);
        let ResponseBody::Error(errors) =
            decode_device_errors(&mut body, &RequestBody::ReadClock).unwrap()
        else {
            panic!("wrong response variant");
        };
        assert_eq!(errors.errors[0].code, 42);
        assert_eq!(errors.errors[0].description, "Unlisted error code");
    }

    #[test]
    fn table_has_gaps() {
        assert!(lookup(4).is_some());
        assert!(lookup(7).is_none());
        assert!(lookup(77).is_some());
    }
}

//! Opcode 50: I/O point position

use crate::enums::IoLocationKind;
use crate::error::{ProtoError, Result};
use crate::request::RequestBody;
use crate::response::ResponseBody;
use bytes::{Buf, Bytes};
use serde::Serialize;
use std::collections::BTreeMap;

/// One byte per physical I/O location; the meaning of the byte (point
/// type or logical number) is whichever the request asked for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IoLocationData {
    pub kind: IoLocationKind,
    /// Value per physical location, location 0 first.
    pub locations: BTreeMap<u8, u8>,
}

pub(crate) fn decode_io_location(body: &mut Bytes, req: &RequestBody) -> Result<ResponseBody> {
    let RequestBody::IoLocation { kind } = req else {
        return Err(ProtoError::InvalidData(
            "opcode 50 response requires an I/O location request".into(),
        ));
    };
    let mut locations = BTreeMap::new();
    let mut location: u8 = 0;
    while body.has_remaining() {
        locations.insert(location, body.get_u8());
        if location == u8::MAX {
            break;
        }
        location += 1;
    }
    Ok(ResponseBody::IoLocation(IoLocationData {
        kind: *kind,
        locations,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_types_by_location() {
        let mut body = Bytes::from_static(&[0x03, 0x00, 0x67, 0x00]);
        let req = RequestBody::IoLocation {
            kind: IoLocationKind::PointTypes,
        };
        let ResponseBody::IoLocation(data) = decode_io_location(&mut body, &req).unwrap() else {
            panic!("wrong response variant");
        };
        assert_eq!(data.kind, IoLocationKind::PointTypes);
        assert_eq!(
            data.locations,
            BTreeMap::from([(0, 3), (1, 0), (2, 0x67), (3, 0)])
        );
    }

    #[test]
    fn mismatched_request_rejected() {
        let mut body = Bytes::from_static(&[0x01]);
        assert!(decode_io_location(&mut body, &RequestBody::ReadClock).is_err());
    }
}

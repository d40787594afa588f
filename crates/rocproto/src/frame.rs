//! Frame envelope
//!
//! ```text
//! 0..4   roc_address, roc_group, host_address, host_group
//! 4      opcode
//! 5      body length N
//! 6..6+N body
//!        crc_lo, crc_hi        over bytes [0, 6+N)
//! ```
//!
//! A response carries the same envelope with the two address pairs
//! swapped; the decoder restores the fields to their request-side roles so
//! the caller can compare against the address it sent.

use crate::error::{ProtoError, Result};
use crate::request::RequestBody;
use crate::response::ResponseBody;
use crate::table;
use bytes::Bytes;
use rocwire::crc;
use serde::Serialize;

pub const HEADER_LEN: usize = 6;
pub const CRC_LEN: usize = 2;

/// Addressing for one request/response pair. The `roc` pair identifies
/// the remote unit, the `host` pair this client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeviceAddress {
    pub roc_address: u8,
    pub roc_group: u8,
    pub host_address: u8,
    pub host_group: u8,
}

impl DeviceAddress {
    pub fn new(roc_address: u8, roc_group: u8) -> Self {
        Self {
            roc_address,
            roc_group,
            host_address: 1,
            host_group: 0,
        }
    }
}

/// Assemble the full wire frame for a request.
pub fn encode_request(address: DeviceAddress, request: &RequestBody) -> Result<Vec<u8>> {
    let body = request.encode_body()?;
    if body.len() > u8::MAX as usize {
        return Err(ProtoError::BodyTooLarge(body.len()));
    }
    let mut frame = Vec::with_capacity(HEADER_LEN + body.len() + CRC_LEN);
    frame.push(address.roc_address);
    frame.push(address.roc_group);
    frame.push(address.host_address);
    frame.push(address.host_group);
    frame.push(request.opcode());
    frame.push(body.len() as u8);
    frame.extend_from_slice(&body);
    crc::append_crc(&mut frame);
    Ok(frame)
}

/// Validate a response envelope and decode its body.
///
/// The originating request is required because several opcodes are
/// command-multiplexed and their payload shape depends on request fields.
pub fn decode_response(raw: &[u8], request: &RequestBody) -> Result<(DeviceAddress, ResponseBody)> {
    if raw.len() < HEADER_LEN + CRC_LEN {
        return Err(ProtoError::FrameTooShort {
            need: HEADER_LEN + CRC_LEN,
            have: raw.len(),
        });
    }
    let body_len = raw[5] as usize;
    let total = HEADER_LEN + body_len + CRC_LEN;
    if raw.len() < total {
        return Err(ProtoError::FrameTooShort {
            need: total,
            have: raw.len(),
        });
    }

    let (payload, found) = crc::split_crc(&raw[..total]).expect("length checked above");
    let computed = crc::crc16(payload);
    if found != computed {
        return Err(ProtoError::CrcMismatch { found, computed });
    }

    // Response addressing is from ROC to host; swap back.
    let address = DeviceAddress {
        host_address: raw[0],
        host_group: raw[1],
        roc_address: raw[2],
        roc_group: raw[3],
    };
    let opcode = raw[4];

    if body_len == 0 {
        return Ok((address, ResponseBody::Empty { opcode }));
    }

    let mut body = Bytes::copy_from_slice(&raw[HEADER_LEN..HEADER_LEN + body_len]);
    let entry = table::entry_for(opcode)?;
    tracing::trace!(opcode, description = entry.description, body_len, "decoding response body");
    let response = (entry.decode)(&mut body, request)?;
    Ok((address, response))
}

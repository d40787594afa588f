//! Static opcode dispatch table
//!
//! Pairs every supported opcode with its response-body decoder. Decoders
//! take the originating request because command-multiplexed opcodes
//! (135, 139, 206) cannot be interpreted from the response bytes alone.

use crate::error::{ProtoError, Result};
use crate::request::RequestBody;
use crate::response::ResponseBody;
use crate::{error_codes, history, io, logs, params, system, transaction};
use bytes::Bytes;

type DecodeFn = fn(&mut Bytes, &RequestBody) -> Result<ResponseBody>;

#[derive(Debug)]
pub struct OpcodeEntry {
    pub opcode: u8,
    pub description: &'static str,
    pub decode: DecodeFn,
}

pub static OPCODE_TABLE: &[OpcodeEntry] = &[
    OpcodeEntry {
        opcode: 6,
        description: "System Configuration",
        decode: system::decode_system_config,
    },
    OpcodeEntry {
        opcode: 7,
        description: "Read Real-time Clock",
        decode: system::decode_clock,
    },
    OpcodeEntry {
        opcode: 50,
        description: "Request I/O Point Position",
        decode: io::decode_io_location,
    },
    OpcodeEntry {
        opcode: 105,
        description: "Request Today's and Yesterday's Min/Max Values",
        decode: history::decode_today_yesterday_min_max,
    },
    OpcodeEntry {
        opcode: 108,
        description: "Request History Tag and Periodic Index",
        decode: history::decode_history_tag_period_index,
    },
    OpcodeEntry {
        opcode: 118,
        description: "Request Alarm Data",
        decode: logs::decode_alarm_data,
    },
    OpcodeEntry {
        opcode: 119,
        description: "Request Event Data",
        decode: logs::decode_event_data,
    },
    OpcodeEntry {
        opcode: 135,
        description: "Request Single Point History Data",
        decode: history::decode_single_point_history,
    },
    OpcodeEntry {
        opcode: 136,
        description: "Request Multiple History Point Data",
        decode: history::decode_multiple_point_history,
    },
    OpcodeEntry {
        opcode: 137,
        description: "Request History Index for a Day",
        decode: history::decode_daily_history_index,
    },
    OpcodeEntry {
        opcode: 138,
        description: "Request Daily and Periodic History for a Day",
        decode: history::decode_daily_periodic_history,
    },
    OpcodeEntry {
        opcode: 139,
        description: "Request History Information Data",
        decode: history::decode_history_information,
    },
    OpcodeEntry {
        opcode: 167,
        description: "Request Single Point Parameters",
        decode: params::decode_point_parameters,
    },
    OpcodeEntry {
        opcode: 180,
        description: "Request Parameters",
        decode: params::decode_parameters,
    },
    OpcodeEntry {
        opcode: 206,
        description: "Request Transaction History Data",
        decode: transaction::decode_transaction_history,
    },
    OpcodeEntry {
        opcode: 255,
        description: "Error Indicator",
        decode: error_codes::decode_device_errors,
    },
];

pub fn entry_for(opcode: u8) -> Result<&'static OpcodeEntry> {
    OPCODE_TABLE
        .iter()
        .find(|entry| entry.opcode == opcode)
        .ok_or(ProtoError::UnknownOpcode(opcode))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_supported_opcodes_present() {
        for opcode in [6, 7, 50, 105, 108, 118, 119, 135, 136, 137, 138, 139, 167, 180, 206, 255] {
            assert!(entry_for(opcode).is_ok(), "opcode {opcode}");
        }
    }

    #[test]
    fn unknown_opcode_is_an_error() {
        assert_eq!(entry_for(10).unwrap_err(), ProtoError::UnknownOpcode(10));
        assert_eq!(entry_for(0).unwrap_err(), ProtoError::UnknownOpcode(0));
    }

    #[test]
    fn table_is_sorted_and_unique() {
        let opcodes: Vec<u8> = OPCODE_TABLE.iter().map(|e| e.opcode).collect();
        let mut sorted = opcodes.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(opcodes, sorted);
    }
}

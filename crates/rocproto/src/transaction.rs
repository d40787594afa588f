//! Opcode 206: transaction history
//!
//! Command 1 lists the transactions in a segment; command 2 reads one
//! transaction as a run of `(data type code, value)` pairs.

use crate::error::{ProtoError, Result};
use crate::request::RequestBody;
use crate::response::ResponseBody;
use crate::wire;
use bytes::{Buf, Bytes};
use chrono::{DateTime, Utc};
use rocwire::{codec, DataType, Value};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionEntry {
    pub number: i16,
    pub created: DateTime<Utc>,
}

/// One typed value of a transaction payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionValue {
    pub data_type: DataType,
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TransactionHistory {
    /// Command 1.
    List {
        count: u8,
        /// More transactions exist than fit this response.
        excess: bool,
        description: String,
        payload_size: i16,
        transactions: Vec<TransactionEntry>,
    },
    /// Command 2.
    Read {
        data_size: u8,
        /// More data exists than fit this response.
        excess: bool,
        values: Vec<TransactionValue>,
    },
}

pub(crate) fn decode_transaction_history(
    body: &mut Bytes,
    req: &RequestBody,
) -> Result<ResponseBody> {
    let RequestBody::TransactionHistory(_) = req else {
        return Err(ProtoError::InvalidData(
            "opcode 206 response requires a transaction history request".into(),
        ));
    };

    let command = codec::get_u8(body)?;
    let history = match command {
        1 => {
            let count = codec::get_u8(body)?;
            let excess = codec::get_u8(body)? != 0;
            let description = codec::get_ascii(body, 10)?;
            let payload_size = codec::get_i16_le(body)?;
            let mut transactions = Vec::with_capacity(usize::from(count));
            for _ in 0..count {
                let number = codec::get_i16_le(body)?;
                let created = wire::get_epoch_time(body)?;
                transactions.push(TransactionEntry { number, created });
            }
            TransactionHistory::List {
                count,
                excess,
                description,
                payload_size,
                transactions,
            }
        }
        2 => {
            let data_size = codec::get_u8(body)?;
            let excess = codec::get_u8(body)? != 0;
            // data_size counts the excess flag plus the type/value run.
            let mut remaining = usize::from(data_size).saturating_sub(1);
            let mut values = Vec::new();
            while remaining > 0 && body.has_remaining() {
                let code = codec::get_u8(body)?;
                let data_type = DataType::from_log_code(code).ok_or(ProtoError::InvalidEnum {
                    what: "transaction data type",
                    value: code,
                })?;
                let value = data_type.decode(body)?;
                values.push(TransactionValue { data_type, value });
                remaining = remaining.saturating_sub(1 + data_type.width());
            }
            TransactionHistory::Read {
                data_size,
                excess,
                values,
            }
        }
        value => {
            return Err(ProtoError::InvalidEnum {
                what: "transaction history command",
                value,
            })
        }
    };
    Ok(ResponseBody::TransactionHistory(history))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::TransactionHistoryRequest;

    fn list_request() -> RequestBody {
        RequestBody::TransactionHistory(TransactionHistoryRequest::ListTransactions {
            segment: 1,
            offset: 0,
        })
    }

    fn read_request() -> RequestBody {
        RequestBody::TransactionHistory(TransactionHistoryRequest::ReadTransaction {
            segment: 1,
            transaction: 3,
            data_offset: 0,
        })
    }

    #[test]
    fn list_transactions() {
        let mut body = vec![1u8, 2, 0];
        body.extend_from_slice(b"LOADS     ");
        body.extend_from_slice(&24i16.to_le_bytes());
        body.extend_from_slice(&3i16.to_le_bytes());
        body.extend_from_slice(&1_700_000_000u32.to_le_bytes());
        body.extend_from_slice(&4i16.to_le_bytes());
        body.extend_from_slice(&1_700_003_600u32.to_le_bytes());

        let mut buf = Bytes::from(body);
        let ResponseBody::TransactionHistory(history) =
            decode_transaction_history(&mut buf, &list_request()).unwrap()
        else {
            panic!("wrong response variant");
        };
        let TransactionHistory::List {
            count,
            excess,
            description,
            payload_size,
            transactions,
        } = history
        else {
            panic!("expected transaction list");
        };
        assert_eq!(count, 2);
        assert!(!excess);
        assert_eq!(description, "LOADS");
        assert_eq!(payload_size, 24);
        assert_eq!(transactions[0].number, 3);
        assert_eq!(transactions[1].created.timestamp(), 1_700_003_600);
    }

    #[test]
    fn read_transaction_typed_values() {
        // One UINT8 and one FLOAT: sizes 1+1 and 1+4, plus the excess
        // flag, give data_size 8.
        let mut body = vec![2u8, 8, 0];
        body.push(4); // UINT8
        body.push(17);
        body.push(7); // FLOAT
        body.extend_from_slice(&3.5f32.to_le_bytes());

        let mut buf = Bytes::from(body);
        let ResponseBody::TransactionHistory(history) =
            decode_transaction_history(&mut buf, &read_request()).unwrap()
        else {
            panic!("wrong response variant");
        };
        let TransactionHistory::Read { values, .. } = history else {
            panic!("expected transaction read");
        };
        assert_eq!(values.len(), 2);
        assert_eq!(values[0].value, Value::U8(17));
        assert_eq!(values[1].data_type, DataType::Float);
        assert_eq!(values[1].value, Value::F32(3.5));
    }

    #[test]
    fn unknown_transaction_data_type() {
        let mut buf = Bytes::from_static(&[2, 3, 0, 99, 0]);
        assert!(decode_transaction_history(&mut buf, &read_request()).is_err());
    }

    #[test]
    fn invalid_command_rejected() {
        let mut buf = Bytes::from_static(&[9, 0]);
        let err = decode_transaction_history(&mut buf, &list_request()).unwrap_err();
        assert_eq!(
            err,
            ProtoError::InvalidEnum {
                what: "transaction history command",
                value: 9
            }
        );
    }
}

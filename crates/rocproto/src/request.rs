//! Request bodies
//!
//! One variant per supported opcode. Encoding produces only the body
//! bytes; the envelope (header, length, CRC) is added by `frame`.

use crate::enums::{HistoryType, IoLocationKind};
use crate::error::{ProtoError, Result};
use roctlp::TlpInstance;

/// Opcode 139 is command-multiplexed; command 0 requests the configured
/// point list, command 1 requests point data. Fields that only command 1
/// needs exist only on that variant.
#[derive(Debug, Clone, PartialEq)]
pub enum HistoryInformationRequest {
    ConfiguredPoints {
        segment: u8,
    },
    PointData {
        segment: u8,
        segment_index: i16,
        history_type: HistoryType,
        period_count: u8,
        request_timestamps: bool,
        points: Vec<u8>,
    },
}

impl HistoryInformationRequest {
    pub fn command(&self) -> u8 {
        match self {
            Self::ConfiguredPoints { .. } => 0,
            Self::PointData { .. } => 1,
        }
    }
}

/// Opcode 206: command 1 lists transactions, command 2 reads one.
#[derive(Debug, Clone, PartialEq)]
pub enum TransactionHistoryRequest {
    ListTransactions {
        segment: u8,
        offset: i16,
    },
    ReadTransaction {
        segment: u8,
        transaction: i16,
        data_offset: i16,
    },
}

impl TransactionHistoryRequest {
    pub fn command(&self) -> u8 {
        match self {
            Self::ListTransactions { .. } => 1,
            Self::ReadTransaction { .. } => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// Opcode 6.
    SystemConfig,
    /// Opcode 7.
    ReadClock,
    /// Opcode 50.
    IoLocation { kind: IoLocationKind },
    /// Opcode 105.
    TodayYesterdayMinMax { segment: u8, point: u8 },
    /// Opcode 108.
    HistoryTagPeriodIndex { segment: u8, points: Vec<u8> },
    /// Opcode 118.
    AlarmData { count: u8, start_index: i16 },
    /// Opcode 119.
    EventData { count: u8, start_index: i16 },
    /// Opcode 135.
    SinglePointHistory {
        segment: u8,
        point: u8,
        history_type: HistoryType,
        start_index: i16,
        count: u8,
    },
    /// Opcode 136.
    MultiplePointHistory {
        segment: u8,
        segment_index: i16,
        history_type: HistoryType,
        starting_point: u8,
        point_count: u8,
        period_count: u8,
    },
    /// Opcode 137.
    DailyHistoryIndex { segment: u8, day: u8, month: u8 },
    /// Opcode 138.
    DailyPeriodicHistory {
        segment: u8,
        point: u8,
        day: u8,
        month: u8,
    },
    /// Opcode 139.
    HistoryInformation(HistoryInformationRequest),
    /// Opcode 167: contiguous parameters of one point.
    SinglePointParameters {
        point_type: u8,
        logical_number: u8,
        count: u8,
        starting_parameter: u8,
    },
    /// Opcode 180: arbitrary TLP list.
    Parameters { tlps: Vec<TlpInstance> },
    /// Opcode 206.
    TransactionHistory(TransactionHistoryRequest),
}

impl RequestBody {
    pub fn opcode(&self) -> u8 {
        match self {
            RequestBody::SystemConfig => 6,
            RequestBody::ReadClock => 7,
            RequestBody::IoLocation { .. } => 50,
            RequestBody::TodayYesterdayMinMax { .. } => 105,
            RequestBody::HistoryTagPeriodIndex { .. } => 108,
            RequestBody::AlarmData { .. } => 118,
            RequestBody::EventData { .. } => 119,
            RequestBody::SinglePointHistory { .. } => 135,
            RequestBody::MultiplePointHistory { .. } => 136,
            RequestBody::DailyHistoryIndex { .. } => 137,
            RequestBody::DailyPeriodicHistory { .. } => 138,
            RequestBody::HistoryInformation(_) => 139,
            RequestBody::SinglePointParameters { .. } => 167,
            RequestBody::Parameters { .. } => 180,
            RequestBody::TransactionHistory(_) => 206,
        }
    }

    /// Serialize the opcode-specific body bytes.
    pub fn encode_body(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        match self {
            RequestBody::SystemConfig | RequestBody::ReadClock => {}
            RequestBody::IoLocation { kind } => out.push(kind.value()),
            RequestBody::TodayYesterdayMinMax { segment, point } => {
                out.push(*segment);
                out.push(*point);
            }
            RequestBody::HistoryTagPeriodIndex { segment, points } => {
                if points.len() > u8::MAX as usize {
                    return Err(ProtoError::InvalidData(format!(
                        "{} history points exceed the one-byte count",
                        points.len()
                    )));
                }
                out.push(*segment);
                out.push(points.len() as u8);
                out.extend_from_slice(points);
            }
            RequestBody::AlarmData { count, start_index }
            | RequestBody::EventData { count, start_index } => {
                out.push(*count);
                out.extend_from_slice(&start_index.to_le_bytes());
            }
            RequestBody::SinglePointHistory {
                segment,
                point,
                history_type,
                start_index,
                count,
            } => {
                if *count >= 60 {
                    return Err(ProtoError::InvalidData(format!(
                        "opcode 135 accepts at most 59 values per request, got {count}"
                    )));
                }
                out.push(*segment);
                out.push(*point);
                out.push(history_type.value());
                out.extend_from_slice(&start_index.to_le_bytes());
                out.push(*count);
            }
            RequestBody::MultiplePointHistory {
                segment,
                segment_index,
                history_type,
                starting_point,
                point_count,
                period_count,
            } => {
                out.push(*segment);
                out.extend_from_slice(&segment_index.to_le_bytes());
                out.push(history_type.value());
                out.push(*starting_point);
                out.push(*point_count);
                out.push(*period_count);
            }
            RequestBody::DailyHistoryIndex { segment, day, month } => {
                out.push(*segment);
                out.push(*day);
                out.push(*month);
            }
            RequestBody::DailyPeriodicHistory {
                segment,
                point,
                day,
                month,
            } => {
                out.push(*segment);
                out.push(*point);
                out.push(*day);
                out.push(*month);
            }
            RequestBody::HistoryInformation(req) => match req {
                HistoryInformationRequest::ConfiguredPoints { segment } => {
                    out.push(req.command());
                    out.push(*segment);
                }
                HistoryInformationRequest::PointData {
                    segment,
                    segment_index,
                    history_type,
                    period_count,
                    request_timestamps,
                    points,
                } => {
                    if points.is_empty() || points.len() > u8::MAX as usize {
                        return Err(ProtoError::InvalidData(format!(
                            "opcode 139 point data needs 1..=255 points, got {}",
                            points.len()
                        )));
                    }
                    out.push(req.command());
                    out.push(*segment);
                    out.extend_from_slice(&segment_index.to_le_bytes());
                    out.push(history_type.value());
                    out.push(*period_count);
                    out.push(u8::from(*request_timestamps));
                    out.push(points.len() as u8);
                    out.extend_from_slice(points);
                }
            },
            RequestBody::SinglePointParameters {
                point_type,
                logical_number,
                count,
                starting_parameter,
            } => {
                out.push(*point_type);
                out.push(*logical_number);
                out.push(*count);
                out.push(*starting_parameter);
            }
            RequestBody::Parameters { tlps } => {
                if tlps.is_empty() || tlps.len() > 84 {
                    // Each TLP costs 3 request bytes and at least 4
                    // response bytes; 84 is the most that fits either way.
                    return Err(ProtoError::InvalidData(format!(
                        "opcode 180 accepts 1..=84 TLPs per request, got {}",
                        tlps.len()
                    )));
                }
                out.push(tlps.len() as u8);
                for tlp in tlps {
                    out.push(tlp.point_type);
                    out.push(tlp.logical_number);
                    out.push(tlp.parameter);
                }
            }
            RequestBody::TransactionHistory(req) => match req {
                TransactionHistoryRequest::ListTransactions { segment, offset } => {
                    out.push(req.command());
                    out.push(*segment);
                    out.extend_from_slice(&offset.to_le_bytes());
                }
                TransactionHistoryRequest::ReadTransaction {
                    segment,
                    transaction,
                    data_offset,
                } => {
                    out.push(req.command());
                    out.push(*segment);
                    out.extend_from_slice(&transaction.to_le_bytes());
                    out.extend_from_slice(&data_offset.to_le_bytes());
                }
            },
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_bodies() {
        assert!(RequestBody::SystemConfig.encode_body().unwrap().is_empty());
        assert!(RequestBody::ReadClock.encode_body().unwrap().is_empty());
    }

    #[test]
    fn io_location_selector() {
        let body = RequestBody::IoLocation {
            kind: IoLocationKind::PointTypes,
        }
        .encode_body()
        .unwrap();
        assert_eq!(body, vec![0x00]);
    }

    #[test]
    fn parameters_body_is_count_then_triples() {
        let body = RequestBody::Parameters {
            tlps: vec![TlpInstance::new(103, 1, 21)],
        }
        .encode_body()
        .unwrap();
        assert_eq!(body, vec![0x01, 0x67, 0x01, 0x15]);
    }

    #[test]
    fn alarm_request_index_is_le() {
        let body = RequestBody::AlarmData {
            count: 10,
            start_index: -1,
        }
        .encode_body()
        .unwrap();
        assert_eq!(body, vec![10, 0xFF, 0xFF]);
    }

    #[test]
    fn single_point_history_count_capped() {
        let req = RequestBody::SinglePointHistory {
            segment: 0,
            point: 1,
            history_type: HistoryType::Periodic,
            start_index: 0,
            count: 60,
        };
        assert!(req.encode_body().is_err());
    }

    #[test]
    fn history_information_command_zero_omits_point_fields() {
        let body = RequestBody::HistoryInformation(HistoryInformationRequest::ConfiguredPoints {
            segment: 2,
        })
        .encode_body()
        .unwrap();
        assert_eq!(body, vec![0, 2]);
    }

    #[test]
    fn history_information_command_one_layout() {
        let body = RequestBody::HistoryInformation(HistoryInformationRequest::PointData {
            segment: 1,
            segment_index: 5,
            history_type: HistoryType::Periodic,
            period_count: 3,
            request_timestamps: true,
            points: vec![4, 9],
        })
        .encode_body()
        .unwrap();
        assert_eq!(body, vec![1, 1, 5, 0, 1, 3, 1, 2, 4, 9]);
    }

    #[test]
    fn transaction_commands() {
        let list = RequestBody::TransactionHistory(TransactionHistoryRequest::ListTransactions {
            segment: 1,
            offset: 0,
        })
        .encode_body()
        .unwrap();
        assert_eq!(list, vec![1, 1, 0, 0]);

        let read = RequestBody::TransactionHistory(TransactionHistoryRequest::ReadTransaction {
            segment: 1,
            transaction: 7,
            data_offset: 0,
        })
        .encode_body()
        .unwrap();
        assert_eq!(read, vec![2, 1, 7, 0, 0, 0]);
    }
}

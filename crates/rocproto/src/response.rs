//! Response bodies
//!
//! One variant per supported opcode, plus `Empty` for a syntactically
//! valid envelope that carried no data and `Error` for the device error
//! indicator (opcode 255).

use crate::error_codes::DeviceErrors;
use crate::history::{
    DailyHistoryIndex, DailyPeriodicHistory, HistoryInformation, HistoryTagPeriodIndex,
    MultiplePointHistory, SinglePointHistory, TodayYesterdayMinMax,
};
use crate::io::IoLocationData;
use crate::logs::{AlarmData, EventData};
use crate::params::{ParameterValues, PointParameters};
use crate::system::{ClockTime, SystemConfig};
use crate::transaction::TransactionHistory;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ResponseBody {
    SystemConfig(SystemConfig),
    ClockTime(ClockTime),
    IoLocation(IoLocationData),
    TodayYesterdayMinMax(TodayYesterdayMinMax),
    HistoryTagPeriodIndex(HistoryTagPeriodIndex),
    AlarmData(AlarmData),
    EventData(EventData),
    SinglePointHistory(SinglePointHistory),
    MultiplePointHistory(MultiplePointHistory),
    DailyHistoryIndex(DailyHistoryIndex),
    DailyPeriodicHistory(DailyPeriodicHistory),
    HistoryInformation(HistoryInformation),
    PointParameters(PointParameters),
    Parameters(ParameterValues),
    TransactionHistory(TransactionHistory),
    /// Opcode 255: the device rejected the request.
    Error(DeviceErrors),
    /// A valid envelope whose length byte was zero.
    Empty { opcode: u8 },
}

impl ResponseBody {
    pub fn opcode(&self) -> u8 {
        match self {
            ResponseBody::SystemConfig(_) => 6,
            ResponseBody::ClockTime(_) => 7,
            ResponseBody::IoLocation(_) => 50,
            ResponseBody::TodayYesterdayMinMax(_) => 105,
            ResponseBody::HistoryTagPeriodIndex(_) => 108,
            ResponseBody::AlarmData(_) => 118,
            ResponseBody::EventData(_) => 119,
            ResponseBody::SinglePointHistory(_) => 135,
            ResponseBody::MultiplePointHistory(_) => 136,
            ResponseBody::DailyHistoryIndex(_) => 137,
            ResponseBody::DailyPeriodicHistory(_) => 138,
            ResponseBody::HistoryInformation(_) => 139,
            ResponseBody::PointParameters(_) => 167,
            ResponseBody::Parameters(_) => 180,
            ResponseBody::TransactionHistory(_) => 206,
            ResponseBody::Error(_) => 255,
            ResponseBody::Empty { opcode } => *opcode,
        }
    }
}

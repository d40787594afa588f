//! Protocol enumerations
//!
//! Every enum here maps a one-byte wire code to a named variant. The
//! `roc_enum!` macro generates the code conversion and a serialized form
//! of `{"name": ..., "value": ...}`, which is the shape the configuration
//! dump uses for enum-valued fields.

macro_rules! roc_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($(#[$vmeta:meta])* $variant:ident = $value:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(u8)]
        pub enum $name {
            $($(#[$vmeta])* $variant = $value),+
        }

        impl $name {
            pub fn name(&self) -> &'static str {
                match self {
                    $(Self::$variant => stringify!($variant)),+
                }
            }

            pub fn value(&self) -> u8 {
                *self as u8
            }
        }

        impl TryFrom<u8> for $name {
            type Error = crate::error::ProtoError;

            fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
                match value {
                    $($value => Ok(Self::$variant),)+
                    _ => Err(crate::error::ProtoError::InvalidEnum {
                        what: stringify!($name),
                        value,
                    }),
                }
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(
                &self,
                serializer: S,
            ) -> std::result::Result<S::Ok, S::Error> {
                use serde::ser::SerializeMap;
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("name", self.name())?;
                map.serialize_entry("value", &self.value())?;
                map.end()
            }
        }
    };
}

roc_enum! {
    /// System mode the unit is operating in (opcode 6).
    RocOperatingMode {
        FirmwareUpdate = 0,
        Run = 1,
    }
}

roc_enum! {
    /// Logical compatibility status (point type 91, parameter 50).
    LogicalCompatibilityStatus {
        SixteenPointsPerSlotNineSlots = 0,
        SixteenPointsPerSlotFourteenSlots = 1,
        EightPointsPerSlotTwentySevenSlots = 2,
    }
}

roc_enum! {
    /// Revision of the opcode 6 response layout.
    OpcodeRevision {
        Original = 0,
        ExtendedForAdditionalPointTypes = 1,
    }
}

roc_enum! {
    RocSubType {
        Series2 = 0,
        Series1 = 1,
    }
}

roc_enum! {
    RocType {
        RocPacRoc300 = 1,
        FloBoss407 = 2,
        FlashPacRoc300 = 3,
        FloBoss503 = 4,
        FloBoss504 = 5,
        Roc800 = 6,
        Dl800 = 11,
    }
}

roc_enum! {
    /// How a history point archives its source value.
    HistoryArchiveType {
        NotDefined = 0,
        UserCData = 1,
        UserCTime = 2,
        FstData = 65,
        FstTime = 67,
        Average = 128,
        Accumulate = 129,
        CurrentValue = 130,
        Totalize = 134,
    }
}

roc_enum! {
    /// Averaging technique or accumulation rate for a history point.
    HistoryAveragingRateType {
        None = 0,
        FlowDependentTimeWeightedLinear = 1,
        FlowDependentTimeWeightedFormulaic = 2,
        FlowWeightedLinear = 3,
        FlowWeightedFormulaic = 4,
        LinearAveraging = 5,
        UserWeightedAveraging = 6,
        PerSecond = 10,
        PerMinute = 11,
        PerHour = 12,
        PerDay = 13,
    }
}

roc_enum! {
    /// Whether an alarm record logs the alarm being set or cleared.
    AlarmCondition {
        Cleared = 0,
        Set = 1,
    }
}

roc_enum! {
    /// Reason a parameter alarm was logged.
    ParameterAlarmCode {
        LowAlarm = 0,
        LowLowAlarm = 1,
        HighAlarm = 2,
        HighHighAlarm = 3,
        RateAlarm = 4,
        StatusChange = 5,
        PointFail = 6,
        ScanningDisabled = 7,
        ScanningManual = 8,
        RedundantTotalCounts = 9,
        RedundantFlowRegister = 10,
        NoFlowAlarm = 11,
        InputFreezeMode = 12,
        SensorCommunicationFailure = 13,
        Eia485CommunicationFailure = 14,
        OffScanMode = 15,
        ManualFlowInputs = 16,
        MeterTemperatureFailure = 17,
        CompressibilityCalculationAlarm = 18,
        SequenceOutOfOrder = 19,
        PhaseDiscrepancy = 20,
        PulseSynchronizationFailure = 21,
        FrequencyDiscrepancy = 22,
        PulseInputOneFailure = 23,
        PulseInputTwoFailure = 24,
        PulseOutputBufferOverrun = 25,
        PulseOutputBufferWarning = 26,
        RelayFault = 27,
        RelayFailure = 28,
        StaticPressureLowLimited = 29,
        TemperatureLowLimited = 30,
        AnalogOutputReadbackError = 31,
        BadLevelAPulseStream = 32,
        MarketPulseAlarm = 33,
    }
}

roc_enum! {
    /// Specific cause of a system event.
    SystemEventCode {
        InitializationSequence = 144,
        AllPowerRemoved = 145,
        InitializeFromDefaults = 146,
        RomCrcError = 147,
        DatabaseInitialization = 148,
        ProgramFlash = 150,
        SmartModuleInserted = 154,
        SmartModuleRemoved = 155,
        ClockSet = 200,
        TextMessage = 248,
        DownloadConfiguration = 249,
        UploadConfiguration = 250,
        CalibrationTimeout = 251,
        CalibrationCancel = 252,
        CalibrationSuccess = 253,
        MvsResetToFactoryDefaults = 254,
    }
}

roc_enum! {
    /// Specific cause of a user event.
    UserEventCode {
        InitializationSequence = 144,
        AllPowerRemoved = 145,
        InitializeFromDefaults = 146,
        RomCrcError = 147,
        DatabaseInitialization = 148,
        ProgramFlash = 150,
        SmartModuleInserted = 154,
        SmartModuleRemoved = 155,
        ClockSet = 200,
        TextMessage = 248,
        DownloadConfiguration = 249,
        UploadConfiguration = 250,
        CalibrationTimeout = 251,
        CalibrationCancel = 252,
        CalibrationSuccess = 253,
        MvsResetToFactoryDefaults = 254,
    }
}

roc_enum! {
    /// Kind of historical data requested from opcodes 135/136.
    HistoryType {
        Minute = 0,
        Periodic = 1,
        Daily = 2,
        PeriodicTimeStamps = 3,
        DailyTimeStamps = 4,
    }
}

impl HistoryType {
    /// Whether opcode 135 returns `TIME` values instead of floats.
    pub fn yields_timestamps(&self) -> bool {
        matches!(self, HistoryType::PeriodicTimeStamps | HistoryType::DailyTimeStamps)
    }
}

roc_enum! {
    /// Opcode 50 request selector.
    IoLocationKind {
        PointTypes = 0,
        LogicalNumbers = 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_round_trip() {
        assert_eq!(RocType::try_from(6), Ok(RocType::Roc800));
        assert_eq!(RocType::Roc800.value(), 6);
        assert!(RocType::try_from(7).is_err());
        assert_eq!(ParameterAlarmCode::try_from(2), Ok(ParameterAlarmCode::HighAlarm));
        assert_eq!(HistoryArchiveType::try_from(134), Ok(HistoryArchiveType::Totalize));
    }

    #[test]
    fn serializes_as_name_value_pair() {
        let json = serde_json::to_value(RocOperatingMode::Run).unwrap();
        assert_eq!(json["name"], "Run");
        assert_eq!(json["value"], 1);
    }

    #[test]
    fn timestamp_history_types() {
        assert!(HistoryType::DailyTimeStamps.yields_timestamps());
        assert!(!HistoryType::Periodic.yields_timestamps());
    }
}

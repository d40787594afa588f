//! Process-wide point-type registry
//!
//! Seeded once on first access. Numbers and parameter assignments follow
//! the ROC800 parameter documentation.

use crate::error::{Result, TlpError};
use crate::parameter::{Access, Parameter};
use crate::point_type::PointType;
use rocwire::DataType;
use std::collections::BTreeMap;
use std::sync::OnceLock;

pub const ANALOG_INPUTS: u8 = 103;
pub const DISCRETE_INPUTS: u8 = 101;
pub const DISCRETE_OUTPUTS: u8 = 102;
pub const CONFIGURABLE_OPCODE: u8 = 99;
pub const HISTORY_SEGMENT_CONFIGURATION: u8 = 124;

/// Point type holding the point configurations of history segment `s`.
pub fn history_segment_point_configuration(segment: u8) -> u8 {
    125 + segment
}

#[derive(Debug)]
pub struct Registry {
    point_types: BTreeMap<u8, PointType>,
}

impl Registry {
    pub fn point_type_by_number(&self, number: u8) -> Result<&PointType> {
        self.point_types
            .get(&number)
            .ok_or(TlpError::PointTypeNotFound(number))
    }

    pub fn point_type_by_name(&self, name: &str) -> Result<&PointType> {
        self.point_types
            .values()
            .find(|pt| pt.description.eq_ignore_ascii_case(name))
            .ok_or_else(|| TlpError::PointTypeNameNotFound(name.to_owned()))
    }

    /// Synthesize an opaque stand-in for an unlisted point type.
    pub fn unknown_point_type(&self, number: u8) -> PointType {
        PointType::unknown(number)
    }

    pub fn point_types(&self) -> impl Iterator<Item = &PointType> {
        self.point_types.values()
    }
}

/// The shared registry, built on first use.
pub fn registry() -> &'static Registry {
    static REGISTRY: OnceLock<Registry> = OnceLock::new();
    REGISTRY.get_or_init(build)
}

fn build() -> Registry {
    let mut point_types = BTreeMap::new();
    for pt in [
        discrete_inputs(),
        discrete_outputs(),
        analog_inputs(),
        configurable_opcode(),
        history_segment_configuration(),
    ] {
        point_types.insert(pt.number, pt);
    }
    for segment in 0..=12 {
        let pt = history_point_configuration(segment);
        point_types.insert(pt.number, pt);
    }
    Registry { point_types }
}

fn discrete_inputs() -> PointType {
    PointType::new(
        DISCRETE_INPUTS,
        "DISCRETE_INPUTS",
        vec![
            Parameter::new(0, "POINT_TAG_ID", "Point tag identifier", DataType::Ac10, Access::ReadWrite),
            Parameter::new(1, "UNITS", "Engineering units tag", DataType::Ac10, Access::ReadWrite),
            Parameter::new(2, "SCANNING", "Scanning enable", DataType::Uint8, Access::ReadWrite)
                .with_range("0-1"),
            Parameter::new(3, "STATUS", "Input status flags", DataType::Bin, Access::ReadOnly)
                .with_bits([
                    ("STATE", "Current input state"),
                    ("LATCH", "Latched state"),
                    ("INVERT", "Input is inverted"),
                    ("MOMENTARY", "Momentary mode active"),
                    ("TOGGLE", "Toggle mode active"),
                    ("MANUAL", "Point is in manual mode"),
                    ("FAILED", "Point failed"),
                    ("SCAN_DISABLED", "Scanning is disabled"),
                ]),
        ],
    )
}

fn discrete_outputs() -> PointType {
    PointType::new(
        DISCRETE_OUTPUTS,
        "DISCRETE_OUTPUTS",
        vec![
            Parameter::new(0, "POINT_TAG_ID", "Point tag identifier", DataType::Ac10, Access::ReadWrite),
            Parameter::new(1, "UNITS", "Engineering units tag", DataType::Ac10, Access::ReadWrite),
            Parameter::new(3, "STATUS", "Output status flags", DataType::Bin, Access::ReadOnly)
                .with_bits([
                    ("STATE", "Current output state"),
                    ("LATCH", "Latched state"),
                    ("MOMENTARY", "Momentary mode active"),
                    ("TOGGLE", "Toggle mode active"),
                    ("TDO", "Timed discrete output"),
                    ("MANUAL", "Point is in manual mode"),
                    ("FAILED", "Point failed"),
                    ("SCAN_DISABLED", "Scanning is disabled"),
                ]),
        ],
    )
}

fn analog_inputs() -> PointType {
    PointType::new(
        ANALOG_INPUTS,
        "ANALOG_INPUTS",
        vec![
            Parameter::new(1, "UNITS", "Engineering units tag", DataType::Ac10, Access::ReadWrite),
            Parameter::new(5, "SCAN_PERIOD", "Scan period in seconds", DataType::Float, Access::ReadWrite),
            Parameter::new(13, "LOW_READING_EU", "EU at low calibration", DataType::Float, Access::ReadWrite),
            Parameter::new(14, "HIGH_READING_EU", "EU at high calibration", DataType::Float, Access::ReadWrite),
            Parameter::new(21, "EU_VALUE", "Engineering units value", DataType::Float, Access::ReadOnly),
            Parameter::new(27, "ALARM_CODE", "Active alarm flags", DataType::Bin, Access::ReadOnly)
                .with_bits([
                    ("LOW_ALARM", "Low alarm active"),
                    ("LO_LO_ALARM", "Low-low alarm active"),
                    ("HIGH_ALARM", "High alarm active"),
                    ("HI_HI_ALARM", "High-high alarm active"),
                    ("RATE_ALARM", "Rate alarm active"),
                    ("POINT_FAIL", "Point fail alarm active"),
                    ("MANUAL_MODE", "Point is in manual mode"),
                    ("SCAN_DISABLED", "Scanning is disabled"),
                ]),
            Parameter::new(62, "POINT_TAG_ID", "Point tag identifier", DataType::Ac10, Access::ReadWrite),
        ],
    )
}

fn configurable_opcode() -> PointType {
    let mut parameters = vec![Parameter::new(
        0,
        "TABLE_VERSION",
        "Version of the table data",
        DataType::Float,
        Access::ReadOnly,
    )];
    for n in 1..=44u8 {
        parameters.push(Parameter::new(
            n,
            &format!("DATA_{n}"),
            &format!("TLP mapped to table location {n}"),
            DataType::Tlp,
            Access::ReadWrite,
        ));
    }
    PointType::new(CONFIGURABLE_OPCODE, "CONFIGURABLE_OPCODE", parameters)
}

fn history_segment_configuration() -> PointType {
    PointType::new(
        HISTORY_SEGMENT_CONFIGURATION,
        "HISTORY_SEGMENT_CONFIGURATION",
        vec![
            Parameter::new(0, "SEGMENT_DESCRIPTION", "Segment purpose", DataType::Ac10, Access::ReadWrite),
            Parameter::new(1, "SEGMENT_SIZE", "History points in segment", DataType::Uint16, Access::ReadWrite),
            Parameter::new(2, "MAX_SEGMENT_SIZE", "Maximum configurable points", DataType::Uint16, Access::ReadOnly),
            Parameter::new(3, "PERIODIC_ENTRIES", "Periodic entries per point", DataType::Uint16, Access::ReadWrite),
            Parameter::new(4, "PERIODIC_INDEX", "Next periodic entry slot", DataType::Uint16, Access::ReadOnly),
            Parameter::new(5, "DAILY_ENTRIES", "Daily entries per point", DataType::Uint16, Access::ReadWrite),
            Parameter::new(6, "DAILY_INDEX", "Next daily entry slot", DataType::Uint16, Access::ReadOnly),
            Parameter::new(7, "PERIODIC_SAMPLE_RATE", "Minutes between periodic entries", DataType::Uint16, Access::ReadWrite),
            Parameter::new(8, "CONTRACT_HOUR", "Hour beginning a new day", DataType::Uint8, Access::ReadWrite)
                .with_range("0-23"),
            Parameter::new(9, "ON_OFF_SWITCH", "Logging enable", DataType::Uint8, Access::ReadWrite)
                .with_range("0-1"),
            Parameter::new(10, "FREE_SPACE", "Unallocated history entries", DataType::Uint32, Access::ReadOnly),
            Parameter::new(11, "RESERVED", "Reserved", DataType::Uint16, Access::ReadOnly),
            Parameter::new(12, "NUMBER_OF_CONFIGURED_POINTS", "Configured points in segment", DataType::Uint8, Access::ReadOnly),
            Parameter::new(13, "USER_WEIGHTING_TLP", "Weight source for user-weighted averaging", DataType::Tlp, Access::ReadWrite),
        ],
    )
}

fn history_point_configuration(segment: u8) -> PointType {
    PointType::new(
        history_segment_point_configuration(segment),
        &format!("HISTORY_SEGMENT_{segment}_POINT_CONFIGURATION"),
        vec![
            Parameter::new(0, "POINT_TAG_ID", "Tag of the archived point", DataType::Ac10, Access::ReadOnly),
            Parameter::new(1, "PARAMETER_DESCRIPTION", "Label for the logged parameter", DataType::Ac10, Access::ReadWrite),
            Parameter::new(2, "HISTORY_LOG_POINT", "TLP archived by this point", DataType::Tlp, Access::ReadWrite),
            Parameter::new(3, "ARCHIVE_TYPE", "Archival method", DataType::Uint8, Access::ReadWrite),
            Parameter::new(4, "AVERAGING_RATE_TYPE", "Averaging or accumulation rate", DataType::Uint8, Access::ReadWrite),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookups_by_number() {
        let reg = registry();
        let ai = reg.point_type_by_number(ANALOG_INPUTS).unwrap();
        assert_eq!(ai.parameter_by_number(21).unwrap().data_type, DataType::Float);
        assert_eq!(ai.parameter_by_number(62).unwrap().data_type, DataType::Ac10);
        assert_eq!(
            reg.point_type_by_number(250),
            Err(TlpError::PointTypeNotFound(250))
        );
    }

    #[test]
    fn lookups_by_name() {
        let reg = registry();
        let pt = reg
            .point_type_by_name("history_segment_4_point_configuration")
            .unwrap();
        assert_eq!(pt.number, 129);
        assert!(reg.point_type_by_name("NO_SUCH_TYPE").is_err());
    }

    #[test]
    fn bin_parameters_carry_eight_bits() {
        let reg = registry();
        let di = reg.point_type_by_number(DISCRETE_INPUTS).unwrap();
        let status = di.parameter_by_number(3).unwrap();
        assert_eq!(status.bits.len(), 8);
        assert_eq!(status.bits[0].bit_number, 0);
        assert_eq!(status.bits[0].name, "STATE");
    }

    #[test]
    fn configurable_opcode_table_shape() {
        let reg = registry();
        let pt = reg.point_type_by_number(CONFIGURABLE_OPCODE).unwrap();
        assert_eq!(pt.parameters().count(), 45);
        assert_eq!(pt.parameter_by_number(44).unwrap().data_type, DataType::Tlp);
    }
}

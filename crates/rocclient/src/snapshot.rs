//! In-memory reflection of device configuration
//!
//! Populated by the client's bootstrap reads and kept only in memory.
//! `DeviceSnapshot::dump_json` renders the diagnostic dump; enum-valued
//! fields serialize as `{"name": ..., "value": ...}`.

use rocproto::enums::{HistoryArchiveType, HistoryAveragingRateType};
use rocproto::system::SystemConfig;
use roctlp::TlpInstance;
use serde::Serialize;
use std::collections::BTreeMap;

/// One physical I/O location.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IoPointDefinition {
    pub physical_location: u8,
    pub logical_number: Option<u8>,
    pub point_type: Option<u8>,
    pub point_tag_id: Option<String>,
}

impl IoPointDefinition {
    /// A location is defined once it reports a nonzero point type.
    pub fn is_defined(&self) -> bool {
        self.point_type.is_some_and(|pt| pt > 0)
    }
}

/// Full I/O map keyed by physical location, plus upload progress flags.
#[derive(Debug, Clone, Default, Serialize)]
pub struct IoDefinition {
    pub logical_numbers_uploaded: bool,
    pub point_types_uploaded: bool,
    pub point_tag_ids_uploaded: bool,
    /// True once all three uploads have completed.
    pub fully_defined: bool,
    pub io_map: BTreeMap<u8, IoPointDefinition>,
}

impl IoDefinition {
    pub fn point(&self, physical_location: u8) -> Option<&IoPointDefinition> {
        self.io_map.get(&physical_location)
    }

    pub fn points_for_point_type(&self, point_type: u8) -> Vec<&IoPointDefinition> {
        self.io_map
            .values()
            .filter(|p| p.point_type == Some(point_type))
            .collect()
    }

    pub fn defined_points(&self) -> Vec<&IoPointDefinition> {
        self.io_map.values().filter(|p| p.is_defined()).collect()
    }

    /// Tag for the given location, when the map knows one.
    pub fn tag_for(&self, physical_location: u8) -> Option<&str> {
        self.point(physical_location)
            .and_then(|p| p.point_tag_id.as_deref())
    }
}

/// One populated slot of a configurable opcode table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpcodeTableEntry {
    pub table_index: u8,
    pub data_index: u8,
    pub tlp: TlpInstance,
}

/// All sixteen configurable opcode tables.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConfigurableOpcodeTables {
    pub fully_defined: bool,
    pub tables: BTreeMap<u8, Vec<OpcodeTableEntry>>,
}

/// One history point within a segment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryPointConfiguration {
    pub point_number: u8,
    pub point_tag_id: String,
    pub parameter_description: String,
    /// `None` when the point is not archiving anything.
    pub history_log_point: Option<TlpInstance>,
    pub archive_type: HistoryArchiveType,
    pub averaging_rate_type: HistoryAveragingRateType,
}

/// Scalar configuration of one history segment plus its points.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistorySegmentConfiguration {
    pub segment_number: u8,
    pub description: String,
    pub segment_size: u16,
    pub max_segment_size: u16,
    pub periodic_entries: u16,
    pub periodic_index: u16,
    pub daily_entries: u16,
    pub daily_index: u16,
    pub periodic_sample_rate: u16,
    pub contract_hour: u8,
    pub logging_enabled: bool,
    pub free_space: u32,
    pub configured_point_count: u8,
    pub user_weighting_tlp: Option<TlpInstance>,
    pub points: Vec<HistoryPointConfiguration>,
}

/// All thirteen history segments.
#[derive(Debug, Clone, Default, Serialize)]
pub struct HistoryDefinition {
    pub fully_defined: bool,
    pub segments: BTreeMap<u8, HistorySegmentConfiguration>,
}

/// Everything the client has learned about the device.
#[derive(Debug, Clone, Default)]
pub struct DeviceSnapshot {
    pub io: IoDefinition,
    pub opcode_tables: ConfigurableOpcodeTables,
    pub history: HistoryDefinition,
    pub system_config: Option<SystemConfig>,
}

impl DeviceSnapshot {
    /// Render the diagnostic JSON dump: the three definition maps under
    /// their own keys, system-configuration fields at the top level.
    pub fn dump_json(&self) -> serde_json::Result<String> {
        let mut root = serde_json::Map::new();
        root.insert(
            "history_definition".into(),
            serde_json::to_value(&self.history)?,
        );
        root.insert("io_definition".into(), serde_json::to_value(&self.io)?);
        root.insert(
            "user_opcode_table_definition".into(),
            serde_json::to_value(&self.opcode_tables)?,
        );
        if let Some(system) = &self.system_config {
            if let serde_json::Value::Object(fields) = serde_json::to_value(system)? {
                root.extend(fields);
            }
        }
        serde_json::to_string_pretty(&serde_json::Value::Object(root))
    }
}

//! TLP instances and values
//!
//! A `TlpInstance` is a lightweight handle: it stores only the wire
//! triple (plus an optional tag name from the I/O map) and resolves its
//! schema against the registry on demand. Two instances are equal when
//! their triples are equal.

use crate::error::Result;
use crate::parameter::Parameter;
use crate::point_type::PointType;
use crate::registry::{registry, Registry};
use chrono::{DateTime, Utc};
use rocwire::{DataType, TlpTriple, Value};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct TlpInstance {
    pub point_type: u8,
    pub logical_number: u8,
    pub parameter: u8,
    /// Tag name from the device I/O configuration, when known.
    pub tag_name: Option<String>,
}

impl PartialEq for TlpInstance {
    fn eq(&self, other: &Self) -> bool {
        self.triple() == other.triple()
    }
}

impl Eq for TlpInstance {}

impl std::hash::Hash for TlpInstance {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.triple().hash(state);
    }
}

impl TlpInstance {
    pub fn new(point_type: u8, logical_number: u8, parameter: u8) -> Self {
        Self {
            point_type,
            logical_number,
            parameter,
            tag_name: None,
        }
    }

    pub fn triple(&self) -> TlpTriple {
        TlpTriple::new(self.point_type, self.logical_number, self.parameter)
    }

    /// Resolve the point-type definition, synthesizing an unknown stand-in
    /// when the registry has no entry for this number.
    pub fn point_type_def(&self) -> PointType {
        match registry().point_type_by_number(self.point_type) {
            Ok(pt) => pt.clone(),
            Err(_) => registry().unknown_point_type(self.point_type),
        }
    }

    /// Resolve the parameter definition, falling back to an `UNKNOWN`
    /// parameter for numbers absent from the (known or synthesized)
    /// point type.
    pub fn parameter_def(&self) -> Parameter {
        self.point_type_def()
            .parameter_by_number(self.parameter)
            .cloned()
            .unwrap_or_else(|_| Parameter::unknown(self.parameter))
    }

    /// Strict registry resolution for decode paths that need the exact
    /// parameter width.
    pub fn resolve_strict<'r>(&self, reg: &'r Registry) -> Result<&'r Parameter> {
        reg.point_type_by_number(self.point_type)?
            .parameter_by_number(self.parameter)
    }

    pub fn data_type(&self) -> DataType {
        self.parameter_def().data_type
    }

    pub fn with_tag(mut self, tag_name: Option<String>) -> Self {
        self.tag_name = tag_name;
        self
    }
}

impl From<TlpTriple> for TlpInstance {
    fn from(t: TlpTriple) -> Self {
        Self::new(t.point_type, t.logical_number, t.parameter)
    }
}

/// A TLP together with a decoded value and its observation time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TlpValue {
    #[serde(flatten)]
    pub tlp: TlpInstance,
    pub value: Value,
    pub timestamp: DateTime<Utc>,
    /// Per-bit breakdown for `BIN` parameters, LSB first; empty otherwise.
    pub bit_values: Vec<bool>,
}

impl TlpValue {
    pub fn new(tlp: TlpInstance, value: Value, timestamp: DateTime<Utc>) -> Self {
        let bit_values = match (tlp.data_type(), value.as_u8()) {
            (DataType::Bin, Some(raw)) => (0..8).map(|i| (raw >> i) & 1 == 1).collect(),
            _ => Vec::new(),
        };
        Self {
            tlp,
            value,
            timestamp,
            bit_values,
        }
    }
}

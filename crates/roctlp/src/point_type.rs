//! Point-type definitions

use crate::error::{Result, TlpError};
use crate::parameter::Parameter;
use serde::Serialize;
use std::collections::BTreeMap;

/// A device-defined schema for a family of points.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointType {
    pub number: u8,
    pub description: String,
    parameters: BTreeMap<u8, Parameter>,
}

impl PointType {
    pub fn new(number: u8, description: &str, parameters: Vec<Parameter>) -> Self {
        Self {
            number,
            description: description.to_owned(),
            parameters: parameters.into_iter().map(|p| (p.number, p)).collect(),
        }
    }

    /// Synthesized stand-in for a point type the registry does not know.
    ///
    /// Carries the number and a single `UNKNOWN` parameter so that a TLP
    /// referencing it can still be materialized instead of failing the
    /// whole response decode.
    pub fn unknown(number: u8) -> Self {
        Self::new(number, "Unknown Point Type", vec![Parameter::unknown(0)])
    }

    pub fn parameters(&self) -> impl Iterator<Item = &Parameter> {
        self.parameters.values()
    }

    pub fn parameter_by_number(&self, parameter: u8) -> Result<&Parameter> {
        self.parameters
            .get(&parameter)
            .ok_or(TlpError::ParameterNotFound {
                point_type: self.number,
                parameter,
            })
    }

    pub fn parameter_by_name(&self, name: &str) -> Result<&Parameter> {
        self.parameters
            .values()
            .find(|p| p.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| TlpError::ParameterNameNotFound {
                point_type: self.number,
                name: name.to_owned(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameter::Access;
    use rocwire::DataType;

    fn sample() -> PointType {
        PointType::new(
            103,
            "Analog Inputs",
            vec![
                Parameter::new(21, "EU_VALUE", "EU value", DataType::Float, Access::ReadOnly),
                Parameter::new(62, "POINT_TAG_ID", "Tag", DataType::Ac10, Access::ReadWrite),
            ],
        )
    }

    #[test]
    fn lookup_by_number_and_name() {
        let pt = sample();
        assert_eq!(pt.parameter_by_number(21).unwrap().name, "EU_VALUE");
        assert_eq!(pt.parameter_by_name("point_tag_id").unwrap().number, 62);
        assert_eq!(
            pt.parameter_by_number(99),
            Err(TlpError::ParameterNotFound {
                point_type: 103,
                parameter: 99
            })
        );
    }

    #[test]
    fn unknown_point_type_has_unknown_parameter() {
        let pt = PointType::unknown(250);
        assert_eq!(pt.number, 250);
        let p = pt.parameter_by_number(0).unwrap();
        assert_eq!(p.data_type, DataType::Unknown);
    }
}

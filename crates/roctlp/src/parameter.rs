//! Parameter definitions within a point type

use rocwire::DataType;
use serde::Serialize;

/// Read/write access of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Access {
    ReadOnly,
    ReadWrite,
    WriteOnly,
    Unknown,
}

/// One bit of a `BIN` parameter.
///
/// The vendor documentation lists "6.0", "6.1", ... as separate rows, but
/// only the whole byte can be requested; the per-bit meaning is kept here
/// so a decoded `bit_values` array can be correlated back to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BitDescriptor {
    /// 0 = LSB, 7 = MSB.
    pub bit_number: u8,
    pub name: String,
    pub description: String,
}

/// One slot within a point type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parameter {
    pub number: u8,
    pub name: String,
    pub description: String,
    pub data_type: DataType,
    pub access: Access,
    /// Valid range as documented, where the vendor gives one.
    pub range: Option<String>,
    /// Bit meanings, ordered LSB first. Populated only for `BIN`.
    pub bits: Vec<BitDescriptor>,
}

impl Parameter {
    pub fn new(
        number: u8,
        name: &str,
        description: &str,
        data_type: DataType,
        access: Access,
    ) -> Self {
        Self {
            number,
            name: name.to_owned(),
            description: description.to_owned(),
            data_type,
            access,
            range: None,
            bits: Vec::new(),
        }
    }

    pub fn with_range(mut self, range: &str) -> Self {
        self.range = Some(range.to_owned());
        self
    }

    pub fn with_bits(mut self, bits: [(&str, &str); 8]) -> Self {
        self.bits = bits
            .iter()
            .enumerate()
            .map(|(i, (name, description))| BitDescriptor {
                bit_number: i as u8,
                name: (*name).to_owned(),
                description: (*description).to_owned(),
            })
            .collect();
        self
    }

    /// Synthesized stand-in for a parameter the registry does not know.
    pub fn unknown(number: u8) -> Self {
        Self::new(
            number,
            "UNKNOWN",
            "Unknown parameter",
            DataType::Unknown,
            Access::Unknown,
        )
    }
}

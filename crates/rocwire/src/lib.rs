//! Wire-level primitives for the ROC Plus protocol
//!
//! Everything on the wire is little-endian. This crate provides the
//! bounds-checked buffer helpers, the CRC-16/ARC implementation, the ROC
//! primitive data-type table, and the dynamically typed `Value` carried by
//! decoded parameters.

pub mod codec;
pub mod crc;
pub mod data_type;
pub mod error;
pub mod value;

pub use codec::*;
pub use crc::{append_crc, crc16, split_crc};
pub use data_type::DataType;
pub use error::{Result, WireError};
pub use value::{TlpTriple, Value};

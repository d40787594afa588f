//! TLP schema registry
//!
//! A ROC device describes its data as TLPs: `(point type, logical number,
//! parameter)` triples. The point-type schema fixes each parameter's data
//! type, and therefore its wire width, at decode time. This crate holds
//! the registry of point-type definitions and the typed TLP value models.
//!
//! The registry is process-wide and immutable; it is seeded once on first
//! use. The full vendor parameter library is injected data and lives with
//! the integrator; the seed here covers the point types the client itself
//! consumes (analog/discrete I/O, configurable opcode tables, history
//! configuration).

pub mod error;
pub mod parameter;
pub mod point_type;
pub mod registry;
pub mod tlp;

pub use error::{Result, TlpError};
pub use parameter::{Access, BitDescriptor, Parameter};
pub use point_type::PointType;
pub use registry::{registry, Registry};
pub use tlp::{TlpInstance, TlpValue};

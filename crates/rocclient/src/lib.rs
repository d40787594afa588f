//! Async ROC Plus client
//!
//! One `RocClient` owns one TCP connection to a ROC800-family device and
//! serializes opcode requests over it. The protocol is strictly
//! turn-taking: there are no request IDs, so at most one request may be
//! in flight and a concurrent caller fails fast with [`ClientError::Busy`].
//!
//! Besides the raw [`RocClient::exchange`], the client offers typed
//! wrappers per opcode, periodic streaming reads, and bootstrap routines
//! that reflect the device's I/O, configurable-opcode, and history
//! configuration into in-memory snapshots.

pub mod client;
pub mod config;
pub mod error;
pub mod snapshot;
pub mod stream;
pub mod transport;

pub use client::RocClient;
pub use config::ClientConfig;
pub use error::{ClientError, Result};
pub use snapshot::{
    ConfigurableOpcodeTables, DeviceSnapshot, HistoryDefinition, HistoryPointConfiguration,
    HistorySegmentConfiguration, IoDefinition, IoPointDefinition, OpcodeTableEntry,
};

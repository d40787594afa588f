use rocwire::WireError;
use roctlp::TlpError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProtoError {
    #[error("frame too short: need {need} bytes, have {have}")]
    FrameTooShort { need: usize, have: usize },

    #[error("crc mismatch: frame carries {found:#06x}, computed {computed:#06x}")]
    CrcMismatch { found: u16, computed: u16 },

    #[error("no decoder registered for opcode {0}")]
    UnknownOpcode(u8),

    #[error("request body of {0} bytes exceeds the one-byte length field")]
    BodyTooLarge(usize),

    #[error("invalid {what} value {value}")]
    InvalidEnum { what: &'static str, value: u8 },

    #[error("unknown alarm type code {0}")]
    UnknownAlarmType(u8),

    #[error("unknown event type code {0}")]
    UnknownEventType(u8),

    #[error("invalid response data: {0}")]
    InvalidData(String),

    #[error(transparent)]
    Wire(#[from] WireError),

    #[error(transparent)]
    Registry(#[from] TlpError),
}

pub type Result<T> = std::result::Result<T, ProtoError>;
